mod client;
mod client_impl;
pub mod utils;

pub use client::ParserClient;
pub use client_impl::ParserClientImpl;
