pub mod language;
pub mod location;
pub mod naming;
pub mod symbol;

pub use language::*;
pub use location::*;
pub use naming::*;
pub use symbol::*;
