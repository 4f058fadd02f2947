use crate::error::Result;
use crate::parser::ParserClient;
use crate::text::TextAccess;

/// A language front end: parses one file under the compile context carried
/// by `C` and reports what it finds to the client.
///
/// Returning an error means the front end could not run at all. Problems in
/// the source are reported as error facts instead.
pub trait FrontEnd<C>: Send + Sync {
    fn index_file(&self, command: &C, text: &TextAccess, client: &mut dyn ParserClient) -> Result<()>;
}
