mod discovery;
mod parser;
pub(crate) mod schema;

pub use discovery::CodexDiscovery;
pub use parser::CodexParser;
