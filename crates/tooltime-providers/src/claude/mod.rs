mod discovery;
mod parser;
pub(crate) mod schema;

pub use discovery::ClaudeDiscovery;
pub use parser::ClaudeParser;
