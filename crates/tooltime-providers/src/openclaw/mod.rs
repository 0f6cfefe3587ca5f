mod discovery;
mod parser;
pub(crate) mod schema;

pub use discovery::OpenClawDiscovery;
pub use parser::OpenClawParser;
