pub mod event;
pub mod session;
pub mod time;
mod util;

pub use event::*;
pub use session::*;
pub use time::{format_timestamp, parse_timestamp, parse_timestamp_str};
pub use util::*;
