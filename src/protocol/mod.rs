//! Line-oriented text protocol: command parsing on the way in, event and
//! result rendering on the way out.

pub mod parser;
pub mod report;

pub use parser::{parse_command, parse_matchup, Command};
pub use report::{format_event, format_result};
