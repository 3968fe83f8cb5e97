//! UCI protocol handling for sable.

pub mod command;
pub mod engine;
pub mod error;
pub mod report;

pub use command::{Command, PositionInfo, UciOption, parse_command};
pub use engine::{EngineConfig, Flow, UciEngine};
pub use error::UciError;
pub use report::{Output, UciReporter};
