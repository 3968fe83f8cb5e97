//! Search and evaluation for sable.

pub mod bench;
pub mod datagen;
pub mod eval;
pub mod search;
pub mod time;

pub use eval::{EvalKind, Evaluator, evaluate};
pub use search::{Limit, Reporter, SearchInfo, SearchResult, Searcher, Silent, mate_in};
pub use time::{TimeControl, limit_from_go};
