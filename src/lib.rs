//! Simple to use cli for logging workouts. Keeps exercise entries, personal records, a weekday
//! checklist and daily streaks in a local store, without any servers or runtimes.
//!

pub mod cli;
pub mod storage;
pub mod utils;
pub mod workout;
