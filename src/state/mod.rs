//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `RunState`: the lifecycle of one frontier run (initializing, dispatching,
//!   draining, terminated)

mod run_state;

pub use run_state::RunState;
