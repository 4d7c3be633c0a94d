//! Generation engine
//!
//! Wraps the inference framework behind a load-then-stream interface.

mod executor;

pub use executor::{Executor, GeneratedToken};
