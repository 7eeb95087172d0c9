//! # Sustain Core Kernel
//!
//! Shared foundations for every other module of `sustain-core`:
//!
//! - **Error Handling**: the crate-wide [`Error`](error::Error) type and the
//!   [`Result`](error::Result) alias in the `error` submodule.
//! - **Core Constants**: built-in resolver names, their load/unload orders and the
//!   resource entries that drive resolver participation, in the `constants` submodule.
pub mod constants;
pub mod error;

pub use error::{Error, Result};
