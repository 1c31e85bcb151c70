//! Shader-variant build engine
//!
//! Expands the tensor-op catalog into (operation, data type) variants,
//! synthesizes the `glslang`/`spirv-opt` invocations for each, and runs them as
//! one abort-on-first-error batch.
//!
//! ```text
//! BuildConfig ─► variant::expand ─► command::synthesize_all ─► BatchRunner::run
//! ```

pub mod catalog;
pub mod command;
pub mod config;
pub mod error;
pub mod prelude;
pub mod runner;
pub mod toolchain;
pub mod types;
pub mod variant;
