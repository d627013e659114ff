//! Benchmarks for the engine's per-sample paths.

mod interpreter;
mod render;

pub use interpreter::bench_interpreter;
pub use render::{bench_filters, bench_render};
