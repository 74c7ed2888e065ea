// src/extractors/mod.rs
pub mod assembler;
pub mod block;
pub mod field;
pub mod specs;

// Re-export key extraction types for convenience
pub use assembler::{AssemblerConfig, BlockTermination, RecordAssembler};
