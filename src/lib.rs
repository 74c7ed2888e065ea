// src/lib.rs
//! Structured field extraction from clinical document text.
//!
//! [`extractors::assembler::assemble`] turns raw text into an ordered [`record::Record`]
//! of canonical fields; everything else here loads documents, tracks display
//! state and writes results.

pub mod extractors;
pub mod loader;
pub mod pipeline;
pub mod record;
pub mod storage;
pub mod utils;
pub mod view;

pub use extractors::assembler::assemble;
pub use record::Record;
