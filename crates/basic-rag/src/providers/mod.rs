//! Provider abstractions for answer generation
//!
//! The pipeline only talks to the `Generator` trait, so the local Ollama
//! runtime can be swapped for another backend or a fixed stub.

pub mod fixed;
pub mod generator;

pub use fixed::FixedGenerator;
pub use generator::Generator;
