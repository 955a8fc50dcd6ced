//! The ingestion pipeline stages applied to raw input before storage.
//!
//! Stage order: extraction → language normalization → tag generation →
//! reference extraction → preview/one-liner → assembly. Language, tag and
//! reference stages are best-effort; an LLM failure degrades to a fallback
//! value and never aborts ingestion.

pub mod language;
pub mod preview;
pub mod references;
pub mod tags;
