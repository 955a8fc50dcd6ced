pub mod blob;
pub mod llm;
pub mod repo;
pub mod state;
