pub mod blob;
pub mod document;
pub mod llm;
pub mod model;
pub mod pipeline;
pub mod repo;
pub mod service;
