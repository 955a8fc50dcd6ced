pub mod blog;
pub mod category;
pub mod chat;
pub mod document;
