pub mod clipboard;
pub mod openai;
