pub mod clipboard;
pub mod completion;

pub use clipboard::ClipboardService;
pub use completion::CompletionService;
