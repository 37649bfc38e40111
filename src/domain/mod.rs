pub mod prompt;
pub mod reply;
pub mod ticket;
