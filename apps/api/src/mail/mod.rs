pub mod handlers;
pub mod sender;
