pub mod handlers;
pub mod resolver;
