// Draft generation: sheet rows → normalized rows → prompted bodies → drafts.
// All agent calls go through the `Agent` trait; no direct HTTP here.

pub mod assembler;
pub mod handlers;
pub mod models;
pub mod normalizer;
pub mod prompts;
pub mod sheet;
