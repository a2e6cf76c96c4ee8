mod client;
mod prompt;

pub use client::CompletionService;
pub use prompt::system_prompt;
