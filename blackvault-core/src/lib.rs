use blackvault_database::Database;
use blackvault_llm::CompletionService;

pub type Error = anyhow::Error;

/// Application state shared by every request handler.
#[derive(Clone, Debug)]
pub struct Data {
    pub db: Database,
    /// `None` when no provider API key is configured; requests then surface
    /// the generic upstream failure.
    pub llm: Option<CompletionService>,
    /// Shared secret for the chat bridge. `None` rejects every bridge call.
    pub bridge_secret: Option<String>,
}
