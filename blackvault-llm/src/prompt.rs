use std::{fs, path::Path};

const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful AI assistant for a Roblox game called Black Vault.";

/// Fixed system instruction sent with every completion request. A
/// `SYSTEM_PROMPT.md` file in the working directory overrides the default.
pub fn system_prompt() -> String {
    let prompt_file = Path::new("SYSTEM_PROMPT.md");
    match fs::read_to_string(prompt_file) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => DEFAULT_SYSTEM_PROMPT.to_owned(),
    }
}
