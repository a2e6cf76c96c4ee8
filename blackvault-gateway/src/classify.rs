/// Whether a prompt is a facility-layout request, exempt from the cooldown.
///
/// Plain case-insensitive substring check, no tokenization or word-boundary
/// matching.
pub fn is_layout_request(prompt: &str) -> bool {
    prompt.to_lowercase().contains("layout")
}
