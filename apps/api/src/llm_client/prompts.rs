// Shared prompt fragments.
// Each stage that needs LLM calls defines its own prompts alongside it.

/// System prompt fragment that enforces JSON-only output.
/// OpenAI's JSON mode also requires the word "JSON" to appear in the messages.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with a single valid JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Prefixes a persona with the JSON-only instruction.
pub fn json_system(persona: &str) -> String {
    format!("{persona} {JSON_ONLY_SYSTEM}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_system_keeps_persona_and_mentions_json() {
        let system = json_system("You are an expert recruiter.");
        assert!(system.starts_with("You are an expert recruiter."));
        assert!(system.contains("JSON"));
    }
}
