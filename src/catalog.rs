use serde::Serialize;

/// One model the client may select, with its credit price per 1K tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelCatalogEntry {
    pub id: &'static str,
    #[serde(rename = "name")]
    pub display_name: &'static str,
    pub provider: &'static str,
    #[serde(rename = "costPerToken")]
    pub cost_per_thousand_tokens: u32,
}

const fn entry(
    id: &'static str,
    display_name: &'static str,
    provider: &'static str,
    cost_per_thousand_tokens: u32,
) -> ModelCatalogEntry {
    ModelCatalogEntry {
        id,
        display_name,
        provider,
        cost_per_thousand_tokens,
    }
}

// Order is part of the /api/models contract.
pub static CATALOG: [ModelCatalogEntry; 8] = [
    entry("gpt-4", "GPT-4", "OpenAI", 30),
    entry("gpt-3.5-turbo", "GPT-3.5 Turbo", "OpenAI", 5),
    entry("claude-3-opus", "Claude 3 Opus", "Anthropic", 35),
    entry("claude-3-sonnet", "Claude 3 Sonnet", "Anthropic", 15),
    entry("claude-3-haiku", "Claude 3 Haiku", "Anthropic", 3),
    entry("gemini-pro", "Gemini Pro", "Google", 10),
    entry("mistral-large", "Mistral Large", "Mistral", 12),
    entry("llama-3-70b", "Llama 3 70B", "Together AI", 8),
];

pub fn models() -> &'static [ModelCatalogEntry] {
    &CATALOG
}

pub fn find(id: &str) -> Option<&'static ModelCatalogEntry> {
    CATALOG.iter().find(|entry| entry.id == id)
}
