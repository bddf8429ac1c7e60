// Shared prompt fragments.
// Each service that needs completion calls defines its own prompts.rs alongside it.
// This file contains cross-cutting fragments only.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "Return ONLY a valid JSON object. \
    Do NOT wrap it in markdown code fences. \
    Do NOT include explanations, apologies, or any text outside the JSON object.";
