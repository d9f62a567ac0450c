//! Post-processing: deterministic cleanup of the model's JSON text.
//!
//! Gemini honours the JSON response format and returns a bare object. Other
//! providers reached through `edgequake-llm` sometimes wrap the object in a
//! ```` ```json ```` fence or prepend a byte-order mark despite the prompt.
//! These rules only remove such wrapping; the content is never rewritten,
//! so a reply that is not JSON still fails strict validation.

use once_cell::sync::Lazy;
use regex::Regex;

/// Strip the wrapping some models put around an otherwise valid JSON reply.
///
/// Rules (applied in order):
/// 1. Remove a leading UTF-8 byte-order mark
/// 2. Trim surrounding whitespace
/// 3. Strip an outer code fence (with or without a `json` tag)
pub fn clean_model_json(input: &str) -> String {
    let s = input.trim_start_matches('\u{FEFF}');
    let s = s.trim();
    strip_code_fences(s).trim().to_string()
}

static RE_OUTER_FENCES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```(?:json|JSON)?[ \t]*\r?\n(.*?)\r?\n?```$").unwrap());

fn strip_code_fences(input: &str) -> &str {
    match RE_OUTER_FENCES.captures(input).and_then(|caps| caps.get(1)) {
        Some(inner) => inner.as_str(),
        None => input,
    }
}
