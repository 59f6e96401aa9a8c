use serde_json::{Map, Value as JsonValue};

use crate::utils::crypto::sha256_hex;

pub const SCHOOL_PLACEHOLDER: &str = "Some University";
pub const COMPANY_PLACEHOLDER: &str = "Some Company";

const REMOVED_KEYS: [&str; 7] = ["name", "full_name", "realname", "phone", "mobile", "tel", "email"];

/// Strips personal identifiers and masks institution names before a resume
/// leaves the process for an AI provider.
pub fn sanitize_resume(content: &JsonValue) -> JsonValue {
    let mut cloned = content.clone();
    scrub(&mut cloned);
    cloned
}

/// Cache key for AI results: hex SHA-256 over the compact sanitized JSON.
/// `serde_json::Map` keeps keys sorted, so key order in the request is irrelevant.
pub fn content_hash(sanitized: &JsonValue) -> String {
    sha256_hex(sanitized.to_string().as_bytes())
}

fn scrub(value: &mut JsonValue) {
    match value {
        JsonValue::Object(map) => scrub_object(map),
        JsonValue::Array(items) => items.iter_mut().for_each(scrub),
        _ => {}
    }
}

fn scrub_object(map: &mut Map<String, JsonValue>) {
    map.retain(|key, _| !REMOVED_KEYS.contains(&key.to_lowercase().as_str()));

    for (key, v) in map.iter_mut() {
        let lower = key.to_lowercase();
        if v.is_string() {
            if lower.contains("school") {
                *v = JsonValue::String(SCHOOL_PLACEHOLDER.to_string());
            }
            if lower.contains("company") || lower.contains("employer") || lower.contains("organization") {
                *v = JsonValue::String(COMPANY_PLACEHOLDER.to_string());
            }
        } else {
            scrub(v);
        }
    }
}
