use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for BCP-47 language tag handling
///
/// This module provides functions for validating and normalizing the language
/// tags accepted by the translation and detection surfaces. Tags are kept in
/// lowercase BCP-47 form except for the Chinese script subtags, which keep
/// their canonical capitalization (`zh-Hans`, `zh-Hant`).
/// The single hub language through which indirect pairs are bridged
pub const HUB_LANGUAGE: &str = "en";

/// Normalize a language tag to the form used throughout the core.
///
/// Chinese is the one special case: the detector and the model catalog only
/// distinguish scripts, so every regional spelling collapses onto the script
/// variant. A bare or generic `zh` maps to the simplified script.
pub fn normalize_language_code(code: &str) -> String {
    let lowered = code.trim().to_lowercase();

    match lowered.as_str() {
        "zh" | "zh-cn" | "zh-sg" | "zh-hans" => "zh-Hans".to_string(),
        "zh-tw" | "zh-hk" | "zh-mo" | "zh-hant" => "zh-Hant".to_string(),
        _ => lowered,
    }
}

/// Validate that a language tag has a recognized primary subtag.
///
/// Accepts ISO 639-1 two-letter primary subtags, optionally followed by a
/// script or region subtag (`zh-Hans`, `pt-br`).
pub fn validate_language_code(code: &str) -> Result<()> {
    let normalized = normalize_language_code(code);
    let primary = normalized.split('-').next().unwrap_or("");

    if primary.len() == 2 && Language::from_639_1(primary).is_some() {
        return Ok(());
    }

    Err(anyhow!("Invalid language code: {}", code))
}

/// Get the English name for a language tag, for logging and diagnostics
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = normalize_language_code(code);
    let primary = normalized.split('-').next().unwrap_or("");

    Language::from_639_1(primary)
        .map(|lang| lang.to_name().to_string())
        .ok_or_else(|| anyhow!("Unknown language code: {}", code))
}

/// Check whether two language tags refer to the same language after
/// normalization
pub fn language_codes_match(a: &str, b: &str) -> bool {
    normalize_language_code(a) == normalize_language_code(b)
}
