//! Turning raw extractor output into menu labels.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Digits, separators, currency and whitespace only: a price, not a dish
static PRICE_ONLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\d,.¥￥$€円\s]+$").unwrap());

/// Nothing readable: no word characters, kana or kanji
static SYMBOLS_ONLY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\w\x{3040}-\x{309F}\x{30A0}-\x{30FF}\x{4E00}-\x{9FFF}]+$").unwrap()
});

/// First `[...]` span, across lines
static JSON_ARRAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\[.*\]").unwrap());

/// Leading "3. " list numbering
static LIST_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s*").unwrap());

/// Clean plain OCR text into candidate menu items.
///
/// Keeps lines that are at least two characters long and are not bare
/// prices or symbol noise. Duplicates are dropped, first occurrence wins.
pub fn clean_ocr_lines(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !PRICE_ONLY.is_match(line))
        .filter(|line| line.chars().count() >= 2)
        .filter(|line| !SYMBOLS_ONLY.is_match(line))
        .filter(|line| seen.insert(line.to_string()))
        .map(str::to_string)
        .collect()
}

/// Labels from a model reply that should be a JSON array of strings.
///
/// Takes the first bracketed array in the reply (models like to wrap it in
/// prose or code fences). Without one, falls back to one label per line,
/// skipping bullets and stripping quotes and numbering.
pub fn parse_model_reply(reply: &str) -> Vec<String> {
    if let Some(m) = JSON_ARRAY.find(reply)
        && let Ok(labels) = parse_label_array(m.as_str())
    {
        return labels;
    }

    reply
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('-') && !line.starts_with('*'))
        .filter(|line| !line.starts_with("```"))
        .map(|line| {
            let line = LIST_NUMBER.replace(line, "");
            line.trim().trim_matches(|c| c == '"' || c == '\'').trim().to_string()
        })
        .filter(|line| !line.is_empty())
        .collect()
}

/// Strict parse of a JSON array; non-string entries are skipped.
pub fn parse_label_array(json: &str) -> Result<Vec<String>, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let labels = match value {
        serde_json::Value::Array(values) => values
            .into_iter()
            .filter_map(|v| v.as_str().map(|s| s.trim().to_string()))
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    };
    Ok(labels)
}
