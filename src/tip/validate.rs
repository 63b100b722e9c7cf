//! Sanitization and validation of generated tip text

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::cache::TipEntry;

use super::TipError;

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("hardcoded regex"));
static URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"http\S+").expect("hardcoded regex"));
static NON_ASCII: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\x00-\x7F]+").expect("hardcoded regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("hardcoded regex"));

/// Normalizes raw provider output before validation.
///
/// Strips HTML tags, URLs, and non-ASCII symbols (emoji included), then
/// collapses whitespace runs into single spaces and trims the ends.
pub fn sanitize(raw: &str) -> String {
    let text = HTML_TAG.replace_all(raw, "");
    let text = URL.replace_all(&text, "");
    let text = NON_ASCII.replace_all(&text, "");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Checks tip text against the content rules and stamps it with today's
/// UTC date.
///
/// Rejects text that is empty after trimming, and text longer than
/// `max_chars` characters. No semantic inspection happens here.
pub fn validate(text: &str, max_chars: usize) -> Result<TipEntry, TipError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(TipError::InvalidContent(
            "provider returned an empty tip".to_string(),
        ));
    }

    let chars = text.chars().count();
    if chars > max_chars {
        return Err(TipError::InvalidContent(format!(
            "tip is {chars} characters, limit is {max_chars}"
        )));
    }

    Ok(TipEntry {
        date: Utc::now().date_naive(),
        text: text.to_string(),
    })
}
