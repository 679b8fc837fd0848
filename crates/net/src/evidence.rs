//! Evidence: observed values for a subset of the network's variables.
//!
//! As text, evidence is written `Key=Value` items joined by commas, e.g.
//! `Rain=light,Maintenance=no`.

use std::collections::HashMap;

use crate::error::NetError;

/// A partial assignment of variable name to value label.
pub type Evidence = HashMap<String, String>;

/// Parse a single `Key=Value` item. Surrounding whitespace is trimmed.
pub fn parse_evidence_item(item: &str) -> Result<(String, String), NetError> {
    let invalid = || NetError::InvalidEvidence {
        item: item.trim().to_string(),
    };

    let mut parts = item.split('=');
    let (key, value) = match (parts.next(), parts.next(), parts.next()) {
        (Some(key), Some(value), None) => (key.trim(), value.trim()),
        _ => return Err(invalid()),
    };
    if key.is_empty() || value.is_empty() {
        return Err(invalid());
    }
    Ok((key.to_string(), value.to_string()))
}

/// Parse comma-separated `Key=Value` items. Blank input is empty evidence.
///
/// A later item for the same key overwrites the earlier one.
///
/// ```rust
/// use bayes_net::parse_evidence;
///
/// let e = parse_evidence("Rain=light, Maintenance=no").unwrap();
/// assert_eq!(e["Rain"], "light");
/// assert_eq!(e["Maintenance"], "no");
/// assert!(parse_evidence("  ").unwrap().is_empty());
/// ```
pub fn parse_evidence(text: &str) -> Result<Evidence, NetError> {
    if text.trim().is_empty() {
        return Ok(Evidence::new());
    }
    text.split(',').map(parse_evidence_item).collect()
}

/// Render evidence as `Key=Value` items sorted by key.
pub fn format_evidence(evidence: &Evidence) -> String {
    let mut items: Vec<_> = evidence.iter().collect();
    items.sort();
    items
        .into_iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(",")
}
