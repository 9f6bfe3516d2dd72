// Cell normalization and field retention

use crate::error::{Result, TaxiError};
use regex::Regex;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static NUMERIC_CELL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9.,]+$").expect("numeric cell pattern is valid"));

/// A normalized CSV cell.
///
/// Numbers keep their textual form (with commas already rewritten to
/// periods) so the flattened output reproduces the export verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(String),
    Text(String),
}

impl Cell {
    pub fn as_str(&self) -> &str {
        match self {
            Cell::Number(s) | Cell::Text(s) => s,
        }
    }

    /// Loose float reading: the longest leading numeric prefix, or 0.
    pub fn as_f64(&self) -> f64 {
        leading_number(self.as_str())
    }

    /// Loose integer reading: the float reading truncated toward zero.
    pub fn as_i64(&self) -> i64 {
        self.as_f64().trunc() as i64
    }

    /// Renders the cell as a Lua literal. A number such as `1.2.3` that no
    /// parser accepts is written as a string.
    pub fn to_lua(&self) -> String {
        match self {
            Cell::Number(s) if s.parse::<f64>().is_ok() => s.clone(),
            Cell::Number(s) | Cell::Text(s) => format!("\"{}\"", escape_quotes(s)),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Cell::Number(s) => {
                if let Ok(n) = s.parse::<i64>() {
                    serializer.serialize_i64(n)
                } else if let Ok(f) = s.parse::<f64>() {
                    serializer.serialize_f64(f)
                } else {
                    // "1.2.3" passes the numeric pattern but is no number
                    serializer.serialize_str(s)
                }
            }
            Cell::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// Normalizes one raw cell. Empty cells become `None`.
pub fn normalize_cell(raw: &str) -> Option<Cell> {
    if raw.is_empty() {
        return None;
    }

    if NUMERIC_CELL.is_match(raw) && raw.bytes().any(|b| b.is_ascii_digit()) {
        return Some(Cell::Number(raw.replace(',', ".")));
    }

    Some(Cell::Text(raw.to_string()))
}

/// Normalizes a cell of `table.field`, dropping it when the policy excludes the field.
pub fn normalize_field(policy: &FieldPolicy, table: &str, field: &str, raw: &str) -> Option<Cell> {
    if !policy.includes(table, field) {
        return None;
    }
    normalize_cell(raw)
}

fn escape_quotes(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out
}

fn leading_number(s: &str) -> f64 {
    let bytes = s.trim_start().as_bytes();
    let mut end = 0;
    let mut seen_dot = false;

    if bytes.first() == Some(&b'-') || bytes.first() == Some(&b'+') {
        end = 1;
    }
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => end += 1,
            b'.' if !seen_dot => {
                seen_dot = true;
                end += 1;
            }
            _ => break,
        }
    }

    std::str::from_utf8(&bytes[..end])
        .ok()
        .and_then(|prefix| prefix.parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Which columns of which tables are retained in the flattened output.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldPolicy {
    /// Every column of every table
    All,
    /// Named columns per table; tables not listed retain nothing
    Only(HashMap<String, Vec<String>>),
}

impl Default for FieldPolicy {
    /// The last known addon format.
    fn default() -> Self {
        let mut fields = HashMap::new();
        fields.insert("taxinodes".to_string(), Vec::new());
        fields.insert(
            "taxipath".to_string(),
            vec!["ID".into(), "FromTaxiNode".into(), "ToTaxiNode".into()],
        );
        fields.insert(
            "taxipathnode".to_string(),
            vec![
                "Loc[0]".into(),
                "Loc[1]".into(),
                "Loc[2]".into(),
                "ID".into(),
                "PathID".into(),
            ],
        );
        FieldPolicy::Only(fields)
    }
}

impl FieldPolicy {
    pub fn includes(&self, table: &str, field: &str) -> bool {
        match self {
            FieldPolicy::All => true,
            FieldPolicy::Only(fields) => fields
                .get(&table.to_lowercase())
                .is_some_and(|names| names.iter().any(|name| name == field)),
        }
    }

    /// Parses an allow-list of the form `{"taxipath": ["ID", "FromTaxiNode"]}`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let fields: HashMap<String, Vec<String>> = serde_json::from_str(json)
            .map_err(|e| TaxiError::InvalidFieldPolicy(e.to_string()))?;

        Ok(FieldPolicy::Only(
            fields
                .into_iter()
                .map(|(table, names)| (table.to_lowercase(), names))
                .collect(),
        ))
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_number_prefix() {
        assert_eq!(leading_number("1.2.3"), 1.2);
        assert_eq!(leading_number("-7"), -7.0);
        assert_eq!(leading_number("."), 0.0);
        assert_eq!(leading_number("abc"), 0.0);
        assert_eq!(leading_number("42abc"), 42.0);
    }

    #[test]
    fn test_escape_quotes() {
        assert_eq!(escape_quotes(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(escape_quotes(r"a\b"), r"a\\b");
        assert_eq!(escape_quotes("two\r\nlines"), r"two\r\nlines");
    }
}
