//! Env entry list in the shape deplo.io expects:
//!
//! ```yaml
//! ---
//! - name: DB_CHARSET
//!   value: 'utf8mb4'
//! ```

/// One environment variable. Lists keep insertion order and are not
/// de-duplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvEntry {
    pub name: String,
    pub value: String,
}

impl EnvEntry {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        EnvEntry {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Formats a single entry. Multi-line values (PEM certificates) become a
/// `|-` literal block, everything else a single-quoted scalar.
pub fn yaml_entry(name: &str, value: &str) -> String {
    if value.contains('\n') {
        // The parser detects the block indent from the first non-blank line,
        // so leading spaces there (or on a blank line before it) need an
        // explicit indentation indicator.
        let needs_indicator = value.starts_with(' ')
            || value
                .lines()
                .find(|line| !line.trim().is_empty())
                .is_some_and(|line| line.starts_with(' '));
        let header = if needs_indicator { "|2-" } else { "|-" };
        let mut entry = format!("- name: {}\n  value: {}\n", name, header);
        for line in value.lines() {
            entry.push_str("    ");
            entry.push_str(line);
            entry.push('\n');
        }
        entry
    } else {
        format!("- name: {}\n  value: '{}'\n", name, value.replace('\'', "''"))
    }
}

pub fn render_document(entries: &[EnvEntry]) -> String {
    let mut doc = String::from("---\n");
    for entry in entries {
        doc.push_str(&yaml_entry(&entry.name, &entry.value));
    }
    doc
}
