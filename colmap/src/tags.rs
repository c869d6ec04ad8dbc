//! Field annotations.
//!
//! A field carries a [`StructTag`]: an ordered list of `key:"value"` pairs. The value
//! under the `db` key is a primary column name optionally followed by comma-separated
//! options, e.g. `db:"address,inline"`.

use std::collections::HashSet;

/// Option flags attached to a primary tag name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagOptions(HashSet<String>);

impl TagOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, option: &str) -> bool {
        self.0.contains(option)
    }

    pub fn insert(&mut self, option: impl Into<String>) {
        self.0.insert(option.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for TagOptions {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Splits an annotation into its primary name and option set.
///
/// Everything before the first comma is the name. The remainder is split on commas
/// and each token is trimmed before insertion.
pub fn parse_tag(tag: &str) -> (&str, TagOptions) {
    match tag.split_once(',') {
        Some((name, rest)) => (name, rest.split(',').map(str::trim).collect()),
        None => (tag, TagOptions::new()),
    }
}

/// Key/value annotations attached to a field declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructTag {
    entries: Vec<(String, String)>,
}

impl StructTag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert; later entries never shadow earlier ones.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    /// Returns the value stored under `key`, if present.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the value stored under `key`, or `""` when absent.
    pub fn get(&self, key: &str) -> &str {
        self.lookup(key).unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parses the conventional `key:"value" other:"value"` form.
    ///
    /// Parsing stops at the first malformed entry; entries read so far are kept.
    pub fn parse(source: &str) -> Self {
        let mut entries = Vec::new();
        let mut rest = source;

        loop {
            rest = rest.trim_start();
            let Some(colon) = rest.find(':') else { break };
            let key = &rest[..colon];
            if key.is_empty() || key.contains(|c: char| c.is_whitespace() || c == '"') {
                break;
            }
            let Some(quoted) = rest[colon + 1..].strip_prefix('"') else { break };

            let mut value = String::new();
            let mut escaped = false;
            let mut end = None;
            for (offset, ch) in quoted.char_indices() {
                if escaped {
                    value.push(ch);
                    escaped = false;
                } else if ch == '\\' {
                    escaped = true;
                } else if ch == '"' {
                    end = Some(offset);
                    break;
                } else {
                    value.push(ch);
                }
            }
            let Some(end) = end else { break };

            entries.push((key.to_string(), value));
            rest = &quoted[end + 1..];
        }

        Self { entries }
    }
}
