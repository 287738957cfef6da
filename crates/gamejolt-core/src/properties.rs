use url::Url;

use crate::error::{Error, Result};

/// One parsed entity: ordered `key -> value` pairs.
///
/// A missing key and a key with an empty value are different things; the
/// typed accessors only coerce on read.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PropertyRecord {
    values: Vec<(String, String)>,
}

impl PropertyRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse lines of the form `key:"value"`. Lines without a colon are
    /// skipped; a value without surrounding quotes is taken verbatim.
    pub fn parse(text: &str) -> Self {
        let mut record = Self::new();
        for line in text.split('\n') {
            if let Some((key, value)) = parse_line(line) {
                record.put(key, value);
            }
        }
        record
    }

    pub fn put(&mut self, key: &str, value: &str) {
        match self.values.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.values.push((key.to_string(), value.to_string())),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Missing or whitespace-only.
    pub fn is_blank(&self, key: &str) -> bool {
        self.get(key).map_or(true, |v| v.trim().is_empty())
    }

    /// Case-insensitive `true`; anything else, including absence, is false.
    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key)
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
    }

    /// Blank values read as 0.
    pub fn get_int(&self, key: &str) -> Result<i64> {
        match self.get(key) {
            Some(v) if !v.trim().is_empty() => v
                .trim()
                .parse()
                .map_err(|_| Error::malformed(format!("{key} is not an integer: {v:?}"))),
            _ => Ok(0),
        }
    }

    pub fn get_url(&self, key: &str) -> Result<Url> {
        let raw = self
            .get(key)
            .ok_or_else(|| Error::malformed(format!("missing {key}")))?;
        Url::parse(raw.trim()).map_err(|e| Error::malformed(format!("{key}: {e}")))
    }

    /// Split on `delimiter`, trimming pieces and dropping empty ones.
    pub fn get_delimited(&self, key: &str, delimiter: char) -> Vec<String> {
        self.get(key)
            .map(|v| {
                v.split(delimiter)
                    .map(str::trim)
                    .filter(|piece| !piece.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The service's `message` field, if it sent one.
    pub fn message(&self) -> Option<&str> {
        self.get("message").filter(|m| !m.trim().is_empty())
    }
}

/// Split `key:"value"` (tolerating a trailing `\r`).
pub(crate) fn parse_line(line: &str) -> Option<(&str, &str)> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let (key, value) = line.split_once(':')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);
    Some((key, value))
}
