use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use std::collections::btree_map::{self, BTreeMap};

/// Typed value stored under one field of a [`LogRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Str(String),
    Bool(bool),
    Timestamp(DateTime<Utc>),
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Str(s) => serializer.serialize_str(s),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Timestamp(t) => {
                serializer.serialize_str(&t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
        }
    }
}

/// One parsed log line: a bag of field name to typed value.
///
/// Records are recycled through [`RecordPool`](crate::pool::RecordPool), so
/// encoders only ever see them by reference for the duration of one call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LogRecord {
    fields: BTreeMap<String, Value>,
}

impl LogRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing whatever was there.
    ///
    /// Prefer [`add_str`](Self::add_str) for string values that may repeat.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Append `value` to an existing string under `key`, or store it.
    ///
    /// A non-string value under `key` is replaced.
    pub fn add_str(&mut self, key: &str, value: &str) {
        match self.fields.get_mut(key) {
            Some(Value::Str(existing)) => existing.push_str(value),
            _ => {
                self.fields.insert(key.to_string(), Value::Str(value.to_string()));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.fields.get(key) {
            Some(Value::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.fields.get(key) {
            Some(Value::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn get_time(&self, key: &str) -> Option<DateTime<Utc>> {
        match self.fields.get(key) {
            Some(Value::Timestamp(t)) => Some(*t),
            _ => None,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    /// Fields in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }
}

impl<'a> IntoIterator for &'a LogRecord {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn add_str_concatenates() {
        let mut record = LogRecord::new();
        record.add_str("trace", "one");
        record.add_str("trace", "two");
        assert_eq!(record.get_str("trace"), Some("onetwo"));
    }

    #[test]
    fn add_str_replaces_non_string() {
        let mut record = LogRecord::new();
        record.set("trace", true);
        record.add_str("trace", "one");
        assert_eq!(record.get_str("trace"), Some("one"));
        assert_eq!(record.get_bool("trace"), None);
    }

    #[test]
    fn set_overwrites_strings() {
        let mut record = LogRecord::new();
        record.add_str("flag", "yes");
        record.set("flag", false);
        assert_eq!(record.get_bool("flag"), Some(false));
    }

    #[test]
    fn serializes_sorted_with_rfc3339_time() {
        let mut record = LogRecord::new();
        record.add_str("message", "hi");
        record.set("ok", true);
        record.set("timestamp", Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap());

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"message":"hi","ok":true,"timestamp":"2024-01-02T00:00:00Z"}"#
        );
    }

    #[test]
    fn clear_empties_record() {
        let mut record = LogRecord::new();
        record.add_str("a", "b");
        record.clear();
        assert!(record.is_empty());
    }
}
