//! The closed key universe.
//! Every recognized key lives in exactly one partition: preferences (persistable,
//! with defaults) or directives (one-shot intents, no default).

use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Which partition a key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    Preference,
    Directive,
}

/// Expected value kind for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Bool,
    Integer,
    Text,
    List,
    /// Text restricted to a fixed set of names, compared case-insensitively.
    OneOf(&'static [&'static str]),
}

pub const DUPLICATE_POLICIES: &[&str] = &["fail", "skip", "overwrite", "replace", "rename", "suffix"];
pub const LOG_LEVELS: &[&str] = &[
    "quiet", "error", "none", "normal", "info", "verbose", "detailed", "debug", "trace",
];
pub const MEDIA_KINDS: &[&str] = &["movie", "movies", "film", "television", "tv", "episode", "show"];

impl KeyKind {
    pub fn name(self) -> String {
        match self {
            KeyKind::Bool => "a boolean".into(),
            KeyKind::Integer => "a non-negative integer".into(),
            KeyKind::Text => "a string".into(),
            KeyKind::List => "a list of strings".into(),
            KeyKind::OneOf(names) => format!("one of {}", names.join(", ")),
        }
    }

    /// Whether `value` has this kind's JSON shape.
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            KeyKind::Bool => value.is_boolean(),
            KeyKind::Integer => value.is_u64(),
            KeyKind::Text => value.is_string(),
            KeyKind::List => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
            KeyKind::OneOf(names) => value.as_str().is_some_and(|s| {
                let s = s.trim().to_ascii_lowercase();
                names.contains(&s.as_str())
            }),
        }
    }

    /// Coerce a raw string (as read from the config file) to this kind.
    pub fn coerce(self, raw: &str) -> Result<Value, String> {
        let trimmed = raw.trim();
        match self {
            KeyKind::Bool => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Ok(Value::Bool(true)),
                "false" | "no" | "off" | "0" => Ok(Value::Bool(false)),
                other => Err(format!("expected a boolean, got '{other}'")),
            },
            KeyKind::Integer => trimmed
                .parse::<u64>()
                .map(Value::from)
                .map_err(|_| format!("expected a non-negative integer, got '{trimmed}'")),
            // Membership is checked with the other validation, not as a parse error.
            KeyKind::Text | KeyKind::OneOf(_) => Ok(Value::String(trimmed.to_string())),
            KeyKind::List => Ok(Value::Array(
                split_list(trimmed).into_iter().map(Value::String).collect(),
            )),
        }
    }
}

/// Split a comma separated list. `\,` is a literal comma and `\\` a literal
/// backslash; any other backslash is kept as written. Empty items are dropped.
pub fn split_list(raw: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if matches!(chars.peek(), Some(',' | '\\')) => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            ',' => items.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    items.push(current);
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Inverse of `split_list`.
pub fn join_list<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    items
        .into_iter()
        .map(|item| item.replace('\\', "\\\\").replace(',', "\\,"))
        .collect::<Vec<_>>()
        .join(", ")
}

pub const DEFAULT_MOVIE_TEMPLATE: &str = "{title} ({year}){extension}";
pub const DEFAULT_TELEVISION_TEMPLATE: &str =
    "{series} - S{season:02}E{episode:02} - {title}{extension}";

/// Preference keys and their kinds, sorted by name.
pub const PREFERENCE_KEYS: &[(&str, KeyKind)] = &[
    ("batch", KeyKind::Bool),
    ("blacklist", KeyKind::List),
    ("debug", KeyKind::Bool),
    ("extension_mask", KeyKind::List),
    ("hits", KeyKind::Integer),
    ("log_file", KeyKind::Text),
    ("log_json", KeyKind::Bool),
    ("log_level", KeyKind::OneOf(LOG_LEVELS)),
    ("lowercase", KeyKind::Bool),
    ("movie_directory", KeyKind::Text),
    ("movie_template", KeyKind::Text),
    ("nocolor", KeyKind::Bool),
    ("on_duplicate", KeyKind::OneOf(DUPLICATE_POLICIES)),
    ("recurse", KeyKind::Bool),
    ("report_missing", KeyKind::Bool),
    ("scene", KeyKind::Bool),
    ("television_directory", KeyKind::Text),
    ("television_template", KeyKind::Text),
    ("test", KeyKind::Bool),
    ("verbose", KeyKind::Bool),
];

/// Directive keys and their kinds.
pub const DIRECTIVE_KEYS: &[(&str, KeyKind)] = &[
    ("config", KeyKind::Bool),
    ("media", KeyKind::OneOf(MEDIA_KINDS)),
    ("version", KeyKind::Bool),
    ("write_config", KeyKind::Bool),
];

/// Look up the partition and kind of a key; None if unrecognized.
pub fn classify(key: &str) -> Option<(Partition, KeyKind)> {
    PREFERENCE_KEYS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, kind)| (Partition::Preference, *kind))
        .or_else(|| {
            DIRECTIVE_KEYS
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, kind)| (Partition::Directive, *kind))
        })
}

#[inline]
pub fn is_preference(key: &str) -> bool {
    matches!(classify(key), Some((Partition::Preference, _)))
}

#[inline]
pub fn is_directive(key: &str) -> bool {
    matches!(classify(key), Some((Partition::Directive, _)))
}

/// Built-in preference defaults (layer 1).
pub fn preference_defaults() -> BTreeMap<String, Value> {
    let defaults = [
        ("batch", json!(false)),
        ("blacklist", json!([".*sample.*", "^RARBG.*"])),
        ("debug", json!(false)),
        (
            "extension_mask",
            json!(["avi", "m4v", "mkv", "mp4", "ts", "wmv"]),
        ),
        ("hits", json!(5)),
        ("log_file", json!("")),
        ("log_json", json!(false)),
        ("log_level", json!("normal")),
        ("lowercase", json!(false)),
        ("movie_directory", json!("")),
        ("movie_template", json!(DEFAULT_MOVIE_TEMPLATE)),
        ("nocolor", json!(false)),
        ("on_duplicate", json!("fail")),
        ("recurse", json!(false)),
        ("report_missing", json!(true)),
        ("scene", json!(false)),
        ("television_directory", json!("")),
        ("television_template", json!(DEFAULT_TELEVISION_TEMPLATE)),
        ("test", json!(false)),
        ("verbose", json!(false)),
    ];
    defaults
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partitions_are_disjoint() {
        for (key, _) in PREFERENCE_KEYS {
            assert!(!is_directive(key), "{key} is in both partitions");
        }
    }

    #[test]
    fn every_preference_has_a_default_of_the_right_kind() {
        let defaults = preference_defaults();
        assert_eq!(defaults.len(), PREFERENCE_KEYS.len());
        for (key, kind) in PREFERENCE_KEYS {
            let value = defaults.get(*key).expect("default present");
            assert!(kind.accepts(value), "default for {key} is not {}", kind.name());
        }
    }

    #[test]
    fn enumerated_kinds_ignore_case() {
        let kind = KeyKind::OneOf(DUPLICATE_POLICIES);
        assert!(kind.accepts(&json!("Rename")));
        assert!(!kind.accepts(&json!("clobber")));
        assert!(!kind.accepts(&json!(1)));
        assert!(kind.name().contains("overwrite"));
    }

    #[test]
    fn lists_with_commas_survive_a_write() {
        let items = [r"\d{1,3}", r"trailing\", "plain"];
        assert_eq!(split_list(&join_list(items)), items);
    }

    #[test]
    fn coerce_file_values() {
        assert_eq!(KeyKind::Bool.coerce(" Yes ").unwrap(), json!(true));
        assert_eq!(KeyKind::Integer.coerce("12").unwrap(), json!(12));
        assert_eq!(
            KeyKind::List.coerce("mkv, mp4,,").unwrap(),
            json!(["mkv", "mp4"])
        );
        assert_eq!(
            KeyKind::List.coerce(r"\d{1\,3}, ^x\\,y").unwrap(),
            json!([r"\d{1,3}", r"^x\", "y"])
        );
        assert!(KeyKind::Bool.coerce("maybe").is_err());
        assert!(KeyKind::Integer.coerce("-1").is_err());
    }
}
