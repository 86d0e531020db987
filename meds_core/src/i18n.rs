//! Localized field resolution.
//!
//! Record fields are authored either as a single legacy string or as a
//! map from locale code to text. Resolution picks one locale's text:
//!
//! 1. `zh-TW` without its own entry reads the `zh` entry before English
//! 2. the requested locale
//! 3. the default locale (`en`)
//! 4. any other populated entry, scanned en, zh, zh-TW, ja, then sorted
//! 5. empty
//!
//! Empty strings and empty lists count as missing. Resolution never
//! mutates or caches anything.

use crate::Locale;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A string field that may be plain or keyed by locale
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum LocalizedText {
    Plain(String),
    Localized(BTreeMap<String, Option<String>>),
}

/// A list field that may be plain or keyed by locale
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum LocalizedList {
    Plain(Vec<String>),
    Localized(BTreeMap<String, Option<Vec<String>>>),
}

impl LocalizedText {
    /// Build a locale map from `(locale, text)` pairs
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (Locale, &'a str)>) -> Self {
        LocalizedText::Localized(
            pairs
                .into_iter()
                .map(|(locale, text)| (locale.code().to_string(), Some(text.to_string())))
                .collect(),
        )
    }

    /// Resolve to a single locale's text
    pub fn resolve(&self, locale: Locale) -> &str {
        match self {
            LocalizedText::Plain(text) => text,
            LocalizedText::Localized(map) => {
                resolve_map(map, locale, |v| v.as_deref().filter(|s| !s.is_empty()))
                    .unwrap_or("")
            }
        }
    }

    /// Whether any locale carries text
    pub fn is_empty(&self) -> bool {
        self.resolve(Locale::DEFAULT).is_empty()
    }
}

impl From<&str> for LocalizedText {
    fn from(text: &str) -> Self {
        LocalizedText::Plain(text.to_string())
    }
}

impl LocalizedList {
    /// Build a locale map from `(locale, items)` pairs
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (Locale, &'a [&'a str])>) -> Self {
        LocalizedList::Localized(
            pairs
                .into_iter()
                .map(|(locale, items)| {
                    (
                        locale.code().to_string(),
                        Some(items.iter().map(|s| s.to_string()).collect()),
                    )
                })
                .collect(),
        )
    }

    /// Resolve to a single locale's ordered items
    pub fn resolve(&self, locale: Locale) -> &[String] {
        match self {
            LocalizedList::Plain(items) => items,
            LocalizedList::Localized(map) => {
                resolve_map(map, locale, |v| v.as_deref().filter(|s| !s.is_empty()))
                    .unwrap_or(&[])
            }
        }
    }
}

/// Resolve an optional text field, yielding `""` when absent
pub fn resolve_text(field: Option<&LocalizedText>, locale: Locale) -> &str {
    field.map(|f| f.resolve(locale)).unwrap_or("")
}

/// Resolve an optional list field, yielding an empty slice when absent
pub fn resolve_list(field: Option<&LocalizedList>, locale: Locale) -> &[String] {
    field.map(|f| f.resolve(locale)).unwrap_or(&[])
}

fn resolve_map<'a, V, T: ?Sized>(
    map: &'a BTreeMap<String, V>,
    locale: Locale,
    populated: impl Fn(&'a V) -> Option<&'a T>,
) -> Option<&'a T> {
    let lookup = |code: &str| map.get(code).and_then(&populated);

    if locale == Locale::ZhTw && lookup(Locale::ZhTw.code()).is_none() {
        if let Some(simplified) = lookup(Locale::Zh.code()) {
            return Some(simplified);
        }
    }

    lookup(locale.code())
        .or_else(|| lookup(Locale::DEFAULT.code()))
        .or_else(|| Locale::ALL.iter().find_map(|l| lookup(l.code())))
        .or_else(|| map.values().find_map(&populated))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn greeting() -> LocalizedText {
        LocalizedText::from_pairs([(Locale::En, "Hello"), (Locale::Zh, "你好")])
    }

    #[test]
    fn test_plain_text_is_returned_unchanged() {
        let field = LocalizedText::from("Legacy");
        for locale in Locale::ALL {
            assert_eq!(field.resolve(locale), "Legacy");
        }
    }

    #[test]
    fn test_traditional_falls_back_to_simplified() {
        let field = greeting();
        assert_eq!(field.resolve(Locale::ZhTw), "你好");
    }

    #[test]
    fn test_explicit_null_traditional_entry_falls_back_to_simplified() {
        let field: LocalizedText =
            serde_yaml::from_str("{en: Hello, zh-TW: ~, zh: 你好}").unwrap();
        assert_eq!(field.resolve(Locale::ZhTw), "你好");
    }

    #[test]
    fn test_traditional_entry_wins_when_present() {
        let field = LocalizedText::from_pairs([
            (Locale::En, "Hello"),
            (Locale::Zh, "你好"),
            (Locale::ZhTw, "妳好"),
        ]);
        assert_eq!(field.resolve(Locale::ZhTw), "妳好");
    }

    #[test]
    fn test_missing_locale_falls_back_to_english() {
        let field = greeting();
        assert_eq!(field.resolve(Locale::Ja), "Hello");
    }

    #[test]
    fn test_any_populated_value_is_used_last() {
        let field = LocalizedText::from_pairs([(Locale::Ja, "こんにちは")]);
        assert_eq!(field.resolve(Locale::En), "こんにちは");
        assert_eq!(field.resolve(Locale::Zh), "こんにちは");

        let odd: LocalizedText = serde_yaml::from_str("{ko: 안녕하세요}").unwrap();
        assert_eq!(odd.resolve(Locale::En), "안녕하세요");
    }

    #[test]
    fn test_empty_strings_count_as_missing() {
        let field = LocalizedText::from_pairs([(Locale::Ja, ""), (Locale::En, "Hello")]);
        assert_eq!(field.resolve(Locale::Ja), "Hello");
    }

    #[test]
    fn test_absent_field_resolves_empty() {
        assert_eq!(resolve_text(None, Locale::Ja), "");
        assert!(resolve_list(None, Locale::ZhTw).is_empty());

        let empty = LocalizedText::Localized(BTreeMap::new());
        assert_eq!(empty.resolve(Locale::En), "");
        assert!(empty.is_empty());
    }

    #[test]
    fn test_non_empty_whenever_any_locale_populated() {
        for only in Locale::ALL {
            let field = LocalizedText::from_pairs([(only, "x")]);
            for requested in Locale::ALL {
                assert!(!field.resolve(requested).is_empty());
            }
        }
    }

    #[test]
    fn test_resolution_is_stable_and_does_not_mutate() {
        let field = greeting();
        let before = field.clone();
        let first = field.resolve(Locale::ZhTw).to_string();
        let second = field.resolve(Locale::ZhTw).to_string();
        assert_eq!(first, second);
        assert_eq!(field, before);
    }

    #[test]
    fn test_list_follows_the_same_fallback() {
        let en: &[&str] = &["headache", "insomnia"];
        let zh: &[&str] = &["头痛", "失眠"];
        let field = LocalizedList::from_pairs([(Locale::En, en), (Locale::Zh, zh)]);

        assert_eq!(field.resolve(Locale::ZhTw), &["头痛", "失眠"]);
        assert_eq!(field.resolve(Locale::Ja), &["headache", "insomnia"]);

        let plain: LocalizedList = serde_yaml::from_str("[a, b]").unwrap();
        assert_eq!(plain.resolve(Locale::Zh), &["a", "b"]);
    }

    #[test]
    fn test_yaml_forms_deserialize() {
        let plain: LocalizedText = serde_yaml::from_str("Methylphenidate").unwrap();
        assert_eq!(plain, LocalizedText::Plain("Methylphenidate".into()));

        let map: LocalizedText = serde_yaml::from_str("en: Methylphenidate\nja: メチルフェニデート").unwrap();
        assert_eq!(map.resolve(Locale::Ja), "メチルフェニデート");
    }
}
