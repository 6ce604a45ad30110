use std::collections::{BTreeMap, BTreeSet};
use std::fs;

use regex::Regex;
use serde_yaml::Value;

use simeq::config::SUPPORTED_LOCALES;

/// Flatten nested YAML maps into dotted keys.
fn flatten(prefix: &str, value: &Value, out: &mut BTreeMap<String, String>) {
    match value {
        Value::Mapping(map) => {
            for (key, child) in map {
                let key = key.as_str().expect("locale keys are strings");
                let path = if prefix.is_empty() {
                    key.to_string()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&path, child, out);
            }
        }
        Value::String(text) => {
            out.insert(prefix.to_string(), text.clone());
        }
        other => panic!("unexpected value at {prefix}: {other:?}"),
    }
}

fn load(locale: &str) -> BTreeMap<String, String> {
    let path = format!("{}/locales/{locale}.yml", env!("CARGO_MANIFEST_DIR"));
    let content = fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {path}: {e}"));
    let value: Value = serde_yaml::from_str(&content).unwrap_or_else(|e| panic!("parse {path}: {e}"));
    let mut out = BTreeMap::new();
    flatten("", &value, &mut out);
    out
}

fn placeholders(re: &Regex, text: &str) -> BTreeSet<String> {
    re.captures_iter(text).map(|c| c[1].to_string()).collect()
}

#[test]
fn every_locale_has_the_same_keys() {
    let reference = load("en");
    for locale in SUPPORTED_LOCALES {
        let strings = load(locale);
        let expected: BTreeSet<_> = reference.keys().collect();
        let actual: BTreeSet<_> = strings.keys().collect();
        assert_eq!(expected, actual, "key mismatch in {locale}");
    }
}

#[test]
fn placeholders_match_across_locales() {
    let re = Regex::new(r"%\{(\w+)\}").unwrap();
    let reference = load("en");
    for locale in SUPPORTED_LOCALES {
        let strings = load(locale);
        for (key, text) in &reference {
            let Some(translated) = strings.get(key) else {
                continue;
            };
            assert_eq!(
                placeholders(&re, text),
                placeholders(&re, translated),
                "placeholder mismatch for {key} in {locale}"
            );
        }
    }
}

#[test]
fn no_empty_strings() {
    for locale in SUPPORTED_LOCALES {
        for (key, text) in load(locale) {
            assert!(!text.trim().is_empty(), "{locale}: {key} is empty");
        }
    }
}
