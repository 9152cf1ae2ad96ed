//! Field name case conversion.

use crate::config::FieldCase;

impl FieldCase {
    /// Converts a field identifier (in any common casing) to this convention.
    pub fn convert(&self, name: &str) -> String {
        let words = split_words(name);
        match self {
            FieldCase::Snake => join_lower(&words, "_"),
            FieldCase::Kebab => join_lower(&words, "-"),
            FieldCase::Lower => join_lower(&words, ""),
            FieldCase::Upper => join_lower(&words, "").to_uppercase(),
            FieldCase::Pascal => words.iter().map(|w| capitalize(w)).collect(),
            FieldCase::Camel => words
                .iter()
                .enumerate()
                .map(|(i, w)| if i == 0 { w.to_lowercase() } else { capitalize(w) })
                .collect(),
        }
    }

    /// Maps a serde `rename_all` rule onto a convention, if there is an equivalent one.
    pub fn from_serde_rule(rule: &str) -> Option<Self> {
        match rule {
            "snake_case" => Some(FieldCase::Snake),
            "kebab-case" => Some(FieldCase::Kebab),
            "camelCase" => Some(FieldCase::Camel),
            "PascalCase" => Some(FieldCase::Pascal),
            "lowercase" => Some(FieldCase::Lower),
            "UPPERCASE" => Some(FieldCase::Upper),
            _ => None,
        }
    }
}

/// Splits an identifier into words on `_`, `-` and case transitions (`HTTPServer` -> `HTTP`, `Server`).
fn split_words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn join_lower(words: &[String], separator: &str) -> String {
    words
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(separator)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
