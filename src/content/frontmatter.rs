//! Front-matter parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;

/// Custom deserializer that accepts any YAML scalar and keeps it as a string
///
/// Unquoted dates and numeric ids come through YAML as plain scalars; they
/// are kept verbatim so later stages decide how to interpret them.
fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct ScalarString;

    impl<'de> Visitor<'de> for ScalarString {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string, number, or boolean")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(ScalarString)
}

/// Front-matter data from a post or video
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(deserialize_with = "scalar_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub date: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub slug: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub summary: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub lang: Option<String>,
    pub draft: Option<bool>,
    #[serde(deserialize_with = "scalar_string")]
    pub youtube: Option<String>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str)> {
        let trimmed = content.trim_start_matches('\u{feff}');

        if let Some(rest) = trimmed.strip_prefix("---") {
            // `----` or `--- text` is a thematic break, not a fence
            if rest.starts_with('\n') || rest.starts_with("\r\n") {
                return Self::parse_yaml(trimmed, rest);
            }
        }

        // No front-matter found
        Ok((FrontMatter::default(), trimmed))
    }

    fn parse_yaml<'a>(content: &'a str, rest: &'a str) -> Result<(Self, &'a str)> {
        let rest = rest.trim_start_matches(['\n', '\r']);

        // An empty block closes immediately
        if let Some(remaining) = rest.strip_prefix("---") {
            if ends_fence(remaining) {
                return Ok((FrontMatter::default(), trim_body(remaining)));
            }
        }

        let Some(end_pos) = rest
            .match_indices("\n---")
            .map(|(pos, _)| pos)
            .find(|&pos| ends_fence(&rest[pos + 4..]))
        else {
            // No closing ---, treat as no front-matter
            return Ok((FrontMatter::default(), content));
        };

        let yaml_content = &rest[..end_pos];
        let remaining = &rest[end_pos + 4..];

        if yaml_content.trim().is_empty() {
            return Ok((FrontMatter::default(), trim_body(remaining)));
        }

        let fm = serde_yaml::from_str::<FrontMatter>(yaml_content)?;
        Ok((fm, trim_body(remaining)))
    }

    /// Parse the date string into a UTC instant
    pub fn parse_date(&self) -> Option<DateTime<Utc>> {
        self.date.as_deref().and_then(parse_date_string)
    }
}

/// Whether the text after `---` finishes the fence line
fn ends_fence(after: &str) -> bool {
    after.is_empty() || after.starts_with('\n') || after.starts_with("\r\n")
}

/// Drop the remainder of the closing fence line and following blank lines
fn trim_body(remaining: &str) -> &str {
    let remaining = match remaining.find('\n') {
        Some(pos) if remaining[..pos].trim().is_empty() => &remaining[pos + 1..],
        None if remaining.trim().is_empty() => "",
        _ => remaining,
    };
    remaining.trim_start_matches(['\n', '\r'])
}

/// Parse a date string in various formats
///
/// Strings carrying an offset are converted to UTC; naive ones are taken
/// to already be UTC.
pub fn parse_date_string(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    // Try RFC 3339 / ISO 8601 first so offsets are honoured
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ];

    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
date: 2024-01-15
slug: hello-world
summary: A *short* intro
lang: de
draft: true
---

This is the content.
"#;

        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Hello World"));
        assert_eq!(fm.date.as_deref(), Some("2024-01-15"));
        assert_eq!(fm.slug.as_deref(), Some("hello-world"));
        assert_eq!(fm.summary.as_deref(), Some("A *short* intro"));
        assert_eq!(fm.lang.as_deref(), Some("de"));
        assert_eq!(fm.draft, Some(true));
        assert_eq!(remaining, "This is the content.\n");
    }

    #[test]
    fn test_numeric_scalars_kept_as_strings() {
        let content = "---\ntitle: 1984\nyoutube: 12345\n---\nbody";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("1984"));
        assert_eq!(fm.youtube.as_deref(), Some("12345"));
        assert_eq!(remaining, "body");
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let content = "---\ntitle: Hi\ntags:\n  - a\n---\n";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Hi"));
        assert_eq!(remaining, "");
    }

    #[test]
    fn test_closing_fence_must_be_whole_line() {
        let content = "---\ntitle: A\n----\nbody";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(remaining, content);

        let content = "---\ntitle: A\nnote: |\n  ---text\n---\nbody";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("A"));
        assert_eq!(remaining, "body");

        let content = "---\ntitle: A\n---";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("A"));
        assert_eq!(remaining, "");
    }

    #[test]
    fn test_summary_and_lang_accept_any_scalar() {
        let content = "---\nsummary: true\nlang: 42\n---\n";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.summary.as_deref(), Some("true"));
        assert_eq!(fm.lang.as_deref(), Some("42"));
    }

    #[test]
    fn test_no_frontmatter() {
        let content = "# Just a heading\n\nText.";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(remaining, content);
    }

    #[test]
    fn test_unclosed_frontmatter_is_content() {
        let content = "---\ntitle: Hi\nno closing fence";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, None);
        assert_eq!(remaining, content);
    }

    #[test]
    fn test_empty_frontmatter() {
        let (fm, remaining) = FrontMatter::parse("---\n---\nBody").unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(remaining, "Body");
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        let content = "---\ntitle: [unclosed\n---\nBody";
        assert!(FrontMatter::parse(content).is_err());
    }

    #[test]
    fn test_crlf_frontmatter() {
        let content = "---\r\ntitle: Hi\r\n---\r\nBody";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Hi"));
        assert_eq!(remaining, "Body");
    }

    #[test]
    fn test_parse_date_formats() {
        let cases = [
            ("2024-03-01", "2024-03-01T00:00:00+00:00"),
            ("2024/03/01", "2024-03-01T00:00:00+00:00"),
            ("2024-03-01 10:30:00", "2024-03-01T10:30:00+00:00"),
            ("2024-03-01T10:30:00", "2024-03-01T10:30:00+00:00"),
            ("2024-03-01T10:30:00Z", "2024-03-01T10:30:00+00:00"),
            ("2024-03-01T10:30:00+02:00", "2024-03-01T08:30:00+00:00"),
        ];
        for (input, expected) in cases {
            let dt = parse_date_string(input).unwrap();
            assert_eq!(dt.to_rfc3339(), expected, "input {input}");
        }
    }

    #[test]
    fn test_parse_invalid_date() {
        assert_eq!(parse_date_string("not a date"), None);
        assert_eq!(parse_date_string("2024-13-45"), None);
        assert_eq!(parse_date_string(""), None);
    }
}
