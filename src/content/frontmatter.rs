//! Front-matter splitting and schema validation

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::error::{ContentError, Result};

/// Pseudo-field used when the block itself is malformed
pub const FRONTMATTER_FIELD: &str = "frontmatter";

const KNOWN_KEYS: &[&str] = &[
    "title",
    "description",
    "publishDate",
    "updatedDate",
    "tags",
    "draft",
    "ogImage",
    "coverImage",
    "slug",
];

/// Validated front-matter of a post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontMatter {
    pub title: String,
    pub description: String,
    pub publish_date: NaiveDate,
    pub updated_date: Option<NaiveDate>,
    /// Display order is the order written in the document
    pub tags: Vec<String>,
    pub draft: bool,
    pub og_image: Option<String>,
    pub cover_image: Option<String>,

    /// Keys outside the schema, passed through untouched
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl FrontMatter {
    /// Create front-matter with the required fields and defaults elsewhere
    pub fn new(title: &str, description: &str, publish_date: NaiveDate) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            publish_date,
            updated_date: None,
            tags: Vec::new(),
            draft: false,
            og_image: None,
            cover_image: None,
            extra: IndexMap::new(),
        }
    }

    /// Validate a parsed YAML mapping against the post schema.
    ///
    /// `slug` is only used to label errors.
    pub fn from_mapping(map: &Mapping, slug: &str) -> Result<Self> {
        let title = required_str(map, "title", slug)?;
        let description = required_str(map, "description", slug)?;

        let publish_date = match get(map, "publishDate") {
            Some(value) => parse_date_value(value, "publishDate", slug)?,
            None => {
                return Err(ContentError::schema(
                    slug,
                    "publishDate",
                    "missing required field",
                ))
            }
        };

        let updated_date = match get(map, "updatedDate") {
            Some(value) => {
                let updated = parse_date_value(value, "updatedDate", slug)?;
                if updated < publish_date {
                    return Err(ContentError::InvalidDate {
                        slug: slug.to_string(),
                        field: "updatedDate".to_string(),
                        value: updated.to_string(),
                        reason: format!("precedes publishDate {}", publish_date),
                    });
                }
                Some(updated)
            }
            None => None,
        };

        let draft = match get(map, "draft") {
            None => false,
            Some(Value::Bool(b)) => *b,
            Some(other) => {
                return Err(ContentError::schema(
                    slug,
                    "draft",
                    format!("expected a boolean, got {}", describe(other)),
                ))
            }
        };

        let extra = map
            .iter()
            .filter_map(|(k, v)| {
                let key = k.as_str()?;
                (!KNOWN_KEYS.contains(&key)).then(|| (key.to_string(), v.clone()))
            })
            .collect();

        Ok(Self {
            title,
            description,
            publish_date,
            updated_date,
            tags: parse_tags(map, slug)?,
            draft,
            og_image: optional_str(map, "ogImage", slug)?,
            cover_image: optional_str(map, "coverImage", slug)?,
            extra,
        })
    }
}

/// Split a document into its YAML block and body.
///
/// The document must open with a `---` line and the block ends at the next
/// line consisting of `---`. The body is returned without the newline that
/// follows the closing delimiter.
pub fn split(content: &str) -> std::result::Result<(&str, &str), String> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let content = content.trim_start_matches(['\n', '\r']);

    let rest = content
        .strip_prefix("---")
        .ok_or_else(|| "document must start with a `---` delimiter".to_string())?;
    let rest = match rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n')) {
        Some(rest) => rest,
        None if rest.trim().is_empty() => return Err("no closing `---` delimiter".to_string()),
        None => return Err("opening `---` must be on its own line".to_string()),
    };

    // Closing delimiter may sit on the very first line for an empty block
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\n', '\r']) == "---" {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Ok((yaml, body));
        }
        offset += line.len();
    }

    Err("no closing `---` delimiter".to_string())
}

/// Parse the YAML block into a mapping, rejecting any other root shape
pub fn parse_mapping(yaml: &str, slug: &str) -> Result<Mapping> {
    if yaml.trim().is_empty() {
        return Ok(Mapping::new());
    }
    match serde_yaml::from_str::<Value>(yaml) {
        Ok(Value::Mapping(map)) => Ok(map),
        Ok(Value::Null) => Ok(Mapping::new()),
        Ok(other) => Err(ContentError::schema(
            slug,
            FRONTMATTER_FIELD,
            format!("expected a mapping, got {}", describe(&other)),
        )),
        Err(e) => Err(ContentError::schema(slug, FRONTMATTER_FIELD, e.to_string())),
    }
}

/// A `slug` key in the front-matter, when present and non-empty
pub fn slug_override(map: &Mapping) -> Option<String> {
    get(map, "slug")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn get<'a>(map: &'a Mapping, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|v| !v.is_null())
}

fn required_str(map: &Mapping, field: &str, slug: &str) -> Result<String> {
    match get(map, field) {
        None => Err(ContentError::schema(slug, field, "missing required field")),
        Some(Value::String(s)) if s.trim().is_empty() => {
            Err(ContentError::schema(slug, field, "must not be empty"))
        }
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(ContentError::schema(
            slug,
            field,
            format!("expected a string, got {}", describe(other)),
        )),
    }
}

fn optional_str(map: &Mapping, field: &str, slug: &str) -> Result<Option<String>> {
    match get(map, field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(ContentError::schema(
            slug,
            field,
            format!("expected a string, got {}", describe(other)),
        )),
    }
}

/// Tags accept a single string or a list of strings
fn parse_tags(map: &Mapping, slug: &str) -> Result<Vec<String>> {
    let items: Vec<&Value> = match get(map, "tags") {
        None => return Ok(Vec::new()),
        Some(Value::Sequence(seq)) => seq.iter().collect(),
        Some(single @ Value::String(_)) => vec![single],
        Some(other) => {
            return Err(ContentError::schema(
                slug,
                "tags",
                format!("expected a list of strings, got {}", describe(other)),
            ))
        }
    };

    let mut tags: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let tag = match item {
            Value::String(s) if s.trim().is_empty() => {
                return Err(ContentError::schema(slug, "tags", "tags must not be empty"))
            }
            Value::String(s) => s,
            other => {
                return Err(ContentError::schema(
                    slug,
                    "tags",
                    format!("expected a string tag, got {}", describe(other)),
                ))
            }
        };
        if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }
    Ok(tags)
}

fn parse_date_value(value: &Value, field: &str, slug: &str) -> Result<NaiveDate> {
    let invalid = |value: String, reason: &str| ContentError::InvalidDate {
        slug: slug.to_string(),
        field: field.to_string(),
        value,
        reason: reason.to_string(),
    };

    match value {
        Value::String(s) => {
            parse_date_string(s).ok_or_else(|| invalid(s.clone(), "not a calendar date"))
        }
        Value::Number(n) => Err(invalid(n.to_string(), "expected a date string")),
        other => Err(invalid(describe(other).to_string(), "expected a date string")),
    }
}

/// Parse a date string in the formats front-matter commonly uses
pub fn parse_date_string(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    // RFC 3339 keeps the date as written, not shifted to UTC
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    None
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(yaml: &str) -> Mapping {
        parse_mapping(yaml, "test").unwrap()
    }

    #[test]
    fn test_split_frontmatter() {
        let content = "---\ntitle: Hello\n---\nBody text.\n";
        let (yaml, body) = split(content).unwrap();
        assert_eq!(yaml, "title: Hello\n");
        assert_eq!(body, "Body text.\n");
    }

    #[test]
    fn test_split_keeps_horizontal_rules_in_body() {
        let content = "---\ntitle: Hello\n---\nIntro\n\n---\n\nMore\n";
        let (yaml, body) = split(content).unwrap();
        assert_eq!(yaml, "title: Hello\n");
        assert_eq!(body, "Intro\n\n---\n\nMore\n");
    }

    #[test]
    fn test_split_crlf() {
        let content = "---\r\ntitle: Hello\r\n---\r\nBody\r\n";
        let (yaml, body) = split(content).unwrap();
        assert_eq!(yaml, "title: Hello\r\n");
        assert_eq!(body, "Body\r\n");
    }

    #[test]
    fn test_split_requires_delimiters() {
        assert!(split("# Just markdown\n").is_err());
        assert!(split("---\ntitle: Hello\nno end\n").is_err());
    }

    #[test]
    fn test_valid_frontmatter() {
        let map = mapping(
            r#"
title: Hello World
description: A first post
publishDate: 2024-03-28
updatedDate: "2024-04-01"
tags:
  - rust
  - DDD
  - rust
ogImage: /images/hello.png
series: intro
"#,
        );
        let fm = FrontMatter::from_mapping(&map, "hello-world").unwrap();
        assert_eq!(fm.title, "Hello World");
        assert_eq!(fm.publish_date, NaiveDate::from_ymd_opt(2024, 3, 28).unwrap());
        assert_eq!(fm.updated_date, NaiveDate::from_ymd_opt(2024, 4, 1));
        assert_eq!(fm.tags, vec!["rust", "DDD"]);
        assert!(!fm.draft);
        assert_eq!(fm.og_image.as_deref(), Some("/images/hello.png"));
        assert_eq!(fm.cover_image, None);
        assert_eq!(fm.extra.get("series").and_then(Value::as_str), Some("intro"));
    }

    #[test]
    fn test_single_string_tag() {
        let map = mapping("title: T\ndescription: D\npublishDate: 2024-01-15\ntags: Notes\n");
        let fm = FrontMatter::from_mapping(&map, "t").unwrap();
        assert_eq!(fm.tags, vec!["Notes"]);
    }

    #[test]
    fn test_missing_title() {
        let map = mapping("description: D\npublishDate: 2024-01-15\n");
        let err = FrontMatter::from_mapping(&map, "no-title").unwrap_err();
        assert!(matches!(
            err,
            ContentError::SchemaValidation { ref slug, ref field, .. }
                if slug == "no-title" && field == "title"
        ));
    }

    #[test]
    fn test_wrong_shapes() {
        let map = mapping("title: 42\ndescription: D\npublishDate: 2024-01-15\n");
        let err = FrontMatter::from_mapping(&map, "s").unwrap_err();
        assert!(matches!(err, ContentError::SchemaValidation { ref field, .. } if field == "title"));

        let map = mapping("title: T\ndescription: \"  \"\npublishDate: 2024-01-15\n");
        let err = FrontMatter::from_mapping(&map, "s").unwrap_err();
        assert!(
            matches!(err, ContentError::SchemaValidation { ref field, .. } if field == "description")
        );

        let map = mapping("title: T\ndescription: D\npublishDate: 2024-01-15\ndraft: maybe\n");
        let err = FrontMatter::from_mapping(&map, "s").unwrap_err();
        assert!(matches!(err, ContentError::SchemaValidation { ref field, .. } if field == "draft"));

        let map = mapping("title: T\ndescription: D\npublishDate: 2024-01-15\ntags: [a, \"\"]\n");
        let err = FrontMatter::from_mapping(&map, "s").unwrap_err();
        assert!(matches!(err, ContentError::SchemaValidation { ref field, .. } if field == "tags"));
    }

    #[test]
    fn test_invalid_publish_date() {
        let map = mapping("title: T\ndescription: D\npublishDate: 2024-02-30\n");
        let err = FrontMatter::from_mapping(&map, "bad-date").unwrap_err();
        assert!(matches!(
            err,
            ContentError::InvalidDate { ref field, ref value, .. }
                if field == "publishDate" && value == "2024-02-30"
        ));
    }

    #[test]
    fn test_updated_before_published() {
        let map = mapping(
            "title: T\ndescription: D\npublishDate: 2024-03-28\nupdatedDate: 2024-03-01\n",
        );
        let err = FrontMatter::from_mapping(&map, "s").unwrap_err();
        assert!(
            matches!(err, ContentError::InvalidDate { ref field, .. } if field == "updatedDate")
        );
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15);
        assert_eq!(parse_date_string("2024-01-15"), expected);
        assert_eq!(parse_date_string("2024/01/15"), expected);
        assert_eq!(parse_date_string("2024-01-15 10:30:00"), expected);
        assert_eq!(parse_date_string("2024-01-15T23:30:00+09:00"), expected);
        assert_eq!(parse_date_string("Jan 15"), None);
    }

    #[test]
    fn test_non_mapping_block() {
        let err = parse_mapping("- a\n- b\n", "list").unwrap_err();
        assert!(matches!(
            err,
            ContentError::SchemaValidation { ref field, .. } if field == FRONTMATTER_FIELD
        ));
    }

    #[test]
    fn test_slug_override() {
        assert_eq!(slug_override(&mapping("slug: custom/path\n")).as_deref(), Some("custom/path"));
        assert_eq!(slug_override(&mapping("slug: \"\"\n")), None);
        assert_eq!(slug_override(&mapping("title: T\n")), None);
    }
}
