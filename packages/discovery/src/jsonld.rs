//! JSON-LD block parsing.
//!
//! Pages often carry several `application/ld+json` scripts, and the
//! extractor sees their text concatenated into one string, so the raw
//! input can look like `{...}{...}` with no separator. This module is a
//! small standalone scanner over that text: it yields each balanced
//! top-level JSON object substring (string- and escape-aware, so braces
//! inside string literals don't confuse it), then selects the object
//! typed `"JobPosting"`.
//!
//! Pure and synchronous; unit-tested independently of any HTTP fetching.

use serde_json::Value;

use crate::types::JobSchema;

/// The `@type` value a schema must carry to be accepted.
const JOB_POSTING_TYPE: &str = "JobPosting";

/// Scan raw text for balanced top-level JSON object substrings.
///
/// Anything between objects (whitespace, array brackets, commas) is
/// ignored; a trailing unbalanced object is dropped.
pub fn scan_objects(raw: &str) -> Vec<&str> {
    let mut objects = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in raw.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = i;
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    objects.push(&raw[start..i + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    objects
}

/// Extract the JobPosting schema from raw JSON-LD text, if any.
///
/// Every scanned object must parse; malformed JSON anywhere yields
/// `None` rather than an error, since a bad page is a per-item failure
/// that must never abort the batch. When multiple objects parse, the
/// one whose `@type` equals `"JobPosting"` wins; with no match (or a
/// single object of another type) the result is `None`.
pub fn extract_job_posting(raw: &str) -> Option<JobSchema> {
    let candidates = scan_objects(raw);
    if candidates.is_empty() {
        return None;
    }

    let mut parsed = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        match serde_json::from_str::<Value>(candidate) {
            Ok(value) => parsed.push(value),
            Err(_) => return None,
        }
    }

    let posting = parsed
        .into_iter()
        .find(|v| v.get("@type").and_then(Value::as_str) == Some(JOB_POSTING_TYPE))?;

    serde_json::from_value(posting).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_single_object() {
        let raw = r#"{"@type": "JobPosting", "title": "Engineer"}"#;
        let objects = scan_objects(raw);
        assert_eq!(objects, vec![raw]);
    }

    #[test]
    fn test_scan_concatenated_objects() {
        let raw = r#"{"@type": "Organization"}{"@type": "JobPosting"}"#;
        let objects = scan_objects(raw);
        assert_eq!(
            objects,
            vec![r#"{"@type": "Organization"}"#, r#"{"@type": "JobPosting"}"#]
        );
    }

    #[test]
    fn test_scan_nested_and_string_braces() {
        let raw = r#"{"a": {"b": "}{ not a boundary"}, "c": "\"{"}{"d": 1}"#;
        let objects = scan_objects(raw);
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[1], r#"{"d": 1}"#);
        // The first object still parses despite the decoy braces.
        serde_json::from_str::<Value>(objects[0]).unwrap();
    }

    #[test]
    fn test_scan_ignores_array_wrapper() {
        let raw = r#"[{"a": 1}, {"b": 2}]"#;
        let objects = scan_objects(raw);
        assert_eq!(objects, vec![r#"{"a": 1}"#, r#"{"b": 2}"#]);
    }

    #[test]
    fn test_scan_drops_unbalanced_tail() {
        let raw = r#"{"a": 1}{"b": "#;
        let objects = scan_objects(raw);
        assert_eq!(objects, vec![r#"{"a": 1}"#]);
    }

    #[test]
    fn test_scan_ignores_stray_closing_brace() {
        assert!(scan_objects("}").is_empty());

        // A leading close brace must not swallow the next object's
        // opening position.
        let raw = r#"x}{"@type": "JobPosting"}"#;
        assert_eq!(scan_objects(raw), vec![r#"{"@type": "JobPosting"}"#]);
    }

    #[test]
    fn test_extract_selects_job_posting_among_many() {
        let raw = concat!(
            r#"{"@type": "Organization", "name": "Acme"}"#,
            r#"{"@type": "JobPosting", "title": "Backend Engineer", "datePosted": "2024-01-15", "industry": "IT"}"#,
            r#"{"@type": "BreadcrumbList"}"#,
        );

        let schema = extract_job_posting(raw).unwrap();
        assert_eq!(schema.title.as_deref(), Some("Backend Engineer"));
        assert_eq!(schema.date_posted.as_deref(), Some("2024-01-15"));
        // Fields the pipeline doesn't model survive bit-for-bit.
        assert_eq!(schema.extra["industry"], "IT");
    }

    #[test]
    fn test_extract_rejects_single_non_job_posting() {
        let raw = r#"{"@type": "Organization", "name": "Acme"}"#;
        assert!(extract_job_posting(raw).is_none());
    }

    #[test]
    fn test_extract_rejects_malformed_json() {
        assert!(extract_job_posting(r#"{"@type": "JobPosting", "title": }"#).is_none());
        // One bad block poisons the page, matching the per-item
        // catch-and-drop contract.
        assert!(extract_job_posting(r#"{"@type": "JobPosting"}{oops}"#).is_none());
    }

    #[test]
    fn test_extract_empty_input() {
        assert!(extract_job_posting("").is_none());
        assert!(extract_job_posting("   \n ").is_none());
    }
}
