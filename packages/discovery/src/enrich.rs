//! Enrichment: keyword tags, remote inference, and slug generation.

use rand::Rng;

use crate::types::{JobSchema, SearchItem};

/// Location vocabulary: every Malaysian state and federal territory,
/// plus `"remote"`. Lowercase, spaced forms.
pub const LOCATIONS: &[&str] = &[
    "johor",
    "kedah",
    "kelantan",
    "kuala lumpur",
    "labuan",
    "melaka",
    "negeri sembilan",
    "pahang",
    "penang",
    "perak",
    "perlis",
    "putrajaya",
    "sabah",
    "sarawak",
    "selangor",
    "terengganu",
    "remote",
];

/// Alphabet for slug suffixes: 31 characters, with the glyphs that
/// read ambiguously in URLs (`0/1/i/l/o`) removed. At 4 characters
/// that is ~900k combinations, plenty for tens of postings per run.
const SUFFIX_ALPHABET: &[u8] = b"23456789abcdefghjkmnpqrstuvwxyz";

/// Length of the random slug suffix.
const SUFFIX_LEN: usize = 4;

/// Scan an HTML snippet for location keywords.
///
/// Case-insensitive; hyphenated forms ("kuala-lumpur") are normalized
/// to spaced forms before matching. Returns the matched subset in
/// vocabulary order.
pub fn keywords_from_snippet(snippet: &str) -> Vec<String> {
    let haystack = snippet.to_lowercase().replace('-', " ");

    LOCATIONS
        .iter()
        .filter(|loc| haystack.contains(*loc))
        .map(|loc| loc.to_string())
        .collect()
}

/// Whether the schema text marks the posting as remote work.
///
/// Case-insensitive on both the description and responsibilities.
pub fn is_remote(schema: &JobSchema) -> bool {
    let mentions_remote = |text: &Option<String>| {
        text.as_deref()
            .is_some_and(|t| t.to_lowercase().contains("remote"))
    };

    mentions_remote(&schema.description) || mentions_remote(&schema.responsibilities)
}

/// Derive the full keyword set for a discovered posting.
///
/// Snippet locations first; the remote flag appends `"remote"` when
/// the snippet alone didn't already match it.
pub fn keywords_for(item: &SearchItem, schema: &JobSchema) -> Vec<String> {
    let mut keywords = keywords_from_snippet(&item.html_snippet);

    if is_remote(schema) && !keywords.iter().any(|k| k == "remote") {
        keywords.push("remote".to_string());
    }

    keywords
}

/// Lowercase a string to alphanumerics and spaces, hyphen-joined.
fn to_slug(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

fn random_suffix() -> String {
    let mut rng = rand::thread_rng();
    (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect()
}

/// Build a unique, URL-safe slug for a posting.
///
/// Prefers the schema title over the raw search title, appends the
/// hiring organization when present, and always ends with a random
/// suffix. The suffix is the sole uniqueness guarantee: identical
/// titles and companies differ only in that tail, and no collision
/// check is made against existing slugs.
pub fn slugify(raw_title: &str, schema: Option<&JobSchema>) -> String {
    let title = schema
        .and_then(|s| s.title.as_deref())
        .unwrap_or(raw_title);

    let mut slug = to_slug(title);

    if let Some(company) = schema.and_then(|s| s.company()) {
        let company_slug = to_slug(company);
        if !company_slug.is_empty() {
            slug.push('-');
            slug.push_str(&company_slug);
        }
    }

    format!("{slug}-{}", random_suffix())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(title: Option<&str>, company: Option<&str>, description: Option<&str>) -> JobSchema {
        JobSchema {
            schema_type: Some("JobPosting".to_string()),
            title: title.map(String::from),
            hiring_organization: company.map(|name| crate::types::HiringOrganization {
                name: Some(name.to_string()),
                extra: serde_json::Map::new(),
            }),
            description: description.map(String::from),
            responsibilities: None,
            date_posted: None,
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn test_keywords_selangor_remote_snippet() {
        let keywords =
            keywords_from_snippet("Looking for a Developer in Selangor, remote work possible");
        assert!(keywords.contains(&"selangor".to_string()));
        assert!(keywords.contains(&"remote".to_string()));
    }

    #[test]
    fn test_keywords_normalize_hyphenated_forms() {
        let keywords = keywords_from_snippet("Hiring in Kuala-Lumpur and negeri-sembilan");
        assert!(keywords.contains(&"kuala lumpur".to_string()));
        assert!(keywords.contains(&"negeri sembilan".to_string()));
    }

    #[test]
    fn test_keywords_no_match() {
        assert!(keywords_from_snippet("Senior Rust Engineer, on-site").is_empty());
    }

    #[test]
    fn test_remote_inference_is_case_insensitive() {
        assert!(is_remote(&schema(None, None, Some("Fully REMOTE role"))));
        assert!(is_remote(&schema(None, None, Some("remote-first team"))));
        assert!(!is_remote(&schema(None, None, Some("On-site in Penang"))));

        let mut with_resp = schema(None, None, None);
        with_resp.responsibilities = Some("Coordinate Remote contractors".to_string());
        assert!(is_remote(&with_resp));
    }

    #[test]
    fn test_remote_flag_appends_once() {
        let item = crate::types::SearchItem::new(
            "https://a.example/j/1",
            "Engineer",
            "Developer in Selangor, remote ok",
        );
        let keywords = keywords_for(&item, &schema(None, None, Some("Remote work")));
        assert_eq!(
            keywords.iter().filter(|k| k.as_str() == "remote").count(),
            1
        );
    }

    #[test]
    fn test_slug_prefix_is_deterministic() {
        let s = schema(Some("Senior Backend Engineer"), Some("Acme Sdn. Bhd."), None);

        let a = slugify("ignored raw title", Some(&s));
        let b = slugify("ignored raw title", Some(&s));

        let prefix = "senior-backend-engineer-acme-sdn-bhd-";
        assert!(a.starts_with(prefix), "{a}");
        assert!(b.starts_with(prefix), "{b}");

        let (sa, sb) = (&a[prefix.len()..], &b[prefix.len()..]);
        assert_eq!(sa.len(), 4);
        assert_eq!(sb.len(), 4);
        assert!(sa
            .bytes()
            .all(|c| SUFFIX_ALPHABET.contains(&c)));
    }

    #[test]
    fn test_slug_falls_back_to_raw_title() {
        let slug = slugify("QA Engineer @ Penang!", None);
        assert!(slug.starts_with("qa-engineer-penang-"), "{slug}");
    }

    #[test]
    fn test_suffix_alphabet_is_wide_enough() {
        assert!(SUFFIX_ALPHABET.len() >= 30);
    }
}
