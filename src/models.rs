use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    pub date_found: String,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub url: String,
    pub status: Option<String>, // "New", "Interested", "Applied", "Archived"
    pub raw_description: Option<String>,
    pub match_score: Option<i64>,
    pub match_summary: Option<String>,
    pub matching_skills: Option<String>, // JSON string list
    pub missing_skills: Option<String>,  // JSON string list
    pub salary_range: Option<String>,
    pub company_info: Option<String>, // JSON string->string map
    pub tailored_suggestions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: i64,
    pub company: String,
    pub job_title: String,
    pub application_link: Option<String>,
    pub status: String,
    pub application_date: Option<chrono::NaiveDate>,
    pub notes: Option<String>,
}

/// Singleton row (id = 1). experience/education/projects/skills hold
/// serialized structured text maintained by the profile editor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub full_name: Option<String>,
    pub summary: Option<String>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub projects: Option<String>,
    pub skills: Option<String>,
}

pub const JOB_STATUSES: [&str; 4] = ["New", "Interested", "Applied", "Archived"];

pub const APPLICATION_STATUSES: [&str; 8] = [
    "Interested",
    "Applied",
    "Resume Shortlisted",
    "OA Qualified",
    "Interviewing",
    "HR Interview",
    "Offer",
    "Rejected",
];

pub fn is_valid_job_status(s: &str) -> bool {
    JOB_STATUSES.contains(&s)
}

pub fn is_valid_application_status(s: &str) -> bool {
    APPLICATION_STATUSES.contains(&s)
}

/// Result of reading a serialized text field back out of the store.
/// Malformed content falls back to the raw string rather than erroring.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredJson<T> {
    Parsed(T),
    Raw(String),
    Empty,
}

impl<T> StoredJson<T> {
    #[allow(dead_code)]
    pub fn parsed(self) -> Option<T> {
        match self {
            StoredJson::Parsed(v) => Some(v),
            _ => None,
        }
    }
}

pub fn parse_string_list(stored: Option<&str>) -> StoredJson<Vec<String>> {
    parse_stored(stored)
}

pub fn parse_string_map(stored: Option<&str>) -> StoredJson<BTreeMap<String, String>> {
    parse_stored(stored)
}

fn parse_stored<T: serde::de::DeserializeOwned>(stored: Option<&str>) -> StoredJson<T> {
    match stored {
        None => StoredJson::Empty,
        Some(s) if s.trim().is_empty() => StoredJson::Empty,
        Some(s) => match serde_json::from_str(s) {
            Ok(v) => StoredJson::Parsed(v),
            Err(_) => StoredJson::Raw(s.to_string()),
        },
    }
}

pub fn stringify_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

pub fn stringify_map(map: &BTreeMap<String, String>) -> String {
    serde_json::to_string(map).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_string_list_roundtrip() {
        let stored = stringify_list(&["Rust".to_string(), "SQL".to_string()]);
        let parsed = parse_string_list(Some(&stored));
        assert_eq!(
            parsed,
            StoredJson::Parsed(vec!["Rust".to_string(), "SQL".to_string()])
        );
    }

    #[test]
    fn test_parse_string_list_malformed_falls_back_to_raw() {
        let parsed = parse_string_list(Some("Rust, SQL, Postgres"));
        assert_eq!(parsed, StoredJson::Raw("Rust, SQL, Postgres".to_string()));
    }

    #[test]
    fn test_parse_string_list_empty() {
        assert_eq!(parse_string_list(None), StoredJson::Empty);
        assert_eq!(parse_string_list(Some("  ")), StoredJson::Empty);
    }

    #[test]
    fn test_parse_string_map() {
        let parsed = parse_string_map(Some(r#"{"industry":"Fintech","size":"200-500"}"#));
        let map = parsed.parsed().unwrap();
        assert_eq!(map.get("industry").map(String::as_str), Some("Fintech"));
        assert_eq!(map.get("size").map(String::as_str), Some("200-500"));
    }

    #[test]
    fn test_status_vocabularies() {
        assert!(is_valid_job_status("Applied"));
        assert!(!is_valid_job_status("applied"));
        assert!(is_valid_application_status("Resume Shortlisted"));
        assert!(!is_valid_application_status("Shortlisted"));
    }
}
