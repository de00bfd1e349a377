//! Candidate agent names
//!
//! The roster is built once per session from the fallback name plus whatever
//! the injected [`NameSource`] returns. A failing source never stops a match:
//! the roster degrades to the fallback name alone.

use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::DEFAULT_FALLBACK_NAME;

/// Why a name source produced no names
#[derive(Debug, Error)]
pub enum NameSourceError {
    #[error("failed to read names from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("name source unavailable: {0}")]
    Unavailable(String),
}

/// Supplies candidate names (commenters, players, ...)
pub trait NameSource {
    fn fetch_names(&mut self) -> Result<Vec<String>, NameSourceError>;
}

/// Fixed in-memory name list
#[derive(Debug, Clone, Default)]
pub struct StaticNames(pub Vec<String>);

impl NameSource for StaticNames {
    fn fetch_names(&mut self) -> Result<Vec<String>, NameSourceError> {
        Ok(self.0.clone())
    }
}

/// Newline-delimited names file; lines starting with `#` are skipped
#[derive(Debug, Clone)]
pub struct NameFile {
    pub path: PathBuf,
}

impl NameFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl NameSource for NameFile {
    fn fetch_names(&mut self) -> Result<Vec<String>, NameSourceError> {
        let text = std::fs::read_to_string(&self.path).map_err(|source| NameSourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(text
            .lines()
            .filter(|line| !line.trim_start().starts_with('#'))
            .map(str::to_string)
            .collect())
    }
}

/// Build the ordered, deduplicated name list: fallback first, then each
/// trimmed, non-blank fetched name in first-seen order
pub fn resolve_names(fallback: &str, fetched: &[String]) -> Vec<String> {
    let fallback = match fallback.trim() {
        "" => DEFAULT_FALLBACK_NAME,
        name => name,
    };

    let mut seen: HashSet<&str> = HashSet::with_capacity(fetched.len() + 1);
    let mut names = Vec::with_capacity(fetched.len() + 1);
    seen.insert(fallback);
    names.push(fallback.to_string());

    for name in fetched.iter().map(|n| n.trim()) {
        if !name.is_empty() && seen.insert(name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Session roster; never empty, fallback name always at index 0.
///
/// Serializes as a plain name list. Deserializing treats the first entry as
/// the fallback and runs the rest through [`resolve_names`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Roster {
    names: Vec<String>,
}

impl Roster {
    pub fn new(fallback: &str, fetched: &[String]) -> Self {
        Self {
            names: resolve_names(fallback, fetched),
        }
    }

    /// Fetch names from `source`, treating any failure as "no extra names"
    pub fn load(fallback: &str, source: &mut dyn NameSource) -> Self {
        let fetched = match source.fetch_names() {
            Ok(names) => names,
            Err(e) => {
                log::warn!("Name source failed, continuing with fallback only: {}", e);
                Vec::new()
            }
        };
        let roster = Self::new(fallback, &fetched);
        log::info!(
            "Roster ready: {} names ({} fetched)",
            roster.len(),
            fetched.len()
        );
        roster
    }

    pub fn fallback(&self) -> &str {
        &self.names[0]
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Only the fallback name: the match never declares a winner
    pub fn is_single_player(&self) -> bool {
        self.names.len() == 1
    }
}

impl From<Vec<String>> for Roster {
    fn from(names: Vec<String>) -> Self {
        match names.split_first() {
            Some((fallback, fetched)) => Self::new(fallback, fetched),
            None => Self::new("", &[]),
        }
    }
}

impl From<Roster> for Vec<String> {
    fn from(roster: Roster) -> Self {
        roster.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolve_empty_fetch() {
        assert_eq!(resolve_names("Host", &[]), vec!["Host".to_string()]);
    }

    #[test]
    fn test_resolve_dedup_trim_and_order() {
        let fetched = strings(&["  bob ", "alice", "", "   ", "Host", "bob", "carol"]);
        assert_eq!(
            resolve_names("Host", &fetched),
            strings(&["Host", "bob", "alice", "carol"])
        );
    }

    #[test]
    fn test_blank_fallback_uses_default() {
        let names = resolve_names("  ", &strings(&["x"]));
        assert_eq!(names, strings(&[DEFAULT_FALLBACK_NAME, "x"]));
    }

    struct Broken;

    impl NameSource for Broken {
        fn fetch_names(&mut self) -> Result<Vec<String>, NameSourceError> {
            Err(NameSourceError::Unavailable("quota exceeded".into()))
        }
    }

    #[test]
    fn test_load_failure_degrades_to_fallback() {
        let roster = Roster::load("Host", &mut Broken);
        assert_eq!(roster.names(), &["Host".to_string()]);
        assert!(roster.is_single_player());
    }

    #[test]
    fn test_load_static_names() {
        let mut source = StaticNames(strings(&["a", "b"]));
        let roster = Roster::load("Host", &mut source);
        assert_eq!(roster.len(), 3);
        assert_eq!(roster.fallback(), "Host");
        assert!(roster.contains("b"));
        assert!(!roster.contains("c"));
    }

    #[test]
    fn test_deserialize_keeps_roster_non_empty() {
        let roster: Roster = serde_json::from_str("[]").unwrap();
        assert_eq!(roster.fallback(), DEFAULT_FALLBACK_NAME);
        assert!(!roster.is_empty());

        let roster: Roster = serde_json::from_str(r#"["Host", " bob ", "Host", ""]"#).unwrap();
        assert_eq!(roster.names(), &strings(&["Host", "bob"]));
        assert_eq!(serde_json::to_string(&roster).unwrap(), r#"["Host","bob"]"#);
    }

    #[test]
    fn test_name_file_missing_is_error() {
        let mut source = NameFile::new("/definitely/not/here/names.txt");
        assert!(matches!(
            source.fetch_names(),
            Err(NameSourceError::Io { .. })
        ));
    }

    #[test]
    fn test_name_file_skips_comments() {
        let path = std::env::temp_dir().join(format!("royale-names-{}.txt", std::process::id()));
        std::fs::write(&path, "# commenters\nalice\n\n  bob  \n").unwrap();
        let roster = Roster::load("Host", &mut NameFile::new(&path));
        std::fs::remove_file(&path).ok();
        assert_eq!(roster.names(), &strings(&["Host", "alice", "bob"]));
    }

    proptest! {
        #[test]
        fn prop_fallback_once_and_names_unique(
            fetched in prop::collection::vec(
                prop_oneof![
                    Just("Host".to_string()),
                    Just("   ".to_string()),
                    Just(String::new()),
                    "[ a-d]{0,4}",
                ],
                0..24,
            )
        ) {
            let names = resolve_names("Host", &fetched);
            prop_assert_eq!(&names[0], "Host");
            prop_assert_eq!(names.iter().filter(|n| *n == "Host").count(), 1);

            let unique: HashSet<&String> = names.iter().collect();
            prop_assert_eq!(unique.len(), names.len());

            // Every valid trimmed input appears, in first-seen order
            let mut expected: Vec<String> = vec!["Host".to_string()];
            for name in fetched.iter().map(|n| n.trim()) {
                if !name.is_empty() && !expected.iter().any(|e| e == name) {
                    expected.push(name.to_string());
                }
            }
            prop_assert_eq!(names, expected);
        }
    }
}
