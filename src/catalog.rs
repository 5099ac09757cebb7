//! Role catalog: records parsed from the README role table.
//!
//! The table itself is fetched by the platform layer (web or otherwise); the
//! crate only parses the markdown text and answers lookups. A lookup never
//! fails: unknown names resolve to the `Inconnu` camp with a zero balance so
//! downstream stats stay additive.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;
use thiserror::Error;

use crate::roles::Camp;

/// Minimum row count below which the source text is considered garbage
/// rather than the real role table.
const MIN_PARSED_ROLES: usize = 10;

/// Markdown table row: `| name | origin | camp | notes | signed balance |`.
const ROW_PATTERN: &str =
    r"(?m)^\|\s*([^|]+?)\s*\|\s*([^|]+?)\s*\|\s*([^|]+?)\s*\|\s*([^|]+?)\s*\|\s*([+-]?\d+)\s*\|\s*$";

fn row_regex() -> &'static Regex {
    static ROW: OnceLock<Regex> = OnceLock::new();
    ROW.get_or_init(|| Regex::new(ROW_PATTERN).expect("row pattern is valid"))
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("role table parse failed: only {found} roles found (need {MIN_PARSED_ROLES})")]
    TooFewRoles { found: usize },
}

/// One catalog entry for a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRecord {
    pub name: String,
    pub origin: String,
    pub camp: Camp,
    pub balance: i32,
}

/// Result of looking up a role name, valid whether or not the name is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleInfo<'a> {
    pub camp: Camp,
    pub balance: i32,
    pub origin: Option<&'a str>,
}

/// Exact-name index over the parsed role records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleCatalog {
    by_name: HashMap<String, RoleRecord>,
}

impl RoleCatalog {
    #[must_use]
    pub fn from_records(records: Vec<RoleRecord>) -> Self {
        let by_name = records
            .into_iter()
            .map(|record| (record.name.clone(), record))
            .collect();
        Self { by_name }
    }

    /// Look up a role by its exact display name. Unknown names yield the
    /// `Inconnu` camp and a neutral balance instead of an error.
    #[must_use]
    pub fn lookup(&self, name: &str) -> RoleInfo<'_> {
        self.by_name.get(name).map_or(
            RoleInfo {
                camp: Camp::Inconnu,
                balance: 0,
                origin: None,
            },
            |record| RoleInfo {
                camp: record.camp,
                balance: record.balance,
                origin: Some(record.origin.as_str()),
            },
        )
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Parse the README role table into records.
///
/// Rows whose last cell is not a signed integer are skipped, as is the
/// header row (`Rôle | ...`).
///
/// # Errors
///
/// Returns [`CatalogError::TooFewRoles`] when fewer than ten rows parse,
/// which means the text was not the role table.
pub fn parse_roles_markdown(text: &str) -> Result<Vec<RoleRecord>, CatalogError> {
    let mut roles = Vec::new();
    for caps in row_regex().captures_iter(text) {
        let name = caps[1].trim();
        if name.eq_ignore_ascii_case("rôle") || name.eq_ignore_ascii_case("role") {
            continue;
        }
        let Ok(balance) = caps[5].trim().parse::<i32>() else {
            continue;
        };
        roles.push(RoleRecord {
            name: name.to_string(),
            origin: caps[2].trim().to_string(),
            camp: Camp::normalize(caps[3].trim()),
            balance,
        });
    }

    if roles.len() < MIN_PARSED_ROLES {
        return Err(CatalogError::TooFewRoles { found: roles.len() });
    }
    Ok(roles)
}

/// Platform hook supplying the raw role records.
///
/// The web frontend fetches the README over HTTP; tests use a fixture. The
/// crate itself never performs I/O.
pub trait RoleSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the full role list from the platform-specific location.
    ///
    /// # Errors
    ///
    /// Returns an error if the role table cannot be fetched or parsed.
    fn load_roles(&self) -> Result<Vec<RoleRecord>, Self::Error>;
}
