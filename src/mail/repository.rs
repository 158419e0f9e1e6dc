//! Mail repository: fetch records by id and list scopes of a maildir corpus.

use mailparse::{MailHeaderMap, ParsedMail};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Component, Path, PathBuf};

use super::types::{paragraphs_from_lines, Address, EmailRecord};
use crate::error::RepositoryError;

static ANGLE_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*<.+?>$").unwrap());
static QUOTED_NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#""(.+?)".*?$"#).unwrap());

/// Index range over a scope listing. Bounds use slice semantics: negative
/// values count from the end and out-of-range values clamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeRange {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl ScopeRange {
    pub fn apply<T>(&self, mut items: Vec<T>) -> Vec<T> {
        let len = items.len();
        let clamp = |bound: i64| -> usize {
            if bound < 0 {
                len.saturating_sub(bound.unsigned_abs() as usize)
            } else {
                (bound as usize).min(len)
            }
        };
        let start = self.min.map(clamp).unwrap_or(0);
        let end = self.max.map(clamp).unwrap_or(len);
        if start >= end {
            return Vec::new();
        }
        items.truncate(end);
        items.split_off(start)
    }
}

/// Source of email records for the message-list resolver.
pub trait MailRepository {
    /// Fetch one record. Records come back with `read = true`.
    fn fetch(&self, id: &str) -> Result<EmailRecord, RepositoryError>;

    /// List the ids in a scope, numerically ordered, restricted to `range`.
    fn list_scope(&self, scope: &str, range: ScopeRange) -> Result<Vec<String>, RepositoryError>;
}

/// Filesystem corpus: one RFC 822 file per message, ids are paths relative to `root`.
#[derive(Debug, Clone)]
pub struct MaildirRepository {
    root: PathBuf,
}

impl MaildirRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join a relative id onto the root. Absolute ids and `..` segments are
    /// refused so lookups stay inside the corpus.
    fn locate(&self, rel: &str) -> Option<PathBuf> {
        let rel = Path::new(rel);
        let inside = rel
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        inside.then(|| self.root.join(rel))
    }
}

impl MailRepository for MaildirRepository {
    fn fetch(&self, id: &str) -> Result<EmailRecord, RepositoryError> {
        let Some(path) = self.locate(id).filter(|p| p.is_file()) else {
            return Err(RepositoryError::NotFound(id.to_string()));
        };
        let raw = std::fs::read(&path).map_err(|source| RepositoryError::Io {
            path: path.clone(),
            source,
        })?;
        parse_record(id, &raw)
    }

    fn list_scope(&self, scope: &str, range: ScopeRange) -> Result<Vec<String>, RepositoryError> {
        let Some(dir) = self.locate(scope) else {
            return Err(RepositoryError::ScopeNotFound(PathBuf::from(scope)));
        };
        if dir.is_file() {
            return Ok(vec![scope.to_string()]);
        }
        if !dir.is_dir() {
            return Err(RepositoryError::ScopeNotFound(dir));
        }
        let entries = std::fs::read_dir(&dir).map_err(|source| RepositoryError::Io {
            path: dir.clone(),
            source,
        })?;
        let mut names: Vec<String> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        names.sort_by_key(|name| numeric_key(name));

        let scope = scope.trim_end_matches('/');
        Ok(range
            .apply(names)
            .into_iter()
            .map(|name| format!("{}/{}", scope, name))
            .collect())
    }
}

/// Sort key for maildir file names like `12.`: numeric names first, in value order.
fn numeric_key(name: &str) -> (u8, u64, String) {
    match name.trim_end_matches('.').parse::<u64>() {
        Ok(n) => (0, n, String::new()),
        Err(_) => (1, 0, name.to_string()),
    }
}

/// Strip an address suffix and surrounding quotes from a display name.
pub fn clean_name(name: &str) -> String {
    let name = ANGLE_SUFFIX_RE.replace(name.trim(), "");
    QUOTED_NAME_RE.replace(&name, "$1").trim().to_string()
}

/// Build an `EmailRecord` from raw RFC 822 bytes.
pub fn parse_record(id: &str, raw: &[u8]) -> Result<EmailRecord, RepositoryError> {
    let parsed = mailparse::parse_mail(raw).map_err(|e| RepositoryError::Parse {
        id: id.to_string(),
        reason: e.to_string(),
    })?;
    let headers = &parsed.headers;

    let Some(from_addr) = headers.get_first_value("From") else {
        return Err(RepositoryError::Parse {
            id: id.to_string(),
            reason: "missing From header".to_string(),
        });
    };
    let from_name = headers
        .get_first_value("X-From")
        .unwrap_or_else(|| from_addr.clone());

    let body = extract_body(&parsed);

    Ok(EmailRecord {
        id: id.to_string(),
        subject: headers
            .get_first_value("Subject")
            .unwrap_or_else(|| "(No subject)".to_string()),
        from: Address {
            full_name: clean_name(&from_name),
            email: from_addr.trim().to_string(),
        },
        to: extract_people(&parsed, "To"),
        cc: extract_people(&parsed, "Cc"),
        bcc: extract_people(&parsed, "Bcc"),
        time: headers.get_first_value("Date").unwrap_or_default(),
        read: true,
        body: paragraphs_from_lines(body.lines()),
    })
}

/// Pair the addresses of `field` with the display names of `X-<field>`.
fn extract_people(parsed: &ParsedMail, field: &str) -> Vec<Address> {
    let Some(addresses) = parsed.headers.get_first_value(field) else {
        return Vec::new();
    };
    let names = parsed
        .headers
        .get_first_value(&format!("X-{}", field))
        .unwrap_or_else(|| addresses.clone());
    addresses
        .split(',')
        .zip(names.split(','))
        .filter(|(addr, _)| !addr.trim().is_empty())
        .map(|(addr, name)| Address {
            full_name: clean_name(name),
            email: addr.trim().to_string(),
        })
        .collect()
}

/// Extract text/plain body from a parsed email.
fn extract_body(parsed: &ParsedMail) -> String {
    if parsed.subparts.is_empty() {
        return parsed.get_body().unwrap_or_default();
    }
    for part in &parsed.subparts {
        if part.ctype.mimetype == "text/plain" {
            if let Ok(body) = part.get_body() {
                return body;
            }
        }
        let nested = extract_body(part);
        if !nested.is_empty() {
            return nested;
        }
    }
    String::new()
}
