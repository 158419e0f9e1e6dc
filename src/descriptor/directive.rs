//! Message-list directives: `raw-list: <id>,<id>` and `<scope>[@min~max]: <modifiers>`.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::error::{RepositoryError, ResolveError};
use crate::mail::{EmailRecord, MailRepository, ScopeRange};

pub const RAW_LIST: &str = "raw-list";

/// Per-record modifiers for scoped directives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// `some-unread`: force a random share of records unread.
    pub some_unread: bool,
    /// `all-unread`: force every record unread.
    pub all_unread: bool,
}

impl Modifiers {
    fn parse(params: &str) -> Self {
        let mut modifiers = Self::default();
        for token in params.split(';').map(str::trim).filter(|t| !t.is_empty()) {
            match token {
                "some-unread" => modifiers.some_unread = true,
                "all-unread" => modifiers.all_unread = true,
                other => warn!(modifier = other, "ignoring unknown directive modifier"),
            }
        }
        modifiers
    }
}

/// How a directive treats a record that fails to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log and continue with the next id.
    SkipRecord,
    /// Stop the directive and surface the error.
    Abort,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    RawList(Vec<String>),
    Scope {
        scope: String,
        range: ScopeRange,
        modifiers: Modifiers,
    },
}

impl Directive {
    pub fn policy(&self) -> FailurePolicy {
        match self {
            Self::RawList(_) => FailurePolicy::SkipRecord,
            Self::Scope { .. } => FailurePolicy::Abort,
        }
    }
}

impl FromStr for Directive {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((source, params)) = s.split_once(':') else {
            return Err(ResolveError::Malformed(s.to_string()));
        };
        let (source, params) = (source.trim(), params.trim());

        if source == RAW_LIST {
            let ids = params
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(String::from)
                .collect();
            return Ok(Self::RawList(ids));
        }

        let (scope, range) = match source.split_once('@') {
            Some((scope, bounds)) => (scope.trim(), parse_range(bounds.trim())?),
            None => (source, ScopeRange::default()),
        };
        if scope.is_empty() {
            return Err(ResolveError::Malformed(s.to_string()));
        }
        Ok(Self::Scope {
            scope: scope.to_string(),
            range,
            modifiers: Modifiers::parse(params),
        })
    }
}

fn parse_range(bounds: &str) -> Result<ScopeRange, ResolveError> {
    let Some((min, max)) = bounds.split_once('~') else {
        return Err(ResolveError::Range(bounds.to_string()));
    };
    let bound = |b: &str| -> Result<Option<i64>, ResolveError> {
        let b = b.trim();
        if b.is_empty() {
            return Ok(None);
        }
        b.parse()
            .map(Some)
            .map_err(|_| ResolveError::Range(bounds.to_string()))
    };
    Ok(ScopeRange {
        min: bound(min)?,
        max: bound(max)?,
    })
}

/// Tunables for resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolveOptions {
    /// Maximum entries kept in each of to/cc/bcc.
    #[serde(default = "default_recipient_limit")]
    pub recipient_limit: usize,
    /// Chance that `some-unread` forces a record unread.
    #[serde(default = "default_some_unread_probability")]
    pub some_unread_probability: f64,
}

fn default_recipient_limit() -> usize {
    5
}

fn default_some_unread_probability() -> f64 {
    0.2
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            recipient_limit: default_recipient_limit(),
            some_unread_probability: default_some_unread_probability(),
        }
    }
}

/// Something that can expand a directive line into email records.
pub trait MessageSource {
    fn messages(&mut self, directive: &str) -> Result<Vec<EmailRecord>, ResolveError>;
}

/// Resolves directives against a repository with an explicitly passed generator.
pub struct Resolver<'a, M: MailRepository + ?Sized, R: Rng + ?Sized> {
    repo: &'a M,
    rng: &'a mut R,
    options: ResolveOptions,
}

impl<'a, M: MailRepository + ?Sized, R: Rng + ?Sized> Resolver<'a, M, R> {
    pub fn new(repo: &'a M, rng: &'a mut R, options: ResolveOptions) -> Self {
        Self { repo, rng, options }
    }

    /// Start resolving a directive. Scope listing happens here, so a missing
    /// scope fails before any record is produced; records are then loaded lazily.
    pub fn resolve(&mut self, directive: &str) -> Result<Resolution<'_, M, R>, ResolveError> {
        let directive: Directive = directive.parse()?;
        let policy = directive.policy();
        let (pending, modifiers) = match directive {
            Directive::RawList(ids) => (
                ids.into(),
                Modifiers {
                    all_unread: true,
                    ..Modifiers::default()
                },
            ),
            Directive::Scope {
                scope,
                range,
                modifiers,
            } => (self.repo.list_scope(&scope, range)?.into(), modifiers),
        };
        Ok(Resolution {
            repo: self.repo,
            rng: &mut *self.rng,
            options: self.options,
            pending,
            modifiers,
            policy,
        })
    }
}

impl<M: MailRepository + ?Sized, R: Rng + ?Sized> MessageSource for Resolver<'_, M, R> {
    fn messages(&mut self, directive: &str) -> Result<Vec<EmailRecord>, ResolveError> {
        let records = self.resolve(directive)?.collect::<Result<Vec<_>, _>>()?;
        debug!(directive, count = records.len(), "resolved directive");
        Ok(records)
    }
}

/// Lazy sequence of records for one directive.
pub struct Resolution<'r, M: MailRepository + ?Sized, R: Rng + ?Sized> {
    repo: &'r M,
    rng: &'r mut R,
    options: ResolveOptions,
    pending: VecDeque<String>,
    modifiers: Modifiers,
    policy: FailurePolicy,
}

impl<M: MailRepository + ?Sized, R: Rng + ?Sized> Resolution<'_, M, R> {
    fn finish(&mut self, mut record: EmailRecord) -> EmailRecord {
        record.truncate_recipients(self.options.recipient_limit);
        if self.modifiers.some_unread && self.rng.gen_bool(self.options.some_unread_probability) {
            record.read = false;
        }
        if self.modifiers.all_unread {
            record.read = false;
        }
        record
    }
}

impl<M: MailRepository + ?Sized, R: Rng + ?Sized> Iterator for Resolution<'_, M, R> {
    type Item = Result<EmailRecord, ResolveError>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.pending.pop_front() {
            match self.repo.fetch(&id) {
                Ok(record) => return Some(Ok(self.finish(record))),
                Err(e) if self.policy == FailurePolicy::SkipRecord && e.is_record_level() => {
                    warn!(id = %id, error = %e, "skipping message");
                }
                Err(RepositoryError::Io { path, source }) if self.policy == FailurePolicy::SkipRecord => {
                    warn!(id = %id, path = %path.display(), error = %source, "skipping unreadable message");
                }
                Err(e) => {
                    self.pending.clear();
                    return Some(Err(e.into()));
                }
            }
        }
        None
    }
}
