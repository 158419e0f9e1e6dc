//! Corpus survey: find inboxes large enough to build tasks from.

use anyhow::Result;
use chrono::Datelike;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::warn;

use super::repository::{MailRepository, MaildirRepository};

/// Months with at least this many messages count as busy.
pub const BUSY_MONTH_THRESHOLD: usize = 100;

/// Monthly mode only reports inboxes with at least this many consecutive busy months.
pub const MIN_BUSY_RUN: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailboxSummary {
    pub user: String,
    /// Message ids relative to the maildir root, e.g. `allen-p/inbox/1.`.
    pub ids: Vec<String>,
}

/// List `<root>/<user>/inbox` directories holding at least `min_size` files.
pub fn find_mailboxes(root: &Path, min_size: usize) -> Result<Vec<MailboxSummary>> {
    if !root.is_dir() {
        anyhow::bail!("Cannot find directory {}", root.display());
    }
    let mut users: Vec<String> = std::fs::read_dir(root)?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().join("inbox").is_dir())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    users.sort();

    let mut found = Vec::new();
    for user in users {
        let inbox = root.join(&user).join("inbox");
        let mut ids: Vec<String> = std::fs::read_dir(&inbox)?
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file())
            .map(|e| format!("{}/inbox/{}", user, e.file_name().to_string_lossy()))
            .collect();
        if ids.len() < min_size {
            continue;
        }
        ids.sort();
        found.push(MailboxSummary { user, ids });
    }
    Ok(found)
}

/// Count messages per `YYYY-MM`. Unreadable or undated messages are skipped.
pub fn monthly_bins(repo: &impl MailRepository, mailbox: &MailboxSummary) -> BTreeMap<String, usize> {
    let mut bins = BTreeMap::new();
    for id in &mailbox.ids {
        let record = match repo.fetch(id) {
            Ok(r) => r,
            Err(e) => {
                warn!(id = %id, error = %e, "skipping unreadable message");
                continue;
            }
        };
        let ts = record.timestamp();
        if ts.timestamp() == 0 {
            continue;
        }
        *bins
            .entry(format!("{}-{:02}", ts.year(), ts.month()))
            .or_insert(0) += 1;
    }
    bins
}

/// Longest run of adjacent bins (newest first) with at least `threshold` messages.
pub fn longest_busy_run(bins: &BTreeMap<String, usize>, threshold: usize) -> usize {
    let mut current = 0;
    let mut longest = 0;
    for count in bins.values().rev() {
        if *count >= threshold {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// mailtask scan [--min-size N] [--monthly] [--user NAME...]
pub fn run(maildir: &Path, min_size: usize, users: &[String], monthly: bool) -> Result<()> {
    let repo = MaildirRepository::new(maildir);
    for mailbox in find_mailboxes(maildir, min_size)? {
        if !users.is_empty() && !users.contains(&mailbox.user) {
            continue;
        }
        if !monthly {
            println!("{} = {}", mailbox.user, mailbox.ids.len());
            continue;
        }

        let bins = monthly_bins(&repo, &mailbox);
        let run_len = longest_busy_run(&bins, BUSY_MONTH_THRESHOLD);
        if run_len < MIN_BUSY_RUN {
            continue;
        }
        println!("{}:", mailbox.user);
        for (month, count) in bins.iter().rev() {
            println!("  {} = {}", month, count);
        }
        println!("Usable months: {}", run_len);
        println!();
    }
    Ok(())
}
