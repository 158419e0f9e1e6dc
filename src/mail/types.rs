//! Email record types as handed to the task runner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub email: String,
}

/// One line of a body paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub id: String,
    pub t: String,
}

pub type Paragraph = Vec<Segment>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRecord {
    pub id: String,
    pub subject: String,
    pub from: Address,
    #[serde(default)]
    pub to: Vec<Address>,
    #[serde(default)]
    pub cc: Vec<Address>,
    #[serde(default)]
    pub bcc: Vec<Address>,
    /// Raw `Date` header; see [`EmailRecord::timestamp`] for ordering.
    pub time: String,
    pub read: bool,
    #[serde(default)]
    pub body: Vec<Paragraph>,
}

impl EmailRecord {
    pub fn timestamp(&self) -> DateTime<Utc> {
        parse_msg_date(&self.time)
    }

    /// Keep at most `limit` entries in each recipient list.
    pub fn truncate_recipients(&mut self, limit: usize) {
        self.to.truncate(limit);
        self.cc.truncate(limit);
        self.bcc.truncate(limit);
    }
}

/// Parse an RFC 2822 date string, falling back to epoch on failure.
pub fn parse_msg_date(date_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc2822(date_str.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            mailparse::dateparse(date_str)
                .map(|ts| DateTime::from_timestamp(ts, 0).unwrap_or_default())
        })
        .unwrap_or_default()
}

/// Split body lines into paragraphs of trimmed, newline-terminated segments.
pub fn paragraphs_from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Vec<Paragraph> {
    let mut paragraphs = Vec::new();
    let mut current: Paragraph = Vec::new();
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
            continue;
        }
        current.push(Segment {
            id: format!("s-{}", current.len()),
            t: format!("{}\n", line),
        });
    }
    if !current.is_empty() {
        paragraphs.push(current);
    }
    paragraphs
}
