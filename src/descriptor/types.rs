//! Session and document types produced by the descriptor parser.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::mail::EmailRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Training,
    Task,
    Interstitial,
}

impl SessionKind {
    /// Section header marker in descriptor text.
    pub fn marker(self) -> &'static str {
        match self {
            Self::Training => "#?",
            Self::Task => "##",
            Self::Interstitial => "#",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Training => "training",
            Self::Task => "task",
            Self::Interstitial => "interstitial",
        };
        f.write_str(name)
    }
}

/// Fields whose values are built from `- item` lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListField {
    Messages,
    Promoted,
    Actions,
    Commitments,
    Index,
}

impl ListField {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "messages" => Some(Self::Messages),
            "promoted" => Some(Self::Promoted),
            "actions" => Some(Self::Actions),
            "commitments" => Some(Self::Commitments),
            "index" => Some(Self::Index),
            _ => None,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Messages => "messages",
            Self::Promoted => "promoted",
            Self::Actions => "actions",
            Self::Commitments => "commitments",
            Self::Index => "index",
        }
    }

    pub fn task_only(self) -> bool {
        matches!(self, Self::Commitments | Self::Index)
    }
}

/// Keys that would collide with the session envelope in the compiled JSON.
pub const RESERVED_KEYS: &[&str] = &["type", "name", "desc"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment {
    pub name: String,
    pub status: String,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    #[serde(rename = "type")]
    pub kind: SessionKind,
    pub name: String,
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub desc: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<EmailRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promoted: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commitments: Option<BTreeMap<String, Commitment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<BTreeMap<String, Vec<String>>>,
}

impl Session {
    pub fn new(kind: SessionKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            fields: BTreeMap::new(),
            desc: Vec::new(),
            messages: None,
            promoted: None,
            actions: None,
            commitments: None,
            index: None,
        }
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Replace a list field with an empty container.
    pub fn reset_list(&mut self, field: ListField) {
        match field {
            ListField::Messages => self.messages = Some(Vec::new()),
            ListField::Promoted => self.promoted = Some(Vec::new()),
            ListField::Actions => self.actions = Some(Vec::new()),
            ListField::Commitments => self.commitments = Some(BTreeMap::new()),
            ListField::Index => self.index = Some(BTreeMap::new()),
        }
    }

    /// Order messages newest first; records with equal timestamps keep resolution order.
    pub fn sort_messages(&mut self) {
        if let Some(messages) = self.messages.as_mut() {
            messages.sort_by_cached_key(|m| std::cmp::Reverse(m.timestamp()));
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    pub sessions: Vec<Session>,
}

impl Document {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn session(&self, name: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.name == name)
    }
}
