//! Inbox definitions (`*.txt`) and their manifest (`manifest.json`).

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::ConfigError;

pub const MANIFEST_FILE: &str = "manifest.json";

/// Per-inbox metadata from the manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboxMeta {
    /// Task instruction lines.
    #[serde(default)]
    pub inst: Vec<String>,
}

/// Message ids of one inbox, split into gold items and distractors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inbox {
    pub gold: Vec<String>,
    pub distractors: Vec<String>,
}

impl Inbox {
    /// Parse `<label> <id>` lines; label `gold` marks gold items.
    pub fn parse(text: &str) -> Result<Self> {
        let mut inbox = Self::default();
        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Some((label, id)) = line.split_once(char::is_whitespace) else {
                bail!("line {}: expected '<label> <message-id>', found '{}'", i + 1, line);
            };
            let id = id.trim().to_string();
            if label == "gold" {
                inbox.gold.push(id);
            } else {
                inbox.distractors.push(id);
            }
        }
        Ok(inbox)
    }

    /// Distractors followed by gold items, as listed in a `raw-list` directive.
    pub fn message_ids(&self) -> impl Iterator<Item = &str> {
        self.distractors
            .iter()
            .chain(self.gold.iter())
            .map(String::as_str)
    }
}

/// Everything the assembler reads from a config directory.
#[derive(Debug, Clone, Default)]
pub struct InboxSet {
    pub inboxes: BTreeMap<String, Inbox>,
    pub manifest: BTreeMap<String, InboxMeta>,
}

impl InboxSet {
    /// Sorted inbox names.
    pub fn names(&self) -> Vec<String> {
        self.inboxes.keys().cloned().collect()
    }

    pub fn get(&self, name: &str) -> Option<(&Inbox, &InboxMeta)> {
        Some((self.inboxes.get(name)?, self.manifest.get(name)?))
    }
}

/// Read `manifest.json` and every `*.txt` inbox in `dir`.
pub fn load_inbox_set(dir: &Path) -> Result<InboxSet> {
    if !dir.is_dir() {
        bail!("{}: not a directory", dir.display());
    }

    println!("Reading manifest");
    let manifest_path = dir.join(MANIFEST_FILE);
    let content = std::fs::read_to_string(&manifest_path)
        .with_context(|| format!("reading {}", manifest_path.display()))?;
    let manifest: BTreeMap<String, InboxMeta> = serde_json::from_str(&content)
        .with_context(|| format!("parsing {}", manifest_path.display()))?;

    println!("Reading inboxes");
    let mut entries: Vec<_> = std::fs::read_dir(dir)?.filter_map(|e| e.ok()).collect();
    entries.sort_by_key(|e| e.file_name());

    let mut inboxes = BTreeMap::new();
    for entry in entries {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().to_string();
        if !path.is_file() || !name.ends_with(".txt") {
            if name != MANIFEST_FILE {
                println!(" - Skipping non-inbox: {}", name);
            }
            continue;
        }
        let text = std::fs::read_to_string(&path)?;
        let inbox = Inbox::parse(&text).with_context(|| format!("reading inbox {}", name))?;
        println!(
            " - Read inbox {}: {}d + {}g",
            name,
            inbox.distractors.len(),
            inbox.gold.len()
        );
        inboxes.insert(name, inbox);
    }
    println!("Read: {} inboxes", inboxes.len());

    for name in inboxes.keys() {
        if !manifest.contains_key(name) {
            return Err(ConfigError::MissingManifestEntry(name.clone()).into());
        }
    }

    Ok(InboxSet { inboxes, manifest })
}
