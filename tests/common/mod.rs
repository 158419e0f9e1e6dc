//! Shared test fixtures and helpers.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write one Enron-style message file under `root`.
pub fn write_message(root: &Path, id: &str, subject: &str, date: &str, to: &[&str]) {
    let path = root.join(id);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let to_addrs = to.join(", ");
    let content = format!(
        "Message-ID: <{id}@example.com>\n\
         Date: {date}\n\
         From: phillip.allen@enron.com\n\
         To: {to_addrs}\n\
         Subject: {subject}\n\
         X-From: Phillip K Allen\n\
         X-To: {to_addrs}\n\
         \n\
         Body of {subject}.\n\
         Second line.\n",
        id = id,
        date = date,
        to_addrs = to_addrs,
        subject = subject,
    );
    std::fs::write(path, content).unwrap();
}

/// Create a temporary maildir:
///
/// - `allen-p/inbox/1.` .. `allen-p/inbox/4.` with increasing dates
/// - `allen-p/inbox/10.`, the newest, with seven recipients
/// - `allen-p/broken/1.`, a file with no From header
pub fn temp_maildir() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().expect("failed to create temp dir");
    let root = tmp.path().join("maildir");

    let dates = [
        "Mon, 14 May 2001 08:00:00 -0700 (PDT)",
        "Tue, 15 May 2001 08:00:00 -0700 (PDT)",
        "Wed, 16 May 2001 08:00:00 -0700 (PDT)",
        "Thu, 17 May 2001 08:00:00 -0700 (PDT)",
    ];
    for (i, date) in dates.iter().enumerate() {
        write_message(
            &root,
            &format!("allen-p/inbox/{}.", i + 1),
            &format!("Message {}", i + 1),
            date,
            &["tim.belden@enron.com"],
        );
    }
    let many: Vec<String> = (0..7).map(|i| format!("user{}@enron.com", i)).collect();
    let many: Vec<&str> = many.iter().map(String::as_str).collect();
    write_message(
        &root,
        "allen-p/inbox/10.",
        "Message 10",
        "Fri, 18 May 2001 08:00:00 -0700 (PDT)",
        &many,
    );

    let broken = root.join("allen-p/broken");
    std::fs::create_dir_all(&broken).unwrap();
    std::fs::write(broken.join("1."), "Subject: no sender\n\nbody\n").unwrap();

    (tmp, root)
}

/// Create a temporary assembler config directory with `count` inboxes
/// (`inbox-0.txt` ..), each holding two distractors and one gold id
/// pointing into `temp_maildir`.
pub fn temp_config_dir(count: usize) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().expect("failed to create temp dir");
    let dir = tmp.path().join("config");
    std::fs::create_dir_all(&dir).unwrap();

    let mut manifest = serde_json::Map::new();
    for i in 0..count {
        let name = format!("inbox-{}.txt", i);
        std::fs::write(
            dir.join(&name),
            "distractor allen-p/inbox/1.\ndistractor allen-p/inbox/2.\ngold allen-p/inbox/3.\n",
        )
        .unwrap();
        manifest.insert(
            name,
            serde_json::json!({ "inst": [format!("Find the events in inbox {}.", i)] }),
        );
    }
    std::fs::write(
        dir.join("manifest.json"),
        serde_json::Value::Object(manifest).to_string(),
    )
    .unwrap();

    (tmp, dir)
}
