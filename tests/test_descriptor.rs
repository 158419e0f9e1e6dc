//! Integration tests for descriptor compilation against a maildir corpus:
//! directive resolution, skip/abort policies, ordering, JSON shape.

mod common;

use rand::SeedableRng;
use rand::rngs::StdRng;

use mailtask::descriptor::{self, ResolveOptions, SessionKind};
use mailtask::error::{DescriptorError, ResolveError};
use mailtask::mail::MaildirRepository;
use pretty_assertions::assert_eq;

fn compile(text: &str, repo: &MaildirRepository) -> Result<descriptor::Document, DescriptorError> {
    let mut rng = StdRng::seed_from_u64(7);
    descriptor::compile(text, repo, &mut rng, ResolveOptions::default())
}

fn ids(doc: &descriptor::Document, session: &str) -> Vec<String> {
    doc.session(session)
        .unwrap()
        .messages
        .as_ref()
        .unwrap()
        .iter()
        .map(|m| m.id.clone())
        .collect()
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

#[test]
fn test_raw_list_skips_invalid_ids() {
    let (_tmp, root) = common::temp_maildir();
    let repo = MaildirRepository::new(&root);
    let text = "## t\nmessages:\n- raw-list: allen-p/inbox/1., allen-p/broken/1., allen-p/inbox/2.\n";
    let doc = compile(text, &repo).unwrap();
    assert_eq!(ids(&doc, "t"), vec!["allen-p/inbox/2.", "allen-p/inbox/1."]);
}

#[test]
fn test_raw_list_skips_missing_ids() {
    let (_tmp, root) = common::temp_maildir();
    let repo = MaildirRepository::new(&root);
    let text = "## t\nmessages:\n- raw-list: allen-p/inbox/1.,allen-p/inbox/99.\n";
    let doc = compile(text, &repo).unwrap();
    assert_eq!(ids(&doc, "t"), vec!["allen-p/inbox/1."]);
}

#[test]
fn test_raw_list_skips_ids_escaping_the_corpus() {
    let (_tmp, root) = common::temp_maildir();
    let repo = MaildirRepository::new(&root);
    let absolute = root.join("allen-p/inbox/2.");
    let text = format!(
        "## t\nmessages:\n- raw-list: allen-p/inbox/1., ../maildir/allen-p/inbox/3., {}\n",
        absolute.display()
    );
    let doc = compile(&text, &repo).unwrap();
    assert_eq!(ids(&doc, "t"), vec!["allen-p/inbox/1."]);
}

#[test]
fn test_raw_list_messages_are_unread() {
    let (_tmp, root) = common::temp_maildir();
    let repo = MaildirRepository::new(&root);
    let doc = compile("## t\nmessages:\n- raw-list: allen-p/inbox/1.,allen-p/inbox/2.\n", &repo).unwrap();
    let messages = doc.sessions[0].messages.as_ref().unwrap();
    assert!(messages.iter().all(|m| !m.read));
}

#[test]
fn test_scope_listing_is_numeric_and_read() {
    let (_tmp, root) = common::temp_maildir();
    let repo = MaildirRepository::new(&root);
    let doc = compile("## t\nmessages:\n- allen-p/inbox@~3:\n", &repo).unwrap();
    // 1., 2., 3. by numeric order, then newest first.
    assert_eq!(
        ids(&doc, "t"),
        vec!["allen-p/inbox/3.", "allen-p/inbox/2.", "allen-p/inbox/1."]
    );
    assert!(doc.sessions[0].messages.as_ref().unwrap().iter().all(|m| m.read));
}

#[test]
fn test_scope_negative_range() {
    let (_tmp, root) = common::temp_maildir();
    let repo = MaildirRepository::new(&root);
    let doc = compile("## t\nmessages:\n- allen-p/inbox@-2~:\n", &repo).unwrap();
    assert_eq!(ids(&doc, "t"), vec!["allen-p/inbox/10.", "allen-p/inbox/4."]);
}

#[test]
fn test_scope_all_unread_is_idempotent() {
    let (_tmp, root) = common::temp_maildir();
    let repo = MaildirRepository::new(&root);
    let once = compile("## t\nmessages:\n- allen-p/inbox: all-unread\n", &repo).unwrap();
    let twice = compile("## t\nmessages:\n- allen-p/inbox: all-unread; all-unread\n", &repo).unwrap();
    assert_eq!(once, twice);
    assert!(once.sessions[0].messages.as_ref().unwrap().iter().all(|m| !m.read));
}

#[test]
fn test_scope_with_bad_record_aborts() {
    let (_tmp, root) = common::temp_maildir();
    let repo = MaildirRepository::new(&root);
    let err = compile("## t\nmessages:\n- allen-p/broken:\n", &repo).unwrap_err();
    assert_eq!(err.line(), 3);
    assert!(matches!(
        err,
        DescriptorError::Resolve {
            source: ResolveError::Repository(_),
            ..
        }
    ));
}

#[test]
fn test_missing_scope_aborts() {
    let (_tmp, root) = common::temp_maildir();
    let repo = MaildirRepository::new(&root);
    assert!(compile("## t\nmessages:\n- nobody/inbox:\n", &repo).is_err());
}

#[test]
fn test_recipients_truncated_to_limit() {
    let (_tmp, root) = common::temp_maildir();
    let repo = MaildirRepository::new(&root);
    let doc = compile("## t\nmessages:\n- raw-list: allen-p/inbox/10.\n", &repo).unwrap();
    let message = &doc.sessions[0].messages.as_ref().unwrap()[0];
    assert_eq!(message.to.len(), 5);
    assert_eq!(message.from.full_name, "Phillip K Allen");
    assert_eq!(message.from.email, "phillip.allen@enron.com");
}

#[test]
fn test_recipient_limit_is_configurable() {
    let (_tmp, root) = common::temp_maildir();
    let repo = MaildirRepository::new(&root);
    let mut rng = StdRng::seed_from_u64(7);
    let options = ResolveOptions {
        recipient_limit: 2,
        ..Default::default()
    };
    let doc = descriptor::compile(
        "## t\nmessages:\n- raw-list: allen-p/inbox/10.\n",
        &repo,
        &mut rng,
        options,
    )
    .unwrap();
    assert_eq!(doc.sessions[0].messages.as_ref().unwrap()[0].to.len(), 2);
}

#[test]
fn test_some_unread_is_seeded() {
    let (_tmp, root) = common::temp_maildir();
    let repo = MaildirRepository::new(&root);
    let text = "## t\nmessages:\n- allen-p/inbox: some-unread\n";
    let a = compile(text, &repo).unwrap();
    let b = compile(text, &repo).unwrap();
    assert_eq!(a, b);
}

// ---------------------------------------------------------------------------
// Ordering and output
// ---------------------------------------------------------------------------

#[test]
fn test_messages_newest_first_across_directives() {
    let (_tmp, root) = common::temp_maildir();
    let repo = MaildirRepository::new(&root);
    let text = "## t\nmessages:\n- raw-list: allen-p/inbox/1.,allen-p/inbox/4.\n- raw-list: allen-p/inbox/10.,allen-p/inbox/2.\n";
    let doc = compile(text, &repo).unwrap();
    assert_eq!(
        ids(&doc, "t"),
        vec![
            "allen-p/inbox/10.",
            "allen-p/inbox/4.",
            "allen-p/inbox/2.",
            "allen-p/inbox/1."
        ]
    );
}

#[test]
fn test_document_json_shape() {
    let (_tmp, root) = common::temp_maildir();
    let repo = MaildirRepository::new(&root);
    let text = "\
#? training
for: commitment

# yellow-inst
title: Traditional Tool
> Read carefully.

## calibration-0
task: commitment
usePerf: false
actions:
- tag-event
messages:
- raw-list: allen-p/inbox/1.,allen-p/inbox/2.
commitments:
- allen-p/inbox/2. | pending | |
";
    let doc = compile(text, &repo).unwrap();
    assert_eq!(doc.sessions.len(), 3);
    assert_eq!(doc.sessions[0].kind, SessionKind::Training);
    assert_eq!(doc.sessions[1].kind, SessionKind::Interstitial);

    let json: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
    let sessions = json["sessions"].as_array().unwrap();
    assert_eq!(sessions[0]["type"], "training");
    assert_eq!(sessions[0]["for"], "commitment");
    assert_eq!(sessions[1]["desc"][0], "Read carefully.");
    assert!(sessions[0].get("messages").is_none());

    let task = &sessions[2];
    assert_eq!(task["type"], "task");
    assert_eq!(task["name"], "calibration-0");
    assert_eq!(task["usePerf"], "false");
    assert_eq!(task["actions"][0], "tag-event");
    assert_eq!(task["messages"][0]["id"], "allen-p/inbox/2.");
    assert_eq!(task["messages"][0]["from"]["fullName"], "Phillip K Allen");
    assert_eq!(task["messages"][0]["read"], false);
    assert_eq!(task["messages"][0]["body"][0][0]["id"], "s-0");
    assert_eq!(task["commitments"]["allen-p/inbox/2."]["status"], "pending");
}
