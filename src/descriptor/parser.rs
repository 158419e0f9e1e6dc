//! Line-oriented descriptor parser.
//!
//! Each line is classified by its prefix and fed to [`step`], a transition
//! function over [`ParserState`]. A section header or end of input seals the
//! session under construction.

use std::collections::HashSet;
use tracing::debug;

use super::directive::MessageSource;
use super::types::{Commitment, Document, ListField, RESERVED_KEYS, Session, SessionKind};
use crate::error::DescriptorError;

/// Inserted between the lines of a multi-line scalar field.
pub const CONTINUATION_SEPARATOR: &str = "\r\n";

/// A trimmed input line, classified by prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    Blank,
    Header(SessionKind, &'a str),
    Desc(&'a str),
    Item(&'a str),
    Text(&'a str),
}

impl<'a> Line<'a> {
    pub fn classify(raw: &'a str) -> Self {
        let line = raw.trim();
        if line.is_empty() {
            Self::Blank
        } else if let Some(rest) = line.strip_prefix("##") {
            Self::Header(SessionKind::Task, rest.trim())
        } else if let Some(rest) = line.strip_prefix("#?") {
            Self::Header(SessionKind::Training, rest.trim())
        } else if let Some(rest) = line.strip_prefix('#') {
            Self::Header(SessionKind::Interstitial, rest.trim())
        } else if let Some(rest) = line.strip_prefix('>') {
            Self::Desc(rest.trim())
        } else if let Some(rest) = line.strip_prefix('-') {
            Self::Item(rest.trim())
        } else {
            Self::Text(line)
        }
    }
}

/// The field that accepts the next item or continuation line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveField {
    Scalar(String),
    List(ListField),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ParserState {
    #[default]
    NoSession,
    InSession {
        session: Session,
        field: Option<ActiveField>,
    },
}

impl ParserState {
    /// Close the current session, if any.
    pub fn finish(self) -> Option<Session> {
        match self {
            Self::NoSession => None,
            Self::InSession { session, .. } => Some(session),
        }
    }
}

/// Apply one line to the parser state. Returns the next state and the session
/// sealed by this line, if any.
pub fn step<S: MessageSource + ?Sized>(
    state: ParserState,
    line: Line<'_>,
    lineno: usize,
    source: &mut S,
) -> Result<(ParserState, Option<Session>), DescriptorError> {
    if let Line::Header(kind, name) = line {
        let next = ParserState::InSession {
            session: Session::new(kind, name),
            field: None,
        };
        return Ok((next, state.finish()));
    }

    let ParserState::InSession { mut session, field } = state else {
        return match line {
            Line::Blank => Ok((ParserState::NoSession, None)),
            _ => Err(DescriptorError::grammar(
                lineno,
                "content before the first section header",
            )),
        };
    };

    let field = match line {
        Line::Header(..) => unreachable!("headers handled above"),
        Line::Blank => None,
        Line::Desc(text) => {
            session.desc.push(text.replace("\\n", "\n"));
            field
        }
        Line::Item(item) => {
            match &field {
                Some(ActiveField::List(list)) => push_item(&mut session, *list, item, lineno, source)?,
                Some(ActiveField::Scalar(key)) => {
                    return Err(DescriptorError::grammar(
                        lineno,
                        format!("list item under scalar field '{}'", key),
                    ));
                }
                None => {
                    return Err(DescriptorError::grammar(lineno, "list item with no active key"));
                }
            }
            field
        }
        Line::Text(text) => match field {
            None => Some(declare(&mut session, text, lineno)?),
            Some(ActiveField::Scalar(key)) => {
                if let Some(value) = session.fields.get_mut(&key) {
                    value.push_str(CONTINUATION_SEPARATOR);
                    value.push_str(text);
                }
                Some(ActiveField::Scalar(key))
            }
            Some(ActiveField::List(list)) => {
                return Err(DescriptorError::grammar(
                    lineno,
                    format!("expected '- item' under list field '{}'", list.key()),
                ));
            }
        },
    };

    Ok((ParserState::InSession { session, field }, None))
}

/// Handle a `key: value` line and return the field it activates.
fn declare(session: &mut Session, text: &str, lineno: usize) -> Result<ActiveField, DescriptorError> {
    let Some((key, value)) = text.split_once(':') else {
        return Err(DescriptorError::grammar(
            lineno,
            format!("expected 'key: value', found '{}'", text),
        ));
    };
    let (key, value) = (key.trim(), value.trim());
    if key.is_empty() {
        return Err(DescriptorError::grammar(lineno, "empty field name"));
    }

    if let Some(list) = ListField::from_key(key) {
        if list.task_only() && session.kind != SessionKind::Task {
            return Err(DescriptorError::grammar(
                lineno,
                format!("'{}' is only valid in task sessions", key),
            ));
        }
        if !value.is_empty() {
            debug!(key, value, "ignoring inline value of list field");
        }
        session.reset_list(list);
        return Ok(ActiveField::List(list));
    }

    if RESERVED_KEYS.contains(&key) {
        return Err(DescriptorError::grammar(
            lineno,
            format!("'{}' is a reserved field name", key),
        ));
    }
    session.fields.insert(key.to_string(), value.to_string());
    Ok(ActiveField::Scalar(key.to_string()))
}

fn push_item<S: MessageSource + ?Sized>(
    session: &mut Session,
    list: ListField,
    item: &str,
    lineno: usize,
    source: &mut S,
) -> Result<(), DescriptorError> {
    match list {
        ListField::Messages => {
            let records = source
                .messages(item)
                .map_err(|source| DescriptorError::Resolve { line: lineno, source })?;
            session.messages.get_or_insert_with(Vec::new).extend(records);
        }
        ListField::Promoted => session.promoted.get_or_insert_with(Vec::new).push(item.to_string()),
        ListField::Actions => session.actions.get_or_insert_with(Vec::new).push(item.to_string()),
        ListField::Commitments => {
            let parts: Vec<&str> = item.split('|').map(str::trim).collect();
            let [id, status, name, time] = parts.as_slice() else {
                return Err(DescriptorError::grammar(
                    lineno,
                    format!("commitment needs 'id | status | name | time', found '{}'", item),
                ));
            };
            session.commitments.get_or_insert_with(Default::default).insert(
                id.to_string(),
                Commitment {
                    name: name.to_string(),
                    status: status.to_string(),
                    time: time.to_string(),
                },
            );
        }
        ListField::Index => {
            let Some((keyword, ids)) = item.split_once('|') else {
                return Err(DescriptorError::grammar(
                    lineno,
                    format!("index entry needs 'keyword | id;id', found '{}'", item),
                ));
            };
            let ids = ids
                .split(';')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(String::from)
                .collect();
            session
                .index
                .get_or_insert_with(Default::default)
                .entry(keyword.trim().to_string())
                .or_insert(ids);
        }
    }
    Ok(())
}

/// Parse descriptor text into a document. Any error aborts the whole parse.
pub fn parse_descriptor<S: MessageSource + ?Sized>(
    text: &str,
    source: &mut S,
) -> Result<Document, DescriptorError> {
    let mut state = ParserState::NoSession;
    let mut sessions = Vec::new();
    let mut seen = HashSet::new();
    for (i, raw) in text.lines().enumerate() {
        let lineno = i + 1;
        let line = Line::classify(raw);
        if let Line::Header(_, name) = line {
            if !seen.insert(name) {
                return Err(DescriptorError::grammar(
                    lineno,
                    format!("duplicate section name '{}'", name),
                ));
            }
        }
        let (next, sealed) = step(state, line, lineno, source)?;
        state = next;
        sessions.extend(sealed);
    }
    sessions.extend(state.finish());

    for session in &mut sessions {
        session.sort_messages();
    }
    debug!(sessions = sessions.len(), "parsed descriptor");
    Ok(Document { sessions })
}
