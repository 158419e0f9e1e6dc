//! Session → descriptor text.
//!
//! Every field is followed by a blank line so no field continues into the next.

use std::fmt;

use super::types::SessionKind;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Scalar(String, String),
    List(String, Vec<String>),
    Desc(Vec<String>),
}

/// One section of descriptor text, written in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionBuilder {
    kind: SessionKind,
    name: String,
    entries: Vec<Entry>,
}

impl SectionBuilder {
    pub fn new(kind: SessionKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn scalar(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.entries.push(Entry::Scalar(key.to_string(), value.to_string()));
        self
    }

    pub fn list<I, T>(mut self, key: &str, items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.entries
            .push(Entry::List(key.to_string(), items.into_iter().map(Into::into).collect()));
        self
    }

    /// Description paragraphs; embedded newlines are written as `\n` escapes.
    pub fn desc<I, T>(mut self, paragraphs: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.entries
            .push(Entry::Desc(paragraphs.into_iter().map(Into::into).collect()));
        self
    }
}

impl fmt::Display for SectionBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.kind.marker(), self.name)?;
        for entry in &self.entries {
            match entry {
                Entry::Scalar(key, value) => writeln!(f, "{}: {}", key, value)?,
                Entry::List(key, items) => {
                    writeln!(f, "{}:", key)?;
                    for item in items {
                        writeln!(f, "- {}", item)?;
                    }
                }
                Entry::Desc(paragraphs) => {
                    for p in paragraphs {
                        writeln!(f, "> {}", p.replace('\n', "\\n"))?;
                    }
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A whole descriptor file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptorWriter {
    sections: Vec<SectionBuilder>,
}

impl DescriptorWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(mut self, section: SectionBuilder) -> Self {
        self.sections.push(section);
        self
    }

    pub fn push(&mut self, section: SectionBuilder) {
        self.sections.push(section);
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl fmt::Display for DescriptorWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.sections {
            write!(f, "{}", section)?;
        }
        Ok(())
    }
}
