//! Mail corpus access: record types, the repository seam, corpus survey.

pub mod repository;
pub mod scan;
pub mod types;

pub use repository::{MailRepository, MaildirRepository, ScopeRange};
pub use types::{Address, EmailRecord, Paragraph, Segment};
