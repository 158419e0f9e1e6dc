//! Task descriptor format: parsing, message-list resolution, text generation.

pub mod directive;
pub mod parser;
pub mod types;
pub mod writer;

use rand::Rng;

use crate::error::DescriptorError;
use crate::mail::MailRepository;

pub use directive::{Directive, MessageSource, ResolveOptions, Resolver};
pub use parser::parse_descriptor;
pub use types::{Commitment, Document, Session, SessionKind};
pub use writer::{DescriptorWriter, SectionBuilder};

/// Parse descriptor text, resolving message directives against `repo`.
pub fn compile<M, R>(
    text: &str,
    repo: &M,
    rng: &mut R,
    options: ResolveOptions,
) -> Result<Document, DescriptorError>
where
    M: MailRepository + ?Sized,
    R: Rng + ?Sized,
{
    let mut resolver = Resolver::new(repo, rng, options);
    parse_descriptor(text, &mut resolver)
}
