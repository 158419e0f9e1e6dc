//! Assemble counterbalanced descriptor files from inbox definitions.

pub mod inbox;
pub mod sampler;
pub mod templates;

use anyhow::Result;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};
use tracing::debug;

use self::inbox::load_inbox_set;
use self::sampler::{permutation_count, sample};
use self::templates::{TaskKind, render_config};
use crate::error::ConfigError;

pub use sampler::PermutationConfig;

/// Arguments of the `assemble` command.
#[derive(Debug, Clone)]
pub struct AssembleOptions {
    pub task: TaskKind,
    pub conditions: Option<String>,
    pub seed: Option<u64>,
    pub cap: Option<usize>,
    pub length: Option<usize>,
}

/// Seeded generator, or one seeded from system entropy.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// mailtask assemble CONFIGDIR -o OUTDIR [...]
///
/// Returns the written files in configuration order.
pub fn run(config_dir: &Path, out_dir: &Path, opts: &AssembleOptions) -> Result<Vec<PathBuf>> {
    let pattern = match opts.conditions.as_deref() {
        Some(name) => opts.task.pattern(name)?,
        None => opts.task.default_pattern(),
    };

    let inboxes = load_inbox_set(config_dir)?;
    let names = inboxes.names();

    let length = opts.length.unwrap_or(names.len());
    if length > names.len() {
        return Err(ConfigError::LengthExceedsItems {
            length,
            available: names.len(),
        }
        .into());
    }
    if length != pattern.config_length() {
        return Err(ConfigError::PatternLength {
            pattern: pattern.name.to_string(),
            length,
            expected: pattern.config_length(),
        }
        .into());
    }

    debug!(
        items = names.len(),
        length,
        total = ?permutation_count(names.len(), length),
        cap = ?opts.cap,
        "sampling permutations"
    );
    let mut rng = make_rng(opts.seed);
    let configs = sample(&names, Some(length), opts.cap, &mut rng)?;

    std::fs::create_dir_all(out_dir)?;
    let mut written = Vec::with_capacity(configs.len());
    for (i, config) in configs.iter().enumerate() {
        let filename = format!("config-{}-{}.md", opts.task, i);
        println!("Writing file {}", filename);
        let text = render_config(opts.task, pattern, config, pattern.for_config(i), &inboxes)?;
        let path = out_dir.join(filename);
        std::fs::write(&path, text)?;
        written.push(path);
    }

    for (i, config) in configs.iter().enumerate() {
        println!("{}\t{}", i, config);
    }
    Ok(written)
}
