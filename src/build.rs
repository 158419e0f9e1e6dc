//! Compile descriptor files into task-runner JSON.

use anyhow::{Context, Result, bail};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::Rng;
use std::path::{Path, PathBuf};
use tracing::error;

use crate::assemble::make_rng;
use crate::descriptor::{self, ResolveOptions};
use crate::error::ConfigError;
use crate::mail::MailRepository;

/// Header line of the CSV upload format.
pub const CSV_HEADER: &str = "CONFIG";

#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub out: Option<PathBuf>,
    pub base64: bool,
    pub csv: bool,
    pub groups: usize,
    pub seed: Option<u64>,
    pub resolve: ResolveOptions,
}

/// Compile one descriptor file to its JSON payload.
pub fn compile_file<M, R>(path: &Path, repo: &M, rng: &mut R, options: ResolveOptions) -> Result<String>
where
    M: MailRepository + ?Sized,
    R: Rng + ?Sized,
{
    let text = std::fs::read_to_string(path)?;
    let document = descriptor::compile(&text, repo, rng, options)
        .with_context(|| format!("compiling {}", path.display()))?;
    Ok(document.to_json()?)
}

fn encode(payload: &str) -> String {
    STANDARD.encode(payload.as_bytes())
}

/// `out.csv` → `out-<i>.csv`.
pub fn group_path(out: &Path, index: usize) -> PathBuf {
    let stem = out
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let name = match out.extension() {
        Some(ext) => format!("{}-{}.{}", stem, index, ext.to_string_lossy()),
        None => format!("{}-{}", stem, index),
    };
    out.with_file_name(name)
}

fn write_csv(path: &Path, payloads: &[(String, String)]) -> Result<()> {
    let mut content = format!("{}\n", CSV_HEADER);
    for (_, payload) in payloads {
        content.push_str(&encode(payload));
        content.push('\n');
    }
    std::fs::write(path, content)?;
    Ok(())
}

/// mailtask build CONFIG [-o OUT] [--base64] [--csv] [--groups N] [--seed N]
pub fn run<M: MailRepository + ?Sized>(input: &Path, repo: &M, opts: &BuildOptions) -> Result<()> {
    let mut rng = make_rng(opts.seed);
    if input.is_dir() {
        run_dir(input, repo, &mut rng, opts)
    } else if input.is_file() {
        run_file(input, repo, &mut rng, opts)
    } else {
        bail!("Input not found: {}", input.display());
    }
}

fn run_file<M, R>(input: &Path, repo: &M, rng: &mut R, opts: &BuildOptions) -> Result<()>
where
    M: MailRepository + ?Sized,
    R: Rng + ?Sized,
{
    let json = compile_file(input, repo, rng, opts.resolve)?;
    let payload = if opts.base64 { encode(&json) } else { json };
    match &opts.out {
        None => println!("{}", payload),
        Some(out) => {
            let content = if opts.csv {
                format!("{}\n{}", CSV_HEADER, payload)
            } else {
                payload
            };
            std::fs::write(out, content)?;
            println!("Wrote {}", out.display());
        }
    }
    Ok(())
}

fn run_dir<M, R>(input: &Path, repo: &M, rng: &mut R, opts: &BuildOptions) -> Result<()>
where
    M: MailRepository + ?Sized,
    R: Rng + ?Sized,
{
    let Some(out) = opts.out.as_deref() else {
        bail!("An output path (-o) is required when compiling a directory");
    };
    if !opts.csv && !out.is_dir() {
        bail!("Output must be directory unless csv specified");
    }
    if opts.groups == 0 {
        return Err(ConfigError::Invalid("--groups must be at least 1".to_string()).into());
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(input)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    files.sort();

    let mut specs: Vec<(String, String)> = Vec::new();
    let mut failed = 0;
    for path in &files {
        match compile_file(path, repo, rng, opts.resolve) {
            Ok(json) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                specs.push((name, json));
            }
            Err(e) => {
                failed += 1;
                error!(file = %path.display(), "failed to compile: {:#}", e);
            }
        }
    }
    println!("Read {} inputs", specs.len());

    if opts.csv {
        let count = specs.len();
        let group_size = count / opts.groups;
        if group_size * opts.groups != count {
            return Err(ConfigError::UnevenGroups {
                count,
                groups: opts.groups,
            }
            .into());
        }
        if opts.groups > 1 {
            println!(
                " - Generating {} file(s) with {} records each",
                opts.groups, group_size
            );
            for (i, chunk) in specs.chunks(group_size.max(1)).enumerate() {
                write_csv(&group_path(out, i), chunk)?;
            }
        } else {
            write_csv(out, &specs)?;
        }
    } else {
        for (name, json) in &specs {
            let stem = Path::new(name)
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            let payload = if opts.base64 { encode(json) } else { json.clone() };
            std::fs::write(out.join(format!("{}.json", stem)), payload)?;
        }
    }

    if failed > 0 {
        bail!("{} of {} input(s) failed to compile", failed, files.len());
    }
    Ok(())
}
