use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::assemble::templates::TaskKind;

#[derive(Parser)]
#[command(name = "mailtask", version, about = "Compile inbox task descriptors and assemble counterbalanced study configurations")]
pub struct Cli {
    /// Log debug diagnostics to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Config file (default: MAILTASK_CONFIG, then mailtask.toml in cwd)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Mail repository root (default: MAILTASK_MAILDIR, then config, then ./maildir)
    #[arg(long, global = true)]
    pub maildir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile a descriptor file (or directory of files) into task JSON
    Build {
        /// Descriptor file or directory to read
        config: PathBuf,

        /// Output file, or directory in directory mode (default: stdout)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Base64 encode output
        #[arg(short, long)]
        base64: bool,

        /// Assemble into CSV upload file(s)
        #[arg(short, long)]
        csv: bool,

        /// Number of CSV files to split directory output into
        #[arg(short, long, default_value_t = 1)]
        groups: usize,

        /// Seed for unread-flag randomness
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Generate descriptor files from sampled inbox orderings
    Assemble {
        /// Directory with inbox definitions and manifest.json
        config_dir: PathBuf,

        /// Output directory
        #[arg(short, long)]
        out: PathBuf,

        /// Task kind to generate
        #[arg(long, value_enum, default_value_t = TaskKind::Commitment)]
        task: TaskKind,

        /// Condition pattern (commitment: fixedacc|between, search: between|within)
        #[arg(short = 'c', long)]
        conditions: Option<String>,

        /// Seed for permutation sampling
        #[arg(short, long)]
        seed: Option<u64>,

        /// Number of permutations to keep (default: all)
        #[arg(short = 'n')]
        cap: Option<usize>,

        /// Length of permutations (default: number of inboxes)
        #[arg(short = 'p')]
        length: Option<usize>,
    },

    /// Survey the mail corpus for inboxes large enough to build tasks from
    Scan {
        /// Minimum inbox size to report
        #[arg(long, default_value_t = 350)]
        min_size: usize,

        /// Bin messages by month and report usable month runs
        #[arg(long)]
        monthly: bool,

        /// Restrict to these users
        #[arg(long = "user")]
        users: Vec<String>,
    },
}
