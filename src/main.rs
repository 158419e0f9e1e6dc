use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use mailtask::assemble::AssembleOptions;
use mailtask::build::BuildOptions;
use mailtask::cli::{Cli, Commands};
use mailtask::mail::MaildirRepository;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mailtask={}", default_level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = mailtask::config::load_config(cli.config.as_deref())?;
    let maildir = mailtask::resolve::maildir(cli.maildir.as_deref(), &config);
    debug!(maildir = %maildir.display(), "resolved mail directory");

    match cli.command {
        Commands::Build {
            config: input,
            out,
            base64,
            csv,
            groups,
            seed,
        } => {
            let repo = MaildirRepository::new(maildir);
            let opts = BuildOptions {
                out,
                base64,
                csv,
                groups,
                seed,
                resolve: config.resolve,
            };
            mailtask::build::run(&input, &repo, &opts)
        }
        Commands::Assemble {
            config_dir,
            out,
            task,
            conditions,
            seed,
            cap,
            length,
        } => {
            let opts = AssembleOptions {
                task,
                conditions,
                seed,
                cap,
                length,
            };
            mailtask::assemble::run(&config_dir, &out, &opts).map(|_| ())
        }
        Commands::Scan {
            min_size,
            monthly,
            users,
        } => mailtask::mail::scan::run(&maildir, min_size, &users, monthly),
    }
}
