mod commands;
mod files;
mod logging;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "aggtrack", about = "Verify aggregate proofs and track verified rounds")]
struct Cli {
    /// Machine-readable output on stdout
    #[arg(long, global = true)]
    json: bool,
    /// Log filter (overrides RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Generate a config and three rounds of sample data
    Sample {
        /// Output directory
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value_t = 4)]
        domain_log_size: u32,
        #[arg(long, default_value_t = 2)]
        advice: usize,
        #[arg(long, default_value_t = 4)]
        instance_len: usize,
        #[arg(long, default_value_t = 4)]
        max_targets: usize,
    },
    /// Verify one round's proof without touching a registry
    Verify {
        #[arg(long)]
        config: PathBuf,
        /// Directory holding the round files
        #[arg(long)]
        dir: PathBuf,
        /// Round name, e.g. r2.0
        #[arg(long)]
        name: String,
        /// Target instance files
        #[arg(long = "target", required = true)]
        targets: Vec<PathBuf>,
    },
    /// Create a registry store administered by --admin
    Init {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        db: PathBuf,
        #[arg(long)]
        admin: String,
    },
    /// Seed trusted round-1 instances (admin only)
    Seed {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        db: PathBuf,
        /// Identity to seed as; must be the store's admin
        #[arg(long)]
        caller: String,
        /// Instance files
        #[arg(required = true)]
        instances: Vec<PathBuf>,
    },
    /// Verify a round's proof and record it in the registry
    Register {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        db: PathBuf,
        #[arg(long)]
        dir: PathBuf,
        #[arg(long)]
        name: String,
        #[arg(long = "target", required = true)]
        targets: Vec<PathBuf>,
    },
    /// Check a verified lineage from a shadow instance down to leaves
    Check {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        db: PathBuf,
        /// Top-level shadow instance file
        #[arg(long)]
        shadow: PathBuf,
        /// Intermediate shadow instance files, top first
        #[arg(long = "chain")]
        chain: Vec<PathBuf>,
        #[arg(long = "target", required = true)]
        targets: Vec<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    output::use_json(cli.json);
    logging::init_with_level(cli.log_level.as_deref());

    match cli.command {
        Cmd::Sample {
            out,
            seed,
            domain_log_size,
            advice,
            instance_len,
            max_targets,
        } => commands::sample::run(&commands::sample::SampleArgs {
            out,
            seed,
            domain_log_size,
            advice,
            instance_len,
            max_targets,
        })?,
        Cmd::Verify {
            config,
            dir,
            name,
            targets,
        } => commands::verify::run(&config, &dir, &name, &targets)?,
        Cmd::Init { config, db, admin } => commands::init::run(&config, &db, &admin)?,
        Cmd::Seed {
            config,
            db,
            caller,
            instances,
        } => commands::seed::run(&config, &db, &caller, &instances)?,
        Cmd::Register {
            config,
            db,
            dir,
            name,
            targets,
        } => commands::register::run(&config, &db, &dir, &name, &targets)?,
        Cmd::Check {
            config,
            db,
            shadow,
            chain,
            targets,
        } => commands::check::run(&config, &db, &shadow, &chain, &targets)?,
    }
    Ok(())
}
