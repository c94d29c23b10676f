//! What `aggtrack` prints. Human reports go to stderr with coloured fields;
//! `--json` swaps them for one document on stdout.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use agg_types::ShadowInstance;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

static JSON: AtomicBool = AtomicBool::new(false);

pub fn use_json(enabled: bool) {
    JSON.store(enabled, Ordering::Relaxed);
}

fn json() -> bool {
    JSON.load(Ordering::Relaxed)
}

/// Emit `doc` in JSON mode, otherwise run `human`.
pub fn report(doc: serde_json::Value, human: impl FnOnce()) {
    if !json() {
        human();
        return;
    }
    match serde_json::to_string_pretty(&doc) {
        Ok(text) => println!("{text}"),
        Err(_) => println!("{doc}"),
    }
}

pub fn field(key: &str, value: impl std::fmt::Display) {
    eprintln!("{} {value}", format!("{key}:").bold());
}

pub fn shadow(s: &ShadowInstance) {
    field("shadow", s.short_id());
}

/// `r3 -> r2`, top first.
pub fn rounds(rounds: &[u32]) {
    let path: Vec<String> = rounds.iter().map(|r| format!("r{r}")).collect();
    field("rounds", path.join(" -> "));
}

/// `subject: outcome`, green when `good`.
pub fn verdict(subject: &str, outcome: &str, good: bool) {
    let outcome = if good { outcome.green() } else { outcome.red() };
    eprintln!("{} {outcome}", format!("{subject}:").bold());
}

/// Shown only to people; JSON consumers read the report fields instead.
pub fn notice(msg: &str) {
    if !json() {
        eprintln!("{}", msg.yellow());
    }
}

/// Spinner while a proof is checked; hidden in JSON mode.
pub fn busy(msg: &str) -> ProgressBar {
    if json() {
        return ProgressBar::hidden();
    }
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    let pb = ProgressBar::new_spinner().with_style(style);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Error for `subject` with a next step for the operator.
pub fn refused(subject: &str, err: impl std::fmt::Display, next: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "{} {}\n{} {next}",
        format!("{subject}:").bold(),
        err.to_string().red(),
        "next:".bold()
    )
}
