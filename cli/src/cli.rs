use std::path::PathBuf;
use std::time::Duration;

use canteen::{ClaimMode, ProtocolConfig, ReadyRule, RunConfig};
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ClaimModeCli {
    Locked,
    Unlocked,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReadyRuleCli {
    Outstanding,
    Literal,
}

#[derive(Debug, Parser)]
#[command(name = "canteen", version, about = "Supplier / cook / student canteen simulation")]
pub struct Cli {
    /// Number of cooks (N > 2)
    #[arg(short = 'N', long = "cooks")]
    pub cooks: usize,

    /// Number of students (M > N, M > T)
    #[arg(short = 'M', long = "students")]
    pub students: usize,

    /// Number of tables (T >= 3)
    #[arg(short = 'T', long = "tables")]
    pub tables: usize,

    /// Counter occupancy that triggers a crowding warning (S > 3)
    #[arg(short = 'S', long = "counter-threshold")]
    pub counter_threshold: usize,

    /// Meals per student (L >= 1)
    #[arg(short = 'L', long = "rounds")]
    pub rounds: usize,

    /// File with the plate symbols (P, C, D) the supplier delivers
    #[arg(short = 'F', long = "input")]
    pub input: PathBuf,

    /// Milliseconds a student keeps a table seat
    #[arg(long, default_value_t = 0)]
    pub eat_ms: u64,

    /// How students take a meal off the counter
    #[arg(long, value_enum, default_value_t = ClaimModeCli::Locked)]
    pub claim_mode: ClaimModeCli,

    /// When cooks announce a ready meal
    #[arg(long, value_enum, default_value_t = ReadyRuleCli::Outstanding)]
    pub ready_rule: ReadyRuleCli,
}

/// Convert CLI claim mode → protocol enum
pub(crate) fn cli_to_claim_mode(m: ClaimModeCli) -> ClaimMode {
    match m {
        ClaimModeCli::Locked => ClaimMode::Locked,
        ClaimModeCli::Unlocked => ClaimMode::Unlocked,
    }
}

/// Convert CLI ready rule → protocol enum
pub(crate) fn cli_to_ready_rule(r: ReadyRuleCli) -> ReadyRule {
    match r {
        ReadyRuleCli::Outstanding => ReadyRule::Outstanding,
        ReadyRuleCli::Literal => ReadyRule::Literal,
    }
}

/// Build the run configuration from parsed options (not yet validated)
pub(crate) fn build_config_from_cli(cli: &Cli) -> RunConfig {
    RunConfig::new(
        cli.cooks,
        cli.students,
        cli.tables,
        cli.counter_threshold,
        cli.rounds,
    )
    .with_protocol(ProtocolConfig {
        claim_mode: cli_to_claim_mode(cli.claim_mode),
        ready_rule: cli_to_ready_rule(cli.ready_rule),
        eat_duration: Duration::from_millis(cli.eat_ms),
    })
}
