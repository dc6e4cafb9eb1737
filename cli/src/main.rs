mod client;
mod render;
mod session;

use clap::{Args, Parser, Subcommand};
use songvote_core::{
    CandidateId, Controller, Direction, FailurePolicy, Intent, ResultsKind, RoundKind, Score,
};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::client::HttpTransport;
use crate::render::{results_table, roster_table};
use crate::session::Session;

#[derive(Parser)]
#[command(name = "songvote", version, about = "Vote on songvote rounds from the terminal")]
struct Cli {
    #[arg(long, env = "SONGVOTE_API_BASE", default_value = "http://localhost:5000")]
    base_url: String,
    #[arg(long, env = "SONGVOTE_TOKEN", hide_env_values = true)]
    token: Option<String>,
    #[arg(long, env = "SONGVOTE_FAILURE_POLICY", default_value = "keep")]
    failure_policy: FailurePolicy,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RoundArg {
    /// `semi-N`, a bare number, or `final`.
    #[arg(long, short, default_value = "semi-1")]
    round: RoundKind,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the roster of a round.
    Roster {
        #[command(flatten)]
        round: RoundArg,
    },
    /// Set or clear the score for one artist.
    Score {
        #[command(flatten)]
        round: RoundArg,
        id: CandidateId,
        #[arg(long, conflicts_with = "clear", required_unless_present = "clear")]
        value: Option<Score>,
        #[arg(long)]
        clear: bool,
    },
    /// Flip the final/winner selection for one artist.
    Toggle {
        #[command(flatten)]
        round: RoundArg,
        id: CandidateId,
    },
    /// Include or remove an artist from the official grand final.
    Official {
        #[command(flatten)]
        round: RoundArg,
        id: CandidateId,
    },
    /// Move an official finalist up or down.
    Move {
        id: CandidateId,
        #[arg(long)]
        direction: Direction,
    },
    /// Print aggregated results.
    Results {
        #[arg(long)]
        grand: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let transport = HttpTransport::new(&cli.base_url, cli.token)?;

    let (kind, intent) = match cli.command {
        Commands::Results { grand } => {
            let kind = if grand {
                ResultsKind::GrandFinal
            } else {
                ResultsKind::SemiFinals
            };
            let session = Session::new(Controller::new(RoundKind::GrandFinal), transport);
            print!("{}", results_table(&session.results(kind).await?));
            return Ok(());
        }
        Commands::Roster { round } => (round.round, None),
        Commands::Score {
            round,
            id,
            value,
            clear,
        } => {
            let score = if clear { None } else { value };
            (round.round, Some(Intent::SetScore { id, score }))
        }
        Commands::Toggle { round, id } => (round.round, Some(Intent::ToggleAdvance { id })),
        Commands::Official { round, id } => (round.round, Some(Intent::ToggleOfficial { id })),
        Commands::Move { id, direction } => {
            (RoundKind::GrandFinal, Some(Intent::Move { id, direction }))
        }
    };

    let controller = Controller::new(kind).with_failure_policy(cli.failure_policy);
    let mut session = Session::new(controller, transport);
    session.load().await?;

    if let Some(intent) = intent {
        let failures = session.dispatch(intent).await?;
        let admin = matches!(intent, Intent::ToggleOfficial { .. } | Intent::Move { .. });
        if !admin {
            // Show what the server actually stored.
            session.load().await?;
        }
        if let Some(err) = failures.into_iter().next() {
            warn!(%err, "not every write was accepted");
            print!("{}", roster_table(&session.controller().rows()));
            return Err(err.into());
        }
    }

    print!("{}", roster_table(&session.controller().rows()));
    Ok(())
}
