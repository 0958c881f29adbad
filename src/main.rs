use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use swiss_tournament::api::state::AppState;
use swiss_tournament::config::AppConfig;
use swiss_tournament::engine::{Tournament, TournamentError};
use swiss_tournament::models::{GameId, Pairing, PersonId, RivalId, RoundPlan, StandingsRow};
use swiss_tournament::recorder::RecordError;
use swiss_tournament::storage::{FileStore, MemoryStore, StorageConfig, TournamentStore};

#[derive(Parser)]
#[command(name = "swiss")]
#[command(about = "Swiss-system tournament standings and pairings")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the configuration file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a person and optionally register them in a game
    Register {
        name: String,

        /// Register an existing person instead of creating one
        #[arg(long)]
        person_id: Option<u64>,

        #[arg(long)]
        game: Option<String>,
    },

    /// Report the outcome of a match
    Report {
        game: String,

        /// Reporting player's rival id
        player: u64,

        /// won, lost or draw; omit for a bye
        #[arg(long)]
        status: Option<String>,

        /// Opponent's rival id; omit for a bye
        #[arg(long)]
        opponent: Option<u64>,
    },

    /// Show ranked standings
    Standings {
        #[arg(long)]
        game: Option<String>,
    },

    /// Plan the next round of a game
    Pairings { game: String },

    /// List games with registrations
    Games,

    /// Count registered players
    Count {
        #[arg(long)]
        game: Option<String>,
    },

    /// Delete match records
    DeleteMatches {
        #[arg(long)]
        game: Option<String>,
    },

    /// Delete one person, or everyone, with their registrations and matches
    DeletePlayers {
        #[arg(long)]
        person_id: Option<u64>,
    },

    /// Start the HTTP API server
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,

        /// Keep everything in memory instead of the data directory
        #[arg(long)]
        memory: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(log_level) = cli.log_level {
        config.log_level = log_level;
    }
    config.validate()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::debug!("Starting swiss v{}", env!("CARGO_PKG_VERSION"));

    let in_memory = matches!(cli.command, Commands::Serve { memory: true, .. });
    let store: Arc<dyn TournamentStore> = if in_memory {
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(FileStore::new(StorageConfig::new(config.data_dir.clone())))
    };
    let tournament = Arc::new(Tournament::new(store, Arc::new(config.tournament.seeding)));

    match cli.command {
        Commands::Register {
            name,
            person_id,
            game,
        } => {
            let enrollment = tournament
                .register_player(name, person_id.map(PersonId), game.map(GameId::new))
                .await?;
            match enrollment.rival_id {
                Some(rival) => println!(
                    "Person {} registered as rival {}",
                    enrollment.person_id, rival
                ),
                None => println!("Person {} added", enrollment.person_id),
            }
        }
        Commands::Report {
            game,
            player,
            status,
            opponent,
        } => {
            let result = tournament
                .report_outcome(
                    GameId::new(game),
                    RivalId(player),
                    status,
                    opponent.map(RivalId),
                )
                .await;
            match result {
                Ok(record) => println!(
                    "Recorded match {} in round {}",
                    record.match_id, record.round
                ),
                Err(TournamentError::Record(
                    err @ (RecordError::InvalidStatus(_) | RecordError::DuplicateMatch(_)),
                )) => {
                    println!("Not recorded: {}", err);
                }
                Err(err) => return Err(err.into()),
            }
        }
        Commands::Standings { game } => {
            let rows = tournament.standings(game.map(GameId::new)).await?;
            print_standings(&rows);
        }
        Commands::Pairings { game } => match tournament.next_pairings(GameId::new(game)).await? {
            RoundPlan::Pairings { round, pairings } => {
                println!("=== Round {} ===", round);
                for pairing in &pairings {
                    match pairing {
                        Pairing::Match { a, b } => println!(
                            "  {} ({}) vs {} ({})",
                            a.name, a.rival_id, b.name, b.rival_id
                        ),
                        Pairing::Bye { player } => {
                            println!("  {} ({}) has a bye", player.name, player.rival_id)
                        }
                    }
                }
            }
            RoundPlan::Complete { standings } => {
                println!("Tournament complete. Final standings:");
                print_standings(&standings);
            }
        },
        Commands::Games => {
            let games = tournament.list_games().await?;
            if games.is_empty() {
                println!("No games registered.");
            }
            for summary in games {
                println!(
                    "{:<24} {:>4} players {:>5} matches",
                    summary.game, summary.players, summary.matches
                );
            }
        }
        Commands::Count { game } => {
            let count = tournament.count_players(game.map(GameId::new)).await?;
            println!("{}", count);
        }
        Commands::DeleteMatches { game } => {
            let deleted = tournament.delete_matches(game.map(GameId::new)).await?;
            println!("Deleted {} matches", deleted);
        }
        Commands::DeletePlayers { person_id } => {
            let removed = tournament.delete_players(person_id.map(PersonId)).await?;
            println!(
                "Deleted {} persons, {} registrations, {} matches",
                removed.persons, removed.registrations, removed.matches
            );
        }
        Commands::Serve { host, port, .. } => {
            let host = host.unwrap_or(config.server.host);
            let port = port.unwrap_or(config.server.port);
            let state = AppState {
                tournament,
                cors_origin: config.server.cors_origin,
            };
            let app = swiss_tournament::api::build_router(state);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

fn print_standings(rows: &[StandingsRow]) {
    println!(
        "{:>4}  {:<24} {:>6}  {:<10} {:>5}",
        "Rank", "Name", "Rival", "Record", "Games"
    );
    for (i, row) in rows.iter().enumerate() {
        println!(
            "{:>4}  {:<24} {:>6}  {:<10} {:>5}",
            i + 1,
            row.name,
            row.rival_id,
            row.record(),
            row.matches_played
        );
    }
}
