use clap::{CommandFactory, Parser, Subcommand};

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "ritmo", version, about = "Ritmo engagement coach CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a participant
    Register {
        /// Participant id
        participant_id: String,
        /// Participant category (groupA or groupB)
        category: String,
    },
    /// Survey flow
    Flow {
        #[command(subcommand)]
        action: commands::flow::FlowAction,
    },
    /// Current-window engagement score
    Score {
        /// Participant id
        participant_id: String,
        /// Window granularity (day, week, month)
        #[arg(long, default_value = "day")]
        granularity: String,
    },
    /// Progress series, most recent first
    Progress {
        /// Participant id
        participant_id: String,
        /// Series granularity (day, week, month)
        #[arg(long, default_value = "day")]
        granularity: String,
        /// Number of windows to cover
        #[arg(long, default_value = "10")]
        items: usize,
    },
    /// Render the completion report
    Report {
        /// Participant id
        participant_id: String,
        /// Report date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Participant statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Health check
    Ping,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Run the scheduler loop, firing reminders and surveys
    Serve,
    /// Generate shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Register {
            participant_id,
            category,
        } => commands::register::run(&participant_id, &category).await,
        Commands::Flow { action } => commands::flow::run(action).await,
        Commands::Score {
            participant_id,
            granularity,
        } => commands::score::run(&participant_id, &granularity).await,
        Commands::Progress {
            participant_id,
            granularity,
            items,
        } => commands::progress::run(&participant_id, &granularity, items).await,
        Commands::Report {
            participant_id,
            date,
        } => commands::report::run(&participant_id, date.as_deref()).await,
        Commands::Stats { action } => commands::stats::run(action).await,
        Commands::Ping => commands::ping::run().await,
        Commands::Config { action } => commands::config::run(action),
        Commands::Serve => commands::serve::run().await,
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "ritmo",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
