use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "tasko-cli", version, about = "Tasko CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Focus timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Cosmic reward ledger
    Rewards {
        #[command(subcommand)]
        action: commands::rewards::RewardsAction,
    },
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Category management
    Category {
        #[command(subcommand)]
        action: commands::category::CategoryAction,
    },
    /// Blocked-resource management
    Blocklist {
        #[command(subcommand)]
        action: commands::blocklist::BlocklistAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Dashboard statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Rewards { action } => commands::rewards::run(action),
        Commands::Task { action } => commands::task::run(action),
        Commands::Category { action } => commands::category::run(action),
        Commands::Blocklist { action } => commands::blocklist::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Stats { action } => commands::stats::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
