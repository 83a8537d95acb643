use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use promanage_core::{logging, Config};

mod commands;

#[derive(Parser)]
#[command(name = "promanage", version, about = "ProManage project scheduler")]
struct Cli {
    /// Enable debug logging (overrides the configured level)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Project management
    Project {
        #[command(subcommand)]
        action: commands::project::ProjectAction,
    },
    /// Schedule generation
    Schedule {
        #[command(subcommand)]
        action: commands::schedule::ScheduleAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Interactive numbered menu
    Menu,
    /// Print shell completions to stdout
    Completions {
        /// Target shell
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        "debug".to_string()
    } else {
        Config::load_or_default().logging.level
    };
    logging::init(&level);

    let result = match cli.command {
        Commands::Project { action } => commands::project::run(action),
        Commands::Schedule { action } => commands::schedule::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Menu => commands::menu::run(),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "promanage", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "command failed");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
