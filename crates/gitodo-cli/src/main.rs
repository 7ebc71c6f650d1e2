mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, repo::RepoSubcommand, todo::TodoSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "gitodo",
    about = "Per-repository todo lists, open items first",
    version,
    propagate_version = true
)]
struct Cli {
    /// Data root (default: nearest ancestor with .gitodo/, else the current directory)
    #[arg(long, global = true, env = "GITODO_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create .gitodo/ with a default config
    Init,

    /// Manage tracked repositories
    Repo {
        #[command(subcommand)]
        subcommand: RepoSubcommand,
    },

    /// Manage a repository's todos
    Todo {
        #[command(subcommand)]
        subcommand: TodoSubcommand,
    },

    /// Open/done counts for every tracked repository
    Widget,

    /// Inspect and validate the configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Repo { subcommand } => cmd::repo::run(&root, subcommand, cli.json),
        Commands::Todo { subcommand } => cmd::todo::run(&root, subcommand, cli.json),
        Commands::Widget => cmd::widget::run(&root, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
