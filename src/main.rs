use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use tubestash::{cli, config, error};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with the YouTube API
    Auth,

    /// Forget the cached token
    Logout,

    /// Save videos right away
    Add(AddOptions),

    /// Save every pending video
    Save,

    /// Handle pending videos
    Queue(QueueOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct AddOptions {
    /// Video URLs or ids
    #[clap(required = true)]
    pub videos: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct QueueOptions {
    #[command(subcommand)]
    pub command: QueueSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum QueueSubcommand {
    /// Add videos to the pending queue
    Add(QueueAddOpts),

    /// List pending videos
    List,

    /// Remove a pending video by its handle
    Remove(QueueRemoveOpts),

    /// Remove every pending video
    Clear,
}

#[derive(Parser, Debug, Clone)]
pub struct QueueAddOpts {
    /// Video URLs or ids
    #[clap(required = true)]
    pub videos: Vec<String>,

    /// Title shown in the queue listing
    #[clap(long)]
    pub title: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct QueueRemoveOpts {
    pub handle: u64,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => cli::auth().await,
        Command::Logout => cli::logout().await,
        Command::Add(opt) => cli::add(opt.videos).await,
        Command::Save => cli::save().await,
        Command::Queue(opt) => match opt.command {
            QueueSubcommand::Add(a) => cli::queue_add(a.videos, a.title).await,
            QueueSubcommand::List => cli::queue_list().await,
            QueueSubcommand::Remove(r) => cli::queue_remove(r.handle).await,
            QueueSubcommand::Clear => cli::queue_clear().await,
        },
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
