use std::path::PathBuf;

use clap::{
    ArgAction, ArgGroup, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use tunematch::{
    cli, config, error,
    types::{Category, Owner},
};

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
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Collect and store the rankings of a brand's followers
    Brand(BrandOptions),

    /// Collect and store the rankings of a user
    User(UserOptions),

    /// Show a stored ranking
    Ranking(RankingOptions),

    /// Score a user's taste against a brand's
    Affinity(AffinityOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct BrandOptions {
    /// Identifier the brand rankings are stored under
    #[clap(long)]
    pub brand_id: String,

    /// Text file with one follower ID or profile link per line
    #[clap(long)]
    pub followers: PathBuf,

    /// Checkpoint file (defaults to the data directory)
    #[clap(long)]
    pub checkpoint: Option<PathBuf>,

    /// Discard an existing checkpoint and start over
    #[clap(long)]
    pub fresh: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct UserOptions {
    /// Spotify user ID
    #[clap(long)]
    pub user_id: String,

    /// Only read these playlists (ID or share link); can be repeated
    #[clap(long = "playlist", action = ArgAction::Append, num_args = 1)]
    pub playlists: Vec<String>,

    /// Checkpoint file (defaults to the data directory)
    #[clap(long)]
    pub checkpoint: Option<PathBuf>,

    /// Discard an existing checkpoint and start over
    #[clap(long)]
    pub fresh: bool,
}

#[derive(Parser, Debug, Clone)]
#[clap(group(ArgGroup::new("owner").required(true).args(["user", "brand"])))]
pub struct RankingOptions {
    /// Show the ranking of a user
    #[clap(long)]
    pub user: Option<String>,

    /// Show the ranking of a brand
    #[clap(long)]
    pub brand: Option<String>,

    #[clap(long, value_enum, default_value_t = Category::Artists)]
    pub category: Category,

    /// Only the first N positions
    #[clap(long, conflicts_with = "from")]
    pub top: Option<usize>,

    /// Everything from position N on
    #[clap(long)]
    pub from: Option<usize>,
}

#[derive(Parser, Debug, Clone)]
pub struct AffinityOptions {
    #[clap(long)]
    pub user: String,

    #[clap(long)]
    pub brand: String,

    /// Single category (all three when omitted)
    #[clap(long, value_enum)]
    pub category: Option<Category>,
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
        Command::Brand(opt) => {
            cli::brand(opt.brand_id, opt.followers, opt.checkpoint, opt.fresh).await
        }
        Command::User(opt) => {
            cli::user(opt.user_id, opt.playlists, opt.checkpoint, opt.fresh).await
        }
        Command::Ranking(opt) => {
            let owner = match (opt.user, opt.brand) {
                (Some(user), _) => Owner::User(user),
                (None, Some(brand)) => Owner::Brand(brand),
                (None, None) => error!("Either --user or --brand is required"),
            };
            cli::ranking(owner, opt.category, opt.top, opt.from)
        }
        Command::Affinity(opt) => cli::affinity(opt.user, opt.brand, opt.category),
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
