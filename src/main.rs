use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use sunoproxy::{cli, config, error};

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
    /// Run the HTTP proxy
    Serve(ServeOptions),

    /// Renew the session token and print it
    Token,

    /// Show remaining credits and plan details
    Credits,

    /// List downloadable clips from your library
    Clips(ClipsOptions),

    /// Download clips as MP3 (or WAV) files
    Download(DownloadOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ServeOptions {
    /// Address to bind, overrides SERVER_ADDRESS
    #[clap(long)]
    pub addr: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ClipsOptions {
    /// Clips per page
    #[clap(long, default_value_t = 20)]
    pub limit: u32,

    /// Fetch every page instead of only the first one
    #[clap(long)]
    pub all: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct DownloadOptions {
    /// Clip IDs to download
    #[clap(required = true)]
    pub clip_ids: Vec<String>,

    /// Target directory
    #[clap(long, default_value = "./downloads")]
    pub dir: String,

    /// Convert to WAV on Suno and download that instead of the MP3
    #[clap(long)]
    pub wav: bool,
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
        Command::Serve(opt) => cli::serve(opt.addr).await,
        Command::Token => cli::token().await,
        Command::Credits => cli::credits().await,
        Command::Clips(opt) => cli::clips(opt.limit, opt.all).await,
        Command::Download(opt) => cli::download(opt.clip_ids, opt.dir, opt.wav).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
