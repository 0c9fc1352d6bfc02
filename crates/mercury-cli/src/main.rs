use anyhow::Result;
use clap::Parser;
use console::style;
use mercury::models::event::ChatMode;
use mercury::providers::configs::{INCEPTION_HOST, INCEPTION_MODEL};
use mercury::search::tavily::TAVILY_HOST;
use tracing_subscriber::EnvFilter;

mod inputs;
mod prompt;
mod session;

use prompt::cliclack::CliclackPrompt;
use session::{Connection, Session};

#[derive(Parser)]
#[command(author, version, about = "Chat with Mercury from the terminal", long_about = None)]
struct Cli {
    /// Inception Labs API key, asked for when missing
    #[arg(long, env = "INCEPTION_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Tavily API key, enables web search
    #[arg(long, env = "TAVILY_API_KEY", hide_env_values = true)]
    tavily_api_key: Option<String>,

    /// Response mode, streaming or diffusing
    #[arg(short, long, default_value_t = ChatMode::Streaming)]
    mode: ChatMode,

    /// Maximum tokens per reply (50 to 32000)
    #[arg(long, default_value_t = 2000)]
    max_tokens: u32,

    /// Start with web search enabled
    #[arg(long)]
    tools: bool,

    /// Model to use
    #[arg(long, default_value = INCEPTION_MODEL)]
    model: String,

    #[arg(long, env = "MERCURY_INCEPTION_HOST", default_value = INCEPTION_HOST)]
    inception_host: String,

    #[arg(long, env = "MERCURY_TAVILY_HOST", default_value = TAVILY_HOST)]
    tavily_host: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout belongs to the conversation, logs only when asked for
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let cli = Cli::parse();

    println!(
        "Mercury chat {}",
        style("- type /exit to end the session").dim()
    );

    let api_key = match cli.api_key {
        Some(key) => key,
        None => inputs::get_api_key("Inception Labs API key:")?,
    };

    let connection = Connection {
        api_key,
        tavily_api_key: cli.tavily_api_key,
        inception_host: cli.inception_host,
        tavily_host: cli.tavily_host,
        model: cli.model,
    };

    let prompt = Box::new(CliclackPrompt::new());
    let mut session = Session::new(connection, prompt)
        .with_mode(cli.mode)
        .with_max_tokens(cli.max_tokens)
        .with_tools(cli.tools);
    session.start().await
}
