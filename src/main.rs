use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use blip_chat::api::BlipClient;
use blip_chat::app::ChatApp;
use blip_chat::config::{Config, DEFAULT_QUESTION, DEFAULT_SERVER};
use blip_chat::{handler, tui, ui};

#[derive(Parser)]
#[command(name = "blip-chat")]
#[command(about = "Terminal chat widget for the BLIP answering backend")]
struct Cli {
    /// Base URL of the BLIP server
    #[arg(short, long)]
    server: Option<String>,

    /// Override the predefined question
    #[arg(short, long)]
    question: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(cli.verbose)?;

    let config = Config::load().unwrap_or_else(|_| Config::new());
    let server = cli
        .server
        .or(config.server_url)
        .unwrap_or_else(|| DEFAULT_SERVER.to_string());
    let question = cli
        .question
        .or(config.question)
        .unwrap_or_else(|| DEFAULT_QUESTION.to_string());

    info!(%server, %question, "starting blip-chat");

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();

    let client = BlipClient::new(&server);
    let mut app = ChatApp::new(client, question, events.sender());
    app.initialize();

    let result = run(&mut terminal, &mut events, &mut app).await;

    tui::restore()?;
    result
}

async fn run(terminal: &mut tui::Tui, events: &mut tui::EventHandler, app: &mut ChatApp) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        if let Some(event) = events.next().await {
            handler::handle_event(app, event).await?;
        }

        // Complete the turn once the in-flight request resolves
        app.poll_ask_task().await;
    }
    Ok(())
}

/// The TUI owns stderr, so logs go to a file next to the config.
fn init_logging(verbosity: u8) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let log_dir = Config::config_dir()?;
    std::fs::create_dir_all(&log_dir)?;
    let appender = tracing_appender::rolling::never(log_dir, "blip-chat.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .init();

    Ok(guard)
}
