use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use storycheck::banner::{BannerInfo, print_banner, print_session_summary};
use storycheck::commands::{CommandRegistry, CommandResult, SessionInfo};
use storycheck::config::Config;
use storycheck::evaluation::EvaluationClient;
use storycheck::events::ViewEvent;
use storycheck::render::render;
use storycheck::spinner::Spinner;
use storycheck::transport::http::ReqwestTransport;
use storycheck::view::StoryQualityView;

#[derive(Parser)]
#[command(
    name = "storycheck",
    version,
    about = "Check user story descriptions against an NLP evaluation service."
)]
struct Cli {
    /// Evaluation service base URL (overrides EVALUATION_API_URL)
    #[arg(short, long)]
    api_url: Option<String>,

    /// Request timeout in seconds (at least 1)
    #[arg(short, long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,

    /// Analyze a single description and exit (non-interactive)
    #[arg(short, long)]
    run: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let config = Config::from_env(cli.api_url, Duration::from_secs(cli.timeout))?;
    let transport =
        Arc::new(ReqwestTransport::new(config.timeout).context("failed to build HTTP client")?);
    let client = Arc::new(EvaluationClient::new(transport, &config));
    let view = StoryQualityView::new(client);

    // Single description mode
    if let Some(text) = cli.run {
        let failed = analyze(&view, &text).await;
        view.dispose();
        if failed {
            bail!("analysis failed");
        }
        return Ok(());
    }

    print_banner(&BannerInfo {
        endpoint: view.endpoint(),
        source: config.source(),
        timeout: config.timeout,
    });

    let commands = CommandRegistry::new();

    // Async stdin so Ctrl+C is caught at the prompt too
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        print!("\nstory> ");
        io::stdout().flush()?;

        let line = tokio::select! {
            result = lines.next_line() => {
                match result {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        // Ctrl+D
                        println!();
                        break;
                    }
                    Err(e) => {
                        eprintln!("input error: {}", e);
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        match commands.dispatch(&line, &SessionInfo { view: &view }).await {
            CommandResult::Quit => break,
            CommandResult::Handled => continue,
            CommandResult::NotACommand => {
                analyze(&view, &line).await;
            }
        }
    }

    view.dispose();
    print_session_summary(view.stats());
    Ok(())
}

/// Submit `text`, wait for the result (Ctrl+C cancels), and redraw the view
/// for each completion event. Returns true if the analysis failed.
async fn analyze(view: &StoryQualityView, text: &str) -> bool {
    let mut events = view.subscribe();
    let spinner = Spinner::start("evaluating");
    let handle = view.submit(text);

    tokio::select! {
        _ = handle => {}
        _ = tokio::signal::ctrl_c() => {
            view.cancel_in_flight();
        }
    }
    spinner.stop().await;

    let mut failed = false;
    while let Ok(event) = events.try_recv() {
        match event {
            ViewEvent::Cancelled { .. } => {
                println!("\ninterrupted");
                failed = true;
            }
            ViewEvent::AnalysisFailed { .. } => {
                print!("\n{}", render(&view.snapshot()));
                failed = true;
            }
            event if event.is_completion() => print!("\n{}", render(&view.snapshot())),
            _ => {}
        }
    }
    failed
}
