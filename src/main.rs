use std::path::PathBuf;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use neuraops_assistant::config::{APP_ID, APP_NAME, DEFAULT_SETTINGS_FILE, SETTINGS_ENV, VERSION};
use neuraops_assistant::models::{Conversation, Turn};
use neuraops_assistant::services::conversation::{
    preview, BUSY_NOTICE, INPUT_PLACEHOLDER, PENDING_INDICATOR, SUGGESTED_QUESTIONS,
};
use neuraops_assistant::services::export::export_to_markdown;
use neuraops_assistant::services::{ChatSession, RejectReason, SettingsService, SubmitOutcome};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let settings_path = std::env::var_os(SETTINGS_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));
    let settings = SettingsService::load(&settings_path).await;
    tracing::info!(app_id = APP_ID, version = VERSION, "Starting");

    let session = ChatSession::new(settings);
    println!("{} {}", APP_NAME, VERSION);
    println!("Commands: /suggest, /export, /quit");
    println!("{}\n", INPUT_PLACEHOLDER);

    let stop_rendering = CancellationToken::new();
    let renderer = tokio::spawn(render_turns(session.subscribe(), stop_rendering.clone()));

    let mut host = Host::new(session);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if let Flow::Quit = host.handle_line(&line) {
            break;
        }
    }

    host.finish().await;
    stop_rendering.cancel();
    renderer.await?;
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Dispatches input lines and keeps track of submissions still in flight.
struct Host {
    session: ChatSession,
    pending: JoinSet<SubmitOutcome>,
}

impl Host {
    fn new(session: ChatSession) -> Self {
        Self {
            session,
            pending: JoinSet::new(),
        }
    }

    fn handle_line(&mut self, line: &str) -> Flow {
        match line.trim() {
            "/quit" => return Flow::Quit,
            "/export" => println!("{}", export_to_markdown(&self.session.snapshot())),
            "/suggest" => {
                for question in SUGGESTED_QUESTIONS {
                    println!("  - {}", question);
                }
            }
            "" => {}
            _ if self.session.is_thinking() => println!("  {}", BUSY_NOTICE),
            _ => {
                let session = self.session.clone();
                let text = line.to_string();
                self.pending.spawn(async move {
                    let outcome = session.submit(&text).await;
                    if outcome == SubmitOutcome::Rejected(RejectReason::Busy) {
                        println!("  {}", BUSY_NOTICE);
                    }
                    outcome
                });
            }
        }
        Flow::Continue
    }

    /// Wait for every pending reply, then stop the session.
    async fn finish(mut self) -> Vec<SubmitOutcome> {
        let mut outcomes = Vec::new();
        while let Some(joined) = self.pending.join_next().await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => tracing::error!("Submission task failed: {}", e),
            }
        }
        self.session.shutdown();
        outcomes
    }
}

/// Print each new turn as it is published, plus the pending indicator.
/// Once `stop` fires, prints whatever is left and returns.
async fn render_turns(mut rx: watch::Receiver<Conversation>, stop: CancellationToken) {
    let mut printed = 0;
    let mut was_thinking = false;
    let mut stopping = false;

    loop {
        {
            let conv = rx.borrow_and_update();
            for turn in conv.turns().iter().skip(printed) {
                print_turn(turn);
            }
            printed = conv.turn_count();

            if conv.is_thinking() && !was_thinking {
                if let Some(query) = conv.last_turn() {
                    println!("  {} ({})", PENDING_INDICATOR, preview(&query.content));
                }
            }
            was_thinking = conv.is_thinking();
        }

        if stopping {
            break;
        }
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = stop.cancelled() => stopping = true,
        }
    }
}

fn print_turn(turn: &Turn) {
    println!(
        "[{}] {}: {}",
        turn.timestamp.format("%H:%M"),
        turn.role.as_str(),
        turn.content
    );
    for insight in &turn.insights {
        println!("    [{}] {}: {}", insight.kind.label(), insight.title, insight.body);
    }
}
