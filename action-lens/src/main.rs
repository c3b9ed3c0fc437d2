//! action-lens: watch and replay actions from an instrumented application
//!
//! ```sh
//! # Listen for a host on the default address
//! action-lens
//!
//! # Keep records across restarts, hide the dispatch box
//! action-lens --session lens.json --no-dispatch
//!
//! # Inspect a recorded run
//! action-lens --replay run.jsonl
//! ```

use std::cell::RefCell;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use action_lens::config::{Args, Config, Source};
use action_lens::state::{AppState, TICK_MS};
use action_lens::transport::{self, HostLink};
use action_lens::{reducer, Action, Effect, Inspector};
use action_lens_core::{
    EffectContext, EffectRuntime, EffectStoreWithMiddleware, FileSessionStore, LoggingMiddleware,
    SessionStore,
};
use base64::Engine;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// How often a changed session is written out
const PERSIST_INTERVAL: Duration = Duration::from_millis(500);

/// Saves run on blocking threads; the lock keeps them from overlapping
type SharedSessionStore = Arc<Mutex<FileSessionStore>>;

/// The terminal belongs to the TUI, so logs go to a file or nowhere
fn init_logging(log_file: Option<&Path>) -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match log_file {
        Some(path) => {
            let file = File::create(path)?;
            if let Err(e) = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
            {
                eprintln!("Warning: logging to {} is disabled: {e}", path.display());
            }
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::sink)
                .try_init();
        }
    }
    Ok(())
}

/// Where the records come from, resolved before the TUI starts
enum Feed {
    Live(tokio::net::TcpListener),
    Replay(Vec<Action>),
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let config = match Config::from_args(Args::parse()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    };
    init_logging(config.log_file.as_deref())?;

    let session_store = config.session.clone().map(FileSessionStore::new);
    let mut state = match session_store.as_ref().map(|store| store.load()) {
        Some(Ok(Some(snapshot))) => AppState::from_session(config.panels, snapshot),
        Some(Ok(None)) | None => AppState::new(config.panels),
        Some(Err(e)) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    state.persist = session_store.is_some();

    // Bind before entering TUI mode so address errors reach the shell
    let (feed, idle_label) = match &config.source {
        Source::Listen(addr) => match transport::bind(addr).await {
            Ok(listener) => (Feed::Live(listener), format!("listening on {addr}")),
            Err(e) => {
                eprintln!("Error: {e}");
                eprintln!("Pass another address with --listen");
                std::process::exit(1);
            }
        },
        Source::Replay(path) => match transport::read_replay(path).await {
            Ok(actions) => (Feed::Replay(actions), format!("replay of {}", path.display())),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
    };

    // ===== Terminal setup =====
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let inspector = Inspector::new(config.keybindings, idle_label);
    let result = run_app(&mut terminal, state, feed, inspector, session_store).await;

    // ===== Cleanup =====
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    state: AppState,
    feed: Feed,
    inspector: Inspector,
    session_store: Option<FileSessionStore>,
) -> io::Result<()> {
    let middleware = LoggingMiddleware::new().quiet(&["Tick", "SessionFlush"]);
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);
    let mut runtime = EffectRuntime::from_store(store);

    runtime
        .subscriptions()
        .interval("tick", Duration::from_millis(TICK_MS), || Action::Tick);

    let session_store: Option<SharedSessionStore> =
        session_store.map(|store| Arc::new(Mutex::new(store)));
    if session_store.is_some() {
        runtime
            .subscriptions()
            .interval("persist", PERSIST_INTERVAL, || Action::SessionFlush);
    }

    let link = HostLink::new();
    let cancel = CancellationToken::new();
    match feed {
        Feed::Live(listener) => {
            let host = transport::spawn_listener(listener, link.clone(), cancel.clone());
            runtime.subscriptions().stream("host", host);
        }
        Feed::Replay(actions) => {
            for action in actions {
                runtime.enqueue(action);
            }
        }
    }

    let ui = RefCell::new(inspector);
    let result = runtime
        .run(
            terminal,
            |frame, area, state| ui.borrow_mut().render(frame, area, state),
            |event, state| ui.borrow_mut().map_event(event, state),
            |action| matches!(action, Action::Quit),
            |effect, ctx| handle_effect(effect, ctx, &link, session_store.as_ref()),
        )
        .await;

    cancel.cancel();

    // pending saves were dropped with the runtime's tasks
    let saved = match &session_store {
        Some(store) => {
            let store = store.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            runtime.state().save_session(&*store).map_err(|e| {
                tracing::error!(error = %e, "Session not saved on exit");
                io::Error::other(e)
            })
        }
        None => Ok(()),
    };
    result.and(saved)
}

fn handle_effect(
    effect: Effect,
    ctx: &mut EffectContext<Action>,
    link: &HostLink,
    session_store: Option<&SharedSessionStore>,
) {
    match effect {
        Effect::SendDispatch(action) => {
            let link = link.clone();
            ctx.tasks().spawn("dispatch", async move {
                match link.send(&action).await {
                    Ok(()) => Action::DispatchDidSucceed,
                    Err(e) => Action::DispatchDidFail(e.to_string()),
                }
            });
        }
        Effect::CopyToClipboard(text) => {
            let action = match copy_osc52(&text) {
                Ok(()) => Action::CopyDidSucceed,
                Err(e) => Action::CopyDidFail(e.to_string()),
            };
            ctx.emit(action);
        }
        Effect::PersistSession(snapshot) => {
            let Some(store) = session_store.cloned() else {
                return;
            };
            ctx.tasks().spawn("persist", async move {
                let saved = tokio::task::spawn_blocking(move || {
                    let store = store.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                    store.save(&snapshot)
                })
                .await;
                match saved {
                    Ok(Ok(())) => Action::SessionDidSave,
                    Ok(Err(e)) => Action::SessionDidFail(e.to_string()),
                    Err(e) => Action::SessionDidFail(e.to_string()),
                }
            });
        }
    }
}

/// Hand text to the terminal's clipboard with an OSC 52 sequence
fn copy_osc52(text: &str) -> io::Result<()> {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text);
    let mut stdout = io::stdout();
    write!(stdout, "\x1b]52;c;{encoded}\x07")?;
    stdout.flush()
}
