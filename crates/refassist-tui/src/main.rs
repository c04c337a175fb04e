use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use ratatui::Terminal;
use ratatui::crossterm::event;
use ratatui::crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    supports_keyboard_enhancement,
};
use ratatui::prelude::CrosstermBackend;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use refassist_core::config_file::{self, Overrides, Settings};
use refassist_core::{HttpCollaborator, Job, ThemePreference, View, Workspace};

mod action;
mod app;
mod input;
mod persistence;
mod theme;
mod tui_event;
mod view;

use app::{App, Osc52Clipboard};
use tui_event::{BackendCommand, BackendEvent};

/// RefAssist TUI: check bibliographic references against the RefAssist server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Documents to add to the upload list (.docx, .pdf, .tex, .bbl, .txt)
    paths: Vec<PathBuf>,

    /// Base URL of the RefAssist server
    #[arg(long)]
    url: Option<String>,

    /// Directory the report archive is saved to
    #[arg(long)]
    download_dir: Option<PathBuf>,

    /// Color theme: dark or light (default: last used)
    #[arg(long)]
    theme: Option<String>,
}

fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    // The terminal belongs to the UI, so logs go to a file
    let dir = persistence::log_dir()?;
    let appender = tracing_appender::rolling::never(dir, "refassist-tui.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    let _log_guard = init_logging();

    for path in &args.paths {
        if !path.exists() {
            anyhow::bail!("File not found: {}", path.display());
        }
    }

    // Resolve settings from CLI flags > env vars > config file > defaults
    let file_cfg = config_file::load_config();
    let settings = Settings::resolve(
        Overrides {
            base_url: args.url,
            download_dir: args.download_dir,
            theme: args.theme,
        },
        &file_cfg,
    );
    let collaborator = Arc::new(HttpCollaborator::new(settings.base_url.clone()));
    tracing::info!(base_url = collaborator.base_url(), "starting refassist-tui");
    let workspace =
        Workspace::new(settings.download_dir.clone()).with_clipboard(Box::new(Osc52Clipboard));

    let mut app = App::new(workspace, persistence::preference_store());
    if let Some(pref) = settings.theme.as_deref().and_then(ThemePreference::parse) {
        app.set_theme(pref);
    }

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    // Needed for Ctrl+Enter to be distinguishable from Enter
    let keyboard_enhanced = matches!(supports_keyboard_enhancement(), Ok(true));
    if keyboard_enhanced {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
    }

    // Install panic hook that restores terminal before printing panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        if keyboard_enhanced {
            let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
        }
        let _ = execute!(
            io::stdout(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            DisableBracketedPaste
        );
        original_hook(panic_info);
    }));

    let backend_terminal = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend_terminal)?;

    // Drain any stray input events (e.g. Enter keypress from launching the command)
    while event::poll(Duration::from_millis(50)).unwrap_or(false) {
        let _ = event::read();
    }

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<BackendEvent>();
    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<BackendCommand>();
    let cancel = CancellationToken::new();

    app.backend_cmd_tx = Some(cmd_tx);

    // Files named on the command line go straight onto the upload list
    if !args.paths.is_empty() {
        app.add_paths(&args.paths);
        app.workspace.session.set_active_view(View::Upload);
    }

    // Spawn backend command listener
    let listener_cancel = cancel.clone();
    tokio::spawn(async move {
        loop {
            let cmd = tokio::select! {
                _ = listener_cancel.cancelled() => break,
                cmd = cmd_rx.recv() => match cmd {
                    Some(cmd) => cmd,
                    None => break,
                },
            };
            match cmd {
                BackendCommand::Run(job) => {
                    let kind = job.kind();
                    let run = match &job {
                        Job::Extract(extract) => extract.run().to_vec(),
                        _ => Vec::new(),
                    };
                    let collaborator = Arc::clone(&collaborator);
                    let tx = event_tx.clone();
                    // Each job runs in its own task so a panic is reported
                    // instead of silently losing the completion
                    tokio::spawn(async move {
                        let task =
                            tokio::spawn(async move { job.execute(collaborator.as_ref()).await });
                        let event = match task.await {
                            Ok(completion) => BackendEvent::Completed(completion),
                            Err(e) => {
                                tracing::error!(job = kind.label(), error = %e, "job task failed");
                                BackendEvent::Crashed { kind, run }
                            }
                        };
                        let _ = tx.send(event);
                    });
                }
            }
        }
    });

    // Main event loop
    let tick_rate = Duration::from_millis(1000 / u64::from(settings.fps));

    loop {
        terminal.draw(|f| app.view(f))?;

        tokio::select! {
            maybe_event = event_rx.recv() => {
                if let Some(backend_event) = maybe_event {
                    app.handle_backend_event(backend_event);
                    // Drain any additional queued backend events
                    while let Ok(evt) = event_rx.try_recv() {
                        app.handle_backend_event(evt);
                    }
                }
            }
            _ = async {
                if event::poll(tick_rate).unwrap_or(false)
                    && let Ok(evt) = event::read()
                {
                    let action = input::map_event(&evt, &app.input_mode);
                    app.update(action);
                }
            } => {}
        }

        app.update(action::Action::Tick);

        if app.should_quit {
            cancel.cancel();
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    if keyboard_enhanced {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;

    tracing::info!("refassist-tui exiting");
    Ok(())
}
