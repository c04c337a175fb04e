use std::io::{IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use refassist_core::collaborator::REPORT_FILE_NAME;
use refassist_core::config_file::{self, Overrides, Settings};
use refassist_core::{Command as WsCommand, HttpCollaborator, UploadFile, Workspace};

mod output;

use output::ColorMode;

/// RefAssist - Check bibliographic references against a RefAssist server
#[derive(Parser, Debug)]
#[command(name = "refassist", version, about, long_about = None)]
struct Cli {
    /// Base URL of the RefAssist server
    #[arg(long, global = true)]
    url: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check references, one per line, from a text file or stdin
    Check {
        /// File with one reference per line (reads stdin when omitted)
        file_path: Option<PathBuf>,
    },

    /// Extract references from documents, then check them
    Extract {
        /// Documents to extract from (.docx, .pdf, .tex, .bbl, .txt)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Check references, then download the full report archive
    Download {
        /// File with one reference per line (reads stdin when omitted)
        file_path: Option<PathBuf>,

        /// Directory to save the report archive in
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging();

    let out_dir = match &cli.command {
        Command::Download { out, .. } => out.clone(),
        _ => None,
    };
    // Resolve configuration: CLI flags > env vars > config file > defaults
    let settings = Settings::resolve(
        Overrides {
            base_url: cli.url,
            download_dir: out_dir,
            theme: None,
        },
        &config_file::load_config(),
    );
    tracing::debug!(base_url = %settings.base_url, "resolved settings");

    let color = ColorMode(!cli.no_color && std::io::stdout().is_terminal());
    let collaborator = HttpCollaborator::new(settings.base_url.clone());
    let mut workspace = Workspace::new(settings.download_dir.clone());
    let mut writer = std::io::stdout();

    let ok = match cli.command {
        Command::Check { file_path } => {
            let text = read_references(file_path.as_deref())?;
            check(&mut workspace, &collaborator, text, &mut writer, color).await?
        }
        Command::Extract { files } => {
            extract(&mut workspace, &collaborator, &files, &mut writer, color).await?
        }
        Command::Download { file_path, .. } => {
            let text = read_references(file_path.as_deref())?;
            check(&mut workspace, &collaborator, text, &mut writer, color).await?
                && download(&mut workspace, &collaborator, &mut writer, color).await?
        }
    };

    Ok(if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn read_references(file_path: Option<&Path>) -> anyhow::Result<String> {
    match file_path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("File not found: {}", path.display());
            }
            Ok(std::fs::read_to_string(path)?)
        }
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn spinner(message: &'static str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})") {
        bar.set_style(style);
    }
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

/// Dispatch `command` and drive the resulting job chain behind a spinner.
async fn run_with_spinner(
    workspace: &mut Workspace,
    collaborator: &HttpCollaborator,
    command: WsCommand,
    message: &'static str,
) {
    let Some(job) = workspace.dispatch(command) else {
        return;
    };
    let bar = spinner(message);
    workspace.drive(job, collaborator).await;
    bar.finish_and_clear();
}

/// Returns whether the check produced a report.
async fn check(
    workspace: &mut Workspace,
    collaborator: &HttpCollaborator,
    text: String,
    w: &mut dyn Write,
    color: ColorMode,
) -> anyhow::Result<bool> {
    workspace.dispatch(WsCommand::SetText(text));
    run_with_spinner(workspace, collaborator, WsCommand::Check, "Checking references...").await;

    output::print_report(w, &workspace.session, color)?;
    output::print_notices(w, &workspace.session, color)?;
    output::print_summary(w, &workspace.session, color)?;
    Ok(workspace.session.download_enabled())
}

async fn extract(
    workspace: &mut Workspace,
    collaborator: &HttpCollaborator,
    files: &[PathBuf],
    w: &mut dyn Write,
    color: ColorMode,
) -> anyhow::Result<bool> {
    let mut candidates = Vec::with_capacity(files.len());
    for path in files {
        if !path.exists() {
            anyhow::bail!("File not found: {}", path.display());
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        candidates.push(UploadFile::new(name, std::fs::read(path)?));
    }

    workspace.dispatch(WsCommand::Intake(candidates));
    if workspace.registry.is_empty() {
        output::print_notices(w, &workspace.session, color)?;
        writeln!(w, "No supported files to extract from.")?;
        return Ok(false);
    }

    run_with_spinner(
        workspace,
        collaborator,
        WsCommand::ProcessFiles,
        "Extracting and checking references...",
    )
    .await;

    output::print_files(w, &workspace.registry, color)?;
    output::print_report(w, &workspace.session, color)?;
    output::print_notices(w, &workspace.session, color)?;
    output::print_summary(w, &workspace.session, color)?;
    Ok(workspace.session.download_enabled())
}

async fn download(
    workspace: &mut Workspace,
    collaborator: &HttpCollaborator,
    w: &mut dyn Write,
    color: ColorMode,
) -> anyhow::Result<bool> {
    let notices_before = workspace.session.notices().len();
    run_with_spinner(
        workspace,
        collaborator,
        WsCommand::DownloadReport,
        "Generating report archive...",
    )
    .await;

    if workspace.session.notices().len() > notices_before {
        output::print_notices(w, &workspace.session, color)?;
        return Ok(false);
    }

    let path = workspace.download_dir().join(REPORT_FILE_NAME);
    let canonical = std::fs::canonicalize(&path).unwrap_or(path);
    writeln!(w, "Report saved to: {}", canonical.display())?;
    Ok(true)
}
