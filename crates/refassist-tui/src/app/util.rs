use std::io::Write;
use std::path::Path;

use refassist_core::{Clipboard, ClipboardError, UploadFile};

/// Copies text to the system clipboard via the OSC 52 escape sequence.
/// Works in Ghostty, iTerm2, kitty, WezTerm, and most modern terminals.
#[derive(Debug, Default)]
pub struct Osc52Clipboard;

impl Clipboard for Osc52Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        use base64::Engine;
        let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
        // Write directly to stdout, bypassing the terminal backend buffer
        let mut stdout = std::io::stdout();
        stdout
            .write_all(format!("\x1b]52;c;{}\x07", encoded).as_bytes())
            .and_then(|_| stdout.flush())
            .map_err(|e| ClipboardError(e.to_string()))
    }
}

/// Load a file from disk as an upload candidate named by its final component.
pub(super) fn read_upload(path: &Path) -> std::io::Result<UploadFile> {
    let data = std::fs::read(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    Ok(UploadFile::new(name, data))
}
