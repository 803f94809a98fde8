// Asking the user where to save. The terminal version blocks the tick while you type,
// just like a modal dialog would.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Returns a destination path, or `None` when the user cancels.
pub trait SavePrompt {
    fn ask_path(&mut self) -> Option<PathBuf>;
}

/// Reads one line from a reader (stdin by default). Empty line or EOF cancels.
pub struct TerminalPrompt<R = io::StdinLock<'static>> {
    input: R,
}

impl TerminalPrompt {
    pub fn stdin() -> Self {
        Self { input: io::stdin().lock() }
    }
}

impl<R: BufRead> TerminalPrompt<R> {
    pub fn from_reader(input: R) -> Self {
        Self { input }
    }
}

impl<R: BufRead> SavePrompt for TerminalPrompt<R> {
    fn ask_path(&mut self) -> Option<PathBuf> {
        print!("Save drawing as (PNG, empty to cancel): ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => {
                let path = line.trim();
                (!path.is_empty()).then(|| PathBuf::from(path))
            }
            Err(e) => {
                log::warn!("reading save path: {e}");
                None
            }
        }
    }
}
