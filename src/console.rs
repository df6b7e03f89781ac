// src/console.rs
//! Terminal-backed page elements used by the binary.

use std::io::Write;
use std::sync::Mutex;

use crate::page::{Alert, TextOutput};

/// Prints every text it receives on its own block of stdout.
#[derive(Default)]
pub struct ConsoleOutput {
    current: Mutex<String>,
}

impl ConsoleOutput {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TextOutput for ConsoleOutput {
    fn set_text(&self, text: &str) {
        let mut current = self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *current = text.to_string();

        let mut stdout = std::io::stdout().lock();
        let _ = writeln!(stdout, "{}", text);
        let _ = stdout.flush();
    }

    fn text(&self) -> String {
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

/// Prompts go to stderr so stdout only carries results.
pub struct ConsoleAlert;

impl Alert for ConsoleAlert {
    fn alert(&self, message: &str) {
        eprintln!("⚠️  {}", message);
    }
}
