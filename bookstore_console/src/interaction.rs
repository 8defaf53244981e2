use std::io::{BufRead, Write};

/// Everything the console asks from or tells to the person using it
pub trait Interaction: Send + Sync {
    /// Asks a yes/no question, only an explicit yes counts as consent
    fn confirm(&self, message: &str) -> bool;
    /// Shows a short message that needs no answer
    fn notify(&self, message: &str);
    /// Shows a rendered screen
    fn display(&self, text: &str);
    /// Reads one line for the given label, `None` once input is closed.
    /// An empty answer keeps `current`
    fn prompt(&self, label: &str, current: &str) -> Option<String>;
}

/// Interaction over stdin/stdout
#[derive(Default)]
pub struct TerminalInteraction;

impl TerminalInteraction {
    fn read_line(&self) -> Option<String> {
        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(err) => {
                tracing::error!("Failed to read from stdin: {}", err);
                None
            }
        }
    }

    fn ask(&self, question: &str) {
        let mut stdout = std::io::stdout().lock();
        // A prompt that fails to show still gets its answer read
        let _ = write!(stdout, "{question} ");
        let _ = stdout.flush();
    }
}

impl Interaction for TerminalInteraction {
    fn confirm(&self, message: &str) -> bool {
        self.ask(&format!("{message} [y/N]"));
        self.read_line()
            .map(|answer| matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
            .unwrap_or_default()
    }

    fn notify(&self, message: &str) {
        println!("*** {message}");
    }

    fn display(&self, text: &str) {
        println!("{text}");
    }

    fn prompt(&self, label: &str, current: &str) -> Option<String> {
        if current.is_empty() {
            self.ask(&format!("{label}:"));
        } else {
            self.ask(&format!("{label} [{current}]:"));
        }
        let answer = self.read_line()?;
        if answer.trim().is_empty() {
            Some(current.to_string())
        } else {
            Some(answer.trim().to_string())
        }
    }
}
