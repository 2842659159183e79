//! Line-by-line command runner shared by the REPL and script mode.

use anyhow::{Context, Result};
use std::io::{BufRead, Write};

use crate::graph::{help_text, parse_line, GraphEngine, GraphError, Outcome, ParsedLine};
use crate::{Config, OutputFormat};

/// Counters for one `Shell::run` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShellStats {
    /// Commands that completed
    pub executed: usize,
    /// Lines rejected by the parser or the engine
    pub failed: usize,
}

/// Drives a [`GraphEngine`] from text input.
///
/// Graph errors are written to the output and the session continues,
/// unless `fail_fast` is set. I/O failures abort the run.
pub struct Shell {
    engine: GraphEngine,
    format: OutputFormat,
    fail_fast: bool,
    prompt: Option<String>,
}

impl Shell {
    pub fn new(engine: GraphEngine, format: OutputFormat) -> Self {
        Self {
            engine,
            format,
            fail_fast: false,
            prompt: None,
        }
    }

    /// Build an engine from the config and wrap it.
    pub fn from_config(config: &Config) -> Self {
        Self::new(GraphEngine::new(config.mode, &config.spectrum), config.output)
    }

    /// Stop at the first failing line.
    pub fn fail_fast(mut self, enabled: bool) -> Self {
        self.fail_fast = enabled;
        self
    }

    /// Print `prompt` before reading each line (interactive mode).
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn engine(&self) -> &GraphEngine {
        &self.engine
    }

    /// Execute every line of `input`, writing results to `output`.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<ShellStats> {
        let mut stats = ShellStats::default();
        let mut lines = input.lines();

        loop {
            if let Some(prompt) = &self.prompt {
                write!(output, "{}", prompt)?;
                output.flush()?;
            }
            let Some(line) = lines.next() else {
                break;
            };
            let line = line.context("Failed to read input line")?;

            match self.run_line(&line) {
                Ok(None) => {}
                Ok(Some(text)) => {
                    writeln!(output, "{}", text)?;
                    stats.executed += 1;
                }
                Err(e) => {
                    tracing::warn!(line = %line.trim(), error = %e, "Command failed");
                    writeln!(output, "{}", self.render_error(&e))?;
                    stats.failed += 1;
                    if self.fail_fast {
                        break;
                    }
                }
            }
        }

        output.flush()?;
        tracing::info!(
            executed = stats.executed,
            failed = stats.failed,
            "Shell session finished"
        );
        Ok(stats)
    }

    /// Parse and execute one line. `Ok(None)` for blank and comment lines.
    fn run_line(&mut self, line: &str) -> Result<Option<String>, GraphError> {
        match parse_line(line)? {
            ParsedLine::Empty => Ok(None),
            ParsedLine::Help(text) => Ok(Some(self.render_help(text))),
            ParsedLine::Command(command) => {
                let outcome = self.engine.execute(command)?;
                Ok(Some(self.render(&outcome)))
            }
        }
    }

    fn render(&self, outcome: &Outcome) -> String {
        match self.format {
            OutputFormat::Text => outcome.to_string(),
            OutputFormat::Json => serde_json::to_string(outcome)
                .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }).to_string()),
        }
    }

    fn render_help(&self, text: String) -> String {
        let text = if text.trim().is_empty() { help_text() } else { text };
        match self.format {
            OutputFormat::Text => text.trim_end().to_string(),
            OutputFormat::Json => serde_json::json!({ "help": text }).to_string(),
        }
    }

    fn render_error(&self, error: &GraphError) -> String {
        match self.format {
            OutputFormat::Text => format!("error: {}", error),
            OutputFormat::Json => serde_json::json!({ "error": error.to_string() }).to_string(),
        }
    }
}
