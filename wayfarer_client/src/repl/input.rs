//! Terminal input handling for the REPL.
//!
//! Wraps rustyline configuration and completion tailored to the client's command
//! set. Reading blocks, so it runs on its own thread and talks to the event loop
//! over channels.

use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::thread;

use anyhow::{Context as _, Result};
use log::{info, warn};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use tokio::sync::mpsc;

/// Outcome of reading a line from the REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Line(String),
    Eof,
    Interrupted,
}

const COMMAND_TERMS: &[&str] = &[
    "attack", "combat", "drop", "east", "enemies", "examine", "exits", "go", "help", "inventory", "items", "local",
    "look", "move", "north", "quit", "refresh", "reload", "south", "status", "take", "use", "west",
];

type ReplEditor = rustyline::Editor<WayfarerHelper, DefaultHistory>;

#[derive(Default)]
struct WayfarerHelper;

impl Helper for WayfarerHelper {}

impl Completer for WayfarerHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Self::Candidate>)> {
        let (start, prefix) = current_prefix(line, pos);
        // only the command word completes; entry names come from the server
        if prefix.is_empty() || prefix.contains(char::is_whitespace) {
            return Ok((start, Vec::new()));
        }
        let lower = prefix.to_lowercase();
        let pairs = COMMAND_TERMS
            .iter()
            .filter(|term| term.starts_with(&lower))
            .map(|term| Pair {
                display: (*term).to_string(),
                replacement: (*term).to_string(),
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for WayfarerHelper {
    type Hint = String;
}

impl Highlighter for WayfarerHelper {}

impl Validator for WayfarerHelper {}

fn current_prefix(line: &str, pos: usize) -> (usize, String) {
    let slice = &line[..pos];
    let trimmed = slice.trim_start_matches(char::is_whitespace);
    let start = pos - trimmed.len();
    (start, trimmed.to_string())
}

/// Helper responsible for managing the interactive input backend.
///
/// Prefers `rustyline` when an interactive terminal is available, falling back to
/// a basic stdin reader otherwise.
pub struct InputManager {
    backend: Backend,
}

impl InputManager {
    pub fn new(keep_history: bool) -> Self {
        let backend = if io::stdin().is_terminal() {
            match RustylineInput::new(keep_history) {
                Ok(editor) => {
                    info!("using rustyline-backed REPL input");
                    Backend::Rustyline(editor)
                },
                Err(err) => {
                    warn!("failed to initialize rustyline ({err}), falling back to basic stdin");
                    Backend::plain()
                },
            }
        } else {
            info!("stdin is not a TTY; using basic input mode");
            Backend::plain()
        };

        Self { backend }
    }

    /// Read a line from the current backend. If the interactive backend reports an
    /// unrecoverable error, switch to the plain stdin backend and retry once.
    pub fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        match self.backend.read_line(prompt) {
            Ok(event) => Ok(event),
            Err(err) => {
                if self.backend.is_rustyline() {
                    warn!("rustyline input failed: {err} -- switching to basic stdin");
                    self.backend = Backend::plain();
                    self.backend.read_line(prompt)
                } else {
                    Err(err)
                }
            },
        }
    }
}

enum Backend {
    Rustyline(RustylineInput),
    Plain(StdinInput),
}

impl Backend {
    fn plain() -> Self {
        Backend::Plain(StdinInput::default())
    }

    fn is_rustyline(&self) -> bool {
        matches!(self, Backend::Rustyline(_))
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        match self {
            Backend::Rustyline(editor) => editor.read_line(prompt),
            Backend::Plain(stdin) => stdin.read_line(prompt),
        }
    }
}

struct RustylineInput {
    editor: ReplEditor,
    history_path: Option<PathBuf>,
}

impl RustylineInput {
    fn new(keep_history: bool) -> io::Result<Self> {
        let mut editor = rustyline::Editor::<WayfarerHelper, _>::new().map_err(map_io_err)?;
        editor.set_helper(Some(WayfarerHelper));
        let history_path = if keep_history { history_file_path() } else { None };

        if let Some(path) = history_path.as_ref() {
            if let Some(dir) = path.parent()
                && let Err(err) = fs::create_dir_all(dir)
            {
                warn!("failed to create history directory {}: {err}", dir.display());
            }

            if let Err(err) = editor.load_history(path) {
                match err {
                    ReadlineError::Io(ref io_err) if io_err.kind() == io::ErrorKind::NotFound => {
                        info!("no prior history found at {}, starting fresh", path.display());
                    },
                    other => {
                        warn!("failed to load history from {}: {other}", path.display());
                    },
                }
            }
        }

        Ok(Self { editor, history_path })
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    if let Err(err) = self.editor.add_history_entry(line.as_str()) {
                        warn!("failed to append to history: {err}");
                    }
                    if let Some(path) = self.history_path.as_ref()
                        && let Err(err) = self.editor.save_history(path)
                    {
                        warn!("failed to persist history to {}: {err}", path.display());
                    }
                }
                Ok(InputEvent::Line(line))
            },
            Err(err) => convert_readline_error(err),
        }
    }
}

#[derive(Default)]
struct StdinInput {
    buffer: String,
}

impl StdinInput {
    fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        print!("{prompt}");
        io::stdout().flush()?;

        self.buffer.clear();
        let bytes = io::stdin().read_line(&mut self.buffer)?;
        if bytes == 0 {
            return Ok(InputEvent::Eof);
        }

        if self.buffer.ends_with('\n') {
            self.buffer.pop();
            if self.buffer.ends_with('\r') {
                self.buffer.pop();
            }
        }

        Ok(InputEvent::Line(self.buffer.clone()))
    }
}

fn convert_readline_error(err: ReadlineError) -> io::Result<InputEvent> {
    match err {
        ReadlineError::Interrupted => Ok(InputEvent::Interrupted),
        ReadlineError::Eof => Ok(InputEvent::Eof),
        ReadlineError::Io(io_err) => Err(io_err),
        other => Err(io::Error::other(other)),
    }
}

fn map_io_err(err: ReadlineError) -> io::Error {
    match err {
        ReadlineError::Io(io_err) => io_err,
        other => io::Error::other(other),
    }
}

fn history_file_path() -> Option<PathBuf> {
    dirs::data_dir()
        .or_else(dirs::data_local_dir)
        .map(|base| build_history_path(&base))
}

fn build_history_path(base: &Path) -> PathBuf {
    let mut path = base.to_path_buf();
    path.push("wayfarer");
    path.push("history.txt");
    path
}

/// The event loop's end of the input thread.
///
/// The thread reads one line per prompt it is sent, so nothing is read until the
/// loop has finished drawing.
pub struct InputChannel {
    prompts: mpsc::Sender<String>,
    events: mpsc::Receiver<InputEvent>,
}

impl InputChannel {
    /// Start the input thread.
    ///
    /// # Errors
    /// - if the thread cannot be spawned
    pub fn spawn(keep_history: bool) -> Result<Self> {
        let (prompt_tx, mut prompt_rx) = mpsc::channel::<String>(1);
        let (event_tx, event_rx) = mpsc::channel(1);
        thread::Builder::new()
            .name("wayfarer-input".into())
            .spawn(move || {
                let mut input = InputManager::new(keep_history);
                while let Some(prompt) = prompt_rx.blocking_recv() {
                    let event = input.read_line(&prompt).unwrap_or_else(|err| {
                        warn!("input failed: {err}");
                        InputEvent::Eof
                    });
                    let done = event == InputEvent::Eof;
                    if event_tx.blocking_send(event).is_err() || done {
                        break;
                    }
                }
                info!("input thread finished");
            })
            .context("spawning the input thread")?;
        Ok(Self {
            prompts: prompt_tx,
            events: event_rx,
        })
    }

    /// Ask for the next line. A closed input is reported by [`InputChannel::recv`] as `None`.
    pub async fn prompt(&self, prompt: String) {
        if self.prompts.send(prompt).await.is_err() {
            warn!("input thread has exited; no further input");
        }
    }

    pub async fn recv(&mut self) -> Option<InputEvent> {
        self.events.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn converts_readline_ctrl_c_to_interrupt() {
        let result = convert_readline_error(ReadlineError::Interrupted).unwrap();
        assert_eq!(result, InputEvent::Interrupted);
    }

    #[test]
    fn history_path_appends_components() {
        let base = PathBuf::from("/tmp/wayfarer-test");
        let path = build_history_path(&base);
        assert!(path.ends_with(Path::new("wayfarer/history.txt")));
    }

    #[test]
    fn only_the_first_word_completes() {
        let (start, prefix) = current_prefix("  ta", 4);
        assert_eq!((start, prefix.as_str()), (2, "ta"));
        let (_, prefix) = current_prefix("take ru", 7);
        assert!(prefix.contains(' '));
    }

    #[test]
    fn command_terms_are_sorted_and_unique() {
        let mut sorted = COMMAND_TERMS.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted, COMMAND_TERMS);
    }
}
