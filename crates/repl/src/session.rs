//! The interactive query session.
//!
//! A line-oriented state machine: lines accumulate into a pending
//! statement until a blank line or a trailing `;` marks it complete,
//! meta-commands short-circuit on the last entered line, and completed
//! statements flow through PREFIX extraction, the backend, and the
//! renderer. Watch mode re-runs a file's contents whenever they change.

use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Config, Editor};
use tracing::debug;

use sparqlcli_engine::{extract_prefixes, Backend, EngineError, Namespaces};

use crate::completion::{SparqlCompleter, SparqlHelper};
use crate::console::Console;
use crate::editor::spawn_editor;
use crate::history::History;
use crate::render::{render, OutputMode};

/// Watch-mode polling interval.
const POLL_INTERVAL: Duration = Duration::from_secs(1);

const FILE_USAGE: &str = "syntax: .file <filename>";
const WATCH_USAGE: &str = "syntax: .watch <filename>";

/// Standalone session directives recognized on the last entered line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MetaCommand {
    Help,
    Exit,
    Prefixes,
}

/// Match a line against the standalone meta-commands, case-insensitive,
/// with an optional trailing terminator.
fn meta_command(line: &str) -> Option<MetaCommand> {
    let norm = line.trim().to_lowercase();
    let norm = norm.strip_suffix(';').unwrap_or(&norm);
    match norm {
        ".help" => Some(MetaCommand::Help),
        ".exit" => Some(MetaCommand::Exit),
        ".prefixes" => Some(MetaCommand::Prefixes),
        _ => None,
    }
}

/// A statement is ready to dispatch when the just-entered line is blank
/// or the joined buffer ends with the terminator.
fn buffer_ready(lines: &[String]) -> bool {
    match lines.last() {
        None => false,
        Some(last) => last.trim().is_empty() || lines.join("\n").trim().ends_with(';'),
    }
}

/// Join the buffer, trim, and strip any trailing terminators.
fn assemble(lines: &[String]) -> String {
    let joined = lines.join("\n");
    joined.trim().trim_end_matches(';').trim().to_string()
}

/// Non-fatal failure loading a `.file`/`.watch` target.
#[derive(Debug)]
pub enum LoadError {
    EmptyPath(&'static str),
    NotFound(String),
    Io(String),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::EmptyPath(usage) => write!(f, "{}", usage),
            LoadError::NotFound(path) => write!(f, "file not found: {}", path),
            LoadError::Io(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for LoadError {}

/// Read a query file for `.file`/`.watch`, trimmed.
fn load_query_from_file(raw_path: &str, usage: &'static str) -> Result<String, LoadError> {
    let path = raw_path.trim();
    if path.is_empty() {
        return Err(LoadError::EmptyPath(usage));
    }
    if !Path::new(path).exists() {
        return Err(LoadError::NotFound(path.to_string()));
    }
    fs::read_to_string(path)
        .map(|content| content.trim().to_string())
        .map_err(|e| LoadError::Io(format!("{}: {}", path, e)))
}

/// State carried while a file is being watched.
struct WatchState {
    path: String,
    last_content: Option<String>,
}

/// Everything one query session owns. Constructed once at startup,
/// mutated by the loop, torn down (history flushed) at exit.
pub struct Session {
    backend: Backend,
    namespaces: Rc<RefCell<Namespaces>>,
    completer: Rc<RefCell<SparqlCompleter>>,
    history: History,
    console: Console,
    output: OutputMode,
    prompt: String,
}

impl Session {
    pub fn new(
        backend: Backend,
        namespaces: Namespaces,
        history: History,
        console: Console,
        output: OutputMode,
        prompt: String,
    ) -> Self {
        let namespaces = Rc::new(RefCell::new(namespaces));
        let completer = Rc::new(RefCell::new(SparqlCompleter::new(namespaces.clone())));
        Self {
            backend,
            namespaces,
            completer,
            history,
            console,
            output,
            prompt,
        }
    }

    /// Shared namespace registry (grows as statements bind prefixes).
    pub fn namespaces(&self) -> Rc<RefCell<Namespaces>> {
        self.namespaces.clone()
    }

    /// Shared completion state.
    pub fn completer(&self) -> Rc<RefCell<SparqlCompleter>> {
        self.completer.clone()
    }

    /// Recorded history, oldest first.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Run one statement through PREFIX extraction, the backend and the
    /// renderer. Returns the rendered output, or `None` when the
    /// statement was empty after extraction (a no-op).
    pub fn execute_statement(&mut self, statement: &str) -> Result<Option<String>, EngineError> {
        let extraction = {
            let mut ns = self.namespaces.borrow_mut();
            extract_prefixes(statement, &mut ns)
        };
        for prefix in &extraction.bound {
            self.console.info("prefix", prefix);
        }
        for _ in &extraction.malformed {
            self.console.error("syntax: PREFIX prefix <iri>");
        }
        if extraction.body.is_empty() {
            return Ok(None);
        }

        self.console.verbose("querying", "");
        let result = {
            let ns = self.namespaces.borrow();
            self.backend.execute(&extraction.body, &ns)?
        };
        self.console
            .verbose("query complete", &format!("{} results", result.len()));

        let rendered = {
            let ns = self.namespaces.borrow();
            render(&result, &extraction.body, self.output, &ns)
        };
        self.completer
            .borrow_mut()
            .add_dynamic_options(&rendered.candidates);
        Ok(Some(rendered.text))
    }

    /// Execute and print one assembled statement, recording it in
    /// history unless suppressed. Empty statements are no-ops.
    pub fn dispatch(&mut self, statement: &str, skip_history: bool) {
        if statement.is_empty() {
            return;
        }
        if !skip_history {
            self.history.add(statement);
        }
        match self.execute_statement(statement) {
            Ok(Some(text)) => println!("{}", text),
            Ok(None) => {}
            Err(e) => {
                self.console.error(&e.to_string());
                if self.console.is_verbose() {
                    self.console.info("detail", &format!("{:?}", e));
                }
                debug!(error = %e, "statement failed");
            }
        }
    }

    /// Batch mode: the whole input stream is one statement. Lines stay
    /// separate so inline PREFIX extraction sees them individually.
    pub fn run_batch(&mut self, input: &str) {
        let statement = input
            .lines()
            .map(|l| l.trim_end())
            .collect::<Vec<_>>()
            .join("\n");
        let statement = statement.trim().trim_end_matches(';').trim().to_string();
        self.console.verbose("query", &statement);
        self.dispatch(&statement, true);
    }

    /// The interactive loop. Consumes the session; history is flushed
    /// on every exit path.
    pub fn run_interactive(mut self) -> rustyline::Result<()> {
        // rustyline reports ^C at the prompt itself; this flag catches
        // SIGINT during the watch-poll sleep.
        let interrupted = Arc::new(AtomicBool::new(false));
        let _ = signal_hook::flag::register(signal_hook::consts::SIGINT, interrupted.clone());

        let config = Config::builder()
            .completion_type(CompletionType::List)
            .history_ignore_space(true)
            .build();
        let mut rl: Editor<SparqlHelper, DefaultHistory> = Editor::with_config(config)?;
        rl.set_helper(Some(SparqlHelper::new(self.completer.clone())));
        for entry in self.history.entries() {
            let _ = rl.add_history_entry(entry);
        }

        self.console.verbose("interactive mode", "starting");

        let mut pending: Vec<String> = Vec::new();
        let mut watch: Option<WatchState> = None;

        loop {
            if let Some(state) = watch.as_mut() {
                if interrupted.swap(false, Ordering::SeqCst) {
                    self.console.info("watch", &format!("stopping {}", state.path));
                    watch = None;
                    pending.clear();
                    continue;
                }
                match load_query_from_file(&state.path, WATCH_USAGE) {
                    Ok(content) => {
                        if state.last_content.as_deref() != Some(content.as_str()) {
                            self.console.echo(&content);
                            self.dispatch(&content, true);
                            state.last_content = Some(content);
                        }
                    }
                    Err(e) => self.console.error(&e.to_string()),
                }
                thread::sleep(POLL_INTERVAL);
                continue;
            }

            interrupted.store(false, Ordering::SeqCst);
            let prompt = if pending.is_empty() {
                self.prompt.clone()
            } else {
                "...> ".to_string()
            };

            let line = match rl.readline(&prompt) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => {
                    pending.clear();
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    self.console.info("exit", "");
                    break;
                }
                Err(e) => {
                    self.console.error(&format!("readline: {}", e));
                    break;
                }
            };

            pending.push(line);

            // Meta-commands act on the last entered line and never
            // reach dispatch.
            if let Some(meta) = meta_command(pending.last().map(String::as_str).unwrap_or("")) {
                pending.clear();
                match meta {
                    MetaCommand::Help => self.print_help(),
                    MetaCommand::Prefixes => self.print_prefixes(),
                    MetaCommand::Exit => break,
                }
                continue;
            }

            if !buffer_ready(&pending) {
                continue;
            }
            let mut statement = assemble(&pending);
            pending.clear();

            if let Some(rest) = statement.strip_suffix(".edit") {
                let seed = rest.trim_end().to_string();
                statement = match spawn_editor(&seed) {
                    Ok(text) => text.trim().to_string(),
                    Err(e) => {
                        self.console.error(&format!("editor: {}", e));
                        continue;
                    }
                };
            }

            if let Some(rest) = statement.strip_prefix(".watch") {
                let path = rest.trim().to_string();
                self.record(&mut rl, &statement);
                match load_query_from_file(&path, WATCH_USAGE) {
                    Ok(_) => {
                        self.console.info("watch", &format!("starting {}", path));
                        watch = Some(WatchState {
                            path,
                            last_content: None,
                        });
                    }
                    Err(e) => self.console.error(&e.to_string()),
                }
                continue;
            }

            let mut skip_history = false;
            if let Some(rest) = statement.strip_prefix(".file") {
                let path = rest.to_string();
                self.record(&mut rl, &statement);
                match load_query_from_file(&path, FILE_USAGE) {
                    Ok(content) => {
                        statement = content;
                        skip_history = true;
                    }
                    Err(e) => {
                        self.console.error(&e.to_string());
                        continue;
                    }
                }
            }

            if statement.is_empty() {
                continue;
            }
            if !skip_history {
                self.record(&mut rl, &statement);
            }
            self.console.echo(&statement);
            self.dispatch(&statement, true);
        }

        if let Err(e) = self.history.save() {
            self.console.error(&format!("could not save history: {}", e));
        }
        Ok(())
    }

    /// Record a statement in both the session history and the line
    /// editor's recall buffer.
    fn record(&mut self, rl: &mut Editor<SparqlHelper, DefaultHistory>, entry: &str) {
        self.history.add(entry);
        let _ = rl.add_history_entry(entry.replace('\n', " "));
    }

    fn print_help(&self) {
        self.console
            .info("help", "commands: .help, .exit, .prefixes, .edit, .file, .watch");
    }

    fn print_prefixes(&self) {
        self.console.info("prefixes", "");
        println!("{}", self.namespaces.borrow().prefix_block());
    }
}
