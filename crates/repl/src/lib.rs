//! sparqlcli repl
//!
//! Session orchestration for the sparqlcli client: the interactive
//! loop, tab completion, de-duplicating history, result renderers, and
//! external-editor / watch-mode support. Query execution itself lives
//! in `sparqlcli-engine`.

pub mod completion;
pub mod console;
pub mod editor;
pub mod history;
pub mod render;
pub mod session;

pub use completion::SparqlCompleter;
pub use console::Console;
pub use history::History;
pub use render::{render, OutputMode, Rendered};
pub use session::Session;
