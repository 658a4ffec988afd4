//! External editor integration.
//!
//! The pending statement is written to a temp file, `$EDITOR` is run on
//! it, and the file is re-read afterwards. The temp file is a scoped
//! acquisition: it is removed when the handle drops, on every exit path
//! including editor failure.

use std::env;
use std::fs;
use std::io;
use std::process::Command;

use tempfile::NamedTempFile;
use tracing::debug;

/// Open `$EDITOR` (default `vim`) on `content` and return what the user
/// saved. A non-zero editor exit is not an error; it yields an empty
/// replacement statement.
pub fn spawn_editor(content: &str) -> io::Result<String> {
    let temp = NamedTempFile::with_suffix(".sparql")?;
    fs::write(temp.path(), content)?;

    let editor_cmd = env::var("EDITOR").unwrap_or_else(|_| "vim".to_string());
    let parts = shlex::split(&editor_cmd).unwrap_or_default();
    let Some((program, args)) = parts.split_first() else {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "environment variable EDITOR is empty",
        ));
    };

    let status = Command::new(program)
        .args(args)
        .arg(temp.path())
        .status()?;
    debug!(code = ?status.code(), "editor returned");

    if !status.success() {
        return Ok(String::new());
    }
    fs::read_to_string(temp.path())
}
