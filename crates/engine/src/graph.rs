//! Local graph loading.
//!
//! Parses an RDF document from disk into an in-memory oxigraph store.
//! The input syntax can be forced from the CLI or detected from the
//! file extension.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

use oxigraph::io::RdfFormat;
use oxigraph::store::Store;
use tracing::debug;

use crate::error::EngineError;

/// Input syntax names accepted on the command line.
///
/// The set mirrors the original client. Several names come from parsers
/// the engine library does not provide (HTML/RDFa/microdata scrapers);
/// selecting one of those fails at load time with a clear message
/// rather than being rejected at argument parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfSyntax {
    Html,
    HTurtle,
    MData,
    Microdata,
    N3,
    NQuads,
    Nt,
    Rdfa,
    Rdfa10,
    Rdfa11,
    TriX,
    Turtle,
    Xml,
}

impl RdfSyntax {
    /// All accepted syntax names, in CLI order.
    pub const NAMES: &'static [&'static str] = &[
        "html",
        "hturtle",
        "mdata",
        "microdata",
        "n3",
        "nquads",
        "nt",
        "rdfa",
        "rdfa1.0",
        "rdfa1.1",
        "trix",
        "turtle",
        "xml",
    ];

    /// Parse a CLI syntax name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "html" => Some(Self::Html),
            "hturtle" => Some(Self::HTurtle),
            "mdata" => Some(Self::MData),
            "microdata" => Some(Self::Microdata),
            "n3" => Some(Self::N3),
            "nquads" => Some(Self::NQuads),
            "nt" => Some(Self::Nt),
            "rdfa" => Some(Self::Rdfa),
            "rdfa1.0" => Some(Self::Rdfa10),
            "rdfa1.1" => Some(Self::Rdfa11),
            "trix" => Some(Self::TriX),
            "turtle" => Some(Self::Turtle),
            "xml" => Some(Self::Xml),
            _ => None,
        }
    }

    /// The CLI name of this syntax.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::HTurtle => "hturtle",
            Self::MData => "mdata",
            Self::Microdata => "microdata",
            Self::N3 => "n3",
            Self::NQuads => "nquads",
            Self::Nt => "nt",
            Self::Rdfa => "rdfa",
            Self::Rdfa10 => "rdfa1.0",
            Self::Rdfa11 => "rdfa1.1",
            Self::TriX => "trix",
            Self::Turtle => "turtle",
            Self::Xml => "xml",
        }
    }

    /// Map to a parser format, or fail for syntaxes the engine library
    /// has no parser for.
    fn to_format(self) -> Result<RdfFormat, EngineError> {
        match self {
            Self::Turtle => Ok(RdfFormat::Turtle),
            Self::Nt => Ok(RdfFormat::NTriples),
            Self::NQuads => Ok(RdfFormat::NQuads),
            Self::N3 => Ok(RdfFormat::N3),
            Self::Xml => Ok(RdfFormat::RdfXml),
            other => Err(EngineError::Parse(format!(
                "no parser available for input format '{}'",
                other.name()
            ))),
        }
    }
}

/// Detect the parser format from the file extension.
fn detect_format(path: &Path) -> Result<RdfFormat, EngineError> {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(RdfFormat::from_extension)
        .ok_or_else(|| {
            EngineError::Parse(format!(
                "cannot detect RDF format of '{}'; use --format",
                path.display()
            ))
        })
}

/// Parse `path` into a fresh in-memory store.
pub fn load_graph(path: &Path, syntax: Option<RdfSyntax>) -> Result<Store, EngineError> {
    let format = match syntax {
        Some(s) => s.to_format()?,
        None => detect_format(path)?,
    };

    let file = File::open(path)
        .map_err(|e| EngineError::Parse(format!("{}: {}", path.display(), e)))?;

    let start = Instant::now();
    let store = Store::new()?;
    store.load_from_reader(format, BufReader::new(file))?;
    debug!(
        path = %path.display(),
        format = ?format,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "graph loaded"
    );
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_syntax_name_round_trip() {
        for name in RdfSyntax::NAMES {
            let syntax = RdfSyntax::from_name(name).unwrap();
            assert_eq!(syntax.name(), *name);
        }
        assert!(RdfSyntax::from_name("jsonld").is_none());
    }

    #[test]
    fn test_unsupported_syntax_fails_at_load() {
        let err = RdfSyntax::Rdfa.to_format().unwrap_err();
        assert!(err.to_string().contains("rdfa"));
    }

    #[test]
    fn test_load_turtle_file() {
        let mut tmp = std::env::temp_dir();
        tmp.push(format!("sparqlcli-load-{}.ttl", std::process::id()));
        let mut f = File::create(&tmp).unwrap();
        writeln!(
            f,
            "<http://ex.org/a> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://ex.org/B> ."
        )
        .unwrap();

        let store = load_graph(&tmp, Some(RdfSyntax::Turtle)).unwrap();
        assert_eq!(store.len().unwrap(), 1);
        std::fs::remove_file(&tmp).ok();
    }

    #[test]
    fn test_load_missing_file_is_parse_error() {
        let err = load_graph(Path::new("/no/such/file.ttl"), Some(RdfSyntax::Turtle))
            .err()
            .unwrap();
        assert!(matches!(err, EngineError::Parse(_)));
    }

    #[test]
    fn test_detect_format_unknown_extension() {
        assert!(detect_format(Path::new("data.bin")).is_err());
    }
}
