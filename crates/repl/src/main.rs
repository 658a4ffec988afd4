//! sparqlcli - interactive SPARQL client
//!
//! Queries a locally parsed RDF file or a remote SPARQL endpoint from
//! a readline-style prompt with history, tab completion, an external
//! editor hook and a watch-a-file mode. With stdin piped, the whole
//! input stream runs as a single statement instead.
//!
//! Usage:
//!   sparqlcli data.ttl                     # local graph, interactive
//!   sparqlcli https://dbpedia.org/sparql   # remote endpoint
//!   echo 'SELECT ...' | sparqlcli data.ttl # batch mode
//!   sparqlcli data.ttl --ex=http://ex.org/ # bind prefix ex: at startup

use std::io::{IsTerminal, Read};
use std::path::Path;

use clap::Parser;
use url::Url;

use sparqlcli_engine::{load_graph, Backend, Namespaces, RdfSyntax, RemoteEndpoint};
use sparqlcli_repl::{Console, History, OutputMode, Session};

#[derive(Parser)]
#[command(name = "sparqlcli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Interactive SPARQL client for local RDF files and remote endpoints")]
struct Args {
    /// Filename of a local RDF document, or a remote SPARQL endpoint URL
    endpoint: String,

    /// Treat the endpoint as remote (auto-detected from URL shape if omitted)
    #[arg(short, long)]
    remote: bool,

    /// Force interactive mode on or off (auto-detected from whether
    /// stdin is a terminal)
    #[arg(short, long, value_name = "BOOL")]
    interactive: Option<bool>,

    /// Input RDF syntax for local files (auto-detected from the file
    /// extension if omitted)
    #[arg(short, long, value_parser = parse_syntax)]
    format: Option<RdfSyntax>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputMode::Table)]
    output: OutputMode,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Trailing `--prefix=iri` arguments are bound into the namespace
    /// registry at startup; anything else here is ignored
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    namespace_args: Vec<String>,
}

fn parse_syntax(name: &str) -> Result<RdfSyntax, String> {
    RdfSyntax::from_name(name).ok_or_else(|| {
        format!(
            "invalid format '{}' (expected one of: {})",
            name,
            RdfSyntax::NAMES.join(", ")
        )
    })
}

/// URL-shape heuristic: scheme and host both present.
fn is_url(text: &str) -> bool {
    Url::parse(text).map(|u| u.has_host()).unwrap_or(false)
}

/// Split a trailing `--prefix=iri` argument.
fn parse_namespace_arg(arg: &str) -> Option<(String, String)> {
    let rest = arg.strip_prefix("--")?;
    let (prefix, iri) = rest.split_once('=')?;
    Some((prefix.trim().to_string(), iri.trim().to_string()))
}

fn truncate(name: &str, max: usize) -> String {
    name.chars().take(max).collect()
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "sparqlcli_engine=debug,sparqlcli_repl=debug,sparqlcli=debug"
    } else {
        "sparqlcli_engine=info,sparqlcli_repl=info,sparqlcli=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);
    std::process::exit(run(args));
}

fn run(args: Args) -> i32 {
    let console = Console::new(args.verbose);
    let interactive = args
        .interactive
        .unwrap_or_else(|| std::io::stdin().is_terminal());
    let remote = args.remote || is_url(&args.endpoint);

    let mut namespaces = Namespaces::new();
    for arg in &args.namespace_args {
        if let Some((prefix, iri)) = parse_namespace_arg(arg) {
            namespaces.bind(&prefix, &iri);
        }
    }

    let (backend, prompt) = if remote {
        let url = match Url::parse(&args.endpoint) {
            Ok(url) => url,
            Err(e) => {
                console.error(&format!("invalid endpoint URL '{}': {}", args.endpoint, e));
                return 1;
            }
        };
        let endpoint = RemoteEndpoint::new(url);
        let prompt = format!("{}> ", endpoint.host());
        (Backend::remote(endpoint), prompt)
    } else {
        let path = Path::new(&args.endpoint);
        if !path.exists() {
            console.error(&format!("file not found: {}", args.endpoint));
            return 1;
        }
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("graph");
        console.info("file", name);
        console.info(
            "parsing",
            &format!(
                "format={}",
                args.format.map(|f| f.name()).unwrap_or("auto-detect")
            ),
        );
        let store = match load_graph(path, args.format) {
            Ok(store) => store,
            Err(e) => {
                console.error(&e.to_string());
                return 1;
            }
        };
        console.info("parsing complete", "");
        (Backend::local(store), format!("{}> ", truncate(name, 20)))
    };

    let history = if interactive {
        match History::default_path() {
            Some(path) => History::load(path).unwrap_or_else(|_| History::in_memory()),
            None => History::in_memory(),
        }
    } else {
        History::in_memory()
    };

    let session = Session::new(backend, namespaces, history, console, args.output, prompt);

    if interactive {
        if let Err(e) = session.run_interactive() {
            console.error(&format!("readline: {}", e));
            return 1;
        }
        0
    } else {
        let mut session = session;
        let mut input = String::new();
        if let Err(e) = std::io::stdin().lock().read_to_string(&mut input) {
            console.error(&format!("reading stdin: {}", e));
            return 1;
        }
        // Query failures are reported but still exit 0 in batch mode;
        // only argument and load failures are fatal.
        session.run_batch(&input);
        0
    }
}
