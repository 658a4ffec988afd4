//! sparqlcli engine
//!
//! Backend-facing half of the sparqlcli client: namespace registry,
//! inline PREFIX extraction, the uniform query-result model, and the
//! two query backends (local in-memory graph, remote SPARQL endpoint).
//!
//! Nothing in this crate touches the terminal; rendering and session
//! orchestration live in the repl crate.

pub mod backend;
pub mod error;
pub mod graph;
pub mod namespaces;
pub mod prefix;
pub mod remote;
pub mod solutions;

pub use backend::Backend;
pub use error::EngineError;
pub use graph::{load_graph, RdfSyntax};
pub use namespaces::Namespaces;
pub use prefix::{extract_prefixes, PrefixExtraction};
pub use remote::RemoteEndpoint;
pub use solutions::{QueryResult, Value};
