//! Remote SPARQL endpoint backend.
//!
//! Sends the statement over HTTP and decodes the standard
//! `application/sparql-results+json` response shape into the uniform
//! result model. Variable ordering follows `head.vars`.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::EngineError;
use crate::solutions::{QueryResult, Value};

/// Request timeout for endpoint calls (30 seconds)
const TIMEOUT_SECS: u64 = 30;

const RESULTS_JSON: &str = "application/sparql-results+json";

#[derive(Deserialize)]
struct SparqlJson {
    #[serde(default)]
    head: Head,
    #[serde(default)]
    results: Bindings,
}

#[derive(Deserialize, Default)]
struct Head {
    #[serde(default)]
    vars: Vec<String>,
}

#[derive(Deserialize, Default)]
struct Bindings {
    #[serde(default)]
    bindings: Vec<HashMap<String, Cell>>,
}

#[derive(Deserialize)]
struct Cell {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    value: String,
}

/// A remote SPARQL service reachable over HTTP.
pub struct RemoteEndpoint {
    url: Url,
    agent: ureq::Agent,
}

impl RemoteEndpoint {
    pub fn new(url: Url) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build();
        Self { url, agent }
    }

    /// Host name of the endpoint, for the prompt.
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or("remote")
    }

    /// Send `query` (already carrying its PREFIX block) and decode the
    /// JSON response.
    pub fn execute(&self, query: &str) -> Result<QueryResult, EngineError> {
        debug!(endpoint = %self.url, "sending remote query");
        let response = self
            .agent
            .get(self.url.as_str())
            .query("query", query)
            .set("Accept", RESULTS_JSON)
            .call()?;
        let body = response
            .into_string()
            .map_err(|e| EngineError::Network(e.to_string()))?;
        let parsed: SparqlJson = serde_json::from_str(&body)?;
        decode_results(parsed)
    }
}

fn decode_results(parsed: SparqlJson) -> Result<QueryResult, EngineError> {
    let vars = parsed.head.vars;
    let mut rows = Vec::with_capacity(parsed.results.bindings.len());
    for binding in &parsed.results.bindings {
        let mut row = Vec::with_capacity(vars.len());
        for var in &vars {
            row.push(match binding.get(var) {
                Some(cell) => Some(decode_cell(cell)?),
                None => None,
            });
        }
        rows.push(row);
    }
    Ok(QueryResult { vars, rows })
}

fn decode_cell(cell: &Cell) -> Result<Value, EngineError> {
    match cell.kind.as_str() {
        "uri" => Ok(Value::Iri(cell.value.clone())),
        "literal" | "typed-literal" => Ok(Value::Literal(cell.value.clone())),
        other => Err(EngineError::Decode(format!(
            "cannot decode value type '{}' in '{}'",
            other, cell.value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> SparqlJson {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_decode_uri_and_literal_cells() {
        let parsed = parse(
            r#"{"head":{"vars":["s","n"]},
                "results":{"bindings":[
                  {"s":{"type":"uri","value":"http://ex.org/a"},
                   "n":{"type":"typed-literal","value":"42"}}]}}"#,
        );
        let result = decode_results(parsed).unwrap();
        assert_eq!(result.vars, vec!["s", "n"]);
        assert_eq!(result.rows.len(), 1);
        assert_eq!(
            result.rows[0][0],
            Some(Value::Iri("http://ex.org/a".to_string()))
        );
        assert_eq!(result.rows[0][1], Some(Value::Literal("42".to_string())));
    }

    #[test]
    fn test_missing_binding_is_unbound() {
        let parsed = parse(
            r#"{"head":{"vars":["s","o"]},
                "results":{"bindings":[{"s":{"type":"uri","value":"http://ex.org/a"}}]}}"#,
        );
        let result = decode_results(parsed).unwrap();
        assert_eq!(result.rows[0][1], None);
    }

    #[test]
    fn test_unknown_type_tag_is_decode_error() {
        let parsed = parse(
            r#"{"head":{"vars":["s"]},
                "results":{"bindings":[{"s":{"type":"bnode","value":"b0"}}]}}"#,
        );
        let err = decode_results(parsed).unwrap_err();
        assert!(matches!(err, EngineError::Decode(_)));
    }

    #[test]
    fn test_zero_rows_keeps_vars() {
        let parsed = parse(r#"{"head":{"vars":["a","b"]},"results":{"bindings":[]}}"#);
        let result = decode_results(parsed).unwrap();
        assert_eq!(result.vars, vec!["a", "b"]);
        assert!(result.is_empty());
    }
}
