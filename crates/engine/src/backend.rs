//! Query backend dispatch.
//!
//! One capability, two implementations: evaluate a SPARQL statement
//! against the local in-memory store or against a remote endpoint. The
//! variant is selected once at startup; nothing downstream inspects it
//! again.

use oxigraph::model::Term;
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;
use tracing::debug;

use crate::error::EngineError;
use crate::namespaces::Namespaces;
use crate::remote::RemoteEndpoint;
use crate::solutions::{QueryResult, Value};

/// Where statements are executed.
pub enum Backend {
    Local(Store),
    Remote(RemoteEndpoint),
}

impl Backend {
    pub fn local(store: Store) -> Self {
        Backend::Local(store)
    }

    pub fn remote(endpoint: RemoteEndpoint) -> Self {
        Backend::Remote(endpoint)
    }

    /// Execute a statement body (inline PREFIX lines already
    /// extracted) against this backend.
    ///
    /// The full registry is prepended as a PREFIX block for both
    /// variants: the store keeps no prefix knowledge of its own, and
    /// for the remote case this guarantees every extracted inline
    /// PREFIX survives into the textual query sent over the wire. An
    /// empty body is a no-op returning an empty result set.
    pub fn execute(&self, body: &str, ns: &Namespaces) -> Result<QueryResult, EngineError> {
        if body.is_empty() {
            return Ok(QueryResult::empty());
        }

        let full = if ns.is_empty() {
            body.to_string()
        } else {
            format!("{}\n{}", ns.prefix_block(), body)
        };

        match self {
            Backend::Local(store) => {
                debug!("evaluating statement against local graph");
                local_query(store, &full)
            }
            Backend::Remote(endpoint) => endpoint.execute(&full),
        }
    }
}

fn local_query(store: &Store, query: &str) -> Result<QueryResult, EngineError> {
    match store.query(query)? {
        QueryResults::Solutions(solutions) => {
            let vars: Vec<String> = solutions
                .variables()
                .iter()
                .map(|v| v.as_str().to_string())
                .collect();
            let mut rows = Vec::new();
            for solution in solutions {
                let solution = solution?;
                let mut row = Vec::with_capacity(vars.len());
                for var in &vars {
                    row.push(match solution.get(var.as_str()) {
                        Some(term) => Some(term_to_value(term)?),
                        None => None,
                    });
                }
                rows.push(row);
            }
            Ok(QueryResult { vars, rows })
        }
        QueryResults::Boolean(b) => Ok(QueryResult {
            vars: vec!["result".to_string()],
            rows: vec![vec![Some(Value::Literal(b.to_string()))]],
        }),
        QueryResults::Graph(triples) => {
            let vars = vec![
                "subject".to_string(),
                "predicate".to_string(),
                "object".to_string(),
            ];
            let mut rows = Vec::new();
            for triple in triples {
                let triple = triple?;
                rows.push(vec![
                    Some(term_to_value(&Term::from(triple.subject))?),
                    Some(term_to_value(&Term::from(triple.predicate))?),
                    Some(term_to_value(&triple.object)?),
                ]);
            }
            Ok(QueryResult { vars, rows })
        }
    }
}

fn term_to_value(term: &Term) -> Result<Value, EngineError> {
    match term {
        Term::NamedNode(n) => Ok(Value::Iri(n.as_str().to_string())),
        Term::BlankNode(b) => Ok(Value::Blank(b.as_str().to_string())),
        Term::Literal(l) => Ok(Value::Literal(l.value().to_string())),
        other => Err(EngineError::Decode(format!(
            "cannot decode term {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxigraph::io::RdfFormat;

    fn store_with(turtle: &str) -> Store {
        let store = Store::new().unwrap();
        store
            .load_from_reader(RdfFormat::Turtle, turtle.as_bytes())
            .unwrap();
        store
    }

    #[test]
    fn test_empty_body_is_noop() {
        let backend = Backend::local(Store::new().unwrap());
        let result = backend.execute("", &Namespaces::new()).unwrap();
        assert!(result.is_empty());
        assert!(result.vars.is_empty());
    }

    #[test]
    fn test_select_with_bound_prefix() {
        let store = store_with("<http://base.org/a> a <http://base.org/B> .");
        let mut ns = Namespaces::new();
        ns.bind("", "http://base.org/");

        let backend = Backend::local(store);
        let result = backend
            .execute("SELECT ?s WHERE { ?s a :B }", &ns)
            .unwrap();
        assert_eq!(result.vars, vec!["s"]);
        assert_eq!(result.rows.len(), 1);
        assert_eq!(
            result.rows[0][0],
            Some(Value::Iri("http://base.org/a".to_string()))
        );
    }

    #[test]
    fn test_unbound_variable_is_none() {
        let store = store_with("<http://base.org/a> a <http://base.org/B> .");
        let backend = Backend::local(store);
        let result = backend
            .execute(
                "SELECT ?s ?x WHERE { ?s ?p ?o OPTIONAL { ?s <http://base.org/none> ?x } }",
                &Namespaces::new(),
            )
            .unwrap();
        assert_eq!(result.vars, vec!["s", "x"]);
        assert_eq!(result.rows[0][1], None);
    }

    #[test]
    fn test_ask_query_produces_single_result_column() {
        let store = store_with("<http://base.org/a> a <http://base.org/B> .");
        let backend = Backend::local(store);
        let result = backend
            .execute("ASK { ?s a <http://base.org/B> }", &Namespaces::new())
            .unwrap();
        assert_eq!(result.vars, vec!["result"]);
        assert_eq!(result.rows[0][0], Some(Value::Literal("true".to_string())));
    }

    #[test]
    fn test_bad_syntax_is_query_error() {
        let backend = Backend::local(Store::new().unwrap());
        let err = backend
            .execute("SELEKT nonsense", &Namespaces::empty())
            .unwrap_err();
        assert!(matches!(err, EngineError::Query(_)));
    }
}
