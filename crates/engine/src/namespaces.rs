//! Prefix/IRI bindings for the active session.
//!
//! The oxigraph store keeps no prefix knowledge of its own, so the
//! registry is owned by the session and handed to the backend on every
//! call: it expands the query text (as a PREFIX block) on the way in
//! and shortens IRIs on the way out.

/// Well-known namespaces bound at startup, matching the defaults the
/// usual RDF toolkits register on a fresh graph.
const DEFAULT_BINDINGS: &[(&str, &str)] = &[
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
    ("owl", "http://www.w3.org/2002/07/owl#"),
];

/// Insertion-ordered prefix -> IRI registry with last-write-wins
/// override semantics.
#[derive(Debug, Clone)]
pub struct Namespaces {
    bindings: Vec<(String, String)>,
}

impl Namespaces {
    /// Create a registry pre-populated with the well-known namespaces.
    pub fn new() -> Self {
        Self {
            bindings: DEFAULT_BINDINGS
                .iter()
                .map(|(p, i)| (p.to_string(), i.to_string()))
                .collect(),
        }
    }

    /// Create an empty registry (no default bindings).
    pub fn empty() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Bind `prefix` to `iri`, overriding an existing binding in place.
    pub fn bind(&mut self, prefix: &str, iri: &str) {
        if let Some(entry) = self.bindings.iter_mut().find(|(p, _)| p == prefix) {
            entry.1 = iri.to_string();
        } else {
            self.bindings.push((prefix.to_string(), iri.to_string()));
        }
    }

    /// Iterate bindings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(p, i)| (p.as_str(), i.as_str()))
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// True when no bindings are registered.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Look up the IRI bound to `prefix`.
    pub fn resolve(&self, prefix: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, i)| i.as_str())
    }

    /// Render `iri` as `prefix:local` against the first binding whose
    /// IRI is a string prefix of it, or return the full IRI unchanged.
    ///
    /// First-match semantics are deliberate for compatibility: when
    /// namespace IRIs overlap as string prefixes of one another the
    /// earlier binding wins, not the longest one.
    pub fn shorten(&self, iri: &str) -> String {
        for (prefix, long) in &self.bindings {
            if let Some(local) = iri.strip_prefix(long.as_str()) {
                return format!("{}:{}", prefix, local);
            }
        }
        iri.to_string()
    }

    /// Expand `prefix:local` back to a full IRI using the registry.
    /// Returns `None` when the prefix is unbound or the input has no
    /// colon.
    pub fn expand(&self, qname: &str) -> Option<String> {
        let (prefix, local) = qname.split_once(':')?;
        let long = self.resolve(prefix)?;
        Some(format!("{}{}", long, local))
    }

    /// Render every binding as a `PREFIX p: <iri>` line, one per
    /// binding, in insertion order.
    pub fn prefix_block(&self) -> String {
        self.bindings
            .iter()
            .map(|(p, i)| format!("PREFIX {}: <{}>", p, i))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Namespaces {
    fn default() -> Self {
        Self::new()
    }
}
