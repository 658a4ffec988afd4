//! Inline PREFIX extraction.
//!
//! Applied uniformly before dispatch regardless of backend: `PREFIX`
//! lines are pulled out of the statement text and bound into the
//! registry, and the remaining lines form the effective query body.

use crate::namespaces::Namespaces;

/// Outcome of scanning a statement for inline PREFIX lines.
#[derive(Debug, Default)]
pub struct PrefixExtraction {
    /// The statement with PREFIX lines removed, lines trimmed and
    /// rejoined with newlines, then trimmed as a whole
    pub body: String,
    /// Prefixes bound during the scan, in encounter order
    pub bound: Vec<String>,
    /// Malformed PREFIX lines (wrong token count), dropped from the
    /// body without binding anything
    pub malformed: Vec<String>,
}

/// Scan `statement` line by line. A line whose trimmed upper-case form
/// starts with `PREFIX ` and splits on whitespace into exactly three
/// tokens binds `<prefix> -> <iri>` into `ns` with override; the IRI is
/// stripped of angle brackets and the prefix of its trailing colon.
pub fn extract_prefixes(statement: &str, ns: &mut Namespaces) -> PrefixExtraction {
    let mut out = PrefixExtraction::default();
    let mut kept: Vec<&str> = Vec::new();

    for raw in statement.split('\n') {
        let line = raw.trim();
        if !line.to_uppercase().starts_with("PREFIX ") {
            kept.push(line);
            continue;
        }

        let tokens: Vec<&str> = line.splitn(3, char::is_whitespace).collect();
        match tokens.as_slice() {
            [_, prefix, iri] if !iri.contains(char::is_whitespace) => {
                let prefix = prefix.trim_end_matches(':');
                let iri = iri.trim_start_matches('<').trim_end_matches('>');
                ns.bind(prefix, iri);
                out.bound.push(prefix.to_string());
            }
            _ => out.malformed.push(line.to_string()),
        }
    }

    out.body = kept.join("\n").trim().to_string();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_line_is_bound_and_removed() {
        let mut ns = Namespaces::empty();
        let res = extract_prefixes(
            "PREFIX ex: <http://ex.org/>\nSELECT * WHERE {?s ?p ?o}",
            &mut ns,
        );
        assert_eq!(res.body, "SELECT * WHERE {?s ?p ?o}");
        assert_eq!(res.bound, vec!["ex"]);
        assert!(res.malformed.is_empty());
        assert_eq!(ns.resolve("ex"), Some("http://ex.org/"));
    }

    #[test]
    fn test_prefix_is_case_insensitive() {
        let mut ns = Namespaces::empty();
        let res = extract_prefixes("prefix ex: <http://ex.org/>\nSELECT 1", &mut ns);
        assert_eq!(res.bound, vec!["ex"]);
        assert_eq!(res.body, "SELECT 1");
    }

    #[test]
    fn test_prefix_overrides_existing_binding() {
        let mut ns = Namespaces::empty();
        ns.bind("ex", "http://old.org/");
        extract_prefixes("PREFIX ex: <http://new.org/>", &mut ns);
        assert_eq!(ns.resolve("ex"), Some("http://new.org/"));
    }

    #[test]
    fn test_malformed_prefix_is_dropped_without_binding() {
        let mut ns = Namespaces::empty();
        let res = extract_prefixes("PREFIX broken\nSELECT 1", &mut ns);
        assert_eq!(res.malformed, vec!["PREFIX broken"]);
        assert!(res.bound.is_empty());
        assert!(ns.is_empty());
        assert_eq!(res.body, "SELECT 1");
    }

    #[test]
    fn test_only_prefix_lines_leaves_empty_body() {
        let mut ns = Namespaces::empty();
        let res = extract_prefixes("PREFIX a: <http://a.org/>\nPREFIX b: <http://b.org/>", &mut ns);
        assert!(res.body.is_empty());
        assert_eq!(res.bound, vec!["a", "b"]);
    }

    #[test]
    fn test_empty_prefix_binds_default_namespace() {
        let mut ns = Namespaces::empty();
        let res = extract_prefixes("PREFIX : <http://base.org/>\nSELECT 1", &mut ns);
        assert_eq!(res.bound, vec![""]);
        assert_eq!(ns.resolve(""), Some("http://base.org/"));
    }

    #[test]
    fn test_body_lines_are_trimmed_and_rejoined() {
        let mut ns = Namespaces::empty();
        let res = extract_prefixes("  SELECT ?s  \n  WHERE { ?s ?p ?o }  ", &mut ns);
        assert_eq!(res.body, "SELECT ?s\nWHERE { ?s ?p ?o }");
    }
}
