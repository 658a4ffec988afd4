//! Tab completion for the query prompt.
//!
//! Options come from three pools, offered in a fixed order: the static
//! keyword/meta-command list, `prefix:` tokens recomputed from the live
//! namespace registry (it grows as statements bind new prefixes), and a
//! bounded rolling window of values seen in recent results.

use std::cell::RefCell;
use std::rc::Rc;

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use sparqlcli_engine::Namespaces;

/// Keywords and meta-commands always offered.
const STATIC_OPTIONS: &[&str] = &[
    "PREFIX", "SELECT", "WHERE", "DISTINCT", "COUNT", "VALUES", ".help", ".prefixes", ".exit",
    ".edit", ".file", ".watch",
];

/// Upper bound on remembered result values.
const MAX_DYNAMIC_OPTIONS: usize = 500;

/// Completion state shared between the session and the line editor.
pub struct SparqlCompleter {
    namespaces: Rc<RefCell<Namespaces>>,
    dynamic: Vec<String>,
    max_dynamic: usize,
}

impl SparqlCompleter {
    pub fn new(namespaces: Rc<RefCell<Namespaces>>) -> Self {
        Self::with_bound(namespaces, MAX_DYNAMIC_OPTIONS)
    }

    /// Completer with an explicit dynamic-pool bound.
    pub fn with_bound(namespaces: Rc<RefCell<Namespaces>>, max_dynamic: usize) -> Self {
        Self {
            namespaces,
            dynamic: Vec::new(),
            max_dynamic,
        }
    }

    /// All options in offer order: static, then namespace tokens, then
    /// dynamic. Namespace tokens are recomputed on every call since the
    /// registry may have grown.
    pub fn get_options(&self) -> Vec<String> {
        let mut options: Vec<String> = STATIC_OPTIONS.iter().map(|s| s.to_string()).collect();
        options.extend(
            self.namespaces
                .borrow()
                .iter()
                .map(|(prefix, _)| format!("{}:", prefix)),
        );
        options.extend(self.dynamic.iter().cloned());
        options
    }

    /// Merge a batch of result values into the dynamic pool.
    ///
    /// Existing options not present in the batch are kept (in order),
    /// the batch is appended, and the pool is truncated to the most
    /// recently added entries. Re-adding an identical batch leaves the
    /// pool unchanged.
    pub fn add_dynamic_options(&mut self, new_options: &[String]) {
        if new_options.is_empty() {
            return;
        }
        self.dynamic.retain(|o| !new_options.contains(o));
        self.dynamic.extend(new_options.iter().cloned());
        if self.dynamic.len() > self.max_dynamic {
            let excess = self.dynamic.len() - self.max_dynamic;
            self.dynamic.drain(..excess);
        }
    }

    /// Number of dynamic options currently held.
    pub fn dynamic_len(&self) -> usize {
        self.dynamic.len()
    }

    /// Options matching `partial` case-insensitively by prefix. An
    /// empty partial matches everything.
    pub fn matches(&self, partial: &str) -> Vec<String> {
        let all = self.get_options();
        if partial.is_empty() {
            return all;
        }
        let partial = partial.to_lowercase();
        all.into_iter()
            .filter(|o| !o.is_empty() && o.to_lowercase().starts_with(&partial))
            .collect()
    }
}

/// rustyline helper wrapping the shared completer.
///
/// Tokens break on whitespace only, so `prefix:local` completes as one
/// token. Hinting, highlighting and validation use the defaults.
pub struct SparqlHelper {
    completer: Rc<RefCell<SparqlCompleter>>,
}

impl SparqlHelper {
    pub fn new(completer: Rc<RefCell<SparqlCompleter>>) -> Self {
        Self { completer }
    }
}

impl Completer for SparqlHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> Result<(usize, Vec<Pair>), ReadlineError> {
        let word_start = line[..pos]
            .rfind(|c: char| c.is_whitespace())
            .map(|i| i + 1)
            .unwrap_or(0);
        let partial = &line[word_start..pos];

        let candidates = self
            .completer
            .borrow()
            .matches(partial)
            .into_iter()
            .map(|option| Pair {
                display: option.clone(),
                replacement: option,
            })
            .collect();
        Ok((word_start, candidates))
    }
}

impl Hinter for SparqlHelper {
    type Hint = String;
}

impl Highlighter for SparqlHelper {}

impl Validator for SparqlHelper {}

impl Helper for SparqlHelper {}

#[cfg(test)]
mod tests {
    use super::*;

    fn completer(max: usize) -> SparqlCompleter {
        SparqlCompleter::with_bound(Rc::new(RefCell::new(Namespaces::empty())), max)
    }

    fn batch(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_static_options_present() {
        let c = completer(10);
        let options = c.get_options();
        assert!(options.contains(&"SELECT".to_string()));
        assert!(options.contains(&".watch".to_string()));
    }

    #[test]
    fn test_namespace_tokens_track_registry() {
        let ns = Rc::new(RefCell::new(Namespaces::empty()));
        let c = SparqlCompleter::new(ns.clone());
        assert!(!c.get_options().contains(&"ex:".to_string()));

        ns.borrow_mut().bind("ex", "http://ex.org/");
        assert!(c.get_options().contains(&"ex:".to_string()));
    }

    #[test]
    fn test_match_is_case_insensitive_prefix() {
        let mut c = completer(10);
        c.add_dynamic_options(&batch(&["ex:alice"]));
        assert_eq!(c.matches("sel"), vec!["SELECT"]);
        assert_eq!(c.matches("EX:"), vec!["ex:alice"]);
        assert!(c.matches("zzz").is_empty());
    }

    #[test]
    fn test_dynamic_bound_never_exceeded() {
        let mut c = completer(3);
        for i in 0..10 {
            c.add_dynamic_options(&batch(&[&format!("v{}", i)]));
            assert!(c.dynamic_len() <= 3);
        }
        // Most recent entries survive.
        assert_eq!(c.matches("v"), vec!["v7", "v8", "v9"]);
    }

    #[test]
    fn test_add_dynamic_options_idempotent() {
        let mut c = completer(10);
        let values = batch(&["a", "b"]);
        c.add_dynamic_options(&values);
        let first = c.get_options();
        c.add_dynamic_options(&values);
        assert_eq!(c.get_options(), first);
    }

    #[test]
    fn test_readded_value_moves_to_end() {
        let mut c = completer(10);
        c.add_dynamic_options(&batch(&["a", "b"]));
        c.add_dynamic_options(&batch(&["a"]));
        assert_eq!(c.matches(""), {
            let mut expected: Vec<String> =
                STATIC_OPTIONS.iter().map(|s| s.to_string()).collect();
            expected.push("b".to_string());
            expected.push("a".to_string());
            expected
        });
    }

    #[test]
    fn test_empty_batch_is_noop() {
        let mut c = completer(10);
        c.add_dynamic_options(&batch(&["a"]));
        c.add_dynamic_options(&[]);
        assert_eq!(c.dynamic_len(), 1);
    }
}
