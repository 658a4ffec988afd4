//! Result rendering.
//!
//! Turns the uniform result model into one of three output shapes and,
//! as a side effect, collects the rendered strings as candidates for
//! tab completion.

use clap::ValueEnum;
use prettytable::{format, Cell, Row, Table};
use serde_json::json;

use sparqlcli_engine::{Namespaces, QueryResult, Value};

/// Output shape selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputMode {
    #[default]
    Table,
    Json,
    /// Tab-separated with quoted fields, kept under this name for
    /// compatibility with the original client.
    Csv,
}

/// Rendered output plus the completion candidates gathered from it.
pub struct Rendered {
    pub text: String,
    pub candidates: Vec<String>,
}

/// Render `result` for printing. `query` is echoed only by the JSON
/// shape.
pub fn render(
    result: &QueryResult,
    query: &str,
    mode: OutputMode,
    ns: &Namespaces,
) -> Rendered {
    match mode {
        OutputMode::Table => render_table(result, ns),
        OutputMode::Json => render_json(result, query, ns),
        OutputMode::Csv => render_csv(result, ns),
    }
}

/// Stringify one cell: unbound is empty, literals keep their native
/// text, IRIs are shortened against the first matching namespace.
fn value_to_string(value: Option<&Value>, ns: &Namespaces) -> String {
    match value {
        None => String::new(),
        Some(Value::Literal(text)) => text.clone(),
        Some(Value::Blank(label)) => format!("_:{}", label),
        Some(Value::Iri(iri)) => ns.shorten(iri),
    }
}

/// Record a rendered string as a completion candidate, deduplicated in
/// first-seen order.
fn collect(candidates: &mut Vec<String>, rendered: &str) {
    if !rendered.is_empty() && !candidates.iter().any(|c| c == rendered) {
        candidates.push(rendered.to_string());
    }
}

fn title_case(var: &str) -> String {
    let mut chars = var.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn result_count_title(count: usize) -> String {
    if count == 1 {
        "1 result".to_string()
    } else {
        format!("{} results", count)
    }
}

fn render_table(result: &QueryResult, ns: &Namespaces) -> Rendered {
    let mut candidates = Vec::new();

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.set_titles(Row::new(
        result
            .vars
            .iter()
            .map(|v| Cell::new(&title_case(v)))
            .collect(),
    ));
    for row in &result.rows {
        let mut cells = Vec::with_capacity(row.len());
        for value in row {
            let rendered = value_to_string(value.as_ref(), ns);
            collect(&mut candidates, &rendered);
            cells.push(Cell::new(&rendered));
        }
        table.add_row(Row::new(cells));
    }

    let text = format!("{}\n{}", result_count_title(result.len()), table);
    Rendered { text, candidates }
}

fn render_json(result: &QueryResult, query: &str, ns: &Namespaces) -> Rendered {
    let mut candidates = Vec::new();

    let rows: Vec<serde_json::Value> = result
        .rows
        .iter()
        .map(|row| {
            let mut object = serde_json::Map::new();
            for (var, value) in result.vars.iter().zip(row) {
                let cell = match value {
                    None => serde_json::Value::Null,
                    Some(_) => {
                        let rendered = value_to_string(value.as_ref(), ns);
                        collect(&mut candidates, &rendered);
                        serde_json::Value::String(rendered)
                    }
                };
                object.insert(var.clone(), cell);
            }
            serde_json::Value::Object(object)
        })
        .collect();

    let output = json!({
        "query": query,
        "bindings": result.vars,
        "results": rows,
    });
    // Pretty-printing a just-built value cannot fail.
    let text = serde_json::to_string_pretty(&output).unwrap_or_default();
    Rendered { text, candidates }
}

fn render_csv(result: &QueryResult, ns: &Namespaces) -> Rendered {
    let mut candidates = Vec::new();

    let mut lines = Vec::with_capacity(result.rows.len() + 1);
    lines.push(
        result
            .vars
            .iter()
            .map(|v| format!("\"{}\"", v))
            .collect::<Vec<_>>()
            .join("\t"),
    );
    for row in &result.rows {
        let cells: Vec<String> = row
            .iter()
            .map(|value| {
                let rendered = value_to_string(value.as_ref(), ns);
                collect(&mut candidates, &rendered);
                format!("\"{}\"", rendered)
            })
            .collect();
        lines.push(cells.join("\t"));
    }

    Rendered {
        text: lines.join("\n"),
        candidates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_one_row() -> QueryResult {
        QueryResult {
            vars: vec!["s".to_string()],
            rows: vec![vec![Some(Value::Iri("http://base.org/a".to_string()))]],
        }
    }

    fn base_ns() -> Namespaces {
        let mut ns = Namespaces::empty();
        ns.bind("", "http://base.org/");
        ns
    }

    #[test]
    fn test_table_scenario_one_row_one_column() {
        let rendered = render(&result_one_row(), "", OutputMode::Table, &base_ns());
        assert!(rendered.text.starts_with("1 result\n"));
        assert!(rendered.text.contains(" S "));
        assert!(rendered.text.contains(":a"));
        assert_eq!(rendered.candidates, vec![":a"]);
    }

    #[test]
    fn test_table_pluralization() {
        let empty = QueryResult {
            vars: vec!["s".to_string()],
            rows: vec![],
        };
        let rendered = render(&empty, "", OutputMode::Table, &Namespaces::empty());
        assert!(rendered.text.starts_with("0 results\n"));

        let mut two = result_one_row();
        two.rows.push(vec![Some(Value::Literal("x".to_string()))]);
        let rendered = render(&two, "", OutputMode::Table, &Namespaces::empty());
        assert!(rendered.text.starts_with("2 results\n"));
    }

    #[test]
    fn test_json_zero_rows_keeps_bindings() {
        let result = QueryResult {
            vars: vec!["a".to_string(), "b".to_string()],
            rows: vec![],
        };
        let rendered = render(&result, "SELECT ?a ?b WHERE {}", OutputMode::Json, &Namespaces::empty());
        let parsed: serde_json::Value = serde_json::from_str(&rendered.text).unwrap();
        assert_eq!(parsed["results"], json!([]));
        assert_eq!(parsed["bindings"], json!(["a", "b"]));
        assert_eq!(parsed["query"], json!("SELECT ?a ?b WHERE {}"));
    }

    #[test]
    fn test_json_unbound_is_null() {
        let result = QueryResult {
            vars: vec!["s".to_string(), "x".to_string()],
            rows: vec![vec![Some(Value::Literal("v".to_string())), None]],
        };
        let rendered = render(&result, "q", OutputMode::Json, &Namespaces::empty());
        let parsed: serde_json::Value = serde_json::from_str(&rendered.text).unwrap();
        assert_eq!(parsed["results"][0]["x"], serde_json::Value::Null);
        assert_eq!(parsed["results"][0]["s"], json!("v"));
    }

    #[test]
    fn test_csv_is_tab_separated_and_quoted() {
        let result = QueryResult {
            vars: vec!["s".to_string(), "o".to_string()],
            rows: vec![vec![
                Some(Value::Literal("hello".to_string())),
                None,
            ]],
        };
        let rendered = render(&result, "q", OutputMode::Csv, &Namespaces::empty());
        let lines: Vec<&str> = rendered.text.lines().collect();
        assert_eq!(lines[0], "\"s\"\t\"o\"");
        assert_eq!(lines[1], "\"hello\"\t\"\"");
    }

    #[test]
    fn test_candidates_deduplicated_across_rows() {
        let result = QueryResult {
            vars: vec!["s".to_string()],
            rows: vec![
                vec![Some(Value::Literal("same".to_string()))],
                vec![Some(Value::Literal("same".to_string()))],
                vec![Some(Value::Literal("other".to_string()))],
            ],
        };
        let rendered = render(&result, "q", OutputMode::Csv, &Namespaces::empty());
        assert_eq!(rendered.candidates, vec!["same", "other"]);
    }

    #[test]
    fn test_blank_node_rendering() {
        let result = QueryResult {
            vars: vec!["s".to_string()],
            rows: vec![vec![Some(Value::Blank("b0".to_string()))]],
        };
        let rendered = render(&result, "q", OutputMode::Csv, &Namespaces::empty());
        assert!(rendered.text.contains("\"_:b0\""));
    }

    #[test]
    fn test_unmatched_iri_rendered_in_full() {
        let result = QueryResult {
            vars: vec!["s".to_string()],
            rows: vec![vec![Some(Value::Iri("http://nowhere.org/x".to_string()))]],
        };
        let rendered = render(&result, "q", OutputMode::Csv, &Namespaces::empty());
        assert!(rendered.text.contains("http://nowhere.org/x"));
    }
}
