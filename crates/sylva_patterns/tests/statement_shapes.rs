//! A consumer-style statement recognizer built on the public surface,
//! in the shape of the toy SQL parsers this toolkit exists to serve.

use pretty_assertions::assert_eq;
use sylva_lexer::parse;
use sylva_patterns::{any_token, expression, iterator, syntax_error, token_ci, CaseArm, Cursor};
use sylva_tree::Tree;

fn parsed(source: &str) -> Tree {
    match parse(source) {
        Ok(tree) => tree,
        Err(e) => panic!("parse failed for {source:?}: {e}"),
    }
}

#[derive(Debug, PartialEq)]
struct Column {
    name: String,
    alias: Option<String>,
}

#[derive(Debug, PartialEq, Default)]
struct Select {
    columns: Vec<Column>,
    tables: Vec<String>,
    has_subquery: bool,
}

fn clause_done(cur: &Cursor<'_>) -> bool {
    cur.at_end() || cur.next_is("from") || cur.next_is("where") || cur.next_is(";")
}

fn parse_column(cur: &mut Cursor<'_>) -> Option<Column> {
    cur.case(&[
        CaseArm {
            tests: &[&any_token(), &token_ci("as"), &any_token()],
            handler: &|caps, _| {
                Some(Column {
                    name: caps[0].token_text().to_string(),
                    alias: Some(caps[2].token_text().to_string()),
                })
            },
        },
        CaseArm {
            tests: &[&any_token()],
            handler: &|caps, _| {
                Some(Column {
                    name: caps[0].token_text().to_string(),
                    alias: None,
                })
            },
        },
    ])
}

fn parse_select(cur: &mut Cursor<'_>) -> Option<Select> {
    if !cur.match_all(&[&token_ci("SELECT")]) {
        return None;
    }
    let mut statement = Select::default();
    while !clause_done(cur) {
        cur.skip_word(",");
        match parse_column(cur) {
            Some(column) => statement.columns.push(column),
            None => break,
        }
    }
    if cur.skip_word("from") {
        while !cur.at_end() && !cur.next_is(";") && !cur.next_is("where") {
            cur.skip_word(",");
            if cur.probe(&[&expression()]) {
                // Parenthesized subquery as a source.
                let mut sub = None;
                cur.match_all_with(&[&expression()], |caps| sub = Some(caps[0]));
                if let Some(mut sub) = sub {
                    statement.has_subquery = parse_select(&mut sub).is_some();
                }
            } else if !cur.token_text().is_empty() {
                statement.tables.push(cur.token_text().to_string());
                cur.skip_units(1);
            } else {
                break;
            }
        }
    }
    // Drain anything up to the statement terminator, then consume it.
    cur.iterate_until(|c| !c.next_is(";"));
    cur.skip_word(";");
    Some(statement)
}

#[test]
fn select_with_aliases_and_tables() {
    let tree = parsed("SELECT a, b AS bee FROM t1, t2;");
    let mut cur = iterator(&tree);
    let statement = match parse_select(&mut cur) {
        Some(s) => s,
        None => panic!("statement did not parse"),
    };
    assert_eq!(
        statement.columns,
        vec![
            Column {
                name: "a".to_string(),
                alias: None
            },
            Column {
                name: "b".to_string(),
                alias: Some("bee".to_string())
            },
        ]
    );
    assert_eq!(statement.tables, vec!["t1", "t2"]);
    assert!(!statement.has_subquery);
    assert!(cur.at_end());
}

#[test]
fn keywords_match_in_any_case() {
    let tree = parsed("select x from users;");
    let mut cur = iterator(&tree);
    let statement = match parse_select(&mut cur) {
        Some(s) => s,
        None => panic!("statement did not parse"),
    };
    assert_eq!(statement.columns.len(), 1);
    assert_eq!(statement.tables, vec!["users"]);
}

#[test]
fn statements_split_across_lines() {
    let tree = parsed("SELECT\n  a,\n  b\nFROM\n  t1;\n");
    let mut cur = iterator(&tree);
    let statement = match parse_select(&mut cur) {
        Some(s) => s,
        None => panic!("statement did not parse"),
    };
    assert_eq!(statement.columns.len(), 2);
    assert_eq!(statement.tables, vec!["t1"]);
}

#[test]
fn subquery_sources_are_recognized() {
    let tree = parsed("SELECT a FROM (SELECT b FROM inner_table) ;");
    let mut cur = iterator(&tree);
    let statement = match parse_select(&mut cur) {
        Some(s) => s,
        None => panic!("statement did not parse"),
    };
    assert!(statement.has_subquery);
}

#[test]
fn alias_presence_is_checkable_ahead_of_time() {
    let tree = parsed("SELECT a AS x FROM t;");
    let cur = iterator(&tree);
    assert!(cur.has_token("as", &["from"]));
    assert!(!cur.has_token("where", &["from"]));
}

#[test]
fn non_select_statements_are_rejected_without_movement() {
    let tree = parsed("DELETE FROM t;");
    let mut cur = iterator(&tree);
    assert!(parse_select(&mut cur).is_none());
    assert_eq!(cur.token_text(), "DELETE");
    let message = syntax_error(&cur, "expected a SELECT statement");
    assert!(message.contains("DELETE"));
}

#[test]
fn successive_statements_consume_in_order() {
    let tree = parsed("SELECT a FROM t1; SELECT b FROM t2;");
    let mut cur = iterator(&tree);
    let first = match parse_select(&mut cur) {
        Some(s) => s,
        None => panic!("first statement did not parse"),
    };
    let second = match parse_select(&mut cur) {
        Some(s) => s,
        None => panic!("second statement did not parse"),
    };
    assert_eq!(first.tables, vec!["t1"]);
    assert_eq!(second.tables, vec!["t2"]);
    assert!(cur.at_end());
}
