use super::*;

#[test]
fn test_split_simple_statements() {
    let stmts = split_statements("CREATE TABLE a (id INT); CREATE TABLE b (id INT);");
    assert_eq!(stmts, vec!["CREATE TABLE a (id INT)", "CREATE TABLE b (id INT)"]);
}

#[test]
fn test_split_without_trailing_terminator() {
    let stmts = split_statements("SELECT 1;\nSELECT 2");
    assert_eq!(stmts, vec!["SELECT 1", "SELECT 2"]);
}

#[test]
fn test_split_drops_empty_fragments() {
    let stmts = split_statements(";;  ;\n\nSELECT 1;;\n;");
    assert_eq!(stmts, vec!["SELECT 1"]);
}

#[test]
fn test_split_empty_script() {
    assert!(split_statements("").is_empty());
    assert!(split_statements("   \n\t ").is_empty());
}

#[test]
fn test_split_strips_line_comments() {
    let script = "-- header comment\nCREATE TABLE a (id INT); -- trailing\n-- only a comment;\n";
    assert_eq!(split_statements(script), vec!["CREATE TABLE a (id INT)"]);
}

#[test]
fn test_split_strips_block_comments() {
    let script = "/* multi\n line; with terminator */\nCREATE TABLE a (id INT);\n/* trailing */";
    assert_eq!(split_statements(script), vec!["CREATE TABLE a (id INT)"]);
}

#[test]
fn test_block_comment_does_not_merge_tokens() {
    assert_eq!(strip_comments("SELECT/*x*/1"), "SELECT 1");
}

#[test]
fn test_comment_only_script_yields_nothing() {
    let script = "-- a;\n/* b; */\n-- c";
    assert!(split_statements(script).is_empty());
}

#[test]
fn test_terminator_inside_string_literal() {
    let script = "INSERT INTO t VALUES ('a;b'); SELECT 2;";
    assert_eq!(
        split_statements(script),
        vec!["INSERT INTO t VALUES ('a;b')", "SELECT 2"]
    );
}

#[test]
fn test_comment_markers_inside_string_literal() {
    let script = "INSERT INTO t VALUES ('--not a comment', '/* nor this */');";
    assert_eq!(
        split_statements(script),
        vec!["INSERT INTO t VALUES ('--not a comment', '/* nor this */')"]
    );
}

#[test]
fn test_escaped_quote_inside_literal() {
    let script = "INSERT INTO t VALUES ('it''s; fine'); SELECT 1";
    assert_eq!(
        split_statements(script),
        vec!["INSERT INTO t VALUES ('it''s; fine')", "SELECT 1"]
    );
}

#[test]
fn test_terminator_inside_quoted_identifier() {
    let script = r#"CREATE TABLE "odd;name" (id INT); SELECT 1"#;
    assert_eq!(
        split_statements(script),
        vec![r#"CREATE TABLE "odd;name" (id INT)"#, "SELECT 1"]
    );
}

#[test]
fn test_unterminated_literal_is_passed_through() {
    let stmts = split_statements("SELECT 'oops; SELECT 2");
    assert_eq!(stmts, vec!["SELECT 'oops; SELECT 2"]);
}

#[test]
fn test_split_preserves_order_and_count() {
    let script = (0..25)
        .map(|i| format!("-- statement {i}\nINSERT INTO t VALUES ({i});"))
        .collect::<String>();
    let stmts = split_statements(&script);
    assert_eq!(stmts.len(), 25);
    for (i, stmt) in stmts.iter().enumerate() {
        assert_eq!(stmt, &format!("INSERT INTO t VALUES ({i})"));
    }
}

#[test]
fn test_split_is_idempotent_after_rejoin() {
    let script = "/* setup */\nCREATE TABLE a (id INT, note VARCHAR DEFAULT 'x;y');\n\
                  -- seed\nINSERT INTO a VALUES (1, 'it''s');\nSELECT 1";
    let first = split_statements(script);
    let rejoined = first.join(";\n");
    let second = split_statements(&rejoined);
    assert_eq!(first, second);
}

#[test]
fn test_multiline_statement_is_trimmed_not_collapsed() {
    let script = "\n  CREATE TABLE a (\n    id INT\n  );\n";
    assert_eq!(split_statements(script), vec!["CREATE TABLE a (\n    id INT\n  )"]);
}

#[test]
fn test_quote_qualified() {
    assert_eq!(quote_qualified("dms_sites"), r#""dms_sites""#);
    assert_eq!(quote_qualified("master.dms_sites"), r#""master"."dms_sites""#);
    assert_eq!(quote_ident(r#"a"b"#), r#""a""b""#);
}

#[test]
fn test_split_qualified_name() {
    assert_eq!(split_qualified_name("dms_sites"), ("main", "dms_sites"));
    assert_eq!(split_qualified_name("master.dms_sites"), ("master", "dms_sites"));
    assert_eq!(split_qualified_name("db.master.t"), ("db.master", "t"));
}
