use user_upload::splitter::{split, LineKind, SqlStatement, StatementBuffer};

fn texts(script: &str) -> Vec<String> {
    split(script).map(SqlStatement::into_string).collect()
}

#[test]
fn test_split_shipped_schema() {
    let script = std::fs::read_to_string(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/database/users_schema.sql"
    ))
    .unwrap();

    let stmts: Vec<SqlStatement> = split(&script).collect();
    assert_eq!(stmts.len(), 2);
    assert_eq!(stmts[0].to_string().trim(), "DROP TABLE IF EXISTS users;");
    assert!(stmts[1].as_str().contains("CREATE TABLE users ("));
    assert!(stmts[1].as_str().contains("UNIQUE (email)"));
    assert!(!stmts[1].as_str().contains("--"));
}

#[test]
fn test_statements_in_source_order() {
    let script = "CREATE TABLE a (id INT);\nCREATE TABLE b (id INT);\nCREATE TABLE c (id INT);\n";
    let stmts = texts(script);
    assert_eq!(
        stmts,
        vec![
            "CREATE TABLE a (id INT);\n",
            "CREATE TABLE b (id INT);\n",
            "CREATE TABLE c (id INT);\n",
        ]
    );
}

#[test]
fn test_block_comment_line_is_a_no_op() {
    let script = "CREATE TABLE a (\n/* a column */;\n  id INT\n);\n";
    assert_eq!(texts(script), vec!["CREATE TABLE a (\n  id INT\n);\n"]);
}

#[test]
fn test_unclosed_block_comment_is_ordinary_text() {
    let script = "/* opening\nstill comment */\nSELECT 1;\n";
    assert_eq!(texts(script), vec!["/* opening\nstill comment */\nSELECT 1;\n"]);
}

#[test]
fn test_semicolon_anywhere_ends_statement() {
    let script = "INSERT INTO t VALUES ('a;b'),\n('c');\n";
    // Line-oriented: the first line already contains ';'
    assert_eq!(
        texts(script),
        vec!["INSERT INTO t VALUES ('a;b'),\n", "('c');\n"]
    );
}

#[test]
fn test_trailing_statement_without_terminator_is_dropped() {
    let script = "DROP TABLE IF EXISTS users;\nCREATE TABLE users (id INT)\n";
    assert_eq!(texts(script), vec!["DROP TABLE IF EXISTS users;\n"]);
}

#[test]
fn test_split_is_lazy() {
    let script = "SELECT 1;\nSELECT 2;\nSELECT 3;\n";
    let mut stmts = split(script);
    assert_eq!(stmts.next().unwrap().as_str(), "SELECT 1;\n");
    assert_eq!(stmts.next().unwrap().as_str(), "SELECT 2;\n");
    assert_eq!(stmts.next().unwrap().as_str(), "SELECT 3;\n");
    assert!(stmts.next().is_none());
    assert!(stmts.next().is_none());
}

#[test]
fn test_resplitting_joined_statements_is_idempotent() {
    let first = "-- a\nCREATE TABLE a (\n  id INT\n);\nSELECT 1";
    let second = "/* x */;\nINSERT INTO a VALUES (1);\n\nSELECT 2;";

    let mut combined: Vec<String> = texts(first);
    combined.extend(texts(second));

    let joined: String = combined.concat();
    assert_eq!(texts(&joined), combined);

    // And again on the output of the second pass
    let again: String = texts(&joined).concat();
    assert_eq!(again, joined);
}

#[test]
fn test_splitting_same_text_twice_gives_same_result() {
    let script = "DROP TABLE x;\nCREATE TABLE x (\n id INT\n);\n";
    assert_eq!(texts(script), texts(script));
}

#[test]
fn test_statement_buffer_driven_manually() {
    let mut buffer = StatementBuffer::new();
    assert!(buffer.push_line("-- comment").is_none());
    assert!(!buffer.has_pending());
    assert!(buffer.push_line("SELECT").is_none());
    let stmt = buffer.push_line("  1;").unwrap();
    assert_eq!(stmt.as_str(), "SELECT\n  1;\n");
    assert!(!buffer.has_pending());
}

#[test]
fn test_line_kind_precedence() {
    // A '--' line is dropped even though it contains a terminator
    assert_eq!(LineKind::classify("--;"), LineKind::LineComment);
    // A block comment with terminator wins over the plain terminator rule
    assert_eq!(
        LineKind::classify("/* SET NAMES utf8 */;"),
        LineKind::TerminatedBlockComment
    );
}
