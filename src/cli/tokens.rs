//! Token listing for debugging rules

use super::CliError;
use crate::tokenize;

/// One line per token: `line:column KIND "lexeme"`, whitespace included.
pub fn dump_tokens(source: &str) -> Result<Vec<String>, CliError> {
    let tokens = tokenize(source).map_err(crate::Error::from)?;
    Ok(tokens
        .iter()
        .map(|t| {
            format!(
                "{}:{}\t{}\t{:?}",
                t.position.line, t.position.column, t.kind, t.lexeme
            )
        })
        .collect())
}

#[test]
fn test_dump_includes_whitespace_and_eof() {
    let lines = dump_tokens("{a} = 1").unwrap();
    assert_eq!(
        lines,
        vec![
            "1:1\tVARIABLE\t\"{a}\"",
            "1:4\tWHITESPACE\t\" \"",
            "1:5\tOPERATOR\t\"=\"",
            "1:6\tWHITESPACE\t\" \"",
            "1:7\tNUMBER\t\"1\"",
            "1:8\tEOF\t\"\"",
        ]
    );
}
