//! Recursive-descent parser producing the positioned tree of `decor_syntax::ast`.

use decor_errors::Diagnostic;
use decor_span::LineTable;
use decor_syntax::ast;
use decor_syntax::{CommentGroup, group_comments};

mod grammar;
mod parser;
#[cfg(test)]
mod tests;

/// A parsed file together with everything needed to print it back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedFile {
    pub file: ast::File,
    pub lines: LineTable,
    pub comments: Vec<CommentGroup>,
}

/// Parses a whole source file, stopping at the first syntax error.
pub fn parse(text: &str) -> Result<ParsedFile, Diagnostic> {
    let (tokens, comments) = decor_tokenizer::tokenize(text);
    let ranges = tokens.iter().map(|token| token.range).collect::<Vec<_>>();

    let mut parser = parser::Parser::new(text, tokens);
    let file = grammar::items::file(&mut parser)?;

    let lines = LineTable::from_text(text);
    let comments = group_comments(&comments, &ranges, &lines);
    Ok(ParsedFile { file, lines, comments })
}
