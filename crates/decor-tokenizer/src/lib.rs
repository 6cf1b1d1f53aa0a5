mod cursor;

use cursor::Cursor;
use decor_syntax::Comment;
pub use decor_syntax::SyntaxKind;
use decor_syntax::SyntaxKind::*;
use text_size::{TextRange, TextSize};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    /// Empty for a semicolon inserted at a line break.
    pub range: TextRange,
}

/// Splits `text` into tokens, ending with `EOF`, and the comments between them.
pub fn tokenize(text: &str) -> (Vec<Token>, Vec<Comment>) {
    let mut tokenizer = Tokenizer::new(text);
    let mut tokens = Vec::new();
    loop {
        let token = tokenizer.next_token();
        tokens.push(token);
        if token.kind == EOF {
            break;
        }
    }
    (tokens, tokenizer.into_comments())
}

pub struct Tokenizer<'text> {
    text: &'text str,
    cursor: Cursor<'text>,
    comments: Vec<Comment>,
    last: Option<SyntaxKind>,
}

impl<'text> Tokenizer<'text> {
    pub fn new(text: &'text str) -> Self {
        Self { text, cursor: Cursor::new(text), comments: Vec::new(), last: None }
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn into_comments(self) -> Vec<Comment> {
        self.comments
    }

    pub fn next_token(&mut self) -> Token {
        let token = match self.trivia() {
            Some(token) => token,
            None => {
                self.cursor.start_token();
                let kind = self.syntax_kind();
                Token { kind, range: TextRange::new(self.cursor.token_start(), self.cursor.offset()) }
            }
        };
        if token.kind != EOF {
            self.last = Some(token.kind);
        }
        token
    }

    fn needs_semicolon(&self) -> bool {
        self.last.is_some_and(SyntaxKind::ends_statement)
    }

    fn semicolon(&self, at: TextSize) -> Token {
        Token { kind: SEMICOLON, range: TextRange::empty(at) }
    }

    /// Skips whitespace and comments, stopping early at a line break that
    /// terminates a statement.
    fn trivia(&mut self) -> Option<Token> {
        loop {
            let at = self.cursor.offset();
            match self.cursor.peek() {
                _ if self.cursor.is_eof() => {
                    return self.needs_semicolon().then(|| self.semicolon(at));
                }
                '\n' => {
                    self.cursor.advance();
                    if self.needs_semicolon() {
                        return Some(self.semicolon(at));
                    }
                }
                ' ' | '\t' | '\r' => self.cursor.advance_while(|c| matches!(c, ' ' | '\t' | '\r')),
                '/' if self.cursor.second() == '/' => {
                    self.cursor.advance_while(|c| c != '\n');
                    self.comment(at);
                }
                '/' if self.cursor.second() == '*' => {
                    self.cursor.advance();
                    self.cursor.advance();
                    let mut terminated = false;
                    while !self.cursor.is_eof() {
                        if self.cursor.advance() == '*' && self.cursor.eat('/') {
                            terminated = true;
                            break;
                        }
                    }
                    let range = TextRange::new(at, self.cursor.offset());
                    if !terminated {
                        return Some(Token { kind: UNKNOWN, range });
                    }
                    self.comment(at);
                    if self.text[range].contains('\n') && self.needs_semicolon() {
                        return Some(self.semicolon(at));
                    }
                }
                _ => return None,
            }
        }
    }

    fn comment(&mut self, start: TextSize) {
        let range = TextRange::new(start, self.cursor.offset());
        self.comments.push(Comment { pos: start, text: self.text[range].to_owned() });
    }

    fn text(&self) -> &'text str {
        &self.text[TextRange::new(self.cursor.token_start(), self.cursor.offset())]
    }

    fn syntax_kind(&mut self) -> SyntaxKind {
        if self.cursor.is_eof() {
            return EOF;
        }

        match self.cursor.advance() {
            '(' => LEFT_PAREN,
            ')' => RIGHT_PAREN,
            '[' => LEFT_BRACKET,
            ']' => RIGHT_BRACKET,
            '{' => LEFT_BRACE,
            '}' => RIGHT_BRACE,
            ',' => COMMA,
            ';' => SEMICOLON,
            ':' => self.either('=', DEFINE, COLON),
            '.' => match self.cursor.peek() {
                '0'..='9' => self.number('.'),
                '.' if self.cursor.second() == '.' => {
                    self.cursor.advance();
                    self.cursor.advance();
                    ELLIPSIS
                }
                _ => DOT,
            },
            '+' => match self.cursor.peek() {
                '+' => self.bump(PLUS_PLUS),
                _ => self.either('=', PLUS_EQ, PLUS),
            },
            '-' => match self.cursor.peek() {
                '-' => self.bump(MINUS_MINUS),
                _ => self.either('=', MINUS_EQ, MINUS),
            },
            '*' => self.either('=', STAR_EQ, STAR),
            '/' => self.either('=', SLASH_EQ, SLASH),
            '%' => self.either('=', PERCENT_EQ, PERCENT),
            '&' => match self.cursor.peek() {
                '&' => self.bump(AMP_AMP),
                '^' => {
                    self.cursor.advance();
                    self.either('=', AMP_CARET_EQ, AMP_CARET)
                }
                _ => self.either('=', AMP_EQ, AMP),
            },
            '|' => match self.cursor.peek() {
                '|' => self.bump(PIPE_PIPE),
                _ => self.either('=', PIPE_EQ, PIPE),
            },
            '^' => self.either('=', CARET_EQ, CARET),
            '<' => match self.cursor.peek() {
                '-' => self.bump(ARROW),
                '<' => {
                    self.cursor.advance();
                    self.either('=', SHL_EQ, SHL)
                }
                _ => self.either('=', LT_EQ, LT),
            },
            '>' => match self.cursor.peek() {
                '>' => {
                    self.cursor.advance();
                    self.either('=', SHR_EQ, SHR)
                }
                _ => self.either('=', GT_EQ, GT),
            },
            '=' => self.either('=', EQ_EQ, EQ),
            '!' => self.either('=', NEQ, BANG),
            '"' => self.quoted('"', STRING),
            '\'' => self.quoted('\'', CHAR),
            '`' => {
                self.cursor.advance_while(|c| c != '`');
                if self.cursor.eat('`') { STRING } else { UNKNOWN }
            }
            first_char @ '0'..='9' => self.number(first_char),
            c if c == '_' || c.is_alphabetic() => {
                self.cursor.advance_while(|c| c == '_' || c.is_alphanumeric());
                SyntaxKind::from_keyword(self.text()).unwrap_or(NAME)
            }
            _ => UNKNOWN,
        }
    }

    fn bump(&mut self, kind: SyntaxKind) -> SyntaxKind {
        self.cursor.advance();
        kind
    }

    fn either(&mut self, next: char, matched: SyntaxKind, otherwise: SyntaxKind) -> SyntaxKind {
        if self.cursor.eat(next) { matched } else { otherwise }
    }

    /// Interpreted string or rune literal; may not span lines.
    fn quoted(&mut self, quote: char, kind: SyntaxKind) -> SyntaxKind {
        loop {
            if self.cursor.is_eof() {
                return UNKNOWN;
            }
            match self.cursor.peek() {
                '\n' => return UNKNOWN,
                '\\' => {
                    self.cursor.advance();
                    if self.cursor.peek() != '\n' {
                        self.cursor.advance();
                    }
                }
                c => {
                    self.cursor.advance();
                    if c == quote {
                        return kind;
                    }
                }
            }
        }
    }

    fn number(&mut self, c: char) -> SyntaxKind {
        if c == '.' {
            self.digits(false);
            self.float_exponent();
            return FLOAT_NUMBER;
        }

        if c == '0' {
            match self.cursor.peek() {
                'b' | 'B' | 'o' | 'O' => {
                    self.cursor.advance();
                    self.digits(false);
                    return INT_NUMBER;
                }
                'x' | 'X' => {
                    self.cursor.advance();
                    self.digits(true);
                    return INT_NUMBER;
                }
                '0'..='9' | '_' | '.' | 'e' | 'E' => self.digits(false),
                _ => return INT_NUMBER,
            }
        } else {
            self.digits(false);
        }

        if self.cursor.matches('.') && self.cursor.second() != '.' {
            self.cursor.advance();
            self.digits(false);
            self.float_exponent();
            return FLOAT_NUMBER;
        }

        if self.cursor.matches('e') || self.cursor.matches('E') {
            self.float_exponent();
            return FLOAT_NUMBER;
        }

        INT_NUMBER
    }

    fn digits(&mut self, allow_hex: bool) {
        loop {
            match self.cursor.peek() {
                '_' | '0'..='9' => {}
                'a'..='f' | 'A'..='F' if allow_hex => {}
                _ => return,
            }
            self.cursor.advance();
        }
    }

    fn float_exponent(&mut self) {
        if self.cursor.matches('e') || self.cursor.matches('E') {
            self.cursor.advance();
            if self.cursor.matches('-') || self.cursor.matches('+') {
                self.cursor.advance();
            }
            self.digits(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fmt::Write;

    use expect_test::{Expect, expect};

    use super::*;

    fn check(text: &str, expect: Expect) {
        let (tokens, comments) = tokenize(text);
        let mut actual = String::new();
        for token in tokens {
            let token_text = &text[token.range];
            writeln!(actual, "{:?} {:?} {token_text:?}", token.kind, token.range).unwrap();
        }
        for comment in comments {
            writeln!(actual, "comment {:?} {:?}", comment.range(), comment.text).unwrap();
        }
        expect.assert_eq(&actual);
    }

    #[test]
    fn integer_literals() {
        let inputs = ["123", "0", "0b1010", "0o755", "0x1f", "123_456"];

        for input in inputs {
            let mut tokenizer = Tokenizer::new(input);
            let kind = tokenizer.next_token().kind;
            assert_eq!(kind, INT_NUMBER, "Input: '{input}'");
            assert!(tokenizer.cursor.is_eof(), "Tokenizer did not consume all input for '{input}'");
        }
    }

    #[test]
    fn float_literals() {
        let inputs = ["123.456", "0.0", "1e10", "1.0e-5", "123_456.789_012", ".5"];

        for input in inputs {
            let mut tokenizer = Tokenizer::new(input);
            let kind = tokenizer.next_token().kind;
            assert_eq!(kind, FLOAT_NUMBER, "Input: '{input}'");
            assert!(tokenizer.cursor.is_eof(), "Tokenizer did not consume all input for '{input}'");
        }
    }

    #[test]
    fn operators_take_the_longest_match() {
        check(
            "a &^= b <<= c <- d ... e",
            expect![[r#"
                NAME 0..1 "a"
                AMP_CARET_EQ 2..5 "&^="
                NAME 6..7 "b"
                SHL_EQ 8..11 "<<="
                NAME 12..13 "c"
                ARROW 14..16 "<-"
                NAME 17..18 "d"
                ELLIPSIS 19..22 "..."
                NAME 23..24 "e"
                SEMICOLON 24..24 ""
                EOF 24..24 ""
            "#]],
        );
    }

    #[test]
    fn semicolons_are_inserted_at_line_ends() {
        check(
            "x++ // bump\ny = f(\n1,\n)\n",
            expect![[r#"
                NAME 0..1 "x"
                PLUS_PLUS 1..3 "++"
                SEMICOLON 11..11 ""
                NAME 12..13 "y"
                EQ 14..15 "="
                NAME 16..17 "f"
                LEFT_PAREN 17..18 "("
                INT_NUMBER 19..20 "1"
                COMMA 20..21 ","
                RIGHT_PAREN 22..23 ")"
                SEMICOLON 23..23 ""
                EOF 24..24 ""
                comment 4..11 "// bump"
            "#]],
        );
    }

    #[test]
    fn multi_line_block_comment_ends_statement() {
        check(
            "return /* a\nb */ x",
            expect![[r#"
                RETURN_KW 0..6 "return"
                SEMICOLON 7..7 ""
                NAME 17..18 "x"
                SEMICOLON 18..18 ""
                EOF 18..18 ""
                comment 7..16 "/* a\nb */"
            "#]],
        );
    }

    #[test]
    fn literals() {
        check(
            "\"a\\\"b\" 'c' `raw\nline` 0x1F",
            expect![[r#"
                STRING 0..6 "\"a\\\"b\""
                CHAR 7..10 "'c'"
                STRING 11..21 "`raw\nline`"
                INT_NUMBER 22..26 "0x1F"
                SEMICOLON 26..26 ""
                EOF 26..26 ""
            "#]],
        );
    }

    #[test]
    fn unterminated_literals_are_unknown() {
        for input in ["\"abc\n", "'a", "`raw", "/* open"] {
            let (tokens, _) = tokenize(input);
            assert_eq!(tokens[0].kind, UNKNOWN, "Input: {input:?}");
        }
    }
}
