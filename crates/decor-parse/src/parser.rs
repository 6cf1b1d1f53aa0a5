use decor_errors::Diagnostic;
use decor_syntax::SyntaxKind::{self, *};
use decor_syntax::SyntaxSet;
use decor_syntax::ast::Ident;
use decor_tokenizer::Token;
use text_size::TextSize;

pub(crate) type PResult<T> = Result<T, Diagnostic>;

pub(crate) struct Parser<'text> {
    text: &'text str,
    tokens: Vec<Token>,
    pos: usize,
    /// Negative inside control clause headers, where `T {` opens a block
    /// rather than a composite literal.
    pub(crate) expr_level: i32,
}

impl<'text> Parser<'text> {
    pub(crate) fn new(text: &'text str, tokens: Vec<Token>) -> Self {
        Self { text, tokens, pos: 0, expr_level: 0 }
    }

    pub(crate) fn text(&self) -> &'text str {
        self.text
    }

    pub(crate) fn nth(&self, n: usize) -> Token {
        let index = (self.pos + n).min(self.tokens.len().saturating_sub(1));
        self.tokens.get(index).copied().unwrap_or(Token {
            kind: EOF,
            range: text_size::TextRange::empty(TextSize::of(self.text)),
        })
    }

    pub(crate) fn peek(&self) -> Token {
        self.nth(0)
    }

    pub(crate) fn peek_kind(&self) -> SyntaxKind {
        self.peek().kind
    }

    pub(crate) fn nth_kind(&self, n: usize) -> SyntaxKind {
        self.nth(n).kind
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.peek_kind() == kind
    }

    pub(crate) fn at_set(&self, set: SyntaxSet) -> bool {
        set.contains(self.peek_kind())
    }

    /// Consumes the current token and returns its offset.
    pub(crate) fn advance(&mut self) -> TextSize {
        let token = self.peek();
        if token.kind != EOF {
            self.pos += 1;
        }
        token.range.start()
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> Option<TextSize> {
        self.at(kind).then(|| self.advance())
    }

    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> PResult<TextSize> {
        match self.eat(kind) {
            Some(pos) => Ok(pos),
            None => Err(self.error(format!("expected {}", describe(kind)))),
        }
    }

    pub(crate) fn ident(&mut self) -> PResult<Ident> {
        let token = self.peek();
        if token.kind != NAME {
            return Err(self.error("expected identifier"));
        }
        self.advance();
        Ok(Ident { pos: token.range.start(), name: self.text[token.range].to_owned() })
    }

    /// Statement terminator, optional before a closing delimiter.
    pub(crate) fn semi(&mut self) -> PResult<()> {
        if self.eat(SEMICOLON).is_some() || matches!(self.peek_kind(), RIGHT_PAREN | RIGHT_BRACE | EOF) {
            return Ok(());
        }
        Err(self.error(format!("expected `;`, found {}", describe(self.peek_kind()))))
    }

    pub(crate) fn error(&self, message: impl Into<String>) -> Diagnostic {
        let token = self.peek();
        let message = message.into();
        match token.kind {
            UNKNOWN => {
                let text = &self.text[token.range];
                let message = if text.starts_with(['"', '\'', '`']) {
                    "unterminated literal".to_owned()
                } else if text.starts_with("/*") {
                    "unterminated comment".to_owned()
                } else {
                    format!("unexpected character `{text}`")
                };
                Diagnostic::error(message, token.range)
            }
            _ => Diagnostic::error(message, token.range),
        }
    }

    /// Runs `f` with composite literals re-enabled, as inside brackets.
    pub(crate) fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        self.with_level(self.expr_level + 1, f)
    }

    pub(crate) fn with_level<T>(
        &mut self,
        level: i32,
        f: impl FnOnce(&mut Self) -> PResult<T>,
    ) -> PResult<T> {
        let saved = std::mem::replace(&mut self.expr_level, level);
        let result = f(self);
        self.expr_level = saved;
        result
    }
}

fn describe(kind: SyntaxKind) -> String {
    match kind {
        NAME => "identifier".to_owned(),
        INT_NUMBER | FLOAT_NUMBER | CHAR | STRING => "literal".to_owned(),
        EOF => "end of file".to_owned(),
        UNKNOWN => "unknown token".to_owned(),
        _ => kind.text().map_or_else(|| format!("{kind:?}"), |text| format!("`{text}`")),
    }
}
