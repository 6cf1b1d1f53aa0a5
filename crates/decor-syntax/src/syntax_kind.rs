#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SyntaxKind {
    LEFT_PAREN,
    RIGHT_PAREN,
    LEFT_BRACKET,
    RIGHT_BRACKET,
    LEFT_BRACE,
    RIGHT_BRACE,
    COMMA,
    DOT,
    COLON,
    SEMICOLON,
    ELLIPSIS,

    EQ,
    DEFINE,
    PLUS,
    MINUS,
    STAR,
    SLASH,
    PERCENT,
    AMP,
    PIPE,
    CARET,
    SHL,
    SHR,
    AMP_CARET,
    PLUS_EQ,
    MINUS_EQ,
    STAR_EQ,
    SLASH_EQ,
    PERCENT_EQ,
    AMP_EQ,
    PIPE_EQ,
    CARET_EQ,
    SHL_EQ,
    SHR_EQ,
    AMP_CARET_EQ,
    AMP_AMP,
    PIPE_PIPE,
    ARROW,
    PLUS_PLUS,
    MINUS_MINUS,
    EQ_EQ,
    NEQ,
    LT,
    GT,
    LT_EQ,
    GT_EQ,
    BANG,

    BREAK_KW,
    CASE_KW,
    CHAN_KW,
    CONST_KW,
    CONTINUE_KW,
    DEFAULT_KW,
    DEFER_KW,
    ELSE_KW,
    FALLTHROUGH_KW,
    FOR_KW,
    FUNC_KW,
    GO_KW,
    GOTO_KW,
    IF_KW,
    IMPORT_KW,
    INTERFACE_KW,
    MAP_KW,
    PACKAGE_KW,
    RANGE_KW,
    RETURN_KW,
    SELECT_KW,
    STRUCT_KW,
    SWITCH_KW,
    TYPE_KW,
    VAR_KW,

    NAME,
    INT_NUMBER,
    FLOAT_NUMBER,
    CHAR,
    STRING,

    UNKNOWN,
    EOF,
}

impl SyntaxKind {
    pub fn from_keyword(text: &str) -> Option<Self> {
        use SyntaxKind::*;

        Some(match text {
            "break" => BREAK_KW,
            "case" => CASE_KW,
            "chan" => CHAN_KW,
            "const" => CONST_KW,
            "continue" => CONTINUE_KW,
            "default" => DEFAULT_KW,
            "defer" => DEFER_KW,
            "else" => ELSE_KW,
            "fallthrough" => FALLTHROUGH_KW,
            "for" => FOR_KW,
            "func" => FUNC_KW,
            "go" => GO_KW,
            "goto" => GOTO_KW,
            "if" => IF_KW,
            "import" => IMPORT_KW,
            "interface" => INTERFACE_KW,
            "map" => MAP_KW,
            "package" => PACKAGE_KW,
            "range" => RANGE_KW,
            "return" => RETURN_KW,
            "select" => SELECT_KW,
            "struct" => STRUCT_KW,
            "switch" => SWITCH_KW,
            "type" => TYPE_KW,
            "var" => VAR_KW,
            _ => return None,
        })
    }

    /// Fixed spelling of punctuation, operators and keywords.
    pub fn text(self) -> Option<&'static str> {
        use SyntaxKind::*;

        Some(match self {
            LEFT_PAREN => "(",
            RIGHT_PAREN => ")",
            LEFT_BRACKET => "[",
            RIGHT_BRACKET => "]",
            LEFT_BRACE => "{",
            RIGHT_BRACE => "}",
            COMMA => ",",
            DOT => ".",
            COLON => ":",
            SEMICOLON => ";",
            ELLIPSIS => "...",
            EQ => "=",
            DEFINE => ":=",
            PLUS => "+",
            MINUS => "-",
            STAR => "*",
            SLASH => "/",
            PERCENT => "%",
            AMP => "&",
            PIPE => "|",
            CARET => "^",
            SHL => "<<",
            SHR => ">>",
            AMP_CARET => "&^",
            PLUS_EQ => "+=",
            MINUS_EQ => "-=",
            STAR_EQ => "*=",
            SLASH_EQ => "/=",
            PERCENT_EQ => "%=",
            AMP_EQ => "&=",
            PIPE_EQ => "|=",
            CARET_EQ => "^=",
            SHL_EQ => "<<=",
            SHR_EQ => ">>=",
            AMP_CARET_EQ => "&^=",
            AMP_AMP => "&&",
            PIPE_PIPE => "||",
            ARROW => "<-",
            PLUS_PLUS => "++",
            MINUS_MINUS => "--",
            EQ_EQ => "==",
            NEQ => "!=",
            LT => "<",
            GT => ">",
            LT_EQ => "<=",
            GT_EQ => ">=",
            BANG => "!",
            BREAK_KW => "break",
            CASE_KW => "case",
            CHAN_KW => "chan",
            CONST_KW => "const",
            CONTINUE_KW => "continue",
            DEFAULT_KW => "default",
            DEFER_KW => "defer",
            ELSE_KW => "else",
            FALLTHROUGH_KW => "fallthrough",
            FOR_KW => "for",
            FUNC_KW => "func",
            GO_KW => "go",
            GOTO_KW => "goto",
            IF_KW => "if",
            IMPORT_KW => "import",
            INTERFACE_KW => "interface",
            MAP_KW => "map",
            PACKAGE_KW => "package",
            RANGE_KW => "range",
            RETURN_KW => "return",
            SELECT_KW => "select",
            STRUCT_KW => "struct",
            SWITCH_KW => "switch",
            TYPE_KW => "type",
            VAR_KW => "var",
            NAME | INT_NUMBER | FLOAT_NUMBER | CHAR | STRING | UNKNOWN | EOF => return None,
        })
    }

    /// Whether a line break after this token ends the statement.
    pub fn ends_statement(self) -> bool {
        use SyntaxKind::*;

        matches!(
            self,
            NAME | INT_NUMBER
                | FLOAT_NUMBER
                | CHAR
                | STRING
                | BREAK_KW
                | CONTINUE_KW
                | FALLTHROUGH_KW
                | RETURN_KW
                | PLUS_PLUS
                | MINUS_MINUS
                | RIGHT_PAREN
                | RIGHT_BRACKET
                | RIGHT_BRACE
        )
    }
}
