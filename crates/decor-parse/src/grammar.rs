use decor_syntax::SyntaxKind::*;
use decor_syntax::SyntaxSet;
use decor_syntax::ast::{BasicLit, Expr, LitKind};

use crate::parser::{PResult, Parser};

pub(crate) mod exprs;
pub(crate) mod items;
mod stmts;
mod types;

pub(crate) const LITERALS: SyntaxSet = SyntaxSet::new([INT_NUMBER, FLOAT_NUMBER, CHAR, STRING]);

pub(crate) const TYPE_FIRST: SyntaxSet = SyntaxSet::new([
    NAME,
    STAR,
    LEFT_BRACKET,
    LEFT_PAREN,
    MAP_KW,
    CHAN_KW,
    ARROW,
    FUNC_KW,
    STRUCT_KW,
    INTERFACE_KW,
]);

pub(crate) fn basic_lit(p: &mut Parser) -> PResult<BasicLit> {
    let token = p.peek();
    let kind = match token.kind {
        INT_NUMBER => LitKind::Int,
        FLOAT_NUMBER => LitKind::Float,
        CHAR => LitKind::Char,
        STRING => LitKind::String,
        _ => return Err(p.error("expected literal")),
    };
    p.advance();
    Ok(BasicLit { pos: token.range.start(), kind, value: p.text()[token.range].to_owned() })
}

/// `x, y, z` with at least one element.
pub(crate) fn list<'t, T>(
    p: &mut Parser<'t>,
    mut element: impl FnMut(&mut Parser<'t>) -> PResult<T>,
) -> PResult<Vec<T>> {
    let mut items = vec![element(p)?];
    while p.eat(COMMA).is_some() {
        items.push(element(p)?);
    }
    Ok(items)
}

pub(crate) fn expr_list(p: &mut Parser) -> PResult<Vec<Expr>> {
    list(p, exprs::expr)
}
