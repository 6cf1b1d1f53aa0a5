use decor_syntax::SyntaxKind::{self, *};
use decor_syntax::ast::*;

use super::{LITERALS, basic_lit, stmts, types};
use crate::parser::{PResult, Parser};

pub(crate) fn expr(p: &mut Parser) -> PResult<Expr> {
    binary_expr(p, 1)
}

fn binary_op(kind: SyntaxKind) -> Option<BinaryOp> {
    Some(match kind {
        PIPE_PIPE => BinaryOp::LogOr,
        AMP_AMP => BinaryOp::LogAnd,
        EQ_EQ => BinaryOp::Eq,
        NEQ => BinaryOp::Neq,
        LT => BinaryOp::Lt,
        LT_EQ => BinaryOp::LtEq,
        GT => BinaryOp::Gt,
        GT_EQ => BinaryOp::GtEq,
        PLUS => BinaryOp::Add,
        MINUS => BinaryOp::Sub,
        PIPE => BinaryOp::Or,
        CARET => BinaryOp::Xor,
        STAR => BinaryOp::Mul,
        SLASH => BinaryOp::Quo,
        PERCENT => BinaryOp::Rem,
        SHL => BinaryOp::Shl,
        SHR => BinaryOp::Shr,
        AMP => BinaryOp::And,
        AMP_CARET => BinaryOp::AndNot,
        _ => return None,
    })
}

fn binary_expr(p: &mut Parser, min_precedence: u8) -> PResult<Expr> {
    let mut x = unary_expr(p)?;
    while let Some(op) = binary_op(p.peek_kind()) {
        if op.precedence() < min_precedence {
            break;
        }
        let op_pos = p.advance();
        let y = binary_expr(p, op.precedence() + 1)?;
        x = Expr::Binary(BinaryExpr { x: Box::new(x), op_pos, op, y: Box::new(y) });
    }
    Ok(x)
}

fn unary_expr(p: &mut Parser) -> PResult<Expr> {
    let op = match p.peek_kind() {
        PLUS => UnaryOp::Plus,
        MINUS => UnaryOp::Minus,
        BANG => UnaryOp::Not,
        CARET => UnaryOp::Xor,
        AMP => UnaryOp::Addr,
        ARROW if p.nth_kind(1) == CHAN_KW => return primary_expr(p),
        ARROW => UnaryOp::Recv,
        STAR => {
            let star = p.advance();
            let x = unary_expr(p)?;
            return Ok(Expr::Star(StarExpr { star, x: Box::new(x) }));
        }
        _ => return primary_expr(p),
    };
    let op_pos = p.advance();
    let x = unary_expr(p)?;
    Ok(Expr::Unary(UnaryExpr { op_pos, op, x: Box::new(x) }))
}

fn operand(p: &mut Parser) -> PResult<Expr> {
    match p.peek_kind() {
        NAME => p.ident().map(Expr::Ident),
        kind if LITERALS.contains(kind) => basic_lit(p).map(Expr::BasicLit),
        LEFT_PAREN => {
            let lparen = p.advance();
            let x = p.nested(expr)?;
            let rparen = p.expect(RIGHT_PAREN)?;
            Ok(Expr::Paren(ParenExpr { lparen, x: Box::new(x), rparen }))
        }
        FUNC_KW => {
            let func = p.advance();
            let typ = types::signature(p, Some(func))?;
            if !p.at(LEFT_BRACE) {
                return Ok(Expr::FuncType(typ));
            }
            let body = p.with_level(0, stmts::block)?;
            Ok(Expr::FuncLit(FuncLit { typ, body }))
        }
        LEFT_BRACKET | MAP_KW | CHAN_KW | ARROW | STRUCT_KW | INTERFACE_KW => types::type_(p),
        _ => Err(p.error("expected expression")),
    }
}

fn primary_expr(p: &mut Parser) -> PResult<Expr> {
    let mut x = operand(p)?;
    loop {
        x = match p.peek_kind() {
            DOT => {
                p.advance();
                match p.peek_kind() {
                    NAME => Expr::Selector(SelectorExpr { x: Box::new(x), sel: p.ident()? }),
                    LEFT_PAREN => type_assert(p, x)?,
                    _ => return Err(p.error("expected selector or type assertion")),
                }
            }
            LEFT_BRACKET => index_or_slice(p, x)?,
            LEFT_PAREN => Expr::Call(call(p, x)?),
            LEFT_BRACE if is_literal_type(&x) && (p.expr_level >= 0 || !is_type_name(&x)) => {
                composite_lit(p, Some(x))?
            }
            _ => return Ok(x),
        };
    }
}

fn type_assert(p: &mut Parser, x: Expr) -> PResult<Expr> {
    let lparen = p.expect(LEFT_PAREN)?;
    let typ = match p.eat(TYPE_KW) {
        Some(_) => None,
        None => Some(Box::new(types::type_(p)?)),
    };
    let rparen = p.expect(RIGHT_PAREN)?;
    Ok(Expr::TypeAssert(TypeAssertExpr { x: Box::new(x), lparen, typ, rparen }))
}

fn index_or_slice(p: &mut Parser, x: Expr) -> PResult<Expr> {
    let lbrack = p.expect(LEFT_BRACKET)?;
    p.nested(|p| {
        let low = optional_expr(p, COLON)?;
        if p.eat(COLON).is_none() {
            let rbrack = p.expect(RIGHT_BRACKET)?;
            let Some(index) = low else {
                return Err(p.error("expected operand"));
            };
            return Ok(Expr::Index(IndexExpr { x: Box::new(x), lbrack, index, rbrack }));
        }

        let high = optional_expr(p, COLON)?;
        let slice3 = p.eat(COLON).is_some();
        let max = if slice3 { optional_expr(p, RIGHT_BRACKET)? } else { None };
        let rbrack = p.expect(RIGHT_BRACKET)?;
        Ok(Expr::Slice(SliceExpr { x: Box::new(x), lbrack, low, high, max, slice3, rbrack }))
    })
}

fn optional_expr(p: &mut Parser, stop: SyntaxKind) -> PResult<Option<Box<Expr>>> {
    if p.at(stop) || p.at(RIGHT_BRACKET) {
        return Ok(None);
    }
    Ok(Some(Box::new(expr(p)?)))
}

pub(crate) fn call(p: &mut Parser, fun: Expr) -> PResult<CallExpr> {
    let lparen = p.expect(LEFT_PAREN)?;
    let mut args = Vec::new();
    let mut ellipsis = None;
    p.nested(|p| {
        while !p.at(RIGHT_PAREN) && !p.at(EOF) {
            args.push(expr(p)?);
            ellipsis = p.eat(ELLIPSIS);
            if p.eat(COMMA).is_none() || ellipsis.is_some() {
                break;
            }
        }
        Ok(())
    })?;
    let rparen = p.expect(RIGHT_PAREN)?;
    Ok(CallExpr { fun: Box::new(fun), lparen, args, ellipsis, rparen })
}

/// `T{...}`, or `{...}` with an elided type inside another literal.
fn composite_lit(p: &mut Parser, typ: Option<Expr>) -> PResult<Expr> {
    let lbrace = p.expect(LEFT_BRACE)?;
    let mut elts = Vec::new();
    p.nested(|p| {
        while !p.at(RIGHT_BRACE) && !p.at(EOF) {
            let key = element_value(p)?;
            let elt = match p.eat(COLON) {
                Some(colon) => {
                    Element::KeyValue(KeyValueExpr { key, colon, value: element_value(p)? })
                }
                None => Element::Expr(key),
            };
            elts.push(elt);
            if p.eat(COMMA).is_none() {
                break;
            }
        }
        Ok(())
    })?;
    let rbrace = p.expect(RIGHT_BRACE)?;
    Ok(Expr::CompositeLit(CompositeLit { typ: typ.map(Box::new), lbrace, elts, rbrace }))
}

fn element_value(p: &mut Parser) -> PResult<Expr> {
    if p.at(LEFT_BRACE) { composite_lit(p, None) } else { expr(p) }
}

fn is_type_name(x: &Expr) -> bool {
    match x {
        Expr::Ident(_) => true,
        Expr::Selector(sel) => matches!(*sel.x, Expr::Ident(_)),
        _ => false,
    }
}

fn is_literal_type(x: &Expr) -> bool {
    match x {
        Expr::ArrayType(_) | Expr::MapType(_) | Expr::StructType(_) => true,
        _ => is_type_name(x),
    }
}
