use decor_syntax::SyntaxKind::*;
use decor_syntax::ast::*;
use text_size::TextSize;

use super::{TYPE_FIRST, basic_lit, exprs, list};
use crate::parser::{PResult, Parser};

pub(crate) fn type_(p: &mut Parser) -> PResult<Expr> {
    match p.peek_kind() {
        NAME => {
            let name = p.ident()?;
            if p.eat(DOT).is_some() {
                let sel = p.ident()?;
                return Ok(Expr::Selector(SelectorExpr { x: Box::new(Expr::Ident(name)), sel }));
            }
            Ok(Expr::Ident(name))
        }
        STAR => {
            let star = p.advance();
            Ok(Expr::Star(StarExpr { star, x: Box::new(type_(p)?) }))
        }
        LEFT_PAREN => {
            let lparen = p.advance();
            let x = p.nested(type_)?;
            let rparen = p.expect(RIGHT_PAREN)?;
            Ok(Expr::Paren(ParenExpr { lparen, x: Box::new(x), rparen }))
        }
        LEFT_BRACKET => array_type(p),
        MAP_KW => {
            let map_pos = p.advance();
            p.expect(LEFT_BRACKET)?;
            let key = type_(p)?;
            p.expect(RIGHT_BRACKET)?;
            let value = type_(p)?;
            Ok(Expr::MapType(MapType { map_pos, key: Box::new(key), value: Box::new(value) }))
        }
        CHAN_KW | ARROW => chan_type(p),
        FUNC_KW => {
            let func = p.advance();
            signature(p, Some(func)).map(Expr::FuncType)
        }
        STRUCT_KW => struct_type(p).map(Expr::StructType),
        INTERFACE_KW => interface_type(p).map(Expr::InterfaceType),
        _ => Err(p.error("expected type")),
    }
}

fn array_type(p: &mut Parser) -> PResult<Expr> {
    let lbrack = p.expect(LEFT_BRACKET)?;
    let len = if p.eat(RIGHT_BRACKET).is_some() {
        None
    } else {
        let len = if p.at(ELLIPSIS) && p.nth_kind(1) == RIGHT_BRACKET {
            Expr::Ellipsis(Ellipsis { pos: p.advance(), elt: None })
        } else {
            p.nested(exprs::expr)?
        };
        p.expect(RIGHT_BRACKET)?;
        Some(Box::new(len))
    };
    let elt = type_(p)?;
    Ok(Expr::ArrayType(ArrayType { lbrack, len, elt: Box::new(elt) }))
}

fn chan_type(p: &mut Parser) -> PResult<Expr> {
    let (chan_pos, arrow, dir) = match p.eat(ARROW) {
        Some(arrow) => (p.expect(CHAN_KW)?, Some(arrow), ChanDir::Recv),
        None => {
            let chan_pos = p.expect(CHAN_KW)?;
            match p.eat(ARROW) {
                Some(arrow) => (chan_pos, Some(arrow), ChanDir::Send),
                None => (chan_pos, None, ChanDir::Both),
            }
        }
    };
    let value = type_(p)?;
    Ok(Expr::ChanType(ChanType { chan_pos, arrow, dir, value: Box::new(value) }))
}

/// Parameters and results following `func` or a method name.
pub(crate) fn signature(p: &mut Parser, func: Option<TextSize>) -> PResult<FuncType> {
    let parameters = params(p)?;
    let results = if p.at(LEFT_PAREN) {
        Some(params(p)?)
    } else if p.at_set(TYPE_FIRST) {
        let typ = type_(p)?;
        Some(FieldList {
            opening: None,
            list: vec![Field { names: Vec::new(), typ, tag: None }],
            closing: None,
        })
    } else {
        None
    };
    Ok(FuncType { func, params: parameters, results })
}

/// `(a, b int, c ...string)` or `(int, string)`.
pub(crate) fn params(p: &mut Parser) -> PResult<FieldList> {
    let opening = p.expect(LEFT_PAREN)?;

    let mut entries = Vec::new();
    p.nested(|p| {
        while !p.at(RIGHT_PAREN) && !p.at(EOF) {
            let first = param_type(p)?;
            let typ = match p.peek_kind() {
                COMMA | RIGHT_PAREN => None,
                _ => Some(param_type(p)?),
            };
            entries.push((first, typ));
            if p.eat(COMMA).is_none() {
                break;
            }
        }
        Ok(())
    })?;
    let closing = p.expect(RIGHT_PAREN)?;

    let named = entries.iter().any(|(_, typ)| typ.is_some());
    let mut list = Vec::new();
    if named {
        let mut names = Vec::new();
        for (first, typ) in entries {
            let Expr::Ident(name) = first else {
                return Err(p.error("mixed named and unnamed parameters"));
            };
            names.push(name);
            if let Some(typ) = typ {
                list.push(Field { names: std::mem::take(&mut names), typ, tag: None });
            }
        }
        if !names.is_empty() {
            return Err(p.error("missing parameter type"));
        }
    } else {
        list.extend(entries.into_iter().map(|(typ, _)| Field { names: Vec::new(), typ, tag: None }));
    }

    Ok(FieldList { opening: Some(opening), list, closing: Some(closing) })
}

fn param_type(p: &mut Parser) -> PResult<Expr> {
    match p.eat(ELLIPSIS) {
        Some(pos) => Ok(Expr::Ellipsis(Ellipsis { pos, elt: Some(Box::new(type_(p)?)) })),
        None => type_(p),
    }
}

fn struct_type(p: &mut Parser) -> PResult<StructType> {
    let struct_pos = p.expect(STRUCT_KW)?;
    let fields = braced_fields(p, |p| {
        let embedded = match p.peek_kind() {
            STAR => true,
            NAME => matches!(p.nth_kind(1), DOT | SEMICOLON | RIGHT_BRACE | STRING),
            _ => return Err(p.error("expected field")),
        };
        let (names, typ) = if embedded {
            (Vec::new(), type_(p)?)
        } else {
            (list(p, Parser::ident)?, type_(p)?)
        };
        let tag = if p.at(STRING) { Some(basic_lit(p)?) } else { None };
        Ok(Field { names, typ, tag })
    })?;
    Ok(StructType { struct_pos, fields })
}

fn interface_type(p: &mut Parser) -> PResult<InterfaceType> {
    let interface_pos = p.expect(INTERFACE_KW)?;
    let methods = braced_fields(p, |p| {
        if p.at(NAME) && p.nth_kind(1) == LEFT_PAREN {
            let name = p.ident()?;
            let signature = signature(p, None)?;
            return Ok(Field { names: vec![name], typ: Expr::FuncType(signature), tag: None });
        }
        Ok(Field { names: Vec::new(), typ: type_(p)?, tag: None })
    })?;
    Ok(InterfaceType { interface_pos, methods })
}

fn braced_fields<'t>(
    p: &mut Parser<'t>,
    mut field: impl FnMut(&mut Parser<'t>) -> PResult<Field>,
) -> PResult<FieldList> {
    let opening = p.expect(LEFT_BRACE)?;
    let mut list = Vec::new();
    while !p.at(RIGHT_BRACE) && !p.at(EOF) {
        list.push(field(p)?);
        p.semi()?;
    }
    let closing = p.expect(RIGHT_BRACE)?;
    Ok(FieldList { opening: Some(opening), list, closing: Some(closing) })
}
