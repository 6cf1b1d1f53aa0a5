use decor_syntax::SyntaxKind::*;
use decor_syntax::ast::*;
use text_size::TextSize;

use super::{basic_lit, expr_list, list, stmts, types};
use crate::parser::{PResult, Parser};

pub(crate) fn file(p: &mut Parser) -> PResult<File> {
    let package = match p.eat(PACKAGE_KW) {
        Some(package_pos) => {
            let name = p.ident()?;
            p.semi()?;
            Some(PackageClause { package_pos, name })
        }
        None => None,
    };

    let mut decls = Vec::new();
    while !p.at(EOF) {
        if p.eat(SEMICOLON).is_some() {
            continue;
        }
        decls.push(decl(p)?);
        p.semi()?;
    }

    Ok(File { package, decls, eof: TextSize::of(p.text()) })
}

fn decl(p: &mut Parser) -> PResult<Decl> {
    match p.peek_kind() {
        FUNC_KW => func_decl(p).map(Decl::Func),
        IMPORT_KW | CONST_KW | TYPE_KW | VAR_KW => gen_decl(p).map(Decl::Gen),
        _ => Err(p.error("expected declaration")),
    }
}

fn func_decl(p: &mut Parser) -> PResult<FuncDecl> {
    let func_pos = p.expect(FUNC_KW)?;
    let recv = if p.at(LEFT_PAREN) { Some(types::params(p)?) } else { None };
    let name = p.ident()?;
    let typ = types::signature(p, None)?;
    let body = if p.at(LEFT_BRACE) { Some(stmts::block(p)?) } else { None };
    Ok(FuncDecl { func_pos, recv, name, typ, body })
}

pub(crate) fn gen_decl(p: &mut Parser) -> PResult<GenDecl> {
    let tok = match p.peek_kind() {
        IMPORT_KW => DeclKeyword::Import,
        CONST_KW => DeclKeyword::Const,
        TYPE_KW => DeclKeyword::Type,
        VAR_KW => DeclKeyword::Var,
        _ => return Err(p.error("expected declaration")),
    };
    let tok_pos = p.advance();

    let Some(lparen) = p.eat(LEFT_PAREN) else {
        let spec = spec(p, tok)?;
        return Ok(GenDecl { tok_pos, tok, lparen: None, specs: vec![spec], rparen: None });
    };

    let mut specs = Vec::new();
    while !p.at(RIGHT_PAREN) && !p.at(EOF) {
        specs.push(spec(p, tok)?);
        p.semi()?;
    }
    let rparen = p.expect(RIGHT_PAREN)?;
    Ok(GenDecl { tok_pos, tok, lparen: Some(lparen), specs, rparen: Some(rparen) })
}

fn spec(p: &mut Parser, keyword: DeclKeyword) -> PResult<Spec> {
    match keyword {
        DeclKeyword::Import => {
            let name = if p.at(NAME) { Some(p.ident()?) } else { None };
            if !p.at(STRING) {
                return Err(p.error("expected import path"));
            }
            let path = basic_lit(p)?;
            Ok(Spec::Import(ImportSpec { name, path }))
        }
        DeclKeyword::Const | DeclKeyword::Var => {
            let names = list(p, Parser::ident)?;
            let typ = if matches!(p.peek_kind(), EQ | SEMICOLON | RIGHT_PAREN) {
                None
            } else {
                Some(types::type_(p)?)
            };
            let values = match p.eat(EQ) {
                Some(_) => expr_list(p)?,
                None => Vec::new(),
            };
            Ok(Spec::Value(ValueSpec { names, typ, values }))
        }
        DeclKeyword::Type => {
            let name = p.ident()?;
            let assign = p.eat(EQ);
            let typ = types::type_(p)?;
            Ok(Spec::Type(TypeSpec { name, assign, typ }))
        }
    }
}
