use decor_errors::Diagnostic;
use decor_syntax::SyntaxKind::{self, *};
use decor_syntax::ast::*;
use text_size::TextSize;

use super::{expr_list, exprs, items};
use crate::parser::{PResult, Parser};

pub(crate) fn block(p: &mut Parser) -> PResult<BlockStmt> {
    let lbrace = p.expect(LEFT_BRACE)?;
    let list = p.with_level(0, stmt_list)?;
    let rbrace = p.expect(RIGHT_BRACE)?;
    Ok(BlockStmt { lbrace, list, rbrace })
}

fn stmt_list(p: &mut Parser) -> PResult<Vec<Stmt>> {
    let mut list = Vec::new();
    while !matches!(p.peek_kind(), RIGHT_BRACE | CASE_KW | DEFAULT_KW | EOF) {
        if p.eat(SEMICOLON).is_some() {
            continue;
        }
        list.push(stmt(p)?);
        if !matches!(p.peek_kind(), CASE_KW | DEFAULT_KW) {
            p.semi()?;
        }
    }
    Ok(list)
}

fn stmt(p: &mut Parser) -> PResult<Stmt> {
    match p.peek_kind() {
        CONST_KW | TYPE_KW | VAR_KW => Ok(Stmt::Decl(DeclStmt { decl: items::gen_decl(p)? })),
        NAME if p.nth_kind(1) == COLON => {
            let label = p.ident()?;
            let colon = p.advance();
            let stmt = match p.peek_kind() {
                SEMICOLON | RIGHT_BRACE | CASE_KW | DEFAULT_KW | EOF => None,
                _ => Some(Box::new(stmt(p)?)),
            };
            Ok(Stmt::Labeled(LabeledStmt { label, colon, stmt }))
        }
        GO_KW => {
            let go_pos = p.advance();
            Ok(Stmt::Go(GoStmt { go_pos, call: call_operand(p, "go")? }))
        }
        DEFER_KW => {
            let defer_pos = p.advance();
            Ok(Stmt::Defer(DeferStmt { defer_pos, call: call_operand(p, "defer")? }))
        }
        RETURN_KW => {
            let return_pos = p.advance();
            let results = match p.peek_kind() {
                SEMICOLON | RIGHT_BRACE | CASE_KW | DEFAULT_KW => Vec::new(),
                _ => expr_list(p)?,
            };
            Ok(Stmt::Return(ReturnStmt { return_pos, results }))
        }
        BREAK_KW | CONTINUE_KW | GOTO_KW | FALLTHROUGH_KW => branch_stmt(p),
        LEFT_BRACE => block(p).map(Stmt::Block),
        IF_KW => if_stmt(p).map(Stmt::If),
        SWITCH_KW => switch_stmt(p),
        SELECT_KW => select_stmt(p),
        FOR_KW => for_stmt(p),
        _ => simple_stmt(p),
    }
}

fn call_operand(p: &mut Parser, keyword: &str) -> PResult<CallExpr> {
    match exprs::expr(p)? {
        Expr::Call(call) => Ok(call),
        other => {
            Err(Diagnostic::error(format!("expression in `{keyword}` must be a call"), other.range()))
        }
    }
}

fn branch_stmt(p: &mut Parser) -> PResult<Stmt> {
    let tok = match p.peek_kind() {
        BREAK_KW => BranchKind::Break,
        CONTINUE_KW => BranchKind::Continue,
        GOTO_KW => BranchKind::Goto,
        _ => BranchKind::Fallthrough,
    };
    let tok_pos = p.advance();
    let label = if tok != BranchKind::Fallthrough && p.at(NAME) { Some(p.ident()?) } else { None };
    Ok(Stmt::Branch(BranchStmt { tok_pos, tok, label }))
}

fn assign_op(kind: SyntaxKind) -> Option<AssignOp> {
    Some(match kind {
        EQ => AssignOp::Assign,
        DEFINE => AssignOp::Define,
        PLUS_EQ => AssignOp::Add,
        MINUS_EQ => AssignOp::Sub,
        STAR_EQ => AssignOp::Mul,
        SLASH_EQ => AssignOp::Quo,
        PERCENT_EQ => AssignOp::Rem,
        AMP_EQ => AssignOp::And,
        PIPE_EQ => AssignOp::Or,
        CARET_EQ => AssignOp::Xor,
        SHL_EQ => AssignOp::Shl,
        SHR_EQ => AssignOp::Shr,
        AMP_CARET_EQ => AssignOp::AndNot,
        _ => return None,
    })
}

fn simple_stmt(p: &mut Parser) -> PResult<Stmt> {
    let lhs = expr_list(p)?;
    simple_stmt_rest(p, lhs)
}

/// Finishes a simple statement whose leading expression list is parsed.
fn simple_stmt_rest(p: &mut Parser, mut lhs: Vec<Expr>) -> PResult<Stmt> {
    if let Some(tok) = assign_op(p.peek_kind()) {
        let tok_pos = p.advance();
        let rhs = expr_list(p)?;
        return Ok(Stmt::Assign(AssignStmt { lhs, tok_pos, tok, rhs }));
    }
    if lhs.len() > 1 {
        return Err(p.error("expected assignment"));
    }
    let Some(x) = lhs.pop() else {
        return Err(p.error("expected expression"));
    };

    match p.peek_kind() {
        ARROW => {
            let arrow = p.advance();
            let value = exprs::expr(p)?;
            Ok(Stmt::Send(SendStmt { chan: x, arrow, value }))
        }
        PLUS_PLUS | MINUS_MINUS => {
            let tok = if p.at(PLUS_PLUS) { IncDec::Inc } else { IncDec::Dec };
            let tok_pos = p.advance();
            Ok(Stmt::IncDec(IncDecStmt { x, tok_pos, tok }))
        }
        _ => Ok(Stmt::Expr(ExprStmt { x })),
    }
}

fn header_stmt(p: &mut Parser) -> PResult<Option<Stmt>> {
    if p.at(SEMICOLON) || p.at(LEFT_BRACE) {
        return Ok(None);
    }
    simple_stmt(p).map(Some)
}

fn into_cond(stmt: Option<Stmt>) -> PResult<Option<Expr>> {
    match stmt {
        None => Ok(None),
        Some(Stmt::Expr(ExprStmt { x })) => Ok(Some(x)),
        Some(other) => Err(Diagnostic::error("expected expression, found statement", other.range())),
    }
}

fn if_stmt(p: &mut Parser) -> PResult<IfStmt> {
    let if_pos = p.expect(IF_KW)?;
    let (init, cond) = p.with_level(-1, |p| {
        let first = header_stmt(p)?;
        if p.eat(SEMICOLON).is_none() {
            return Ok((None, into_cond(first)?));
        }
        Ok((first.map(Box::new), Some(exprs::expr(p)?)))
    })?;
    let Some(cond) = cond else {
        return Err(p.error("missing condition in if statement"));
    };
    let body = block(p)?;

    let else_ = match p.eat(ELSE_KW) {
        None => None,
        Some(_) if p.at(IF_KW) => Some(Else::If(Box::new(if_stmt(p)?))),
        Some(_) if p.at(LEFT_BRACE) => Some(Else::Block(block(p)?)),
        Some(_) => return Err(p.error("expected `if` or `{` after `else`")),
    };
    Ok(IfStmt { if_pos, init, cond, body, else_ })
}

fn switch_stmt(p: &mut Parser) -> PResult<Stmt> {
    let switch_pos = p.expect(SWITCH_KW)?;
    let (init, tag) = p.with_level(-1, |p| {
        let first = header_stmt(p)?;
        if p.eat(SEMICOLON).is_none() {
            return Ok((None, first));
        }
        Ok((first.map(Box::new), header_stmt(p)?))
    })?;

    match tag.map(type_switch_guard) {
        Some(Ok(assign)) => {
            let body = case_block(p)?;
            Ok(Stmt::TypeSwitch(TypeSwitchStmt { switch_pos, init, assign, body }))
        }
        Some(Err(tag)) => {
            let tag = into_cond(Some(tag))?;
            let body = case_block(p)?;
            Ok(Stmt::Switch(SwitchStmt { switch_pos, init, tag, body }))
        }
        None => {
            let body = case_block(p)?;
            Ok(Stmt::Switch(SwitchStmt { switch_pos, init, tag: None, body }))
        }
    }
}

/// Recognizes `x := y.(type)` and `y.(type)`, handing back anything else.
fn type_switch_guard(stmt: Stmt) -> Result<TypeSwitchGuard, Stmt> {
    match stmt {
        Stmt::Expr(ExprStmt { x: Expr::TypeAssert(x) }) if x.typ.is_none() => {
            Ok(TypeSwitchGuard { lhs: None, define: None, x })
        }
        Stmt::Assign(AssignStmt { lhs, tok_pos, tok: AssignOp::Define, rhs }) => {
            match (<[Expr; 1]>::try_from(lhs), <[Expr; 1]>::try_from(rhs)) {
                (Ok([Expr::Ident(name)]), Ok([Expr::TypeAssert(x)])) if x.typ.is_none() => {
                    Ok(TypeSwitchGuard { lhs: Some(name), define: Some(tok_pos), x })
                }
                (lhs, rhs) => {
                    let lhs = lhs.map_or_else(|lhs| lhs, Vec::from);
                    let rhs = rhs.map_or_else(|rhs| rhs, Vec::from);
                    Err(Stmt::Assign(AssignStmt { lhs, tok_pos, tok: AssignOp::Define, rhs }))
                }
            }
        }
        other => Err(other),
    }
}

fn case_block(p: &mut Parser) -> PResult<CaseBlock> {
    let lbrace = p.expect(LEFT_BRACE)?;
    let mut clauses = Vec::new();
    while !p.at(RIGHT_BRACE) && !p.at(EOF) {
        if p.eat(SEMICOLON).is_some() {
            continue;
        }
        let list = match p.peek_kind() {
            CASE_KW => None,
            DEFAULT_KW => Some(Vec::new()),
            _ => return Err(p.error("expected `case` or `default`")),
        };
        let case_pos = p.advance();
        let list = match list {
            Some(list) => list,
            None => expr_list(p)?,
        };
        let colon = p.expect(COLON)?;
        let body = stmt_list(p)?;
        clauses.push(CaseClause { case_pos, list, colon, body });
    }
    let rbrace = p.expect(RIGHT_BRACE)?;
    Ok(CaseBlock { lbrace, clauses, rbrace })
}

fn select_stmt(p: &mut Parser) -> PResult<Stmt> {
    let select_pos = p.expect(SELECT_KW)?;
    let lbrace = p.expect(LEFT_BRACE)?;
    let mut clauses = Vec::new();
    while !p.at(RIGHT_BRACE) && !p.at(EOF) {
        if p.eat(SEMICOLON).is_some() {
            continue;
        }
        let (case_pos, comm) = match p.peek_kind() {
            CASE_KW => {
                let case_pos = p.advance();
                (case_pos, Some(Box::new(simple_stmt(p)?)))
            }
            DEFAULT_KW => (p.advance(), None),
            _ => return Err(p.error("expected `case` or `default`")),
        };
        let colon = p.expect(COLON)?;
        let body = stmt_list(p)?;
        clauses.push(CommClause { case_pos, comm, colon, body });
    }
    let rbrace = p.expect(RIGHT_BRACE)?;
    Ok(Stmt::Select(SelectStmt { select_pos, lbrace, clauses, rbrace }))
}

enum ForHeader {
    Clauses { init: Option<Box<Stmt>>, cond: Option<Expr>, post: Option<Box<Stmt>> },
    Range(RangeClause),
}

struct RangeClause {
    key: Option<Expr>,
    value: Option<Expr>,
    tok_pos: Option<TextSize>,
    tok: AssignOp,
    range_pos: TextSize,
    x: Expr,
}

fn for_stmt(p: &mut Parser) -> PResult<Stmt> {
    let for_pos = p.expect(FOR_KW)?;
    let header = p.with_level(-1, for_header)?;
    let body = block(p)?;

    Ok(match header {
        ForHeader::Clauses { init, cond, post } => {
            Stmt::For(ForStmt { for_pos, init, cond, post, body })
        }
        ForHeader::Range(RangeClause { key, value, tok_pos, tok, range_pos, x }) => {
            Stmt::Range(RangeStmt { for_pos, key, value, tok_pos, tok, range_pos, x, body })
        }
    })
}

fn for_header(p: &mut Parser) -> PResult<ForHeader> {
    if p.at(LEFT_BRACE) {
        return Ok(ForHeader::Clauses { init: None, cond: None, post: None });
    }
    if p.at(RANGE_KW) {
        let range_pos = p.advance();
        let x = exprs::expr(p)?;
        let clause =
            RangeClause { key: None, value: None, tok_pos: None, tok: AssignOp::Assign, range_pos, x };
        return Ok(ForHeader::Range(clause));
    }

    let init = if p.at(SEMICOLON) {
        None
    } else {
        let lhs = expr_list(p)?;
        let tok = assign_op(p.peek_kind()).filter(|tok| matches!(tok, AssignOp::Assign | AssignOp::Define));
        if let Some(tok) = tok
            && p.nth_kind(1) == RANGE_KW
        {
            return range_clause(p, lhs, tok);
        }
        Some(simple_stmt_rest(p, lhs)?)
    };

    if p.eat(SEMICOLON).is_none() {
        return Ok(ForHeader::Clauses { init: None, cond: into_cond(init)?, post: None });
    }
    let cond = if p.at(SEMICOLON) { None } else { Some(exprs::expr(p)?) };
    p.expect(SEMICOLON)?;
    let post = header_stmt(p)?;
    Ok(ForHeader::Clauses { init: init.map(Box::new), cond, post: post.map(Box::new) })
}

fn range_clause(p: &mut Parser, lhs: Vec<Expr>, tok: AssignOp) -> PResult<ForHeader> {
    if lhs.len() > 2 {
        return Err(p.error("range clause permits at most two iteration variables"));
    }
    let mut lhs = lhs.into_iter();
    let key = lhs.next();
    let value = lhs.next();
    let tok_pos = Some(p.advance());
    let range_pos = p.expect(RANGE_KW)?;
    let x = exprs::expr(p)?;
    Ok(ForHeader::Range(RangeClause { key, value, tok_pos, tok, range_pos, x }))
}
