//! Native tree → structural tree.
//!
//! The walk visits positioned tokens in the order `NodeRef::items` lists
//! them, tracking `last`, the end of the last printed token or comment. Line
//! breaks between `last` and the next printed item become `Line` trivia in the
//! slot of whichever node the next item opens, closes or trails.

use std::iter;

use decor_span::LineTable;
use decor_syntax::ast::{self, AstNode};
use decor_syntax::{CommentGroup, CommentMap, NodeKey, NodeKind};
use text_size::{TextRange, TextSize};

use crate::gap::line_breaks;
use crate::markup::{Markup, Trivia};
use crate::tree::*;
use crate::{Error, Result};

/// Converts a parsed file and its comments into a structural tree.
pub fn decompose(file: &ast::File, lines: &LineTable, comments: &[CommentGroup]) -> Result<File> {
    let mut decomposer =
        Decomposer { lines, map: CommentMap::new(file, lines, comments), last: TextSize::new(0) };
    decomposer.file(file)
}

struct Decomposer<'a> {
    lines: &'a LineTable,
    map: CommentMap<'a>,
    last: TextSize,
}

/// Comment groups of a node that have not been emitted yet.
#[derive(Default)]
struct Frame<'a> {
    before: Vec<Trivia>,
    /// Groups inside the node's span. They belong before the closing
    /// delimiter, or after the node when it has none.
    inside: Vec<&'a CommentGroup>,
    after: Vec<&'a CommentGroup>,
}

fn unsupported(kind: NodeKind, range: TextRange) -> Error {
    Error::UnsupportedNodeKind { kind, range }
}

impl<'a> Decomposer<'a> {
    fn enter<N: AstNode>(&mut self, node: &N) -> Result<Frame<'a>> {
        self.enter_at(NodeKey::of(node), node.range().start())
    }

    fn enter_at(&mut self, key: NodeKey, start: TextSize) -> Result<Frame<'a>> {
        let mut frame = Frame::default();
        let mut before = Vec::new();
        for group in self.map.get(&key) {
            let range = group.range();
            if range.end() <= start {
                before.push(group);
            } else if range.start() >= key.range.end() {
                frame.after.push(group);
            } else {
                frame.inside.push(group);
            }
        }

        self.comments(before, &mut frame.before)?;
        self.lines_to(start, &mut frame.before)?;
        self.last = self.last.max(start);
        Ok(frame)
    }

    fn closing(&mut self, frame: &mut Frame<'a>, pos: TextSize, text: &str) -> Result<Vec<Trivia>> {
        let mut closing = Vec::new();
        self.comments(std::mem::take(&mut frame.inside), &mut closing)?;
        self.lines_to(pos, &mut closing)?;
        self.token(pos, text);
        Ok(closing)
    }

    fn leave(&mut self, frame: Frame<'a>) -> Result<Markup> {
        let mut after = Vec::new();
        self.comments(frame.inside.into_iter().chain(frame.after), &mut after)?;
        Ok(Markup { before: frame.before, after })
    }

    fn token(&mut self, pos: TextSize, text: &str) {
        self.last = self.last.max(pos + TextSize::of(text));
    }

    /// Line breaks from `last` up to `pos`; none for trivia that moved
    /// behind `last`.
    fn lines_to(&mut self, pos: TextSize, out: &mut Vec<Trivia>) -> Result<()> {
        if pos > self.last {
            let count = line_breaks(self.lines, self.last, pos)?;
            out.extend(iter::repeat_n(Trivia::Line, count));
        }
        Ok(())
    }

    fn comments(
        &mut self,
        groups: impl IntoIterator<Item = &'a CommentGroup>,
        out: &mut Vec<Trivia>,
    ) -> Result<()> {
        for comment in groups.into_iter().flat_map(|group| &group.comments) {
            self.lines_to(comment.pos, out)?;
            out.push(Trivia::Comment(comment.text.clone()));
            self.last = self.last.max(comment.range().end());
        }
        Ok(())
    }

    fn file(&mut self, file: &ast::File) -> Result<File> {
        let start = file.package.as_ref().map_or(TextSize::new(0), |package| package.package_pos);
        let mut frame = self.enter_at(NodeKey::of(file), start)?;

        let package = match &file.package {
            Some(package) => {
                self.token(package.package_pos, "package");
                Some(self.ident(&package.name)?)
            }
            None => None,
        };
        let decls = file.decls.iter().map(|decl| self.decl(decl)).collect::<Result<_>>()?;
        let closing = self.closing(&mut frame, file.eof, "")?;

        Ok(File { package, decls, markup: self.leave(frame)?, closing })
    }

    fn decl(&mut self, decl: &ast::Decl) -> Result<Decl> {
        match decl {
            ast::Decl::Gen(decl) => self.gen_decl(decl).map(Decl::Gen),
            ast::Decl::Func(decl) => {
                let frame = self.enter(decl)?;
                self.token(decl.func_pos, "func");
                let recv = decl.recv.as_ref().map(|recv| self.field_list(recv)).transpose()?;
                let name = self.ident(&decl.name)?;
                let typ = self.func_type(&decl.typ)?;
                let body = decl.body.as_ref().map(|body| self.block(body)).transpose()?;
                Ok(Decl::Func(FuncDecl { recv, name, typ, body, markup: self.leave(frame)? }))
            }
        }
    }

    fn gen_decl(&mut self, decl: &ast::GenDecl) -> Result<GenDecl> {
        let mut frame = self.enter(decl)?;
        self.token(decl.tok_pos, decl.tok.as_str());
        if let Some(lparen) = decl.lparen {
            self.token(lparen, "(");
        }
        let specs = decl.specs.iter().map(|spec| self.spec(spec)).collect::<Result<_>>()?;
        let closing = match decl.rparen {
            Some(rparen) => self.closing(&mut frame, rparen, ")")?,
            None => Vec::new(),
        };
        Ok(GenDecl {
            tok: decl.tok,
            grouped: decl.lparen.is_some(),
            specs,
            markup: self.leave(frame)?,
            closing,
        })
    }

    fn spec(&mut self, spec: &ast::Spec) -> Result<Spec> {
        Ok(match spec {
            ast::Spec::Import(spec) => {
                let frame = self.enter(spec)?;
                let name = spec.name.as_ref().map(|name| self.ident(name)).transpose()?;
                let path = self.basic_lit(&spec.path)?;
                Spec::Import(ImportSpec { name, path, markup: self.leave(frame)? })
            }
            ast::Spec::Value(spec) => {
                let frame = self.enter(spec)?;
                let names = self.idents(&spec.names)?;
                let typ = spec.typ.as_ref().map(|typ| self.expr(typ)).transpose()?;
                let values = self.exprs(&spec.values)?;
                Spec::Value(ValueSpec { names, typ, values, markup: self.leave(frame)? })
            }
            ast::Spec::Type(spec) => {
                let frame = self.enter(spec)?;
                let name = self.ident(&spec.name)?;
                if let Some(assign) = spec.assign {
                    self.token(assign, "=");
                }
                let typ = self.expr(&spec.typ)?;
                Spec::Type(TypeSpec {
                    name,
                    assign: spec.assign.is_some(),
                    typ,
                    markup: self.leave(frame)?,
                })
            }
        })
    }

    fn ident(&mut self, ident: &ast::Ident) -> Result<Ident> {
        let frame = self.enter(ident)?;
        self.token(ident.pos, &ident.name);
        Ok(Ident { name: ident.name.clone(), markup: self.leave(frame)? })
    }

    fn idents(&mut self, idents: &[ast::Ident]) -> Result<Vec<Ident>> {
        idents.iter().map(|ident| self.ident(ident)).collect()
    }

    fn basic_lit(&mut self, lit: &ast::BasicLit) -> Result<BasicLit> {
        let frame = self.enter(lit)?;
        self.token(lit.pos, &lit.value);
        Ok(BasicLit { kind: lit.kind, value: lit.value.clone(), markup: self.leave(frame)? })
    }

    fn exprs(&mut self, exprs: &[ast::Expr]) -> Result<Vec<Expr>> {
        exprs.iter().map(|expr| self.expr(expr)).collect()
    }

    fn boxed(&mut self, expr: &ast::Expr) -> Result<Box<Expr>> {
        self.expr(expr).map(Box::new)
    }

    fn boxed_opt(&mut self, expr: Option<&ast::Expr>) -> Result<Option<Box<Expr>>> {
        expr.map(|expr| self.boxed(expr)).transpose()
    }

    fn expr(&mut self, expr: &ast::Expr) -> Result<Expr> {
        Ok(match expr {
            ast::Expr::Ident(it) => Expr::Ident(self.ident(it)?),
            ast::Expr::BasicLit(it) => Expr::BasicLit(self.basic_lit(it)?),
            ast::Expr::CompositeLit(it) => {
                let mut frame = self.enter(it)?;
                let typ = self.boxed_opt(it.typ.as_deref())?;
                self.token(it.lbrace, "{");
                let elts = it.elts.iter().map(|elt| self.element(elt)).collect::<Result<_>>()?;
                let closing = self.closing(&mut frame, it.rbrace, "}")?;
                Expr::CompositeLit(CompositeLit { typ, elts, markup: self.leave(frame)?, closing })
            }
            ast::Expr::FuncLit(it) => {
                let frame = self.enter(it)?;
                let typ = self.func_type(&it.typ)?;
                let body = self.block(&it.body)?;
                Expr::FuncLit(FuncLit { typ, body, markup: self.leave(frame)? })
            }
            ast::Expr::Paren(it) => {
                let mut frame = self.enter(it)?;
                self.token(it.lparen, "(");
                let x = self.boxed(&it.x)?;
                let closing = self.closing(&mut frame, it.rparen, ")")?;
                Expr::Paren(ParenExpr { x, markup: self.leave(frame)?, closing })
            }
            ast::Expr::Selector(it) => {
                let frame = self.enter(it)?;
                let x = self.boxed(&it.x)?;
                let sel = self.ident(&it.sel)?;
                Expr::Selector(SelectorExpr { x, sel, markup: self.leave(frame)? })
            }
            ast::Expr::Index(it) => {
                let mut frame = self.enter(it)?;
                let x = self.boxed(&it.x)?;
                self.token(it.lbrack, "[");
                let index = self.boxed(&it.index)?;
                let closing = self.closing(&mut frame, it.rbrack, "]")?;
                Expr::Index(IndexExpr { x, index, markup: self.leave(frame)?, closing })
            }
            ast::Expr::Slice(it) => {
                let mut frame = self.enter(it)?;
                let x = self.boxed(&it.x)?;
                self.token(it.lbrack, "[");
                let low = self.boxed_opt(it.low.as_deref())?;
                let high = self.boxed_opt(it.high.as_deref())?;
                let max = self.boxed_opt(it.max.as_deref())?;
                let closing = self.closing(&mut frame, it.rbrack, "]")?;
                Expr::Slice(SliceExpr {
                    x,
                    low,
                    high,
                    max,
                    slice3: it.slice3,
                    markup: self.leave(frame)?,
                    closing,
                })
            }
            ast::Expr::TypeAssert(it) => Expr::TypeAssert(self.type_assert(it)?),
            ast::Expr::Call(it) => Expr::Call(self.call(it)?),
            ast::Expr::Star(it) => {
                let frame = self.enter(it)?;
                self.token(it.star, "*");
                let x = self.boxed(&it.x)?;
                Expr::Star(StarExpr { x, markup: self.leave(frame)? })
            }
            ast::Expr::Unary(it) => {
                let frame = self.enter(it)?;
                self.token(it.op_pos, it.op.as_str());
                let x = self.boxed(&it.x)?;
                Expr::Unary(UnaryExpr { op: it.op, x, markup: self.leave(frame)? })
            }
            ast::Expr::Binary(it) => {
                let frame = self.enter(it)?;
                let x = self.boxed(&it.x)?;
                self.token(it.op_pos, it.op.as_str());
                let y = self.boxed(&it.y)?;
                Expr::Binary(BinaryExpr { x, op: it.op, y, markup: self.leave(frame)? })
            }
            ast::Expr::ArrayType(it) => {
                let frame = self.enter(it)?;
                self.token(it.lbrack, "[");
                let len = self.boxed_opt(it.len.as_deref())?;
                let elt = self.boxed(&it.elt)?;
                Expr::ArrayType(ArrayType { len, elt, markup: self.leave(frame)? })
            }
            ast::Expr::StructType(it) => {
                let frame = self.enter(it)?;
                self.token(it.struct_pos, "struct");
                let fields = self.field_list(&it.fields)?;
                Expr::StructType(StructType { fields, markup: self.leave(frame)? })
            }
            ast::Expr::FuncType(it) => Expr::FuncType(self.func_type(it)?),
            ast::Expr::InterfaceType(it) => {
                let frame = self.enter(it)?;
                self.token(it.interface_pos, "interface");
                let methods = self.field_list(&it.methods)?;
                Expr::InterfaceType(InterfaceType { methods, markup: self.leave(frame)? })
            }
            ast::Expr::MapType(it) => {
                let frame = self.enter(it)?;
                self.token(it.map_pos, "map");
                let key = self.boxed(&it.key)?;
                let value = self.boxed(&it.value)?;
                Expr::MapType(MapType { key, value, markup: self.leave(frame)? })
            }
            ast::Expr::ChanType(it) => return Err(unsupported(NodeKind::ChanType, it.range())),
            ast::Expr::Ellipsis(it) => {
                let frame = self.enter(it)?;
                self.token(it.pos, "...");
                let elt = self.boxed_opt(it.elt.as_deref())?;
                Expr::Ellipsis(Ellipsis { elt, markup: self.leave(frame)? })
            }
        })
    }

    fn element(&mut self, element: &ast::Element) -> Result<Expr> {
        match element {
            ast::Element::Expr(expr) => self.expr(expr),
            ast::Element::KeyValue(kv) => {
                let frame = self.enter(kv)?;
                let key = self.boxed(&kv.key)?;
                self.token(kv.colon, ":");
                let value = self.boxed(&kv.value)?;
                Ok(Expr::KeyValue(KeyValueExpr { key, value, markup: self.leave(frame)? }))
            }
        }
    }

    fn type_assert(&mut self, it: &ast::TypeAssertExpr) -> Result<TypeAssertExpr> {
        let mut frame = self.enter(it)?;
        let x = self.boxed(&it.x)?;
        self.token(it.lparen, "(");
        let typ = self.boxed_opt(it.typ.as_deref())?;
        let closing = self.closing(&mut frame, it.rparen, ")")?;
        Ok(TypeAssertExpr { x, typ, markup: self.leave(frame)?, closing })
    }

    fn call(&mut self, it: &ast::CallExpr) -> Result<CallExpr> {
        let mut frame = self.enter(it)?;
        let fun = self.boxed(&it.fun)?;
        self.token(it.lparen, "(");
        let args = self.exprs(&it.args)?;
        if let Some(ellipsis) = it.ellipsis {
            self.token(ellipsis, "...");
        }
        let closing = self.closing(&mut frame, it.rparen, ")")?;
        Ok(CallExpr {
            fun,
            args,
            ellipsis: it.ellipsis.is_some(),
            markup: self.leave(frame)?,
            closing,
        })
    }

    fn func_type(&mut self, typ: &ast::FuncType) -> Result<FuncType> {
        let frame = self.enter(typ)?;
        if let Some(func) = typ.func {
            self.token(func, "func");
        }
        let params = self.field_list(&typ.params)?;
        let results = typ.results.as_ref().map(|results| self.field_list(results)).transpose()?;
        Ok(FuncType { func: typ.func.is_some(), params, results, markup: self.leave(frame)? })
    }

    fn field_list(&mut self, list: &ast::FieldList) -> Result<FieldList> {
        let mut frame = self.enter(list)?;
        if let Some(opening) = list.opening {
            self.token(opening, "(");
        }
        let fields = list.list.iter().map(|field| self.field(field)).collect::<Result<_>>()?;
        let closing = match list.closing {
            Some(closing) => self.closing(&mut frame, closing, ")")?,
            None => Vec::new(),
        };
        Ok(FieldList {
            delimited: list.opening.is_some(),
            list: fields,
            markup: self.leave(frame)?,
            closing,
        })
    }

    fn field(&mut self, field: &ast::Field) -> Result<Field> {
        let frame = self.enter(field)?;
        let names = self.idents(&field.names)?;
        let typ = self.expr(&field.typ)?;
        let tag = field.tag.as_ref().map(|tag| self.basic_lit(tag)).transpose()?;
        Ok(Field { names, typ, tag, markup: self.leave(frame)? })
    }

    fn stmts(&mut self, stmts: &[ast::Stmt]) -> Result<Vec<Stmt>> {
        stmts.iter().map(|stmt| self.stmt(stmt)).collect()
    }

    fn boxed_stmt(&mut self, stmt: Option<&ast::Stmt>) -> Result<Option<Box<Stmt>>> {
        stmt.map(|stmt| self.stmt(stmt).map(Box::new)).transpose()
    }

    fn stmt(&mut self, stmt: &ast::Stmt) -> Result<Stmt> {
        Ok(match stmt {
            ast::Stmt::Decl(it) => {
                let frame = self.enter(it)?;
                let decl = self.gen_decl(&it.decl)?;
                Stmt::Decl(DeclStmt { decl, markup: self.leave(frame)? })
            }
            ast::Stmt::Labeled(it) => {
                let frame = self.enter(it)?;
                let label = self.ident(&it.label)?;
                self.token(it.colon, ":");
                let stmt = match &it.stmt {
                    Some(stmt) => Some(Box::new(self.stmt(stmt)?)),
                    None => None,
                };
                Stmt::Labeled(LabeledStmt { label, stmt, markup: self.leave(frame)? })
            }
            ast::Stmt::Expr(it) => {
                let frame = self.enter(it)?;
                let x = self.expr(&it.x)?;
                Stmt::Expr(ExprStmt { x, markup: self.leave(frame)? })
            }
            ast::Stmt::Send(it) => return Err(unsupported(NodeKind::SendStmt, it.range())),
            ast::Stmt::IncDec(it) => {
                let frame = self.enter(it)?;
                let x = self.expr(&it.x)?;
                self.token(it.tok_pos, it.tok.as_str());
                Stmt::IncDec(IncDecStmt { x, tok: it.tok, markup: self.leave(frame)? })
            }
            ast::Stmt::Assign(it) => {
                let frame = self.enter(it)?;
                let lhs = self.exprs(&it.lhs)?;
                self.token(it.tok_pos, it.tok.as_str());
                let rhs = self.exprs(&it.rhs)?;
                Stmt::Assign(AssignStmt { lhs, tok: it.tok, rhs, markup: self.leave(frame)? })
            }
            ast::Stmt::Go(it) => {
                let frame = self.enter(it)?;
                self.token(it.go_pos, "go");
                let call = Expr::Call(self.call(&it.call)?);
                Stmt::Go(GoStmt { call, markup: self.leave(frame)? })
            }
            ast::Stmt::Defer(it) => {
                let frame = self.enter(it)?;
                self.token(it.defer_pos, "defer");
                let call = Expr::Call(self.call(&it.call)?);
                Stmt::Defer(DeferStmt { call, markup: self.leave(frame)? })
            }
            ast::Stmt::Return(it) => {
                let frame = self.enter(it)?;
                self.token(it.return_pos, "return");
                let results = self.exprs(&it.results)?;
                Stmt::Return(ReturnStmt { results, markup: self.leave(frame)? })
            }
            ast::Stmt::Branch(it) => {
                let frame = self.enter(it)?;
                self.token(it.tok_pos, it.tok.as_str());
                let label = it.label.as_ref().map(|label| self.ident(label)).transpose()?;
                Stmt::Branch(BranchStmt { tok: it.tok, label, markup: self.leave(frame)? })
            }
            ast::Stmt::Block(it) => Stmt::Block(self.block(it)?),
            ast::Stmt::If(it) => Stmt::If(self.if_stmt(it)?),
            ast::Stmt::Switch(it) => {
                let frame = self.enter(it)?;
                self.token(it.switch_pos, "switch");
                let init = self.boxed_stmt(it.init.as_deref())?;
                let tag = it.tag.as_ref().map(|tag| self.expr(tag)).transpose()?;
                let body = self.case_block(&it.body)?;
                Stmt::Switch(SwitchStmt { init, tag, body, markup: self.leave(frame)? })
            }
            ast::Stmt::TypeSwitch(it) => {
                let frame = self.enter(it)?;
                self.token(it.switch_pos, "switch");
                let init = self.boxed_stmt(it.init.as_deref())?;
                let assign = Box::new(self.guard(&it.assign)?);
                let body = self.case_block(&it.body)?;
                Stmt::TypeSwitch(TypeSwitchStmt { init, assign, body, markup: self.leave(frame)? })
            }
            ast::Stmt::Select(it) => return Err(unsupported(NodeKind::SelectStmt, it.range())),
            ast::Stmt::For(it) => {
                let frame = self.enter(it)?;
                self.token(it.for_pos, "for");
                let init = self.boxed_stmt(it.init.as_deref())?;
                let cond = it.cond.as_ref().map(|cond| self.expr(cond)).transpose()?;
                let post = self.boxed_stmt(it.post.as_deref())?;
                let body = self.block(&it.body)?;
                Stmt::For(ForStmt { init, cond, post, body, markup: self.leave(frame)? })
            }
            ast::Stmt::Range(it) => {
                let frame = self.enter(it)?;
                self.token(it.for_pos, "for");
                let key = it.key.as_ref().map(|key| self.expr(key)).transpose()?;
                let value = it.value.as_ref().map(|value| self.expr(value)).transpose()?;
                if let Some(tok_pos) = it.tok_pos {
                    self.token(tok_pos, it.tok.as_str());
                }
                self.token(it.range_pos, "range");
                let x = self.expr(&it.x)?;
                let body = self.block(&it.body)?;
                Stmt::Range(RangeStmt {
                    key,
                    value,
                    tok: it.tok,
                    x,
                    body,
                    markup: self.leave(frame)?,
                })
            }
        })
    }

    fn block(&mut self, block: &ast::BlockStmt) -> Result<BlockStmt> {
        let mut frame = self.enter(block)?;
        self.token(block.lbrace, "{");
        let list = self.stmts(&block.list)?;
        let closing = self.closing(&mut frame, block.rbrace, "}")?;
        Ok(BlockStmt { list, markup: self.leave(frame)?, closing })
    }

    fn if_stmt(&mut self, it: &ast::IfStmt) -> Result<IfStmt> {
        let frame = self.enter(it)?;
        self.token(it.if_pos, "if");
        let init = self.boxed_stmt(it.init.as_deref())?;
        let cond = self.expr(&it.cond)?;
        let body = self.block(&it.body)?;
        let else_ = match &it.else_ {
            Some(ast::Else::If(stmt)) => Some(Box::new(Stmt::If(self.if_stmt(stmt)?))),
            Some(ast::Else::Block(block)) => Some(Box::new(Stmt::Block(self.block(block)?))),
            None => None,
        };
        Ok(IfStmt { init, cond, body, else_, markup: self.leave(frame)? })
    }

    /// A switch body becomes a block of `CaseClause` statements.
    fn case_block(&mut self, body: &ast::CaseBlock) -> Result<BlockStmt> {
        let mut frame = self.enter(body)?;
        self.token(body.lbrace, "{");
        let list = body
            .clauses
            .iter()
            .map(|clause| self.case_clause(clause).map(Stmt::CaseClause))
            .collect::<Result<_>>()?;
        let closing = self.closing(&mut frame, body.rbrace, "}")?;
        Ok(BlockStmt { list, markup: self.leave(frame)?, closing })
    }

    fn case_clause(&mut self, clause: &ast::CaseClause) -> Result<CaseClause> {
        let frame = self.enter(clause)?;
        self.token(clause.case_pos, clause.keyword());
        let list = self.exprs(&clause.list)?;
        self.token(clause.colon, ":");
        let body = self.stmts(&clause.body)?;
        Ok(CaseClause { list, body, markup: self.leave(frame)? })
    }

    fn guard(&mut self, guard: &ast::TypeSwitchGuard) -> Result<Stmt> {
        let frame = self.enter(guard)?;
        let lhs = guard.lhs.as_ref().map(|lhs| self.ident(lhs)).transpose()?;
        if let Some(define) = guard.define {
            self.token(define, ":=");
        }
        let x = Expr::TypeAssert(self.type_assert(&guard.x)?);
        let markup = self.leave(frame)?;
        Ok(match lhs {
            Some(lhs) => Stmt::Assign(AssignStmt {
                lhs: vec![Expr::Ident(lhs)],
                tok: AssignOp::Define,
                rhs: vec![x],
                markup,
            }),
            None => Stmt::Expr(ExprStmt { x, markup }),
        })
    }
}
