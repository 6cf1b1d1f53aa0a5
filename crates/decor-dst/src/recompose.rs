//! Structural tree → native tree with synthesized positions.
//!
//! Tokens are allocated in the order the printer emits them, punctuation the
//! native tree does not record included, so the positions and the line table
//! describe the text the printer would produce.

use decor_span::LineTable;
use decor_syntax::ast;
use decor_syntax::{Comment, CommentGroup};
use text_size::TextSize;

use crate::markup::{Markup, Trivia};
use crate::tree::*;
use crate::{Error, Result};

/// A native tree ready for the printer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Recomposed {
    pub file: ast::File,
    pub lines: LineTable,
    pub comments: Vec<CommentGroup>,
}

pub fn recompose(file: &File) -> Result<Recomposed> {
    let mut recomposer = Recomposer { cursor: Cursor::new() };
    let file = recomposer.file(file)?;
    let (lines, comments) = recomposer.cursor.finish();
    Ok(Recomposed { file, lines, comments })
}

/// Next free offset, the line table grown so far and the comment clusters.
struct Cursor {
    offset: TextSize,
    lines: LineTable,
    groups: Vec<CommentGroup>,
    open: Option<CommentGroup>,
}

impl Cursor {
    fn new() -> Self {
        Self { offset: TextSize::new(0), lines: LineTable::new(), groups: Vec::new(), open: None }
    }

    /// Allocates a token and returns its offset. Any open cluster ends here.
    fn next(&mut self, text: &str) -> TextSize {
        self.flush();
        self.place(text)
    }

    /// Reserves `text` plus one separator column, registering the line
    /// breaks `text` contains.
    fn place(&mut self, text: &str) -> TextSize {
        let pos = self.offset;
        for (index, _) in text.match_indices('\n') {
            let added = self.lines.add_line(pos + TextSize::of(&text[..=index]));
            debug_assert!(added);
        }
        self.offset = pos + TextSize::of(text) + TextSize::new(1);
        pos
    }

    fn line(&mut self) {
        let added = self.lines.add_line(self.offset + TextSize::new(1));
        debug_assert!(added);
        self.offset += TextSize::new(1);
    }

    fn comment(&mut self, text: &str) {
        let pos = self.place(text);
        let comment = Comment { pos, text: text.to_owned() };
        self.open.get_or_insert_with(|| CommentGroup { comments: Vec::new() }).comments.push(comment);
    }

    fn flush(&mut self) {
        if let Some(group) = self.open.take() {
            self.groups.push(group);
        }
    }

    fn finish(mut self) -> (LineTable, Vec<CommentGroup>) {
        self.flush();
        self.lines.set_len(self.offset);
        (self.lines, self.groups)
    }
}

fn check_comment(text: &str) -> Result<(), &'static str> {
    if let Some(body) = text.strip_prefix("//") {
        return if body.contains('\n') { Err("line comment spans lines") } else { Ok(()) };
    }
    match text.strip_prefix("/*") {
        Some(body) => match body.find("*/") {
            Some(end) if end + 2 == body.len() => Ok(()),
            _ => Err("unterminated block comment"),
        },
        None => Err("comment must start with `//` or `/*`"),
    }
}

fn mismatch(expected: &'static str, found: &'static str) -> Error {
    Error::AssertionMismatch { expected, found }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Fields {
    Params,
    Struct,
    Interface,
}

impl Fields {
    fn delimiters(self) -> (&'static str, &'static str) {
        match self {
            Self::Params => ("(", ")"),
            Self::Struct | Self::Interface => ("{", "}"),
        }
    }
}

struct Recomposer {
    cursor: Cursor,
}

impl Recomposer {
    fn trivia(&mut self, node: &'static str, trivia: &[Trivia]) -> Result<()> {
        for (index, piece) in trivia.iter().enumerate() {
            match piece {
                Trivia::Comment(text) => {
                    check_comment(text)
                        .map_err(|reason| Error::InconsistentMarkup { node, index, reason })?;
                    self.cursor.comment(text);
                }
                Trivia::Line => {
                    self.cursor.line();
                    if !matches!(trivia.get(index + 1), Some(Trivia::Comment(_))) {
                        self.cursor.flush();
                    }
                }
            }
        }
        Ok(())
    }

    fn wrap<T>(
        &mut self,
        node: &'static str,
        markup: &Markup,
        build: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        self.trivia(node, &markup.before)?;
        let built = build(self)?;
        self.trivia(node, &markup.after)?;
        Ok(built)
    }

    /// Closing trivia followed by the delimiter itself.
    fn close(&mut self, node: &'static str, closing: &[Trivia], text: &str) -> Result<TextSize> {
        self.trivia(node, closing)?;
        Ok(self.cursor.next(text))
    }

    fn file(&mut self, file: &File) -> Result<ast::File> {
        self.wrap("File", &file.markup, |this| {
            let package = match &file.package {
                Some(name) => {
                    let package_pos = this.cursor.next("package");
                    Some(ast::PackageClause { package_pos, name: this.ident(name)? })
                }
                None => None,
            };
            let decls = file.decls.iter().map(|decl| this.decl(decl)).collect::<Result<_>>()?;
            let eof = this.close("File", &file.closing, "")?;
            Ok(ast::File { package, decls, eof })
        })
    }

    fn decl(&mut self, decl: &Decl) -> Result<ast::Decl> {
        match decl {
            Decl::Gen(decl) => self.gen_decl(decl).map(ast::Decl::Gen),
            Decl::Func(decl) => self.wrap("FuncDecl", &decl.markup, |this| {
                let func_pos = this.cursor.next("func");
                let recv = decl
                    .recv
                    .as_ref()
                    .map(|recv| this.field_list(recv, Fields::Params, true))
                    .transpose()?;
                let name = this.ident(&decl.name)?;
                let typ = this.func_type(&decl.typ, false)?;
                let body = decl.body.as_ref().map(|body| this.block(body)).transpose()?;
                Ok(ast::Decl::Func(ast::FuncDecl { func_pos, recv, name, typ, body }))
            }),
        }
    }

    fn gen_decl(&mut self, decl: &GenDecl) -> Result<ast::GenDecl> {
        self.wrap("GenDecl", &decl.markup, |this| {
            let tok_pos = this.cursor.next(decl.tok.as_str());
            let grouped = decl.grouped || decl.specs.len() != 1;
            let lparen = grouped.then(|| this.cursor.next("("));
            let specs =
                decl.specs.iter().map(|spec| this.spec(spec, decl.tok)).collect::<Result<_>>()?;
            let rparen = if grouped {
                Some(this.close("GenDecl", &decl.closing, ")")?)
            } else {
                this.trivia("GenDecl", &decl.closing)?;
                None
            };
            Ok(ast::GenDecl { tok_pos, tok: decl.tok, lparen, specs, rparen })
        })
    }

    fn spec(&mut self, spec: &Spec, tok: DeclKeyword) -> Result<ast::Spec> {
        match (spec, tok) {
            (Spec::Import(spec), DeclKeyword::Import) => self.wrap("ImportSpec", &spec.markup, |this| {
                let name = spec.name.as_ref().map(|name| this.ident(name)).transpose()?;
                let path = this.basic_lit(&spec.path)?;
                Ok(ast::Spec::Import(ast::ImportSpec { name, path }))
            }),
            (Spec::Value(spec), DeclKeyword::Const | DeclKeyword::Var) => {
                self.wrap("ValueSpec", &spec.markup, |this| {
                    let names = this.idents(&spec.names)?;
                    let typ = spec.typ.as_ref().map(|typ| this.expr(typ)).transpose()?;
                    let mut values = Vec::new();
                    if !spec.values.is_empty() {
                        this.cursor.next("=");
                        values = this.exprs(&spec.values)?;
                    }
                    Ok(ast::Spec::Value(ast::ValueSpec { names, typ, values }))
                })
            }
            (Spec::Type(spec), DeclKeyword::Type) => self.wrap("TypeSpec", &spec.markup, |this| {
                let name = this.ident(&spec.name)?;
                let assign = spec.assign.then(|| this.cursor.next("="));
                let typ = this.expr(&spec.typ)?;
                Ok(ast::Spec::Type(ast::TypeSpec { name, assign, typ }))
            }),
            (_, DeclKeyword::Import) => Err(mismatch("ImportSpec", spec.name())),
            (_, DeclKeyword::Const | DeclKeyword::Var) => Err(mismatch("ValueSpec", spec.name())),
            (_, DeclKeyword::Type) => Err(mismatch("TypeSpec", spec.name())),
        }
    }

    fn ident(&mut self, ident: &Ident) -> Result<ast::Ident> {
        self.wrap("Ident", &ident.markup, |this| {
            Ok(ast::Ident { pos: this.cursor.next(&ident.name), name: ident.name.clone() })
        })
    }

    /// Comma-separated identifiers.
    fn idents(&mut self, idents: &[Ident]) -> Result<Vec<ast::Ident>> {
        let mut out = Vec::with_capacity(idents.len());
        for (index, ident) in idents.iter().enumerate() {
            if index > 0 {
                self.cursor.next(",");
            }
            out.push(self.ident(ident)?);
        }
        Ok(out)
    }

    fn basic_lit(&mut self, lit: &BasicLit) -> Result<ast::BasicLit> {
        self.wrap("BasicLit", &lit.markup, |this| {
            Ok(ast::BasicLit { pos: this.cursor.next(&lit.value), kind: lit.kind, value: lit.value.clone() })
        })
    }

    /// Comma-separated expressions.
    fn exprs(&mut self, exprs: &[Expr]) -> Result<Vec<ast::Expr>> {
        let mut out = Vec::with_capacity(exprs.len());
        for (index, expr) in exprs.iter().enumerate() {
            if index > 0 {
                self.cursor.next(",");
            }
            out.push(self.expr(expr)?);
        }
        Ok(out)
    }

    fn boxed(&mut self, expr: &Expr) -> Result<Box<ast::Expr>> {
        self.expr(expr).map(Box::new)
    }

    fn boxed_opt(&mut self, expr: Option<&Expr>) -> Result<Option<Box<ast::Expr>>> {
        expr.map(|expr| self.boxed(expr)).transpose()
    }

    fn expr(&mut self, expr: &Expr) -> Result<ast::Expr> {
        Ok(match expr {
            Expr::Ident(it) => ast::Expr::Ident(self.ident(it)?),
            Expr::BasicLit(it) => ast::Expr::BasicLit(self.basic_lit(it)?),
            Expr::CompositeLit(it) => self.wrap("CompositeLit", &it.markup, |this| {
                let typ = this.boxed_opt(it.typ.as_deref())?;
                let lbrace = this.cursor.next("{");
                let mut elts = Vec::with_capacity(it.elts.len());
                for (index, elt) in it.elts.iter().enumerate() {
                    if index > 0 {
                        this.cursor.next(",");
                    }
                    elts.push(this.element(elt)?);
                }
                let rbrace = this.close("CompositeLit", &it.closing, "}")?;
                Ok(ast::Expr::CompositeLit(ast::CompositeLit { typ, lbrace, elts, rbrace }))
            })?,
            Expr::KeyValue(_) => return Err(mismatch("expression", expr.name())),
            Expr::FuncLit(it) => self.wrap("FuncLit", &it.markup, |this| {
                let typ = this.func_type(&it.typ, true)?;
                let body = this.block(&it.body)?;
                Ok(ast::Expr::FuncLit(ast::FuncLit { typ, body }))
            })?,
            Expr::Paren(it) => self.wrap("ParenExpr", &it.markup, |this| {
                let lparen = this.cursor.next("(");
                let x = this.boxed(&it.x)?;
                let rparen = this.close("ParenExpr", &it.closing, ")")?;
                Ok(ast::Expr::Paren(ast::ParenExpr { lparen, x, rparen }))
            })?,
            Expr::Selector(it) => self.wrap("SelectorExpr", &it.markup, |this| {
                let x = this.boxed(&it.x)?;
                this.cursor.next(".");
                let sel = this.ident(&it.sel)?;
                Ok(ast::Expr::Selector(ast::SelectorExpr { x, sel }))
            })?,
            Expr::Index(it) => self.wrap("IndexExpr", &it.markup, |this| {
                let x = this.boxed(&it.x)?;
                let lbrack = this.cursor.next("[");
                let index = this.boxed(&it.index)?;
                let rbrack = this.close("IndexExpr", &it.closing, "]")?;
                Ok(ast::Expr::Index(ast::IndexExpr { x, lbrack, index, rbrack }))
            })?,
            Expr::Slice(it) => self.wrap("SliceExpr", &it.markup, |this| {
                let slice3 = it.slice3 || it.max.is_some();
                let x = this.boxed(&it.x)?;
                let lbrack = this.cursor.next("[");
                let low = this.boxed_opt(it.low.as_deref())?;
                this.cursor.next(":");
                let high = this.boxed_opt(it.high.as_deref())?;
                let mut max = None;
                if slice3 {
                    this.cursor.next(":");
                    max = this.boxed_opt(it.max.as_deref())?;
                }
                let rbrack = this.close("SliceExpr", &it.closing, "]")?;
                Ok(ast::Expr::Slice(ast::SliceExpr { x, lbrack, low, high, max, slice3, rbrack }))
            })?,
            Expr::TypeAssert(it) => ast::Expr::TypeAssert(self.type_assert(it)?),
            Expr::Call(it) => ast::Expr::Call(self.call(it)?),
            Expr::Star(it) => self.wrap("StarExpr", &it.markup, |this| {
                let star = this.cursor.next("*");
                Ok(ast::Expr::Star(ast::StarExpr { star, x: this.boxed(&it.x)? }))
            })?,
            Expr::Unary(it) => self.wrap("UnaryExpr", &it.markup, |this| {
                let op_pos = this.cursor.next(it.op.as_str());
                Ok(ast::Expr::Unary(ast::UnaryExpr { op_pos, op: it.op, x: this.boxed(&it.x)? }))
            })?,
            Expr::Binary(it) => self.wrap("BinaryExpr", &it.markup, |this| {
                let x = this.boxed(&it.x)?;
                let op_pos = this.cursor.next(it.op.as_str());
                let y = this.boxed(&it.y)?;
                Ok(ast::Expr::Binary(ast::BinaryExpr { x, op_pos, op: it.op, y }))
            })?,
            Expr::ArrayType(it) => self.wrap("ArrayType", &it.markup, |this| {
                let lbrack = this.cursor.next("[");
                let len = this.boxed_opt(it.len.as_deref())?;
                this.cursor.next("]");
                let elt = this.boxed(&it.elt)?;
                Ok(ast::Expr::ArrayType(ast::ArrayType { lbrack, len, elt }))
            })?,
            Expr::StructType(it) => self.wrap("StructType", &it.markup, |this| {
                let struct_pos = this.cursor.next("struct");
                let fields = this.field_list(&it.fields, Fields::Struct, true)?;
                Ok(ast::Expr::StructType(ast::StructType { struct_pos, fields }))
            })?,
            Expr::FuncType(it) => ast::Expr::FuncType(self.func_type(it, true)?),
            Expr::InterfaceType(it) => self.wrap("InterfaceType", &it.markup, |this| {
                let interface_pos = this.cursor.next("interface");
                let methods = this.field_list(&it.methods, Fields::Interface, true)?;
                Ok(ast::Expr::InterfaceType(ast::InterfaceType { interface_pos, methods }))
            })?,
            Expr::MapType(it) => self.wrap("MapType", &it.markup, |this| {
                let map_pos = this.cursor.next("map");
                this.cursor.next("[");
                let key = this.boxed(&it.key)?;
                this.cursor.next("]");
                let value = this.boxed(&it.value)?;
                Ok(ast::Expr::MapType(ast::MapType { map_pos, key, value }))
            })?,
            Expr::Ellipsis(it) => self.wrap("Ellipsis", &it.markup, |this| {
                let pos = this.cursor.next("...");
                let elt = this.boxed_opt(it.elt.as_deref())?;
                Ok(ast::Expr::Ellipsis(ast::Ellipsis { pos, elt }))
            })?,
        })
    }

    /// An element of a composite literal, the one place a key-value pair fits.
    fn element(&mut self, expr: &Expr) -> Result<ast::Element> {
        match expr {
            Expr::KeyValue(kv) => self.wrap("KeyValueExpr", &kv.markup, |this| {
                let key = this.expr(&kv.key)?;
                let colon = this.cursor.next(":");
                let value = this.expr(&kv.value)?;
                Ok(ast::Element::KeyValue(ast::KeyValueExpr { key, colon, value }))
            }),
            expr => self.expr(expr).map(ast::Element::Expr),
        }
    }

    fn type_assert(&mut self, it: &TypeAssertExpr) -> Result<ast::TypeAssertExpr> {
        self.wrap("TypeAssertExpr", &it.markup, |this| {
            let x = this.boxed(&it.x)?;
            this.cursor.next(".");
            let lparen = this.cursor.next("(");
            let typ = match &it.typ {
                Some(typ) => Some(this.boxed(typ)?),
                None => {
                    this.cursor.next("type");
                    None
                }
            };
            let rparen = this.close("TypeAssertExpr", &it.closing, ")")?;
            Ok(ast::TypeAssertExpr { x, lparen, typ, rparen })
        })
    }

    fn call(&mut self, it: &CallExpr) -> Result<ast::CallExpr> {
        self.wrap("CallExpr", &it.markup, |this| {
            let fun = this.boxed(&it.fun)?;
            let lparen = this.cursor.next("(");
            let args = this.exprs(&it.args)?;
            let ellipsis = it.ellipsis.then(|| this.cursor.next("..."));
            let rparen = this.close("CallExpr", &it.closing, ")")?;
            Ok(ast::CallExpr { fun, lparen, args, ellipsis, rparen })
        })
    }

    /// `func` is printed for function literals and types, never in a
    /// declaration or an interface method.
    fn func_type(&mut self, typ: &FuncType, keyword: bool) -> Result<ast::FuncType> {
        self.wrap("FuncType", &typ.markup, |this| {
            let func = keyword.then(|| this.cursor.next("func"));
            let params = this.field_list(&typ.params, Fields::Params, true)?;
            let results = match &typ.results {
                Some(results) => {
                    let delimited = results.delimited
                        || results.list.len() != 1
                        || results.list.iter().any(|field| !field.names.is_empty());
                    Some(this.field_list(results, Fields::Params, delimited)?)
                }
                None => None,
            };
            Ok(ast::FuncType { func, params, results })
        })
    }

    fn field_list(&mut self, list: &FieldList, fields: Fields, delimited: bool) -> Result<ast::FieldList> {
        self.wrap("FieldList", &list.markup, |this| {
            let (open, close) = fields.delimiters();
            let opening = delimited.then(|| this.cursor.next(open));
            let mut parsed = Vec::with_capacity(list.list.len());
            for (index, field) in list.list.iter().enumerate() {
                if index > 0 && fields == Fields::Params {
                    this.cursor.next(",");
                }
                parsed.push(this.field(field, fields)?);
            }
            let closing = if delimited {
                Some(this.close("FieldList", &list.closing, close)?)
            } else {
                this.trivia("FieldList", &list.closing)?;
                None
            };
            Ok(ast::FieldList { opening, list: parsed, closing })
        })
    }

    fn field(&mut self, field: &Field, fields: Fields) -> Result<ast::Field> {
        self.wrap("Field", &field.markup, |this| {
            let names = this.idents(&field.names)?;
            let typ = match (&field.typ, fields) {
                (Expr::FuncType(method), Fields::Interface) if !field.names.is_empty() => {
                    ast::Expr::FuncType(this.func_type(method, false)?)
                }
                (typ, _) => this.expr(typ)?,
            };
            let tag = field.tag.as_ref().map(|tag| this.basic_lit(tag)).transpose()?;
            Ok(ast::Field { names, typ, tag })
        })
    }

    fn stmts(&mut self, stmts: &[Stmt]) -> Result<Vec<ast::Stmt>> {
        stmts.iter().map(|stmt| self.stmt(stmt)).collect()
    }

    /// `init;` of an `if` or `switch` header.
    fn init(&mut self, init: Option<&Stmt>) -> Result<Option<Box<ast::Stmt>>> {
        let Some(init) = init else {
            return Ok(None);
        };
        let init = self.stmt(init)?;
        self.cursor.next(";");
        Ok(Some(Box::new(init)))
    }

    fn boxed_stmt(&mut self, stmt: Option<&Stmt>) -> Result<Option<Box<ast::Stmt>>> {
        stmt.map(|stmt| self.stmt(stmt).map(Box::new)).transpose()
    }

    fn stmt(&mut self, stmt: &Stmt) -> Result<ast::Stmt> {
        Ok(match stmt {
            Stmt::Decl(it) => self.wrap("DeclStmt", &it.markup, |this| {
                Ok(ast::Stmt::Decl(ast::DeclStmt { decl: this.gen_decl(&it.decl)? }))
            })?,
            Stmt::Labeled(it) => self.wrap("LabeledStmt", &it.markup, |this| {
                let label = this.ident(&it.label)?;
                let colon = this.cursor.next(":");
                let stmt = match &it.stmt {
                    Some(stmt) => Some(Box::new(this.stmt(stmt)?)),
                    None => None,
                };
                Ok(ast::Stmt::Labeled(ast::LabeledStmt { label, colon, stmt }))
            })?,
            Stmt::Expr(it) => self.wrap("ExprStmt", &it.markup, |this| {
                Ok(ast::Stmt::Expr(ast::ExprStmt { x: this.expr(&it.x)? }))
            })?,
            Stmt::IncDec(it) => self.wrap("IncDecStmt", &it.markup, |this| {
                let x = this.expr(&it.x)?;
                let tok_pos = this.cursor.next(it.tok.as_str());
                Ok(ast::Stmt::IncDec(ast::IncDecStmt { x, tok_pos, tok: it.tok }))
            })?,
            Stmt::Assign(it) => self.wrap("AssignStmt", &it.markup, |this| {
                let lhs = this.exprs(&it.lhs)?;
                let tok_pos = this.cursor.next(it.tok.as_str());
                let rhs = this.exprs(&it.rhs)?;
                Ok(ast::Stmt::Assign(ast::AssignStmt { lhs, tok_pos, tok: it.tok, rhs }))
            })?,
            Stmt::Go(it) => self.wrap("GoStmt", &it.markup, |this| {
                let go_pos = this.cursor.next("go");
                let call = this.call_operand(&it.call)?;
                Ok(ast::Stmt::Go(ast::GoStmt { go_pos, call }))
            })?,
            Stmt::Defer(it) => self.wrap("DeferStmt", &it.markup, |this| {
                let defer_pos = this.cursor.next("defer");
                let call = this.call_operand(&it.call)?;
                Ok(ast::Stmt::Defer(ast::DeferStmt { defer_pos, call }))
            })?,
            Stmt::Return(it) => self.wrap("ReturnStmt", &it.markup, |this| {
                let return_pos = this.cursor.next("return");
                let results = this.exprs(&it.results)?;
                Ok(ast::Stmt::Return(ast::ReturnStmt { return_pos, results }))
            })?,
            Stmt::Branch(it) => self.wrap("BranchStmt", &it.markup, |this| {
                let tok_pos = this.cursor.next(it.tok.as_str());
                let label = it.label.as_ref().map(|label| this.ident(label)).transpose()?;
                Ok(ast::Stmt::Branch(ast::BranchStmt { tok_pos, tok: it.tok, label }))
            })?,
            Stmt::Block(it) => ast::Stmt::Block(self.block(it)?),
            Stmt::If(it) => ast::Stmt::If(self.if_stmt(it)?),
            Stmt::CaseClause(_) => return Err(mismatch("non-case statement", stmt.name())),
            Stmt::Switch(it) => self.wrap("SwitchStmt", &it.markup, |this| {
                let switch_pos = this.cursor.next("switch");
                let init = this.init(it.init.as_deref())?;
                let tag = it.tag.as_ref().map(|tag| this.expr(tag)).transpose()?;
                let body = this.case_block(&it.body)?;
                Ok(ast::Stmt::Switch(ast::SwitchStmt { switch_pos, init, tag, body }))
            })?,
            Stmt::TypeSwitch(it) => self.wrap("TypeSwitchStmt", &it.markup, |this| {
                let switch_pos = this.cursor.next("switch");
                let init = this.init(it.init.as_deref())?;
                let assign = this.guard(&it.assign)?;
                let body = this.case_block(&it.body)?;
                Ok(ast::Stmt::TypeSwitch(ast::TypeSwitchStmt { switch_pos, init, assign, body }))
            })?,
            Stmt::For(it) => self.wrap("ForStmt", &it.markup, |this| {
                let for_pos = this.cursor.next("for");
                let (init, cond, post) = if it.init.is_some() || it.post.is_some() {
                    let init = this.boxed_stmt(it.init.as_deref())?;
                    this.cursor.next(";");
                    let cond = it.cond.as_ref().map(|cond| this.expr(cond)).transpose()?;
                    this.cursor.next(";");
                    let post = this.boxed_stmt(it.post.as_deref())?;
                    (init, cond, post)
                } else {
                    (None, it.cond.as_ref().map(|cond| this.expr(cond)).transpose()?, None)
                };
                let body = this.block(&it.body)?;
                Ok(ast::Stmt::For(ast::ForStmt { for_pos, init, cond, post, body }))
            })?,
            Stmt::Range(it) => self.wrap("RangeStmt", &it.markup, |this| {
                let for_pos = this.cursor.next("for");
                let (key, value, tok_pos) = match (&it.key, &it.value) {
                    (Some(key), value) => {
                        let key = this.expr(key)?;
                        let value = match value {
                            Some(value) => {
                                this.cursor.next(",");
                                Some(this.expr(value)?)
                            }
                            None => None,
                        };
                        (Some(key), value, Some(this.cursor.next(it.tok.as_str())))
                    }
                    (None, Some(value)) => return Err(mismatch("range key", value.name())),
                    (None, None) => (None, None, None),
                };
                let range_pos = this.cursor.next("range");
                let x = this.expr(&it.x)?;
                let body = this.block(&it.body)?;
                Ok(ast::Stmt::Range(ast::RangeStmt {
                    for_pos,
                    key,
                    value,
                    tok_pos,
                    tok: it.tok,
                    range_pos,
                    x,
                    body,
                }))
            })?,
        })
    }

    fn call_operand(&mut self, call: &Expr) -> Result<ast::CallExpr> {
        match call {
            Expr::Call(call) => self.call(call),
            _ => Err(mismatch("CallExpr", call.name())),
        }
    }

    fn block(&mut self, block: &BlockStmt) -> Result<ast::BlockStmt> {
        self.wrap("BlockStmt", &block.markup, |this| {
            let lbrace = this.cursor.next("{");
            let list = this.stmts(&block.list)?;
            let rbrace = this.close("BlockStmt", &block.closing, "}")?;
            Ok(ast::BlockStmt { lbrace, list, rbrace })
        })
    }

    fn if_stmt(&mut self, it: &IfStmt) -> Result<ast::IfStmt> {
        self.wrap("IfStmt", &it.markup, |this| {
            let if_pos = this.cursor.next("if");
            let init = this.init(it.init.as_deref())?;
            let cond = this.expr(&it.cond)?;
            let body = this.block(&it.body)?;
            let else_ = match it.else_.as_deref() {
                Some(else_) => {
                    this.cursor.next("else");
                    Some(match else_ {
                        Stmt::If(stmt) => ast::Else::If(Box::new(this.if_stmt(stmt)?)),
                        Stmt::Block(block) => ast::Else::Block(this.block(block)?),
                        other => return Err(mismatch("IfStmt or BlockStmt", other.name())),
                    })
                }
                None => None,
            };
            Ok(ast::IfStmt { if_pos, init, cond, body, else_ })
        })
    }

    /// A switch body: a block holding case clauses only.
    fn case_block(&mut self, body: &BlockStmt) -> Result<ast::CaseBlock> {
        self.wrap("BlockStmt", &body.markup, |this| {
            let lbrace = this.cursor.next("{");
            let mut clauses = Vec::with_capacity(body.list.len());
            for stmt in &body.list {
                let Stmt::CaseClause(clause) = stmt else {
                    return Err(mismatch("CaseClause", stmt.name()));
                };
                clauses.push(this.case_clause(clause)?);
            }
            let rbrace = this.close("BlockStmt", &body.closing, "}")?;
            Ok(ast::CaseBlock { lbrace, clauses, rbrace })
        })
    }

    fn case_clause(&mut self, clause: &CaseClause) -> Result<ast::CaseClause> {
        self.wrap("CaseClause", &clause.markup, |this| {
            let keyword = if clause.list.is_empty() { "default" } else { "case" };
            let case_pos = this.cursor.next(keyword);
            let list = this.exprs(&clause.list)?;
            let colon = this.cursor.next(":");
            let body = this.stmts(&clause.body)?;
            Ok(ast::CaseClause { case_pos, list, colon, body })
        })
    }

    /// `x := y.(type)` or `y.(type)`.
    fn guard(&mut self, stmt: &Stmt) -> Result<ast::TypeSwitchGuard> {
        match stmt {
            Stmt::Assign(AssignStmt { lhs, tok: AssignOp::Define, rhs, markup }) => {
                match (lhs.as_slice(), rhs.as_slice()) {
                    ([Expr::Ident(lhs)], [Expr::TypeAssert(x)]) if x.typ.is_none() => {
                        self.wrap("AssignStmt", markup, |this| {
                            let lhs = this.ident(lhs)?;
                            let define = this.cursor.next(":=");
                            let x = this.type_assert(x)?;
                            Ok(ast::TypeSwitchGuard { lhs: Some(lhs), define: Some(define), x })
                        })
                    }
                    _ => Err(mismatch("type switch guard", stmt.name())),
                }
            }
            Stmt::Expr(ExprStmt { x: Expr::TypeAssert(x), markup }) if x.typ.is_none() => {
                self.wrap("ExprStmt", markup, |this| {
                    Ok(ast::TypeSwitchGuard { lhs: None, define: None, x: this.type_assert(x)? })
                })
            }
            _ => Err(mismatch("type switch guard", stmt.name())),
        }
    }
}
