//! Canonical printer.
//!
//! Horizontal layout is fixed by the grammar. Vertical layout follows the
//! positions of the tree: the number of line breaks between two positioned
//! items is the difference of their lines, capped at one blank line and raised
//! to whatever the construct requires.

use decor_span::LineTable;
use text_size::TextSize;

use crate::ast::*;
use crate::comments::{Comment, CommentGroup};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Indent {
    #[default]
    Tabs,
    Spaces(u8),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrintConfig {
    pub indent: Indent,
}

pub fn render(
    file: &File,
    lines: &LineTable,
    comments: &[CommentGroup],
    config: &PrintConfig,
) -> String {
    let mut printer = Printer {
        lines,
        comments: comments.iter().flat_map(|group| &group.comments).collect(),
        next_comment: 0,
        config,
        out: String::new(),
        depth: 0,
        last_line: None,
        line_start: true,
        space: false,
        min_breaks: 0,
        after_line_comment: false,
    };
    printer.file(file);
    printer.finish()
}

const MAX_BREAKS: u32 = 2;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Fields {
    Params,
    Struct,
    Interface,
}

struct Printer<'a> {
    lines: &'a LineTable,
    comments: Vec<&'a Comment>,
    next_comment: usize,
    config: &'a PrintConfig,
    out: String,
    depth: usize,
    /// Line on which the last positioned item ended.
    last_line: Option<u32>,
    line_start: bool,
    space: bool,
    min_breaks: u32,
    after_line_comment: bool,
}

impl Printer<'_> {
    fn finish(mut self) -> String {
        self.flush(TextSize::from(u32::MAX));
        let trimmed = self.out.trim_end_matches(['\n', ' ', '\t']).len();
        self.out.truncate(trimmed);
        self.out.push('\n');
        self.out
    }

    fn breaks_before(&self, pos: TextSize, min: u32) -> u32 {
        let Some(last_line) = self.last_line else {
            return 0;
        };
        let mut breaks = self.lines.line(pos).saturating_sub(last_line).min(MAX_BREAKS);
        breaks = breaks.max(min);
        if self.after_line_comment {
            breaks = breaks.max(1);
        }
        breaks
    }

    fn newlines(&mut self, count: u32) {
        for _ in 0..count {
            self.out.push('\n');
        }
        match self.config.indent {
            Indent::Tabs => self.out.extend(std::iter::repeat_n('\t', self.depth)),
            Indent::Spaces(width) => {
                self.out.extend(std::iter::repeat_n(' ', self.depth * usize::from(width)))
            }
        }
        self.line_start = true;
    }

    fn flush(&mut self, pos: TextSize) {
        while let Some(&comment) = self.comments.get(self.next_comment) {
            if comment.pos >= pos {
                break;
            }
            self.next_comment += 1;

            let breaks = self.breaks_before(comment.pos, 0);
            if breaks > 0 {
                self.newlines(breaks);
            } else if !self.line_start {
                self.out.push(' ');
            }
            self.out.push_str(&comment.text);
            self.last_line = Some(self.lines.line(comment.range().end()));
            self.after_line_comment = comment.is_line_comment();
            self.line_start = false;
            self.space = true;
        }
    }

    fn blank(&mut self) {
        self.space = true;
    }

    fn at_least(&mut self, breaks: u32) {
        self.min_breaks = self.min_breaks.max(breaks);
    }

    fn token(&mut self, pos: TextSize, text: &str) {
        self.flush(pos);
        let min = std::mem::take(&mut self.min_breaks);
        let breaks = self.breaks_before(pos, min);
        if breaks > 0 {
            self.newlines(breaks);
        } else if self.space && !self.line_start {
            self.out.push(' ');
        }
        self.out.push_str(text);
        self.last_line = Some(self.lines.line(pos + TextSize::of(text)));
        self.after_line_comment = false;
        self.line_start = false;
        self.space = false;
    }

    /// A token the tree records no offset for.
    fn punct(&mut self, text: &str) {
        if self.space && !self.line_start {
            self.out.push(' ');
        }
        self.out.push_str(text);
        self.line_start = false;
        self.space = false;
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    /// Closes an indented construct; comments before `pos` stay inside it.
    fn close(&mut self, pos: TextSize, text: &str, min: u32) {
        self.flush(pos);
        self.depth = self.depth.saturating_sub(1);
        self.at_least(min);
        self.token(pos, text);
    }

    /// Closes a comma-separated list, terminating the last element with a
    /// comma when the delimiter moves to a later line.
    fn close_list(&mut self, pos: TextSize, text: &str, non_empty: bool) {
        let moves = self.last_line.is_some_and(|last| self.lines.line(pos) > last);
        if non_empty && moves {
            self.punct(",");
        }
        self.close(pos, text, 0);
    }

    fn comma_separated<T>(&mut self, items: &[T], mut each: impl FnMut(&mut Self, &T)) {
        for (index, item) in items.iter().enumerate() {
            if index > 0 {
                self.punct(",");
                self.blank();
            }
            each(self, item);
        }
    }

    fn file(&mut self, file: &File) {
        if let Some(package) = &file.package {
            self.token(package.package_pos, "package");
            self.blank();
            self.ident(&package.name);
        }
        for decl in &file.decls {
            self.at_least(1);
            self.decl(decl);
        }
    }

    fn decl(&mut self, decl: &Decl) {
        match decl {
            Decl::Gen(decl) => self.gen_decl(decl),
            Decl::Func(decl) => {
                self.token(decl.func_pos, "func");
                self.blank();
                if let Some(recv) = &decl.recv {
                    self.field_list(recv, Fields::Params);
                    self.blank();
                }
                self.ident(&decl.name);
                self.signature(&decl.typ);
                if let Some(body) = &decl.body {
                    self.blank();
                    self.block(body);
                }
            }
        }
    }

    fn gen_decl(&mut self, decl: &GenDecl) {
        self.token(decl.tok_pos, decl.tok.as_str());
        self.blank();
        match (decl.lparen, decl.rparen) {
            (Some(lparen), Some(rparen)) => {
                self.token(lparen, "(");
                self.indent();
                for spec in &decl.specs {
                    self.at_least(1);
                    self.spec(spec);
                }
                self.close(rparen, ")", u32::from(!decl.specs.is_empty()));
            }
            _ => {
                for spec in &decl.specs {
                    self.spec(spec);
                }
            }
        }
    }

    fn spec(&mut self, spec: &Spec) {
        match spec {
            Spec::Import(spec) => {
                if let Some(name) = &spec.name {
                    self.ident(name);
                    self.blank();
                }
                self.basic_lit(&spec.path);
            }
            Spec::Value(spec) => {
                self.comma_separated(&spec.names, Self::ident);
                if let Some(typ) = &spec.typ {
                    self.blank();
                    self.expr(typ);
                }
                if !spec.values.is_empty() {
                    self.blank();
                    self.punct("=");
                    self.blank();
                    self.exprs(&spec.values);
                }
            }
            Spec::Type(spec) => {
                self.ident(&spec.name);
                self.blank();
                if let Some(assign) = spec.assign {
                    self.token(assign, "=");
                    self.blank();
                }
                self.expr(&spec.typ);
            }
        }
    }

    fn signature(&mut self, typ: &FuncType) {
        self.field_list(&typ.params, Fields::Params);
        if let Some(results) = &typ.results {
            self.blank();
            match results.opening {
                Some(_) => self.field_list(results, Fields::Params),
                None => {
                    for field in &results.list {
                        self.field(field, Fields::Params);
                    }
                }
            }
        }
    }

    fn field_list(&mut self, list: &FieldList, fields: Fields) {
        let (open, close) = match fields {
            Fields::Params => ("(", ")"),
            Fields::Struct | Fields::Interface => ("{", "}"),
        };
        if let Some(opening) = list.opening {
            self.token(opening, open);
        }
        self.indent();
        match fields {
            Fields::Params => {
                self.comma_separated(&list.list, |this, field| this.field(field, fields));
            }
            Fields::Struct | Fields::Interface => {
                for field in &list.list {
                    self.at_least(1);
                    self.field(field, fields);
                }
            }
        }
        match (list.closing, fields) {
            (Some(closing), Fields::Params) => {
                self.close_list(closing, close, !list.list.is_empty());
            }
            (Some(closing), _) => self.close(closing, close, u32::from(!list.list.is_empty())),
            (None, _) => self.depth = self.depth.saturating_sub(1),
        }
    }

    fn field(&mut self, field: &Field, fields: Fields) {
        self.comma_separated(&field.names, Self::ident);
        match (&field.typ, fields) {
            (Expr::FuncType(method), Fields::Interface) if !field.names.is_empty() => {
                self.signature(method);
            }
            (typ, _) => {
                if !field.names.is_empty() {
                    self.blank();
                }
                self.expr(typ);
            }
        }
        if let Some(tag) = &field.tag {
            self.blank();
            self.basic_lit(tag);
        }
    }

    fn block(&mut self, block: &BlockStmt) {
        self.token(block.lbrace, "{");
        self.indent();
        self.stmts(&block.list);
        self.close(block.rbrace, "}", u32::from(!block.list.is_empty()));
    }

    fn stmts(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.at_least(1);
            self.stmt(stmt);
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Decl(stmt) => self.gen_decl(&stmt.decl),
            Stmt::Labeled(stmt) => {
                self.ident(&stmt.label);
                self.token(stmt.colon, ":");
                if let Some(stmt) = &stmt.stmt {
                    self.blank();
                    self.stmt(stmt);
                }
            }
            Stmt::Expr(stmt) => self.expr(&stmt.x),
            Stmt::Send(stmt) => {
                self.expr(&stmt.chan);
                self.blank();
                self.token(stmt.arrow, "<-");
                self.blank();
                self.expr(&stmt.value);
            }
            Stmt::IncDec(stmt) => {
                self.expr(&stmt.x);
                self.token(stmt.tok_pos, stmt.tok.as_str());
            }
            Stmt::Assign(stmt) => {
                self.exprs(&stmt.lhs);
                self.blank();
                self.token(stmt.tok_pos, stmt.tok.as_str());
                self.blank();
                self.exprs(&stmt.rhs);
            }
            Stmt::Go(stmt) => {
                self.token(stmt.go_pos, "go");
                self.blank();
                self.call(&stmt.call);
            }
            Stmt::Defer(stmt) => {
                self.token(stmt.defer_pos, "defer");
                self.blank();
                self.call(&stmt.call);
            }
            Stmt::Return(stmt) => {
                self.token(stmt.return_pos, "return");
                if !stmt.results.is_empty() {
                    self.blank();
                    self.exprs(&stmt.results);
                }
            }
            Stmt::Branch(stmt) => {
                self.token(stmt.tok_pos, stmt.tok.as_str());
                if let Some(label) = &stmt.label {
                    self.blank();
                    self.ident(label);
                }
            }
            Stmt::Block(block) => self.block(block),
            Stmt::If(stmt) => self.if_stmt(stmt),
            Stmt::Switch(stmt) => {
                self.token(stmt.switch_pos, "switch");
                self.blank();
                self.init(stmt.init.as_deref());
                if let Some(tag) = &stmt.tag {
                    self.expr(tag);
                    self.blank();
                }
                self.case_block(&stmt.body);
            }
            Stmt::TypeSwitch(stmt) => {
                self.token(stmt.switch_pos, "switch");
                self.blank();
                self.init(stmt.init.as_deref());
                let guard = &stmt.assign;
                if let Some(lhs) = &guard.lhs {
                    self.ident(lhs);
                    self.blank();
                }
                if let Some(define) = guard.define {
                    self.token(define, ":=");
                    self.blank();
                }
                self.type_assert(&guard.x);
                self.blank();
                self.case_block(&stmt.body);
            }
            Stmt::Select(stmt) => {
                self.token(stmt.select_pos, "select");
                self.blank();
                self.token(stmt.lbrace, "{");
                for clause in &stmt.clauses {
                    self.at_least(1);
                    self.token(clause.case_pos, clause.keyword());
                    if let Some(comm) = &clause.comm {
                        self.blank();
                        self.stmt(comm);
                    }
                    self.token(clause.colon, ":");
                    self.indent();
                    self.stmts(&clause.body);
                    self.depth -= 1;
                }
                self.at_least(1);
                self.token(stmt.rbrace, "}");
            }
            Stmt::For(stmt) => {
                self.token(stmt.for_pos, "for");
                self.blank();
                if stmt.init.is_some() || stmt.post.is_some() {
                    if let Some(init) = &stmt.init {
                        self.stmt(init);
                    }
                    self.punct(";");
                    self.blank();
                    if let Some(cond) = &stmt.cond {
                        self.expr(cond);
                    }
                    self.punct(";");
                    self.blank();
                    if let Some(post) = &stmt.post {
                        self.stmt(post);
                        self.blank();
                    }
                } else if let Some(cond) = &stmt.cond {
                    self.expr(cond);
                    self.blank();
                }
                self.block(&stmt.body);
            }
            Stmt::Range(stmt) => {
                self.token(stmt.for_pos, "for");
                self.blank();
                if let Some(key) = &stmt.key {
                    self.expr(key);
                    if let Some(value) = &stmt.value {
                        self.punct(",");
                        self.blank();
                        self.expr(value);
                    }
                    self.blank();
                }
                if let Some(tok_pos) = stmt.tok_pos {
                    self.token(tok_pos, stmt.tok.as_str());
                    self.blank();
                }
                self.token(stmt.range_pos, "range");
                self.blank();
                self.expr(&stmt.x);
                self.blank();
                self.block(&stmt.body);
            }
        }
    }

    fn init(&mut self, init: Option<&Stmt>) {
        if let Some(init) = init {
            self.stmt(init);
            self.punct(";");
            self.blank();
        }
    }

    fn if_stmt(&mut self, stmt: &IfStmt) {
        self.token(stmt.if_pos, "if");
        self.blank();
        self.init(stmt.init.as_deref());
        self.expr(&stmt.cond);
        self.blank();
        self.block(&stmt.body);
        if let Some(else_) = &stmt.else_ {
            self.blank();
            self.punct("else");
            self.blank();
            match else_ {
                Else::If(stmt) => self.if_stmt(stmt),
                Else::Block(block) => self.block(block),
            }
        }
    }

    /// Case clauses line up with the `switch` keyword.
    fn case_block(&mut self, body: &CaseBlock) {
        self.token(body.lbrace, "{");
        for clause in &body.clauses {
            self.at_least(1);
            self.token(clause.case_pos, clause.keyword());
            if !clause.list.is_empty() {
                self.blank();
                self.exprs(&clause.list);
            }
            self.token(clause.colon, ":");
            self.indent();
            self.stmts(&clause.body);
            self.depth -= 1;
        }
        self.at_least(1);
        self.token(body.rbrace, "}");
    }

    fn exprs(&mut self, exprs: &[Expr]) {
        self.comma_separated(exprs, Self::expr);
    }

    fn ident(&mut self, ident: &Ident) {
        self.token(ident.pos, &ident.name);
    }

    fn basic_lit(&mut self, lit: &BasicLit) {
        self.token(lit.pos, &lit.value);
    }

    fn call(&mut self, call: &CallExpr) {
        self.expr(&call.fun);
        self.token(call.lparen, "(");
        self.indent();
        self.exprs(&call.args);
        if let Some(ellipsis) = call.ellipsis {
            self.token(ellipsis, "...");
        }
        self.close_list(call.rparen, ")", !call.args.is_empty());
    }

    fn type_assert(&mut self, expr: &TypeAssertExpr) {
        self.expr(&expr.x);
        self.punct(".");
        self.token(expr.lparen, "(");
        match &expr.typ {
            Some(typ) => self.expr(typ),
            None => self.punct("type"),
        }
        self.token(expr.rparen, ")");
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(ident) => self.ident(ident),
            Expr::BasicLit(lit) => self.basic_lit(lit),
            Expr::CompositeLit(lit) => {
                if let Some(typ) = &lit.typ {
                    self.expr(typ);
                }
                self.token(lit.lbrace, "{");
                self.indent();
                self.comma_separated(&lit.elts, |this, elt| match elt {
                    Element::Expr(expr) => this.expr(expr),
                    Element::KeyValue(kv) => this.key_value(kv),
                });
                self.close_list(lit.rbrace, "}", !lit.elts.is_empty());
            }
            Expr::FuncLit(lit) => {
                self.func_type(&lit.typ);
                self.blank();
                self.block(&lit.body);
            }
            Expr::Paren(paren) => {
                self.token(paren.lparen, "(");
                self.expr(&paren.x);
                self.token(paren.rparen, ")");
            }
            Expr::Selector(sel) => {
                self.expr(&sel.x);
                self.punct(".");
                self.ident(&sel.sel);
            }
            Expr::Index(index) => {
                self.expr(&index.x);
                self.token(index.lbrack, "[");
                self.expr(&index.index);
                self.token(index.rbrack, "]");
            }
            Expr::Slice(slice) => {
                self.expr(&slice.x);
                self.token(slice.lbrack, "[");
                if let Some(low) = &slice.low {
                    self.expr(low);
                }
                self.punct(":");
                if let Some(high) = &slice.high {
                    self.expr(high);
                }
                if slice.slice3 {
                    self.punct(":");
                    if let Some(max) = &slice.max {
                        self.expr(max);
                    }
                }
                self.token(slice.rbrack, "]");
            }
            Expr::TypeAssert(expr) => self.type_assert(expr),
            Expr::Call(call) => self.call(call),
            Expr::Star(star) => {
                self.token(star.star, "*");
                self.expr(&star.x);
            }
            Expr::Unary(unary) => {
                self.token(unary.op_pos, unary.op.as_str());
                self.expr(&unary.x);
            }
            Expr::Binary(binary) => {
                self.expr(&binary.x);
                self.blank();
                self.token(binary.op_pos, binary.op.as_str());
                self.blank();
                self.expr(&binary.y);
            }
            Expr::ArrayType(array) => {
                self.token(array.lbrack, "[");
                if let Some(len) = &array.len {
                    self.expr(len);
                }
                self.punct("]");
                self.expr(&array.elt);
            }
            Expr::StructType(typ) => {
                self.token(typ.struct_pos, "struct");
                if !typ.fields.list.is_empty() {
                    self.blank();
                }
                self.field_list(&typ.fields, Fields::Struct);
            }
            Expr::FuncType(typ) => self.func_type(typ),
            Expr::InterfaceType(typ) => {
                self.token(typ.interface_pos, "interface");
                if !typ.methods.list.is_empty() {
                    self.blank();
                }
                self.field_list(&typ.methods, Fields::Interface);
            }
            Expr::MapType(map) => {
                self.token(map.map_pos, "map");
                self.punct("[");
                self.expr(&map.key);
                self.punct("]");
                self.expr(&map.value);
            }
            Expr::ChanType(chan) => {
                match (chan.arrow, chan.dir) {
                    (Some(arrow), ChanDir::Recv) => {
                        self.token(arrow, "<-");
                        self.token(chan.chan_pos, "chan");
                    }
                    (Some(arrow), _) => {
                        self.token(chan.chan_pos, "chan");
                        self.token(arrow, "<-");
                    }
                    (None, _) => self.token(chan.chan_pos, "chan"),
                }
                self.blank();
                self.expr(&chan.value);
            }
            Expr::Ellipsis(ellipsis) => {
                self.token(ellipsis.pos, "...");
                if let Some(elt) = &ellipsis.elt {
                    self.expr(elt);
                }
            }
        }
    }

    fn func_type(&mut self, typ: &FuncType) {
        if let Some(func) = typ.func {
            self.token(func, "func");
        }
        self.signature(typ);
    }

    fn key_value(&mut self, kv: &KeyValueExpr) {
        self.expr(&kv.key);
        self.token(kv.colon, ":");
        self.blank();
        self.expr(&kv.value);
    }
}

#[cfg(test)]
mod tests {
    use decor_span::LineTable;
    use expect_test::{Expect, expect};
    use text_size::TextSize;

    use super::{Indent, PrintConfig, render};
    use crate::ast::*;
    use crate::comments::{Comment, CommentGroup};

    struct Builder {
        pos: u32,
        lines: LineTable,
    }

    impl Builder {
        fn new() -> Self {
            Self { pos: 0, lines: LineTable::new() }
        }

        fn at(&mut self, text: &str) -> TextSize {
            let pos = TextSize::from(self.pos);
            self.pos += text.len() as u32 + 1;
            pos
        }

        fn newline(&mut self) {
            self.lines.add_line(TextSize::from(self.pos));
            self.pos += 1;
        }

        fn ident(&mut self, name: &str) -> Ident {
            Ident { pos: self.at(name), name: name.to_owned() }
        }
    }

    fn check(file: &File, lines: &LineTable, comments: &[CommentGroup], config: &PrintConfig, expect: Expect) {
        expect.assert_eq(&render(file, lines, comments, config));
    }

    fn call_stmt(b: &mut Builder, name: &str) -> Stmt {
        let fun = Expr::Ident(b.ident(name));
        let lparen = b.at("(");
        let rparen = b.at(")");
        Stmt::Expr(ExprStmt {
            x: Expr::Call(CallExpr { fun: Box::new(fun), lparen, args: Vec::new(), ellipsis: None, rparen }),
        })
    }

    #[test]
    fn positions_on_one_line_get_conventional_layout() {
        let mut b = Builder::new();
        let func_pos = b.at("func");
        let name = b.ident("main");
        let params = FieldList { opening: Some(b.at("(")), list: Vec::new(), closing: Some(b.at(")")) };
        let lbrace = b.at("{");
        let first = call_stmt(&mut b, "a");
        let second = call_stmt(&mut b, "b");
        let rbrace = b.at("}");
        let file = File {
            package: None,
            decls: vec![Decl::Func(FuncDecl {
                func_pos,
                recv: None,
                name,
                typ: FuncType { func: None, params, results: None },
                body: Some(BlockStmt { lbrace, list: vec![first, second], rbrace }),
            })],
            eof: TextSize::from(b.pos),
        };

        check(
            &file,
            &b.lines,
            &[],
            &PrintConfig::default(),
            expect![[r#"
                func main() {
                	a()
                	b()
                }
            "#]],
        );
        check(
            &file,
            &b.lines,
            &[],
            &PrintConfig { indent: Indent::Spaces(2) },
            expect![[r#"
                func main() {
                  a()
                  b()
                }
            "#]],
        );
    }

    #[test]
    fn comments_and_blank_lines_follow_positions() {
        let mut b = Builder::new();
        let package_pos = b.at("package");
        let package = PackageClause { package_pos, name: b.ident("demo") };
        b.newline();
        b.newline();
        let lead = Comment { pos: b.at("// lead"), text: "// lead".to_owned() };
        b.newline();
        let tok_pos = b.at("var");
        let name = b.ident("x");
        let value = BasicLit { pos: b.at("1"), kind: LitKind::Int, value: "1".to_owned() };
        let trailing = Comment { pos: b.at("/* one */"), text: "/* one */".to_owned() };
        let file = File {
            package: Some(package),
            decls: vec![Decl::Gen(GenDecl {
                tok_pos,
                tok: DeclKeyword::Var,
                lparen: None,
                specs: vec![Spec::Value(ValueSpec {
                    names: vec![name],
                    typ: None,
                    values: vec![Expr::BasicLit(value)],
                })],
                rparen: None,
            })],
            eof: TextSize::from(b.pos),
        };
        let comments = [
            CommentGroup { comments: vec![lead] },
            CommentGroup { comments: vec![trailing] },
        ];

        check(
            &file,
            &b.lines,
            &comments,
            &PrintConfig::default(),
            expect![[r#"
                package demo

                // lead
                var x = 1 /* one */
            "#]],
        );
    }
}
