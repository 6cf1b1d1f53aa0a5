use std::fmt;

use text_size::TextRange;

use crate::ast::{self, AstNode, token};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Ident,
    BasicLit,
    CompositeLit,
    KeyValueExpr,
    FuncLit,
    ParenExpr,
    SelectorExpr,
    IndexExpr,
    SliceExpr,
    TypeAssertExpr,
    CallExpr,
    StarExpr,
    UnaryExpr,
    BinaryExpr,
    ArrayType,
    StructType,
    FuncType,
    InterfaceType,
    MapType,
    ChanType,
    Ellipsis,
    Field,
    FieldList,
    DeclStmt,
    LabeledStmt,
    ExprStmt,
    SendStmt,
    IncDecStmt,
    AssignStmt,
    GoStmt,
    DeferStmt,
    ReturnStmt,
    BranchStmt,
    BlockStmt,
    IfStmt,
    CaseClause,
    CaseBlock,
    SwitchStmt,
    TypeSwitchGuard,
    TypeSwitchStmt,
    CommClause,
    SelectStmt,
    ForStmt,
    RangeStmt,
    ImportSpec,
    ValueSpec,
    TypeSpec,
    GenDecl,
    FuncDecl,
    File,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Identity of a node within one tree.
///
/// Nodes sharing a range always differ in kind, e.g. an `ExprStmt` and the
/// expression it wraps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeKey {
    pub kind: NodeKind,
    pub range: TextRange,
}

impl NodeKey {
    pub fn of<N: AstNode>(node: &N) -> Self {
        Self { kind: N::KIND, range: node.range() }
    }
}

/// A borrowed node of any kind.
#[derive(Clone, Copy, Debug)]
pub enum NodeRef<'a> {
    Ident(&'a ast::Ident),
    BasicLit(&'a ast::BasicLit),
    CompositeLit(&'a ast::CompositeLit),
    KeyValueExpr(&'a ast::KeyValueExpr),
    FuncLit(&'a ast::FuncLit),
    ParenExpr(&'a ast::ParenExpr),
    SelectorExpr(&'a ast::SelectorExpr),
    IndexExpr(&'a ast::IndexExpr),
    SliceExpr(&'a ast::SliceExpr),
    TypeAssertExpr(&'a ast::TypeAssertExpr),
    CallExpr(&'a ast::CallExpr),
    StarExpr(&'a ast::StarExpr),
    UnaryExpr(&'a ast::UnaryExpr),
    BinaryExpr(&'a ast::BinaryExpr),
    ArrayType(&'a ast::ArrayType),
    StructType(&'a ast::StructType),
    FuncType(&'a ast::FuncType),
    InterfaceType(&'a ast::InterfaceType),
    MapType(&'a ast::MapType),
    ChanType(&'a ast::ChanType),
    Ellipsis(&'a ast::Ellipsis),
    Field(&'a ast::Field),
    FieldList(&'a ast::FieldList),
    DeclStmt(&'a ast::DeclStmt),
    LabeledStmt(&'a ast::LabeledStmt),
    ExprStmt(&'a ast::ExprStmt),
    SendStmt(&'a ast::SendStmt),
    IncDecStmt(&'a ast::IncDecStmt),
    AssignStmt(&'a ast::AssignStmt),
    GoStmt(&'a ast::GoStmt),
    DeferStmt(&'a ast::DeferStmt),
    ReturnStmt(&'a ast::ReturnStmt),
    BranchStmt(&'a ast::BranchStmt),
    BlockStmt(&'a ast::BlockStmt),
    IfStmt(&'a ast::IfStmt),
    CaseClause(&'a ast::CaseClause),
    CaseBlock(&'a ast::CaseBlock),
    SwitchStmt(&'a ast::SwitchStmt),
    TypeSwitchGuard(&'a ast::TypeSwitchGuard),
    TypeSwitchStmt(&'a ast::TypeSwitchStmt),
    CommClause(&'a ast::CommClause),
    SelectStmt(&'a ast::SelectStmt),
    ForStmt(&'a ast::ForStmt),
    RangeStmt(&'a ast::RangeStmt),
    ImportSpec(&'a ast::ImportSpec),
    ValueSpec(&'a ast::ValueSpec),
    TypeSpec(&'a ast::TypeSpec),
    GenDecl(&'a ast::GenDecl),
    FuncDecl(&'a ast::FuncDecl),
    File(&'a ast::File),
}

/// A child of a node in source order.
#[derive(Clone, Copy, Debug)]
pub enum Item<'a> {
    Node(NodeRef<'a>),
    /// A token the node owns and records the offset of.
    Token(TextRange),
    /// The token closing a delimited node.
    Closing(TextRange),
}

impl Item<'_> {
    pub fn range(&self) -> TextRange {
        match self {
            Item::Node(node) => node.range(),
            Item::Token(range) | Item::Closing(range) => *range,
        }
    }
}

macro_rules! dispatch {
    ($node:expr, $it:ident => $body:expr) => {
        match $node {
            NodeRef::Ident($it) => $body,
            NodeRef::BasicLit($it) => $body,
            NodeRef::CompositeLit($it) => $body,
            NodeRef::KeyValueExpr($it) => $body,
            NodeRef::FuncLit($it) => $body,
            NodeRef::ParenExpr($it) => $body,
            NodeRef::SelectorExpr($it) => $body,
            NodeRef::IndexExpr($it) => $body,
            NodeRef::SliceExpr($it) => $body,
            NodeRef::TypeAssertExpr($it) => $body,
            NodeRef::CallExpr($it) => $body,
            NodeRef::StarExpr($it) => $body,
            NodeRef::UnaryExpr($it) => $body,
            NodeRef::BinaryExpr($it) => $body,
            NodeRef::ArrayType($it) => $body,
            NodeRef::StructType($it) => $body,
            NodeRef::FuncType($it) => $body,
            NodeRef::InterfaceType($it) => $body,
            NodeRef::MapType($it) => $body,
            NodeRef::ChanType($it) => $body,
            NodeRef::Ellipsis($it) => $body,
            NodeRef::Field($it) => $body,
            NodeRef::FieldList($it) => $body,
            NodeRef::DeclStmt($it) => $body,
            NodeRef::LabeledStmt($it) => $body,
            NodeRef::ExprStmt($it) => $body,
            NodeRef::SendStmt($it) => $body,
            NodeRef::IncDecStmt($it) => $body,
            NodeRef::AssignStmt($it) => $body,
            NodeRef::GoStmt($it) => $body,
            NodeRef::DeferStmt($it) => $body,
            NodeRef::ReturnStmt($it) => $body,
            NodeRef::BranchStmt($it) => $body,
            NodeRef::BlockStmt($it) => $body,
            NodeRef::IfStmt($it) => $body,
            NodeRef::CaseClause($it) => $body,
            NodeRef::CaseBlock($it) => $body,
            NodeRef::SwitchStmt($it) => $body,
            NodeRef::TypeSwitchGuard($it) => $body,
            NodeRef::TypeSwitchStmt($it) => $body,
            NodeRef::CommClause($it) => $body,
            NodeRef::SelectStmt($it) => $body,
            NodeRef::ForStmt($it) => $body,
            NodeRef::RangeStmt($it) => $body,
            NodeRef::ImportSpec($it) => $body,
            NodeRef::ValueSpec($it) => $body,
            NodeRef::TypeSpec($it) => $body,
            NodeRef::GenDecl($it) => $body,
            NodeRef::FuncDecl($it) => $body,
            NodeRef::File($it) => $body,
        }
    };
}

impl<'a> NodeRef<'a> {
    pub fn key(self) -> NodeKey {
        dispatch!(self, it => NodeKey::of(it))
    }

    pub fn kind(self) -> NodeKind {
        self.key().kind
    }

    pub fn range(self) -> TextRange {
        dispatch!(self, it => it.range())
    }

    /// Child nodes and positioned tokens in source order.
    pub fn items(self) -> Vec<Item<'a>> {
        let mut items = Items::default();
        match self {
            NodeRef::Ident(_) | NodeRef::BasicLit(_) => {}
            NodeRef::CompositeLit(it) => {
                items.node_opt(it.typ.as_deref().map(NodeRef::from));
                items.token(it.lbrace, "{");
                for elt in &it.elts {
                    items.node(elt.into());
                }
                items.closing(it.rbrace, "}");
            }
            NodeRef::KeyValueExpr(it) => {
                items.node((&it.key).into());
                items.token(it.colon, ":");
                items.node((&it.value).into());
            }
            NodeRef::FuncLit(it) => {
                items.node((&it.typ).into());
                items.node((&it.body).into());
            }
            NodeRef::ParenExpr(it) => {
                items.token(it.lparen, "(");
                items.node((&*it.x).into());
                items.closing(it.rparen, ")");
            }
            NodeRef::SelectorExpr(it) => {
                items.node((&*it.x).into());
                items.node((&it.sel).into());
            }
            NodeRef::IndexExpr(it) => {
                items.node((&*it.x).into());
                items.token(it.lbrack, "[");
                items.node((&*it.index).into());
                items.closing(it.rbrack, "]");
            }
            NodeRef::SliceExpr(it) => {
                items.node((&*it.x).into());
                items.token(it.lbrack, "[");
                for bound in [&it.low, &it.high, &it.max] {
                    items.node_opt(bound.as_deref().map(NodeRef::from));
                }
                items.closing(it.rbrack, "]");
            }
            NodeRef::TypeAssertExpr(it) => {
                items.node((&*it.x).into());
                items.token(it.lparen, "(");
                items.node_opt(it.typ.as_deref().map(NodeRef::from));
                items.closing(it.rparen, ")");
            }
            NodeRef::CallExpr(it) => {
                items.node((&*it.fun).into());
                items.token(it.lparen, "(");
                for arg in &it.args {
                    items.node(arg.into());
                }
                if let Some(ellipsis) = it.ellipsis {
                    items.token(ellipsis, "...");
                }
                items.closing(it.rparen, ")");
            }
            NodeRef::StarExpr(it) => {
                items.token(it.star, "*");
                items.node((&*it.x).into());
            }
            NodeRef::UnaryExpr(it) => {
                items.token(it.op_pos, it.op.as_str());
                items.node((&*it.x).into());
            }
            NodeRef::BinaryExpr(it) => {
                items.node((&*it.x).into());
                items.token(it.op_pos, it.op.as_str());
                items.node((&*it.y).into());
            }
            NodeRef::ArrayType(it) => {
                items.token(it.lbrack, "[");
                items.node_opt(it.len.as_deref().map(NodeRef::from));
                items.node((&*it.elt).into());
            }
            NodeRef::StructType(it) => {
                items.token(it.struct_pos, "struct");
                items.node((&it.fields).into());
            }
            NodeRef::FuncType(it) => {
                if let Some(func) = it.func {
                    items.token(func, "func");
                }
                items.node((&it.params).into());
                items.node_opt(it.results.as_ref().map(NodeRef::from));
            }
            NodeRef::InterfaceType(it) => {
                items.token(it.interface_pos, "interface");
                items.node((&it.methods).into());
            }
            NodeRef::MapType(it) => {
                items.token(it.map_pos, "map");
                items.node((&*it.key).into());
                items.node((&*it.value).into());
            }
            NodeRef::ChanType(it) => {
                match it.arrow {
                    Some(arrow) if arrow < it.chan_pos => {
                        items.token(arrow, "<-");
                        items.token(it.chan_pos, "chan");
                    }
                    Some(arrow) => {
                        items.token(it.chan_pos, "chan");
                        items.token(arrow, "<-");
                    }
                    None => items.token(it.chan_pos, "chan"),
                }
                items.node((&*it.value).into());
            }
            NodeRef::Ellipsis(it) => {
                items.token(it.pos, "...");
                items.node_opt(it.elt.as_deref().map(NodeRef::from));
            }
            NodeRef::Field(it) => {
                for name in &it.names {
                    items.node(name.into());
                }
                items.node((&it.typ).into());
                items.node_opt(it.tag.as_ref().map(NodeRef::from));
            }
            NodeRef::FieldList(it) => {
                if let Some(opening) = it.opening {
                    items.token(opening, "(");
                }
                for field in &it.list {
                    items.node(field.into());
                }
                if let Some(closing) = it.closing {
                    items.closing(closing, ")");
                }
            }
            NodeRef::DeclStmt(it) => items.node((&it.decl).into()),
            NodeRef::LabeledStmt(it) => {
                items.node((&it.label).into());
                items.token(it.colon, ":");
                if let Some(stmt) = &it.stmt {
                    items.node((&**stmt).into());
                }
            }
            NodeRef::ExprStmt(it) => items.node((&it.x).into()),
            NodeRef::SendStmt(it) => {
                items.node((&it.chan).into());
                items.token(it.arrow, "<-");
                items.node((&it.value).into());
            }
            NodeRef::IncDecStmt(it) => {
                items.node((&it.x).into());
                items.token(it.tok_pos, it.tok.as_str());
            }
            NodeRef::AssignStmt(it) => {
                for lhs in &it.lhs {
                    items.node(lhs.into());
                }
                items.token(it.tok_pos, it.tok.as_str());
                for rhs in &it.rhs {
                    items.node(rhs.into());
                }
            }
            NodeRef::GoStmt(it) => {
                items.token(it.go_pos, "go");
                items.node((&it.call).into());
            }
            NodeRef::DeferStmt(it) => {
                items.token(it.defer_pos, "defer");
                items.node((&it.call).into());
            }
            NodeRef::ReturnStmt(it) => {
                items.token(it.return_pos, "return");
                for result in &it.results {
                    items.node(result.into());
                }
            }
            NodeRef::BranchStmt(it) => {
                items.token(it.tok_pos, it.tok.as_str());
                items.node_opt(it.label.as_ref().map(NodeRef::from));
            }
            NodeRef::BlockStmt(it) => {
                items.token(it.lbrace, "{");
                for stmt in &it.list {
                    items.node(stmt.into());
                }
                items.closing(it.rbrace, "}");
            }
            NodeRef::IfStmt(it) => {
                items.token(it.if_pos, "if");
                items.node_opt(it.init.as_deref().map(NodeRef::from));
                items.node((&it.cond).into());
                items.node((&it.body).into());
                items.node_opt(it.else_.as_ref().map(NodeRef::from));
            }
            NodeRef::CaseClause(it) => {
                items.token(it.case_pos, it.keyword());
                for expr in &it.list {
                    items.node(expr.into());
                }
                items.token(it.colon, ":");
                for stmt in &it.body {
                    items.node(stmt.into());
                }
            }
            NodeRef::CaseBlock(it) => {
                items.token(it.lbrace, "{");
                for clause in &it.clauses {
                    items.node(clause.into());
                }
                items.closing(it.rbrace, "}");
            }
            NodeRef::SwitchStmt(it) => {
                items.token(it.switch_pos, "switch");
                items.node_opt(it.init.as_deref().map(NodeRef::from));
                items.node_opt(it.tag.as_ref().map(NodeRef::from));
                items.node((&it.body).into());
            }
            NodeRef::TypeSwitchGuard(it) => {
                items.node_opt(it.lhs.as_ref().map(NodeRef::from));
                if let Some(define) = it.define {
                    items.token(define, ":=");
                }
                items.node((&it.x).into());
            }
            NodeRef::TypeSwitchStmt(it) => {
                items.token(it.switch_pos, "switch");
                items.node_opt(it.init.as_deref().map(NodeRef::from));
                items.node((&it.assign).into());
                items.node((&it.body).into());
            }
            NodeRef::CommClause(it) => {
                items.token(it.case_pos, it.keyword());
                items.node_opt(it.comm.as_deref().map(NodeRef::from));
                items.token(it.colon, ":");
                for stmt in &it.body {
                    items.node(stmt.into());
                }
            }
            NodeRef::SelectStmt(it) => {
                items.token(it.select_pos, "select");
                items.token(it.lbrace, "{");
                for clause in &it.clauses {
                    items.node(clause.into());
                }
                items.closing(it.rbrace, "}");
            }
            NodeRef::ForStmt(it) => {
                items.token(it.for_pos, "for");
                items.node_opt(it.init.as_deref().map(NodeRef::from));
                items.node_opt(it.cond.as_ref().map(NodeRef::from));
                items.node_opt(it.post.as_deref().map(NodeRef::from));
                items.node((&it.body).into());
            }
            NodeRef::RangeStmt(it) => {
                items.token(it.for_pos, "for");
                items.node_opt(it.key.as_ref().map(NodeRef::from));
                items.node_opt(it.value.as_ref().map(NodeRef::from));
                if let Some(tok_pos) = it.tok_pos {
                    items.token(tok_pos, it.tok.as_str());
                }
                items.token(it.range_pos, "range");
                items.node((&it.x).into());
                items.node((&it.body).into());
            }
            NodeRef::ImportSpec(it) => {
                items.node_opt(it.name.as_ref().map(NodeRef::from));
                items.node((&it.path).into());
            }
            NodeRef::ValueSpec(it) => {
                for name in &it.names {
                    items.node(name.into());
                }
                items.node_opt(it.typ.as_ref().map(NodeRef::from));
                for value in &it.values {
                    items.node(value.into());
                }
            }
            NodeRef::TypeSpec(it) => {
                items.node((&it.name).into());
                if let Some(assign) = it.assign {
                    items.token(assign, "=");
                }
                items.node((&it.typ).into());
            }
            NodeRef::GenDecl(it) => {
                items.token(it.tok_pos, it.tok.as_str());
                if let Some(lparen) = it.lparen {
                    items.token(lparen, "(");
                }
                for spec in &it.specs {
                    items.node(spec.into());
                }
                if let Some(rparen) = it.rparen {
                    items.closing(rparen, ")");
                }
            }
            NodeRef::FuncDecl(it) => {
                items.token(it.func_pos, "func");
                items.node_opt(it.recv.as_ref().map(NodeRef::from));
                items.node((&it.name).into());
                items.node((&it.typ).into());
                items.node_opt(it.body.as_ref().map(NodeRef::from));
            }
            NodeRef::File(it) => {
                if let Some(package) = &it.package {
                    items.token(package.package_pos, "package");
                    items.node((&package.name).into());
                }
                for decl in &it.decls {
                    items.node(decl.into());
                }
                items.closing(it.eof, "");
            }
        }
        items.0
    }
}

#[derive(Default)]
struct Items<'a>(Vec<Item<'a>>);

impl<'a> Items<'a> {
    fn node(&mut self, node: NodeRef<'a>) {
        self.0.push(Item::Node(node));
    }

    fn node_opt(&mut self, node: Option<NodeRef<'a>>) {
        if let Some(node) = node {
            self.node(node);
        }
    }

    fn token(&mut self, pos: text_size::TextSize, text: &str) {
        self.0.push(Item::Token(token(pos, text)));
    }

    fn closing(&mut self, pos: text_size::TextSize, text: &str) {
        self.0.push(Item::Closing(token(pos, text)));
    }
}

macro_rules! node_ref_from {
    ($($variant:ident => $ty:ident),* $(,)?) => {
        $(impl<'a> From<&'a ast::$ty> for NodeRef<'a> {
            fn from(node: &'a ast::$ty) -> Self {
                NodeRef::$variant(node)
            }
        })*
    };
}

node_ref_from! {
    Ident => Ident,
    BasicLit => BasicLit,
    CompositeLit => CompositeLit,
    KeyValueExpr => KeyValueExpr,
    FuncLit => FuncLit,
    ParenExpr => ParenExpr,
    SelectorExpr => SelectorExpr,
    IndexExpr => IndexExpr,
    SliceExpr => SliceExpr,
    TypeAssertExpr => TypeAssertExpr,
    CallExpr => CallExpr,
    StarExpr => StarExpr,
    UnaryExpr => UnaryExpr,
    BinaryExpr => BinaryExpr,
    ArrayType => ArrayType,
    StructType => StructType,
    FuncType => FuncType,
    InterfaceType => InterfaceType,
    MapType => MapType,
    ChanType => ChanType,
    Ellipsis => Ellipsis,
    Field => Field,
    FieldList => FieldList,
    DeclStmt => DeclStmt,
    LabeledStmt => LabeledStmt,
    ExprStmt => ExprStmt,
    SendStmt => SendStmt,
    IncDecStmt => IncDecStmt,
    AssignStmt => AssignStmt,
    GoStmt => GoStmt,
    DeferStmt => DeferStmt,
    ReturnStmt => ReturnStmt,
    BranchStmt => BranchStmt,
    BlockStmt => BlockStmt,
    IfStmt => IfStmt,
    CaseClause => CaseClause,
    CaseBlock => CaseBlock,
    SwitchStmt => SwitchStmt,
    TypeSwitchGuard => TypeSwitchGuard,
    TypeSwitchStmt => TypeSwitchStmt,
    CommClause => CommClause,
    SelectStmt => SelectStmt,
    ForStmt => ForStmt,
    RangeStmt => RangeStmt,
    ImportSpec => ImportSpec,
    ValueSpec => ValueSpec,
    TypeSpec => TypeSpec,
    GenDecl => GenDecl,
    FuncDecl => FuncDecl,
    File => File,
}

impl<'a> From<&'a ast::Expr> for NodeRef<'a> {
    fn from(expr: &'a ast::Expr) -> Self {
        match expr {
            ast::Expr::Ident(it) => it.into(),
            ast::Expr::BasicLit(it) => it.into(),
            ast::Expr::CompositeLit(it) => it.into(),
            ast::Expr::FuncLit(it) => it.into(),
            ast::Expr::Paren(it) => it.into(),
            ast::Expr::Selector(it) => it.into(),
            ast::Expr::Index(it) => it.into(),
            ast::Expr::Slice(it) => it.into(),
            ast::Expr::TypeAssert(it) => it.into(),
            ast::Expr::Call(it) => it.into(),
            ast::Expr::Star(it) => it.into(),
            ast::Expr::Unary(it) => it.into(),
            ast::Expr::Binary(it) => it.into(),
            ast::Expr::ArrayType(it) => it.into(),
            ast::Expr::StructType(it) => it.into(),
            ast::Expr::FuncType(it) => it.into(),
            ast::Expr::InterfaceType(it) => it.into(),
            ast::Expr::MapType(it) => it.into(),
            ast::Expr::ChanType(it) => it.into(),
            ast::Expr::Ellipsis(it) => it.into(),
        }
    }
}

impl<'a> From<&'a ast::Element> for NodeRef<'a> {
    fn from(element: &'a ast::Element) -> Self {
        match element {
            ast::Element::Expr(expr) => expr.into(),
            ast::Element::KeyValue(kv) => kv.into(),
        }
    }
}

impl<'a> From<&'a ast::Stmt> for NodeRef<'a> {
    fn from(stmt: &'a ast::Stmt) -> Self {
        match stmt {
            ast::Stmt::Decl(it) => it.into(),
            ast::Stmt::Labeled(it) => it.into(),
            ast::Stmt::Expr(it) => it.into(),
            ast::Stmt::Send(it) => it.into(),
            ast::Stmt::IncDec(it) => it.into(),
            ast::Stmt::Assign(it) => it.into(),
            ast::Stmt::Go(it) => it.into(),
            ast::Stmt::Defer(it) => it.into(),
            ast::Stmt::Return(it) => it.into(),
            ast::Stmt::Branch(it) => it.into(),
            ast::Stmt::Block(it) => it.into(),
            ast::Stmt::If(it) => it.into(),
            ast::Stmt::Switch(it) => it.into(),
            ast::Stmt::TypeSwitch(it) => it.into(),
            ast::Stmt::Select(it) => it.into(),
            ast::Stmt::For(it) => it.into(),
            ast::Stmt::Range(it) => it.into(),
        }
    }
}

impl<'a> From<&'a ast::Else> for NodeRef<'a> {
    fn from(else_: &'a ast::Else) -> Self {
        match else_ {
            ast::Else::If(stmt) => (&**stmt).into(),
            ast::Else::Block(block) => block.into(),
        }
    }
}

impl<'a> From<&'a ast::Spec> for NodeRef<'a> {
    fn from(spec: &'a ast::Spec) -> Self {
        match spec {
            ast::Spec::Import(it) => it.into(),
            ast::Spec::Value(it) => it.into(),
            ast::Spec::Type(it) => it.into(),
        }
    }
}

impl<'a> From<&'a ast::Decl> for NodeRef<'a> {
    fn from(decl: &'a ast::Decl) -> Self {
        match decl {
            ast::Decl::Gen(it) => it.into(),
            ast::Decl::Func(it) => it.into(),
        }
    }
}
