//! Position-free syntax tree.
//!
//! Every node carries a [`Markup`]; containers that end with a delimiter the
//! source positions (`}` `)` `]`, end of file) also carry `closing` trivia,
//! printed right before that delimiter. Operators, literal kinds and
//! declaration keywords are shared with the native tree.

pub use decor_syntax::ast::{
    AssignOp, BinaryOp, BranchKind, DeclKeyword, IncDec, LitKind, UnaryOp,
};

use crate::markup::{Markup, Trivia};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub markup: Markup,
}

impl Ident {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), markup: Markup::default() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BasicLit {
    pub kind: LitKind,
    /// Source text, quotes included.
    pub value: String,
    pub markup: Markup,
}

impl BasicLit {
    pub fn new(kind: LitKind, value: impl Into<String>) -> Self {
        Self { kind, value: value.into(), markup: Markup::default() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    Ident(Ident),
    BasicLit(BasicLit),
    CompositeLit(CompositeLit),
    /// Only valid as an element of a composite literal.
    KeyValue(KeyValueExpr),
    FuncLit(FuncLit),
    Paren(ParenExpr),
    Selector(SelectorExpr),
    Index(IndexExpr),
    Slice(SliceExpr),
    TypeAssert(TypeAssertExpr),
    Call(CallExpr),
    Star(StarExpr),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    ArrayType(ArrayType),
    StructType(StructType),
    FuncType(FuncType),
    InterfaceType(InterfaceType),
    MapType(MapType),
    Ellipsis(Ellipsis),
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Self::Ident(Ident::new(name))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Ident(_) => "Ident",
            Self::BasicLit(_) => "BasicLit",
            Self::CompositeLit(_) => "CompositeLit",
            Self::KeyValue(_) => "KeyValueExpr",
            Self::FuncLit(_) => "FuncLit",
            Self::Paren(_) => "ParenExpr",
            Self::Selector(_) => "SelectorExpr",
            Self::Index(_) => "IndexExpr",
            Self::Slice(_) => "SliceExpr",
            Self::TypeAssert(_) => "TypeAssertExpr",
            Self::Call(_) => "CallExpr",
            Self::Star(_) => "StarExpr",
            Self::Unary(_) => "UnaryExpr",
            Self::Binary(_) => "BinaryExpr",
            Self::ArrayType(_) => "ArrayType",
            Self::StructType(_) => "StructType",
            Self::FuncType(_) => "FuncType",
            Self::InterfaceType(_) => "InterfaceType",
            Self::MapType(_) => "MapType",
            Self::Ellipsis(_) => "Ellipsis",
        }
    }

    pub fn markup(&self) -> &Markup {
        match self {
            Self::Ident(it) => &it.markup,
            Self::BasicLit(it) => &it.markup,
            Self::CompositeLit(it) => &it.markup,
            Self::KeyValue(it) => &it.markup,
            Self::FuncLit(it) => &it.markup,
            Self::Paren(it) => &it.markup,
            Self::Selector(it) => &it.markup,
            Self::Index(it) => &it.markup,
            Self::Slice(it) => &it.markup,
            Self::TypeAssert(it) => &it.markup,
            Self::Call(it) => &it.markup,
            Self::Star(it) => &it.markup,
            Self::Unary(it) => &it.markup,
            Self::Binary(it) => &it.markup,
            Self::ArrayType(it) => &it.markup,
            Self::StructType(it) => &it.markup,
            Self::FuncType(it) => &it.markup,
            Self::InterfaceType(it) => &it.markup,
            Self::MapType(it) => &it.markup,
            Self::Ellipsis(it) => &it.markup,
        }
    }
}

/// `T{a, b}`; `typ` is `None` for a literal elided inside another one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositeLit {
    pub typ: Option<Box<Expr>>,
    pub elts: Vec<Expr>,
    pub markup: Markup,
    pub closing: Vec<Trivia>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyValueExpr {
    pub key: Box<Expr>,
    pub value: Box<Expr>,
    pub markup: Markup,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FuncLit {
    pub typ: FuncType,
    pub body: BlockStmt,
    pub markup: Markup,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParenExpr {
    pub x: Box<Expr>,
    pub markup: Markup,
    pub closing: Vec<Trivia>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectorExpr {
    pub x: Box<Expr>,
    pub sel: Ident,
    pub markup: Markup,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexExpr {
    pub x: Box<Expr>,
    pub index: Box<Expr>,
    pub markup: Markup,
    pub closing: Vec<Trivia>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SliceExpr {
    pub x: Box<Expr>,
    pub low: Option<Box<Expr>>,
    pub high: Option<Box<Expr>>,
    pub max: Option<Box<Expr>>,
    pub slice3: bool,
    pub markup: Markup,
    pub closing: Vec<Trivia>,
}

/// `x.(T)`, or `x.(type)` when `typ` is `None`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeAssertExpr {
    pub x: Box<Expr>,
    pub typ: Option<Box<Expr>>,
    pub markup: Markup,
    pub closing: Vec<Trivia>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallExpr {
    pub fun: Box<Expr>,
    pub args: Vec<Expr>,
    /// Whether the last argument is spread with `...`.
    pub ellipsis: bool,
    pub markup: Markup,
    pub closing: Vec<Trivia>,
}

impl CallExpr {
    pub fn new(fun: Expr, args: Vec<Expr>) -> Self {
        Self {
            fun: Box::new(fun),
            args,
            ellipsis: false,
            markup: Markup::default(),
            closing: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StarExpr {
    pub x: Box<Expr>,
    pub markup: Markup,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub x: Box<Expr>,
    pub markup: Markup,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryExpr {
    pub x: Box<Expr>,
    pub op: BinaryOp,
    pub y: Box<Expr>,
    pub markup: Markup,
}

/// `[N]T`, `[...]T` or the slice type `[]T`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArrayType {
    pub len: Option<Box<Expr>>,
    pub elt: Box<Expr>,
    pub markup: Markup,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructType {
    pub fields: FieldList,
    pub markup: Markup,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FuncType {
    /// Whether the `func` keyword is part of the type; false inside a
    /// function declaration and for interface methods.
    pub func: bool,
    pub params: FieldList,
    pub results: Option<FieldList>,
    pub markup: Markup,
}

impl FuncType {
    pub fn new(params: Vec<Field>, results: Option<FieldList>) -> Self {
        Self { func: false, params: FieldList::new(params), results, markup: Markup::default() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterfaceType {
    pub methods: FieldList,
    pub markup: Markup,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapType {
    pub key: Box<Expr>,
    pub value: Box<Expr>,
    pub markup: Markup,
}

/// `...` in an array length, or `...T` for a variadic parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ellipsis {
    pub elt: Option<Box<Expr>>,
    pub markup: Markup,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub names: Vec<Ident>,
    pub typ: Expr,
    pub tag: Option<BasicLit>,
    pub markup: Markup,
}

impl Field {
    pub fn new(names: Vec<Ident>, typ: Expr) -> Self {
        Self { names, typ, tag: None, markup: Markup::default() }
    }
}

/// Parameters, results, struct fields or interface methods.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldList {
    /// Only meaningful for results: a single unnamed result may drop its
    /// parentheses. Every other list is always delimited.
    pub delimited: bool,
    pub list: Vec<Field>,
    pub markup: Markup,
    pub closing: Vec<Trivia>,
}

impl FieldList {
    pub fn new(list: Vec<Field>) -> Self {
        Self { delimited: true, list, markup: Markup::default(), closing: Vec::new() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Stmt {
    Decl(DeclStmt),
    Labeled(LabeledStmt),
    Expr(ExprStmt),
    IncDec(IncDecStmt),
    Assign(AssignStmt),
    Go(GoStmt),
    Defer(DeferStmt),
    Return(ReturnStmt),
    Branch(BranchStmt),
    Block(BlockStmt),
    If(IfStmt),
    /// Only valid directly inside the body of a switch.
    CaseClause(CaseClause),
    Switch(SwitchStmt),
    TypeSwitch(TypeSwitchStmt),
    For(ForStmt),
    Range(RangeStmt),
}

impl Stmt {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Decl(_) => "DeclStmt",
            Self::Labeled(_) => "LabeledStmt",
            Self::Expr(_) => "ExprStmt",
            Self::IncDec(_) => "IncDecStmt",
            Self::Assign(_) => "AssignStmt",
            Self::Go(_) => "GoStmt",
            Self::Defer(_) => "DeferStmt",
            Self::Return(_) => "ReturnStmt",
            Self::Branch(_) => "BranchStmt",
            Self::Block(_) => "BlockStmt",
            Self::If(_) => "IfStmt",
            Self::CaseClause(_) => "CaseClause",
            Self::Switch(_) => "SwitchStmt",
            Self::TypeSwitch(_) => "TypeSwitchStmt",
            Self::For(_) => "ForStmt",
            Self::Range(_) => "RangeStmt",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeclStmt {
    pub decl: GenDecl,
    pub markup: Markup,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabeledStmt {
    pub label: Ident,
    pub stmt: Option<Box<Stmt>>,
    pub markup: Markup,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExprStmt {
    pub x: Expr,
    pub markup: Markup,
}

impl ExprStmt {
    pub fn new(x: Expr) -> Self {
        Self { x, markup: Markup::default() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IncDecStmt {
    pub x: Expr,
    pub tok: IncDec,
    pub markup: Markup,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssignStmt {
    pub lhs: Vec<Expr>,
    pub tok: AssignOp,
    pub rhs: Vec<Expr>,
    pub markup: Markup,
}

/// `go f()`; `call` must be a [`CallExpr`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoStmt {
    pub call: Expr,
    pub markup: Markup,
}

/// `defer f()`; `call` must be a [`CallExpr`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeferStmt {
    pub call: Expr,
    pub markup: Markup,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReturnStmt {
    pub results: Vec<Expr>,
    pub markup: Markup,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BranchStmt {
    pub tok: BranchKind,
    pub label: Option<Ident>,
    pub markup: Markup,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockStmt {
    pub list: Vec<Stmt>,
    pub markup: Markup,
    pub closing: Vec<Trivia>,
}

impl BlockStmt {
    pub fn new(list: Vec<Stmt>) -> Self {
        Self { list, markup: Markup::default(), closing: Vec::new() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IfStmt {
    pub init: Option<Box<Stmt>>,
    pub cond: Expr,
    pub body: BlockStmt,
    /// An [`IfStmt`] or a [`BlockStmt`].
    pub else_: Option<Box<Stmt>>,
    pub markup: Markup,
}

/// `case a, b:`, or `default:` when `list` is empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaseClause {
    pub list: Vec<Expr>,
    pub body: Vec<Stmt>,
    pub markup: Markup,
}

/// The body holds [`CaseClause`]s only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwitchStmt {
    pub init: Option<Box<Stmt>>,
    pub tag: Option<Expr>,
    pub body: BlockStmt,
    pub markup: Markup,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeSwitchStmt {
    pub init: Option<Box<Stmt>>,
    /// `x := y.(type)` as an [`AssignStmt`], or `y.(type)` as an [`ExprStmt`].
    pub assign: Box<Stmt>,
    pub body: BlockStmt,
    pub markup: Markup,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForStmt {
    pub init: Option<Box<Stmt>>,
    pub cond: Option<Expr>,
    pub post: Option<Box<Stmt>>,
    pub body: BlockStmt,
    pub markup: Markup,
}

/// `for key, value := range x {}`; `tok` is unused without `key`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RangeStmt {
    pub key: Option<Expr>,
    pub value: Option<Expr>,
    pub tok: AssignOp,
    pub x: Expr,
    pub body: BlockStmt,
    pub markup: Markup,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Spec {
    Import(ImportSpec),
    Value(ValueSpec),
    Type(TypeSpec),
}

impl Spec {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Import(_) => "ImportSpec",
            Self::Value(_) => "ValueSpec",
            Self::Type(_) => "TypeSpec",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportSpec {
    pub name: Option<Ident>,
    pub path: BasicLit,
    pub markup: Markup,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueSpec {
    pub names: Vec<Ident>,
    pub typ: Option<Expr>,
    pub values: Vec<Expr>,
    pub markup: Markup,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeSpec {
    pub name: Ident,
    /// `type A = B`.
    pub assign: bool,
    pub typ: Expr,
    pub markup: Markup,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decl {
    Gen(GenDecl),
    Func(FuncDecl),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenDecl {
    pub tok: DeclKeyword,
    /// Parenthesized group. Forced when there is not exactly one spec.
    pub grouped: bool,
    pub specs: Vec<Spec>,
    pub markup: Markup,
    pub closing: Vec<Trivia>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FuncDecl {
    pub recv: Option<FieldList>,
    pub name: Ident,
    pub typ: FuncType,
    pub body: Option<BlockStmt>,
    pub markup: Markup,
}

impl FuncDecl {
    pub fn new(name: impl Into<String>, typ: FuncType, body: Option<BlockStmt>) -> Self {
        Self { recv: None, name: Ident::new(name), typ, body, markup: Markup::default() }
    }
}

/// Root of a structural tree. `markup.before` holds the comments above the
/// package clause, `closing` those after the last declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct File {
    pub package: Option<Ident>,
    pub decls: Vec<Decl>,
    pub markup: Markup,
    pub closing: Vec<Trivia>,
}

impl File {
    pub fn new(package: Option<&str>, decls: Vec<Decl>) -> Self {
        Self {
            package: package.map(Ident::new),
            decls,
            markup: Markup::default(),
            closing: Vec::new(),
        }
    }
}
