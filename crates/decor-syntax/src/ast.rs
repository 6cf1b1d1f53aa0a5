//! Positioned syntax tree produced by the parser.
//!
//! Every node records the offsets of the tokens it owns. Punctuation that
//! the printer can infer (separating commas, the `.` of a selector, the
//! `=` of a value spec) carries no offset.

use text_size::{TextRange, TextSize};

use crate::NodeKind;

pub trait AstNode {
    const KIND: NodeKind;

    fn range(&self) -> TextRange;
}

pub(crate) fn token(pos: TextSize, text: &str) -> TextRange {
    TextRange::at(pos, TextSize::of(text))
}

fn span(start: TextSize, end: TextSize) -> TextRange {
    TextRange::new(start, end)
}

fn after(pos: TextSize) -> TextSize {
    pos + TextSize::from(1)
}

macro_rules! operators {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),*
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),*
                }
            }
        }
    };
}

operators!(UnaryOp {
    Plus => "+",
    Minus => "-",
    Not => "!",
    Xor => "^",
    Addr => "&",
    Recv => "<-",
});

operators!(BinaryOp {
    LogOr => "||",
    LogAnd => "&&",
    Eq => "==",
    Neq => "!=",
    Lt => "<",
    LtEq => "<=",
    Gt => ">",
    GtEq => ">=",
    Add => "+",
    Sub => "-",
    Or => "|",
    Xor => "^",
    Mul => "*",
    Quo => "/",
    Rem => "%",
    Shl => "<<",
    Shr => ">>",
    And => "&",
    AndNot => "&^",
});

impl BinaryOp {
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::LogOr => 1,
            BinaryOp::LogAnd => 2,
            BinaryOp::Eq
            | BinaryOp::Neq
            | BinaryOp::Lt
            | BinaryOp::LtEq
            | BinaryOp::Gt
            | BinaryOp::GtEq => 3,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Or | BinaryOp::Xor => 4,
            BinaryOp::Mul
            | BinaryOp::Quo
            | BinaryOp::Rem
            | BinaryOp::Shl
            | BinaryOp::Shr
            | BinaryOp::And
            | BinaryOp::AndNot => 5,
        }
    }
}

operators!(AssignOp {
    Assign => "=",
    Define => ":=",
    Add => "+=",
    Sub => "-=",
    Mul => "*=",
    Quo => "/=",
    Rem => "%=",
    And => "&=",
    Or => "|=",
    Xor => "^=",
    Shl => "<<=",
    Shr => ">>=",
    AndNot => "&^=",
});

operators!(IncDec {
    Inc => "++",
    Dec => "--",
});

operators!(BranchKind {
    Break => "break",
    Continue => "continue",
    Goto => "goto",
    Fallthrough => "fallthrough",
});

operators!(
    /// Keyword introducing a general declaration.
    DeclKeyword {
        Import => "import",
        Const => "const",
        Type => "type",
        Var => "var",
    }
);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LitKind {
    Int,
    Float,
    Char,
    String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ident {
    pub pos: TextSize,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BasicLit {
    pub pos: TextSize,
    pub kind: LitKind,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    Ident(Ident),
    BasicLit(BasicLit),
    CompositeLit(CompositeLit),
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
    ChanType(ChanType),
    Ellipsis(Ellipsis),
}

/// An element of a composite literal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Element {
    Expr(Expr),
    KeyValue(KeyValueExpr),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositeLit {
    pub typ: Option<Box<Expr>>,
    pub lbrace: TextSize,
    pub elts: Vec<Element>,
    pub rbrace: TextSize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyValueExpr {
    pub key: Expr,
    pub colon: TextSize,
    pub value: Expr,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FuncLit {
    pub typ: FuncType,
    pub body: BlockStmt,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParenExpr {
    pub lparen: TextSize,
    pub x: Box<Expr>,
    pub rparen: TextSize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectorExpr {
    pub x: Box<Expr>,
    pub sel: Ident,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexExpr {
    pub x: Box<Expr>,
    pub lbrack: TextSize,
    pub index: Box<Expr>,
    pub rbrack: TextSize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SliceExpr {
    pub x: Box<Expr>,
    pub lbrack: TextSize,
    pub low: Option<Box<Expr>>,
    pub high: Option<Box<Expr>>,
    pub max: Option<Box<Expr>>,
    /// `x[a:b:c]` rather than `x[a:b]`.
    pub slice3: bool,
    pub rbrack: TextSize,
}

/// `x.(T)`, or `x.(type)` inside a type switch guard when `typ` is `None`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeAssertExpr {
    pub x: Box<Expr>,
    pub lparen: TextSize,
    pub typ: Option<Box<Expr>>,
    pub rparen: TextSize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallExpr {
    pub fun: Box<Expr>,
    pub lparen: TextSize,
    pub args: Vec<Expr>,
    pub ellipsis: Option<TextSize>,
    pub rparen: TextSize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StarExpr {
    pub star: TextSize,
    pub x: Box<Expr>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnaryExpr {
    pub op_pos: TextSize,
    pub op: UnaryOp,
    pub x: Box<Expr>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryExpr {
    pub x: Box<Expr>,
    pub op_pos: TextSize,
    pub op: BinaryOp,
    pub y: Box<Expr>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArrayType {
    pub lbrack: TextSize,
    /// `None` for a slice type.
    pub len: Option<Box<Expr>>,
    pub elt: Box<Expr>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructType {
    pub struct_pos: TextSize,
    pub fields: FieldList,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FuncType {
    /// `None` when the signature belongs to a function declaration.
    pub func: Option<TextSize>,
    pub params: FieldList,
    pub results: Option<FieldList>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterfaceType {
    pub interface_pos: TextSize,
    pub methods: FieldList,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapType {
    pub map_pos: TextSize,
    pub key: Box<Expr>,
    pub value: Box<Expr>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChanType {
    pub chan_pos: TextSize,
    /// Offset of `<-`, before `chan` for a receive-only channel.
    pub arrow: Option<TextSize>,
    pub dir: ChanDir,
    pub value: Box<Expr>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ellipsis {
    pub pos: TextSize,
    pub elt: Option<Box<Expr>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub names: Vec<Ident>,
    pub typ: Expr,
    pub tag: Option<BasicLit>,
}

/// Parameters, results, struct fields or interface methods.
///
/// `opening` and `closing` are absent for a single unparenthesized result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldList {
    pub opening: Option<TextSize>,
    pub list: Vec<Field>,
    pub closing: Option<TextSize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Stmt {
    Decl(DeclStmt),
    Labeled(LabeledStmt),
    Expr(ExprStmt),
    Send(SendStmt),
    IncDec(IncDecStmt),
    Assign(AssignStmt),
    Go(GoStmt),
    Defer(DeferStmt),
    Return(ReturnStmt),
    Branch(BranchStmt),
    Block(BlockStmt),
    If(IfStmt),
    Switch(SwitchStmt),
    TypeSwitch(TypeSwitchStmt),
    Select(SelectStmt),
    For(ForStmt),
    Range(RangeStmt),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeclStmt {
    pub decl: GenDecl,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabeledStmt {
    pub label: Ident,
    pub colon: TextSize,
    /// `None` for a label on an empty statement.
    pub stmt: Option<Box<Stmt>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExprStmt {
    pub x: Expr,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SendStmt {
    pub chan: Expr,
    pub arrow: TextSize,
    pub value: Expr,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IncDecStmt {
    pub x: Expr,
    pub tok_pos: TextSize,
    pub tok: IncDec,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssignStmt {
    pub lhs: Vec<Expr>,
    pub tok_pos: TextSize,
    pub tok: AssignOp,
    pub rhs: Vec<Expr>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoStmt {
    pub go_pos: TextSize,
    pub call: CallExpr,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeferStmt {
    pub defer_pos: TextSize,
    pub call: CallExpr,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReturnStmt {
    pub return_pos: TextSize,
    pub results: Vec<Expr>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BranchStmt {
    pub tok_pos: TextSize,
    pub tok: BranchKind,
    pub label: Option<Ident>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockStmt {
    pub lbrace: TextSize,
    pub list: Vec<Stmt>,
    pub rbrace: TextSize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Else {
    If(Box<IfStmt>),
    Block(BlockStmt),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IfStmt {
    pub if_pos: TextSize,
    pub init: Option<Box<Stmt>>,
    pub cond: Expr,
    pub body: BlockStmt,
    pub else_: Option<Else>,
}

/// A `case` clause, or `default` when `list` is empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaseClause {
    pub case_pos: TextSize,
    pub list: Vec<Expr>,
    pub colon: TextSize,
    pub body: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaseBlock {
    pub lbrace: TextSize,
    pub clauses: Vec<CaseClause>,
    pub rbrace: TextSize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwitchStmt {
    pub switch_pos: TextSize,
    pub init: Option<Box<Stmt>>,
    pub tag: Option<Expr>,
    pub body: CaseBlock,
}

/// `x := y.(type)` or `y.(type)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeSwitchGuard {
    pub lhs: Option<Ident>,
    pub define: Option<TextSize>,
    pub x: TypeAssertExpr,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeSwitchStmt {
    pub switch_pos: TextSize,
    pub init: Option<Box<Stmt>>,
    pub assign: TypeSwitchGuard,
    pub body: CaseBlock,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommClause {
    pub case_pos: TextSize,
    pub comm: Option<Box<Stmt>>,
    pub colon: TextSize,
    pub body: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectStmt {
    pub select_pos: TextSize,
    pub lbrace: TextSize,
    pub clauses: Vec<CommClause>,
    pub rbrace: TextSize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForStmt {
    pub for_pos: TextSize,
    pub init: Option<Box<Stmt>>,
    pub cond: Option<Expr>,
    pub post: Option<Box<Stmt>>,
    pub body: BlockStmt,
}

/// `for k, v := range x {}`. `tok_pos` is set whenever `key` is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RangeStmt {
    pub for_pos: TextSize,
    pub key: Option<Expr>,
    pub value: Option<Expr>,
    pub tok_pos: Option<TextSize>,
    pub tok: AssignOp,
    pub range_pos: TextSize,
    pub x: Expr,
    pub body: BlockStmt,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Spec {
    Import(ImportSpec),
    Value(ValueSpec),
    Type(TypeSpec),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportSpec {
    pub name: Option<Ident>,
    pub path: BasicLit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueSpec {
    pub names: Vec<Ident>,
    pub typ: Option<Expr>,
    pub values: Vec<Expr>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeSpec {
    pub name: Ident,
    /// Offset of `=` in an alias declaration.
    pub assign: Option<TextSize>,
    pub typ: Expr,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decl {
    Gen(GenDecl),
    Func(FuncDecl),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenDecl {
    pub tok_pos: TextSize,
    pub tok: DeclKeyword,
    pub lparen: Option<TextSize>,
    pub specs: Vec<Spec>,
    pub rparen: Option<TextSize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FuncDecl {
    pub func_pos: TextSize,
    pub recv: Option<FieldList>,
    pub name: Ident,
    pub typ: FuncType,
    pub body: Option<BlockStmt>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageClause {
    pub package_pos: TextSize,
    pub name: Ident,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct File {
    pub package: Option<PackageClause>,
    pub decls: Vec<Decl>,
    /// Length of the source text.
    pub eof: TextSize,
}

impl Expr {
    pub fn kind(&self) -> NodeKind {
        match self {
            Expr::Ident(_) => NodeKind::Ident,
            Expr::BasicLit(_) => NodeKind::BasicLit,
            Expr::CompositeLit(_) => NodeKind::CompositeLit,
            Expr::FuncLit(_) => NodeKind::FuncLit,
            Expr::Paren(_) => NodeKind::ParenExpr,
            Expr::Selector(_) => NodeKind::SelectorExpr,
            Expr::Index(_) => NodeKind::IndexExpr,
            Expr::Slice(_) => NodeKind::SliceExpr,
            Expr::TypeAssert(_) => NodeKind::TypeAssertExpr,
            Expr::Call(_) => NodeKind::CallExpr,
            Expr::Star(_) => NodeKind::StarExpr,
            Expr::Unary(_) => NodeKind::UnaryExpr,
            Expr::Binary(_) => NodeKind::BinaryExpr,
            Expr::ArrayType(_) => NodeKind::ArrayType,
            Expr::StructType(_) => NodeKind::StructType,
            Expr::FuncType(_) => NodeKind::FuncType,
            Expr::InterfaceType(_) => NodeKind::InterfaceType,
            Expr::MapType(_) => NodeKind::MapType,
            Expr::ChanType(_) => NodeKind::ChanType,
            Expr::Ellipsis(_) => NodeKind::Ellipsis,
        }
    }

    pub fn range(&self) -> TextRange {
        match self {
            Expr::Ident(it) => it.range(),
            Expr::BasicLit(it) => it.range(),
            Expr::CompositeLit(it) => it.range(),
            Expr::FuncLit(it) => it.range(),
            Expr::Paren(it) => it.range(),
            Expr::Selector(it) => it.range(),
            Expr::Index(it) => it.range(),
            Expr::Slice(it) => it.range(),
            Expr::TypeAssert(it) => it.range(),
            Expr::Call(it) => it.range(),
            Expr::Star(it) => it.range(),
            Expr::Unary(it) => it.range(),
            Expr::Binary(it) => it.range(),
            Expr::ArrayType(it) => it.range(),
            Expr::StructType(it) => it.range(),
            Expr::FuncType(it) => it.range(),
            Expr::InterfaceType(it) => it.range(),
            Expr::MapType(it) => it.range(),
            Expr::ChanType(it) => it.range(),
            Expr::Ellipsis(it) => it.range(),
        }
    }
}

impl Element {
    pub fn range(&self) -> TextRange {
        match self {
            Element::Expr(expr) => expr.range(),
            Element::KeyValue(kv) => kv.range(),
        }
    }
}

impl Stmt {
    pub fn kind(&self) -> NodeKind {
        match self {
            Stmt::Decl(_) => NodeKind::DeclStmt,
            Stmt::Labeled(_) => NodeKind::LabeledStmt,
            Stmt::Expr(_) => NodeKind::ExprStmt,
            Stmt::Send(_) => NodeKind::SendStmt,
            Stmt::IncDec(_) => NodeKind::IncDecStmt,
            Stmt::Assign(_) => NodeKind::AssignStmt,
            Stmt::Go(_) => NodeKind::GoStmt,
            Stmt::Defer(_) => NodeKind::DeferStmt,
            Stmt::Return(_) => NodeKind::ReturnStmt,
            Stmt::Branch(_) => NodeKind::BranchStmt,
            Stmt::Block(_) => NodeKind::BlockStmt,
            Stmt::If(_) => NodeKind::IfStmt,
            Stmt::Switch(_) => NodeKind::SwitchStmt,
            Stmt::TypeSwitch(_) => NodeKind::TypeSwitchStmt,
            Stmt::Select(_) => NodeKind::SelectStmt,
            Stmt::For(_) => NodeKind::ForStmt,
            Stmt::Range(_) => NodeKind::RangeStmt,
        }
    }

    pub fn range(&self) -> TextRange {
        match self {
            Stmt::Decl(it) => it.range(),
            Stmt::Labeled(it) => it.range(),
            Stmt::Expr(it) => it.range(),
            Stmt::Send(it) => it.range(),
            Stmt::IncDec(it) => it.range(),
            Stmt::Assign(it) => it.range(),
            Stmt::Go(it) => it.range(),
            Stmt::Defer(it) => it.range(),
            Stmt::Return(it) => it.range(),
            Stmt::Branch(it) => it.range(),
            Stmt::Block(it) => it.range(),
            Stmt::If(it) => it.range(),
            Stmt::Switch(it) => it.range(),
            Stmt::TypeSwitch(it) => it.range(),
            Stmt::Select(it) => it.range(),
            Stmt::For(it) => it.range(),
            Stmt::Range(it) => it.range(),
        }
    }
}

impl Else {
    pub fn range(&self) -> TextRange {
        match self {
            Else::If(stmt) => stmt.range(),
            Else::Block(block) => block.range(),
        }
    }
}

impl Spec {
    pub fn kind(&self) -> NodeKind {
        match self {
            Spec::Import(_) => NodeKind::ImportSpec,
            Spec::Value(_) => NodeKind::ValueSpec,
            Spec::Type(_) => NodeKind::TypeSpec,
        }
    }

    pub fn range(&self) -> TextRange {
        match self {
            Spec::Import(it) => it.range(),
            Spec::Value(it) => it.range(),
            Spec::Type(it) => it.range(),
        }
    }
}

impl Decl {
    pub fn range(&self) -> TextRange {
        match self {
            Decl::Gen(it) => it.range(),
            Decl::Func(it) => it.range(),
        }
    }
}

impl CaseClause {
    pub fn keyword(&self) -> &'static str {
        if self.list.is_empty() { "default" } else { "case" }
    }
}

impl CommClause {
    pub fn keyword(&self) -> &'static str {
        if self.comm.is_none() { "default" } else { "case" }
    }
}

impl AstNode for Ident {
    const KIND: NodeKind = NodeKind::Ident;

    fn range(&self) -> TextRange {
        token(self.pos, &self.name)
    }
}

impl AstNode for BasicLit {
    const KIND: NodeKind = NodeKind::BasicLit;

    fn range(&self) -> TextRange {
        token(self.pos, &self.value)
    }
}

impl AstNode for CompositeLit {
    const KIND: NodeKind = NodeKind::CompositeLit;

    fn range(&self) -> TextRange {
        let start = self.typ.as_ref().map_or(self.lbrace, |typ| typ.range().start());
        span(start, after(self.rbrace))
    }
}

impl AstNode for KeyValueExpr {
    const KIND: NodeKind = NodeKind::KeyValueExpr;

    fn range(&self) -> TextRange {
        self.key.range().cover(self.value.range())
    }
}

impl AstNode for FuncLit {
    const KIND: NodeKind = NodeKind::FuncLit;

    fn range(&self) -> TextRange {
        self.typ.range().cover(self.body.range())
    }
}

impl AstNode for ParenExpr {
    const KIND: NodeKind = NodeKind::ParenExpr;

    fn range(&self) -> TextRange {
        span(self.lparen, after(self.rparen))
    }
}

impl AstNode for SelectorExpr {
    const KIND: NodeKind = NodeKind::SelectorExpr;

    fn range(&self) -> TextRange {
        self.x.range().cover(self.sel.range())
    }
}

impl AstNode for IndexExpr {
    const KIND: NodeKind = NodeKind::IndexExpr;

    fn range(&self) -> TextRange {
        span(self.x.range().start(), after(self.rbrack))
    }
}

impl AstNode for SliceExpr {
    const KIND: NodeKind = NodeKind::SliceExpr;

    fn range(&self) -> TextRange {
        span(self.x.range().start(), after(self.rbrack))
    }
}

impl AstNode for TypeAssertExpr {
    const KIND: NodeKind = NodeKind::TypeAssertExpr;

    fn range(&self) -> TextRange {
        span(self.x.range().start(), after(self.rparen))
    }
}

impl AstNode for CallExpr {
    const KIND: NodeKind = NodeKind::CallExpr;

    fn range(&self) -> TextRange {
        span(self.fun.range().start(), after(self.rparen))
    }
}

impl AstNode for StarExpr {
    const KIND: NodeKind = NodeKind::StarExpr;

    fn range(&self) -> TextRange {
        span(self.star, self.x.range().end())
    }
}

impl AstNode for UnaryExpr {
    const KIND: NodeKind = NodeKind::UnaryExpr;

    fn range(&self) -> TextRange {
        span(self.op_pos, self.x.range().end())
    }
}

impl AstNode for BinaryExpr {
    const KIND: NodeKind = NodeKind::BinaryExpr;

    fn range(&self) -> TextRange {
        self.x.range().cover(self.y.range())
    }
}

impl AstNode for ArrayType {
    const KIND: NodeKind = NodeKind::ArrayType;

    fn range(&self) -> TextRange {
        span(self.lbrack, self.elt.range().end())
    }
}

impl AstNode for StructType {
    const KIND: NodeKind = NodeKind::StructType;

    fn range(&self) -> TextRange {
        span(self.struct_pos, self.fields.range().end())
    }
}

impl AstNode for FuncType {
    const KIND: NodeKind = NodeKind::FuncType;

    fn range(&self) -> TextRange {
        let params = self.params.range();
        let start = self.func.unwrap_or(params.start());
        let end = self.results.as_ref().map_or(params.end(), |results| results.range().end());
        span(start, end)
    }
}

impl AstNode for InterfaceType {
    const KIND: NodeKind = NodeKind::InterfaceType;

    fn range(&self) -> TextRange {
        span(self.interface_pos, self.methods.range().end())
    }
}

impl AstNode for MapType {
    const KIND: NodeKind = NodeKind::MapType;

    fn range(&self) -> TextRange {
        span(self.map_pos, self.value.range().end())
    }
}

impl AstNode for ChanType {
    const KIND: NodeKind = NodeKind::ChanType;

    fn range(&self) -> TextRange {
        let start = self.arrow.map_or(self.chan_pos, |arrow| arrow.min(self.chan_pos));
        span(start, self.value.range().end())
    }
}

impl AstNode for Ellipsis {
    const KIND: NodeKind = NodeKind::Ellipsis;

    fn range(&self) -> TextRange {
        match &self.elt {
            Some(elt) => span(self.pos, elt.range().end()),
            None => token(self.pos, "..."),
        }
    }
}

impl AstNode for Field {
    const KIND: NodeKind = NodeKind::Field;

    fn range(&self) -> TextRange {
        let typ = self.typ.range();
        let start = self.names.first().map_or(typ.start(), |name| name.pos);
        let end = self.tag.as_ref().map_or(typ.end(), |tag| tag.range().end());
        span(start, end)
    }
}

impl AstNode for FieldList {
    const KIND: NodeKind = NodeKind::FieldList;

    fn range(&self) -> TextRange {
        let start = self
            .opening
            .or_else(|| self.list.first().map(|field| field.range().start()))
            .unwrap_or_default();
        let end = self
            .closing
            .map(after)
            .or_else(|| self.list.last().map(|field| field.range().end()))
            .unwrap_or(start);
        span(start, end)
    }
}

impl AstNode for DeclStmt {
    const KIND: NodeKind = NodeKind::DeclStmt;

    fn range(&self) -> TextRange {
        self.decl.range()
    }
}

impl AstNode for LabeledStmt {
    const KIND: NodeKind = NodeKind::LabeledStmt;

    fn range(&self) -> TextRange {
        let end = match &self.stmt {
            Some(stmt) => stmt.range().end(),
            None => self.colon + TextSize::new(1),
        };
        span(self.label.range().start(), end)
    }
}

impl AstNode for ExprStmt {
    const KIND: NodeKind = NodeKind::ExprStmt;

    fn range(&self) -> TextRange {
        self.x.range()
    }
}

impl AstNode for SendStmt {
    const KIND: NodeKind = NodeKind::SendStmt;

    fn range(&self) -> TextRange {
        self.chan.range().cover(self.value.range())
    }
}

impl AstNode for IncDecStmt {
    const KIND: NodeKind = NodeKind::IncDecStmt;

    fn range(&self) -> TextRange {
        self.x.range().cover(token(self.tok_pos, self.tok.as_str()))
    }
}

impl AstNode for AssignStmt {
    const KIND: NodeKind = NodeKind::AssignStmt;

    fn range(&self) -> TextRange {
        let op = token(self.tok_pos, self.tok.as_str());
        let start = self.lhs.first().map_or(op, Expr::range);
        let end = self.rhs.last().map_or(op, Expr::range);
        start.cover(end)
    }
}

impl AstNode for GoStmt {
    const KIND: NodeKind = NodeKind::GoStmt;

    fn range(&self) -> TextRange {
        span(self.go_pos, self.call.range().end())
    }
}

impl AstNode for DeferStmt {
    const KIND: NodeKind = NodeKind::DeferStmt;

    fn range(&self) -> TextRange {
        span(self.defer_pos, self.call.range().end())
    }
}

impl AstNode for ReturnStmt {
    const KIND: NodeKind = NodeKind::ReturnStmt;

    fn range(&self) -> TextRange {
        let keyword = token(self.return_pos, "return");
        self.results.last().map_or(keyword, |last| keyword.cover(last.range()))
    }
}

impl AstNode for BranchStmt {
    const KIND: NodeKind = NodeKind::BranchStmt;

    fn range(&self) -> TextRange {
        let keyword = token(self.tok_pos, self.tok.as_str());
        self.label.as_ref().map_or(keyword, |label| keyword.cover(label.range()))
    }
}

impl AstNode for BlockStmt {
    const KIND: NodeKind = NodeKind::BlockStmt;

    fn range(&self) -> TextRange {
        span(self.lbrace, after(self.rbrace))
    }
}

impl AstNode for IfStmt {
    const KIND: NodeKind = NodeKind::IfStmt;

    fn range(&self) -> TextRange {
        let end = self.else_.as_ref().map_or(self.body.range(), Else::range).end();
        span(self.if_pos, end)
    }
}

impl AstNode for CaseClause {
    const KIND: NodeKind = NodeKind::CaseClause;

    fn range(&self) -> TextRange {
        let end = self.body.last().map_or(after(self.colon), |stmt| stmt.range().end());
        span(self.case_pos, end)
    }
}

impl AstNode for CaseBlock {
    const KIND: NodeKind = NodeKind::CaseBlock;

    fn range(&self) -> TextRange {
        span(self.lbrace, after(self.rbrace))
    }
}

impl AstNode for SwitchStmt {
    const KIND: NodeKind = NodeKind::SwitchStmt;

    fn range(&self) -> TextRange {
        span(self.switch_pos, self.body.range().end())
    }
}

impl AstNode for TypeSwitchGuard {
    const KIND: NodeKind = NodeKind::TypeSwitchGuard;

    fn range(&self) -> TextRange {
        let x = self.x.range();
        self.lhs.as_ref().map_or(x, |lhs| lhs.range().cover(x))
    }
}

impl AstNode for TypeSwitchStmt {
    const KIND: NodeKind = NodeKind::TypeSwitchStmt;

    fn range(&self) -> TextRange {
        span(self.switch_pos, self.body.range().end())
    }
}

impl AstNode for CommClause {
    const KIND: NodeKind = NodeKind::CommClause;

    fn range(&self) -> TextRange {
        let end = self.body.last().map_or(after(self.colon), |stmt| stmt.range().end());
        span(self.case_pos, end)
    }
}

impl AstNode for SelectStmt {
    const KIND: NodeKind = NodeKind::SelectStmt;

    fn range(&self) -> TextRange {
        span(self.select_pos, after(self.rbrace))
    }
}

impl AstNode for ForStmt {
    const KIND: NodeKind = NodeKind::ForStmt;

    fn range(&self) -> TextRange {
        span(self.for_pos, self.body.range().end())
    }
}

impl AstNode for RangeStmt {
    const KIND: NodeKind = NodeKind::RangeStmt;

    fn range(&self) -> TextRange {
        span(self.for_pos, self.body.range().end())
    }
}

impl AstNode for ImportSpec {
    const KIND: NodeKind = NodeKind::ImportSpec;

    fn range(&self) -> TextRange {
        let path = self.path.range();
        self.name.as_ref().map_or(path, |name| name.range().cover(path))
    }
}

impl AstNode for ValueSpec {
    const KIND: NodeKind = NodeKind::ValueSpec;

    fn range(&self) -> TextRange {
        let mut range = self.names.first().map(Ident::range).unwrap_or_default();
        for name in &self.names {
            range = range.cover(name.range());
        }
        if let Some(typ) = &self.typ {
            range = range.cover(typ.range());
        }
        if let Some(last) = self.values.last() {
            range = range.cover(last.range());
        }
        range
    }
}

impl AstNode for TypeSpec {
    const KIND: NodeKind = NodeKind::TypeSpec;

    fn range(&self) -> TextRange {
        self.name.range().cover(self.typ.range())
    }
}

impl AstNode for GenDecl {
    const KIND: NodeKind = NodeKind::GenDecl;

    fn range(&self) -> TextRange {
        let keyword = token(self.tok_pos, self.tok.as_str());
        match (self.rparen, self.specs.last()) {
            (Some(rparen), _) => span(self.tok_pos, after(rparen)),
            (None, Some(spec)) => keyword.cover(spec.range()),
            (None, None) => keyword,
        }
    }
}

impl AstNode for FuncDecl {
    const KIND: NodeKind = NodeKind::FuncDecl;

    fn range(&self) -> TextRange {
        let end = match &self.body {
            Some(body) => body.range().end(),
            None => self.typ.range().end(),
        };
        span(self.func_pos, end)
    }
}

impl AstNode for File {
    const KIND: NodeKind = NodeKind::File;

    fn range(&self) -> TextRange {
        TextRange::up_to(self.eof)
    }
}
