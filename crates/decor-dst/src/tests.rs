use std::fs;
use std::path::{Path, PathBuf};

use decor_parse::{ParsedFile, parse};
use decor_syntax::{NodeKind, PrintConfig, render};
use expect_test::expect;

use crate::*;

#[derive(PartialEq, Eq, PartialOrd, Ord)]
struct TestCase {
    path: PathBuf,
    text: String,
}

impl TestCase {
    fn list() -> Vec<Self> {
        let test_data_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("test_data");

        let mut cases = fs::read_dir(&test_data_dir)
            .unwrap_or_else(|err| {
                panic!("Cannot read directory {}: {err}", test_data_dir.display())
            })
            .filter_map(|entry| {
                let path = entry.ok()?.path();
                if path.extension()? == "go" {
                    let text = fs::read_to_string(&path).ok()?;
                    Some(Self { path, text })
                } else {
                    None
                }
            })
            .collect::<Vec<_>>();

        cases.sort();
        cases
    }
}

fn parse_ok(text: &str) -> ParsedFile {
    parse(text).unwrap_or_else(|err| panic!("{}: {:?}", err.message(), err.range()))
}

fn decompose_text(text: &str) -> Result<File> {
    let parsed = parse_ok(text);
    decompose(&parsed.file, &parsed.lines, &parsed.comments)
}

fn func(body: Vec<Stmt>) -> File {
    let main = FuncDecl::new("main", FuncType::new(Vec::new(), None), Some(BlockStmt::new(body)));
    File::new(Some("main"), vec![Decl::Func(main)])
}

fn call(name: &str, args: Vec<Expr>) -> Expr {
    Expr::Call(CallExpr::new(Expr::ident(name), args))
}

fn string(value: &str) -> Expr {
    Expr::BasicLit(BasicLit::new(LitKind::String, value))
}

fn first_func(file: &File) -> &FuncDecl {
    match file.decls.first() {
        Some(Decl::Func(decl)) => decl,
        _ => panic!("expected a function declaration"),
    }
}

#[test]
fn fixtures_round_trip() {
    let cases = TestCase::list();
    assert!(!cases.is_empty());

    for case in cases {
        let path = case.path.display();
        let parsed = parse(&case.text)
            .unwrap_or_else(|err| panic!("{path}: {}: {:?}", err.message(), err.range()));
        let expected =
            render(&parsed.file, &parsed.lines, &parsed.comments, &PrintConfig::default());

        let tree = decompose(&parsed.file, &parsed.lines, &parsed.comments)
            .unwrap_or_else(|err| panic!("{path}: {err}"));
        let actual = to_text(&tree).unwrap_or_else(|err| panic!("{path}: {err}"));
        assert_eq!(actual, expected, "{path}");
    }
}

#[test]
fn lead_comment_attaches_to_declaration() {
    let text = "// lead\nfunc f() {}\n";
    let file = decompose_text(text).unwrap();

    assert_eq!(file.decls.len(), 1);
    assert!(file.markup.is_empty());
    assert_eq!(first_func(&file).markup.before, [Trivia::comment("// lead"), Trivia::Line]);
    assert_eq!(to_text(&file).unwrap(), text);
}

#[test]
fn comment_at_end_of_left_sibling() {
    let file = decompose_text("package p\nvar x = f(a/* c */, b)\n").unwrap();
    let Some(Decl::Gen(decl)) = file.decls.first() else {
        panic!("expected a general declaration");
    };
    let [Spec::Value(spec)] = decl.specs.as_slice() else {
        panic!("expected one value spec");
    };
    let [Expr::Call(call)] = spec.values.as_slice() else {
        panic!("expected a call");
    };

    assert_eq!(call.args[0].markup(), &Markup::after(vec![Trivia::comment("/* c */")]));
    assert!(call.args[1].markup().is_empty());
}

#[test]
fn blank_lines_between_comment_groups() {
    let text = "package p\n\n// one\n\n// two\nvar x int\n";
    let file = decompose_text(text).unwrap();
    let Some(Decl::Gen(decl)) = file.decls.first() else {
        panic!("expected a general declaration");
    };

    assert_eq!(
        decl.markup.before,
        [
            Trivia::Line,
            Trivia::Line,
            Trivia::comment("// one"),
            Trivia::Line,
            Trivia::Line,
            Trivia::comment("// two"),
            Trivia::Line,
        ]
    );
    assert_eq!(to_text(&file).unwrap(), text);
}

#[test]
fn comments_inside_closing_delimiters() {
    let file = decompose_text("package p\nfunc f() {\n\t// nothing\n}\n").unwrap();
    let body = first_func(&file).body.as_ref().unwrap();

    assert!(body.list.is_empty());
    assert_eq!(body.closing, [Trivia::Line, Trivia::comment("// nothing"), Trivia::Line]);
    assert_eq!(file.closing, [Trivia::Line]);
}

#[test]
fn switch_bodies_hold_case_clauses() {
    let file =
        decompose_text("package p\nfunc f() {\n\tswitch v := x.(type) {\n\tdefault:\n\t}\n}\n")
            .unwrap();
    let body = first_func(&file).body.as_ref().unwrap();
    let [Stmt::TypeSwitch(switch)] = body.list.as_slice() else {
        panic!("expected a type switch");
    };

    assert!(matches!(&*switch.assign, Stmt::Assign(assign) if assign.tok == AssignOp::Define));
    assert!(matches!(switch.body.list.as_slice(), [Stmt::CaseClause(clause)] if clause.list.is_empty()));
}

#[test]
fn unsupported_kinds() {
    let check = |text: &str, kind| match decompose_text(text) {
        Err(Error::UnsupportedNodeKind { kind: found, .. }) => assert_eq!(found, kind),
        other => panic!("expected an unsupported node kind, got {other:?}"),
    };

    check("package p\nfunc f() {\n\tselect {}\n}\n", NodeKind::SelectStmt);
    check("package p\nfunc f() {\n\tc <- 1\n}\n", NodeKind::SendStmt);
    check("package p\nvar c chan int\n", NodeKind::ChanType);

    let err = decompose_text("package p\nvar c chan int\n").unwrap_err();
    expect!["unsupported node kind `ChanType` at 16..24"].assert_eq(&err.to_string());
}

#[test]
fn markup_free_tree_renders_conventionally() {
    let file = func(vec![
        Stmt::Expr(ExprStmt::new(call("println", vec![string("\"hi\"")]))),
        Stmt::Return(ReturnStmt { results: Vec::new(), markup: Markup::default() }),
    ]);

    expect![[r#"
        package main
        func main() {
        	println("hi")
        	return
        }
    "#]]
    .assert_eq(&to_text(&file).unwrap());
}

#[test]
fn hand_built_tree_survives_recomposition() {
    let mut assign = AssignStmt {
        lhs: vec![Expr::ident("x")],
        tok: AssignOp::Define,
        rhs: vec![Expr::BasicLit(BasicLit::new(LitKind::Int, "1"))],
        markup: Markup::after(vec![Trivia::comment("// one")]),
    };
    assign.markup.before = vec![Trivia::Line];
    let mut use_x = ExprStmt::new(call("use", vec![Expr::ident("x")]));
    use_x.markup.before = vec![Trivia::Line, Trivia::Line];

    let mut body = BlockStmt::new(vec![Stmt::Assign(assign), Stmt::Expr(use_x)]);
    body.closing = vec![Trivia::Line, Trivia::comment("/* end */"), Trivia::Line];

    let mut main = FuncDecl::new("main", FuncType::new(Vec::new(), None), Some(body));
    main.markup.before = vec![Trivia::Line, Trivia::Line, Trivia::comment("// doc"), Trivia::Line];
    let file = File::new(Some("main"), vec![Decl::Func(main)]);

    let Recomposed { file: native, lines, comments } = recompose(&file).unwrap();
    assert_eq!(comments.len(), 3);
    assert_eq!(decompose(&native, &lines, &comments).unwrap(), file);

    expect![[r#"
        package main

        // doc
        func main() {
        	x := 1 // one

        	use(x)
        	/* end */
        }
    "#]]
    .assert_eq(&render(&native, &lines, &comments, &PrintConfig::default()));
}

#[test]
fn results_and_groups_get_required_delimiters() {
    let results = FieldList {
        delimited: false,
        list: vec![
            Field::new(Vec::new(), Expr::ident("int")),
            Field::new(Vec::new(), Expr::ident("error")),
        ],
        markup: Markup::default(),
        closing: Vec::new(),
    };
    let decl = FuncDecl::new("f", FuncType::new(Vec::new(), Some(results)), None);
    let imports = GenDecl {
        tok: DeclKeyword::Import,
        grouped: false,
        specs: Vec::new(),
        markup: Markup::default(),
        closing: Vec::new(),
    };
    let file = File::new(Some("p"), vec![Decl::Gen(imports), Decl::Func(decl)]);

    expect![[r#"
        package p
        import ()
        func f() (int, error)
    "#]]
    .assert_eq(&to_text(&file).unwrap());
}

#[test]
fn structural_mismatches() {
    let check = |file: File, expected: &str, found: &str| match recompose(&file) {
        Err(Error::AssertionMismatch { expected: e, found: f }) => {
            assert_eq!((e, f), (expected, found));
        }
        other => panic!("expected a mismatch, got {other:?}"),
    };

    let switch = SwitchStmt {
        init: None,
        tag: Some(Expr::ident("x")),
        body: BlockStmt::new(vec![Stmt::Expr(ExprStmt::new(Expr::ident("y")))]),
        markup: Markup::default(),
    };
    check(func(vec![Stmt::Switch(switch)]), "CaseClause", "ExprStmt");

    let clause = CaseClause { list: Vec::new(), body: Vec::new(), markup: Markup::default() };
    check(func(vec![Stmt::CaseClause(clause)]), "non-case statement", "CaseClause");

    let go = GoStmt { call: Expr::ident("run"), markup: Markup::default() };
    check(func(vec![Stmt::Go(go)]), "CallExpr", "Ident");

    let pair = KeyValueExpr {
        key: Box::new(Expr::ident("k")),
        value: Box::new(Expr::ident("v")),
        markup: Markup::default(),
    };
    check(func(vec![Stmt::Expr(ExprStmt::new(Expr::KeyValue(pair)))]), "expression", "KeyValueExpr");

    let if_stmt = IfStmt {
        init: None,
        cond: Expr::ident("ok"),
        body: BlockStmt::new(Vec::new()),
        else_: Some(Box::new(Stmt::Expr(ExprStmt::new(Expr::ident("y"))))),
        markup: Markup::default(),
    };
    check(func(vec![Stmt::If(if_stmt)]), "IfStmt or BlockStmt", "ExprStmt");

    let type_switch = TypeSwitchStmt {
        init: None,
        assign: Box::new(Stmt::Expr(ExprStmt::new(Expr::ident("v")))),
        body: BlockStmt::new(Vec::new()),
        markup: Markup::default(),
    };
    check(func(vec![Stmt::TypeSwitch(type_switch)]), "type switch guard", "ExprStmt");

    let spec = TypeSpec {
        name: Ident::new("T"),
        assign: false,
        typ: Expr::ident("int"),
        markup: Markup::default(),
    };
    let decl = GenDecl {
        tok: DeclKeyword::Import,
        grouped: false,
        specs: vec![Spec::Type(spec)],
        markup: Markup::default(),
        closing: Vec::new(),
    };
    check(File::new(Some("p"), vec![Decl::Gen(decl)]), "ImportSpec", "TypeSpec");
}

#[test]
fn comment_clusters_split_at_blank_lines() {
    let cluster_sizes = |before: Vec<Trivia>| {
        let mut file = func(Vec::new());
        let Some(Decl::Func(main)) = file.decls.first_mut() else {
            panic!("expected a function declaration");
        };
        main.markup.before = before;
        let Recomposed { comments, .. } = recompose(&file).unwrap();
        comments.iter().map(|group| group.comments.len()).collect::<Vec<_>>()
    };
    let a = || Trivia::comment("// a");
    let b = || Trivia::comment("// b");
    let c = || Trivia::comment("// c");

    assert_eq!(cluster_sizes(vec![a(), Trivia::Line, b(), Trivia::Line]), [2]);
    assert_eq!(cluster_sizes(vec![a(), Trivia::Line, Trivia::Line, b(), Trivia::Line]), [1, 1]);
    assert_eq!(
        cluster_sizes(vec![
            a(),
            Trivia::Line,
            Trivia::Line,
            b(),
            Trivia::Line,
            c(),
            Trivia::Line,
        ]),
        [1, 2]
    );
    assert_eq!(cluster_sizes(vec![a(), Trivia::Line, b()]), [2]);
}

#[test]
fn malformed_comments() {
    let check = |text: &str, expected: &'static str| {
        let mut name = Ident::new("x");
        name.markup.after = vec![Trivia::Line, Trivia::comment(text)];
        let decl = GenDecl {
            tok: DeclKeyword::Var,
            grouped: false,
            specs: vec![Spec::Value(ValueSpec {
                names: vec![name],
                typ: Some(Expr::ident("int")),
                values: Vec::new(),
                markup: Markup::default(),
            })],
            markup: Markup::default(),
            closing: Vec::new(),
        };
        let err = recompose(&File::new(Some("p"), vec![Decl::Gen(decl)])).unwrap_err();
        assert_eq!(err, Error::InconsistentMarkup { node: "Ident", index: 1, reason: expected });
    };

    check("# shell", "comment must start with `//` or `/*`");
    check("/* open", "unterminated block comment");
    check("/* a */ b */", "unterminated block comment");
    check("// a\nb", "line comment spans lines");
}
