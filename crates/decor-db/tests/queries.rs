use decor_db::{Error, RootDatabase, SourceFile, decompose_file, format_file, round_trip};
use decor_dst::{Decl, Trivia};
use decor_syntax::{Indent, NodeKind, PrintConfig};
use expect_test::expect;
use salsa::Setter as _;

const COMMENTED: &str = "\
// Package p has comments everywhere.
package p

import (
\t\"fmt\" // printing

\t\"os\"
)

// Answer is documented.
const Answer = 42

func main() {
\t/* before */ x := Answer
\tif x > 0 {
\t\tfmt.Println(x) // positive
\t}

\t// exit
\tos.Exit(0)
}
";

fn file(db: &RootDatabase, text: &str) -> SourceFile {
    SourceFile::new(db, "main.go".into(), text.to_owned())
}

#[track_caller]
fn check_round_trip(text: &str) {
    let db = RootDatabase::default();
    let file = file(&db, text);
    let config = PrintConfig::default();

    let expected = format_file(&db, file, &config).unwrap();
    let actual = round_trip(&db, file, &config).unwrap();
    assert_eq!(actual, expected);
}

#[test]
fn round_trip_matches_formatting() {
    check_round_trip(COMMENTED);
    check_round_trip("package p\n");
    check_round_trip("package p\n\nvar (\n\ta = 1\n\tb = []int{\n\t\t1,\n\t\t2,\n\t}\n)\n");
}

#[test]
fn formatting_normalizes_layout() {
    let db = RootDatabase::default();
    let file = file(&db, "package p\n\n\n\nfunc f() { return }\n");

    expect![[r#"
        package p

        func f() {
        	return
        }
    "#]]
    .assert_eq(&format_file(&db, file, &PrintConfig::default()).unwrap());
}

#[test]
fn indentation_follows_config() {
    let db = RootDatabase::default();
    let file = file(&db, "package p\nfunc f() {\n\tx := 1\n}\n");
    let config = PrintConfig { indent: Indent::Spaces(4) };

    assert_eq!(round_trip(&db, file, &config).unwrap(), "package p\nfunc f() {\n    x := 1\n}\n");
}

#[test]
fn syntax_errors_are_diagnostics() {
    let db = RootDatabase::default();
    let file = file(&db, "package main\nvar = 1\n");

    let Err(Error::Syntax(diagnostic)) = round_trip(&db, file, &PrintConfig::default()) else {
        panic!("expected a syntax error");
    };
    assert_eq!(diagnostic.message(), "expected identifier");

    let position = file.line_index(&db).line_col(diagnostic.range().start());
    assert_eq!((position.line, position.col), (1, 4));
}

#[test]
fn unsupported_nodes_are_structural_errors() {
    let db = RootDatabase::default();
    let file = file(&db, "package p\nfunc f(c chan int) {\n\tc <- 1\n}\n");

    assert!(format_file(&db, file, &PrintConfig::default()).is_ok());
    match decompose_file(&db, file) {
        Err(Error::Structure(decor_dst::Error::UnsupportedNodeKind { kind, .. })) => {
            assert_eq!(*kind, NodeKind::ChanType);
        }
        other => panic!("expected an unsupported node kind, got {other:?}"),
    }
}

#[test]
fn edits_invalidate_the_tree() {
    let mut db = RootDatabase::default();
    let file = file(&db, "package p\nfunc f() {}\n");

    let tree = decompose_file(&db, file).as_ref().unwrap();
    let [Decl::Func(decl)] = tree.decls.as_slice() else {
        panic!("expected one function");
    };
    assert_eq!(decl.markup.before, [Trivia::Line]);

    file.set_text(&mut db).to("package p\n\n// g is new.\nfunc g() {}\n".to_owned());

    let tree = decompose_file(&db, file).as_ref().unwrap();
    let [Decl::Func(decl)] = tree.decls.as_slice() else {
        panic!("expected one function");
    };
    assert_eq!(decl.name.name, "g");
    assert_eq!(
        decl.markup.before,
        [Trivia::Line, Trivia::Line, Trivia::comment("// g is new."), Trivia::Line]
    );
}
