use decor_syntax::ast::*;
use decor_syntax::{PrintConfig, render};
use expect_test::{Expect, expect};

use crate::{ParsedFile, parse};

fn parse_ok(text: &str) -> ParsedFile {
    parse(text).unwrap_or_else(|err| panic!("{}: {:?}", err.message(), err.range()))
}

fn check_error(text: &str, expect: Expect) {
    let err = parse(text).expect_err("parse should fail");
    let range = err.range();
    let actual = format!("{}..{}: {}", u32::from(range.start()), u32::from(range.end()), err.message());
    expect.assert_eq(&actual);
}

fn body(file: &File) -> &[Stmt] {
    match file.decls.last() {
        Some(Decl::Func(FuncDecl { body: Some(body), .. })) => &body.list,
        _ => panic!("expected a function with a body"),
    }
}

#[test]
fn formatted_source_prints_unchanged() {
    let text = r#"// Package main is a demo.
package main

import (
	"fmt"
	str "strings"
)

type point struct {
	x, y int
}

func (p *point) add(q point) point {
	return point{p.x + q.x, p.y + q.y}
}

func main() {
	for i := 0; i < 3; i++ {
		if i % 2 == 0 {
			continue
		}
		fmt.Println(i, str.ToUpper("x")) // print
	}
}
"#;
    let parsed = parse_ok(text);
    let printed = render(&parsed.file, &parsed.lines, &parsed.comments, &PrintConfig::default());
    assert_eq!(printed, text);
}

#[test]
fn layout_is_normalized() {
    let text = "package main\nfunc main(){x:=[]int{1,2,\n3}\n\n\n\nprintln(x [0])}";
    let parsed = parse_ok(text);
    let printed = render(&parsed.file, &parsed.lines, &parsed.comments, &PrintConfig::default());
    expect![[r#"
        package main
        func main() {
        	x := []int{1, 2,
        		3}

        	println(x[0])
        }
    "#]]
    .assert_eq(&printed);
}

#[test]
fn comments_are_grouped() {
    let parsed = parse_ok("// a\n// b\n\n// c\npackage p /* d */\n");
    let groups = parsed
        .comments
        .iter()
        .map(|group| group.comments.iter().map(|c| c.text.as_str()).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    assert_eq!(groups, [vec!["// a", "// b"], vec!["// c"], vec!["/* d */"]]);
}

#[test]
fn package_clause_is_optional() {
    let parsed = parse_ok("func f() {}\n");
    assert!(parsed.file.package.is_none());
    assert_eq!(parsed.file.decls.len(), 1);
}

#[test]
fn composite_literal_in_control_clause() {
    let parsed = parse_ok("package p\nfunc f() {\n\tif x == (T{}) {\n\t}\n\tfor _, v := range []T{a} {\n\t}\n}\n");
    let [Stmt::If(stmt), Stmt::Range(range)] = body(&parsed.file) else {
        panic!("expected an if and a range statement");
    };
    assert!(matches!(&stmt.cond, Expr::Binary(bin) if matches!(*bin.y, Expr::Paren(_))));
    assert!(stmt.body.list.is_empty());
    assert_eq!(range.tok, AssignOp::Define);
    assert!(range.tok_pos.is_some());
    assert!(matches!(range.value, Some(Expr::Ident(ref v)) if v.name == "v"));
    assert!(matches!(range.x, Expr::CompositeLit(_)));
}

#[test]
fn bare_name_before_brace_opens_block() {
    let parsed = parse_ok("package p\nfunc f() {\n\tfor ok {\n\t}\n\tswitch x {\n\t}\n}\n");
    let [Stmt::For(for_stmt), Stmt::Switch(switch)] = body(&parsed.file) else {
        panic!("expected a for and a switch statement");
    };
    assert!(matches!(for_stmt.cond, Some(Expr::Ident(_))));
    assert!(matches!(switch.tag, Some(Expr::Ident(_))));
}

#[test]
fn type_switch_guard() {
    let parsed = parse_ok(
        "package p\nfunc f() {\n\tswitch v := x.(type) {\n\tcase int, *T:\n\t\tuse(v)\n\tdefault:\n\t}\n\tswitch y.(type) {\n\t}\n}\n",
    );
    let [Stmt::TypeSwitch(first), Stmt::TypeSwitch(second)] = body(&parsed.file) else {
        panic!("expected two type switches");
    };
    assert_eq!(first.assign.lhs.as_ref().map(|v| v.name.as_str()), Some("v"));
    assert_eq!(first.body.clauses.len(), 2);
    assert_eq!(first.body.clauses[0].list.len(), 2);
    assert_eq!(first.body.clauses[0].body.len(), 1);
    assert_eq!(first.body.clauses[1].keyword(), "default");
    assert!(second.assign.lhs.is_none());
}

#[test]
fn statement_forms() {
    let parsed = parse_ok(
        "package p\nfunc f() {\n\tx, y = y, x\n\ti++\n\tch <- v\n\tgo run()\n\tdefer done()\nloop:\n\tfor {\n\t\tbreak loop\n\t}\n\tvar z int\n\treturn\n}\n",
    );
    let kinds = body(&parsed.file).iter().map(Stmt::kind).collect::<Vec<_>>();
    expect![[r#"
        [
            AssignStmt,
            IncDecStmt,
            SendStmt,
            GoStmt,
            DeferStmt,
            LabeledStmt,
            DeclStmt,
            ReturnStmt,
        ]
    "#]]
    .assert_debug_eq(&kinds);
}

#[test]
fn label_on_empty_statement() {
    let parsed = parse_ok("package p\nfunc f() {\n\tgoto L\nL:\n}\n");
    let [Stmt::Branch(_), Stmt::Labeled(labeled)] = body(&parsed.file) else {
        panic!("expected a goto and a labeled statement");
    };
    assert_eq!(labeled.label.name, "L");
    assert!(labeled.stmt.is_none());

    expect![[r#"
        package p
        func f() {
        	goto L
        	L:
        }
    "#]]
    .assert_eq(&render(&parsed.file, &parsed.lines, &parsed.comments, &PrintConfig::default()));
}

#[test]
fn syntax_errors() {
    check_error("package main\nvar = 1\n", expect!["17..18: expected identifier"]);
    check_error("package main\nfunc f() {\n", expect!["24..24: expected `}`"]);
    check_error(
        "package main\nfunc f() { go x }\n",
        expect!["27..28: expression in `go` must be a call"],
    );
    check_error("package main\nvar s = \"abc\n", expect!["21..25: unterminated literal"]);
    check_error("package main\n42\n", expect!["13..15: expected declaration"]);
    check_error(
        "package main\nfunc f() {\n\tswitch v := x.(int) {\n\t}\n}\n",
        expect!["32..43: expected expression, found statement"],
    );
    check_error(
        "package main\nfunc f() {\n\tswitch a, b := x.(type) {\n\t}\n}\n",
        expect!["32..48: expected expression, found statement"],
    );
}
