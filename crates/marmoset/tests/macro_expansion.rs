//! Behavior tests for the macro definition and expansion passes.

use marmoset::{CollectStringPrint, Environment, Object, define_macros, expand_macros, parse};

#[test]
fn define_macros_extracts_top_level_macro_lets() {
    let input = "
        let number = 1;
        let function = fn(x, y) { x + y };
        let mymacro = macro(x, y) { x + y; };";
    let mut program = parse(input).expect("parse errors");
    let env = Environment::new();
    define_macros(&mut program, &env).expect("define error");

    // The macro statement is removed; the others keep their order.
    assert_eq!(program.statements.len(), 2);
    assert!(env.borrow().get("number").is_none());
    assert!(env.borrow().get("function").is_none());

    let object = env.borrow().get("mymacro").expect("macro not bound");
    let Object::Macro(macro_object) = &*object else {
        panic!("expected macro, got {object:?}");
    };
    assert_eq!(macro_object.parameters, vec!["x".to_owned(), "y".to_owned()]);
    assert_eq!(macro_object.body.to_string(), "(x + y)");
}

#[test]
fn expand_macros_rewrites_call_sites() {
    let cases = [
        (
            "let infixExpression = macro() { quote(1 + 2); };
             infixExpression();",
            "(1 + 2)",
        ),
        (
            "let reverse = macro(a, b) { quote(unquote(b) - unquote(a)); };
             reverse(2 + 2, 10 - 5);",
            "(10 - 5) - (2 + 2)",
        ),
        (
            r#"let unless = macro(condition, consequence, alternative) {
                   quote(if (!(unquote(condition))) {
                       unquote(consequence);
                   } else {
                       unquote(alternative);
                   });
               };
               unless(10 > 5, puts("not greater"), puts("greater"));"#,
            r#"if (!(10 > 5)) { puts("not greater") } else { puts("greater") }"#,
        ),
    ];

    for (input, expected) in cases {
        let expected_program = parse(expected).expect("parse errors in expectation");
        let mut program = parse(input).expect("parse errors");
        let env = Environment::new();
        define_macros(&mut program, &env).expect("define error");
        let expanded = expand_macros(program, &env, &mut CollectStringPrint::new()).expect("expand error");
        assert_eq!(expanded.to_string(), expected_program.to_string(), "input: {input}");
    }
}

#[test]
fn macro_arguments_are_not_evaluated_during_expansion() {
    // The arguments contain calls that would fail at runtime; expansion
    // must only splice their ASTs.
    let input = "
        let ignore = macro(a) { quote(1); };
        ignore(boom());";
    let mut program = parse(input).expect("parse errors");
    let env = Environment::new();
    define_macros(&mut program, &env).expect("define error");
    let expanded = expand_macros(program, &env, &mut CollectStringPrint::new()).expect("expand error");
    assert_eq!(expanded.to_string(), "1");
}

#[test]
fn macro_body_must_return_a_quote() {
    let input = "
        let broken = macro() { 1 + 2; };
        broken();";
    let mut program = parse(input).expect("parse errors");
    let env = Environment::new();
    define_macros(&mut program, &env).expect("define error");
    let error = expand_macros(program, &env, &mut CollectStringPrint::new()).expect_err("expected macro error");
    assert_eq!(error.to_string(), "we only support returning AST-nodes from macros");
}

#[test]
fn macro_literals_outside_top_level_lets_are_rejected() {
    let cases = [
        "macro(x) { quote(x) };",
        "let f = fn() { let m = macro(x) { quote(x) }; m };",
        "[macro() { quote(1) }];",
    ];
    for input in cases {
        let mut program = parse(input).expect("parse errors");
        let env = Environment::new();
        let error = define_macros(&mut program, &env).expect_err("expected define error");
        assert_eq!(
            error.to_string(),
            "macro literals are only allowed in top-level let statements",
            "input: {input}"
        );
    }
}

#[test]
fn macro_arity_mismatch_halts_expansion() {
    let input = "
        let reverse = macro(a, b) { quote(unquote(b) - unquote(a)); };
        reverse(1);";
    let mut program = parse(input).expect("parse errors");
    let env = Environment::new();
    define_macros(&mut program, &env).expect("define error");
    let error = expand_macros(program, &env, &mut CollectStringPrint::new()).expect_err("expected macro error");
    assert_eq!(error.to_string(), "wrong number of arguments: want=2 got=1");
}

#[test]
fn nested_macro_calls_expand_innermost_first() {
    let input = "
        let double = macro(x) { quote(unquote(x) + unquote(x)); };
        double(double(1));";
    let mut program = parse(input).expect("parse errors");
    let env = Environment::new();
    define_macros(&mut program, &env).expect("define error");
    let expanded = expand_macros(program, &env, &mut CollectStringPrint::new()).expect("expand error");
    assert_eq!(expanded.to_string(), "((1 + 1) + (1 + 1))");
}
