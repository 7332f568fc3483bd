//! Behavior tests for the builtin functions.

use std::rc::Rc;

use marmoset::{CollectStringPrint, Environment, Evaluator, Object, parse};

fn eval_input(input: &str) -> Rc<Object> {
    let program = parse(input).expect("parse errors");
    let env = Environment::new();
    let mut print = CollectStringPrint::new();
    Evaluator::new(&mut print).eval_program(&program, &env)
}

fn assert_integer(object: &Rc<Object>, expected: i64, input: &str) {
    match &**object {
        Object::Integer(value) => assert_eq!(*value, expected, "input: {input}"),
        other => panic!("expected integer {expected} for {input:?}, got {other:?}"),
    }
}

fn assert_error(object: &Rc<Object>, expected: &str, input: &str) {
    match &**object {
        Object::Error(message) => assert_eq!(message, expected, "input: {input}"),
        other => panic!("expected error {expected:?} for {input:?}, got {other:?}"),
    }
}

#[test]
fn len_counts_bytes_and_elements() {
    let cases = [
        (r#"len("")"#, 0),
        (r#"len("four")"#, 4),
        (r#"len("hello world")"#, 11),
        ("len([])", 0),
        ("len([1, 2, 3])", 3),
        (r#"len(push([], "x"))"#, 1),
    ];
    for (input, expected) in cases {
        assert_integer(&eval_input(input), expected, input);
    }
}

#[test]
fn builtin_errors() {
    let cases = [
        ("len(1)", "argument to `len` not supported, got INTEGER"),
        (r#"len("one", "two")"#, "wrong number of arguments. got=2, want=1"),
        ("len()", "wrong number of arguments. got=0, want=1"),
        ("first(1)", "argument to `first` must be ARRAY, got INTEGER"),
        (r#"last("abc")"#, "argument to `last` must be ARRAY, got STRING"),
        ("rest(true)", "argument to `rest` must be ARRAY, got BOOLEAN"),
        ("push(1, 2)", "argument to `push` must be ARRAY, got INTEGER"),
        ("push([1])", "wrong number of arguments. got=1, want=2"),
        ("first([1], [2])", "wrong number of arguments. got=2, want=1"),
    ];
    for (input, expected) in cases {
        assert_error(&eval_input(input), expected, input);
    }
}

#[test]
fn first_last_and_rest() {
    assert_integer(&eval_input("first([1, 2, 3])"), 1, "first");
    assert_integer(&eval_input("last([1, 2, 3])"), 3, "last");
    assert!(matches!(&*eval_input("first([])"), Object::Null));
    assert!(matches!(&*eval_input("last([])"), Object::Null));
    assert!(matches!(&*eval_input("rest([])"), Object::Null));

    assert_eq!(eval_input("rest([1, 2, 3])").to_string(), "[2, 3]");
    assert_eq!(eval_input("rest(rest([1, 2, 3]))").to_string(), "[3]");
    assert_eq!(eval_input("rest([1])").to_string(), "[]");
}

#[test]
fn push_and_rest_never_mutate_their_argument() {
    let input = "
        let a = [1, 2];
        let b = push(a, 3);
        let c = rest(a);
        [len(a), len(b), len(c), a[0], a[1]]";
    assert_eq!(eval_input(input).to_string(), "[2, 3, 1, 1, 2]");
}

#[test]
fn builtins_are_first_class_values() {
    let input = "let apply = fn(f, x) { f(x) }; apply(len, [1, 2, 3])";
    assert_integer(&eval_input(input), 3, input);
}

#[test]
fn builtins_can_be_shadowed() {
    let input = "let len = fn(x) { 99 }; len([1])";
    assert_integer(&eval_input(input), 99, input);
}

#[test]
fn array_map_with_builtins() {
    // The classic map built from first/rest/push, exercising recursion,
    // closures, and the copy semantics of the array builtins together.
    let input = "
        let map = fn(arr, f) {
            let iter = fn(arr, accumulated) {
                if (len(arr) == 0) {
                    accumulated
                } else {
                    iter(rest(arr), push(accumulated, f(first(arr))));
                }
            };
            iter(arr, []);
        };
        let double = fn(x) { x * 2 };
        map([1, 2, 3, 4], double);";
    assert_eq!(eval_input(input).to_string(), "[2, 4, 6, 8]");
}

#[test]
fn puts_returns_null_and_prints() {
    let program = parse(r#"puts("a", "b"); puts([1, true])"#).expect("parse errors");
    let env = Environment::new();
    let mut print = CollectStringPrint::new();
    let result = Evaluator::new(&mut print).eval_program(&program, &env);
    assert!(matches!(&*result, Object::Null));
    assert_eq!(print.output(), "a\nb\n[1, true]\n");
}
