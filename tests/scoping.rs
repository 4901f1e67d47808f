mod common;

use common::{display_output, run_capture, run_error};
use cspi::interpreter::Error;

// =============================================================================
// BLOCK SCOPES
// =============================================================================

#[test]
fn test_branch_locals_disappear_but_outer_assignments_stick() {
    let source = r#"
PROCEDURE run() {
    x ← 1
    IF (true) {
        x ← 2
        y ← 3
    }
    DISPLAY(x)
    DISPLAY(y)
}
run()
"#;
    let (out, result) = run_capture(source);
    assert_eq!(out, vec!["2"]);
    match result {
        Err(Error::UndefinedName { name, .. }) => assert_eq!(name, "y"),
        other => panic!("expected unresolved `y`, got {:?}", other),
    }
}

#[test]
fn test_assignment_writes_both_enclosing_and_inner_scope() {
    let source = r#"
PROCEDURE run() {
    x ← 1
    IF (true) {
        IF (true) {
            x ← 5
            DISPLAY(x)
        }
        DISPLAY(x)
    }
    DISPLAY(x)
}
run()
"#;
    assert_eq!(display_output(source), vec!["5", "5", "5"]);
}

#[test]
fn test_loop_accumulates_into_enclosing_scope() {
    let source = r#"
PROCEDURE sum(values) {
    total ← 0
    FOR EACH n IN values {
        total ← total + n
    }
    RETURN total
}
DISPLAY(sum([1, 2, 3, 4]))
"#;
    assert_eq!(display_output(source), vec!["10"]);
}

// =============================================================================
// THE GLOBAL SCOPE
// =============================================================================

#[test]
fn test_nested_blocks_cannot_overwrite_globals() {
    let source = r#"
count ← 0
REPEAT 4 TIMES {
    count ← count + 1
    DISPLAY(count)
}
IF (true) {
    count ← 99
}
DISPLAY(count)
"#;
    assert_eq!(display_output(source), vec!["1", "1", "1", "1", "0"]);
}

#[test]
fn test_procedures_read_globals() {
    let source = "rate ← 2\nPROCEDURE scale(x) {\n    RETURN x * rate\n}\nDISPLAY(scale(4))";
    assert_eq!(display_output(source), vec!["8"]);
}

#[test]
fn test_procedures_cannot_overwrite_globals() {
    let source = r#"
count ← 0
PROCEDURE bump() {
    count ← count + 1
    RETURN count
}
DISPLAY(bump())
DISPLAY(bump())
DISPLAY(count)
"#;
    assert_eq!(display_output(source), vec!["1", "1", "0"]);
}

#[test]
fn test_parameters_shadow_globals() {
    let source = "x ← 1\nPROCEDURE echo(x) {\n    RETURN x\n}\nDISPLAY(echo(5))\nDISPLAY(x)";
    assert_eq!(display_output(source), vec!["5", "1"]);
}

#[test]
fn test_assigning_a_parameter_leaves_the_global_alone() {
    let source = r#"
x ← 10
PROCEDURE f(x) {
    x ← x + 1
    RETURN x
}
DISPLAY(f(1))
DISPLAY(x)
"#;
    assert_eq!(display_output(source), vec!["2", "10"]);
}

#[test]
fn test_globals_updated_at_top_level() {
    let source = "x ← 1\nx ← x + 1\nDISPLAY(x)";
    assert_eq!(display_output(source), vec!["2"]);
}

// =============================================================================
// PROCEDURE SCOPES
// =============================================================================

#[test]
fn test_procedures_are_not_closures() {
    let source = r#"
PROCEDURE outer(a) {
    PROCEDURE inner() {
        RETURN a
    }
    RETURN inner()
}
outer(1)
"#;
    let error = run_error(source);
    assert_eq!(error.to_string(), "unresolved name `a`");
}

#[test]
fn test_callee_cannot_see_caller_locals() {
    let source = r#"
PROCEDURE show() {
    DISPLAY(local)
}
PROCEDURE caller() {
    local ← 1
    show()
}
caller()
"#;
    assert!(matches!(run_error(source), Error::UndefinedName { .. }));
}

#[test]
fn test_recursion() {
    let source = r#"
PROCEDURE fact(n) {
    IF (n ≤ 1) {
        RETURN 1
    }
    RETURN n * fact(n - 1)
}
PROCEDURE fib(n) {
    IF (n < 2) {
        RETURN n
    }
    RETURN fib(n - 1) + fib(n - 2)
}
DISPLAY(fact(5))
DISPLAY(fib(10))
"#;
    assert_eq!(display_output(source), vec!["120", "55"]);
}

#[test]
fn test_procedure_must_be_defined_before_call() {
    let source = "greet()\nPROCEDURE greet() {\n    DISPLAY(\"hi\")\n}";
    assert!(matches!(run_error(source), Error::UndefinedName { .. }));
}

#[test]
fn test_procedure_without_return_yields_null() {
    let source = "PROCEDURE nothing() {\n}\nx ← nothing()\nDISPLAY(x)";
    let error = run_error(source);
    assert_eq!(error.to_string(), "cannot display null");
}
