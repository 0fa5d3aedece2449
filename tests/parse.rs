use numeq::{EngineError, compile};

fn assert_same_behavior(a: &str, b: &str, samples: &[f64]) {
    let fa = compile(a).expect("compile lhs");
    let fb = compile(b).expect("compile rhs");
    for &x in samples {
        let va = fa.eval(x);
        let vb = fb.eval(x);
        assert!(
            (va - vb).abs() < 1e-12 || (va.is_nan() && vb.is_nan()),
            "{a} and {b} disagree at x = {x}: {va} vs {vb}"
        );
    }
}

#[test]
fn implicit_multiplication_matches_explicit_form() {
    let samples = [-2.5, -1.0, 0.0, 0.5, 1.0, 3.0];
    assert_same_behavior("2x", "2*x", &samples);
    assert_same_behavior("x(x+1)", "x*(x+1)", &samples);
    assert_same_behavior("(x+1)(x-1)", "(x+1)*(x-1)", &samples);
    assert_same_behavior("2sin(x)", "2*sin(x)", &samples);
    assert_same_behavior("2pi x", "2*pi*x", &samples);
    // variable/closing-paren followed by a number multiplies too
    assert_same_behavior("x2", "x*2", &samples);
    assert_same_behavior("(x+1)2", "(x+1)*2", &samples);
    assert_same_behavior("pi2", "pi*2", &samples);
}

#[test]
fn equation_compiles_to_residual() {
    let f = compile("x^2 = 4").expect("compile equation");
    assert_eq!(f.eval(2.0), 0.0);
    assert_eq!(f.eval(3.0), 5.0);

    // precedence must not leak across the inserted minus
    let g = compile("x + 1 = x - 1").expect("compile equation");
    assert_eq!(g.eval(10.0), 2.0);
}

#[test]
fn constants_and_log_synonyms() {
    let f = compile("cos(pi)").expect("compile cos(pi)");
    assert!((f.eval(0.0) + 1.0).abs() < 1e-12);

    let samples = [0.5, 1.0, 2.0, 10.0];
    assert_same_behavior("ln(x)", "log(x)", &samples);

    let g = compile("log10(100)").expect("compile log10");
    assert!((g.eval(0.0) - 2.0).abs() < 1e-12);

    let h = compile("e^x").expect("compile e^x");
    assert!((h.eval(1.0) - std::f64::consts::E).abs() < 1e-12);
}

#[test]
fn case_and_whitespace_are_normalized() {
    let samples = [0.0, 1.0, 2.0];
    assert_same_behavior("SIN( X ) + PI", "sin(x)+pi", &samples);
}

#[test]
fn mismatched_parentheses_are_a_parse_error() {
    let err = compile("(2*x").expect_err("unbalanced expression");
    assert!(matches!(err, EngineError::Parse(_)));
    assert!(err.to_string().contains("mismatched parentheses"));
}

#[test]
fn unknown_identifier_is_named_in_the_error() {
    let err = compile("foo(x)").expect_err("unknown function");
    assert!(matches!(err, EngineError::Parse(_)));
    assert!(err.to_string().contains("foo"));

    let err = compile("2*y").expect_err("unknown variable");
    assert!(err.to_string().contains("y"));
}

#[test]
fn degenerate_inputs_are_parse_errors() {
    assert!(matches!(compile(""), Err(EngineError::Parse(_))));
    assert!(matches!(compile("  "), Err(EngineError::Parse(_))));
    assert!(matches!(compile("1 = 2 = 3"), Err(EngineError::Parse(_))));
    assert!(matches!(compile("x $ 2"), Err(EngineError::Parse(_))));
    assert!(matches!(compile("2 +"), Err(EngineError::Parse(_))));
}

#[test]
fn evaluation_is_pure_and_bit_identical() {
    let f = compile("sin(x)*exp(-x^2) + x/7").expect("compile");
    for &x in &[-3.0, 0.0, 0.1234, 42.0] {
        assert_eq!(f.eval(x).to_bits(), f.eval(x).to_bits());
    }
}

#[test]
fn domain_violations_yield_sentinels_not_errors() {
    let f = compile("1/x").expect("compile 1/x");
    assert!(f.eval(0.0).is_infinite());

    let g = compile("sqrt(x - 4)").expect("compile sqrt");
    assert!(g.eval(0.0).is_nan());
    assert_eq!(g.eval(8.0), 2.0);
}
