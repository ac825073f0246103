use super::*;
use canonical_integrals::algebra::cmp_expr;
use std::cmp::Ordering;

mod parsing {
  use super::*;

  fn roundtrip(input: &str) -> String {
    parse_expr(input).unwrap().to_string()
  }

  #[test]
  fn atoms() {
    assert_eq!(parse_expr("42").unwrap(), Expr::Integer(42));
    assert_eq!(parse_expr("0.5").unwrap(), Expr::Real(0.5));
    assert_eq!(parse_expr("u_h").unwrap(), Expr::symbol("u_h"));
  }

  #[test]
  fn precedence() {
    assert_eq!(
      parse_expr("a + b*c^2").unwrap(),
      Expr::call(
        "Plus",
        vec![
          Expr::symbol("a"),
          Expr::times(vec![
            Expr::symbol("b"),
            Expr::power(Expr::symbol("c"), Expr::Integer(2)),
          ]),
        ]
      )
    );
  }

  #[test]
  fn division_and_negation() {
    assert_eq!(
      parse_expr("h/3").unwrap(),
      Expr::divide(Expr::symbol("h"), Expr::Integer(3))
    );
    assert_eq!(
      parse_expr("-f").unwrap(),
      Expr::times(vec![Expr::Integer(-1), Expr::symbol("f")])
    );
    assert_eq!(parse_expr("--2").unwrap(), Expr::Integer(2));
  }

  #[test]
  fn calls() {
    assert_eq!(
      parse_expr("inner(grad(u), grad(v))").unwrap(),
      Expr::call(
        "inner",
        vec![
          Expr::call("grad", vec![Expr::symbol("u")]),
          Expr::call("grad", vec![Expr::symbol("v")]),
        ]
      )
    );
  }

  #[test]
  fn printing() {
    assert_eq!(roundtrip("f + g"), "f + g");
    assert_eq!(roundtrip("f - g"), "f - g");
    assert_eq!(roundtrip("(f + g)*h"), "(f + g)*h");
    assert_eq!(roundtrip("(f + g)^2"), "(f + g)^2");
    assert_eq!(roundtrip("f^2/3"), "f^2/3");
    assert_eq!(roundtrip("-f*g"), "-f*g");
    assert_eq!(roundtrip("f - 2"), "f - 2");
    assert_eq!(roundtrip("sin(f)*dx"), "sin(f)*dx");
  }

  #[test]
  fn malformed_input() {
    assert!(matches!(parse_expr("f +"), Err(CanonError::ParseError(_))));
    assert!(matches!(parse_expr("  "), Err(CanonError::InvalidInputError(_))));
  }
}

mod ordering {
  use super::*;

  #[test]
  fn kinds_are_ordered() {
    let ordered = [
      Expr::Integer(10),
      Expr::Real(-1.0),
      Expr::symbol("a"),
      f(),
      pow(f(), 2),
    ];
    for pair in ordered.windows(2) {
      assert_eq!(cmp_expr(&pair[0], &pair[1]), Ordering::Less);
    }
  }

  #[test]
  fn coefficients_order_by_count() {
    let late_a = Expr::coefficient("a", 9);
    let early_z = Expr::coefficient("z", 0);
    assert_eq!(cmp_expr(&early_z, &late_a), Ordering::Less);
  }

  #[test]
  fn compounds_order_by_head_arity_then_operands() {
    let plus2 = Expr::call("Plus", vec![f(), g()]);
    let plus3 = Expr::call("Plus", vec![f(), g(), h()]);
    let power = pow(f(), 2);
    assert_eq!(cmp_expr(&plus2, &plus3), Ordering::Less);
    assert_eq!(cmp_expr(&plus3, &power), Ordering::Less);
    assert_eq!(cmp_expr(&pow(f(), 2), &pow(f(), 3)), Ordering::Less);
    assert_eq!(cmp_expr(&pow(g(), 2), &pow(f(), 3)), Ordering::Greater);
  }

  #[test]
  fn identical_structures_are_equal() {
    let a = parse_expr("f*g + 2").unwrap();
    let b = parse_expr("f*g + 2").unwrap();
    assert_eq!(cmp_expr(&a, &b), Ordering::Equal);
  }
}
