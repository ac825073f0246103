use pest::iterators::Pair;

use crate::{CanonError, Rule};

/// Reference expression tree used for integrands.
///
/// Heads of compound expressions follow the usual conventions: `Plus`,
/// `Times` and `Power`, with `a/b` stored as `Times[a, Power[b, -1]]` and
/// `-a` as `Times[-1, a]`.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
  Integer(i64),
  Real(f64),
  Identifier(String),
  /// A counted terminal. Coefficients with the same name are told apart by
  /// their creation count.
  Coefficient {
    name: String,
    count: u64,
  },
  FunctionCall {
    name: String,
    args: Vec<Expr>,
  },
}

impl Expr {
  pub fn symbol(name: &str) -> Self {
    Expr::Identifier(name.to_string())
  }

  pub fn coefficient(name: &str, count: u64) -> Self {
    Expr::Coefficient {
      name: name.to_string(),
      count,
    }
  }

  pub fn call(name: &str, args: Vec<Expr>) -> Self {
    Expr::FunctionCall {
      name: name.to_string(),
      args,
    }
  }

  pub fn power(base: Expr, exponent: Expr) -> Self {
    Expr::call("Power", vec![base, exponent])
  }

  pub fn times(factors: Vec<Expr>) -> Self {
    Expr::call("Times", factors)
  }

  pub fn divide(numerator: Expr, denominator: Expr) -> Self {
    Expr::times(vec![
      numerator,
      Expr::power(denominator, Expr::Integer(-1)),
    ])
  }

  /// Replaces identifiers by the counted coefficients they name.
  pub fn bind_coefficients<F>(self, lookup: &F) -> Expr
  where
    F: Fn(&str) -> Option<u64>,
  {
    match self {
      Expr::Identifier(name) => match lookup(&name) {
        Some(count) => Expr::Coefficient { name, count },
        None => Expr::Identifier(name),
      },
      Expr::FunctionCall { name, args } => Expr::FunctionCall {
        name,
        args: args
          .into_iter()
          .map(|arg| arg.bind_coefficients(lookup))
          .collect(),
      },
      other => other,
    }
  }
}

impl std::fmt::Display for Expr {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", expr_to_string(self))
  }
}

/// Builds an `Expr` from a parsed `Expr` (or any nested expression) pair.
pub fn pair_to_expr(pair: Pair<Rule>) -> Result<Expr, CanonError> {
  match pair.as_rule() {
    Rule::Expression | Rule::Expr => {
      let inner = pair
        .into_inner()
        .find(|p| p.as_rule() != Rule::EOI)
        .ok_or_else(|| {
          CanonError::InvalidInputError("empty expression".into())
        })?;
      pair_to_expr(inner)
    }
    Rule::Sum => {
      let mut inner = pair.into_inner();
      let first = next_operand(&mut inner)?;
      let mut terms = vec![first];
      while let Some(op) = inner.next() {
        let operand = next_operand(&mut inner)?;
        if op.as_str() == "-" {
          terms.push(negate(operand));
        } else {
          terms.push(operand);
        }
      }
      Ok(collapse("Plus", terms))
    }
    Rule::Product => {
      let mut inner = pair.into_inner();
      let first = next_operand(&mut inner)?;
      let mut factors = vec![first];
      while let Some(op) = inner.next() {
        let operand = next_operand(&mut inner)?;
        if op.as_str() == "/" {
          factors.push(Expr::power(operand, Expr::Integer(-1)));
        } else {
          factors.push(operand);
        }
      }
      Ok(collapse("Times", factors))
    }
    Rule::Unary => {
      let mut negations = 0;
      let mut operand = None;
      for p in pair.into_inner() {
        match p.as_rule() {
          Rule::Negate => negations += 1,
          _ => operand = Some(pair_to_expr(p)?),
        }
      }
      let operand = operand
        .ok_or_else(|| CanonError::InvalidInputError("dangling '-'".into()))?;
      Ok(if negations % 2 == 1 {
        negate(operand)
      } else {
        operand
      })
    }
    Rule::Power => {
      let mut inner = pair.into_inner();
      let base = next_operand(&mut inner)?;
      match inner.next() {
        Some(exponent) => Ok(Expr::power(base, pair_to_expr(exponent)?)),
        None => Ok(base),
      }
    }
    Rule::Call => {
      let mut inner = pair.into_inner();
      let name = inner
        .next()
        .map(|p| p.as_str().to_string())
        .ok_or_else(|| CanonError::InvalidInputError("missing head".into()))?;
      let args = inner.map(pair_to_expr).collect::<Result<Vec<_>, _>>()?;
      Ok(Expr::FunctionCall { name, args })
    }
    Rule::Integer => pair
      .as_str()
      .parse::<i64>()
      .map(Expr::Integer)
      .map_err(|e| CanonError::InvalidInputError(e.to_string())),
    Rule::Real => pair
      .as_str()
      .parse::<f64>()
      .map(Expr::Real)
      .map_err(|e| CanonError::InvalidInputError(e.to_string())),
    Rule::Identifier => Ok(Expr::Identifier(pair.as_str().to_string())),
    rule => Err(CanonError::InvalidInputError(format!(
      "unexpected {:?} in expression",
      rule
    ))),
  }
}

fn next_operand(
  pairs: &mut pest::iterators::Pairs<Rule>,
) -> Result<Expr, CanonError> {
  let pair = pairs
    .next()
    .ok_or_else(|| CanonError::InvalidInputError("missing operand".into()))?;
  pair_to_expr(pair)
}

fn collapse(head: &str, mut operands: Vec<Expr>) -> Expr {
  if operands.len() == 1 {
    operands.remove(0)
  } else {
    Expr::call(head, operands)
  }
}

fn negate(expr: Expr) -> Expr {
  match expr {
    Expr::Integer(n) => Expr::Integer(-n),
    Expr::Real(x) => Expr::Real(-x),
    other => Expr::times(vec![Expr::Integer(-1), other]),
  }
}

fn precedence(expr: &Expr) -> u8 {
  match expr {
    Expr::FunctionCall { name, args } if name == "Plus" && args.len() > 1 => 1,
    Expr::FunctionCall { name, .. } if name == "Times" => 2,
    Expr::FunctionCall { name, args } if name == "Power" && args.len() == 2 => {
      3
    }
    Expr::Integer(n) if *n < 0 => 2,
    Expr::Real(x) if *x < 0.0 => 2,
    _ => 4,
  }
}

fn wrapped(expr: &Expr, min_precedence: u8) -> String {
  let s = expr_to_string(expr);
  if precedence(expr) < min_precedence {
    format!("({})", s)
  } else {
    s
  }
}

/// Splits `Times[-1, rest...]` into the negated remainder.
fn negated_operand(expr: &Expr) -> Option<Expr> {
  match expr {
    Expr::FunctionCall { name, args }
      if name == "Times"
        && args.len() > 1
        && matches!(args[0], Expr::Integer(-1)) =>
    {
      Some(collapse("Times", args[1..].to_vec()))
    }
    _ => None,
  }
}

fn reciprocal_base(expr: &Expr) -> Option<&Expr> {
  match expr {
    Expr::FunctionCall { name, args }
      if name == "Power"
        && args.len() == 2
        && matches!(args[1], Expr::Integer(-1)) =>
    {
      Some(&args[0])
    }
    _ => None,
  }
}

fn times_to_string(factors: &[Expr]) -> String {
  if factors.len() > 1 && matches!(factors[0], Expr::Integer(-1)) {
    return format!("-{}", times_to_string(&factors[1..]));
  }
  let mut numerator = Vec::new();
  let mut denominator = Vec::new();
  for factor in factors {
    match reciprocal_base(factor) {
      Some(base) => denominator.push(wrapped(base, 4)),
      None => numerator.push(wrapped(factor, 2)),
    }
  }
  let mut out = if numerator.is_empty() {
    "1".to_string()
  } else {
    numerator.join("*")
  };
  for d in denominator {
    out.push('/');
    out.push_str(&d);
  }
  out
}

/// Renders an expression in infix form, e.g. `f + h/3` or `f^2`.
pub fn expr_to_string(expr: &Expr) -> String {
  match expr {
    Expr::Integer(n) => n.to_string(),
    Expr::Real(x) => format!("{:?}", x),
    Expr::Identifier(name) => name.clone(),
    Expr::Coefficient { name, .. } => name.clone(),
    Expr::FunctionCall { name, args } if name == "Plus" && !args.is_empty() => {
      let mut out = expr_to_string(&args[0]);
      for arg in &args[1..] {
        match (negated_operand(arg), arg) {
          (Some(rest), _) => {
            out.push_str(" - ");
            out.push_str(&wrapped(&rest, 2));
          }
          (None, Expr::Integer(n)) if *n < 0 => {
            out.push_str(&format!(" - {}", -n));
          }
          (None, _) => {
            out.push_str(" + ");
            out.push_str(&wrapped(arg, 2));
          }
        }
      }
      out
    }
    Expr::FunctionCall { name, args }
      if name == "Times" && !args.is_empty() =>
    {
      times_to_string(args)
    }
    Expr::FunctionCall { name, args } if name == "Power" && args.len() == 2 => {
      format!("{}^{}", wrapped(&args[0], 4), wrapped(&args[1], 4))
    }
    Expr::FunctionCall { name, args } => {
      let parts: Vec<String> = args.iter().map(expr_to_string).collect();
      format!("{}({})", name, parts.join(", "))
    }
  }
}
