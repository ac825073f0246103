use std::cmp::Ordering;

use crate::syntax::Expr;

/// Capabilities the canonicalization pipeline needs from an expression
/// system: a deterministic total order and addition.
///
/// `compare` must be total and consistent for structurally identical
/// expressions. `add` need not rewrite associatively, but summing the same
/// comparator-sorted sequence must always produce the same expression.
pub trait ExprAlgebra {
  type Expr: Clone;

  fn compare(&self, a: &Self::Expr, b: &Self::Expr) -> Ordering;

  fn add(&self, a: Self::Expr, b: Self::Expr) -> Self::Expr;
}

/// Structural ordering and `Plus` construction over [`Expr`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralAlgebra;

impl ExprAlgebra for StructuralAlgebra {
  type Expr = Expr;

  fn compare(&self, a: &Expr, b: &Expr) -> Ordering {
    cmp_expr(a, b)
  }

  fn add(&self, a: Expr, b: Expr) -> Expr {
    plus(a, b)
  }
}

fn kind_rank(e: &Expr) -> u8 {
  match e {
    Expr::Integer(_) => 0,
    Expr::Real(_) => 1,
    Expr::Identifier(_) => 2,
    Expr::Coefficient { .. } => 3,
    Expr::FunctionCall { .. } => 4,
  }
}

/// Total structural order: node kind first, then the node's own data, then
/// operands left to right. Shorter operand lists sort first.
pub fn cmp_expr(a: &Expr, b: &Expr) -> Ordering {
  let by_kind = kind_rank(a).cmp(&kind_rank(b));
  if by_kind != Ordering::Equal {
    return by_kind;
  }
  match (a, b) {
    (Expr::Integer(x), Expr::Integer(y)) => x.cmp(y),
    (Expr::Real(x), Expr::Real(y)) => x.total_cmp(y),
    (Expr::Identifier(x), Expr::Identifier(y)) => x.cmp(y),
    (
      Expr::Coefficient {
        name: an,
        count: ac,
      },
      Expr::Coefficient {
        name: bn,
        count: bc,
      },
    ) => ac.cmp(bc).then_with(|| an.cmp(bn)),
    (
      Expr::FunctionCall {
        name: an,
        args: aa,
      },
      Expr::FunctionCall {
        name: bn,
        args: ba,
      },
    ) => an
      .cmp(bn)
      .then_with(|| aa.len().cmp(&ba.len()))
      .then_with(|| {
        aa.iter()
          .zip(ba.iter())
          .map(|(x, y)| cmp_expr(x, y))
          .find(|o| *o != Ordering::Equal)
          .unwrap_or(Ordering::Equal)
      }),
    // Same rank implies same variant.
    _ => Ordering::Equal,
  }
}

/// `Plus[a, b]`, splicing in the operands of nested `Plus` expressions so
/// that a left fold yields one flat sum.
pub fn plus(a: Expr, b: Expr) -> Expr {
  let mut terms = Vec::new();
  for operand in [a, b] {
    match operand {
      Expr::FunctionCall { name, args } if name == "Plus" => {
        terms.extend(args);
      }
      other => terms.push(other),
    }
  }
  Expr::call("Plus", terms)
}
