use crate::algebra::ExprAlgebra;

use super::CanonicalIntegral;

/// Orders summed integrals by integrand, falling back to the compiler data's
/// first-seen ordinal when two integrands compare equal.
pub fn sort_groups<A: ExprAlgebra>(
  algebra: &A,
  mut groups: Vec<(usize, CanonicalIntegral<A::Expr>)>,
) -> Vec<CanonicalIntegral<A::Expr>> {
  groups.sort_by(|(a_ord, a), (b_ord, b)| {
    algebra
      .compare(&a.integrand, &b.integrand)
      .then_with(|| a_ord.cmp(b_ord))
  });
  groups.into_iter().map(|(_, group)| group).collect()
}
