use indexmap::IndexMap;
use uuid::Uuid;

use crate::algebra::ExprAlgebra;
use crate::handle::{identity, Handle};
use crate::integral::IntegralTerm;
use crate::CanonError;

/// Integrands of one bucket sharing the same compiler data object.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition<E> {
  /// Position of the compiler data's first appearance in the bucket.
  pub ordinal: usize,
  pub compiler_data: Option<Handle>,
  pub integrands: Vec<E>,
}

/// Groups a bucket by compiler data identity, in order of first appearance.
/// Terms without compiler data form their own partition.
pub fn partition_by_compiler_data<E: Clone>(
  bucket: &[IntegralTerm<E>],
) -> Vec<Partition<E>> {
  let mut by_identity: IndexMap<Option<Uuid>, Partition<E>> = IndexMap::new();
  for term in bucket {
    let ordinal = by_identity.len();
    by_identity
      .entry(identity(term.compiler_data()))
      .or_insert_with(|| Partition {
        ordinal,
        compiler_data: term.compiler_data().cloned(),
        integrands: Vec::new(),
      })
      .integrands
      .push(term.integrand().clone());
  }
  by_identity.into_values().collect()
}

/// Sums integrands in comparator order so that any permutation of the same
/// integrands yields the identical expression.
pub fn accumulate<A: ExprAlgebra>(
  algebra: &A,
  mut integrands: Vec<A::Expr>,
) -> Result<A::Expr, CanonError> {
  integrands.sort_by(|a, b| algebra.compare(a, b));
  let mut sorted = integrands.into_iter();
  let first = sorted.next().ok_or(CanonError::EmptyAccumulationError)?;
  Ok(sorted.fold(first, |sum, next| algebra.add(sum, next)))
}
