//! Canonical representation of integrals over subdomains.
//!
//! Raw integral terms are grouped per domain type and subdomain id, merged
//! per compiler data object, and sorted so that the result does not depend
//! on the order the terms were supplied in.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::algebra::ExprAlgebra;
use crate::domain::{DomainType, RegionResolver, SubdomainKey};
use crate::handle::Handle;
use crate::integral::IntegralTerm;
use crate::CanonError;

pub mod domain_data;
pub mod grouping;
pub mod partition;
pub mod sorting;

pub use domain_data::reduce_domain_data;
pub use grouping::{group_by_subdomain, SubdomainBuckets};
pub use partition::{accumulate, partition_by_compiler_data, Partition};
pub use sorting::sort_groups;

/// One summed integrand together with its compiler data.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalIntegral<E> {
  pub integrand: E,
  pub compiler_data: Option<Handle>,
}

/// Subdomain key to the ordered integrals over that subdomain.
pub type SubdomainTable<E> = BTreeMap<SubdomainKey, Vec<CanonicalIntegral<E>>>;

/// Result of canonicalizing a list of integral terms.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalForm<E> {
  pub integrals: BTreeMap<DomainType, SubdomainTable<E>>,
  pub domain_data: BTreeMap<DomainType, Option<Handle>>,
}

/// Integrals of one domain type over one subdomain, in the flat layout
/// older form consumers expect.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegralData<E> {
  pub domain_type: DomainType,
  pub subdomain: SubdomainKey,
  pub integrals: Vec<IntegralTerm<E>>,
  pub metadata: serde_json::Map<String, serde_json::Value>,
}

/// Builds the canonical group table and domain data table for `terms`.
///
/// Fails fast: no partial result is returned on any error.
pub fn canonicalize<A, R>(
  terms: &[IntegralTerm<A::Expr>],
  algebra: &A,
  regions: &R,
) -> Result<CanonicalForm<A::Expr>, CanonError>
where
  A: ExprAlgebra,
  R: RegionResolver + ?Sized,
{
  let mut by_type: BTreeMap<DomainType, Vec<&IntegralTerm<A::Expr>>> =
    BTreeMap::new();
  for term in terms {
    by_type.entry(term.domain_type()).or_default().push(term);
  }

  let mut integrals = BTreeMap::new();
  let mut domain_data = BTreeMap::new();
  for (category, typed) in by_type {
    let buckets =
      group_by_subdomain(category, typed.iter().copied(), regions)?;
    debug!(
      %category,
      terms = typed.len(),
      subdomains = buckets.len(),
      "canonicalizing integrals"
    );
    integrals.insert(category, canonicalize_buckets(algebra, buckets)?);
    domain_data
      .insert(category, reduce_domain_data(category, typed.iter().copied())?);
  }

  Ok(CanonicalForm {
    integrals,
    domain_data,
  })
}

/// Merges each bucket into one summed integrand per compiler data object
/// and sorts the result.
pub fn canonicalize_buckets<A: ExprAlgebra>(
  algebra: &A,
  buckets: SubdomainBuckets<A::Expr>,
) -> Result<SubdomainTable<A::Expr>, CanonError> {
  let mut table = BTreeMap::new();
  for (key, bucket) in buckets {
    let partitions = partition_by_compiler_data(&bucket);
    trace!(subdomain = %key, partitions = partitions.len(), "merged bucket");
    let mut groups = Vec::with_capacity(partitions.len());
    for partition in partitions {
      let integrand = accumulate(algebra, partition.integrands)?;
      groups.push((
        partition.ordinal,
        CanonicalIntegral {
          integrand,
          compiler_data: partition.compiler_data,
        },
      ));
    }
    table.insert(key, sort_groups(algebra, groups));
  }
  Ok(table)
}

impl<E: Clone> CanonicalForm<E> {
  pub fn is_empty(&self) -> bool {
    self.integrals.is_empty()
  }

  pub fn subdomains(&self, category: DomainType) -> Option<&SubdomainTable<E>> {
    self.integrals.get(&category)
  }

  pub fn integrals_over(
    &self,
    category: DomainType,
    key: SubdomainKey,
  ) -> &[CanonicalIntegral<E>] {
    self
      .integrals
      .get(&category)
      .and_then(|table| table.get(&key))
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  pub fn domain_data_for(&self, category: DomainType) -> Option<&Handle> {
    self.domain_data.get(&category).and_then(|dd| dd.as_ref())
  }

  /// One integral term per (domain type, subdomain, integrand, compiler
  /// data), each carrying its domain type's domain data.
  ///
  /// `Otherwise` entries keep `DomainId::Otherwise`, which `canonicalize`
  /// rejects, so only forms without everywhere integrals can be fed back.
  pub fn flatten(&self) -> Vec<IntegralTerm<E>> {
    self
      .integral_data()
      .into_iter()
      .flat_map(|data| data.integrals)
      .collect()
  }

  /// Groups the flattened integrals by domain type and subdomain.
  pub fn integral_data(&self) -> Vec<IntegralData<E>> {
    let mut records = Vec::new();
    for (category, table) in &self.integrals {
      let domain_data = self.domain_data_for(*category).cloned();
      for (key, integrals) in table {
        let integrals = integrals
          .iter()
          .map(|ci| {
            IntegralTerm::new(
              ci.integrand.clone(),
              *category,
              key.to_domain_id(),
              ci.compiler_data.clone(),
              domain_data.clone(),
            )
          })
          .collect();
        records.push(IntegralData {
          domain_type: *category,
          subdomain: *key,
          integrals,
          metadata: serde_json::Map::new(),
        });
      }
    }
    records
  }

  /// Compiler data objects in order of first appearance across the form.
  pub fn compiler_data(&self) -> Vec<Handle> {
    let mut seen = IndexMap::new();
    for table in self.integrals.values() {
      for integrals in table.values() {
        for ci in integrals {
          if let Some(cd) = &ci.compiler_data {
            seen.entry(cd.id()).or_insert_with(|| cd.clone());
          }
        }
      }
    }
    seen.into_values().collect()
  }
}
