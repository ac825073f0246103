use std::collections::BTreeMap;

use tracing::trace;

use crate::domain::{
  resolve, DomainType, RegionResolver, ResolvedIds, SubdomainKey,
};
use crate::integral::IntegralTerm;
use crate::CanonError;

pub type SubdomainBuckets<E> = BTreeMap<SubdomainKey, Vec<IntegralTerm<E>>>;

/// Splits the integrals of one domain type into per-subdomain buckets.
///
/// Every stored term is restricted to the bucket it lands in. Integrals
/// over `everywhere` are appended to every concrete bucket and also seed an
/// `Otherwise` bucket, which stands for all ids not named explicitly. When
/// only `everywhere` integrals exist, the `Otherwise` bucket is the only
/// one produced.
pub fn group_by_subdomain<'a, E, R>(
  category: DomainType,
  terms: impl IntoIterator<Item = &'a IntegralTerm<E>>,
  regions: &R,
) -> Result<SubdomainBuckets<E>, CanonError>
where
  E: Clone + 'a,
  R: RegionResolver + ?Sized,
{
  let mut buckets: SubdomainBuckets<E> = BTreeMap::new();
  let mut everywhere: Vec<&IntegralTerm<E>> = Vec::new();

  for term in terms {
    match resolve(term.domain_id(), category, regions)? {
      ResolvedIds::Everywhere => everywhere.push(term),
      ResolvedIds::Ids(ids) => {
        for id in ids {
          let key = SubdomainKey::Id(id);
          let restricted = term.restricted_to(key).into_owned();
          buckets.entry(key).or_default().push(restricted);
        }
      }
    }
  }

  if everywhere.is_empty() {
    return Ok(buckets);
  }

  if buckets.contains_key(&SubdomainKey::Otherwise) {
    return Err(CanonError::InvalidOtherwiseError { category });
  }
  trace!(
    %category,
    everywhere = everywhere.len(),
    subdomains = buckets.len(),
    "distributing everywhere integrals"
  );
  for (key, bucket) in buckets.iter_mut() {
    for term in &everywhere {
      bucket.push(term.restricted_to(*key).into_owned());
    }
  }
  let otherwise = everywhere
    .iter()
    .map(|term| term.restricted_to(SubdomainKey::Otherwise).into_owned())
    .collect();
  buckets.insert(SubdomainKey::Otherwise, otherwise);

  Ok(buckets)
}
