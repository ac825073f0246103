use indexmap::IndexMap;

use crate::domain::DomainType;
use crate::handle::Handle;
use crate::integral::IntegralTerm;
use crate::CanonError;

/// Finds the single domain data object used by the integrals of one domain
/// type. More than one distinct object is a conflict.
pub fn reduce_domain_data<'a, E: 'a>(
  category: DomainType,
  terms: impl IntoIterator<Item = &'a IntegralTerm<E>>,
) -> Result<Option<Handle>, CanonError>
where
  E: Clone,
{
  let mut found = IndexMap::new();
  for term in terms {
    if let Some(dd) = term.domain_data() {
      found.entry(dd.id()).or_insert_with(|| dd.clone());
    }
  }
  if found.len() > 1 {
    return Err(CanonError::ConflictingDomainDataError { category });
  }
  Ok(found.into_values().next())
}
