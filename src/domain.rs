use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;

use crate::CanonError;

/// The kind of domain an integral is taken over.
///
/// Declaration order is the canonical iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DomainType {
  Cell,
  ExteriorFacet,
  InteriorFacet,
  Point,
  MacroCell,
  Surface,
}

impl DomainType {
  pub const ALL: [DomainType; 6] = [
    DomainType::Cell,
    DomainType::ExteriorFacet,
    DomainType::InteriorFacet,
    DomainType::Point,
    DomainType::MacroCell,
    DomainType::Surface,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      DomainType::Cell => "cell",
      DomainType::ExteriorFacet => "exterior_facet",
      DomainType::InteriorFacet => "interior_facet",
      DomainType::Point => "point",
      DomainType::MacroCell => "macro_cell",
      DomainType::Surface => "surface",
    }
  }
}

impl fmt::Display for DomainType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for DomainType {
  type Err = CanonError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    DomainType::ALL
      .into_iter()
      .find(|dt| dt.as_str() == s)
      .ok_or_else(|| CanonError::UnknownDomainTypeError(s.to_string()))
  }
}

/// Subdomain id specification attached to an integral.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DomainId {
  Explicit(i64),
  ExplicitSet(Vec<i64>),
  NamedRegion(String),
  Everywhere,
  /// Only ever produced while grouping; never valid as input.
  Otherwise,
}

impl fmt::Display for DomainId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      DomainId::Explicit(id) => write!(f, "{}", id),
      DomainId::ExplicitSet(ids) => {
        let parts: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
        write!(f, "({})", parts.join(", "))
      }
      DomainId::NamedRegion(name) => f.write_str(name),
      DomainId::Everywhere => f.write_str("everywhere"),
      DomainId::Otherwise => f.write_str("otherwise"),
    }
  }
}

/// A domain id specification after region lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedIds {
  Ids(Vec<i64>),
  Everywhere,
}

/// Key of one subdomain bucket in a canonical table. Concrete ids sort
/// ascending, `Otherwise` sorts last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SubdomainKey {
  Id(i64),
  Otherwise,
}

impl SubdomainKey {
  pub fn to_domain_id(self) -> DomainId {
    match self {
      SubdomainKey::Id(id) => DomainId::Explicit(id),
      SubdomainKey::Otherwise => DomainId::Otherwise,
    }
  }
}

impl fmt::Display for SubdomainKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SubdomainKey::Id(id) => write!(f, "{}", id),
      SubdomainKey::Otherwise => f.write_str("otherwise"),
    }
  }
}

/// Looks up the subdomain ids making up a named region.
pub trait RegionResolver {
  fn region_ids(&self, category: DomainType, name: &str) -> Option<Vec<i64>>;

  /// Whether `name` refers to the whole domain rather than a region.
  fn is_domain(&self, _name: &str) -> bool {
    false
  }
}

impl<F> RegionResolver for F
where
  F: Fn(DomainType, &str) -> Option<Vec<i64>>,
{
  fn region_ids(&self, category: DomainType, name: &str) -> Option<Vec<i64>> {
    self(category, name)
  }
}

fn check_unique(ids: &[i64]) -> Result<(), CanonError> {
  let mut seen = HashSet::new();
  for id in ids {
    if !seen.insert(*id) {
      return Err(CanonError::DuplicateDomainIdError { id: *id });
    }
  }
  Ok(())
}

/// Normalizes a domain id specification into concrete ids or `Everywhere`.
///
/// `Everywhere` is never expanded here; that happens during grouping where
/// the full set of ids in play is known.
pub fn resolve<R>(
  spec: &DomainId,
  category: DomainType,
  regions: &R,
) -> Result<ResolvedIds, CanonError>
where
  R: RegionResolver + ?Sized,
{
  let ids = match spec {
    DomainId::Explicit(id) => vec![*id],
    DomainId::ExplicitSet(ids) => ids.clone(),
    DomainId::NamedRegion(name) if regions.is_domain(name) => {
      return Ok(ResolvedIds::Everywhere)
    }
    DomainId::NamedRegion(name) => regions
      .region_ids(category, name)
      .ok_or_else(|| CanonError::UnknownRegionError {
        category,
        name: name.clone(),
      })?,
    DomainId::Everywhere => return Ok(ResolvedIds::Everywhere),
    DomainId::Otherwise => {
      return Err(CanonError::InvalidOtherwiseError { category })
    }
  };
  if ids.is_empty() {
    return Err(CanonError::EmptyDomainIdError { category });
  }
  check_unique(&ids)?;
  Ok(ResolvedIds::Ids(ids))
}

/// A top level domain with its registry of named regions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Domain {
  name: String,
  regions: IndexMap<String, Vec<i64>>,
}

impl Domain {
  pub fn new(name: &str) -> Self {
    Domain {
      name: name.to_string(),
      regions: IndexMap::new(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  /// Registers a named group of subdomain ids. The domain's own name is
  /// reserved.
  pub fn add_region(
    &mut self,
    name: &str,
    ids: Vec<i64>,
  ) -> Result<(), CanonError> {
    if name == self.name || self.regions.contains_key(name) {
      return Err(CanonError::DuplicateRegionError(name.to_string()));
    }
    check_unique(&ids)?;
    self.regions.insert(name.to_string(), ids);
    Ok(())
  }

  /// Returns the name of the numbered region holding exactly `id`,
  /// registering it on first use. Fails when that name is already taken by
  /// a region with other ids.
  pub fn subdomain(&mut self, id: i64) -> Result<String, CanonError> {
    let name = format!("{}_{}", self.name, id);
    let ids = self.regions.entry(name.clone()).or_insert_with(|| vec![id]);
    if ids.as_slice() != [id] {
      return Err(CanonError::DuplicateRegionError(name));
    }
    Ok(name)
  }

  pub fn region(&self, name: &str) -> Option<&[i64]> {
    self.regions.get(name).map(|ids| ids.as_slice())
  }

  /// Region names in registration order.
  pub fn region_names(&self) -> Vec<&str> {
    self.regions.keys().map(|k| k.as_str()).collect()
  }

  pub fn regions(&self) -> impl Iterator<Item = (&str, &[i64])> {
    self
      .regions
      .iter()
      .map(|(name, ids)| (name.as_str(), ids.as_slice()))
  }
}

impl RegionResolver for Domain {
  fn region_ids(&self, _category: DomainType, name: &str) -> Option<Vec<i64>> {
    self.region(name).map(|ids| ids.to_vec())
  }

  fn is_domain(&self, name: &str) -> bool {
    name == self.name
  }
}
