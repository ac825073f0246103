use std::borrow::Cow;
use std::fmt;

use crate::domain::{DomainId, DomainType, SubdomainKey};
use crate::handle::{label, Handle};
use crate::syntax::Expr;

/// An integrand over one kind of domain, scoped to a set of subdomain ids
/// and carrying two opaque annotations.
///
/// Terms never change after construction; the `*_to`/`*_with` methods hand
/// back the same term when nothing would change.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegralTerm<E = Expr> {
  integrand: E,
  domain_type: DomainType,
  domain_id: DomainId,
  compiler_data: Option<Handle>,
  domain_data: Option<Handle>,
}

impl<E: Clone> IntegralTerm<E> {
  pub fn new(
    integrand: E,
    domain_type: DomainType,
    domain_id: DomainId,
    compiler_data: Option<Handle>,
    domain_data: Option<Handle>,
  ) -> Self {
    IntegralTerm {
      integrand,
      domain_type,
      domain_id,
      compiler_data,
      domain_data,
    }
  }

  /// Shorthand for an unannotated term.
  pub fn plain(
    integrand: E,
    domain_type: DomainType,
    domain_id: DomainId,
  ) -> Self {
    IntegralTerm::new(integrand, domain_type, domain_id, None, None)
  }

  pub fn integrand(&self) -> &E {
    &self.integrand
  }

  pub fn domain_type(&self) -> DomainType {
    self.domain_type
  }

  pub fn domain_id(&self) -> &DomainId {
    &self.domain_id
  }

  pub fn compiler_data(&self) -> Option<&Handle> {
    self.compiler_data.as_ref()
  }

  pub fn domain_data(&self) -> Option<&Handle> {
    self.domain_data.as_ref()
  }

  /// The same integral restricted to a single subdomain bucket.
  pub fn restricted_to(&self, key: SubdomainKey) -> Cow<'_, Self> {
    let domain_id = key.to_domain_id();
    if self.domain_id == domain_id {
      return Cow::Borrowed(self);
    }
    Cow::Owned(IntegralTerm {
      domain_id,
      ..self.clone()
    })
  }

  /// Replaces the annotations that are given, keeping the others.
  pub fn annotated_with(
    &self,
    compiler_data: Option<Handle>,
    domain_data: Option<Handle>,
  ) -> Cow<'_, Self> {
    let compiler_data = compiler_data.or_else(|| self.compiler_data.clone());
    let domain_data = domain_data.or_else(|| self.domain_data.clone());
    if compiler_data == self.compiler_data && domain_data == self.domain_data {
      return Cow::Borrowed(self);
    }
    Cow::Owned(IntegralTerm {
      compiler_data,
      domain_data,
      ..self.clone()
    })
  }
}

impl<E: fmt::Display> fmt::Display for IntegralTerm<E> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "I({}, {}, {}, {}, {})",
      self.integrand,
      self.domain_type,
      self.domain_id,
      label(self.compiler_data.as_ref()),
      label(self.domain_data.as_ref())
    )
  }
}
