//! Plain text form descriptions.
//!
//! ```text
//! coefficient f g h
//! region DL = (1, 2)
//! cell 0: f
//! cell (0, 1): f^4 compiler_data = C2
//! cell everywhere: h/2 domain_data = D
//! ```

use indexmap::IndexMap;
use pest::iterators::Pair;

use crate::domain::{Domain, DomainId, DomainType};
use crate::handle::Handle;
use crate::integral::IntegralTerm;
use crate::syntax::{pair_to_expr, Expr};
use crate::{CanonError, IntegralParser, Rule};

/// Integral terms, regions and annotation handles read from a description.
#[derive(Debug, Clone, Default)]
pub struct FormSource {
  terms: Vec<IntegralTerm<Expr>>,
  domain: Domain,
  coefficients: IndexMap<String, u64>,
  handles: IndexMap<String, Handle>,
}

impl FormSource {
  pub fn parse(input: &str) -> Result<Self, CanonError> {
    let mut source = FormSource {
      domain: Domain::new("domain"),
      ..FormSource::default()
    };
    let form = IntegralParser::parse_form(input)?
      .next()
      .ok_or_else(|| CanonError::InvalidInputError("empty form".into()))?;
    for statement in form.into_inner() {
      match statement.as_rule() {
        Rule::CoefficientDecl => source.declare_coefficients(statement),
        Rule::RegionDecl => source.declare_region(statement)?,
        Rule::IntegralDecl => source.add_integral(statement)?,
        _ => {}
      }
    }
    Ok(source)
  }

  pub fn terms(&self) -> &[IntegralTerm<Expr>] {
    &self.terms
  }

  pub fn domain(&self) -> &Domain {
    &self.domain
  }

  /// The handle created for an annotation label, if the label was used.
  pub fn handle(&self, label: &str) -> Option<&Handle> {
    self.handles.get(label)
  }

  pub fn coefficient_count(&self, name: &str) -> Option<u64> {
    self.coefficients.get(name).copied()
  }

  fn declare_coefficients(&mut self, decl: Pair<Rule>) {
    for name in decl.into_inner() {
      let next = self.coefficients.len() as u64;
      self
        .coefficients
        .entry(name.as_str().to_string())
        .or_insert(next);
    }
  }

  fn declare_region(&mut self, decl: Pair<Rule>) -> Result<(), CanonError> {
    let mut inner = decl.into_inner();
    let name = inner
      .next()
      .ok_or_else(|| {
        CanonError::InvalidInputError("missing region name".into())
      })?;
    let ids = inner
      .next()
      .ok_or_else(|| {
        CanonError::InvalidInputError("missing region ids".into())
      })?;
    self.domain.add_region(name.as_str(), parse_ids(ids)?)
  }

  fn add_integral(&mut self, decl: Pair<Rule>) -> Result<(), CanonError> {
    let mut inner = decl.into_inner();
    let missing =
      || CanonError::InvalidInputError("incomplete integral".into());
    let category: DomainType =
      inner.next().ok_or_else(missing)?.as_str().parse()?;
    let domain_id = parse_domain_spec(inner.next().ok_or_else(missing)?)?;
    let coefficients = &self.coefficients;
    let integrand = pair_to_expr(inner.next().ok_or_else(missing)?)?
      .bind_coefficients(&|name: &str| coefficients.get(name).copied());

    let mut compiler_data = None;
    let mut domain_data = None;
    for annotation in inner {
      let mut parts = annotation.into_inner();
      let key = parts.next().ok_or_else(missing)?;
      let label = parts.next().ok_or_else(missing)?.as_str();
      let handle = self
        .handles
        .entry(label.to_string())
        .or_insert_with(|| Handle::labelled(label))
        .clone();
      match key.as_rule() {
        Rule::CompilerDataKey => compiler_data = Some(handle),
        _ => domain_data = Some(handle),
      }
    }

    self.terms.push(IntegralTerm::new(
      integrand,
      category,
      domain_id,
      compiler_data,
      domain_data,
    ));
    Ok(())
  }
}

fn parse_int(pair: Pair<Rule>) -> Result<i64, CanonError> {
  pair
    .as_str()
    .parse::<i64>()
    .map_err(|e| CanonError::InvalidInputError(e.to_string()))
}

fn parse_ids(tuple: Pair<Rule>) -> Result<Vec<i64>, CanonError> {
  tuple.into_inner().map(parse_int).collect()
}

fn parse_domain_spec(spec: Pair<Rule>) -> Result<DomainId, CanonError> {
  let inner = spec
    .into_inner()
    .next()
    .ok_or_else(|| CanonError::InvalidInputError("missing subdomain".into()))?;
  match inner.as_rule() {
    Rule::Everywhere => Ok(DomainId::Everywhere),
    Rule::IdTuple => Ok(DomainId::ExplicitSet(parse_ids(inner)?)),
    Rule::SignedInteger => Ok(DomainId::Explicit(parse_int(inner)?)),
    _ => Ok(DomainId::NamedRegion(inner.as_str().to_string())),
  }
}
