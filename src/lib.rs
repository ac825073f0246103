use pest::Parser;
use pest_derive::Parser;
use thiserror::Error;

pub mod algebra;
pub mod canonical;
pub mod domain;
pub mod handle;
pub mod integral;
pub mod report;
pub mod source;
pub mod syntax;

pub use algebra::{ExprAlgebra, StructuralAlgebra};
pub use canonical::{
  canonicalize, CanonicalForm, CanonicalIntegral, IntegralData,
  SubdomainTable,
};
pub use domain::{
  Domain, DomainId, DomainType, RegionResolver, ResolvedIds, SubdomainKey,
};
pub use handle::Handle;
pub use integral::IntegralTerm;
pub use source::FormSource;
pub use syntax::Expr;

#[derive(Parser)]
#[grammar = "integrals.pest"]
pub struct IntegralParser;

#[derive(Error, Debug)]
pub enum CanonError {
  #[error("Parse error: {0}")]
  ParseError(#[from] Box<pest::error::Error<Rule>>),
  #[error("Integral over {category} resolves to an empty set of subdomain ids")]
  EmptyDomainIdError { category: DomainType },
  #[error("The 'otherwise' subdomain id cannot be supplied for {category}")]
  InvalidOtherwiseError { category: DomainType },
  #[error("Found multiple domain data objects for domain type {category}")]
  ConflictingDomainDataError { category: DomainType },
  #[error("Cannot accumulate an empty list of integrands")]
  EmptyAccumulationError,
  #[error("Subdomain id {id} is listed more than once")]
  DuplicateDomainIdError { id: i64 },
  #[error("Unknown region '{name}' for {category}")]
  UnknownRegionError { category: DomainType, name: String },
  #[error("Region '{0}' is already defined")]
  DuplicateRegionError(String),
  #[error("Unknown domain type '{0}'")]
  UnknownDomainTypeError(String),
  #[error("Invalid input: {0}")]
  InvalidInputError(String),
}

impl IntegralParser {
  pub fn parse_expression(
    input: &str,
  ) -> Result<pest::iterators::Pairs<'_, Rule>, Box<pest::error::Error<Rule>>>
  {
    Self::parse(Rule::Expression, input).map_err(Box::new)
  }

  pub fn parse_form(
    input: &str,
  ) -> Result<pest::iterators::Pairs<'_, Rule>, Box<pest::error::Error<Rule>>>
  {
    Self::parse(Rule::Form, input).map_err(Box::new)
  }
}

/// Parses a single integrand expression such as `f^2 + h/3`.
pub fn parse_expr(input: &str) -> Result<Expr, CanonError> {
  let trimmed = input.trim();
  if trimmed.is_empty() {
    return Err(CanonError::InvalidInputError("empty expression".into()));
  }
  let mut pairs = IntegralParser::parse_expression(trimmed)?;
  let expression = pairs
    .next()
    .ok_or_else(|| CanonError::InvalidInputError(trimmed.to_string()))?;
  let expr = expression
    .into_inner()
    .find(|pair| pair.as_rule() == Rule::Expr)
    .ok_or_else(|| CanonError::InvalidInputError(trimmed.to_string()))?;
  syntax::pair_to_expr(expr)
}

/// Parses a form description and canonicalizes it with the structural
/// expression algebra.
pub fn canonicalize_source(
  input: &str,
) -> Result<(FormSource, CanonicalForm<Expr>), CanonError> {
  let source = FormSource::parse(input)?;
  let form = canonicalize(source.terms(), &StructuralAlgebra, source.domain())?;
  Ok((source, form))
}
