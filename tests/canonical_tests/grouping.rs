use super::*;
use canonical_integrals::canonical::group_by_subdomain;
use std::borrow::Cow;

mod restriction {
  use super::*;

  #[test]
  fn restricted_term_keeps_everything_but_ids() {
    let cd = Handle::labelled("cd");
    let dd = Handle::labelled("dd");
    let term = IntegralTerm::new(
      f(),
      DomainType::ExteriorFacet,
      DomainId::ExplicitSet(vec![1, 2]),
      Some(cd.clone()),
      Some(dd.clone()),
    );
    let restricted = term.restricted_to(SubdomainKey::Id(2)).into_owned();
    assert_eq!(restricted.integrand(), &f());
    assert_eq!(restricted.domain_type(), DomainType::ExteriorFacet);
    assert_eq!(restricted.domain_id(), &DomainId::Explicit(2));
    assert!(restricted.compiler_data().unwrap().is(&cd));
    assert!(restricted.domain_data().unwrap().is(&dd));
    assert_eq!(term.domain_id(), &DomainId::ExplicitSet(vec![1, 2]));
  }

  #[test]
  fn restricting_to_own_id_returns_same_term() {
    let term = cell(f(), DomainId::Explicit(3));
    match term.restricted_to(SubdomainKey::Id(3)) {
      Cow::Borrowed(same) => assert!(std::ptr::eq(same, &term)),
      Cow::Owned(_) => panic!("expected the original term"),
    }
  }

  #[test]
  fn singleton_set_is_rewritten_to_explicit() {
    let term = cell(f(), DomainId::ExplicitSet(vec![3]));
    let restricted = term.restricted_to(SubdomainKey::Id(3));
    assert!(matches!(restricted, Cow::Owned(_)));
    assert_eq!(restricted.domain_id(), &DomainId::Explicit(3));
  }

  #[test]
  fn annotating_with_same_handles_is_a_no_op() {
    let cd = Handle::labelled("cd");
    let term = cell_with(f(), DomainId::Explicit(0), Some(&cd), None);
    assert!(matches!(
      term.annotated_with(Some(cd.clone()), None),
      Cow::Borrowed(_)
    ));
    assert!(matches!(term.annotated_with(None, None), Cow::Borrowed(_)));
  }

  #[test]
  fn annotating_replaces_only_given_handles() {
    let cd = Handle::labelled("cd");
    let other = Handle::labelled("cd");
    let dd = Handle::labelled("dd");
    let term = cell_with(f(), DomainId::Explicit(0), Some(&cd), None);
    let annotated = term.annotated_with(None, Some(dd.clone())).into_owned();
    assert!(annotated.compiler_data().unwrap().is(&cd));
    assert!(annotated.domain_data().unwrap().is(&dd));
    let replaced = term.annotated_with(Some(other.clone()), None).into_owned();
    assert!(replaced.compiler_data().unwrap().is(&other));
    assert!(term.compiler_data().unwrap().is(&cd));
  }
}

mod buckets {
  use super::*;

  fn group(
    terms: &[IntegralTerm],
  ) -> Result<
    std::collections::BTreeMap<SubdomainKey, Vec<IntegralTerm>>,
    CanonError,
  > {
    group_by_subdomain(DomainType::Cell, terms.iter(), &Domain::new("D"))
  }

  #[test]
  fn tuple_terms_land_in_each_bucket() {
    let buckets =
      group(&[cell(f(), DomainId::ExplicitSet(vec![2, 0]))]).unwrap();
    assert_eq!(
      buckets.keys().copied().collect::<Vec<_>>(),
      vec![SubdomainKey::Id(0), SubdomainKey::Id(2)]
    );
    for (key, bucket) in &buckets {
      assert_eq!(bucket.len(), 1);
      assert_eq!(bucket[0].domain_id(), &key.to_domain_id());
    }
  }

  #[test]
  fn everywhere_terms_reach_every_bucket_and_otherwise() {
    let buckets = group(&[
      cell(f(), DomainId::Explicit(1)),
      cell(g(), DomainId::Everywhere),
      cell(h(), DomainId::Explicit(4)),
    ])
    .unwrap();
    assert_eq!(buckets.len(), 3);
    for (key, bucket) in &buckets {
      let last = bucket.last().unwrap();
      assert_eq!(last.integrand(), &g());
      assert_eq!(last.domain_id(), &key.to_domain_id());
    }
    assert_eq!(buckets[&SubdomainKey::Otherwise].len(), 1);
    assert_eq!(
      buckets[&SubdomainKey::Otherwise][0].domain_id(),
      &DomainId::Otherwise
    );
  }

  #[test]
  fn everywhere_only_produces_otherwise_bucket() {
    let buckets = group(&[
      cell(f(), DomainId::Everywhere),
      cell(g(), DomainId::Everywhere),
    ])
    .unwrap();
    assert_eq!(
      buckets.keys().copied().collect::<Vec<_>>(),
      vec![SubdomainKey::Otherwise]
    );
    assert_eq!(buckets[&SubdomainKey::Otherwise].len(), 2);
  }

  #[test]
  fn no_everywhere_means_no_otherwise() {
    let buckets = group(&[cell(f(), DomainId::Explicit(0))]).unwrap();
    assert!(!buckets.contains_key(&SubdomainKey::Otherwise));
  }

  #[test]
  fn empty_id_set_is_rejected() {
    let err = group(&[cell(f(), DomainId::ExplicitSet(vec![]))]).unwrap_err();
    assert!(matches!(
      err,
      CanonError::EmptyDomainIdError {
        category: DomainType::Cell
      }
    ));
  }

  #[test]
  fn otherwise_input_is_rejected() {
    let err = group(&[cell(f(), DomainId::Otherwise)]).unwrap_err();
    assert!(matches!(err, CanonError::InvalidOtherwiseError { .. }));
  }

  #[test]
  fn duplicate_ids_are_rejected() {
    let err =
      group(&[cell(f(), DomainId::ExplicitSet(vec![1, 2, 1]))]).unwrap_err();
    assert!(matches!(err, CanonError::DuplicateDomainIdError { id: 1 }));
  }

  #[test]
  fn named_regions_resolve_through_the_domain() {
    let mut domain = Domain::new("D");
    domain.add_region("DL", vec![1, 2]).unwrap();
    let terms = [cell(f(), DomainId::NamedRegion("DL".into()))];
    let buckets =
      group_by_subdomain(DomainType::Cell, terms.iter(), &domain).unwrap();
    assert_eq!(
      buckets.keys().copied().collect::<Vec<_>>(),
      vec![SubdomainKey::Id(1), SubdomainKey::Id(2)]
    );
  }

  #[test]
  fn named_regions_resolve_through_a_closure() {
    let lookup = |category: DomainType, name: &str| match (category, name) {
      (DomainType::Cell, "left") => Some(vec![7]),
      _ => None,
    };
    let terms = [cell(f(), DomainId::NamedRegion("left".into()))];
    let buckets =
      group_by_subdomain(DomainType::Cell, terms.iter(), &lookup).unwrap();
    assert_eq!(
      buckets[&SubdomainKey::Id(7)][0].domain_id(),
      &DomainId::Explicit(7)
    );
  }

  #[test]
  fn unknown_region_is_an_error() {
    let err =
      group(&[cell(f(), DomainId::NamedRegion("nowhere".into()))]).unwrap_err();
    match err {
      CanonError::UnknownRegionError { name, .. } => assert_eq!(name, "nowhere"),
      other => panic!("unexpected error: {}", other),
    }
  }
}
