use serde_json::{json, Value};

use crate::canonical::CanonicalForm;
use crate::handle::{label, Handle};

/// Human readable listing of a canonical form.
pub fn render_text<E: std::fmt::Display + Clone>(
  form: &CanonicalForm<E>,
) -> String {
  let mut out = String::new();
  out.push_str("Domain data:\n");
  for (category, dd) in &form.domain_data {
    out.push_str(&format!("  {}: {}\n", category, label(dd.as_ref())));
  }
  for (category, table) in &form.integrals {
    out.push_str(&format!("====== {}\n", category));
    for (key, integrals) in table {
      out.push_str(&format!("--- {}\n", key));
      for ci in integrals {
        out.push_str(&format!("integrand:     {}\n", ci.integrand));
        out.push_str(&format!(
          "compiler data: {}\n",
          label(ci.compiler_data.as_ref())
        ));
      }
    }
  }
  out
}

fn handle_json(handle: Option<&Handle>) -> Value {
  match handle {
    Some(h) => h.payload().clone(),
    None => Value::Null,
  }
}

/// JSON rendering keyed by domain type and subdomain.
pub fn render_json<E: std::fmt::Display + Clone>(
  form: &CanonicalForm<E>,
) -> Value {
  let mut integrals = serde_json::Map::new();
  for (category, table) in &form.integrals {
    let mut subdomains = serde_json::Map::new();
    for (key, entries) in table {
      let entries: Vec<Value> = entries
        .iter()
        .map(|ci| {
          json!({
            "integrand": ci.integrand.to_string(),
            "compiler_data": handle_json(ci.compiler_data.as_ref()),
          })
        })
        .collect();
      subdomains.insert(key.to_string(), Value::Array(entries));
    }
    integrals.insert(category.to_string(), Value::Object(subdomains));
  }

  let domain_data: serde_json::Map<String, Value> = form
    .domain_data
    .iter()
    .map(|(category, dd)| (category.to_string(), handle_json(dd.as_ref())))
    .collect();

  let compiler_data: Vec<Value> = form
    .compiler_data()
    .iter()
    .map(|h| h.payload().clone())
    .collect();

  json!({
    "integrals": integrals,
    "domain_data": domain_data,
    "compiler_data": compiler_data,
  })
}
