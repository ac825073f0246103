use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use uuid::Uuid;

/// Opaque annotation compared purely by identity.
///
/// Cloning a handle keeps its identity. Two handles created separately are
/// never equal, even when their payloads are.
#[derive(Debug, Clone)]
pub struct Handle {
  id: Uuid,
  payload: Arc<serde_json::Value>,
}

impl Handle {
  pub fn new(payload: serde_json::Value) -> Self {
    Handle {
      id: Uuid::new_v4(),
      payload: Arc::new(payload),
    }
  }

  /// A handle whose payload is just a label.
  pub fn labelled(label: &str) -> Self {
    Handle::new(serde_json::Value::String(label.to_string()))
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  pub fn payload(&self) -> &serde_json::Value {
    &self.payload
  }

  pub fn is(&self, other: &Handle) -> bool {
    self.id == other.id
  }
}

impl PartialEq for Handle {
  fn eq(&self, other: &Self) -> bool {
    self.is(other)
  }
}

impl Eq for Handle {}

impl Hash for Handle {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.id.hash(state);
  }
}

impl fmt::Display for Handle {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.payload.as_ref() {
      serde_json::Value::String(label) => f.write_str(label),
      other => write!(f, "{}", other),
    }
  }
}

/// Display label of an optional handle, `None` when absent.
pub fn label(handle: Option<&Handle>) -> String {
  match handle {
    Some(h) => h.to_string(),
    None => "None".to_string(),
  }
}

/// Identity key of an optional handle; `None` is its own identity.
pub fn identity(handle: Option<&Handle>) -> Option<Uuid> {
  handle.map(Handle::id)
}
