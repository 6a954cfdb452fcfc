use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex};

lazy_static! {
  static ref INTERN: Mutex<HashSet<Arc<str>>> = Mutex::new(HashSet::new());
}

/// An atomic grammatical category label: a part of speech, a phrase type, or
/// an inflectional variant (`noun_sg`, `vbf_sg_prtoff_o`, `CLAUSE`, ...).
///
/// Agreement is expressed by using distinct tags per variant, never by
/// feature unification, so tags compare as opaque strings. Tags are interned
/// process-wide; cloning is an `Arc` bump.
///
/// By convention lexical (terminal) tags are lowercase and phrasal
/// (nonterminal) tags are uppercase, but nothing dispatches on case: whether
/// a tag is terminal in a rule is carried by `rules::Production`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CategoryTag(Arc<str>);

impl CategoryTag {
  pub fn new(name: &str) -> Self {
    let mut table = INTERN.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(interned) = table.get(name) {
      Self(interned.clone())
    } else {
      let interned: Arc<str> = Arc::from(name);
      table.insert(interned.clone());
      Self(interned)
    }
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl From<&str> for CategoryTag {
  fn from(name: &str) -> Self {
    Self::new(name)
  }
}

impl fmt::Display for CategoryTag {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}
