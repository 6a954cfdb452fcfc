use std::fmt;

use crate::category::CategoryTag;

/// One element of a rule body. `Lexical` productions match a token whose tag
/// set contains the tag; `Phrasal` productions match a completed rule headed
/// by the tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Production {
  Lexical(CategoryTag),
  Phrasal(CategoryTag),
}

impl Production {
  pub fn tag(&self) -> &CategoryTag {
    match self {
      Self::Lexical(t) => t,
      Self::Phrasal(t) => t,
    }
  }

  pub fn is_lexical(&self) -> bool {
    matches!(self, Self::Lexical(_))
  }

  pub fn is_phrasal(&self) -> bool {
    matches!(self, Self::Phrasal(_))
  }
}

impl fmt::Display for Production {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.tag())
  }
}

/// Where a rule came from: the template family that emitted it and, for
/// frame-instantiated rules, the frame category it was instantiated for.
/// Purely diagnostic; nothing at parse time dispatches on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOrigin {
  pub family: &'static str,
  pub frame: Option<String>,
}

impl RuleOrigin {
  pub fn structural(family: &'static str) -> Self {
    Self {
      family,
      frame: None,
    }
  }

  pub fn frame(family: &'static str, frame_cat: &str) -> Self {
    Self {
      family,
      frame: Some(frame_cat.to_string()),
    }
  }
}

/// A single context-free production rule. The full rule set is generated
/// once by the grammar compiler and never mutated during parsing.
#[derive(Debug, PartialEq, Eq)]
pub struct Rule {
  pub symbol: CategoryTag,
  pub productions: Vec<Production>,
  pub origin: RuleOrigin,
}

impl Rule {
  pub fn len(&self) -> usize {
    self.productions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

impl fmt::Display for Rule {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} ->", self.symbol)?;
    for p in self.productions.iter() {
      write!(f, " {}", p)?;
    }
    if self.is_empty() {
      write!(f, " ()")?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_rule_display() {
    let rule = Rule {
      symbol: "DP_SG".into(),
      productions: vec![
        Production::Lexical("det_sg".into()),
        Production::Phrasal("NOM_SG".into()),
      ],
      origin: RuleOrigin::structural("np"),
    };
    assert_eq!(rule.to_string(), "DP_SG -> det_sg NOM_SG");

    let empty = Rule {
      symbol: "AS_OPT".into(),
      productions: vec![],
      origin: RuleOrigin::structural("vp"),
    };
    assert_eq!(empty.to_string(), "AS_OPT -> ()");
  }
}
