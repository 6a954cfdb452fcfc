use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::category::CategoryTag;
use crate::error::GrammarIntegrityError;
use crate::lexicon::Lexicon;
use crate::rules::{Production, Rule};
use crate::templates;

/// The compiled rule table: every production rule the frame templates
/// generated, grouped by head symbol, plus the start symbol and the set of
/// nullable symbols the chart parser needs for ε-completion. Immutable after
/// compilation and shared read-only by all parses.
#[derive(Debug)]
pub struct Grammar {
  pub start: CategoryTag,
  pub rules: HashMap<CategoryTag, Vec<Arc<Rule>>>,
  nullables: HashSet<CategoryTag>,
}

impl Grammar {
  /// Instantiates the frame templates against the lexicon's
  /// subcategorization metadata and integrity-checks the result: every tag a
  /// rule references must be produced by some rule or some lexical class.
  pub fn compile(lexicon: &Lexicon) -> Result<Self, GrammarIntegrityError> {
    let instantiated = templates::instantiate(lexicon);
    let rule_count = instantiated.len();

    let rules: HashMap<CategoryTag, Vec<Arc<Rule>>> =
      instantiated
        .into_iter()
        .fold(HashMap::new(), |mut map, rule| {
          map
            .entry(rule.symbol.clone())
            .or_insert_with(Vec::new)
            .push(Arc::new(rule));
          map
        });

    let nullables = Self::find_nullables(&rules);
    let grammar = Self {
      start: CategoryTag::new(templates::START),
      rules,
      nullables,
    };
    grammar.check_integrity(lexicon)?;

    debug!(
      rules = rule_count,
      symbols = grammar.rules.len(),
      nullables = grammar.nullables.len(),
      "compiled grammar"
    );
    Ok(grammar)
  }

  /// Assembles a grammar directly from a rule table, skipping template
  /// instantiation and the integrity check. The parse engine still reports
  /// unproduced tags it reaches.
  pub fn from_parts(start: CategoryTag, rules: HashMap<CategoryTag, Vec<Arc<Rule>>>) -> Self {
    let nullables = Self::find_nullables(&rules);
    Self {
      start,
      rules,
      nullables,
    }
  }

  pub fn is_nullable(&self, tag: &CategoryTag) -> bool {
    self.nullables.contains(tag)
  }

  pub fn rules_for(&self, tag: &CategoryTag) -> Option<&[Arc<Rule>]> {
    self.rules.get(tag).map(|v| v.as_slice())
  }

  fn rule_is_nullable(nullables: &HashSet<CategoryTag>, rule: &Rule) -> bool {
    rule.is_empty()
      || rule.productions.iter().all(|p| match p {
        Production::Phrasal(tag) => nullables.contains(tag),
        Production::Lexical(_) => false,
      })
  }

  fn find_nullables(rules: &HashMap<CategoryTag, Vec<Arc<Rule>>>) -> HashSet<CategoryTag> {
    let mut nullables: HashSet<CategoryTag> = HashSet::new();

    let mut last_length = 1;
    while last_length != nullables.len() {
      last_length = nullables.len();
      for r in rules.values().flatten() {
        if !nullables.contains(&r.symbol) && Self::rule_is_nullable(&nullables, r) {
          nullables.insert(r.symbol.clone());
        }
      }
    }

    nullables
  }

  fn check_integrity(&self, lexicon: &Lexicon) -> Result<(), GrammarIntegrityError> {
    if !self.rules.contains_key(&self.start) {
      return Err(GrammarIntegrityError::MissingStart(self.start.clone()));
    }
    for rule in self.rules.values().flatten() {
      for p in rule.productions.iter() {
        let produced = match p {
          Production::Phrasal(tag) => self.rules.contains_key(tag),
          Production::Lexical(tag) => lexicon.produces(tag),
        };
        if !produced {
          return Err(GrammarIntegrityError::UnproducedTag {
            rule: rule.to_string(),
            tag: p.tag().clone(),
          });
        }
      }
    }
    Ok(())
  }
}

impl fmt::Display for Grammar {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "//** start: {}", self.start)?;
    write!(f, "//** nullables:")?;
    for nt in self.nullables.iter() {
      write!(f, " {}", nt)?;
    }
    writeln!(f)?;
    for rule in self.rules.values().flatten() {
      writeln!(f, "{}", rule)?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::lexicon::LexiconSource;

  fn compile() -> Grammar {
    let lexicon = Lexicon::compile(&LexiconSource::builtin().unwrap()).unwrap();
    Grammar::compile(&lexicon).unwrap()
  }

  #[test]
  fn test_compiles_with_start() {
    let g = compile();
    assert_eq!(g.start, CategoryTag::new("S"));
    assert!(g.rules_for(&g.start).is_some());
  }

  #[test]
  fn test_optional_elements_are_nullable() {
    let g = compile();
    for tag in ["AS_OPT", "BY_PP_OPT", "TERM_PUNCT", "Q_PUNCT"] {
      assert!(g.is_nullable(&CategoryTag::new(tag)), "{} not nullable", tag);
    }
    assert!(!g.is_nullable(&CategoryTag::new("CLAUSE")));
    assert!(!g.is_nullable(&g.start));
  }
}
