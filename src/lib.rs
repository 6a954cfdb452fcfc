//! A grammaticality parser for a fragment of English.
//!
//! The pipeline has four stages, all compiled ahead of any parsing:
//! the lexicon compiler ([`lexicon`]) expands word-class definitions and
//! morphology into a surface-form → tag-set mapping, the grammar compiler
//! ([`grammar`], [`templates`]) instantiates clause templates against the
//! lexicon's verb-frame inventory, the lexer ([`lexer`]) tokenizes input
//! against the lexicon, and an Earley chart parser ([`earley`], [`forest`])
//! enumerates every derivation of the token sequence. Agreement (number,
//! tense, voice) is expressed with distinct category tags per variant, not
//! with feature unification.
//!
//! Ungrammatical input is not an error: it parses to an empty tree set.
//!
//! ```
//! use parseley::Parser;
//!
//! let parser = Parser::new()?;
//! assert!(!parser.parse("The dog ran.")?.is_empty());
//! assert!(parser.parse("The dogs runs.")?.is_empty());
//! # Ok::<(), parseley::Error>(())
//! ```
//!
//! The compiled [`Parser`] is immutable and `Sync`; concurrent parses share
//! it read-only with no locking.

#[macro_use]
extern crate lazy_static;

pub mod category;
pub mod earley;
pub mod error;
pub mod forest;
pub mod grammar;
pub mod lexer;
pub mod lexicon;
pub mod query;
pub mod rules;
pub mod syntree;
pub mod templates;
pub mod tree;
pub mod utils;

use tracing::debug;

pub use crate::category::CategoryTag;
pub use crate::earley::Limits;
pub use crate::error::{ConfigError, Error, GrammarIntegrityError};
pub use crate::grammar::Grammar;
pub use crate::lexer::Token;
pub use crate::lexicon::{Lexicon, LexiconSource};
pub use crate::query::{any_category, any_constituent, WordRef};
pub use crate::tree::Tree;

/// The compiled lexicon and grammar plus parse-time resource limits.
/// Compilation is one-shot; afterwards `parse` is a pure function of the
/// sentence.
#[derive(Debug)]
pub struct Parser {
  lexicon: Lexicon,
  grammar: Grammar,
  limits: Limits,
}

impl Parser {
  /// Compiles the builtin English lexicon and grammar.
  pub fn new() -> Result<Self, Error> {
    Self::from_source(&LexiconSource::builtin()?)
  }

  pub fn from_source(src: &LexiconSource) -> Result<Self, Error> {
    let lexicon = Lexicon::compile(src)?;
    let grammar = Grammar::compile(&lexicon)?;
    Ok(Self {
      lexicon,
      grammar,
      limits: Limits::default(),
    })
  }

  pub fn with_limits(mut self, limits: Limits) -> Self {
    self.limits = limits;
    self
  }

  pub fn lexicon(&self) -> &Lexicon {
    &self.lexicon
  }

  pub fn grammar(&self) -> &Grammar {
    &self.grammar
  }

  pub fn limits(&self) -> Limits {
    self.limits
  }

  pub fn tokenize(&self, sentence: &str) -> Vec<Token> {
    lexer::tokenize(&self.lexicon, sentence)
  }

  /// Parses one sentence into the complete set of derivation trees. An
  /// empty result means the sentence is ungrammatical; `Err` is reserved
  /// for resource limits and compiler-invariant violations.
  pub fn parse(&self, sentence: &str) -> Result<Vec<Tree>, Error> {
    let tokens = self.tokenize(sentence);
    if tokens.is_empty() {
      return Ok(Vec::new());
    }

    let chart = earley::parse_chart(&self.grammar, &tokens, self.limits)?;
    let forest = forest::Forest::from(chart);
    let derivations = forest.trees(&self.grammar, &tokens, self.limits)?;

    debug!(
      sentence,
      tokens = tokens.len(),
      trees = derivations.len(),
      "parsed"
    );

    Ok(derivations.iter().map(Tree::from_derivation).collect())
  }
}
