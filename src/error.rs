use thiserror::Error;

use crate::category::CategoryTag;

/// Fatal errors raised while compiling the lexicon from its source class
/// definitions. These always abort artifact generation; there is no partial
/// lexicon.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("undefined word class `{referenced}` referenced by `{referencer}`")]
  UndefinedClass {
    referenced: String,
    referencer: String,
  },

  #[error("inclusion cycle through word class `{0}`")]
  InclusionCycle(String),

  #[error(
    "countability mismatch: `{including}` (countable={including_countable}) \
     includes `{included}` (countable={included_countable})"
  )]
  CountabilityMismatch {
    including: String,
    including_countable: bool,
    included: String,
    included_countable: bool,
  },

  #[error("irregular {table} table references `{word}`, which belongs to no class")]
  OrphanIrregular { table: &'static str, word: String },

  #[error("malformed lexicon source: {0}")]
  Source(#[from] serde_json::Error),
}

/// Signals that the compiled rule table violates the grammar invariant:
/// every tag a rule references must be produced by some rule or by some
/// lexical class. Should never occur for a correctly compiled grammar; it is
/// a property of the artifact, never of the input sentence.
#[derive(Debug, Error)]
pub enum GrammarIntegrityError {
  #[error("start symbol `{0}` heads no rule")]
  MissingStart(CategoryTag),

  #[error("rule `{rule}` references `{tag}`, which no rule or lexical class produces")]
  UnproducedTag { rule: String, tag: CategoryTag },
}

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Integrity(#[from] GrammarIntegrityError),

  /// The chart or the derivation set outgrew the configured bound. The
  /// caller may retry with a larger bound or reject the input; the parser
  /// state is simply abandoned.
  #[error("resource limit exceeded: {kind} (limit {limit})")]
  ResourceLimit { kind: &'static str, limit: usize },
}
