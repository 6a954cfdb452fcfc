//! Source word-class definitions the lexicon is compiled from. These are
//! plain serde data, loaded once and never mutated; the builtin English
//! definitions ship as JSON embedded in the crate.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

use crate::error::ConfigError;

const BUILTIN_ENGLISH: &str = include_str!("../../data/english.json");

/// A noun class: member words, optional countability, and transitive
/// inclusion of other classes by name.
#[derive(Debug, Clone, Deserialize)]
pub struct NounClass {
  #[serde(default)]
  pub words: BTreeSet<String>,
  #[serde(default)]
  pub classes: Vec<String>,
  #[serde(default)]
  pub countable: Option<bool>,
}

/// Adjective, adverb and preposition classes all assign their member words
/// into the listed category tags.
#[derive(Debug, Clone, Deserialize)]
pub struct WordClass {
  pub words: BTreeSet<String>,
  pub categories: Vec<String>,
}

/// Subcategorization frame shapes. Together with an optional particle or
/// preposition these determine the frame's category name and the clause
/// templates the grammar compiler instantiates for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameKind {
  Intransitive,
  Monotransitive,
  Ditransitive,
  PredicativeComplement,
  ObjectPredicative,
  ThatClause,
  BareDeclarative,
  ClosedInterrogative,
  OpenInterrogative,
  Exclamative,
}

/// Fossilization flags: a lexical item's resistance to an otherwise-general
/// structural alternation. Each flag suppresses rule variants during grammar
/// compilation; none of them is consulted at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameFlag {
  /// Only the verb-particle-object order is emitted.
  NoParticleMovement,
  /// Only the verb-object-particle order is emitted.
  ObjectFirstOnly,
  /// No medial adverb between object and particle.
  NoAdjunctInsertion,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerbFrame {
  pub frame: FrameKind,
  #[serde(default)]
  pub members: BTreeSet<String>,
  #[serde(default)]
  pub particle: Option<String>,
  #[serde(default)]
  pub preposition: Option<String>,
  #[serde(default)]
  pub flags: BTreeSet<FrameFlag>,
}

impl VerbFrame {
  /// The frame's base category name, e.g. `vb_o`, `vb_prtoff_o`,
  /// `vb_prpoff_o`, `vb_o_prpas_predcomp`. Inflected lexical tags are
  /// derived from this by replacing the leading `vb`.
  pub fn category_name(&self) -> String {
    let prt = self
      .particle
      .as_deref()
      .map(|p| format!("_prt{}", p))
      .unwrap_or_default();
    let prp = self
      .preposition
      .as_deref()
      .map(|p| format!("_prp{}", p))
      .unwrap_or_default();

    match self.frame {
      FrameKind::Intransitive => format!("vb{}{}", prt, prp),
      FrameKind::Monotransitive => format!("vb{}{}_o", prt, prp),
      FrameKind::Ditransitive => "vb_io_do".to_string(),
      FrameKind::PredicativeComplement => format!("vb{}_predcomp", prt),
      FrameKind::ObjectPredicative => format!("vb_o{}_predcomp", prp),
      FrameKind::ThatClause => format!("vb{}{}_that_declarative_cl", prt, prp),
      FrameKind::BareDeclarative => format!("vb{}{}_bare_declarative_cl", prt, prp),
      FrameKind::ClosedInterrogative => format!("vb{}{}_closed_interrogative_cl", prt, prp),
      FrameKind::OpenInterrogative => format!("vb{}{}_open_interrogative_cl", prt, prp),
      FrameKind::Exclamative => format!("vb{}{}_exclamative_cl", prt, prp),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IrregularNoun {
  pub plural: String,
}

/// Irregular verb forms, keyed by base form in the source table. Forms left
/// out fall back to the regular rules (vbn additionally falls back to vbd).
#[derive(Debug, Clone, Deserialize)]
pub struct IrregularVerb {
  #[serde(default, rename = "vb")]
  pub base: Option<String>,
  pub vbd: String,
  #[serde(default)]
  pub vbn: Option<String>,
  #[serde(default)]
  pub vbg: Option<String>,
  #[serde(default)]
  pub vbz: Option<String>,
  #[serde(default)]
  pub vbp: Option<String>,
}

/// The complete source material for one language's lexicon.
#[derive(Debug, Clone, Deserialize)]
pub struct LexiconSource {
  /// Closed-class words that never inflect: determiners, pronouns,
  /// conjunctions, punctuation, ... Keyed by category tag.
  #[serde(default)]
  pub indeclinable: BTreeMap<String, BTreeSet<String>>,
  #[serde(default)]
  pub noun_classes: BTreeMap<String, NounClass>,
  #[serde(default)]
  pub adjective_classes: Vec<WordClass>,
  #[serde(default)]
  pub adverb_classes: Vec<WordClass>,
  #[serde(default)]
  pub preposition_classes: Vec<WordClass>,
  #[serde(default)]
  pub verb_frames: Vec<VerbFrame>,
  #[serde(default)]
  pub irregular_nouns: BTreeMap<String, IrregularNoun>,
  #[serde(default)]
  pub irregular_verbs: BTreeMap<String, IrregularVerb>,
}

impl LexiconSource {
  /// The builtin English definitions.
  pub fn builtin() -> Result<Self, ConfigError> {
    Self::from_json(BUILTIN_ENGLISH)
  }

  pub fn from_json(json: &str) -> Result<Self, ConfigError> {
    Ok(serde_json::from_str(json)?)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_builtin_source_parses() {
    let src = LexiconSource::builtin().unwrap();
    assert!(!src.noun_classes.is_empty());
    assert!(!src.verb_frames.is_empty());
    assert!(src.indeclinable.contains_key("det_sg"));
  }

  #[test]
  fn test_category_names() {
    let mut frame = VerbFrame {
      frame: FrameKind::Monotransitive,
      members: BTreeSet::new(),
      particle: None,
      preposition: None,
      flags: BTreeSet::new(),
    };
    assert_eq!(frame.category_name(), "vb_o");

    frame.particle = Some("off".to_string());
    assert_eq!(frame.category_name(), "vb_prtoff_o");

    frame.particle = None;
    frame.preposition = Some("off".to_string());
    assert_eq!(frame.category_name(), "vb_prpoff_o");

    let as_frame = VerbFrame {
      frame: FrameKind::ObjectPredicative,
      members: BTreeSet::new(),
      particle: None,
      preposition: Some("as".to_string()),
      flags: BTreeSet::new(),
    };
    assert_eq!(as_frame.category_name(), "vb_o_prpas_predcomp");
  }
}
