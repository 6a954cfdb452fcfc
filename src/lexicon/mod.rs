//! The lexicon compiler: expands the word-class hierarchy and morphological
//! rules into a complete surface-form → category-tag-set mapping, and
//! collects the frame signatures the grammar compiler instantiates templates
//! from. Compilation is one-shot; the resulting `Lexicon` is immutable and
//! shared read-only by every parse.

pub mod inflect;
pub mod source;

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use tracing::debug;

use crate::category::CategoryTag;
use crate::error::ConfigError;
pub use crate::lexicon::source::{
  FrameFlag, FrameKind, IrregularNoun, IrregularVerb, LexiconSource, NounClass, VerbFrame,
  WordClass,
};

/// The six inflectional variants generated per verb frame, in the original
/// table's naming. The combined finite classes `vbf_sg`/`vbf_pl` are derived
/// from these.
const VERB_FORMS: [&str; 6] = ["inf", "vbd", "vbn", "vbg", "vbz", "vbp"];

/// Subcategorization metadata for one verb frame category, with duplicate
/// source entries already merged. This is what the grammar compiler
/// instantiates clause templates from.
#[derive(Debug, Clone)]
pub struct FrameSig {
  pub cat: String,
  pub kind: FrameKind,
  pub particle: Option<String>,
  pub preposition: Option<String>,
  pub flags: BTreeSet<FrameFlag>,
}

impl FrameSig {
  pub fn has_flag(&self, flag: FrameFlag) -> bool {
    self.flags.contains(&flag)
  }

  /// The lexical tag for one inflectional variant of this frame, following
  /// the original naming scheme: replace the leading `vb` of the category
  /// name (`vb_o` + `vbf_sg` → `vbf_sg_o`).
  pub fn form_tag(&self, form: &str) -> CategoryTag {
    CategoryTag::new(&self.cat.replacen("vb", form, 1))
  }
}

/// The compiled lexicon artifact: every surface form (base and inflected,
/// possibly multi-word) mapped to its sorted set of category tags.
#[derive(Debug)]
pub struct Lexicon {
  entries: HashMap<String, Vec<CategoryTag>>,
  frames: BTreeMap<String, FrameSig>,
  vocabulary: HashSet<CategoryTag>,
  max_phrase_words: usize,
}

impl Lexicon {
  pub fn compile(src: &LexiconSource) -> Result<Self, ConfigError> {
    let mut classes: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    // closed-class words
    for (class, words) in src.indeclinable.iter() {
      classes
        .entry(class.clone())
        .or_default()
        .extend(words.iter().cloned());
    }

    // adjectives, remembering the words for adverb derivation
    let mut adjective_words: BTreeSet<String> = BTreeSet::new();
    for wc in src.adjective_classes.iter() {
      for cat in wc.categories.iter() {
        classes
          .entry(cat.clone())
          .or_default()
          .extend(wc.words.iter().cloned());
      }
      adjective_words.extend(wc.words.iter().cloned());
    }

    // nouns: resolve the inclusion hierarchy, then inflect
    let resolved = resolve_noun_classes(&src.noun_classes)?;
    let mut all_nouns: BTreeSet<String> = BTreeSet::new();
    for aggregate in ["noun_sg", "noun_pl", "countable_noun", "uncountable_noun"] {
      classes.entry(aggregate.to_string()).or_default();
    }
    for (name, words) in resolved.iter() {
      let countable = src.noun_classes[name].countable;
      all_nouns.extend(words.iter().cloned());
      for w in words.iter() {
        add_word(&mut classes, name, w);
        add_word(&mut classes, "noun_sg", w);
      }
      match countable {
        Some(true) => {
          for w in words.iter() {
            let pl = inflect::noun_plural(w, &src.irregular_nouns);
            add_word(&mut classes, name, &pl);
            add_word(&mut classes, "noun_pl", &pl);
            add_word(&mut classes, "countable_noun", w);
            add_word(&mut classes, "countable_noun", &pl);
          }
        }
        Some(false) => {
          for w in words.iter() {
            add_word(&mut classes, "uncountable_noun", w);
          }
        }
        None => {}
      }
    }

    for word in src.irregular_nouns.keys() {
      if !all_nouns.contains(word) {
        return Err(ConfigError::OrphanIrregular {
          table: "noun",
          word: word.clone(),
        });
      }
    }

    // verb frames: merge duplicate signatures, then generate every form
    let mut frames: BTreeMap<String, (FrameSig, BTreeSet<String>)> = BTreeMap::new();
    let mut all_verbs: BTreeSet<String> = BTreeSet::new();
    for frame in src.verb_frames.iter() {
      all_verbs.extend(frame.members.iter().cloned());
      let cat = frame.category_name();
      let entry = frames.entry(cat.clone()).or_insert_with(|| {
        (
          FrameSig {
            cat,
            kind: frame.frame,
            particle: frame.particle.clone(),
            preposition: frame.preposition.clone(),
            flags: BTreeSet::new(),
          },
          BTreeSet::new(),
        )
      });
      // union of flags: the most restrictive reading of any source entry wins
      entry.0.flags.extend(frame.flags.iter().cloned());
      entry.1.extend(frame.members.iter().cloned());
    }

    for word in src.irregular_verbs.keys() {
      if !all_verbs.contains(word) {
        return Err(ConfigError::OrphanIrregular {
          table: "verb",
          word: word.clone(),
        });
      }
    }

    let irr = &src.irregular_verbs;
    for (cat, (sig, members)) in frames.iter() {
      for form in VERB_FORMS {
        let tag = cat.replacen("vb", form, 1);
        for m in members.iter() {
          let inflected = match form {
            "inf" => inflect::verb_base(m, irr),
            "vbd" => inflect::verb_past(m, irr),
            "vbn" => inflect::verb_past_participle(m, irr),
            "vbg" => inflect::verb_gerund(m, irr),
            "vbz" => inflect::verb_third_sg(m, irr),
            "vbp" => inflect::verb_plural_present(m, irr),
            _ => unreachable!(),
          };
          add_word(&mut classes, &tag, &inflected);
        }
      }
      // combined finite classes: vbf_sg = vbd ∪ vbz, vbf_pl = vbd ∪ vbp
      for (combined, parts) in [("vbf_sg", ["vbd", "vbz"]), ("vbf_pl", ["vbd", "vbp"])] {
        let tag = cat.replacen("vb", combined, 1);
        for part in parts {
          let part_tag = cat.replacen("vb", part, 1);
          let words = classes.get(&part_tag).cloned().unwrap_or_default();
          classes.entry(tag.clone()).or_default().extend(words);
        }
      }
      if let Some(p) = sig.particle.as_deref() {
        add_word(&mut classes, &format!("prt_{}", p), p);
      }
      if let Some(p) = sig.preposition.as_deref() {
        add_word(&mut classes, &format!("prep_{}", p), p);
      }
    }

    // adverbs, including adverbs derived from the adjective classes
    for wc in src.adverb_classes.iter() {
      for cat in wc.categories.iter() {
        classes
          .entry(cat.clone())
          .or_default()
          .extend(wc.words.iter().cloned());
      }
    }
    for adj in adjective_words.iter() {
      let adv = inflect::adjective_to_adverb(adj);
      add_word(&mut classes, "adv", &adv);
      add_word(&mut classes, "adv_vp", &adv);
    }

    for wc in src.preposition_classes.iter() {
      for cat in wc.categories.iter() {
        classes
          .entry(cat.clone())
          .or_default()
          .extend(wc.words.iter().cloned());
      }
    }

    // transpose class -> words into word -> sorted distinct tags
    let mut transposed: HashMap<String, BTreeSet<CategoryTag>> = HashMap::new();
    for (class, words) in classes.iter() {
      let tag = CategoryTag::new(class);
      for word in words.iter() {
        transposed
          .entry(word.to_lowercase())
          .or_default()
          .insert(tag.clone());
      }
    }

    let max_phrase_words = transposed
      .keys()
      .map(|w| w.split_whitespace().count())
      .max()
      .unwrap_or(1);
    let entries: HashMap<String, Vec<CategoryTag>> = transposed
      .into_iter()
      .map(|(w, tags)| (w, tags.into_iter().collect()))
      .collect();
    let vocabulary = classes.keys().map(|c| CategoryTag::new(c)).collect();

    debug!(
      words = entries.len(),
      classes = classes.len(),
      frames = frames.len(),
      "compiled lexicon"
    );

    Ok(Self {
      entries,
      frames: frames.into_iter().map(|(cat, (sig, _))| (cat, sig)).collect(),
      vocabulary,
      max_phrase_words,
    })
  }

  /// Tags for an exact surface form (lowercase; may contain spaces for
  /// multi-word entries). `None` when the form is unknown.
  pub fn tags(&self, surface: &str) -> Option<&[CategoryTag]> {
    self.entries.get(surface).map(|v| v.as_slice())
  }

  /// Whether any lexical entry produces this tag.
  pub fn produces(&self, tag: &CategoryTag) -> bool {
    self.vocabulary.contains(tag)
  }

  /// Frame signatures in deterministic (category name) order.
  pub fn frames(&self) -> impl Iterator<Item = &FrameSig> {
    self.frames.values()
  }

  /// The longest multi-word entry, in whitespace-delimited words.
  pub fn max_phrase_words(&self) -> usize {
    self.max_phrase_words
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// The external artifact representation: word → ordered tag list, sorted
  /// by word for stable output.
  pub fn to_json(&self) -> String {
    let sorted: BTreeMap<&str, Vec<&str>> = self
      .entries
      .iter()
      .map(|(w, tags)| (w.as_str(), tags.iter().map(|t| t.as_str()).collect()))
      .collect();
    serde_json::to_string_pretty(&sorted).unwrap_or_default()
  }
}

fn add_word(classes: &mut BTreeMap<String, BTreeSet<String>>, class: &str, word: &str) {
  classes
    .entry(class.to_string())
    .or_default()
    .insert(word.to_string());
}

/// Resolves transitive class inclusion. An undefined reference, a cycle, or
/// an explicit countability mismatch between an including and an included
/// class is a fatal configuration error.
fn resolve_noun_classes(
  raw: &BTreeMap<String, NounClass>,
) -> Result<BTreeMap<String, BTreeSet<String>>, ConfigError> {
  fn dfs(
    name: &str,
    raw: &BTreeMap<String, NounClass>,
    cache: &mut BTreeMap<String, BTreeSet<String>>,
    stack: &mut Vec<String>,
  ) -> Result<BTreeSet<String>, ConfigError> {
    if let Some(done) = cache.get(name) {
      return Ok(done.clone());
    }
    if stack.iter().any(|s| s == name) {
      return Err(ConfigError::InclusionCycle(name.to_string()));
    }
    stack.push(name.to_string());

    // the caller has already checked `name` exists
    let class = &raw[name];
    let mut words = class.words.clone();
    for inc in class.classes.iter() {
      let included = raw.get(inc).ok_or_else(|| ConfigError::UndefinedClass {
        referenced: inc.clone(),
        referencer: name.to_string(),
      })?;
      if let (Some(a), Some(b)) = (class.countable, included.countable) {
        if a != b {
          return Err(ConfigError::CountabilityMismatch {
            including: name.to_string(),
            including_countable: a,
            included: inc.clone(),
            included_countable: b,
          });
        }
      }
      words.extend(dfs(inc, raw, cache, stack)?);
    }

    stack.pop();
    cache.insert(name.to_string(), words.clone());
    Ok(words)
  }

  let mut cache = BTreeMap::new();
  for name in raw.keys() {
    let mut stack = Vec::new();
    dfs(name, raw, &mut cache, &mut stack)?;
  }
  Ok(cache)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn builtin() -> Lexicon {
    Lexicon::compile(&LexiconSource::builtin().unwrap()).unwrap()
  }

  fn has_tag(lexicon: &Lexicon, word: &str, tag: &str) -> bool {
    lexicon
      .tags(word)
      .is_some_and(|tags| tags.contains(&CategoryTag::new(tag)))
  }

  #[test]
  fn test_noun_inflection_and_aggregates() {
    let l = builtin();
    assert!(has_tag(&l, "dog", "noun_sg"));
    assert!(has_tag(&l, "dogs", "noun_pl"));
    assert!(has_tag(&l, "dogs", "countable_noun"));
    assert!(has_tag(&l, "water", "uncountable_noun"));
    assert!(!has_tag(&l, "water", "noun_pl"));
    // irregular plural shares the singular surface form
    assert!(has_tag(&l, "deer", "noun_sg"));
    assert!(has_tag(&l, "deer", "noun_pl"));
    assert!(has_tag(&l, "children", "noun_pl"));
  }

  #[test]
  fn test_verb_forms_per_frame() {
    let l = builtin();
    assert!(has_tag(&l, "hunts", "vbz_o"));
    assert!(has_tag(&l, "hunts", "vbf_sg_o"));
    assert!(has_tag(&l, "hunted", "vbf_sg_o"));
    assert!(has_tag(&l, "hunted", "vbf_pl_o"));
    assert!(has_tag(&l, "hunt", "vbf_pl_o"));
    assert!(!has_tag(&l, "hunt", "vbf_sg_o"));
    // "take" is both plain monotransitive and particle-transitive
    assert!(has_tag(&l, "took", "vbf_sg_o"));
    assert!(has_tag(&l, "took", "vbf_sg_prtoff_o"));
    assert!(has_tag(&l, "taken", "vbn_prtoff_o"));
  }

  #[test]
  fn test_homonymy_unions_tags() {
    let l = builtin();
    // "runs" is a plural noun and a third-singular verb
    assert!(has_tag(&l, "runs", "noun_pl"));
    assert!(has_tag(&l, "runs", "vbz"));
  }

  #[test]
  fn test_particles_and_prepositions_from_frames() {
    let l = builtin();
    assert!(has_tag(&l, "off", "prt_off"));
    assert!(has_tag(&l, "off", "prep_off"));
    assert!(!has_tag(&l, "off", "preposition"));
    assert!(has_tag(&l, "about", "prt_about"));
  }

  #[test]
  fn test_multi_word_entries() {
    let l = builtin();
    assert!(has_tag(&l, "in front of", "preposition"));
    assert!(has_tag(&l, "not only", "corr_not_only"));
    assert!(l.max_phrase_words() >= 3);
  }

  #[test]
  fn test_derived_adverbs() {
    let l = builtin();
    assert!(has_tag(&l, "quickly", "adv_vp"));
    assert!(has_tag(&l, "happily", "adv_vp"));
  }

  #[test]
  fn test_inclusion_cycle_is_fatal() {
    let src = LexiconSource::from_json(
      r#"{
        "noun_classes": {
          "a": { "countable": true, "words": ["x"], "classes": ["b"] },
          "b": { "countable": true, "words": ["y"], "classes": ["a"] }
        }
      }"#,
    )
    .unwrap();
    assert!(matches!(
      Lexicon::compile(&src),
      Err(ConfigError::InclusionCycle(_))
    ));
  }

  #[test]
  fn test_undefined_class_is_fatal() {
    let src = LexiconSource::from_json(
      r#"{
        "noun_classes": {
          "a": { "countable": true, "words": ["x"], "classes": ["missing"] }
        }
      }"#,
    )
    .unwrap();
    assert!(matches!(
      Lexicon::compile(&src),
      Err(ConfigError::UndefinedClass { .. })
    ));
  }

  #[test]
  fn test_countability_mismatch_is_fatal() {
    let src = LexiconSource::from_json(
      r#"{
        "noun_classes": {
          "a": { "countable": true, "words": ["x"], "classes": ["b"] },
          "b": { "countable": false, "words": ["y"] }
        }
      }"#,
    )
    .unwrap();
    assert!(matches!(
      Lexicon::compile(&src),
      Err(ConfigError::CountabilityMismatch { .. })
    ));
  }

  #[test]
  fn test_orphan_irregular_is_fatal() {
    let src = LexiconSource::from_json(
      r#"{
        "noun_classes": {
          "a": { "countable": true, "words": ["dog"] }
        },
        "irregular_nouns": { "goose": { "plural": "geese" } }
      }"#,
    )
    .unwrap();
    assert!(matches!(
      Lexicon::compile(&src),
      Err(ConfigError::OrphanIrregular { .. })
    ));
  }

  #[test]
  fn test_class_inclusion_merges_words() {
    let src = LexiconSource::from_json(
      r#"{
        "noun_classes": {
          "animals": { "countable": true, "words": ["dog"] },
          "creatures": { "countable": true, "words": ["troll"], "classes": ["animals"] }
        }
      }"#,
    )
    .unwrap();
    let l = Lexicon::compile(&src).unwrap();
    assert!(has_tag(&l, "dog", "creatures"));
    assert!(has_tag(&l, "dog", "animals"));
    assert!(has_tag(&l, "troll", "creatures"));
    assert!(!has_tag(&l, "troll", "animals"));
  }
}
