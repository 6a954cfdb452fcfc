//! Regular inflection rules with irregular-table overrides. Every generator
//! checks the irregular table first and falls back to a fixed priority list
//! of regular patterns; the first matching pattern wins.

use std::collections::BTreeMap;

use crate::lexicon::source::{IrregularNoun, IrregularVerb};

fn ends_in_sibilant(word: &str) -> bool {
  word.ends_with('s') || word.ends_with("sh") || word.ends_with("ch") || word.ends_with('x')
}

fn ends_in_consonant_y(word: &str) -> bool {
  let mut chars = word.chars().rev();
  if chars.next() != Some('y') {
    return false;
  }
  match chars.next() {
    Some(c) => !"aeiou".contains(c),
    None => false,
  }
}

pub fn noun_plural(singular: &str, irregular: &BTreeMap<String, IrregularNoun>) -> String {
  if let Some(entry) = irregular.get(singular) {
    return entry.plural.clone();
  }
  if ends_in_sibilant(singular) {
    return format!("{}es", singular);
  }
  if ends_in_consonant_y(singular) {
    return format!("{}ies", &singular[..singular.len() - 1]);
  }
  format!("{}s", singular)
}

/// Base / infinitive form. The source tables key verbs by base form, so this
/// is the identity unless an irregular entry overrides it.
pub fn verb_base(verb: &str, irregular: &BTreeMap<String, IrregularVerb>) -> String {
  irregular
    .get(verb)
    .and_then(|e| e.base.clone())
    .unwrap_or_else(|| verb.to_string())
}

/// Preterite (vbd).
pub fn verb_past(verb: &str, irregular: &BTreeMap<String, IrregularVerb>) -> String {
  if let Some(past) = irregular.get(verb).map(|e| e.vbd.clone()) {
    return past;
  }
  if verb.ends_with('e') {
    return format!("{}d", verb);
  }
  if ends_in_consonant_y(verb) {
    return format!("{}ied", &verb[..verb.len() - 1]);
  }
  format!("{}ed", verb)
}

/// Past participle (vbn). Defaults to the preterite.
pub fn verb_past_participle(verb: &str, irregular: &BTreeMap<String, IrregularVerb>) -> String {
  if let Some(vbn) = irregular.get(verb).and_then(|e| e.vbn.clone()) {
    return vbn;
  }
  verb_past(verb, irregular)
}

/// Gerund-participle (vbg).
pub fn verb_gerund(verb: &str, irregular: &BTreeMap<String, IrregularVerb>) -> String {
  if let Some(vbg) = irregular.get(verb).and_then(|e| e.vbg.clone()) {
    return vbg;
  }
  if verb.ends_with("ie") {
    return format!("{}ying", &verb[..verb.len() - 2]);
  }
  // "be" keeps its e: being
  if verb.ends_with('e') && verb != "be" {
    return format!("{}ing", &verb[..verb.len() - 1]);
  }
  format!("{}ing", verb)
}

/// Third-person singular present (vbz).
pub fn verb_third_sg(verb: &str, irregular: &BTreeMap<String, IrregularVerb>) -> String {
  if let Some(vbz) = irregular.get(verb).and_then(|e| e.vbz.clone()) {
    return vbz;
  }
  if ends_in_sibilant(verb) {
    return format!("{}es", verb);
  }
  if ends_in_consonant_y(verb) {
    return format!("{}ies", &verb[..verb.len() - 1]);
  }
  format!("{}s", verb)
}

/// Plural / non-third-singular present (vbp). Usually the base form.
pub fn verb_plural_present(verb: &str, irregular: &BTreeMap<String, IrregularVerb>) -> String {
  if let Some(vbp) = irregular.get(verb).and_then(|e| e.vbp.clone()) {
    return vbp;
  }
  verb.to_string()
}

pub fn adjective_to_adverb(adjective: &str) -> String {
  if adjective.ends_with('y') {
    return format!("{}ily", &adjective[..adjective.len() - 1]);
  }
  if adjective.ends_with("le") {
    return format!("{}ly", &adjective[..adjective.len() - 2]);
  }
  if adjective.ends_with("ic") {
    return format!("{}ally", adjective);
  }
  format!("{}ly", adjective)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn no_irregular_nouns() -> BTreeMap<String, IrregularNoun> {
    BTreeMap::new()
  }

  fn no_irregular_verbs() -> BTreeMap<String, IrregularVerb> {
    BTreeMap::new()
  }

  #[test]
  fn test_regular_plurals() {
    let irr = no_irregular_nouns();
    assert_eq!(noun_plural("dog", &irr), "dogs");
    assert_eq!(noun_plural("fox", &irr), "foxes");
    assert_eq!(noun_plural("brush", &irr), "brushes");
    assert_eq!(noun_plural("story", &irr), "stories");
    // vowel + y stays regular
    assert_eq!(noun_plural("day", &irr), "days");
  }

  #[test]
  fn test_irregular_plural_wins() {
    let mut irr = no_irregular_nouns();
    irr.insert(
      "mouse".to_string(),
      IrregularNoun {
        plural: "mice".to_string(),
      },
    );
    assert_eq!(noun_plural("mouse", &irr), "mice");
    assert_eq!(noun_plural("house", &irr), "houses");
  }

  #[test]
  fn test_regular_verb_forms() {
    let irr = no_irregular_verbs();
    assert_eq!(verb_past("hunt", &irr), "hunted");
    assert_eq!(verb_past("chase", &irr), "chased");
    assert_eq!(verb_past("hurry", &irr), "hurried");
    assert_eq!(verb_third_sg("hunt", &irr), "hunts");
    assert_eq!(verb_third_sg("wash", &irr), "washes");
    assert_eq!(verb_third_sg("hurry", &irr), "hurries");
    assert_eq!(verb_gerund("chase", &irr), "chasing");
    assert_eq!(verb_gerund("tie", &irr), "tying");
    assert_eq!(verb_gerund("hunt", &irr), "hunting");
    assert_eq!(verb_gerund("be", &irr), "being");
    assert_eq!(verb_plural_present("hunt", &irr), "hunt");
    assert_eq!(verb_past_participle("hunt", &irr), "hunted");
  }

  #[test]
  fn test_irregular_verb_forms() {
    let mut irr = no_irregular_verbs();
    irr.insert(
      "take".to_string(),
      IrregularVerb {
        base: None,
        vbd: "took".to_string(),
        vbn: Some("taken".to_string()),
        vbg: None,
        vbz: None,
        vbp: None,
      },
    );
    irr.insert(
      "find".to_string(),
      IrregularVerb {
        base: None,
        vbd: "found".to_string(),
        vbn: None,
        vbg: None,
        vbz: None,
        vbp: None,
      },
    );
    assert_eq!(verb_past("take", &irr), "took");
    assert_eq!(verb_past_participle("take", &irr), "taken");
    // missing vbn falls back to the (irregular) preterite
    assert_eq!(verb_past_participle("find", &irr), "found");
    // regular fallbacks still apply for non-overridden forms
    assert_eq!(verb_third_sg("take", &irr), "takes");
    assert_eq!(verb_gerund("take", &irr), "taking");
  }

  #[test]
  fn test_adjective_to_adverb() {
    assert_eq!(adjective_to_adverb("quick"), "quickly");
    assert_eq!(adjective_to_adverb("happy"), "happily");
    assert_eq!(adjective_to_adverb("gentle"), "gently");
    assert_eq!(adjective_to_adverb("heroic"), "heroically");
  }
}
