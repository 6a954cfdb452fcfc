//! Stateless structural predicates over derivation trees. Pure reads; when
//! a caller must check that "some parse satisfies this", the predicates are
//! evaluated independently per tree and OR-ed.

use crate::category::CategoryTag;
use crate::tree::{NodeId, Tree};

/// A surface word, optionally disambiguated by a 0-based occurrence index
/// for sentences where the word repeats.
#[derive(Debug, Clone, PartialEq)]
pub struct WordRef {
  pub word: String,
  pub occurrence: Option<usize>,
}

impl WordRef {
  pub fn new(word: impl Into<String>) -> Self {
    Self {
      word: word.into(),
      occurrence: None,
    }
  }

  pub fn occurrence(word: impl Into<String>, occurrence: usize) -> Self {
    Self {
      word: word.into(),
      occurrence: Some(occurrence),
    }
  }
}

impl From<&str> for WordRef {
  fn from(word: &str) -> Self {
    Self::new(word)
  }
}

/// Leaves whose surface text matches the reference, case-insensitively, in
/// surface order. An occurrence index narrows the result to that single
/// occurrence, or to nothing when out of range.
pub fn matching_leaves(tree: &Tree, word: &WordRef) -> Vec<NodeId> {
  let matches: Vec<NodeId> = tree
    .leaves()
    .into_iter()
    .filter(|&id| {
      tree
        .leaf_text(id)
        .map(|text| text.eq_ignore_ascii_case(&word.word))
        .unwrap_or(false)
    })
    .collect();

  match word.occurrence {
    None => matches,
    Some(n) => matches.into_iter().nth(n).into_iter().collect(),
  }
}

fn lowest_common_ancestor(tree: &Tree, a: NodeId, b: NodeId) -> NodeId {
  let chain_a = tree.ancestors(a);
  for candidate in tree.ancestors(b) {
    if chain_a.contains(&candidate) {
      return candidate;
    }
  }
  // both chains end at the root
  tree.root()
}

/// Constituency test: do `first` and `second` share a constituent that
/// leaves `excluded` out? For every pair of matching leaves, their lowest
/// common ancestor is a candidate constituent; the test succeeds if some
/// candidate's leaf descendants include no occurrence of the excluded word.
/// False when any of the three references matches no leaf.
pub fn is_constituent(tree: &Tree, first: &WordRef, second: &WordRef, excluded: &WordRef) -> bool {
  let firsts = matching_leaves(tree, first);
  let seconds = matching_leaves(tree, second);
  let excludes = matching_leaves(tree, excluded);
  if firsts.is_empty() || seconds.is_empty() || excludes.is_empty() {
    return false;
  }

  for &a in firsts.iter() {
    for &b in seconds.iter() {
      let lca = lowest_common_ancestor(tree, a, b);
      let descendants = tree.leaf_descendants(lca);
      if excludes.iter().all(|ex| !descendants.contains(ex)) {
        return true;
      }
    }
  }
  false
}

/// Category test: does some leaf matching `word` carry `expected` as its
/// own label, or as its immediate parent's label?
pub fn has_category(tree: &Tree, word: &WordRef, expected: &CategoryTag) -> bool {
  matching_leaves(tree, word).into_iter().any(|id| {
    if &tree.get(id).tag == expected {
      return true;
    }
    tree
      .parent(id)
      .map(|p| &tree.get(p).tag == expected)
      .unwrap_or(false)
  })
}

/// OR of `is_constituent` over a parse result set.
pub fn any_constituent(trees: &[Tree], first: &WordRef, second: &WordRef, excluded: &WordRef) -> bool {
  trees
    .iter()
    .any(|tree| is_constituent(tree, first, second, excluded))
}

/// OR of `has_category` over a parse result set.
pub fn any_category(trees: &[Tree], word: &WordRef, expected: &CategoryTag) -> bool {
  trees.iter().any(|tree| has_category(tree, word, expected))
}
