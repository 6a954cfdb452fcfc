use std::fmt;
use std::sync::Arc;

use crate::category::CategoryTag;
use crate::earley::{Chart, Limits};
use crate::error::Error;
use crate::grammar::Grammar;
use crate::lexer::Token;
use crate::rules::{Production, Rule};
use crate::syntree::{Constituent, SynTree, Word};
use crate::utils::combinations;

/// Leaf payload during enumeration: the matched surface text and the
/// lexical tag the rule consumed it as.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
  pub text: String,
  pub tag: CategoryTag,
}

impl fmt::Display for Leaf {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} ({})", self.text, self.tag)
  }
}

pub type DerivTree = SynTree<Arc<Rule>, Leaf>;

#[derive(Debug, Clone, PartialEq)]
pub struct ForestState {
  rule: Arc<Rule>,
  span: (usize, usize),
}

impl ForestState {
  pub fn new(rule: &Arc<Rule>, start: usize, end: usize) -> Self {
    Self {
      rule: rule.clone(),
      span: (start, end),
    }
  }

  fn constituent(&self) -> Constituent<Arc<Rule>> {
    Constituent {
      value: self.rule.clone(),
      span: self.span,
    }
  }
}

impl fmt::Display for ForestState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}..{}: {}", self.span.0, self.span.1, self.rule)
  }
}

/// All completed rule applications, indexed by origin position. Indexed up
/// to and including the end of the input, because zero-width (nullable)
/// completions can originate there.
#[derive(Debug, Clone, PartialEq)]
pub struct Forest(Vec<Vec<ForestState>>);

impl From<Chart> for Forest {
  fn from(chart: Chart) -> Self {
    let mut v = vec![Vec::new(); chart.len()];

    for (k, states) in chart.into_iter() {
      for state in states {
        // exclude unfinished rules that can't contribute to a tree
        if !state.lr0.is_active() {
          v[state.origin].push(ForestState::new(&state.lr0.rule, state.origin, k));
        }
      }
    }

    Self(v)
  }
}

impl Forest {
  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  fn states_at(&self, k: usize) -> &[ForestState] {
    &self.0[k]
  }

  /// Enumerates every derivation of the whole input from the start symbol.
  /// Distinct derivations are never deduplicated or merged; an empty result
  /// is the normal outcome for an ungrammatical sentence.
  pub fn trees(
    &self,
    g: &Grammar,
    input: &[Token],
    limits: Limits,
  ) -> Result<Vec<DerivTree>, Error> {
    if self.is_empty() {
      return Ok(Vec::new());
    }

    // seed with completed states that start at 0, span the whole input, and
    // are headed by the start symbol
    let roots: Vec<ForestState> = self
      .states_at(0)
      .iter()
      .filter(|state| state.span.1 == input.len() && state.rule.symbol == g.start)
      .cloned()
      .collect();

    let mut enumerator = Enumerator {
      forest: self,
      input,
      max_trees: limits.max_trees,
      produced: 0,
    };

    let mut all = Vec::new();
    for root in roots {
      let seed = SynTree::Branch(root.constituent(), Vec::new());
      all.append(&mut enumerator.make_trees(seed)?);
    }
    Ok(all)
  }
}

impl fmt::Display for Forest {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for k in 0..self.len() {
      writeln!(f, "Origin {}:", k)?;
      for fs in self.0[k].iter() {
        writeln!(f, "  {}", fs)?;
      }
    }
    Ok(())
  }
}

struct Enumerator<'a> {
  forest: &'a Forest,
  input: &'a [Token],
  max_trees: usize,
  produced: usize,
}

impl Enumerator<'_> {
  fn charge(&mut self, count: usize) -> Result<(), Error> {
    self.produced += count;
    if self.produced > self.max_trees {
      Err(Error::ResourceLimit {
        kind: "derivation trees",
        limit: self.max_trees,
      })
    } else {
      Ok(())
    }
  }

  /// Checks if a subtree has already been completed by make_trees(),
  /// or if it is a leaf and doesn't need to be completed
  fn subtree_is_complete(node: &DerivTree) -> bool {
    if let Some((cons, children)) = node.get_branch() {
      cons.value.len() == children.len()
    } else {
      // is a leaf
      true
    }
  }

  /// Takes a rule and search span, and returns every possible sequence of
  /// (uncompleted) child trees that satisfies the rule's productions over
  /// exactly that span. Sequences that run out of productions or span
  /// early, or that place a lexical production on a token that doesn't
  /// carry its tag, contribute nothing.
  fn extend_out(
    &mut self,
    rule: &Rule,
    prod_idx: usize,
    search_start: usize,
    search_end: usize,
  ) -> Result<Vec<Vec<DerivTree>>, Error> {
    if prod_idx == rule.len() {
      // base case: the rule is exhausted. if the span is too, provide a
      // single empty sequence to prepend onto as we unwind; otherwise this
      // branch of the search left tokens unconsumed and contributes nothing
      return if search_start == search_end {
        Ok(vec![Vec::new()])
      } else {
        Ok(Vec::new())
      };
    }

    // note: an exhausted span does not bail here. remaining productions may
    // still be satisfied by zero-width (nullable) constituents, e.g. an
    // omitted sentence terminator
    match &rule.productions[prod_idx] {
      Production::Phrasal(wanted) => {
        // candidate completed states producing this symbol at the search
        // start, contained within the search range
        let candidates: Vec<ForestState> = self
          .forest
          .states_at(search_start)
          .iter()
          .filter(|s| s.span.1 <= search_end && &s.rule.symbol == wanted)
          .cloned()
          .collect();

        let mut seqs = Vec::new();
        for state in candidates {
          // recursively find possible sequences that start directly after
          // this state
          for mut rest in self.extend_out(rule, prod_idx + 1, state.span.1, search_end)? {
            rest.insert(0, SynTree::Branch(state.constituent(), Vec::new()));
            seqs.push(rest);
          }
        }
        Ok(seqs)
      }
      Production::Lexical(tag) => {
        if search_start == search_end {
          return Ok(Vec::new());
        }
        // chart completion spans don't pin terminal positions on their own,
        // so re-verify the token actually carries the tag
        if !self.input[search_start].has_tag(tag) {
          return Ok(Vec::new());
        }
        let leaf: DerivTree = SynTree::Leaf(Word {
          value: Leaf {
            text: self.input[search_start].text.clone(),
            tag: tag.clone(),
          },
          span: (search_start, search_start + 1),
        });

        let rests = self.extend_out(rule, prod_idx + 1, search_start + 1, search_end)?;
        Ok(
          rests
            .into_iter()
            .map(|mut seq| {
              seq.insert(0, leaf.clone());
              seq
            })
            .collect(),
        )
      }
    }
  }

  /// Takes a possibly-uncompleted tree, and returns all completed trees it
  /// describes. An uncompleted tree is a branch with fewer children than
  /// its rule has productions; it is passed through extend_out and its
  /// children completed recursively.
  fn make_trees(&mut self, tree: DerivTree) -> Result<Vec<DerivTree>, Error> {
    if Self::subtree_is_complete(&tree) {
      return Ok(vec![tree]);
    }

    let (cons, _) = match tree.into_branch() {
      Some(branch) => branch,
      None => unreachable!("incomplete tree must be a branch"),
    };
    let rule = cons.value.clone();

    let mut out = Vec::new();
    for children in self.extend_out(&rule, 0, cons.span.0, cons.span.1)? {
      let mut child_sets = Vec::with_capacity(children.len());
      for child in children {
        child_sets.push(self.make_trees(child)?);
      }
      let combos = combinations(&child_sets);
      self.charge(combos.len())?;
      out.extend(
        combos
          .into_iter()
          .map(|set| SynTree::Branch(cons.clone(), set)),
      );
    }
    Ok(out)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::earley::tests::{test_grammar, token};
  use crate::earley::parse_chart;

  fn xs(n: usize) -> Vec<Token> {
    (0..n).map(|i| token("x", i, &["x"])).collect()
  }

  #[test]
  fn test_forest_from_chart() {
    let g = test_grammar(&[("S", &[("x", false)]), ("S", &[("S", true), ("S", true)])]);
    let input = xs(3);
    let chart = parse_chart(&g, &input, Limits::default()).unwrap();
    let forest: Forest = chart.into();

    // completed spans per origin: 0..{1,2,3}, 1..{2,3}, 2..3
    assert_eq!(forest.states_at(0).len(), 3);
    assert_eq!(forest.states_at(1).len(), 2);
    assert_eq!(forest.states_at(2).len(), 1);
  }

  #[test]
  fn test_tree_generation_avoids_spurious_ambiguity() {
    // the tree ambiguity problem that naive earley forest processing has.
    // correct algorithm finds 2 trees:
    //  (S (S x) (S (S x) (S x)))           -> [x][xx]
    //  (S (S (S x) (S x)) (S x))           -> [xx][x]
    // naive algorithm finds 2 addl. spurious trees:
    //  (S (S x) (S x))                     -> [x][x]
    //  (S (S (S x) (S x)) (S (S x) (S x))) -> [xx][xx]
    let g = test_grammar(&[("S", &[("x", false)]), ("S", &[("S", true), ("S", true)])]);
    let input = xs(3);
    let chart = parse_chart(&g, &input, Limits::default()).unwrap();
    let forest: Forest = chart.into();
    let trees = forest.trees(&g, &input, Limits::default()).unwrap();
    assert_eq!(trees.len(), 2);
  }

  #[test]
  fn test_nullable_at_end_of_input() {
    // OPT is nullable and sentence-final; its zero-width completion
    // originates at the very end of the input
    let g = test_grammar(&[
      ("S", &[("x", false), ("OPT", true)]),
      ("OPT", &[("p", false)]),
      ("OPT", &[]),
    ]);
    let input = xs(1);
    let chart = parse_chart(&g, &input, Limits::default()).unwrap();
    let forest: Forest = chart.into();
    let trees = forest.trees(&g, &input, Limits::default()).unwrap();
    assert_eq!(trees.len(), 1);

    // and the optional element still parses when present
    let input = vec![token("x", 0, &["x"]), token("p", 1, &["p"])];
    let chart = parse_chart(&g, &input, Limits::default()).unwrap();
    let forest: Forest = chart.into();
    let trees = forest.trees(&g, &input, Limits::default()).unwrap();
    assert_eq!(trees.len(), 1);
  }

  #[test]
  fn test_no_parse_is_empty_not_error() {
    let g = test_grammar(&[("S", &[("x", false)])]);
    let input = vec![token("y", 0, &["y"])];
    let chart = parse_chart(&g, &input, Limits::default()).unwrap();
    let forest: Forest = chart.into();
    assert!(forest.trees(&g, &input, Limits::default()).unwrap().is_empty());
  }

  #[test]
  fn test_tree_limit() {
    let g = test_grammar(&[("S", &[("x", false)]), ("S", &[("S", true), ("S", true)])]);
    let input = xs(12);
    let limits = Limits {
      max_chart_states: 1_000_000,
      max_trees: 50,
    };
    let chart = parse_chart(&g, &input, limits).unwrap();
    let forest: Forest = chart.into();
    assert!(matches!(
      forest.trees(&g, &input, limits),
      Err(Error::ResourceLimit { .. })
    ));
  }
}
