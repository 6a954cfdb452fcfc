use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::error::{Error, GrammarIntegrityError};
use crate::grammar::Grammar;
use crate::lexer::Token;
use crate::rules::{Production, Rule};

/// Bounds on working-state growth. Ambiguity, not sentence length, is the
/// practical cost driver, so both the chart and the enumerated derivation
/// set are capped; exceeding either is `Error::ResourceLimit`, recoverable
/// by the caller.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
  pub max_chart_states: usize,
  pub max_trees: usize,
}

impl Default for Limits {
  fn default() -> Self {
    Self {
      max_chart_states: 100_000,
      max_trees: 10_000,
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LR0 {
  pub rule: Arc<Rule>,
  pub pos: usize,
}

impl LR0 {
  pub fn new(rule: &Arc<Rule>) -> Self {
    Self {
      rule: rule.clone(),
      pos: 0,
    }
  }

  pub fn is_active(&self) -> bool {
    self.pos < self.rule.len()
  }

  pub fn advance(&self) -> Self {
    assert!(self.is_active());
    Self {
      rule: self.rule.clone(),
      pos: self.pos + 1,
    }
  }

  pub fn next_production(&self) -> Option<&Production> {
    self.rule.productions.get(self.pos)
  }
}

impl fmt::Display for LR0 {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} →", self.rule.symbol)?;
    for idx in 0..self.rule.len() {
      if idx == self.pos {
        write!(f, " ・")?;
      }
      write!(f, " {}", self.rule.productions[idx])?;
    }
    if !self.is_active() {
      write!(f, " ・")?;
    }
    Ok(())
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct State {
  pub lr0: LR0,
  pub origin: usize,
}

impl State {
  pub fn new(lr0: LR0, origin: usize) -> Self {
    Self { lr0, origin }
  }

  pub fn advance(&self) -> Self {
    Self::new(self.lr0.advance(), self.origin)
  }
}

#[derive(Debug)]
pub struct Chart {
  positions: Vec<Vec<State>>,
  total_states: usize,
}

impl Chart {
  pub fn new(length: usize) -> Self {
    Self {
      positions: vec![Vec::new(); length],
      total_states: 0,
    }
  }

  pub fn len(&self) -> usize {
    self.positions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn len_at(&self, k: usize) -> usize {
    self.positions[k].len()
  }

  pub fn total_states(&self) -> usize {
    self.total_states
  }

  pub fn has(&self, k: usize, state: &State) -> bool {
    self.positions[k].contains(state)
  }

  pub fn add(&mut self, k: usize, state: State) {
    if !self.has(k, &state) {
      self.positions[k].push(state);
      self.total_states += 1;
    }
  }

  /// Get an owned state so that passing around &mut chart is more ergonomic.
  /// The clone is fairly cheap, only an Arc + 2 usize.
  fn get_state(&self, k: usize, idx: usize) -> State {
    self.positions[k][idx].clone()
  }
}

impl IntoIterator for Chart {
  type Item = (usize, Vec<State>);
  type IntoIter = std::iter::Enumerate<std::vec::IntoIter<Vec<State>>>;

  fn into_iter(self) -> Self::IntoIter {
    self.positions.into_iter().enumerate()
  }
}

impl fmt::Display for Chart {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for k in 0..self.len() {
      writeln!(f, "State {}:", k)?;
      for state in self.positions[k].iter() {
        writeln!(f, "  {}..{}: {}", state.origin, k, state.lr0)?;
      }
    }
    Ok(())
  }
}

/// Builds the full Earley chart for the token sequence. Failing to span the
/// input is not an error here; the chart simply contains no suitable
/// completed start state and derivation enumeration returns nothing.
pub fn parse_chart(g: &Grammar, input: &[Token], limits: Limits) -> Result<Chart, Error> {
  let mut chart = Chart::new(input.len() + 1);

  let start_rules = g
    .rules_for(&g.start)
    .ok_or_else(|| GrammarIntegrityError::MissingStart(g.start.clone()))?;
  for rule in start_rules {
    chart.add(0, State::new(LR0::new(rule), 0));
  }

  for k in 0..chart.len() {
    // need to use while loop because the number of states at k can expand during the loop
    let mut idx = 0;
    while idx < chart.len_at(k) {
      let state = chart.get_state(k, idx);
      idx += 1;

      match state.lr0.next_production() {
        None => completer(&mut chart, k, &state),
        Some(Production::Phrasal(_)) => predictor(g, &mut chart, k, &state)?,
        Some(Production::Lexical(_)) => scanner(&mut chart, k, &state, input),
      }

      if chart.total_states() > limits.max_chart_states {
        return Err(Error::ResourceLimit {
          kind: "chart states",
          limit: limits.max_chart_states,
        });
      }
    }
  }

  trace!(states = chart.total_states(), "built chart");
  Ok(chart)
}

fn completer(chart: &mut Chart, k: usize, state: &State) {
  debug_assert!(!state.lr0.is_active(), "tried to complete active state");

  // lr0 has been completed, now look for states in the chart that are waiting for its symbol
  for idx in 0..chart.len_at(state.origin) {
    let other = chart.get_state(state.origin, idx);

    if let Some(np) = other.lr0.next_production() {
      if np.is_phrasal() && np.tag() == &state.lr0.rule.symbol {
        // found one, advance its dot and add the new state to the chart *at k*,
        // because it's now waiting on a token there
        chart.add(k, other.advance())
      }
    }
  }
}

fn predictor(g: &Grammar, chart: &mut Chart, k: usize, state: &State) -> Result<(), Error> {
  debug_assert!(state.lr0.is_active(), "tried to predict non-active state");

  // this lr0 is waiting for a phrase; hypothesize that one of the rules
  // building it will succeed at the current position
  let needed = state.lr0.next_production().map(|p| p.tag().clone());
  let needed = match needed {
    Some(tag) => tag,
    None => return Ok(()),
  };

  let wanted_rules = g.rules_for(&needed).ok_or_else(|| {
    // a phrasal tag with no rules means the compiler's invariant was violated
    GrammarIntegrityError::UnproducedTag {
      rule: state.lr0.rule.to_string(),
      tag: needed.clone(),
    }
  })?;

  for wanted_rule in wanted_rules {
    chart.add(k, State::new(LR0::new(wanted_rule), k));
  }

  if g.is_nullable(&needed) {
    // automatically complete `state` early, because its next production may
    // be produced by empty input. If we don't do this, nullable rules won't
    // be completed correctly, because complete() won't run after predict()
    // without a new symbol.
    chart.add(k, state.advance());
  }

  Ok(())
}

fn scanner(chart: &mut Chart, k: usize, state: &State, input: &[Token]) {
  debug_assert!(state.lr0.is_active(), "tried to scan non-active state");

  if let Some(p) = state.lr0.next_production() {
    if k < input.len() && input[k].has_tag(p.tag()) {
      // advance the state to consume this token, and add to state k + 1,
      // where it will look for the next token
      chart.add(k + 1, state.advance());
    }
  }
}

#[cfg(test)]
pub mod tests {
  use super::*;
  use crate::category::CategoryTag;

  pub fn token(text: &str, pos: usize, tags: &[&str]) -> Token {
    Token::new(
      text,
      (pos, pos + 1),
      tags.iter().map(|t| CategoryTag::new(t)).collect(),
    )
  }

  pub fn test_grammar(rule_specs: &[(&str, &[(&str, bool)])]) -> Grammar {
    use std::collections::HashMap;
    use crate::rules::{Rule, RuleOrigin};

    // hand-assembled grammar, bypassing the template compiler: `true` marks
    // a phrasal production
    let mut rules: HashMap<CategoryTag, Vec<Arc<Rule>>> = HashMap::new();
    for (symbol, prods) in rule_specs {
      let rule = Rule {
        symbol: CategoryTag::new(symbol),
        productions: prods
          .iter()
          .map(|(tag, phrasal)| {
            if *phrasal {
              Production::Phrasal(CategoryTag::new(tag))
            } else {
              Production::Lexical(CategoryTag::new(tag))
            }
          })
          .collect(),
        origin: RuleOrigin::structural("test"),
      };
      rules
        .entry(rule.symbol.clone())
        .or_default()
        .push(Arc::new(rule));
    }

    Grammar::from_parts(CategoryTag::new(rule_specs[0].0), rules)
  }

  #[test]
  fn test_scanner_matches_tag_sets() {
    let g = test_grammar(&[("S", &[("x", false), ("x", false)])]);
    let input = vec![token("foo", 0, &["x", "y"]), token("bar", 1, &["x"])];
    let chart = parse_chart(&g, &input, Limits::default()).unwrap();

    // the start rule completes over the whole input
    assert!(
      chart.positions[2]
        .iter()
        .any(|s| !s.lr0.is_active() && s.origin == 0)
    );
  }

  #[test]
  fn test_untagged_token_blocks_parse() {
    let g = test_grammar(&[("S", &[("x", false)])]);
    let input = vec![token("unknown", 0, &[])];
    let chart = parse_chart(&g, &input, Limits::default()).unwrap();
    assert!(!chart.positions[1].iter().any(|s| !s.lr0.is_active()));
  }

  #[test]
  fn test_chart_state_limit() {
    // highly ambiguous: S -> S S | x
    let g = test_grammar(&[("S", &[("x", false)]), ("S", &[("S", true), ("S", true)])]);
    let input: Vec<Token> = (0..40).map(|i| token("x", i, &["x"])).collect();
    let limits = Limits {
      max_chart_states: 100,
      max_trees: 10_000,
    };
    assert!(matches!(
      parse_chart(&g, &input, limits),
      Err(Error::ResourceLimit { .. })
    ));
  }
}
