//! Tokenizes raw text against the compiled lexicon. Lexing never fails:
//! unknown words become tokens with an empty tag set, which no rule can
//! consume, so the sentence simply yields zero derivations.

use std::fmt;

use regex::Regex;

use crate::category::CategoryTag;
use crate::lexicon::Lexicon;

/// A contiguous span of the input with its possible lexical readings.
/// Multi-word lexical entries ("in front of") occupy a single token whose
/// `span` covers more than one underlying word.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
  pub text: String,
  /// Underlying whitespace-delimited word indices, `(start, end)` exclusive.
  pub span: (usize, usize),
  pub tags: Vec<CategoryTag>,
}

impl Token {
  pub fn new(text: impl Into<String>, span: (usize, usize), tags: Vec<CategoryTag>) -> Self {
    Self {
      text: text.into(),
      span,
      tags,
    }
  }

  pub fn has_tag(&self, tag: &CategoryTag) -> bool {
    self.tags.contains(tag)
  }
}

impl fmt::Display for Token {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} [", self.text)?;
    for (idx, tag) in self.tags.iter().enumerate() {
      if idx > 0 {
        write!(f, ", ")?;
      }
      write!(f, "{}", tag)?;
    }
    write!(f, "]")
  }
}

/// helper macro for initializing a regex with lazy_static!
macro_rules! regex_static {
  ($name:ident, $pattern:expr) => {
    lazy_static! {
      static ref $name: Regex = Regex::new($pattern).unwrap();
    }
  };
}

/// Splits input into lowercase candidate words. Punctuation marks separate
/// into their own words and are looked up like any other lexical entry.
fn split_words(input: &str) -> Vec<String> {
  regex_static!(WORD_OR_PUNCT, r"[a-z0-9']+|[.,;:!?]");
  let lowered = input.to_lowercase();
  WORD_OR_PUNCT
    .find_iter(&lowered)
    .map(|m| m.as_str().to_string())
    .collect()
}

/// Tokenizes `input`, resolving multi-word lexical entries longest-match
/// first so known idioms are never split.
pub fn tokenize(lexicon: &Lexicon, input: &str) -> Vec<Token> {
  let words = split_words(input);
  let mut tokens = Vec::with_capacity(words.len());

  let mut i = 0;
  while i < words.len() {
    let longest = lexicon.max_phrase_words().min(words.len() - i);
    let mut consumed = None;
    for n in (2..=longest).rev() {
      let phrase = words[i..i + n].join(" ");
      if let Some(tags) = lexicon.tags(&phrase) {
        consumed = Some(Token::new(phrase, (i, i + n), tags.to_vec()));
        break;
      }
    }
    let token = consumed.unwrap_or_else(|| {
      let tags = lexicon.tags(&words[i]).map(<[_]>::to_vec).unwrap_or_default();
      Token::new(words[i].clone(), (i, i + 1), tags)
    });
    i = token.span.1;
    tokens.push(token);
  }

  tokens
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::lexicon::LexiconSource;

  fn lexicon() -> Lexicon {
    Lexicon::compile(&LexiconSource::builtin().unwrap()).unwrap()
  }

  fn texts(tokens: &[Token]) -> Vec<&str> {
    tokens.iter().map(|t| t.text.as_str()).collect()
  }

  #[test]
  fn test_splits_words_and_punctuation() {
    let l = lexicon();
    let tokens = tokenize(&l, "The dog ran.");
    assert_eq!(texts(&tokens), vec!["the", "dog", "ran", "."]);
    assert!(tokens[0].has_tag(&"det_sg".into()));
    assert!(tokens[2].has_tag(&"vbf_sg".into()));
    assert!(tokens[3].has_tag(&"period".into()));
  }

  #[test]
  fn test_multi_word_longest_match() {
    let l = lexicon();
    let tokens = tokenize(&l, "The dog ran in front of the wall.");
    assert_eq!(
      texts(&tokens),
      vec!["the", "dog", "ran", "in front of", "the", "wall", "."]
    );
    let idiom = &tokens[3];
    assert_eq!(idiom.span, (3, 6));
    assert!(idiom.has_tag(&"preposition".into()));
  }

  #[test]
  fn test_unknown_word_yields_empty_tags() {
    let l = lexicon();
    let tokens = tokenize(&l, "the florp ran");
    assert_eq!(texts(&tokens), vec!["the", "florp", "ran"]);
    assert!(tokens[1].tags.is_empty());
  }

  #[test]
  fn test_case_insensitive() {
    let l = lexicon();
    let tokens = tokenize(&l, "THE DOG RAN");
    assert_eq!(texts(&tokens), vec!["the", "dog", "ran"]);
    assert!(tokens[1].has_tag(&"noun_sg".into()));
  }

  #[test]
  fn test_empty_input() {
    let l = lexicon();
    assert!(tokenize(&l, "").is_empty());
    assert!(tokenize(&l, "   ").is_empty());
  }
}
