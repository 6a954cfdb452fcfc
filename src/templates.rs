//! Frame templates: parametrized rule skeletons, instantiated per verb
//! subcategorization frame, inflectional variant, and fossilization flags.
//! Overlapping instantiations are all kept; disambiguation is deferred
//! entirely to derivation enumeration.

use crate::category::CategoryTag;
use crate::lexicon::{FrameFlag, FrameKind, FrameSig, Lexicon};
use crate::rules::{Production, Rule, RuleOrigin};

/// The grammar's start symbol: a clause plus optional terminator.
pub const START: &str = "S";

/// Finite verb form and the VP nonterminals it feeds, per number.
const NUMBERS: [(&str, &str, &str); 2] = [
  ("vbf_sg", "VP_SG", "VP_GAP_SG"),
  ("vbf_pl", "VP_PL", "VP_GAP_PL"),
];

fn lex(tag: &str) -> Production {
  Production::Lexical(CategoryTag::new(tag))
}

fn phr(tag: &str) -> Production {
  Production::Phrasal(CategoryTag::new(tag))
}

fn structural(family: &'static str, symbol: &str, productions: Vec<Production>) -> Rule {
  Rule {
    symbol: CategoryTag::new(symbol),
    productions,
    origin: RuleOrigin::structural(family),
  }
}

fn framed(family: &'static str, frame: &FrameSig, symbol: &str, productions: Vec<Production>) -> Rule {
  Rule {
    symbol: CategoryTag::new(symbol),
    productions,
    origin: RuleOrigin::frame(family, &frame.cat),
  }
}

/// Generates the complete rule set for the lexicon's frame inventory.
pub fn instantiate(lexicon: &Lexicon) -> Vec<Rule> {
  let mut rules = Vec::new();
  clause_rules(&mut rules);
  np_rules(&mut rules);
  coordination_rules(&mut rules);
  relative_rules(&mut rules);
  copula_rules(&mut rules);
  adjunct_rules(&mut rules);
  for frame in lexicon.frames() {
    frame_rules(&mut rules, frame);
  }
  rules
}

fn clause_rules(rules: &mut Vec<Rule>) {
  let f = "clause";
  // declaratives take an optional terminator, interrogatives an optional
  // question mark; both punctuation categories are nullable
  rules.push(structural(f, "S", vec![phr("CLAUSE"), phr("TERM_PUNCT")]));
  rules.push(structural(f, "S", vec![phr("WH_CLAUSE"), phr("Q_PUNCT")]));
  rules.push(structural(f, "TERM_PUNCT", vec![lex("period")]));
  rules.push(structural(f, "TERM_PUNCT", vec![lex("excl_mark")]));
  rules.push(structural(f, "TERM_PUNCT", vec![]));
  rules.push(structural(f, "Q_PUNCT", vec![lex("qmark")]));
  rules.push(structural(f, "Q_PUNCT", vec![]));

  // subject-predicate agreement by distinct number tags
  rules.push(structural(f, "CLAUSE", vec![phr("NP_NOM_SG"), phr("VP_SG")]));
  rules.push(structural(f, "CLAUSE", vec![phr("NP_NOM_PL"), phr("VP_PL")]));

  // subject extraction: no inversion, the wh-word stands in subject position
  rules.push(structural(f, "WH_CLAUSE", vec![lex("wh_pron"), phr("VP_SG")]));
}

fn np_rules(rules: &mut Vec<Rule>) {
  let f = "np";
  rules.push(structural(f, "NP_NOM_SG", vec![lex("pron_nom_sg")]));
  rules.push(structural(f, "NP_NOM_SG", vec![phr("DP_SG")]));
  rules.push(structural(f, "NP_NOM_PL", vec![lex("pron_nom_pl")]));
  rules.push(structural(f, "NP_NOM_PL", vec![phr("DP_PL")]));

  rules.push(structural(f, "DP_SG", vec![lex("det_sg"), phr("NOM_SG")]));
  rules.push(structural(f, "DP_SG", vec![phr("UNC_NOM")]));
  rules.push(structural(f, "DP_PL", vec![lex("det_pl"), phr("NOM_PL")]));
  // bare plural: "dogs bark"
  rules.push(structural(f, "DP_PL", vec![phr("NOM_PL")]));

  rules.push(structural(f, "NOM_SG", vec![lex("noun_sg")]));
  rules.push(structural(f, "NOM_SG", vec![lex("adj"), phr("NOM_SG")]));
  rules.push(structural(f, "NOM_SG", vec![phr("NOM_SG"), phr("PP")]));
  rules.push(structural(f, "NOM_SG", vec![phr("NOM_SG"), phr("REL_CL_SG")]));
  rules.push(structural(f, "NOM_PL", vec![lex("noun_pl")]));
  rules.push(structural(f, "NOM_PL", vec![lex("adj"), phr("NOM_PL")]));
  rules.push(structural(f, "NOM_PL", vec![phr("NOM_PL"), phr("PP")]));
  rules.push(structural(f, "NOM_PL", vec![phr("NOM_PL"), phr("REL_CL_PL")]));

  // bare uncountable: "water ran"
  rules.push(structural(f, "UNC_NOM", vec![lex("uncountable_noun")]));
  rules.push(structural(f, "UNC_NOM", vec![lex("adj"), phr("UNC_NOM")]));

  rules.push(structural(f, "NP_ACC", vec![lex("pron_acc_sg")]));
  rules.push(structural(f, "NP_ACC", vec![lex("pron_acc_pl")]));
  rules.push(structural(f, "NP_ACC", vec![phr("NP_ACC_NONPRON")]));
  // the particle-first order may not precede an unstressed pronoun object,
  // so it references this restricted category instead of NP_ACC
  rules.push(structural(f, "NP_ACC_NONPRON", vec![phr("DP_SG")]));
  rules.push(structural(f, "NP_ACC_NONPRON", vec![phr("DP_PL")]));

  rules.push(structural(f, "PP", vec![lex("preposition"), phr("NP_ACC")]));
  rules.push(structural(f, "ADJP", vec![lex("adj")]));
  rules.push(structural(f, "ADJP", vec![lex("adv_deg"), lex("adj")]));

  // intentionally nullable optional elements
  rules.push(structural(f, "AS_OPT", vec![lex("prep_as")]));
  rules.push(structural(f, "AS_OPT", vec![]));
  rules.push(structural(f, "BY_PP_OPT", vec![lex("prep_by"), phr("NP_ACC")]));
  rules.push(structural(f, "BY_PP_OPT", vec![]));
}

fn coordination_rules(rules: &mut Vec<Rule>) {
  let f = "coordination";
  // clause coordination, binary and correlative
  for coord in ["coord_and", "coord_or", "coord_but"] {
    rules.push(structural(f, "CLAUSE", vec![phr("CLAUSE"), lex(coord), phr("CLAUSE")]));
  }
  for (corr, coord) in [
    ("corr_either", "coord_or"),
    ("corr_neither", "coord_nor"),
    ("corr_both", "coord_and"),
    ("corr_not_only", "coord_but"),
  ] {
    rules.push(structural(
      f,
      "CLAUSE",
      vec![lex(corr), phr("CLAUSE"), lex(coord), phr("CLAUSE")],
    ));
  }

  // number-neutral wrapper for coordination bodies
  rules.push(structural(f, "NP_NOM", vec![phr("NP_NOM_SG")]));
  rules.push(structural(f, "NP_NOM", vec![phr("NP_NOM_PL")]));

  // and-coordination yields a plural subject; or/nor agree with their
  // (number-matched) conjuncts
  rules.push(structural(
    f,
    "NP_NOM_PL",
    vec![phr("NP_NOM"), lex("coord_and"), phr("NP_NOM")],
  ));
  for num in ["NP_NOM_SG", "NP_NOM_PL"] {
    rules.push(structural(f, num, vec![phr(num), lex("coord_or"), phr(num)]));
  }
  rules.push(structural(
    f,
    "NP_NOM_PL",
    vec![lex("corr_both"), phr("NP_NOM"), lex("coord_and"), phr("NP_NOM")],
  ));
  for (corr, coord) in [
    ("corr_either", "coord_or"),
    ("corr_neither", "coord_nor"),
    ("corr_not_only", "coord_but"),
  ] {
    rules.push(structural(
      f,
      "NP_NOM_SG",
      vec![lex(corr), phr("NP_NOM_SG"), lex(coord), phr("NP_NOM_SG")],
    ));
  }

  // list coordination: "the dog, the cat and the fox"
  rules.push(structural(
    f,
    "NP_NOM_PL",
    vec![phr("NP_NOM"), lex("comma"), phr("NP_LIST")],
  ));
  rules.push(structural(
    f,
    "NP_LIST",
    vec![phr("NP_NOM"), lex("comma"), phr("NP_LIST")],
  ));
  rules.push(structural(
    f,
    "NP_LIST",
    vec![phr("NP_NOM"), lex("coord_and"), phr("NP_NOM")],
  ));

  // object coordination is number-blind
  for coord in ["coord_and", "coord_or"] {
    rules.push(structural(f, "NP_ACC", vec![phr("NP_ACC"), lex(coord), phr("NP_ACC")]));
  }
}

fn relative_rules(rules: &mut Vec<Rule>) {
  let f = "relative";
  // subject relatives agree with the head noun
  rules.push(structural(f, "REL_CL_SG", vec![lex("rel_pron"), phr("VP_SG")]));
  rules.push(structural(f, "REL_CL_PL", vec![lex("rel_pron"), phr("VP_PL")]));
  // object relatives: the embedded clause carries an object gap
  rules.push(structural(f, "REL_CL_SG", vec![lex("rel_pron"), phr("CLAUSE_GAP")]));
  rules.push(structural(f, "REL_CL_PL", vec![lex("rel_pron"), phr("CLAUSE_GAP")]));
  rules.push(structural(f, "CLAUSE_GAP", vec![phr("NP_NOM_SG"), phr("VP_GAP_SG")]));
  rules.push(structural(f, "CLAUSE_GAP", vec![phr("NP_NOM_PL"), phr("VP_GAP_PL")]));
}

fn copula_rules(rules: &mut Vec<Rule>) {
  let f = "copula";
  for (be, vp) in [("be_sg", "VP_SG"), ("be_pl", "VP_PL")] {
    rules.push(structural(f, vp, vec![lex(be), phr("ADJP")]));
    rules.push(structural(f, vp, vec![lex(be), phr("NP_ACC")]));
  }
}

fn adjunct_rules(rules: &mut Vec<Rule>) {
  let f = "adjunct";
  for vp in ["VP_SG", "VP_PL"] {
    rules.push(structural(f, vp, vec![phr(vp), phr("PP")]));
    rules.push(structural(f, vp, vec![phr(vp), lex("adv_vp")]));
    rules.push(structural(f, vp, vec![lex("adv_vp"), phr(vp)]));
  }
}

/// Instantiates the clause templates for one verb frame, crossed with the
/// two finite-agreement variants and gated by the frame's fossilization
/// flags.
fn frame_rules(rules: &mut Vec<Rule>, frame: &FrameSig) {
  let prt_tag = frame.particle.as_deref().map(|p| format!("prt_{}", p));
  let prp_tag = frame.preposition.as_deref().map(|p| format!("prep_{}", p));

  for (fin, vp, gap) in NUMBERS {
    let fin = frame.form_tag(fin);
    let v = || Production::Lexical(fin.clone());

    match frame.kind {
      FrameKind::Intransitive => match prt_tag.as_deref() {
        Some(prt) => rules.push(framed("vp", frame, vp, vec![v(), lex(prt)])),
        None => rules.push(framed("vp", frame, vp, vec![v()])),
      },
      FrameKind::Monotransitive => {
        if let Some(prt) = prt_tag.as_deref() {
          if !frame.has_flag(FrameFlag::ObjectFirstOnly) {
            rules.push(framed(
              "vp",
              frame,
              vp,
              vec![v(), lex(prt), phr("NP_ACC_NONPRON")],
            ));
          }
          if !frame.has_flag(FrameFlag::NoParticleMovement) {
            rules.push(framed("vp", frame, vp, vec![v(), phr("NP_ACC"), lex(prt)]));
            if !frame.has_flag(FrameFlag::NoAdjunctInsertion) {
              rules.push(framed(
                "vp",
                frame,
                vp,
                vec![v(), phr("NP_ACC"), lex("adv_vp"), lex(prt)],
              ));
            }
          }
          rules.push(framed("relative", frame, gap, vec![v(), lex(prt)]));
        } else if let Some(prp) = prp_tag.as_deref() {
          // a true prepositional verb never reverses its order
          rules.push(framed("vp", frame, vp, vec![v(), lex(prp), phr("NP_ACC")]));
          rules.push(framed("relative", frame, gap, vec![v(), lex(prp)]));
        } else {
          rules.push(framed("vp", frame, vp, vec![v(), phr("NP_ACC")]));
          rules.push(framed("relative", frame, gap, vec![v()]));
        }
      }
      FrameKind::Ditransitive => {
        rules.push(framed("vp", frame, vp, vec![v(), phr("NP_ACC"), phr("NP_ACC")]));
        rules.push(framed("relative", frame, gap, vec![v(), phr("NP_ACC")]));
      }
      FrameKind::PredicativeComplement => {
        rules.push(framed("vp", frame, vp, vec![v(), phr("ADJP")]));
      }
      FrameKind::ObjectPredicative => match prp_tag.as_deref() {
        Some(_) => rules.push(framed(
          "vp",
          frame,
          vp,
          vec![v(), phr("NP_ACC"), phr("AS_OPT"), phr("ADJP")],
        )),
        None => rules.push(framed("vp", frame, vp, vec![v(), phr("NP_ACC"), phr("ADJP")])),
      },
      FrameKind::ThatClause => {
        rules.push(framed("content_clause", frame, vp, vec![v(), lex("sub_that"), phr("CLAUSE")]));
      }
      FrameKind::BareDeclarative => {
        rules.push(framed("content_clause", frame, vp, vec![v(), phr("CLAUSE")]));
      }
      FrameKind::ClosedInterrogative => {
        rules.push(framed(
          "content_clause",
          frame,
          vp,
          vec![v(), lex("sub_whether"), phr("CLAUSE")],
        ));
      }
      FrameKind::OpenInterrogative => {
        rules.push(framed("content_clause", frame, vp, vec![v(), phr("WH_CLAUSE")]));
      }
      FrameKind::Exclamative => {
        rules.push(framed("content_clause", frame, vp, vec![v(), lex("excl_how"), phr("CLAUSE")]));
      }
    }
  }

  // passives, once per frame (participles carry no number)
  let vbn = frame.form_tag("vbn");
  let participle = || Production::Lexical(vbn.clone());
  if frame.kind == FrameKind::Monotransitive && prp_tag.is_none() {
    for (be, vp) in [("be_sg", "VP_SG"), ("be_pl", "VP_PL")] {
      let mut body = vec![lex(be), participle()];
      if let Some(prt) = prt_tag.as_deref() {
        body.push(lex(prt));
      }
      body.push(phr("BY_PP_OPT"));
      rules.push(framed("passive", frame, vp, body));
    }
  }
  if frame.kind == FrameKind::Ditransitive {
    for (be, vp) in [("be_sg", "VP_SG"), ("be_pl", "VP_PL")] {
      rules.push(framed(
        "passive",
        frame,
        vp,
        vec![lex(be), participle(), phr("NP_ACC"), phr("BY_PP_OPT")],
      ));
    }
  }
}
