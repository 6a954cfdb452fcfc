//! Caller-facing derivation trees. Nodes live in a flat arena indexed by
//! `NodeId`, with parent links, so deeply recursive structures (relative
//! clauses inside noun phrases inside relative clauses) don't become deep
//! pointer chains and ancestor walks don't need recursion.

use std::fmt;

use crate::category::CategoryTag;
use crate::forest::DerivTree;
use crate::syntree::SynTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
  /// Interior node; children in left-to-right surface order.
  Branch(Vec<NodeId>),
  /// Terminal node carrying the surface word it consumed.
  Leaf(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
  pub tag: CategoryTag,
  /// Token span `(start, end)` exclusive. Zero-width for optional
  /// constituents matched against empty input.
  pub span: (usize, usize),
  pub parent: Option<NodeId>,
  pub kind: NodeKind,
}

/// One complete derivation of a sentence. Plain data: carries no references
/// into the grammar beyond the `CategoryTag` labels on its nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
  nodes: Vec<Node>,
  root: NodeId,
}

impl Tree {
  pub(crate) fn from_derivation(d: &DerivTree) -> Self {
    let mut tree = Self {
      nodes: Vec::new(),
      root: NodeId(0),
    };
    tree.root = tree.intern(d, None);
    tree
  }

  fn intern(&mut self, d: &DerivTree, parent: Option<NodeId>) -> NodeId {
    let id = NodeId(self.nodes.len());
    match d {
      SynTree::Leaf(word) => {
        self.nodes.push(Node {
          tag: word.value.tag.clone(),
          span: word.span,
          parent,
          kind: NodeKind::Leaf(word.value.text.clone()),
        });
      }
      SynTree::Branch(cons, children) => {
        self.nodes.push(Node {
          tag: cons.value.symbol.clone(),
          span: cons.span,
          parent,
          kind: NodeKind::Branch(Vec::new()),
        });
        let child_ids: Vec<NodeId> = children
          .iter()
          .map(|child| self.intern(child, Some(id)))
          .collect();
        self.nodes[id.0].kind = NodeKind::Branch(child_ids);
      }
    }
    id
  }

  pub fn root(&self) -> NodeId {
    self.root
  }

  pub fn get(&self, id: NodeId) -> &Node {
    &self.nodes[id.0]
  }

  pub fn parent(&self, id: NodeId) -> Option<NodeId> {
    self.get(id).parent
  }

  pub fn children(&self, id: NodeId) -> &[NodeId] {
    match &self.get(id).kind {
      NodeKind::Branch(children) => children,
      NodeKind::Leaf(_) => &[],
    }
  }

  pub fn leaf_text(&self, id: NodeId) -> Option<&str> {
    match &self.get(id).kind {
      NodeKind::Leaf(text) => Some(text),
      NodeKind::Branch(_) => None,
    }
  }

  /// All leaves under `id`, in surface order. Uses an explicit work stack
  /// rather than recursion.
  pub fn leaf_descendants(&self, id: NodeId) -> Vec<NodeId> {
    let mut leaves = Vec::new();
    let mut stack = vec![id];
    while let Some(next) = stack.pop() {
      match &self.get(next).kind {
        NodeKind::Leaf(_) => leaves.push(next),
        NodeKind::Branch(children) => stack.extend(children.iter().rev().copied()),
      }
    }
    leaves
  }

  /// Every leaf of the tree, in surface order.
  pub fn leaves(&self) -> Vec<NodeId> {
    self.leaf_descendants(self.root)
  }

  /// The surface words of the derivation, in order.
  pub fn words(&self) -> Vec<&str> {
    self
      .leaves()
      .into_iter()
      .filter_map(|id| self.leaf_text(id))
      .collect()
  }

  /// Walks up the parent chain from `id`, including `id` itself.
  pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
    let mut chain = vec![id];
    let mut cur = id;
    while let Some(p) = self.parent(cur) {
      chain.push(p);
      cur = p;
    }
    chain
  }

  /// A copy with zero-width constituents removed. Optional elements matched
  /// against empty input (an omitted "as", a missing terminator) clutter
  /// rendered output; this pruning is display-only and must not be applied
  /// before constituency or category testing.
  pub fn without_empty_nodes(&self) -> Self {
    let mut pruned = Self {
      nodes: Vec::new(),
      root: NodeId(0),
    };
    pruned.root = self.copy_nonempty(self.root, None, &mut pruned);
    pruned
  }

  fn copy_nonempty(&self, id: NodeId, parent: Option<NodeId>, out: &mut Tree) -> NodeId {
    let node = self.get(id);
    let new_id = NodeId(out.nodes.len());
    out.nodes.push(Node {
      tag: node.tag.clone(),
      span: node.span,
      parent,
      kind: match &node.kind {
        NodeKind::Leaf(text) => NodeKind::Leaf(text.clone()),
        NodeKind::Branch(_) => NodeKind::Branch(Vec::new()),
      },
    });
    if let NodeKind::Branch(children) = &node.kind {
      let kept: Vec<NodeId> = children
        .iter()
        .filter(|&&child| {
          let c = self.get(child);
          c.span.0 != c.span.1
        })
        .map(|&child| self.copy_nonempty(child, Some(new_id), out))
        .collect();
      out.nodes[new_id.0].kind = NodeKind::Branch(kept);
    }
    new_id
  }

  fn fmt_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId, depth: usize) -> fmt::Result {
    let node = self.get(id);
    match &node.kind {
      NodeKind::Leaf(text) => write!(f, "{:indent$}({} {})", "", node.tag, text, indent = depth * 2),
      NodeKind::Branch(children) => {
        write!(f, "{:indent$}({}", "", node.tag, indent = depth * 2)?;
        for &child in children {
          writeln!(f)?;
          self.fmt_node(f, child, depth + 1)?;
        }
        write!(f, ")")
      }
    }
  }
}

impl fmt::Display for Tree {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.fmt_node(f, self.root, 0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::forest::Leaf;
  use crate::rules::{Production, Rule, RuleOrigin};
  use crate::syntree::{Constituent, Word};
  use std::sync::Arc;

  fn rule(symbol: &str, body: &[&str]) -> Arc<Rule> {
    Arc::new(Rule {
      symbol: CategoryTag::new(symbol),
      productions: body
        .iter()
        .map(|t| Production::Lexical(CategoryTag::new(t)))
        .collect(),
      origin: RuleOrigin::structural("test"),
    })
  }

  fn leaf(text: &str, tag: &str, pos: usize) -> DerivTree {
    SynTree::Leaf(Word {
      value: Leaf {
        text: text.to_string(),
        tag: CategoryTag::new(tag),
      },
      span: (pos, pos + 1),
    })
  }

  fn sample() -> Tree {
    // (S (NP (det the) (noun_sg dog)) (vbf_sg ran) (OPT))
    let np = SynTree::Branch(
      Constituent {
        value: rule("NP", &["det", "noun_sg"]),
        span: (0, 2),
      },
      vec![leaf("the", "det", 0), leaf("dog", "noun_sg", 1)],
    );
    let opt = SynTree::Branch(
      Constituent {
        value: rule("OPT", &[]),
        span: (3, 3),
      },
      vec![],
    );
    let s = SynTree::Branch(
      Constituent {
        value: rule("S", &["NP", "vbf_sg", "OPT"]),
        span: (0, 3),
      },
      vec![np, leaf("ran", "vbf_sg", 2), opt],
    );
    Tree::from_derivation(&s)
  }

  #[test]
  fn test_words_in_surface_order() {
    let tree = sample();
    assert_eq!(tree.words(), vec!["the", "dog", "ran"]);
  }

  #[test]
  fn test_parent_links() {
    let tree = sample();
    let leaves = tree.leaves();
    let the = tree.get(leaves[0]);
    assert_eq!(the.tag, CategoryTag::new("det"));
    let np = tree.parent(leaves[0]).unwrap();
    assert_eq!(tree.get(np).tag, CategoryTag::new("NP"));
    assert_eq!(tree.parent(np), Some(tree.root()));
    assert_eq!(tree.parent(tree.root()), None);
  }

  #[test]
  fn test_leaf_descendants() {
    let tree = sample();
    let np = tree.children(tree.root())[0];
    let under_np: Vec<&str> = tree
      .leaf_descendants(np)
      .into_iter()
      .filter_map(|id| tree.leaf_text(id))
      .collect();
    assert_eq!(under_np, vec!["the", "dog"]);
  }

  #[test]
  fn test_without_empty_nodes() {
    let tree = sample();
    assert_eq!(tree.children(tree.root()).len(), 3);
    let pruned = tree.without_empty_nodes();
    assert_eq!(pruned.children(pruned.root()).len(), 2);
    // pruning is display-only and leaves the original intact
    assert_eq!(tree.children(tree.root()).len(), 3);
    assert_eq!(pruned.words(), vec!["the", "dog", "ran"]);
  }

  #[test]
  fn test_display() {
    let tree = sample().without_empty_nodes();
    let rendered = tree.to_string();
    assert!(rendered.starts_with("(S"));
    assert!(rendered.contains("(det the)"));
    assert!(rendered.contains("(noun_sg dog)"));
  }
}
