use rkyv::{Archive, Deserialize, Serialize};
use crate::category::{Category, CategorySet};
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// Inclusive range `[start, end]` of original token positions covered by a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn token_count(&self) -> usize {
        self.end + 1 - self.start
    }

    /// Number of original token positions strictly between `self` and a later span.
    pub fn gap_to(&self, later: &Span) -> usize {
        later.start.saturating_sub(self.end + 1)
    }
}

/// One chunk of the sentence as delivered by the upstream tagger/chunker.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub struct Chunk {
    pub kind: Category,
    /// Fine-grained tags, primary tag first.
    pub tags: Vec<Category>,
    pub tokens: Vec<String>,
    pub span: Span,
}

impl Chunk {
    pub fn primary_tag(&self) -> Option<Category> {
        self.tags.first().copied()
    }

    pub fn head_token(&self) -> Option<&str> {
        self.tokens.first().map(String::as_str)
    }

    pub fn text(&self) -> String {
        self.tokens.join(" ")
    }
}

/// A node of the reduced forest: a chunk, its relation to its head, and the
/// dependents it absorbed from each side.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub struct Node {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub chunk: Chunk,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub label: Option<Label>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub left: Vec<Node>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub right: Vec<Node>,
}

impl Node {
    pub fn is_root(&self) -> bool {
        self.label == Some(Label::Root)
    }

    /// Depth-first walk over this node and every descendant, left children
    /// before right children.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Node)) {
        visit(self);
        for child in self.left.iter().chain(self.right.iter()) {
            child.walk(visit);
        }
    }

    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.left.iter().chain(self.right.iter())
    }

    pub fn size(&self) -> usize {
        1 + self.children().map(Node::size).sum::<usize>()
    }
}

/// Which side of an adjacent pair becomes the head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
#[repr(u8)]
pub enum Direction {
    /// `<-`: the left node keeps its place and absorbs the right node as a right child.
    #[cfg_attr(feature = "serde", serde(rename = "<-"))]
    HeadLeft = 0,
    /// `->`: the right node keeps its place and absorbs the left node as a left child.
    #[cfg_attr(feature = "serde", serde(rename = "->"))]
    HeadRight = 1,
}

impl Direction {
    pub const fn arrow(self) -> &'static str {
        match self {
            Direction::HeadLeft => "<-",
            Direction::HeadRight => "->",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.arrow())
    }
}

macro_rules! define_labels {
    ($( $name:ident => $text:literal, )*) => {
        /// Dependency relation carried by a dependent (or `ROOT` by the main predicate).
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Archive, Serialize, Deserialize)]
        #[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
        #[archive(check_bytes)]
        #[repr(u8)]
        pub enum Label {
            $(
                #[cfg_attr(feature = "serde", serde(rename = $text))]
                $name,
            )*
        }

        impl Label {
            pub const ALL: &'static [Label] = &[$(Label::$name,)*];

            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Label::$name => $text,)*
                }
            }

            pub fn from_name(s: &str) -> Option<Self> {
                match s {
                    $($text => Some(Label::$name),)*
                    _ => None,
                }
            }
        }
    };
}

define_labels! {
    Root => "ROOT",
    Nsubj => "nsubj",
    Nsubjpass => "nsubjpass",
    Dobj => "dobj",
    Iobj => "iobj",
    Attr => "attr",
    Aux => "aux",
    Auxpass => "auxpass",
    Neg => "neg",
    Det => "det",
    Poss => "poss",
    Amod => "amod",
    Advmod => "advmod",
    Nummod => "nummod",
    Compound => "compound",
    Prep => "prep",
    Pobj => "pobj",
    Prt => "prt",
    Acomp => "acomp",
    Xcomp => "xcomp",
    Ccomp => "ccomp",
    Mark => "mark",
    Cc => "cc",
    Conj => "conj",
    Punct => "punct",
    Dep => "dep",
}

impl Label {
    /// Subject relations a head may receive at most once from its left side.
    pub const fn is_single_subject(self) -> bool {
        matches!(self, Label::Nsubj | Label::Nsubjpass)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a rule table. Rules are matched in table order, first match wins.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[archive(check_bytes)]
pub struct Rule {
    /// Admissible kinds of the left node; empty admits any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub left: CategorySet,
    /// Admissible kinds of the right node; empty admits any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub right: CategorySet,
    /// Canonical lemmas admitted for the left node's first token; empty admits any.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub left_tokens: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub right_tokens: Vec<String>,
    pub direction: Direction,
    pub label: Label,
    /// The rule is only eligible on iterations strictly greater than this.
    #[cfg_attr(feature = "serde", serde(default, with = "crate::sentinel"))]
    pub delay: Option<u32>,
    /// Largest admissible gap, in original token positions, between the two spans.
    #[cfg_attr(feature = "serde", serde(default, with = "crate::sentinel"))]
    pub max_distance: Option<u32>,
}

impl Rule {
    pub fn new(left: CategorySet, right: CategorySet, direction: Direction, label: Label) -> Self {
        Self {
            left,
            right,
            left_tokens: Vec::new(),
            right_tokens: Vec::new(),
            direction,
            label,
            delay: None,
            max_distance: None,
        }
    }

    pub fn with_left_tokens(mut self, tokens: &[&str]) -> Self {
        self.left_tokens = tokens.iter().map(|t| String::from(*t)).collect();
        self
    }

    pub fn with_right_tokens(mut self, tokens: &[&str]) -> Self {
        self.right_tokens = tokens.iter().map(|t| String::from(*t)).collect();
        self
    }

    pub fn with_delay(mut self, delay: u32) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_max_distance(mut self, max_distance: u32) -> Self {
        self.max_distance = Some(max_distance);
        self
    }
}

/// Serialized form of a rule table.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct RuleSet {
    pub version: u32,
    pub rules: Vec<Rule>,
}

impl RuleSet {
    pub const CURRENT_VERSION: u32 = 1;

    pub fn new(rules: Vec<Rule>) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            rules,
        }
    }
}
