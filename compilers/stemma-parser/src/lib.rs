pub mod arena;
pub mod english;
pub mod matcher;
pub mod notation;
pub mod reduce;
pub mod root;
pub mod rules;

use std::sync::OnceLock;

use stemma_morph::{Conjugator, EnglishConjugator};
use stemma_protocol::{Chunk, Node};
use tracing::debug;

pub use crate::arena::{NodeRef, Sentence};
pub use crate::matcher::{Match, Matcher};
pub use crate::notation::{parse_notation, to_notation, NotationError};
pub use crate::reduce::{reduce, ReductionStats};
pub use crate::root::{find_root, identify_root};
pub use crate::rules::{RuleError, RuleTable};

/// Default iteration cap used by the tools.
pub const DEFAULT_LIMIT: usize = 16;

/// Root identification followed by reduction, over one rule table.
pub struct Parser<C: Conjugator = EnglishConjugator> {
    rules: RuleTable,
    conjugator: C,
}

impl Parser<EnglishConjugator> {
    /// Built-in English rules with the default conjugator.
    pub fn english() -> Self {
        Self::new(RuleTable::english(), EnglishConjugator)
    }
}

impl<C: Conjugator> Parser<C> {
    pub fn new(rules: RuleTable, conjugator: C) -> Self {
        Self { rules, conjugator }
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Reduces one sentence. `limit` caps the number of passes; with a cap of
    /// zero only the root label is written. Running out of passes is not an
    /// error: whatever forest remains is returned.
    pub fn parse(&self, chunks: Vec<Chunk>, limit: usize) -> Parse {
        if chunks.is_empty() {
            return Parse::default();
        }

        let mut sentence = Sentence::new(chunks);
        identify_root(&mut sentence, &self.conjugator);

        let matcher = Matcher::new(&self.rules, &self.conjugator);
        let stats = reduce(&mut sentence, &matcher, limit);
        debug!(trees = sentence.len(), passes = stats.passes, "sentence parsed");

        Parse {
            forest: sentence.into_forest(),
            stats,
        }
    }
}

/// Result of [`Parser::parse`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parse {
    /// Top-level nodes left after reduction, in sentence order.
    pub forest: Vec<Node>,
    pub stats: ReductionStats,
}

impl Parse {
    /// True when the sentence converged on a single head.
    pub fn is_tree(&self) -> bool {
        self.forest.len() == 1
    }

    /// The node labeled ROOT, if root identification found one. It is
    /// always a top-level node.
    pub fn root(&self) -> Option<&Node> {
        self.forest.iter().find(|node| node.is_root())
    }
}

/// Parses with the built-in English table and returns the forest.
pub fn parse_sentence(chunks: Vec<Chunk>, limit: usize) -> Vec<Node> {
    static ENGLISH: OnceLock<Parser> = OnceLock::new();
    ENGLISH.get_or_init(Parser::english).parse(chunks, limit).forest
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use stemma_protocol::{Category, CategorySet, Direction, Label, Rule, Span};

    fn chunk(kind: Category, tag: Category, tokens: &[&str], start: usize) -> Chunk {
        Chunk {
            kind,
            tags: vec![tag],
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
            span: Span::new(start, start + tokens.len() - 1),
        }
    }

    fn parser(rules: Vec<Rule>) -> Parser {
        Parser::new(RuleTable::new(rules).expect("valid rules"), EnglishConjugator)
    }

    #[test]
    fn test_subject_absorbed_in_one_pass() {
        let parser = parser(vec![Rule::new(
            CategorySet::NP,
            CategorySet::VP,
            Direction::HeadRight,
            Label::Nsubj,
        )]);
        let chunks = vec![
            chunk(Category::NP, Category::DT, &["the", "cat"], 0),
            chunk(Category::VP, Category::VBZ, &["sits"], 2),
        ];

        let parse = parser.parse(chunks, 1);

        assert!(parse.is_tree());
        assert_eq!(parse.stats.passes, 1);
        let root = parse.root().expect("root");
        assert_eq!(root.chunk.text(), "sits");
        assert_eq!(root.left.len(), 1);
        assert_eq!(root.left[0].chunk.text(), "the cat");
        assert_eq!(root.left[0].label, Some(Label::Nsubj));
    }

    #[test]
    fn test_modal_is_not_root() {
        let parse = Parser::english().parse(
            vec![
                chunk(Category::VP, Category::MD, &["will"], 0),
                chunk(Category::VB, Category::VB, &["run"], 1),
            ],
            0,
        );

        assert_eq!(parse.forest.len(), 2);
        assert_eq!(parse.forest[0].label, None);
        assert_eq!(parse.forest[1].label, Some(Label::Root));
        assert_eq!(parse.root().map(|n| n.chunk.text()), Some("run".to_string()));
    }

    #[test]
    fn test_only_one_subject_per_head() {
        let parser = parser(vec![Rule::new(
            CategorySet::NP,
            CategorySet::VP,
            Direction::HeadRight,
            Label::Nsubj,
        )]);
        let chunks = vec![
            chunk(Category::NP, Category::NN, &["cats"], 0),
            chunk(Category::NP, Category::NN, &["dogs"], 1),
            chunk(Category::VP, Category::VBP, &["bark"], 2),
        ];

        let parse = parser.parse(chunks, 5);

        assert_eq!(parse.forest.len(), 2);
        assert!(parse.stats.fixed_point);
        let head = &parse.forest[1];
        assert_eq!(head.chunk.text(), "bark");
        assert_eq!(head.left.len(), 1);
        assert_eq!(head.left[0].chunk.text(), "dogs");
    }

    #[test]
    fn test_far_pair_never_fuses() {
        let parser = parser(vec![Rule::new(
            CategorySet::empty(),
            CategorySet::empty(),
            Direction::HeadLeft,
            Label::Dep,
        )
        .with_max_distance(0)]);
        let chunks = vec![
            chunk(Category::NP, Category::NN, &["dogs"], 0),
            chunk(Category::VP, Category::VBP, &["bark"], 3),
        ];

        let parse = parser.parse(chunks, 10);
        assert_eq!(parse.forest.len(), 2);
    }

    #[test]
    fn test_limit_reached_returns_forest() {
        let parser = parser(vec![Rule::new(
            CategorySet::empty(),
            CategorySet::empty(),
            Direction::HeadLeft,
            Label::Dep,
        )
        .with_delay(5)]);
        let chunks = vec![
            chunk(Category::NP, Category::NN, &["dogs"], 0),
            chunk(Category::ADVP, Category::RB, &["loudly"], 1),
            chunk(Category::NP, Category::NN, &["outside"], 2),
        ];

        let parse = parser.parse(chunks, 2);

        assert_eq!(parse.forest.len(), 3);
        assert_eq!(parse.stats.passes, 2);
        assert!(!parse.stats.fixed_point);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(Parser::english().parse(vec![], 10), Parse::default());
        assert!(parse_sentence(vec![], 10).is_empty());
    }

    #[test]
    fn test_english_sentence_reduces_to_tree() {
        let chunks = parse_notation("NP[DT NN](the cat) VP[VBD](sat) PP[IN](on) NP[DT NN](the mat) .[.](.)")
            .expect("valid notation");

        let forest = parse_sentence(chunks, DEFAULT_LIMIT);

        assert_eq!(forest.len(), 1);
        let root = &forest[0];
        assert!(root.is_root());
        assert_eq!(root.chunk.text(), "sat");

        assert_eq!(root.left[0].chunk.text(), "the cat");
        assert_eq!(root.left[0].label, Some(Label::Nsubj));

        assert_eq!(root.right.len(), 2);
        assert_eq!(root.right[0].chunk.text(), "on");
        assert_eq!(root.right[0].label, Some(Label::Prep));
        assert_eq!(root.right[0].right[0].chunk.text(), "the mat");
        assert_eq!(root.right[0].right[0].label, Some(Label::Pobj));
        assert_eq!(root.right[1].label, Some(Label::Punct));
    }

    #[test]
    fn test_auxiliary_hangs_off_main_verb() {
        let chunks = parse_notation("NP[PRP](she) VP[MD](will) VB[VB](go) .[.](.)").expect("valid notation");

        let forest = parse_sentence(chunks, DEFAULT_LIMIT);

        assert_eq!(forest.len(), 1);
        let root = &forest[0];
        assert_eq!(root.chunk.text(), "go");
        let left: Vec<_> = root.left.iter().map(|n| (n.chunk.text(), n.label)).collect();
        assert_eq!(
            left,
            vec![
                ("will".to_string(), Some(Label::Aux)),
                ("she".to_string(), Some(Label::Nsubj)),
            ]
        );
    }

    const KINDS: &[Category] = &[
        Category::NP,
        Category::VP,
        Category::VB,
        Category::VBN,
        Category::PP,
        Category::ADVP,
        Category::ADJP,
        Category::SBAR,
        Category::DT,
        Category::NN,
        Category::IN,
        Category::CC,
        Category::TO,
        Category::PRP,
        Category::PERIOD,
        Category::COMMA,
    ];

    const TAGS: &[Category] = &[
        Category::VBZ,
        Category::VBD,
        Category::VBP,
        Category::MD,
        Category::VB,
        Category::VBN,
        Category::VBG,
        Category::NN,
        Category::RB,
        Category::IN,
        Category::DT,
    ];

    const WORDS: &[&str] = &["the", "dog", "is", "has", "will", "run", "not", "been", "quickly", "and", "to", "."];

    fn arb_sentence() -> impl Strategy<Value = Vec<Chunk>> {
        prop::collection::vec(
            (0..KINDS.len(), 0..TAGS.len(), prop::collection::vec(0..WORDS.len(), 1..3)),
            1..12,
        )
        .prop_map(|drafts| {
            let mut position = 0;
            drafts
                .into_iter()
                .map(|(kind, tag, words)| {
                    let tokens: Vec<String> = words.iter().map(|&w| WORDS[w].to_string()).collect();
                    let span = Span::new(position, position + tokens.len() - 1);
                    position += tokens.len();
                    Chunk {
                        kind: KINDS[kind],
                        tags: vec![TAGS[tag]],
                        tokens,
                        span,
                    }
                })
                .collect()
        })
    }

    fn all_nodes(forest: &[Node]) -> Vec<&Node> {
        let mut nodes = Vec::new();
        for tree in forest {
            tree.walk(&mut |node| nodes.push(node));
        }
        nodes
    }

    proptest! {
        #[test]
        fn test_parse_is_deterministic(chunks in arb_sentence(), limit in 0usize..20) {
            let parser = Parser::english();
            prop_assert_eq!(parser.parse(chunks.clone(), limit), parser.parse(chunks, limit));
        }

        #[test]
        fn test_sequence_only_shrinks(chunks in arb_sentence(), limit in 0usize..20) {
            let count = chunks.len();
            let parse = Parser::english().parse(chunks, limit);

            prop_assert!(parse.stats.passes <= limit);
            prop_assert_eq!(parse.stats.lengths.len(), parse.stats.passes);
            let mut previous = count;
            for &length in &parse.stats.lengths {
                prop_assert!(length <= previous);
                prop_assert!(length >= 1);
                previous = length;
            }
            prop_assert_eq!(parse.forest.len(), previous);
            prop_assert_eq!(parse.forest.iter().map(Node::size).sum::<usize>(), count);
        }

        #[test]
        fn test_root_stays_on_top(chunks in arb_sentence(), limit in 0usize..20) {
            let parse = Parser::english().parse(chunks, limit);

            let roots = all_nodes(&parse.forest).into_iter().filter(|n| n.is_root()).count();
            prop_assert!(roots <= 1);
            for tree in &parse.forest {
                for child in tree.children() {
                    let mut nested_root = false;
                    child.walk(&mut |node| nested_root |= node.is_root());
                    prop_assert!(!nested_root);
                }
            }
        }

        #[test]
        fn test_single_subject_per_head(chunks in arb_sentence(), limit in 0usize..20) {
            let parse = Parser::english().parse(chunks, limit);

            for node in all_nodes(&parse.forest) {
                for label in [Label::Nsubj, Label::Nsubjpass] {
                    let subjects = node.left.iter().filter(|child| child.label == Some(label)).count();
                    prop_assert!(subjects <= 1);
                }
            }
        }

        #[test]
        fn test_every_dependent_is_labeled(chunks in arb_sentence(), limit in 0usize..20) {
            let parse = Parser::english().parse(chunks, limit);

            for node in all_nodes(&parse.forest) {
                for child in node.children() {
                    prop_assert!(child.label.is_some());
                    prop_assert!(!child.is_root());
                }
            }
        }

        #[test]
        fn test_zero_limit_only_marks_root(chunks in arb_sentence()) {
            let parse = Parser::english().parse(chunks.clone(), 0);

            prop_assert_eq!(parse.forest.len(), chunks.len());
            for (node, chunk) in parse.forest.iter().zip(&chunks) {
                prop_assert_eq!(&node.chunk, chunk);
                prop_assert!(node.label.is_none() || node.is_root());
            }
        }
    }
}
