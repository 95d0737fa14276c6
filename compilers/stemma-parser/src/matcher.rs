use std::cell::OnceCell;

use stemma_morph::Conjugator;
use stemma_protocol::{Direction, Label, Rule, RuleId};

use crate::arena::NodeRef;
use crate::rules::RuleTable;

/// Outcome of matching an adjacent pair: which side heads and how the
/// dependent is labeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub rule: RuleId,
    pub direction: Direction,
    pub label: Label,
}

/// First-match-wins dispatch over a rule table.
pub struct Matcher<'a> {
    rules: &'a RuleTable,
    conjugator: &'a dyn Conjugator,
}

impl<'a> Matcher<'a> {
    pub fn new(rules: &'a RuleTable, conjugator: &'a dyn Conjugator) -> Self {
        Self { rules, conjugator }
    }

    pub fn rules(&self) -> &'a RuleTable {
        self.rules
    }

    pub fn match_pair(&self, left: NodeRef<'_>, right: NodeRef<'_>, iteration: usize) -> Option<Match> {
        let pair = Pair {
            left,
            right,
            left_lemma: OnceCell::new(),
            right_lemma: OnceCell::new(),
            conjugator: self.conjugator,
        };

        self.rules
            .iter()
            .find(|(_, rule)| pair.admits(rule, iteration))
            .map(|(id, rule)| Match {
                rule: id,
                direction: rule.direction,
                label: rule.label,
            })
    }
}

/// An adjacent pair under test. Lemmas are computed on first use and shared
/// across the rules tried for this pair.
struct Pair<'n, 'c> {
    left: NodeRef<'n>,
    right: NodeRef<'n>,
    left_lemma: OnceCell<Option<String>>,
    right_lemma: OnceCell<Option<String>>,
    conjugator: &'c dyn Conjugator,
}

impl Pair<'_, '_> {
    fn admits(&self, rule: &Rule, iteration: usize) -> bool {
        let left = self.left.chunk();
        let right = self.right.chunk();

        if !rule.left.admits(left.kind) || !rule.right.admits(right.kind) {
            return false;
        }

        if let Some(delay) = rule.delay {
            if iteration <= delay as usize {
                return false;
            }
        }

        if let Some(max_distance) = rule.max_distance {
            if left.span.gap_to(&right.span) > max_distance as usize {
                return false;
            }
        }

        // The root never becomes a dependent.
        let dependent = match rule.direction {
            Direction::HeadLeft => self.right,
            Direction::HeadRight => self.left,
        };
        if dependent.is_root() {
            return false;
        }

        // A head takes at most one subject of each kind from its left.
        if rule.direction == Direction::HeadRight
            && rule.label.is_single_subject()
            && self.right.has_left_child_labeled(rule.label)
        {
            return false;
        }

        if !rule.left_tokens.is_empty() && !lemma_in(&self.left_lemma, self.left, self.conjugator, &rule.left_tokens) {
            return false;
        }
        if !rule.right_tokens.is_empty() && !lemma_in(&self.right_lemma, self.right, self.conjugator, &rule.right_tokens) {
            return false;
        }

        true
    }
}

fn lemma_in(cell: &OnceCell<Option<String>>, node: NodeRef<'_>, conjugator: &dyn Conjugator, tokens: &[String]) -> bool {
    let lemma = cell.get_or_init(|| node.chunk().head_token().map(|token| conjugator.present(token)));
    lemma
        .as_deref()
        .map_or(false, |lemma| tokens.iter().any(|token| token == lemma))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Sentence;
    use stemma_morph::EnglishConjugator;
    use stemma_protocol::{Category, CategorySet, Chunk, Span};

    fn chunk(kind: Category, tag: Category, tokens: &[&str], start: usize) -> Chunk {
        Chunk {
            kind,
            tags: vec![tag],
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
            span: Span::new(start, start + tokens.len() - 1),
        }
    }

    fn table(rules: Vec<Rule>) -> RuleTable {
        RuleTable::new(rules).expect("valid rules")
    }

    #[test]
    fn test_first_match_wins() {
        let rules = table(vec![
            Rule::new(CategorySet::NP, CategorySet::VP, Direction::HeadRight, Label::Nsubj),
            Rule::new(CategorySet::NP, CategorySet::VP, Direction::HeadRight, Label::Dep),
        ]);
        let sentence = Sentence::new(vec![
            chunk(Category::NP, Category::NN, &["dogs"], 0),
            chunk(Category::VP, Category::VBP, &["bark"], 1),
        ]);
        let matcher = Matcher::new(&rules, &EnglishConjugator);

        let found = matcher.match_pair(sentence.at(0), sentence.at(1), 0);
        assert_eq!(
            found,
            Some(Match {
                rule: RuleId(0),
                direction: Direction::HeadRight,
                label: Label::Nsubj
            })
        );
    }

    #[test]
    fn test_type_mismatch_and_wildcard() {
        let rules = table(vec![
            Rule::new(CategorySet::PP, CategorySet::VP, Direction::HeadRight, Label::Prep),
            Rule::new(CategorySet::empty(), CategorySet::empty(), Direction::HeadLeft, Label::Dep),
        ]);
        let sentence = Sentence::new(vec![
            chunk(Category::NP, Category::NN, &["dogs"], 0),
            chunk(Category::VP, Category::VBP, &["bark"], 1),
        ]);
        let matcher = Matcher::new(&rules, &EnglishConjugator);

        let found = matcher.match_pair(sentence.at(0), sentence.at(1), 0).expect("wildcard");
        assert_eq!(found.rule, RuleId(1));
        assert_eq!(found.label, Label::Dep);
    }

    #[test]
    fn test_delay_is_exclusive() {
        let rules = table(vec![
            Rule::new(CategorySet::NP, CategorySet::VP, Direction::HeadRight, Label::Nsubj).with_delay(1),
        ]);
        let sentence = Sentence::new(vec![
            chunk(Category::NP, Category::NN, &["dogs"], 0),
            chunk(Category::VP, Category::VBP, &["bark"], 1),
        ]);
        let matcher = Matcher::new(&rules, &EnglishConjugator);

        assert_eq!(matcher.match_pair(sentence.at(0), sentence.at(1), 0), None);
        assert_eq!(matcher.match_pair(sentence.at(0), sentence.at(1), 1), None);
        assert!(matcher.match_pair(sentence.at(0), sentence.at(1), 2).is_some());
    }

    #[test]
    fn test_distance_limit_blocks_far_pairs() {
        let rules = table(vec![
            Rule::new(CategorySet::empty(), CategorySet::empty(), Direction::HeadLeft, Label::Dep).with_max_distance(0),
        ]);
        // Left covers position 0, right covers position 3: two positions apart.
        let sentence = Sentence::new(vec![
            chunk(Category::NP, Category::NN, &["dogs"], 0),
            chunk(Category::VP, Category::VBP, &["bark"], 3),
        ]);
        let matcher = Matcher::new(&rules, &EnglishConjugator);

        for iteration in 0..5 {
            assert_eq!(matcher.match_pair(sentence.at(0), sentence.at(1), iteration), None);
        }
    }

    #[test]
    fn test_root_is_never_a_dependent() {
        let rules = table(vec![
            Rule::new(CategorySet::empty(), CategorySet::empty(), Direction::HeadRight, Label::Dep),
            Rule::new(CategorySet::empty(), CategorySet::empty(), Direction::HeadLeft, Label::Punct),
        ]);
        let mut sentence = Sentence::new(vec![
            chunk(Category::VP, Category::VBZ, &["runs"], 0),
            chunk(Category::PERIOD, Category::PERIOD, &["."], 1),
        ]);
        sentence.mark_root(sentence.live()[0]);
        let matcher = Matcher::new(&rules, &EnglishConjugator);

        // HeadRight would demote the root; the HeadLeft rule applies instead.
        let found = matcher.match_pair(sentence.at(0), sentence.at(1), 0).expect("match");
        assert_eq!(found.rule, RuleId(1));
        assert_eq!(found.direction, Direction::HeadLeft);
    }

    #[test]
    fn test_duplicate_subject_rejected() {
        let rules = table(vec![
            Rule::new(CategorySet::NP, CategorySet::VP, Direction::HeadRight, Label::Nsubj),
        ]);
        let mut sentence = Sentence::new(vec![
            chunk(Category::NP, Category::NN, &["cats"], 0),
            chunk(Category::NP, Category::NN, &["dogs"], 1),
            chunk(Category::VP, Category::VBP, &["bark"], 2),
        ]);
        sentence.splice(1, Direction::HeadRight, Label::Nsubj);
        let matcher = Matcher::new(&rules, &EnglishConjugator);

        assert_eq!(matcher.match_pair(sentence.at(0), sentence.at(1), 0), None);
    }

    #[test]
    fn test_token_lemmas_are_conjugated() {
        let rules = table(vec![
            Rule::new(CategorySet::VP, CategorySet::VBN, Direction::HeadRight, Label::Auxpass).with_left_tokens(&["be"]),
        ]);
        let matcher = Matcher::new(&rules, &EnglishConjugator);

        let passive = Sentence::new(vec![
            chunk(Category::VP, Category::VBD, &["was"], 0),
            chunk(Category::VBN, Category::VBN, &["eaten"], 1),
        ]);
        assert!(matcher.match_pair(passive.at(0), passive.at(1), 0).is_some());

        let perfect = Sentence::new(vec![
            chunk(Category::VP, Category::VBD, &["had"], 0),
            chunk(Category::VBN, Category::VBN, &["eaten"], 1),
        ]);
        assert_eq!(matcher.match_pair(perfect.at(0), perfect.at(1), 0), None);
    }

    #[test]
    fn test_custom_conjugator() {
        let rules = table(vec![
            Rule::new(CategorySet::empty(), CategorySet::empty(), Direction::HeadLeft, Label::Dep).with_right_tokens(&["X"]),
        ]);
        let always_x = |_: &str| "X".to_string();
        let matcher = Matcher::new(&rules, &always_x);
        let sentence = Sentence::new(vec![
            chunk(Category::NP, Category::NN, &["a"], 0),
            chunk(Category::NP, Category::NN, &["b"], 1),
        ]);

        assert!(matcher.match_pair(sentence.at(0), sentence.at(1), 0).is_some());
    }
}
