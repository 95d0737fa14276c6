use rkyv::AlignedVec;
use stemma_protocol::{Label, Rule, RuleId, RuleSet};
use thiserror::Error;

use crate::english;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("rule {index} assigns the ROOT label; only root identification may do that")]
    RootLabel { index: usize },

    #[error("rule table version {found} is not supported (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("invalid rule table archive: {0}")]
    Archive(String),
}

/// An ordered, validated list of rules. Order is priority: the matcher takes
/// the first rule that admits a pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    rules: Vec<Rule>,
    max_delay: Option<u32>,
}

impl RuleTable {
    pub fn new(rules: Vec<Rule>) -> Result<Self, RuleError> {
        if let Some(index) = rules.iter().position(|rule| rule.label == Label::Root) {
            return Err(RuleError::RootLabel { index });
        }
        Ok(Self::assemble(rules))
    }

    pub fn from_rule_set(set: RuleSet) -> Result<Self, RuleError> {
        if set.version != RuleSet::CURRENT_VERSION {
            return Err(RuleError::UnsupportedVersion {
                found: set.version,
                expected: RuleSet::CURRENT_VERSION,
            });
        }
        Self::new(set.rules)
    }

    /// Loads a table compiled by `stemma compile`. The archive is validated
    /// before use; `bytes` need not be aligned.
    pub fn from_archive(bytes: &[u8]) -> Result<Self, RuleError> {
        let mut aligned = AlignedVec::with_capacity(bytes.len());
        aligned.extend_from_slice(bytes);

        let set: RuleSet = rkyv::from_bytes(&aligned).map_err(|e| RuleError::Archive(format!("{e:?}")))?;
        Self::from_rule_set(set)
    }

    pub fn to_archive(&self) -> Result<AlignedVec, RuleError> {
        rkyv::to_bytes::<_, 4096>(&self.to_rule_set()).map_err(|e| RuleError::Archive(format!("{e:?}")))
    }

    /// The built-in English table.
    pub fn english() -> Self {
        Self::assemble(english::rules())
    }

    fn assemble(rules: Vec<Rule>) -> Self {
        let max_delay = rules.iter().filter_map(|rule| rule.delay).max();
        Self { rules, max_delay }
    }

    pub fn to_rule_set(&self) -> RuleSet {
        RuleSet::new(self.rules.clone())
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn get(&self, id: RuleId) -> Option<&Rule> {
        self.rules.get(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = (RuleId, &Rule)> {
        self.rules
            .iter()
            .enumerate()
            .map(|(i, rule)| (RuleId::new(i as u32), rule))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// True when no rule can become newly eligible after `iteration`, so a
    /// pass at `iteration` that changed nothing will never be followed by one
    /// that does.
    pub fn settled_at(&self, iteration: usize) -> bool {
        self.max_delay.map_or(true, |delay| (delay as usize) < iteration)
    }
}
