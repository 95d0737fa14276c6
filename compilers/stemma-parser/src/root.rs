use stemma_morph::{is_auxiliary_lemma, Conjugator};
use stemma_protocol::{Category, CategorySet, Chunk, NodeId};
use tracing::debug;

use crate::arena::Sentence;

/// Node kinds that can head a clause.
pub const CANDIDATE_VERBS: CategorySet = CategorySet::VP.union(CategorySet::VB).union(CategorySet::VBN);

/// Primary tags under which a candidate may turn out to be an auxiliary.
pub const POSSIBLE_AUXILIARY: CategorySet = CategorySet::VBZ
    .union(CategorySet::VB)
    .union(CategorySet::VBP)
    .union(CategorySet::VBD)
    .union(CategorySet::MD)
    .union(CategorySet::VBN);

/// Marks the sentence's main predicate with the root label and returns it.
/// Scanning stops at the first candidate that is not an auxiliary; a
/// sentence without such a candidate keeps no root.
pub fn identify_root(sentence: &mut Sentence, conjugator: &dyn Conjugator) -> Option<NodeId> {
    let root = find_root(sentence, conjugator);

    match root {
        Some(id) => {
            sentence.mark_root(id);
            debug!(node = %id, text = %sentence.node(id).chunk().text(), "root identified");
        }
        None => debug!("no root candidate"),
    }

    root
}

/// Same decision as [`identify_root`] without writing the label.
pub fn find_root(sentence: &Sentence, conjugator: &dyn Conjugator) -> Option<NodeId> {
    let chunks: Vec<&Chunk> = sentence.live().iter().map(|&id| sentence.node(id).chunk()).collect();

    (0..chunks.len())
        .find(|&i| is_candidate_verb(chunks[i]) && !is_auxiliary(&chunks, i, conjugator))
        .map(|i| sentence.live()[i])
}

fn is_candidate_verb(chunk: &Chunk) -> bool {
    CANDIDATE_VERBS.contains(chunk.kind.set())
}

/// Lookahead patterns that mark the candidate at `i` as an auxiliary of a
/// verb further right.
fn is_auxiliary(chunks: &[&Chunk], i: usize, conjugator: &dyn Conjugator) -> bool {
    let candidate = chunks[i];
    let Some(tag) = candidate.primary_tag() else {
        return false;
    };
    if !POSSIBLE_AUXILIARY.contains(tag.set()) {
        return false;
    }

    let ahead = |k: usize| chunks.get(i + k).copied();
    let verb = |k: usize| ahead(k).map_or(false, is_candidate_verb);
    let adverb = |k: usize| {
        ahead(k)
            .and_then(Chunk::primary_tag)
            .map_or(false, Category::is_adverb)
    };
    let noun_phrase = |k: usize| ahead(k).map_or(false, |c| c.kind == Category::NP);

    // "has gone"
    if verb(1) {
        return true;
    }
    // "has never gone"
    if adverb(1) && verb(2) {
        return true;
    }
    // "has never the man gone"
    if adverb(1) && noun_phrase(2) && verb(3) {
        return true;
    }
    // Sentence-initial inversion: "Has the man gone", "Has the man really gone"
    if candidate.span.start == 0 && noun_phrase(1) && (verb(2) || (adverb(2) && verb(3))) {
        return true;
    }
    // "is he going"
    if verb(2) {
        if let Some(token) = candidate.head_token() {
            if is_auxiliary_lemma(&conjugator.present(token)) {
                return true;
            }
        }
    }

    false
}
