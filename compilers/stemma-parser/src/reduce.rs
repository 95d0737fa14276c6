use tracing::{debug, trace};

use crate::arena::Sentence;
use crate::matcher::Matcher;

/// What a reduction run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReductionStats {
    /// Passes performed, never more than the iteration cap.
    pub passes: usize,
    /// Top-level length after each pass.
    pub lengths: Vec<usize>,
    /// Total number of pairs fused.
    pub splices: usize,
    /// Stopped on a pass that changed nothing after every rule delay had
    /// elapsed, rather than on the cap or a single remaining node.
    pub fixed_point: bool,
}

/// Repeatedly scans the top-level sequence from the rightmost pair to the
/// leftmost, fusing every pair the matcher accepts, until one node remains
/// or `limit` passes have run.
pub fn reduce(sentence: &mut Sentence, matcher: &Matcher<'_>, limit: usize) -> ReductionStats {
    let mut stats = ReductionStats::default();
    let mut iteration = 0;

    while iteration < limit && sentence.len() > 1 {
        let mut spliced = 0;

        // Positions left of `pos` are untouched by a splice at `pos`, so a
        // descending scan never revisits a shifted index.
        for pos in (0..sentence.len() - 1).rev() {
            let Some(found) = matcher.match_pair(sentence.at(pos), sentence.at(pos + 1), iteration) else {
                continue;
            };

            let head = sentence.splice(pos, found.direction, found.label);
            spliced += 1;
            trace!(
                iteration,
                pos,
                rule = found.rule.0,
                direction = %found.direction,
                label = %found.label,
                head = %head,
                "spliced"
            );
        }

        stats.passes += 1;
        stats.splices += spliced;
        stats.lengths.push(sentence.len());

        if spliced == 0 && matcher.rules().settled_at(iteration) {
            debug!(iteration, remaining = sentence.len(), "fixed point");
            stats.fixed_point = true;
            break;
        }

        iteration += 1;
    }

    debug!(
        passes = stats.passes,
        splices = stats.splices,
        remaining = sentence.len(),
        "reduction finished"
    );
    stats
}
