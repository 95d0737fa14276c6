//! Built-in English rule table.
//!
//! Rules run from the tightest phrase-internal attachments to clause-level
//! ones. Delays hold back attachments that should only happen once the
//! material next to them has been consumed (a preposition takes its object
//! before the phrase attaches to a verb, and so on).

use stemma_protocol::{CategorySet as C, Direction, Label, Rule};

const NOMINAL: C = C::NP.union(C::NOUNS).union(C::PRP).union(C::CD);
const NOUN_HEAD: C = C::NP.union(C::NOUNS);
const ADJECTIVAL: C = C::JJ.union(C::JJR).union(C::JJS).union(C::ADJP);
const ADVERBIAL: C = C::ADVP.union(C::ADVERBS);
const PREDICATE: C = C::VP.union(C::VB).union(C::VBN);
const FINITE: C = C::VP.union(C::VB).union(C::VBZ).union(C::VBP).union(C::VBD).union(C::MD);
const PREPOSITION: C = C::PP.union(C::IN);
const SUBJECT: C = NOMINAL.union(C::EX).union(C::WP).union(C::WDT);
const CLAUSE_MARKER: C = C::SBAR.union(C::WDT).union(C::WP).union(C::WRB);

fn rule(left: C, right: C, direction: Direction, label: Label) -> Rule {
    Rule::new(left, right, direction, label)
}

pub fn rules() -> Vec<Rule> {
    use Direction::{HeadLeft, HeadRight};

    vec![
        // Noun phrase internals, for material the chunker left loose
        rule(C::DT.union(C::PDT).union(C::WDT), NOUN_HEAD, HeadRight, Label::Det).with_max_distance(0),
        rule(C::PRPS.union(C::WPS), NOUN_HEAD, HeadRight, Label::Poss).with_max_distance(0),
        rule(ADJECTIVAL.union(C::VBG), NOUN_HEAD, HeadRight, Label::Amod).with_max_distance(0),
        rule(C::NOUNS, NOUN_HEAD, HeadRight, Label::Compound).with_max_distance(0),
        rule(C::CD, NOUN_HEAD, HeadRight, Label::Nummod).with_max_distance(0),
        rule(ADVERBIAL, ADJECTIVAL, HeadRight, Label::Advmod).with_max_distance(0),
        // Possessive clitic hangs off its owner
        rule(NOUN_HEAD, C::POS, HeadLeft, Label::Poss).with_max_distance(0),

        // Prepositions take their objects first
        rule(PREPOSITION.union(C::TO), NOMINAL, HeadLeft, Label::Pobj).with_max_distance(0),

        // Verb group: auxiliaries, negation, particles
        rule(FINITE.union(C::VBN), C::VBN, HeadRight, Label::Auxpass)
            .with_left_tokens(&["be"])
            .with_max_distance(1),
        rule(FINITE, PREDICATE.union(C::VBG), HeadRight, Label::Aux)
            .with_left_tokens(&["be", "have", "do", "will", "shall", "may", "can", "must"])
            .with_max_distance(1),
        rule(C::TO, C::VB, HeadRight, Label::Aux).with_max_distance(0),
        rule(ADVERBIAL, PREDICATE, HeadRight, Label::Neg)
            .with_left_tokens(&["not", "n't", "never"])
            .with_max_distance(0),
        rule(PREDICATE, ADVERBIAL, HeadLeft, Label::Neg)
            .with_right_tokens(&["not", "n't", "never"])
            .with_max_distance(0),
        rule(PREDICATE, C::PRT.union(C::RP), HeadLeft, Label::Prt).with_max_distance(0),

        // Arguments
        rule(SUBJECT, C::VBN, HeadRight, Label::Nsubjpass),
        rule(SUBJECT, PREDICATE, HeadRight, Label::Nsubj),
        rule(PREDICATE, NOMINAL, HeadLeft, Label::Dobj).with_delay(0),
        rule(PREDICATE, ADJECTIVAL, HeadLeft, Label::Acomp).with_delay(0),
        rule(ADVERBIAL, PREDICATE, HeadRight, Label::Advmod),
        rule(PREDICATE, ADVERBIAL, HeadLeft, Label::Advmod).with_delay(0),

        // Prepositional phrases prefer the verb, then fall back to the noun
        rule(PREDICATE, PREPOSITION, HeadLeft, Label::Prep).with_delay(0),
        rule(NOUN_HEAD, PREPOSITION, HeadLeft, Label::Prep).with_delay(1),

        // Clauses
        rule(CLAUSE_MARKER.union(C::IN), PREDICATE, HeadRight, Label::Mark)
            .with_delay(0)
            .with_max_distance(0),
        rule(PREDICATE, C::VB.union(C::VBG), HeadLeft, Label::Xcomp).with_delay(1),
        rule(PREDICATE, PREDICATE, HeadLeft, Label::Ccomp).with_delay(2),

        // Coordination
        rule(NOMINAL.union(PREDICATE), C::CC.union(C::CONJP), HeadLeft, Label::Cc).with_delay(1),
        rule(NOUN_HEAD, NOUN_HEAD, HeadLeft, Label::Conj).with_delay(2),

        // Punctuation attaches to whatever is next to it
        rule(C::empty(), C::PUNCTUATION, HeadLeft, Label::Punct).with_delay(1),
        rule(C::PUNCTUATION, C::empty(), HeadRight, Label::Punct).with_delay(1),

        // Last resort so a sentence can still converge on a single head
        rule(PREDICATE, C::empty(), HeadLeft, Label::Dep).with_delay(3),
        rule(C::empty(), PREDICATE, HeadRight, Label::Dep).with_delay(3),
        rule(C::empty(), C::empty(), HeadLeft, Label::Dep).with_delay(4),
    ]
}
