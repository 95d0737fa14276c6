#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

use alloc::string::{String, ToString};

/// Maps a surface token to its canonical present-tense verb form.
///
/// Implementations must be total: unknown words come back unchanged (modulo
/// case folding) rather than failing.
pub trait Conjugator: Send + Sync {
    fn present(&self, token: &str) -> String;
}

impl<F> Conjugator for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn present(&self, token: &str) -> String {
        self(token)
    }
}

/// Lemmas whose forms act as auxiliaries ahead of a main verb.
pub const AUXILIARY_LEMMAS: [&str; 7] = ["be", "have", "do", "will", "shall", "may", "can"];

pub fn is_auxiliary_lemma(lemma: &str) -> bool {
    AUXILIARY_LEMMAS.contains(&lemma)
}

/// Rule-of-thumb English conjugator: an irregular table for auxiliaries,
/// modals, contractions, and common strong verbs, then suffix stripping.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishConjugator;

impl Conjugator for EnglishConjugator {
    fn present(&self, token: &str) -> String {
        let lower = token.to_lowercase();
        if let Some(lemma) = irregular(&lower) {
            return lemma.to_string();
        }
        strip_inflection(&lower)
    }
}

/// Returns the canonical present-tense form of `token` using the default conjugator.
pub fn present(token: &str) -> String {
    EnglishConjugator.present(token)
}

fn irregular(word: &str) -> Option<&'static str> {
    let lemma = match word {
        "am" | "is" | "are" | "was" | "were" | "been" | "being" | "be" | "'s" | "'m" | "'re" => "be",
        "has" | "had" | "having" | "have" | "'ve" | "'d" => "have",
        "does" | "did" | "done" | "doing" | "do" => "do",
        "will" | "would" | "'ll" | "wo" => "will",
        "shall" | "should" | "sha" => "shall",
        "may" | "might" => "may",
        "can" | "could" | "ca" => "can",
        "must" => "must",
        "went" | "gone" | "goes" => "go",
        "said" | "says" => "say",
        "made" => "make",
        "took" | "taken" => "take",
        "came" => "come",
        "saw" | "seen" => "see",
        "knew" | "known" => "know",
        "got" | "gotten" => "get",
        "gave" | "given" => "give",
        "found" => "find",
        "thought" => "think",
        "told" => "tell",
        "became" => "become",
        "left" => "leave",
        "felt" => "feel",
        "brought" => "bring",
        "began" | "begun" => "begin",
        "kept" => "keep",
        "held" => "hold",
        "wrote" | "written" => "write",
        "stood" => "stand",
        "heard" => "hear",
        "meant" => "mean",
        "met" => "meet",
        "ran" => "run",
        "paid" => "pay",
        "sat" => "sit",
        "spoke" | "spoken" => "speak",
        "led" => "lead",
        "grew" | "grown" => "grow",
        "lost" => "lose",
        "fell" | "fallen" => "fall",
        "sent" => "send",
        "built" => "build",
        "understood" => "understand",
        "drew" | "drawn" => "draw",
        "broke" | "broken" => "break",
        "spent" => "spend",
        "rose" | "risen" => "rise",
        "drove" | "driven" => "drive",
        "bought" => "buy",
        "wore" | "worn" => "wear",
        "chose" | "chosen" => "choose",
        "ate" | "eaten" => "eat",
        "taught" => "teach",
        "caught" => "catch",
        "fought" => "fight",
        "sold" => "sell",
        "slept" => "sleep",
        "flew" | "flown" => "fly",
        "threw" | "thrown" => "throw",
        "sang" | "sung" => "sing",
        "swam" | "swum" => "swim",
        _ => return None,
    };
    Some(lemma)
}

fn strip_inflection(word: &str) -> String {
    let len = word.chars().count();

    if len > 4 {
        if let Some(stem) = word.strip_suffix("ies") {
            return alloc::format!("{stem}y");
        }
        if let Some(stem) = word.strip_suffix("ied") {
            return alloc::format!("{stem}y");
        }
    }

    if len > 5 {
        if let Some(stem) = word.strip_suffix("ing") {
            return restore_stem(stem);
        }
    }

    if len > 4 {
        if let Some(stem) = word.strip_suffix("ed") {
            return restore_stem(stem);
        }
    }

    if len > 3 {
        for suffix in ["sses", "shes", "ches", "xes", "zes", "oes"] {
            if word.ends_with(suffix) {
                return word[..word.len() - 2].to_string();
            }
        }
        if word.ends_with('s') && !word.ends_with("ss") && !word.ends_with("us") && !word.ends_with("is") {
            return word[..word.len() - 1].to_string();
        }
    }

    word.to_string()
}

/// Undoes consonant doubling ("stopp" -> "stop") and restores a dropped
/// silent e after a consonant cluster the stem cannot end in ("mak" -> "make").
fn restore_stem(stem: &str) -> String {
    let bytes = stem.as_bytes();
    let n = bytes.len();

    if n >= 2 && bytes[n - 1] == bytes[n - 2] && is_consonant(bytes[n - 1]) && !matches!(bytes[n - 1], b'l' | b's' | b'z' | b'f') {
        return stem[..n - 1].to_string();
    }

    if n >= 3 && is_consonant(bytes[n - 1]) && is_vowel(bytes[n - 2]) && is_consonant(bytes[n - 3]) && matches!(bytes[n - 1], b'k' | b'v' | b'z' | b'c') {
        return alloc::format!("{stem}e");
    }

    stem.to_string()
}

fn is_vowel(b: u8) -> bool {
    matches!(b, b'a' | b'e' | b'i' | b'o' | b'u')
}

fn is_consonant(b: u8) -> bool {
    b.is_ascii_alphabetic() && !is_vowel(b)
}
