//! Node categories: Penn Treebank part-of-speech tags plus the phrase
//! types produced by a chunker. A node's `kind` and each of its `tags`
//! are drawn from this one closed set, so a set of categories fits in a
//! single `u64`.

use core::fmt;
use core::str::FromStr;

use bitflags::bitflags;
use rkyv::{Archive, Deserialize, Serialize};

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

macro_rules! define_categories {
    ($( $(#[$meta:meta])* $name:ident = $bit:literal => $penn:literal, )*) => {
        /// One member of the closed category set.
        #[allow(non_camel_case_types, clippy::upper_case_acronyms)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Archive, Serialize, Deserialize)]
        #[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
        #[archive(check_bytes)]
        #[archive_attr(allow(non_camel_case_types))]
        #[repr(u8)]
        pub enum Category {
            $(
                $(#[$meta])*
                #[cfg_attr(feature = "serde", serde(rename = $penn))]
                $name = $bit,
            )*
        }

        impl Category {
            pub const ALL: &'static [Category] = &[$(Category::$name,)*];

            /// The Penn Treebank spelling (`"PRP$"`, `"-LRB-"`, ...).
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Category::$name => $penn,)*
                }
            }

            pub fn from_penn(s: &str) -> Option<Self> {
                match s {
                    $($penn => Some(Category::$name),)*
                    _ => None,
                }
            }

            pub const fn set(self) -> CategorySet {
                match self {
                    $(Category::$name => CategorySet::$name,)*
                }
            }
        }

        bitflags! {
            /// A set of categories. The empty set is used as a wildcard by rules.
            #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
            pub struct CategorySet: u64 {
                $(const $name = 1 << $bit;)*
            }
        }
    };
}

define_categories! {
    // Chunk phrase types
    NP = 0 => "NP",
    VP = 1 => "VP",
    PP = 2 => "PP",
    ADJP = 3 => "ADJP",
    ADVP = 4 => "ADVP",
    SBAR = 5 => "SBAR",
    PRT = 6 => "PRT",
    INTJ = 7 => "INTJ",
    CONJP = 8 => "CONJP",
    LST = 9 => "LST",
    UCP = 10 => "UCP",

    // Penn Treebank part-of-speech tags
    CC = 11 => "CC",
    CD = 12 => "CD",
    DT = 13 => "DT",
    EX = 14 => "EX",
    FW = 15 => "FW",
    IN = 16 => "IN",
    JJ = 17 => "JJ",
    JJR = 18 => "JJR",
    JJS = 19 => "JJS",
    LS = 20 => "LS",
    MD = 21 => "MD",
    NN = 22 => "NN",
    NNS = 23 => "NNS",
    NNP = 24 => "NNP",
    NNPS = 25 => "NNPS",
    PDT = 26 => "PDT",
    POS = 27 => "POS",
    PRP = 28 => "PRP",
    PRPS = 29 => "PRP$",
    RB = 30 => "RB",
    RBR = 31 => "RBR",
    RBS = 32 => "RBS",
    RP = 33 => "RP",
    SYM = 34 => "SYM",
    TO = 35 => "TO",
    UH = 36 => "UH",
    VB = 37 => "VB",
    VBD = 38 => "VBD",
    VBG = 39 => "VBG",
    VBN = 40 => "VBN",
    VBP = 41 => "VBP",
    VBZ = 42 => "VBZ",
    WDT = 43 => "WDT",
    WP = 44 => "WP",
    WPS = 45 => "WP$",
    WRB = 46 => "WRB",

    // Punctuation tags
    PERIOD = 47 => ".",
    COMMA = 48 => ",",
    COLON = 49 => ":",
    OPEN_QUOTE = 50 => "``",
    CLOSE_QUOTE = 51 => "''",
    LRB = 52 => "-LRB-",
    RRB = 53 => "-RRB-",
    HASH = 54 => "#",
    DOLLAR = 55 => "$",
}

impl CategorySet {
    pub const NOUNS: CategorySet = CategorySet::NN
        .union(CategorySet::NNS)
        .union(CategorySet::NNP)
        .union(CategorySet::NNPS);

    pub const ADVERBS: CategorySet = CategorySet::RB.union(CategorySet::RBR).union(CategorySet::RBS);

    pub const PUNCTUATION: CategorySet = CategorySet::PERIOD
        .union(CategorySet::COMMA)
        .union(CategorySet::COLON)
        .union(CategorySet::OPEN_QUOTE)
        .union(CategorySet::CLOSE_QUOTE)
        .union(CategorySet::LRB)
        .union(CategorySet::RRB)
        .union(CategorySet::HASH)
        .union(CategorySet::DOLLAR);

    pub fn of(categories: &[Category]) -> Self {
        categories
            .iter()
            .fold(CategorySet::empty(), |set, c| set.union(c.set()))
    }

    /// Wildcard-aware membership: an empty set admits every category.
    pub fn admits(self, category: Category) -> bool {
        self.is_empty() || self.contains(category.set())
    }

    /// Members in ascending bit order.
    pub fn categories(self) -> impl Iterator<Item = Category> {
        Category::ALL.iter().copied().filter(move |c| self.contains(c.set()))
    }
}

impl Default for CategorySet {
    fn default() -> Self {
        CategorySet::empty()
    }
}

impl Category {
    pub fn is_adverb(self) -> bool {
        CategorySet::ADVERBS.contains(self.set())
    }

    pub fn is_punctuation(self) -> bool {
        CategorySet::PUNCTUATION.contains(self.set())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory;

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown category")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::from_penn(s).ok_or(UnknownCategory)
    }
}

// rkyv support for CategorySet: archived as its raw bits
impl Archive for CategorySet {
    type Archived = u64;
    type Resolver = ();

    unsafe fn resolve(&self, _pos: usize, _resolver: Self::Resolver, out: *mut Self::Archived) {
        out.write(self.bits());
    }
}

impl<S: rkyv::Fallible + ?Sized> Serialize<S> for CategorySet {
    fn serialize(&self, _serializer: &mut S) -> Result<Self::Resolver, S::Error> {
        Ok(())
    }
}

impl<D: rkyv::Fallible + ?Sized> Deserialize<CategorySet, D> for u64 {
    fn deserialize(&self, _deserializer: &mut D) -> Result<CategorySet, D::Error> {
        Ok(CategorySet::from_bits_truncate(*self))
    }
}

// serde support for CategorySet: a list of Penn strings, `[]` meaning "any"
#[cfg(feature = "serde")]
impl SerdeSerialize for CategorySet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.categories())
    }
}

#[cfg(feature = "serde")]
impl<'de> SerdeDeserialize<'de> for CategorySet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SetVisitor;

        impl<'de> serde::de::Visitor<'de> for SetVisitor {
            type Value = CategorySet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a list of category names")
            }

            fn visit_seq<A: serde::de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut set = CategorySet::empty();
                while let Some(category) = seq.next_element::<Category>()? {
                    set |= category.set();
                }
                Ok(set)
            }
        }

        deserializer.deserialize_seq(SetVisitor)
    }
}
