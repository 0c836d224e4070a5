//! Exhaustive single-edit neighbourhoods of a word.
//!
//! Every enumerator is a plain function of the input word: it yields each
//! variant together with the two characters involved, and scoring is left to
//! [`Scorer`](crate::scorer::Scorer).
use std::fmt;
use std::iter::once;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::alphabet::{ALPHABET, SENTINEL};

/// The four single-character operations of the channel model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EditKind {
    /// `y` typed after `x`
    #[serde(rename = "i")]
    Insertion,
    /// `y` dropped after `x`
    #[serde(rename = "d")]
    Deletion,
    /// `x` typed in place of `y`
    #[serde(rename = "s")]
    Substitution,
    /// `xy` typed as `yx`
    #[serde(rename = "t")]
    Transposition,
}

impl EditKind {
    pub const ALL: [EditKind; 4] = [
        EditKind::Insertion,
        EditKind::Deletion,
        EditKind::Substitution,
        EditKind::Transposition,
    ];

    /// Single-letter code used in corpora and provenance strings.
    pub const fn code(self) -> char {
        match self {
            EditKind::Insertion => 'i',
            EditKind::Deletion => 'd',
            EditKind::Substitution => 's',
            EditKind::Transposition => 't',
        }
    }

    pub fn from_code(code: char) -> Option<EditKind> {
        EditKind::ALL.iter().copied().find(|k| k.code() == code)
    }

    #[inline(always)]
    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for EditKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}", self.code())
    }
}

/// A word one operation away from the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// the resulting word-form
    pub word: SmolStr,
    pub kind: EditKind,
    /// left context for insertions and deletions, first character otherwise
    pub x: char,
    /// the inserted, deleted, replaced or second transposed character
    pub y: char,
}

impl Edit {
    pub fn new(word: impl Into<SmolStr>, kind: EditKind, x: char, y: char) -> Edit {
        Edit {
            word: word.into(),
            kind,
            x,
            y,
        }
    }

    /// `x`, `y` and the operation code, e.g. `"cad"` for deleting `a` after `c`.
    pub fn provenance(&self) -> SmolStr {
        let mut s = String::with_capacity(3);
        s.push(self.x);
        s.push(self.y);
        s.push(self.kind.code());
        s.into()
    }
}

#[inline(always)]
fn left_context(chars: &[char], i: usize) -> char {
    if i == 0 {
        SENTINEL
    } else {
        chars[i - 1]
    }
}

/// Every letter inserted at every position: `(len + 1) * 26` edits.
pub fn insertions(word: &str) -> Vec<Edit> {
    let chars: Vec<char> = word.chars().collect();
    let mut edits = Vec::with_capacity((chars.len() + 1) * ALPHABET.len());

    for i in 0..=chars.len() {
        let x = left_context(&chars, i);
        for &y in ALPHABET.iter() {
            let variant: String = chars[..i]
                .iter()
                .chain(once(&y))
                .chain(chars[i..].iter())
                .collect();
            edits.push(Edit::new(variant, EditKind::Insertion, x, y));
        }
    }

    edits
}

/// Every character removed once: `len` edits.
pub fn deletions(word: &str) -> Vec<Edit> {
    let chars: Vec<char> = word.chars().collect();

    (0..chars.len())
        .map(|i| {
            let variant: String = chars[..i].iter().chain(chars[i + 1..].iter()).collect();
            Edit::new(variant, EditKind::Deletion, left_context(&chars, i), chars[i])
        })
        .collect()
}

/// Every position replaced by every letter: `len * 26` edits.
///
/// The identity replacement is included; callers ranking candidates drop it.
pub fn substitutions(word: &str) -> Vec<Edit> {
    let chars: Vec<char> = word.chars().collect();
    let mut edits = Vec::with_capacity(chars.len() * ALPHABET.len());

    for (i, &y) in chars.iter().enumerate() {
        for &x in ALPHABET.iter() {
            let variant: String = chars[..i]
                .iter()
                .chain(once(&x))
                .chain(chars[i + 1..].iter())
                .collect();
            edits.push(Edit::new(variant, EditKind::Substitution, x, y));
        }
    }

    edits
}

/// Every adjacent pair swapped: `len - 1` edits, none for words shorter than 2.
pub fn transpositions(word: &str) -> Vec<Edit> {
    let chars: Vec<char> = word.chars().collect();

    chars
        .windows(2)
        .enumerate()
        .map(|(i, pair)| {
            let (x, y) = (pair[0], pair[1]);
            let variant: String = chars[..i]
                .iter()
                .chain([y, x].iter())
                .chain(chars[i + 2..].iter())
                .collect();
            Edit::new(variant, EditKind::Transposition, x, y)
        })
        .collect()
}

/// All four neighbourhoods, in insertion, deletion, substitution,
/// transposition order.
pub fn edits(word: &str) -> Vec<Edit> {
    let mut out = insertions(word);
    out.extend(deletions(word));
    out.extend(substitutions(word));
    out.extend(transpositions(word));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn neighbourhood_sizes() {
        for word in ["a", "ab", "cat", "warfarin"] {
            let len = word.chars().count();
            assert_eq!(insertions(word).len(), (len + 1) * 26);
            assert_eq!(deletions(word).len(), len);
            assert_eq!(substitutions(word).len(), len * 26);
            assert_eq!(transpositions(word).len(), len.saturating_sub(1));
        }
        assert!(transpositions("a").is_empty());
    }

    #[test]
    fn insertion_context() {
        let edits = insertions("cat");
        assert_eq!(edits[0], Edit::new("acat", EditKind::Insertion, '@', 'a'));
        assert_eq!(edits[26], Edit::new("caat", EditKind::Insertion, 'c', 'a'));
        assert_eq!(
            edits.last().unwrap(),
            &Edit::new("catz", EditKind::Insertion, 't', 'z')
        );
        assert_eq!(edits.iter().map(|e| &e.word).unique().count(), 4 * 26 - 3);
    }

    #[test]
    fn insertions_of_cat_never_reproduce_it() {
        let edits = insertions("cat");
        assert_eq!(edits.len(), 104);
        assert!(edits.iter().all(|e| e.word != "cat"));
    }

    #[test]
    fn deletion_context() {
        assert_eq!(
            deletions("cat"),
            vec![
                Edit::new("at", EditKind::Deletion, '@', 'c'),
                Edit::new("ct", EditKind::Deletion, 'c', 'a'),
                Edit::new("ca", EditKind::Deletion, 'a', 't'),
            ]
        );
    }

    #[test]
    fn substitution_keeps_replaced_char_as_y() {
        let edits = substitutions("cat");
        assert_eq!(edits[0], Edit::new("aat", EditKind::Substitution, 'a', 'c'));
        assert_eq!(edits[2], Edit::new("cat", EditKind::Substitution, 'c', 'c'));
        assert_eq!(edits.iter().filter(|e| e.word == "cat").count(), 3);
    }

    #[test]
    fn transposition_pairs() {
        assert_eq!(
            transpositions("cat"),
            vec![
                Edit::new("act", EditKind::Transposition, 'c', 'a'),
                Edit::new("cta", EditKind::Transposition, 'a', 't'),
            ]
        );
    }

    #[test]
    fn provenance_and_codes() {
        assert_eq!(Edit::new("ct", EditKind::Deletion, 'c', 'a').provenance(), "cad");
        for kind in EditKind::ALL.iter() {
            assert_eq!(EditKind::from_code(kind.code()), Some(*kind));
        }
        assert_eq!(EditKind::from_code('x'), None);
    }

    #[test]
    fn combined_order() {
        let all = edits("ab");
        assert_eq!(all.len(), 3 * 26 + 2 + 2 * 26 + 1);
        assert_eq!(all[0].kind, EditKind::Insertion);
        assert_eq!(all.last().unwrap().kind, EditKind::Transposition);
    }
}
