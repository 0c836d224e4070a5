//! The fixed symbol set the confusion model is defined over.

/// Lowercase letters candidates are built from, in enumeration order.
pub const ALPHABET: [char; 26] = [
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's',
    't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// Left context of an edit made at the start of a word.
pub const SENTINEL: char = '@';

/// Number of symbols in a confusion matrix dimension (sentinel + letters).
pub const SYMBOL_COUNT: usize = ALPHABET.len() + 1;

/// Errors for words the generator cannot work on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum InputError {
    /// The word has no characters
    #[error("Word is empty")]
    Empty,

    /// The word contains a character outside `a`..=`z`
    #[error("Unsupported character {ch:?} at position {position} in {word:?}")]
    UnsupportedChar {
        /// the rejected word
        word: String,
        /// the offending character
        ch: char,
        /// character offset of `ch`
        position: usize,
    },
}

/// Index of a symbol in a confusion matrix row: the sentinel is 0, `a` is 1.
#[inline(always)]
pub fn symbol_index(c: char) -> Option<usize> {
    match c {
        SENTINEL => Some(0),
        'a'..='z' => Some(c as usize - 'a' as usize + 1),
        _ => None,
    }
}

/// Inverse of [`symbol_index`].
#[inline(always)]
pub fn symbol_at(index: usize) -> Option<char> {
    match index {
        0 => Some(SENTINEL),
        i if i < SYMBOL_COUNT => Some(ALPHABET[i - 1]),
        _ => None,
    }
}

/// Sentinel followed by every letter.
pub fn symbols() -> impl Iterator<Item = char> {
    std::iter::once(SENTINEL).chain(ALPHABET.iter().copied())
}

pub fn is_letter(c: char) -> bool {
    c.is_ascii_lowercase()
}

/// Checks that `word` can be fed to the candidate generator.
pub fn validate_word(word: &str) -> Result<(), InputError> {
    if word.is_empty() {
        return Err(InputError::Empty);
    }

    match word.chars().enumerate().find(|(_, c)| !is_letter(*c)) {
        Some((position, ch)) => Err(InputError::UnsupportedChar {
            word: word.to_string(),
            ch,
            position,
        }),
        None => Ok(()),
    }
}
