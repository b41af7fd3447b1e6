//! Icelandic collation for resident names and apartment codes.
//!
//! Strings are compared in three passes, the way locale collators do:
//!
//! 1. **Primary**: base letters in Icelandic alphabet order
//!    (`a á b c d ð e é f g h i í j k l m n o ó p q r s t u ú v w x y ý z þ æ ö`),
//!    with whitespace before punctuation before digits before letters.
//! 2. **Secondary**: foreign accented letters (`ü`, `è`, `ç`, ...) that were folded
//!    onto an Icelandic base letter sort after the plain letter.
//! 3. **Tertiary**: lowercase before uppercase.
//!
//! Strings equal on all three passes fall back to code point order, so the
//! comparison is total and only identical strings compare equal.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

const ALPHABET: [char; 36] = [
    'a', 'á', 'b', 'c', 'd', 'ð', 'e', 'é', 'f', 'g', 'h', 'i', 'í', 'j', 'k', 'l', 'm', 'n',
    'o', 'ó', 'p', 'q', 'r', 's', 't', 'u', 'ú', 'v', 'w', 'x', 'y', 'ý', 'z', 'þ', 'æ', 'ö',
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Primary {
    Space,
    Punctuation(char),
    Digit(u32),
    Letter(usize),
    Other(char),
}

#[derive(Debug, Clone, Copy)]
struct Weight {
    primary: Primary,
    secondary: u8,
    tertiary: u8,
}

fn letter_rank(c: char) -> Option<usize> {
    ALPHABET.iter().position(|&letter| letter == c)
}

/// Letters that sort as another letter and do not decompose to it.
fn fold_special(c: char) -> Option<char> {
    match c {
        'ä' => Some('æ'),
        'ø' => Some('ö'),
        'ł' => Some('l'),
        'đ' => Some('d'),
        'ß' => Some('s'),
        _ => None,
    }
}

/// Maps letters outside the Icelandic alphabet onto the letter they sort with:
/// the canonical decomposition minus its combining marks.
fn fold_foreign(c: char) -> Option<char> {
    if let Some(base) = fold_special(c) {
        return Some(base);
    }

    let base = std::iter::once(c).nfd().find(|&part| !is_combining_mark(part))?;
    if base == c {
        return None;
    }
    Some(fold_special(base).unwrap_or(base))
}

fn weigh(c: char) -> Weight {
    let lower = c.to_lowercase().next().unwrap_or(c);
    let tertiary = u8::from(lower != c);

    let (primary, secondary) = if c.is_whitespace() {
        (Primary::Space, 0)
    } else if let Some(digit) = c.to_digit(10) {
        (Primary::Digit(digit), 0)
    } else if let Some(rank) = letter_rank(lower) {
        (Primary::Letter(rank), 0)
    } else if let Some(rank) = fold_foreign(lower).and_then(letter_rank) {
        (Primary::Letter(rank), 1)
    } else if c.is_alphabetic() {
        (Primary::Other(lower), 0)
    } else {
        (Primary::Punctuation(c), 0)
    };

    Weight {
        primary,
        secondary,
        tertiary,
    }
}

/// Compares two strings using Icelandic collation.
///
/// # Examples
///
/// ```
/// use resident_registry::domain::collation::compare;
/// use std::cmp::Ordering;
///
/// assert_eq!(compare("Guðrún", "Jón"), Ordering::Less);
/// assert_eq!(compare("Ævar", "Þóra"), Ordering::Greater);
/// ```
pub fn compare(a: &str, b: &str) -> Ordering {
    let wa: Vec<Weight> = a.chars().map(weigh).collect();
    let wb: Vec<Weight> = b.chars().map(weigh).collect();

    wa.iter()
        .map(|w| w.primary)
        .cmp(wb.iter().map(|w| w.primary))
        .then_with(|| {
            wa.iter()
                .map(|w| w.secondary)
                .cmp(wb.iter().map(|w| w.secondary))
        })
        .then_with(|| {
            wa.iter()
                .map(|w| w.tertiary)
                .cmp(wb.iter().map(|w| w.tertiary))
        })
        .then_with(|| a.cmp(b))
}
