//! Download filenames for printable documents.

use chrono::NaiveDate;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::domain::document::DocumentKind;

/// Appends the ASCII spelling of `c`, lowercased. Returns `false` if it has none.
///
/// Icelandic letters get their conventional transliteration. Other letters are
/// decomposed and lose their combining marks; what is left must be ASCII.
fn transliterate(c: char, out: &mut String) -> bool {
    let lower = c.to_lowercase().next().unwrap_or(c);
    let special = match lower {
        'þ' => Some("th"),
        'ð' | 'đ' => Some("d"),
        'æ' => Some("ae"),
        'ö' | 'ø' => Some("o"),
        'á' => Some("a"),
        'é' => Some("e"),
        'í' => Some("i"),
        'ó' => Some("o"),
        'ú' => Some("u"),
        'ý' => Some("y"),
        'ł' => Some("l"),
        'ß' => Some("ss"),
        'œ' => Some("oe"),
        _ => None,
    };
    if let Some(ascii) = special {
        out.push_str(ascii);
        return true;
    }

    let start = out.len();
    for part in std::iter::once(lower).nfd().filter(|&part| !is_combining_mark(part)) {
        if !part.is_ascii_alphanumeric() {
            out.truncate(start);
            return false;
        }
        out.push(part.to_ascii_lowercase());
    }
    out.len() > start
}

/// Lowercase ASCII slug: transliterated letters, runs of anything else
/// collapsed to a single `-`, no leading or trailing dashes.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    let mut piece = String::new();

    for c in input.chars() {
        piece.clear();
        if !transliterate(c, &mut piece) {
            pending_dash = true;
            continue;
        }
        if pending_dash && !slug.is_empty() {
            slug.push('-');
        }
        pending_dash = false;
        slug.push_str(&piece);
    }

    slug
}

/// Filename for a printable document, e.g. `hatun-10-ibualisti-2026-03-07.html`.
///
/// Deterministic, and distinct for distinct building slugs, kinds and dates.
pub fn document_filename(
    building_title: &str,
    kind: DocumentKind,
    printed_on: NaiveDate,
    extension: &str,
) -> String {
    let building = slugify(building_title);
    let building = if building.is_empty() {
        "hus".to_string()
    } else {
        building
    };
    format!(
        "{building}-{}-{}.{extension}",
        kind.slug(),
        printed_on.format("%Y-%m-%d")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 7).unwrap()
    }

    #[test]
    fn test_slugify_icelandic_letters() {
        assert_eq!(slugify("Þórsgata"), "thorsgata");
        assert_eq!(slugify("Bræðraborgarstígur"), "braedraborgarstigur");
        assert_eq!(slugify("Ölduslóð"), "olduslod");
    }

    #[test]
    fn test_slugify_other_latin_letters() {
        assert_eq!(slugify("Dvořák"), "dvorak");
        assert_eq!(slugify("Ștefan Łukasz"), "stefan-lukasz");
        assert_eq!(slugify("Søndergade Ñandú"), "sondergade-nandu");
    }

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("  Hátún 10 / B  "), "hatun-10-b");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_document_filename() {
        assert_eq!(
            document_filename("Hátún 10", DocumentKind::ResidentDirectory, date(), "html"),
            "hatun-10-ibualisti-2026-03-07.html"
        );
        assert_eq!(
            document_filename("Hátún 10", DocumentKind::MailboxLabels, date(), "html"),
            "hatun-10-postkassamerki-2026-03-07.html"
        );
    }

    #[test]
    fn test_document_filename_untitled_building() {
        assert_eq!(
            document_filename("???", DocumentKind::MailboxLabels, date(), "html"),
            "hus-postkassamerki-2026-03-07.html"
        );
    }
}
