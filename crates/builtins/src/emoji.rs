//! Emoji detection heuristic.
//!
//! A glyph starts at a pictographic code point and absorbs any trailing
//! skin-tone modifiers, variation selectors and zero-width-joined
//! pictographs. Two regional indicators form one flag glyph. A digit, `#`
//! or `*` followed by the combining keycap (optionally with a variation
//! selector in between) is a keycap glyph.

const ZWJ: char = '\u{200D}';
const VS16: char = '\u{FE0F}';
const KEYCAP: char = '\u{20E3}';

/// Code points treated as pictographic: the symbol blocks that carry emoji
/// presentation plus the supplementary emoji planes.
fn is_pictographic(c: char) -> bool {
    matches!(c as u32,
        0x00A9 | 0x00AE | 0x203C | 0x2049 | 0x2122 | 0x2139
        | 0x2194..=0x2199
        | 0x21A9..=0x21AA
        | 0x231A..=0x231B
        | 0x2328 | 0x23CF
        | 0x23E9..=0x23F3
        | 0x23F8..=0x23FA
        | 0x24C2
        | 0x25AA..=0x25AB
        | 0x25B6 | 0x25C0
        | 0x25FB..=0x25FE
        | 0x2600..=0x27BF
        | 0x2934..=0x2935
        | 0x2B05..=0x2B07
        | 0x2B1B..=0x2B1C
        | 0x2B50 | 0x2B55
        | 0x3030 | 0x303D | 0x3297 | 0x3299
        | 0x1F000..=0x1FAFF)
        && !is_modifier(c)
        && !is_regional_indicator(c)
}

/// Fitzpatrick skin-tone modifiers and the two variation selectors.
fn is_modifier(c: char) -> bool {
    matches!(c as u32, 0x1F3FB..=0x1F3FF | 0xFE0E | 0xFE0F)
}

fn is_regional_indicator(c: char) -> bool {
    matches!(c as u32, 0x1F1E6..=0x1F1FF)
}

fn is_keycap_base(c: char) -> bool {
    c.is_ascii_digit() || c == '#' || c == '*'
}

/// Split `text` into emoji glyphs, ignoring anything that is not part of one.
pub fn glyphs(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    // Byte range of the glyph being built.
    let mut current: Option<(usize, usize)> = None;
    let mut after_zwj = false;
    let mut open_flag = false;
    // Start of a keycap base still waiting for its combining mark.
    let mut keycap: Option<usize> = None;

    for (i, c) in text.char_indices() {
        let end = i + c.len_utf8();
        if let Some(start) = keycap {
            if c == VS16 {
                continue;
            }
            keycap = None;
            if c == KEYCAP {
                current = Some((start, end));
                after_zwj = false;
                continue;
            }
        }
        let extends = match current {
            Some(_) if is_modifier(c) || c == ZWJ => true,
            Some(_) if after_zwj && is_pictographic(c) => true,
            Some(_) if open_flag && is_regional_indicator(c) => true,
            _ => false,
        };

        if extends {
            if let Some((_, e)) = current.as_mut() {
                *e = end;
            }
            open_flag = false;
        } else {
            if let Some((s, e)) = current.take() {
                out.push(&text[s..e]);
            }
            open_flag = false;
            if is_pictographic(c) {
                current = Some((i, end));
            } else if is_regional_indicator(c) {
                current = Some((i, end));
                open_flag = true;
            } else if is_keycap_base(c) {
                keycap = Some(i);
            }
        }
        after_zwj = c == ZWJ;
    }
    if let Some((s, e)) = current {
        out.push(&text[s..e]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_emoji() {
        assert_eq!(glyphs("😀"), ["😀"]);
        assert_eq!(glyphs("❤️"), ["❤️"]);
    }

    #[test]
    fn skin_tone_stays_attached() {
        assert_eq!(glyphs("👍🏽"), ["👍🏽"]);
    }

    #[test]
    fn zwj_sequence_is_one_glyph() {
        assert_eq!(glyphs("👨\u{200D}👩\u{200D}👧").len(), 1);
    }

    #[test]
    fn flag_is_one_glyph() {
        assert_eq!(glyphs("🇫🇷"), ["🇫🇷"]);
        assert_eq!(glyphs("🇫🇷🇩🇪").len(), 2);
    }

    #[test]
    fn keycap_is_one_glyph() {
        assert_eq!(glyphs("1\u{FE0F}\u{20E3}"), ["1\u{FE0F}\u{20E3}"]);
        assert_eq!(glyphs("#\u{20E3}"), ["#\u{20E3}"]);
        assert_eq!(glyphs("😀1\u{FE0F}\u{20E3}").len(), 2);
    }

    #[test]
    fn bare_digits_are_not_keycaps() {
        assert!(glyphs("42").is_empty());
        assert!(glyphs("1\u{FE0F}").is_empty());
    }

    #[test]
    fn plain_text_has_none() {
        assert!(glyphs("hello").is_empty());
        assert!(glyphs("").is_empty());
    }

    #[test]
    fn text_around_emoji_is_ignored() {
        assert_eq!(glyphs("a😀b"), ["😀"]);
        assert_eq!(glyphs("😀x😀").len(), 2);
    }
}
