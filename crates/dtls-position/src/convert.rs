//! UTF-8 ↔ UTF-16 offset conversion functions.

/// Number of UTF-16 code units needed to encode `s`.
///
/// Characters above U+FFFF count as two units.
pub fn utf16_len(s: &str) -> usize {
    s.chars().map(char::len_utf16).sum()
}

/// Convert a UTF-16 code-unit offset to a byte offset into `s`.
///
/// Offsets past the end of the string clamp to `s.len()`. An offset that
/// falls between the high and low surrogate of a supplementary-plane
/// character clamps to the start of that character; the result is always a
/// valid char boundary.
pub fn utf16_to_byte(s: &str, col: usize) -> usize {
    let mut units = 0usize;
    for (byte, ch) in s.char_indices() {
        if units >= col {
            return byte;
        }
        units += ch.len_utf16();
        // Requested column splits a surrogate pair: back up to the rune.
        if units > col {
            return byte;
        }
    }
    s.len()
}

/// Convert a byte offset into `s` to a UTF-16 code-unit offset.
///
/// Offsets past the end clamp to the UTF-16 length. An offset inside a
/// multi-byte character clamps to the start of that character.
pub fn byte_to_utf16(s: &str, off: usize) -> usize {
    let off = off.min(s.len());
    let mut units = 0usize;
    for (byte, ch) in s.char_indices() {
        if byte >= off {
            return units;
        }
        // Mid-rune offsets count the units up to the rune start only.
        if byte + ch.len_utf8() > off {
            return units;
        }
        units += ch.len_utf16();
    }
    units
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn ascii_is_identity() {
        let s = "margin: 8px";
        for i in 0..=s.len() {
            assert_eq!(utf16_to_byte(s, i), i);
            assert_eq!(byte_to_utf16(s, i), i);
        }
    }

    #[test]
    fn bmp_multibyte() {
        // 'é' is 2 bytes in UTF-8 but 1 UTF-16 unit.
        let s = "café!";
        assert_eq!(utf16_len(s), 5);
        assert_eq!(utf16_to_byte(s, 4), 5);
        assert_eq!(byte_to_utf16(s, 5), 4);
    }

    #[test]
    fn supplementary_plane_counts_two_units() {
        // '🎨' is 4 bytes in UTF-8 and 2 UTF-16 units.
        let s = "a🎨b";
        assert_eq!(utf16_len(s), 4);
        assert_eq!(utf16_to_byte(s, 0), 0);
        assert_eq!(utf16_to_byte(s, 1), 1);
        assert_eq!(utf16_to_byte(s, 3), 5);
        assert_eq!(byte_to_utf16(s, 5), 3);
    }

    #[test]
    fn mid_surrogate_clamps_to_rune_start() {
        let s = "a🎨b";
        // Column 2 lands between the surrogates of '🎨'.
        assert_eq!(utf16_to_byte(s, 2), 1);
    }

    #[test]
    fn mid_rune_byte_clamps_to_rune_start() {
        let s = "a🎨b";
        for off in 2..5 {
            assert_eq!(byte_to_utf16(s, off), 1);
        }
    }

    #[test]
    fn past_end_clamps() {
        let s = "x";
        assert_eq!(utf16_to_byte(s, 99), 1);
        assert_eq!(byte_to_utf16(s, 99), 1);
    }

    #[test]
    fn empty_string() {
        assert_eq!(utf16_len(""), 0);
        assert_eq!(utf16_to_byte("", 3), 0);
        assert_eq!(byte_to_utf16("", 3), 0);
    }

    proptest! {
        #[test]
        fn roundtrip_on_codepoint_boundaries(s in "\\PC*") {
            let mut col = 0usize;
            for ch in s.chars() {
                let byte = utf16_to_byte(&s, col);
                prop_assert_eq!(byte_to_utf16(&s, byte), col);
                col += ch.len_utf16();
            }
            // End of string included.
            let byte = utf16_to_byte(&s, col);
            prop_assert_eq!(byte, s.len());
            prop_assert_eq!(byte_to_utf16(&s, byte), col);
        }

        #[test]
        fn utf16_to_byte_is_char_boundary(s in "\\PC*", col in 0usize..64) {
            prop_assert!(s.is_char_boundary(utf16_to_byte(&s, col)));
        }
    }
}
