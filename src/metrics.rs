//! Advance widths of the PDF base-14 faces the cards are set in.
//!
//! Builtin fonts are not embedded, so layout measures text with the standard
//! AFM widths (units of 1/1000 em). Accented Latin-1 letters take the width
//! of their base letter.

use crate::surface::{FontFace, FontFamily};

/// Width used for characters outside the tables.
const FALLBACK_WIDTH: u16 = 556;

/// Monospaced advance of every Courier glyph.
const COURIER_WIDTH: u16 = 600;

/// Rendered width of `text` in points.
pub fn text_width(text: &str, face: FontFace, size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| char_width(c, face) as u32).sum();
    units as f32 * size / 1000.0
}

fn char_width(c: char, face: FontFace) -> u16 {
    match face.family {
        FontFamily::Courier => COURIER_WIDTH,
        FontFamily::Helvetica if face.bold => helvetica_bold(base_letter(c)),
        FontFamily::Helvetica => helvetica(base_letter(c)),
    }
}

fn base_letter(c: char) -> char {
    match c {
        'À'..='Å' => 'A',
        'Ç' => 'C',
        'È'..='Ë' => 'E',
        'Ì'..='Ï' => 'I',
        'Ñ' => 'N',
        'Ò'..='Ö' | 'Ø' => 'O',
        'Ù'..='Ü' => 'U',
        'Ý' => 'Y',
        'à'..='å' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ì'..='ï' => 'i',
        'ñ' => 'n',
        'ò'..='ö' | 'ø' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

fn helvetica(c: char) -> u16 {
    match c {
        ' ' | '!' | ',' | '.' | '/' | ':' | ';' | '[' | '\\' | ']' | 'I' | 'f' | 't' => 278,
        '"' => 355,
        '\'' => 191,
        '(' | ')' | '-' | '`' | 'r' => 333,
        '*' => 389,
        '+' | '<' | '=' | '>' | '~' => 584,
        '@' => 1015,
        '^' => 469,
        '{' | '}' => 334,
        '|' => 260,
        '%' => 889,
        '&' | 'A' | 'B' | 'E' | 'K' | 'P' | 'S' | 'V' | 'X' | 'Y' => 667,
        'C' | 'D' | 'H' | 'N' | 'R' | 'U' | 'w' => 722,
        'F' | 'T' | 'Z' | 'ß' => 611,
        'G' | 'O' | 'Q' => 778,
        'J' | 'c' | 'k' | 's' | 'v' | 'x' | 'y' | 'z' => 500,
        'L' => 556,
        'M' | 'm' => 833,
        'W' => 944,
        'i' | 'j' | 'l' => 222,
        _ => FALLBACK_WIDTH,
    }
}

fn helvetica_bold(c: char) -> u16 {
    match c {
        ' ' | ',' | '.' | '/' | '\\' | 'I' => 278,
        '!' | '(' | ')' | '-' | ':' | ';' | '[' | ']' | '`' | 'f' | 't' => 333,
        '"' => 474,
        '\'' => 238,
        '*' | 'r' | '{' | '}' => 389,
        '+' | '<' | '=' | '>' | '^' | '~' => 584,
        '@' => 975,
        '|' => 280,
        '%' => 889,
        '&' | 'A' | 'B' | 'C' | 'D' | 'H' | 'K' | 'N' | 'R' | 'U' => 722,
        'E' | 'P' | 'S' | 'V' | 'X' | 'Y' => 667,
        'F' | 'L' | 'T' | 'Z' | '?' | 'b' | 'd' | 'g' | 'h' | 'n' | 'o' | 'p' | 'q' | 'u' | 'ß' => 611,
        'G' | 'O' | 'Q' | 'w' => 778,
        'M' => 833,
        'W' => 944,
        'i' | 'j' | 'l' => 278,
        'm' => 889,
        'z' => 500,
        _ => FALLBACK_WIDTH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helvetica_widths_match_afm() {
        let regular = FontFamily::Helvetica.regular();
        // L(556) F(611) space(278) 2(556) 0(556)
        assert!((text_width("LF 20", regular, 10.0) - 25.57).abs() < 1e-3);
        // D(722) L(556) K(667)
        assert!((text_width("DLK", regular, 10.0) - 19.45).abs() < 1e-3);
    }

    #[test]
    fn bold_is_wider_and_umlauts_use_base_letter() {
        let regular = FontFamily::Helvetica.regular();
        let bold = FontFamily::Helvetica.bold();
        assert!(text_width("Müller", bold, 15.0) > text_width("Müller", regular, 15.0));
        assert_eq!(text_width("Müller", regular, 12.0), text_width("Muller", regular, 12.0));
    }

    #[test]
    fn courier_is_monospaced() {
        let courier = FontFamily::Courier.regular();
        assert_eq!(text_width("iiii", courier, 10.0), text_width("WWWW", courier, 10.0));
        assert!((text_width("TF", courier, 10.0) - 12.0).abs() < 1e-4);
    }
}
