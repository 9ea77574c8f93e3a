//! Text measurement for the base-14 Helvetica fonts.
//!
//! The PDF uses the built-in Type1 Helvetica faces with WinAnsiEncoding,
//! so widths are known up front from the standard AFM tables (per-mille of
//! the font size). Glyphs outside the printable ASCII range are estimated
//! with the average lowercase width, which is close enough for fitting.

const MM_PER_PT: f32 = 25.4 / 72.0;

/// Fallback width for glyphs outside the table.
const DEFAULT_WIDTH: u16 = 556;

/// Helvetica widths for chars 32..=126.
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278,
    584, 584, 584, 556, 1015, 667, 667, 722, 722, 667, 611, 778, 722, 278,
    500, 667, 556, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 278, 278, 278, 469, 556, 333, 556, 556, 500, 556, 556,
    278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333, 500,
    278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold widths for chars 32..=126.
#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333,
    584, 584, 584, 611, 975, 722, 722, 722, 722, 667, 611, 778, 722, 278,
    556, 722, 611, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 333, 278, 333, 584, 556, 333, 556, 611, 556, 611, 556,
    333, 611, 611, 278, 278, 556, 278, 889, 611, 611, 611, 611, 389, 556,
    333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
}

impl FontStyle {
    fn widths(self) -> &'static [u16; 95] {
        match self {
            FontStyle::Regular => &HELVETICA,
            FontStyle::Bold => &HELVETICA_BOLD,
        }
    }
}

fn glyph_width(c: char, style: FontStyle) -> u16 {
    let code = c as u32;
    if (32..=126).contains(&code) {
        style.widths()[(code - 32) as usize]
    } else {
        DEFAULT_WIDTH
    }
}

/// Width of `text` in millimetres at `size_pt`.
pub fn text_width_mm(text: &str, style: FontStyle, size_pt: f32) -> f32 {
    let mille: u32 = text.chars().map(|c| glyph_width(c, style) as u32).sum();
    mille as f32 / 1000.0 * size_pt * MM_PER_PT
}

/// Line height in millimetres for `size_pt`, with the 1.2 leading the
/// label layout uses throughout.
pub fn line_height_mm(size_pt: f32) -> f32 {
    size_pt * MM_PER_PT * 1.2
}

pub fn pt_to_mm(pt: f32) -> f32 {
    pt * MM_PER_PT
}

pub fn mm_to_pt(mm: f32) -> f32 {
    mm / MM_PER_PT
}

/// Smallest font size the label ever uses.
pub const MIN_FONT_PT: f32 = 6.0;
const FONT_STEP_PT: f32 = 0.5;

/// Largest size at or below `initial_pt` at which `text` fits
/// `max_width_mm`, shrinking in half-point steps down to the floor.
pub fn fit_font_size(text: &str, style: FontStyle, max_width_mm: f32, initial_pt: f32) -> f32 {
    let mut size = initial_pt;
    while text_width_mm(text, style, size) > max_width_mm && size > MIN_FONT_PT {
        size -= FONT_STEP_PT;
    }
    size.max(MIN_FONT_PT)
}

/// Fits `text` into `max_width_mm`: a single line at the largest fitting
/// size, or, when even the floor size is too wide, a greedy word wrap at
/// the floor. Returns the lines and the size they share.
pub fn wrap_and_fit(
    text: &str,
    style: FontStyle,
    max_width_mm: f32,
    initial_pt: f32,
) -> (Vec<String>, f32) {
    let size = fit_font_size(text, style, max_width_mm, initial_pt);
    if text_width_mm(text, style, size) <= max_width_mm {
        return (vec![text.to_string()], size);
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if current.is_empty() || text_width_mm(&candidate, style, size) <= max_width_mm {
            current = candidate;
        } else {
            lines.push(current);
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(text.to_string());
    }
    (lines, size)
}

/// Encodes text for a WinAnsiEncoding string operand. ASCII passes
/// through; the Latin-1 block maps directly; a handful of Windows-1252
/// punctuation code points are mapped explicitly; anything else becomes
/// '?'.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7E => c as u8,
            0xA0..=0xFF => c as u32 as u8,
            0x20AC => 0x80, // euro sign
            0x2018 => 0x91, // left single quote
            0x2019 => 0x92, // right single quote
            0x201C => 0x93, // left double quote
            0x201D => 0x94, // right double quote
            0x2022 => 0x95, // bullet
            0x2013 => 0x96, // en dash
            0x2014 => 0x97, // em dash
            0x2026 => 0x85, // ellipsis
            0x2122 => 0x99, // trade mark
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_widths_match_afm_values() {
        // 'W' is the widest Helvetica capital, 'i' among the narrowest.
        assert_eq!(glyph_width('W', FontStyle::Regular), 944);
        assert_eq!(glyph_width('i', FontStyle::Regular), 222);
        assert_eq!(glyph_width(' ', FontStyle::Regular), 278);
        assert_eq!(glyph_width('0', FontStyle::Bold), 556);
    }

    #[test]
    fn bold_runs_wider_than_regular() {
        let text = "Blizzard Of Ozz";
        assert!(
            text_width_mm(text, FontStyle::Bold, 10.0) > text_width_mm(text, FontStyle::Regular, 10.0)
        );
    }

    #[test]
    fn width_scales_linearly_with_size() {
        let at_ten = text_width_mm("Crazy Train", FontStyle::Regular, 10.0);
        let at_twenty = text_width_mm("Crazy Train", FontStyle::Regular, 20.0);
        assert!((at_twenty - 2.0 * at_ten).abs() < 1e-4);
    }

    #[test]
    fn fitting_shrinks_until_text_fits_or_floors() {
        let wide = "An Unreasonably Long Track Title That Cannot Possibly Fit";
        let size = fit_font_size(wide, FontStyle::Regular, 70.0, 10.0);
        assert!(size < 10.0);
        assert!(size >= MIN_FONT_PT);

        let narrow = fit_font_size("Dee", FontStyle::Regular, 70.0, 10.0);
        assert!((narrow - 10.0).abs() < f32::EPSILON);
    }

    #[test]
    fn wrapping_kicks_in_only_at_the_floor() {
        let (lines, size) = wrap_and_fit("Crazy Train", FontStyle::Bold, 70.0, 14.0);
        assert_eq!(lines, vec!["Crazy Train".to_string()]);
        assert!(size > MIN_FONT_PT);

        let long = "Suicide Solution Including The Extended Guitar Solo Passage \
                    Recorded Live At The Tower Theatre";
        let (lines, size) = wrap_and_fit(long, FontStyle::Bold, 40.0, 14.0);
        assert!(lines.len() > 1);
        assert!((size - MIN_FONT_PT).abs() < f32::EPSILON);
        for line in &lines {
            assert!(text_width_mm(line, FontStyle::Bold, size) <= 40.0);
        }
    }

    #[test]
    fn win_ansi_passes_ascii_and_maps_punctuation() {
        assert_eq!(encode_win_ansi("Mr. Crowley"), b"Mr. Crowley".to_vec());
        assert_eq!(encode_win_ansi("\u{2019}"), vec![0x92]);
        assert_eq!(encode_win_ansi("\u{00E9}"), vec![0xE9]);
        assert_eq!(encode_win_ansi("\u{4E16}"), vec![b'?']);
    }
}
