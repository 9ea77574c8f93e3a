//! Label face geometry.
//!
//! Pure computation: a release (grouped into discs) becomes a
//! [`LabelLayout`] of fully positioned elements in millimetres, measured
//! with top-left page coordinates. PDF emission happens elsewhere.
//!
//! A label face is the 74x109 mm strip that slides into a CD jewel case.
//! Four faces fit an A4 page in two columns of two. A disc whose track
//! list overflows one face at the minimum font size continues onto an
//! additional face titled "<album> (continued)"; faces flow onto as many
//! pages as needed, so no track is ever dropped.

use crate::core::metrics::{
    fit_font_size, line_height_mm, pt_to_mm, text_width_mm, wrap_and_fit, FontStyle,
};
use crate::domain::model::{Disc, LabelOptions, NumberedTrack, Release};
use std::sync::OnceLock;

pub const STRIP_WIDTH: f32 = 74.0;
pub const STRIP_HEIGHT: f32 = 109.0;
pub const MARGIN: f32 = 2.0;

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
const PAGE_ORIGIN_X: f32 = 10.0;
const PAGE_ORIGIN_Y: f32 = 10.0;
const FACES_PER_PAGE: usize = 4;

const ALBUM_FONT_PT: f32 = 14.0;
const ARTIST_FONT_PT: f32 = 12.0;
const TRACK_FONT_PT: f32 = 10.0;

/// Side of the square region reserved for cover art on the first face.
const ART_SIZE: f32 = 30.0;
/// Gap between a track title and its right-aligned duration.
const DURATION_GAP: f32 = 1.5;
const CROP_WING: f32 = 5.0;

const ALTERNATE_COLOR: (u8, u8, u8) = (255, 255, 200);
const TITLE_BG_COLOR: (u8, u8, u8) = (255, 230, 128);
const TITLE_BG_MARGIN: f32 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// Text positioned by its left edge and baseline.
    Text {
        x: f32,
        baseline: f32,
        size_pt: f32,
        style: FontStyle,
        text: String,
    },
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: (u8, u8, u8),
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        dashed: bool,
    },
    /// Cover art placement; the image data travels separately.
    Image { x: f32, y: f32, w: f32, h: f32 },
}

#[derive(Debug, Clone, Default)]
pub struct Page {
    pub elements: Vec<Element>,
}

#[derive(Debug, Clone, Default)]
pub struct LabelLayout {
    pub pages: Vec<Page>,
}

impl LabelLayout {
    pub fn track_rows(&self) -> usize {
        self.pages
            .iter()
            .flat_map(|p| &p.elements)
            .filter(|e| {
                matches!(e, Element::Text { style, size_pt, .. }
                    if *style == FontStyle::Regular && *size_pt <= TRACK_FONT_PT)
            })
            .count()
    }
}

fn brackets_re() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r"\([^)]*\)").expect("bracket pattern"))
}

/// Removes bracketed segments; Discogs track titles often carry remix and
/// credit notes in brackets that do not fit a label column.
pub fn strip_brackets(text: &str) -> String {
    let stripped = brackets_re().replace_all(text, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Computes the full layout for a release. `art` carries the pixel
/// dimensions of the cover image when one was fetched.
pub fn compute_layout(
    release: &Release,
    discs: &[Disc],
    art: Option<(u32, u32)>,
    options: &LabelOptions,
) -> LabelLayout {
    let mut faces: Vec<Vec<Element>> = Vec::new();

    if discs.is_empty() {
        // Header-only face for releases with no usable track rows.
        let (elements, _) = build_face(&release.title, &release.artist, art, &[], options);
        faces.push(elements);
    }

    let mut first_face = true;
    for disc in discs {
        let mut remaining: &[NumberedTrack] = &disc.tracks;
        let mut continued = false;
        loop {
            let title = if continued {
                format!("{} (continued)", release.title)
            } else {
                release.title.clone()
            };
            let face_art = if first_face { art } else { None };
            let (elements, consumed) =
                build_face(&title, &release.artist, face_art, remaining, options);
            faces.push(elements);
            first_face = false;
            remaining = &remaining[consumed..];
            if remaining.is_empty() {
                break;
            }
            continued = true;
        }
    }

    let mut layout = LabelLayout::default();
    for (index, face) in faces.into_iter().enumerate() {
        if index % FACES_PER_PAGE == 0 {
            layout.pages.push(Page::default());
        }
        let quadrant = index % FACES_PER_PAGE;
        let dx = PAGE_ORIGIN_X + (quadrant % 2) as f32 * STRIP_WIDTH;
        let dy = PAGE_ORIGIN_Y + (quadrant / 2) as f32 * STRIP_HEIGHT;
        let page = layout.pages.last_mut().expect("page pushed above");
        page.elements
            .extend(face.into_iter().map(|e| translate(e, dx, dy)));
    }

    if options.ruler {
        if let Some(first) = layout.pages.first_mut() {
            draw_ruler(
                &mut first.elements,
                PAGE_ORIGIN_X,
                PAGE_ORIGIN_Y + 2.0 * STRIP_HEIGHT + 10.0,
                STRIP_WIDTH,
            );
        }
    }

    layout
}

/// Lays out one face in face-local coordinates (origin at the top-left
/// crop corner). Returns the elements and how many tracks were placed;
/// at least one track is always taken so composition makes progress.
fn build_face(
    title: &str,
    artist: &str,
    art: Option<(u32, u32)>,
    tracks: &[NumberedTrack],
    options: &LabelOptions,
) -> (Vec<Element>, usize) {
    let mut elements = Vec::new();

    add_crop_marks(&mut elements);

    let content_x = MARGIN;
    let content_width = STRIP_WIDTH - 2.0 * MARGIN;
    let bottom = STRIP_HEIGHT - MARGIN;
    let mut y = MARGIN;

    if options.title_background {
        elements.push(Element::Rect {
            x: -TITLE_BG_MARGIN,
            y: TITLE_BG_MARGIN,
            w: STRIP_WIDTH + 2.0 * TITLE_BG_MARGIN,
            h: 15.0 - 2.0 * TITLE_BG_MARGIN,
            color: TITLE_BG_COLOR,
        });
    }

    if let Some((px_w, px_h)) = art {
        let scale = ART_SIZE / px_w.max(px_h).max(1) as f32;
        let w = px_w as f32 * scale;
        let h = px_h as f32 * scale;
        elements.push(Element::Image {
            x: content_x + (content_width - w) / 2.0,
            y: y + (ART_SIZE - h) / 2.0,
            w,
            h,
        });
        y += ART_SIZE + MARGIN;
    }

    y += centered_block(&mut elements, title, FontStyle::Bold, ALBUM_FONT_PT, content_x, y, content_width);
    y += centered_block(&mut elements, artist, FontStyle::Bold, ARTIST_FONT_PT, content_x, y, content_width);
    y += MARGIN;

    let mut consumed = 0;
    for track in tracks {
        let mut text = format!("{:02} {}", track.number, track.title);
        if options.strip_brackets {
            text = strip_brackets(&text);
        }

        // Durations sit right-aligned; the title column narrows to fit.
        let duration = track.duration.trim();
        let reserved = if duration.is_empty() {
            0.0
        } else {
            text_width_mm(duration, FontStyle::Regular, TRACK_FONT_PT) + DURATION_GAP
        };

        let size = fit_font_size(&text, FontStyle::Regular, content_width - reserved, TRACK_FONT_PT);
        let row_height = line_height_mm(size);

        if consumed > 0 && y + row_height > bottom {
            break;
        }

        if options.alternate_backgrounds && consumed % 2 == 1 {
            elements.push(Element::Rect {
                x: content_x,
                y,
                w: content_width,
                h: row_height,
                color: ALTERNATE_COLOR,
            });
        }

        let baseline = y + row_height / 2.0 + 0.3 * pt_to_mm(size);
        elements.push(Element::Text {
            x: content_x,
            baseline,
            size_pt: size,
            style: FontStyle::Regular,
            text,
        });
        if !duration.is_empty() {
            let dur_width = text_width_mm(duration, FontStyle::Regular, size);
            elements.push(Element::Text {
                x: content_x + content_width - dur_width,
                baseline,
                size_pt: size,
                style: FontStyle::Regular,
                text: duration.to_string(),
            });
        }

        y += row_height;
        consumed += 1;
    }

    (elements, consumed)
}

/// Wraps and centres a bold header block, returning the height used.
fn centered_block(
    elements: &mut Vec<Element>,
    text: &str,
    style: FontStyle,
    initial_pt: f32,
    x: f32,
    y: f32,
    width: f32,
) -> f32 {
    let (lines, size) = wrap_and_fit(text, style, width, initial_pt);
    let row_height = line_height_mm(size);
    let mut used = 0.0;
    for line in lines {
        let line_width = text_width_mm(&line, style, size);
        elements.push(Element::Text {
            x: x + (width - line_width) / 2.0,
            baseline: y + used + row_height / 2.0 + 0.3 * pt_to_mm(size),
            size_pt: size,
            style,
            text: line,
        });
        used += row_height;
    }
    used
}

/// Dashed crop marks on each corner, outside the content area.
fn add_crop_marks(elements: &mut Vec<Element>) {
    let corners = [
        (0.0, 0.0, -1.0, -1.0),
        (STRIP_WIDTH, 0.0, 1.0, -1.0),
        (0.0, STRIP_HEIGHT, -1.0, 1.0),
        (STRIP_WIDTH, STRIP_HEIGHT, 1.0, 1.0),
    ];
    for (x, y, dir_x, dir_y) in corners {
        elements.push(Element::Line {
            x1: x,
            y1: y,
            x2: x + dir_x * CROP_WING,
            y2: y,
            dashed: true,
        });
        elements.push(Element::Line {
            x1: x,
            y1: y,
            x2: x,
            y2: y + dir_y * CROP_WING,
            dashed: true,
        });
    }
}

/// Millimetre ruler for print calibration; printers and drivers resize
/// output to be helpful, and the strip must come out at true size.
fn draw_ruler(elements: &mut Vec<Element>, x: f32, y: f32, width: f32) {
    elements.push(Element::Line {
        x1: x,
        y1: y,
        x2: x + width,
        y2: y,
        dashed: false,
    });
    let mut mm = 0.0;
    while mm <= width {
        let tick = if (mm as u32) % 10 == 0 { 3.0 } else { 1.0 };
        elements.push(Element::Line {
            x1: x + mm,
            y1: y,
            x2: x + mm,
            y2: y + tick,
            dashed: false,
        });
        mm += 1.0;
    }
}

fn translate(element: Element, dx: f32, dy: f32) -> Element {
    match element {
        Element::Text {
            x,
            baseline,
            size_pt,
            style,
            text,
        } => Element::Text {
            x: x + dx,
            baseline: baseline + dy,
            size_pt,
            style,
            text,
        },
        Element::Rect { x, y, w, h, color } => Element::Rect {
            x: x + dx,
            y: y + dy,
            w,
            h,
            color,
        },
        Element::Line {
            x1,
            y1,
            x2,
            y2,
            dashed,
        } => Element::Line {
            x1: x1 + dx,
            y1: y1 + dy,
            x2: x2 + dx,
            y2: y2 + dy,
            dashed,
        },
        Element::Image { x, y, w, h } => Element::Image {
            x: x + dx,
            y: y + dy,
            w,
            h,
        },
    }
}
