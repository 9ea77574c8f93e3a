//! PDF emission with `lopdf`.
//!
//! Consumes a [`LabelLayout`] and writes an A4 portrait document using the
//! base-14 Type1 Helvetica faces with WinAnsiEncoding. Layout coordinates
//! are millimetres from the top-left; PDF wants points from the
//! bottom-left, so everything is converted and flipped here and nowhere
//! else.

use crate::core::layout::{Element, LabelLayout, Page, PAGE_HEIGHT, PAGE_WIDTH};
use crate::core::metrics::{encode_win_ansi, mm_to_pt, FontStyle};
use crate::domain::model::Artwork;
use crate::utils::error::Result;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};

const FONT_REGULAR: &str = "F1";
const FONT_BOLD: &str = "F2";
const ART_XOBJECT: &str = "Im1";

/// Line width for crop marks and rules, the 0.2 mm hairline the label
/// was designed around.
const LINE_WIDTH_PT: f32 = 0.2 / 25.4 * 72.0;

pub fn render_pdf(layout: &LabelLayout, artwork: Option<&Artwork>) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut resources = dictionary! {
        "Font" => dictionary! {
            FONT_REGULAR => regular_id,
            FONT_BOLD => bold_id,
        },
    };

    if let Some(art) = artwork {
        let image = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => art.width as i64,
                "Height" => art.height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            art.jpeg.clone(),
        );
        let image_id = doc.add_object(image);
        resources.set("XObject", dictionary! { ART_XOBJECT => image_id });
    }
    let resources_id = doc.add_object(resources);

    let mut page_ids = Vec::new();
    for page in &layout.pages {
        let content = page_content(page);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                mm_to_pt(PAGE_WIDTH).into(),
                mm_to_pt(PAGE_HEIGHT).into(),
            ],
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        page_ids.push(page_id);
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| Object::Reference(*id)).collect();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_ids.len() as i64,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(buffer)
}

fn x_pt(mm: f32) -> f32 {
    mm_to_pt(mm)
}

fn y_pt(mm: f32) -> f32 {
    mm_to_pt(PAGE_HEIGHT - mm)
}

fn page_content(page: &Page) -> Content {
    let mut ops = vec![
        Operation::new("w", vec![LINE_WIDTH_PT.into()]),
        // All strokes and text are black unless an element says otherwise.
        Operation::new("RG", vec![0.into(), 0.into(), 0.into()]),
        Operation::new("rg", vec![0.into(), 0.into(), 0.into()]),
    ];

    for element in &page.elements {
        match element {
            Element::Rect { x, y, w, h, color } => {
                let (r, g, b) = *color;
                ops.push(Operation::new(
                    "rg",
                    vec![
                        (r as f32 / 255.0).into(),
                        (g as f32 / 255.0).into(),
                        (b as f32 / 255.0).into(),
                    ],
                ));
                ops.push(Operation::new(
                    "re",
                    vec![
                        x_pt(*x).into(),
                        y_pt(*y + *h).into(),
                        mm_to_pt(*w).into(),
                        mm_to_pt(*h).into(),
                    ],
                ));
                ops.push(Operation::new("f", vec![]));
                ops.push(Operation::new("rg", vec![0.into(), 0.into(), 0.into()]));
            }
            Element::Line {
                x1,
                y1,
                x2,
                y2,
                dashed,
            } => {
                if *dashed {
                    ops.push(Operation::new(
                        "d",
                        vec![vec![2.into(), 2.into()].into(), 0.into()],
                    ));
                }
                ops.push(Operation::new("m", vec![x_pt(*x1).into(), y_pt(*y1).into()]));
                ops.push(Operation::new("l", vec![x_pt(*x2).into(), y_pt(*y2).into()]));
                ops.push(Operation::new("S", vec![]));
                if *dashed {
                    ops.push(Operation::new("d", vec![Vec::<Object>::new().into(), 0.into()]));
                }
            }
            Element::Text {
                x,
                baseline,
                size_pt,
                style,
                text,
            } => {
                let font = match style {
                    FontStyle::Regular => FONT_REGULAR,
                    FontStyle::Bold => FONT_BOLD,
                };
                ops.push(Operation::new("BT", vec![]));
                ops.push(Operation::new("Tf", vec![font.into(), (*size_pt).into()]));
                ops.push(Operation::new(
                    "Td",
                    vec![x_pt(*x).into(), y_pt(*baseline).into()],
                ));
                ops.push(Operation::new(
                    "Tj",
                    vec![Object::String(
                        encode_win_ansi(text),
                        StringFormat::Literal,
                    )],
                ));
                ops.push(Operation::new("ET", vec![]));
            }
            Element::Image { x, y, w, h } => {
                ops.push(Operation::new("q", vec![]));
                ops.push(Operation::new(
                    "cm",
                    vec![
                        mm_to_pt(*w).into(),
                        0.into(),
                        0.into(),
                        mm_to_pt(*h).into(),
                        x_pt(*x).into(),
                        y_pt(*y + *h).into(),
                    ],
                ));
                ops.push(Operation::new("Do", vec![ART_XOBJECT.into()]));
                ops.push(Operation::new("Q", vec![]));
            }
        }
    }

    Content { operations: ops }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::layout::LabelLayout;

    #[test]
    fn renders_a_parseable_empty_document() {
        let layout = LabelLayout {
            pages: vec![Page::default()],
        };
        let bytes = render_pdf(&layout, None).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.7"));
        assert!(Document::load_mem(&bytes).is_ok());
    }

    #[test]
    fn text_elements_land_in_the_content_stream() {
        let layout = LabelLayout {
            pages: vec![Page {
                elements: vec![Element::Text {
                    x: 10.0,
                    baseline: 20.0,
                    size_pt: 12.0,
                    style: FontStyle::Bold,
                    text: "Blizzard Of Ozz".into(),
                }],
            }],
        };
        let bytes = render_pdf(&layout, None).unwrap();
        let haystack = String::from_utf8_lossy(&bytes);
        assert!(haystack.contains("Blizzard Of Ozz"));
    }

    #[test]
    fn artwork_becomes_an_image_xobject() {
        let layout = LabelLayout {
            pages: vec![Page {
                elements: vec![Element::Image {
                    x: 10.0,
                    y: 10.0,
                    w: 30.0,
                    h: 30.0,
                }],
            }],
        };
        let artwork = Artwork {
            jpeg: vec![0xFF, 0xD8, 0xFF, 0xD9],
            width: 64,
            height: 64,
        };
        let bytes = render_pdf(&layout, Some(&artwork)).unwrap();
        let haystack = String::from_utf8_lossy(&bytes);
        assert!(haystack.contains("DCTDecode"));
        assert!(haystack.contains("/Im1"));
    }
}
