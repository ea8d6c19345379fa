//! Responsive image attributes (`srcset`, `sizes`, fallback URL) for the
//! containers the gallery renders photos into.

use crate::services::manifest_builder::Variant;

const DEFAULT_QUALITY: u8 = 85;
const DEFAULT_FORMAT: &str = "webp";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Hero,
    Gallery,
    Category,
    Lightbox,
}

/// Width ladder and layout hints for one container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub widths: &'static [u32],
    pub sizes: &'static str,
    /// Height over width, as `(numerator, denominator)`; `None` keeps the
    /// image's own ratio.
    pub aspect: Option<(u32, u32)>,
}

impl Container {
    pub fn dimensions(self) -> Dimensions {
        match self {
            Container::Hero => Dimensions {
                widths: &[1280, 1920, 2560, 3200],
                sizes: "100vw",
                aspect: Some((9, 16)),
            },
            Container::Gallery => Dimensions {
                widths: &[640, 1280, 1920],
                sizes: "(max-width: 640px) 100vw, 50vw",
                aspect: Some((4, 3)),
            },
            Container::Category => Dimensions {
                widths: &[640, 1280, 1920],
                sizes: "(max-width: 640px) 100vw, (max-width: 1024px) 50vw, 33vw",
                aspect: Some((3, 4)),
            },
            Container::Lightbox => Dimensions {
                widths: &[1280, 1920, 2560, 3200],
                sizes: "90vw",
                aspect: None,
            },
        }
    }
}

/// Attributes for a `<picture>`/`<img>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PictureProps {
    pub srcset: String,
    pub sizes: String,
    pub fallback_url: String,
    pub width: u32,
    pub height: u32,
}

/// Build picture attributes for `base_url` inside `container`.
///
/// The fallback uses the middle rung of the width ladder.
pub fn picture_props(base_url: &str, container: Container) -> PictureProps {
    let dims = container.dimensions();
    let variants: Vec<(u32, String)> = dims
        .widths
        .iter()
        .map(|&w| {
            let url = Variant::new(w, DEFAULT_QUALITY, DEFAULT_FORMAT).apply(base_url);
            (w, url)
        })
        .collect();

    let srcset = variants
        .iter()
        .map(|(w, url)| format!("{url} {w}w"))
        .collect::<Vec<_>>()
        .join(", ");

    let (width, fallback_url) = variants[variants.len() / 2].clone();
    let height = match dims.aspect {
        Some((num, den)) => width * num / den,
        None => width,
    };

    PictureProps {
        srcset,
        sizes: format!(
            "(max-width: 640px) 100vw, (max-width: 1024px) 100vw, {}",
            dims.sizes
        ),
        fallback_url,
        width,
        height,
    }
}
