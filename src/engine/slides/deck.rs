//! In-memory slide decks.

use crate::engine::outcome::ToolError;
use crate::error_ext::ToToolError;
use image::{ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Picture formats accepted on image slides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Tiff,
}

impl ImageKind {
    fn from_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Png => Some(Self::Png),
            ImageFormat::Jpeg => Some(Self::Jpeg),
            ImageFormat::Gif => Some(Self::Gif),
            ImageFormat::Bmp => Some(Self::Bmp),
            ImageFormat::Tiff => Some(Self::Tiff),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
        }
    }
}

/// An image captured when its slide was added; later changes to the source
/// file do not affect the deck.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedImage {
    pub source: PathBuf,
    pub kind: ImageKind,
    pub width_px: u32,
    pub height_px: u32,
    pub bytes: Vec<u8>,
}

impl EmbeddedImage {
    pub fn load(path: &Path) -> Result<Self, ToolError> {
        if !path.exists() {
            return Err(ToolError::MissingFile(path.to_path_buf()));
        }
        let bytes = std::fs::read(path).tool_err("Failed to read image")?;
        let unsupported = || ToolError::UnsupportedFormat(path.display().to_string());

        let format = image::guess_format(&bytes).map_err(|_| unsupported())?;
        let kind = ImageKind::from_format(format).ok_or_else(unsupported)?;
        let (width_px, height_px) = ImageReader::with_format(Cursor::new(&bytes), format)
            .into_dimensions()
            .map_err(|e| ToolError::failed("Failed to decode image", e))?;
        if width_px == 0 || height_px == 0 {
            return Err(ToolError::failed("Failed to decode image", "image has no pixels"));
        }

        Ok(Self {
            source: path.to_path_buf(),
            kind,
            width_px,
            height_px,
            bytes,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Slide {
    Title {
        title: String,
        subtitle: Option<String>,
    },
    Content {
        title: String,
        bullets: Vec<String>,
    },
    Image {
        title: String,
        image: EmbeddedImage,
        caption: Option<String>,
    },
}

impl Slide {
    pub fn title(&self) -> &str {
        match self {
            Self::Title { title, .. } | Self::Content { title, .. } | Self::Image { title, .. } => {
                title
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Title { .. } => "title",
            Self::Content { .. } => "content",
            Self::Image { .. } => "image",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Deck {
    title: String,
    slides: Vec<Slide>,
}

impl Deck {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slides: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn push(&mut self, slide: Slide) {
        self.slides.push(slide);
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Images in slide order, each paired with its 1-based media index.
    pub fn images(&self) -> impl Iterator<Item = (usize, &EmbeddedImage)> {
        self.slides
            .iter()
            .filter_map(|slide| match slide {
                Slide::Image { image, .. } => Some(image),
                _ => None,
            })
            .enumerate()
            .map(|(i, image)| (i + 1, image))
    }
}
