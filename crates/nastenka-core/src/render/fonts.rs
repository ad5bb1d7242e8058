//! Font faces used to draw the board.

use std::fmt;
use std::path::Path;

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use imageproc::drawing::text_size;

use crate::error::RenderError;

/// Regular face plus an optional true bold face.
///
/// Without a bold face, bold text is synthesised by striking the regular
/// face twice, one pixel apart; [`FontSet::measure`] accounts for that pixel.
#[derive(Clone)]
pub struct FontSet {
    regular: FontArc,
    bold: Option<FontArc>,
}

/// Weight requested for a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Regular,
    Bold,
}

impl fmt::Debug for FontSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontSet")
            .field("bold", &if self.bold.is_some() { "face" } else { "synthetic" })
            .finish()
    }
}

impl FontSet {
    /// The sans face bundled with the binary (Ubuntu Light).
    pub fn embedded() -> Result<Self, RenderError> {
        let regular = FontArc::try_from_slice(epaint_default_fonts::UBUNTU_LIGHT)
            .map_err(|e| RenderError::Font(format!("embedded font: {e}")))?;
        Ok(Self { regular, bold: None })
    }

    /// Load faces from disk, falling back to the embedded face when
    /// `regular` is `None`.
    pub fn load(regular: Option<&Path>, bold: Option<&Path>) -> Result<Self, RenderError> {
        let mut set = match regular {
            Some(path) => Self {
                regular: read_font(path)?,
                bold: None,
            },
            None => Self::embedded()?,
        };
        if let Some(path) = bold {
            set.bold = Some(read_font(path)?);
        }
        Ok(set)
    }

    /// `true` when bold text is drawn by double-striking the regular face.
    pub fn synthetic_bold(&self) -> bool {
        self.bold.is_none()
    }

    pub(crate) fn face(&self, weight: Weight) -> &FontArc {
        match (weight, &self.bold) {
            (Weight::Bold, Some(bold)) => bold,
            _ => &self.regular,
        }
    }

    /// Number of extra strikes to the right used to fake a bold weight.
    pub(crate) fn extra_strikes(&self, weight: Weight) -> u32 {
        match weight {
            Weight::Bold if self.synthetic_bold() => 1,
            _ => 0,
        }
    }

    /// Rendered pixel width of `text`, using the glyph advances and kerning
    /// of the face that will draw it.
    pub fn measure(&self, text: &str, size: f32, weight: Weight) -> u32 {
        let (width, _) = text_size(PxScale::from(size), self.face(weight), text);
        width + self.extra_strikes(weight)
    }

    /// Distance from the top of a line box to its baseline, in whole pixels.
    pub(crate) fn ascent(&self, size: f32, weight: Weight) -> i32 {
        self.face(weight).as_scaled(PxScale::from(size)).ascent().round() as i32
    }
}

fn read_font(path: &Path) -> Result<FontArc, RenderError> {
    let bytes = std::fs::read(path)
        .map_err(|e| RenderError::Font(format!("{}: {e}", path.display())))?;
    FontArc::try_from_vec(bytes).map_err(|e| RenderError::Font(format!("{}: {e}", path.display())))
}
