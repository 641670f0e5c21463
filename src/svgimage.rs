//! Module for rasterizing the generated SVG document.
//!
//! This module uses `usvg` for SVG parsing and `resvg` for rendering.
//! Output goes to a PNG file or to a 1-bit per pixel monochrome bitmap,
//! the latter feeding the terminal preview and the integration tests.

use resvg::render;
use tiny_skia::Pixmap;
use usvg::{Options as UsvgOptions, Transform, Tree};

use log::{debug, error};
use std::error::Error;
use std::fmt;
use std::path::Path;

/// Custom error type for SVG rasterizing operations.
#[derive(Debug)]
pub enum SvgImageError {
    /// Error parsing the SVG data.
    SvgParseError(String),
    /// Error creating a pixmap for rendering.
    PixmapCreationError(String),
    /// The provided buffer is too small for the target image size.
    BufferTooSmall,
    /// Error encoding or writing the PNG.
    PngError(String),
}

impl fmt::Display for SvgImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SvgImageError::SvgParseError(msg) => write!(f, "SVG parse error: {}", msg),
            SvgImageError::PixmapCreationError(msg) => write!(f, "Pixmap creation error: {}", msg),
            SvgImageError::BufferTooSmall => write!(f, "Provided buffer is too small for SVG rendering."),
            SvgImageError::PngError(msg) => write!(f, "PNG error: {}", msg),
        }
    }
}

impl Error for SvgImageError {}

/// Rasterizes SVG data at a fixed target size.
#[derive(Debug)]
pub struct SvgImageRenderer {
    tree: Tree,
    target_width: u32,
    target_height: u32,
}

impl SvgImageRenderer {
    /// Creates a new `SvgImageRenderer` from SVG string data and target
    /// dimensions. The SVG is scaled to fit `target_width` and
    /// `target_height`.
    pub fn new(svg_data: &str, target_width: u32, target_height: u32) -> Result<Self, SvgImageError> {
        let usvg_options = UsvgOptions::default();
        let tree = Tree::from_str(svg_data, &usvg_options)
            .map_err(|e| SvgImageError::SvgParseError(format!("Failed to parse SVG: {:?}", e)))?;
        Ok(SvgImageRenderer {
            tree,
            target_width,
            target_height,
        })
    }

    /// Renders the SVG into a fresh RGBA pixmap.
    pub fn render_to_pixmap(&self) -> Result<Pixmap, SvgImageError> {
        let mut pixmap = Pixmap::new(self.target_width, self.target_height)
            .ok_or_else(|| SvgImageError::PixmapCreationError("Failed to create pixmap".to_string()))?;

        // Scale from the document's intrinsic size; the scene starts at
        // the origin so a plain scale transform is sufficient.
        let svg_size = self.tree.size();
        let scale_x = self.target_width as f32 / svg_size.width();
        let scale_y = self.target_height as f32 / svg_size.height();
        let transform = Transform::from_scale(scale_x, scale_y);

        render(&self.tree, transform, &mut pixmap.as_mut());
        Ok(pixmap)
    }

    /// Renders and writes a PNG.
    pub fn save_png(&self, path: &Path) -> Result<(), SvgImageError> {
        let pixmap = self.render_to_pixmap()?;
        pixmap
            .save_png(path)
            .map_err(|e| SvgImageError::PngError(format!("{e}")))?;
        debug!("PNG written to {}", path.display());
        Ok(())
    }

    /// Renders the SVG to a mutable byte slice, converting it to a 1-bit
    /// monochrome format. The `buffer` must hold at least
    /// `target_height * ceil(target_width / 8)` bytes. Each bit represents
    /// a pixel, row-major, MSB-first within each byte; a pixel is set when
    /// it is bright and opaque enough.
    pub fn render_to_buffer(&self, buffer: &mut [u8]) -> Result<(), SvgImageError> {
        let padded_width = self.target_width.div_ceil(8);
        let buffer_len_needed = self.target_height as usize * padded_width as usize;
        if buffer.len() < buffer_len_needed {
            error!(
                "Buffer too small. Needed: {} bytes, Got: {} bytes",
                buffer_len_needed,
                buffer.len()
            );
            return Err(SvgImageError::BufferTooSmall);
        }

        // Clear the buffer to ensure all bits are initially off
        buffer.fill(0);

        let pixmap = self.render_to_pixmap()?;

        let threshold = 128.0;
        pixmap
            .pixels()
            .chunks(self.target_width as usize)
            .take(self.target_height as usize)
            .enumerate()
            .for_each(|(y, row)| {
                row.iter().enumerate().for_each(|(x, p)| {
                    let luminance =
                        0.299 * p.red() as f32 + 0.587 * p.green() as f32 + 0.114 * p.blue() as f32;
                    if luminance > threshold && f32::from(p.alpha()) > threshold {
                        let byte_idx = y * padded_width as usize + (x / 8);
                        let bit_idx = x % 8;
                        buffer[byte_idx] |= 1 << (7 - bit_idx);
                    }
                });
            });

        debug!("SVG rendered to buffer successfully.");
        Ok(())
    }

    pub fn target_width(&self) -> u32 {
        self.target_width
    }

    pub fn target_height(&self) -> u32 {
        self.target_height
    }
}
