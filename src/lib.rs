/*
 *  lib.rs
 *
 *  SevSegS - scales and tails
 *  (c) 2020-26 Stuart Hunter
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

//! A seven-segment digital display rendered as SVG, and a snake that
//! crawls across the segments while the display idles.
//!
//! The display engine builds its topology once from a [`config::DisplayConfig`]
//! and afterwards only re-fills shapes; everything it draws goes through
//! the [`canvas::Canvas`] seam, so the same engine runs against the SVG
//! backend, the recording mock, or anything else that can hold polygons
//! and circles.

pub mod canvas;
pub mod config;
pub mod display;
pub mod geometry;
pub mod glyphs;
pub mod snake;

// SVG rasterizing (optional, for previews)
#[cfg(feature = "raster")]
pub mod svgimage;

// Re-exports for convenience
pub use canvas::{Canvas, MockCanvas, ShapeId, SvgCanvas};
pub use config::{ColorConfig, ConfigError, DisplayConfig, Settings, SizeConfig};
pub use display::{DisplayError, SegmentDisplay};
pub use snake::{Heading, Snake, SnakePos};

#[cfg(feature = "raster")]
pub use svgimage::{SvgImageError, SvgImageRenderer};
