/*
 *  canvas/mod.rs
 *
 *  SevSegS - scales and tails
 *  (c) 2020-26 Stuart Hunter
 *
 *  Drawing surface abstraction - the display engine draws through this seam
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

// Concrete backends
pub mod svg;
pub mod mock;

// Re-exports for convenience
pub use svg::SvgCanvas;
pub use mock::{MockCanvas, MockCanvasState};

/// Handle to a shape created on a canvas. Only meaningful to the canvas
/// that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeId(pub(crate) usize);

impl ShapeId {
    /// Index into the issuing canvas's shape list.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Minimal retained-scene surface every backend must provide.
///
/// Shapes are created once during layout and only ever re-filled
/// afterwards, so the trait is deliberately small: group/primitive
/// creation, a fill setter, and the viewport. Drawing calls are
/// infallible; a backend handed a stale [`ShapeId`] ignores it.
pub trait Canvas {
    /// Set the drawing-space size (and, for document backends, the
    /// element size when no explicit override is configured).
    fn set_viewport(&mut self, width: f64, height: f64);

    /// Create a filled polygon from absolute vertex coordinates.
    fn create_polygon(&mut self, points: &[(f64, f64)], fill: &str) -> ShapeId;

    /// Create a filled circle.
    fn create_circle(&mut self, cx: f64, cy: f64, r: f64, fill: &str) -> ShapeId;

    /// Re-fill an existing shape.
    fn set_fill(&mut self, shape: ShapeId, fill: &str);

    /// Optional debug label; backends without text support ignore it.
    fn create_label(&mut self, _x: f64, _y: f64, _text: &str, _small: bool) {}
}
