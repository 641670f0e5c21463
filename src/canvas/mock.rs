/*
 *  canvas/mock.rs
 *
 *  SevSegS - scales and tails
 *  (c) 2020-26 Stuart Hunter
 *
 *  Mock canvas backend for testing without a rendering surface
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

use crate::canvas::{Canvas, ShapeId};

/// Shape record kept by the mock backend.
#[derive(Debug, Clone, PartialEq)]
pub enum MockShape {
    Polygon { points: Vec<(f64, f64)> },
    Circle { cx: f64, cy: f64, r: f64 },
}

/// Operation counters for inspection in tests.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MockCanvasState {
    /// Number of polygons created
    pub polygon_count: usize,

    /// Number of circles created
    pub circle_count: usize,

    /// Number of labels created
    pub label_count: usize,

    /// Number of set_fill calls that hit an existing shape
    pub fill_changes: usize,

    /// Number of set_fill calls aimed at a shape that does not exist
    pub stale_fills: usize,

    /// Last viewport set
    pub viewport: Option<(f64, f64)>,
}

/// Canvas backend that records every operation and keeps the current
/// fill per shape. Useful for:
/// - Unit tests
/// - Integration tests
/// - CI pipelines without a rasterizer
#[derive(Debug, Default, Clone)]
pub struct MockCanvas {
    shapes: Vec<(MockShape, String)>,
    state: MockCanvasState,
}

impl MockCanvas {
    pub fn new() -> Self {
        MockCanvas::default()
    }

    /// Counters for inspection in tests.
    pub fn state(&self) -> &MockCanvasState {
        &self.state
    }

    /// Reset counters (useful between test phases); shapes stay.
    pub fn reset_state(&mut self) {
        let viewport = self.state.viewport;
        self.state = MockCanvasState { viewport, ..MockCanvasState::default() };
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// The recorded shape behind a handle.
    pub fn shape(&self, id: ShapeId) -> Option<&MockShape> {
        self.shapes.get(id.0).map(|(s, _)| s)
    }

    /// Current fill of a shape.
    pub fn fill_of(&self, id: ShapeId) -> Option<&str> {
        self.shapes.get(id.0).map(|(_, f)| f.as_str())
    }

    /// Count shapes currently filled with `fill`.
    pub fn count_with_fill(&self, fill: &str) -> usize {
        self.shapes.iter().filter(|(_, f)| f == fill).count()
    }
}

impl Canvas for MockCanvas {
    fn set_viewport(&mut self, width: f64, height: f64) {
        self.state.viewport = Some((width, height));
    }

    fn create_polygon(&mut self, points: &[(f64, f64)], fill: &str) -> ShapeId {
        self.state.polygon_count += 1;
        self.shapes.push((
            MockShape::Polygon { points: points.to_vec() },
            fill.to_string(),
        ));
        ShapeId(self.shapes.len() - 1)
    }

    fn create_circle(&mut self, cx: f64, cy: f64, r: f64, fill: &str) -> ShapeId {
        self.state.circle_count += 1;
        self.shapes.push((MockShape::Circle { cx, cy, r }, fill.to_string()));
        ShapeId(self.shapes.len() - 1)
    }

    fn set_fill(&mut self, shape: ShapeId, fill: &str) {
        match self.shapes.get_mut(shape.0) {
            Some((_, f)) => {
                f.clear();
                f.push_str(fill);
                self.state.fill_changes += 1;
            }
            None => self.state.stale_fills += 1,
        }
    }

    fn create_label(&mut self, _x: f64, _y: f64, _text: &str, _small: bool) {
        self.state.label_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_creation_and_fills() {
        let mut canvas = MockCanvas::new();
        canvas.set_viewport(64.0, 32.0);
        let p = canvas.create_polygon(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)], "lightgray");
        let c = canvas.create_circle(5.0, 5.0, 2.0, "lightgray");

        assert_eq!(canvas.state().polygon_count, 1);
        assert_eq!(canvas.state().circle_count, 1);
        assert_eq!(canvas.state().viewport, Some((64.0, 32.0)));
        assert_eq!(canvas.count_with_fill("lightgray"), 2);

        canvas.set_fill(p, "red");
        assert_eq!(canvas.fill_of(p), Some("red"));
        assert_eq!(canvas.fill_of(c), Some("lightgray"));
        assert_eq!(canvas.state().fill_changes, 1);
    }

    #[test]
    fn test_stale_fill_counted_not_panicking() {
        let mut canvas = MockCanvas::new();
        canvas.set_fill(ShapeId(7), "red");
        assert_eq!(canvas.state().stale_fills, 1);
        assert_eq!(canvas.shape_count(), 0);
    }
}
