/*
 *  canvas/svg.rs
 *
 *  SevSegS - scales and tails
 *  (c) 2020-26 Stuart Hunter
 *
 *  Retained SVG scene backend
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

use std::fmt::Write as _;

use log::trace;

use crate::canvas::{Canvas, ShapeId};

const XMLNS: &str = "http://www.w3.org/2000/svg";

#[derive(Debug, Clone)]
enum Shape {
    Polygon { points: Vec<(f64, f64)>, fill: String },
    Circle { cx: f64, cy: f64, r: f64, fill: String },
    Label { x: f64, y: f64, text: String, small: bool },
}

/// Canvas backend that retains the scene and serializes it to an SVG
/// document on demand. The scene is rebuilt into a fresh string on every
/// [`SvgCanvas::to_svg`] call, so re-filled shapes show their current
/// color.
#[derive(Debug, Clone, Default)]
pub struct SvgCanvas {
    viewbox: Option<(f64, f64)>,
    element_size: Option<(f64, f64)>,
    shapes: Vec<Shape>,
}

impl SvgCanvas {
    pub fn new() -> Self {
        SvgCanvas::default()
    }

    /// Fix the rendered element size independently of the viewBox, like
    /// handing the engine a pre-sized host element.
    pub fn with_element_size(width: Option<f64>, height: Option<f64>) -> Self {
        let element_size = match (width, height) {
            (Some(w), Some(h)) => Some((w, h)),
            _ => None,
        };
        SvgCanvas { element_size, ..SvgCanvas::default() }
    }

    /// Number of shapes created so far (labels included).
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Current fill of a shape, for inspection. Labels have no fill.
    pub fn fill_of(&self, shape: ShapeId) -> Option<&str> {
        match self.shapes.get(shape.0) {
            Some(Shape::Polygon { fill, .. }) | Some(Shape::Circle { fill, .. }) => {
                Some(fill.as_str())
            }
            _ => None,
        }
    }

    /// Serialize the scene to an SVG document.
    pub fn to_svg(&self) -> String {
        let (vw, vh) = self.viewbox.unwrap_or((0.0, 0.0));
        let (ew, eh) = self.element_size.unwrap_or((vw, vh));

        let mut out = String::with_capacity(256 + self.shapes.len() * 96);
        let _ = write!(
            out,
            "<svg xmlns=\"{XMLNS}\" viewBox=\"0 0 {} {}\" width=\"{}\" height=\"{}\">",
            fmt_num(vw),
            fmt_num(vh),
            fmt_num(ew),
            fmt_num(eh),
        );

        for shape in &self.shapes {
            match shape {
                Shape::Polygon { points, fill } => {
                    let _ = write!(out, "<polygon points=\"");
                    for (i, (x, y)) in points.iter().enumerate() {
                        if i > 0 {
                            out.push(' ');
                        }
                        let _ = write!(out, "{},{}", fmt_num(*x), fmt_num(*y));
                    }
                    let _ = write!(out, "\" fill=\"{}\"/>", escape(fill));
                }
                Shape::Circle { cx, cy, r, fill } => {
                    let _ = write!(
                        out,
                        "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\"/>",
                        fmt_num(*cx),
                        fmt_num(*cy),
                        fmt_num(*r),
                        escape(fill),
                    );
                }
                Shape::Label { x, y, text, small } => {
                    let class = if *small { " class=\"small\"" } else { "" };
                    let _ = write!(
                        out,
                        "<text x=\"{}\" y=\"{}\"{class}>{}</text>",
                        fmt_num(*x),
                        fmt_num(*y),
                        escape(text),
                    );
                }
            }
        }

        out.push_str("</svg>");
        out
    }
}

impl Canvas for SvgCanvas {
    fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewbox = Some((width, height));
    }

    fn create_polygon(&mut self, points: &[(f64, f64)], fill: &str) -> ShapeId {
        self.shapes.push(Shape::Polygon {
            points: points.to_vec(),
            fill: fill.to_string(),
        });
        ShapeId(self.shapes.len() - 1)
    }

    fn create_circle(&mut self, cx: f64, cy: f64, r: f64, fill: &str) -> ShapeId {
        self.shapes.push(Shape::Circle {
            cx,
            cy,
            r,
            fill: fill.to_string(),
        });
        ShapeId(self.shapes.len() - 1)
    }

    fn set_fill(&mut self, shape: ShapeId, fill: &str) {
        match self.shapes.get_mut(shape.0) {
            Some(Shape::Polygon { fill: f, .. }) | Some(Shape::Circle { fill: f, .. }) => {
                f.clear();
                f.push_str(fill);
            }
            _ => trace!("set_fill on unknown shape {:?}", shape),
        }
    }

    fn create_label(&mut self, x: f64, y: f64, text: &str, small: bool) {
        self.shapes.push(Shape::Label {
            x,
            y,
            text: text.to_string(),
            small,
        });
    }
}

/// Shortest representation of a coordinate: "16" not "16.0", "2.5" as-is.
fn fmt_num(v: f64) -> String {
    format!("{v}")
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_shell() {
        let mut canvas = SvgCanvas::new();
        canvas.set_viewport(100.0, 50.0);
        let svg = canvas.to_svg();
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(svg.contains("viewBox=\"0 0 100 50\""));
        assert!(svg.contains("width=\"100\" height=\"50\""));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn test_element_size_override() {
        let mut canvas = SvgCanvas::with_element_size(Some(320.0), Some(160.0));
        canvas.set_viewport(100.0, 50.0);
        let svg = canvas.to_svg();
        assert!(svg.contains("viewBox=\"0 0 100 50\""));
        assert!(svg.contains("width=\"320\" height=\"160\""));
    }

    #[test]
    fn test_refill_shows_in_output() {
        let mut canvas = SvgCanvas::new();
        canvas.set_viewport(10.0, 10.0);
        let id = canvas.create_polygon(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)], "lightgray");
        assert_eq!(canvas.fill_of(id), Some("lightgray"));

        canvas.set_fill(id, "red");
        assert_eq!(canvas.fill_of(id), Some("red"));
        assert!(canvas.to_svg().contains("fill=\"red\""));
        assert!(!canvas.to_svg().contains("fill=\"lightgray\""));
    }

    #[test]
    fn test_stale_handle_is_ignored() {
        let mut canvas = SvgCanvas::new();
        canvas.set_fill(ShapeId(42), "red");
        assert_eq!(canvas.shape_count(), 0);
    }

    #[test]
    fn test_circle_and_label_markup() {
        let mut canvas = SvgCanvas::new();
        canvas.set_viewport(10.0, 10.0);
        canvas.create_circle(2.5, 3.0, 1.25, "blue");
        canvas.create_label(1.0, 2.0, "a", true);
        let svg = canvas.to_svg();
        assert!(svg.contains("<circle cx=\"2.5\" cy=\"3\" r=\"1.25\" fill=\"blue\"/>"));
        assert!(svg.contains("<text x=\"1\" y=\"2\" class=\"small\">a</text>"));
    }
}
