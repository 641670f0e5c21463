/*
 *  geometry.rs
 *
 *  SevSegS - scales and tails
 *  (c) 2020-26 Stuart Hunter
 *
 *  Segment and dot geometry derived from a handful of size parameters
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

use crate::config::SizeConfig;

/// A segment polygon is a hexagon: a bar with 45°-beveled ends. The six
/// vertex offsets are parameterized only by the segment's width and height;
/// the horizontal shape is the transpose of the vertical one.
pub type PolygonShifts = [(f64, f64); 6];

/// Sizes derived once from the configuration. Immutable after construction;
/// everything the display lays out is a combination of these.
///
/// Callers must hand in positive, finite size parameters — `SizeConfig` is
/// validated before it gets here, and non-positive inputs would produce
/// degenerate polygons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedSizes {
    /// Dot radius (decimal points and separator dots).
    pub radius: f64,
    /// Diagonal clearance between two beveled segment ends.
    pub gap: f64,
    /// `gap` projected back onto an axis (the 45° bevel runs at √2).
    pub gap_h: f64,
    /// Width of one digit cell, decimal point footprint included.
    pub digit_width: f64,
    /// Height of one digit cell; also the canvas height.
    pub digit_height: f64,
    /// Horizontal footprint reserved for one separator dot pair.
    pub dots_place: f64,
    /// Full canvas width for the configured digit count.
    pub width: f64,
    /// Full canvas height.
    pub height: f64,
}

impl DerivedSizes {
    /// Derive the layout for a display of `digits_count` digits.
    pub fn for_display(size: &SizeConfig, digits_count: u8, show_dp: bool, show_dots: bool) -> Self {
        let s_w = size.segment_width;
        let s_h = size.segment_height;

        let radius = size.radius.unwrap_or(s_w / 2.0);

        let gap = s_w / 2.0 * std::f64::consts::SQRT_2 / 4.0;
        let gap_h = gap / std::f64::consts::SQRT_2;

        let dp_extra = if show_dp { s_w } else { 0.0 };
        let digit_width = s_w + 2.0 * gap_h + s_h + dp_extra;
        let digit_height = s_w + 4.0 * gap_h + 2.0 * s_h;

        let dots_place = size.margin + s_w + dp_extra;

        let margins_count = f64::from(digits_count.saturating_sub(1));
        let dots_count = f64::from(separator_count(digits_count));
        let width = f64::from(digits_count) * digit_width
            + size.margin * margins_count
            + if show_dots { dots_place * dots_count } else { 0.0 };

        DerivedSizes {
            radius,
            gap,
            gap_h,
            digit_width,
            digit_height,
            dots_place,
            width,
            height: digit_height,
        }
    }
}

/// Vertex offsets for a vertical segment (b, c, e, f): `s_w` wide,
/// `s_h` tall, both ends beveled at 45°.
pub fn vertical_shifts(s_w: f64, s_h: f64) -> PolygonShifts {
    let p = s_w / 2.0;
    [
        (p, 0.0),
        (s_w, p),
        (s_w, s_h - p),
        (p, s_h),
        (0.0, s_h - p),
        (0.0, p),
    ]
}

/// Vertex offsets for a horizontal segment (a, d, g): the transposed dual,
/// `s_h` wide and `s_w` tall.
pub fn horizontal_shifts(s_w: f64, s_h: f64) -> PolygonShifts {
    let p = s_w / 2.0;
    [
        (0.0, p),
        (p, 0.0),
        (s_h - p, 0.0),
        (s_h, p),
        (s_h - p, s_w),
        (p, s_w),
    ]
}

/// Whether a segment number (1..=7, a..g) is one of the horizontal bars.
#[inline]
pub fn segment_is_horizontal(segment: u8) -> bool {
    matches!(segment, 1 | 4 | 7)
}

/// Top-left origin of each segment polygon inside a digit cell, in a..g
/// order. Offsets combine the bevel compensation (`s_w/2 + gap_h`) so that
/// adjacent segment ends meet visually without overlapping.
pub fn segment_origins(sizes: &DerivedSizes, size: &SizeConfig) -> [(f64, f64); 7] {
    let s_w = size.segment_width;
    let s_h = size.segment_height;
    let gap_h = sizes.gap_h;
    let shift = s_w / 2.0 + gap_h;

    [
        (shift, 0.0),                                 // a: top center
        (s_h + gap_h * 2.0, shift),                   // b: upper right
        (s_h + gap_h * 2.0, shift + s_h + 2.0 * gap_h), // c: lower right
        (shift, sizes.digit_height - s_w),            // d: bottom center
        (0.0, shift + s_h + 2.0 * gap_h),             // e: lower left
        (0.0, shift),                                 // f: upper left
        (shift, s_h + 2.0 * gap_h),                   // g: middle
    ]
}

/// Center of a digit's decimal point dot, relative to the digit origin.
pub fn dp_center(sizes: &DerivedSizes) -> (f64, f64) {
    (
        sizes.digit_width - sizes.radius,
        sizes.digit_height - sizes.radius,
    )
}

/// Centers of a separator pair whose slot starts at `x`. The dots sit a
/// radius in from the slot edge, mirrored about the vertical center.
pub fn separator_centers(sizes: &DerivedSizes, x: f64, s_h: f64) -> ((f64, f64), (f64, f64)) {
    let cx = x + sizes.radius;
    let shift = s_h - sizes.radius;
    ((cx, shift), (cx, sizes.digit_height - shift))
}

/// Number of separator pairs a display of `digits_count` digits carries
/// when separators are enabled.
#[inline]
pub fn separator_count(digits_count: u8) -> u8 {
    digits_count.div_ceil(2).saturating_sub(1)
}

/// Whether a separator pair sits after digit `index` (0-based, counting
/// from the left). Pairs split off two-digit groups from the right, the
/// classic `HH:MM:SS` arrangement, and never trail the leftmost digit
/// alone or the last digit.
#[inline]
pub fn separator_after(digits_count: u8, index: u8) -> bool {
    let remaining = digits_count - index;
    remaining % 2 == 1 && remaining > 2
}
