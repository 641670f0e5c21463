/*
 *  display/engine.rs
 *
 *  SevSegS - scales and tails
 *  (c) 2020-26 Stuart Hunter
 *
 *  Seven-segment display engine
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

use log::{info, trace};
use thiserror::Error;

use crate::canvas::{Canvas, ShapeId};
use crate::config::{ConfigError, DisplayConfig};
use crate::geometry::{self, DerivedSizes, PolygonShifts};
use crate::glyphs::{self, SEGMENTS_PER_DIGIT};

/// Construction is the engine's only fatal path.
#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
}

/// One digit cell: seven segment polygons plus an optional decimal point.
/// `mask` mirrors the active bits (bit 6 = a .. bit 0 = g) so state can be
/// read back without asking the canvas.
#[derive(Debug)]
struct Digit {
    segments: [ShapeId; 7],
    dp: Option<ShapeId>,
    mask: u8,
    dp_on: bool,
}

/// Separator dot pair between digit groups.
#[derive(Debug)]
struct SeparatorPair {
    after_digit: u8,
    dot_up: ShapeId,
    dot_down: ShapeId,
    up_on: bool,
    down_on: bool,
}

/// The display engine. Owns the canvas, the digit/separator topology and
/// every visual mutation; built once and immutable in shape thereafter.
///
/// All indexing mistakes (digit, segment or separator out of range, slots
/// that are not configured) are silent no-ops by design - animation code
/// gets to be sloppy, the engine never panics for it.
pub struct SegmentDisplay<C: Canvas> {
    canvas: C,
    config: DisplayConfig,
    sizes: DerivedSizes,
    shifts_horizontal: PolygonShifts,
    shifts_vertical: PolygonShifts,
    digits: Vec<Digit>,
    separators: Vec<SeparatorPair>,
}

const SEGMENT_NAMES: [&str; 7] = ["a", "b", "c", "d", "e", "f", "g"];

impl<C: Canvas> SegmentDisplay<C> {
    /// Validate the configuration, size the canvas and build the static
    /// topology: digits left to right, separator pairs interleaved at the
    /// clock-style group boundaries.
    pub fn new(mut canvas: C, config: DisplayConfig) -> Result<Self, DisplayError> {
        config.validate()?;

        let sizes = DerivedSizes::for_display(
            &config.size,
            config.digits_count,
            config.show_dp,
            config.show_dots,
        );
        canvas.set_viewport(sizes.width, sizes.height);

        let s_w = config.size.segment_width;
        let s_h = config.size.segment_height;
        let mut display = SegmentDisplay {
            canvas,
            config,
            sizes,
            shifts_horizontal: geometry::horizontal_shifts(s_w, s_h),
            shifts_vertical: geometry::vertical_shifts(s_w, s_h),
            digits: Vec::new(),
            separators: Vec::new(),
        };
        display.draw();

        info!(
            "display built: {} digit(s), {} separator pair(s), {:.1}x{:.1}",
            display.digits.len(),
            display.separators.len(),
            display.sizes.width,
            display.sizes.height,
        );
        Ok(display)
    }

    fn draw(&mut self) {
        let mut x = 0.0;
        for i in 0..self.config.digits_count {
            let digit = self.make_digit(x, i);
            self.digits.push(digit);
            x += self.sizes.digit_width + self.config.size.margin;

            if self.config.show_dots && geometry::separator_after(self.config.digits_count, i) {
                self.make_separator(x, i);
                x += self.sizes.dots_place;
            }
        }
    }

    fn make_digit(&mut self, x: f64, index: u8) -> Digit {
        let sizes = self.sizes;
        let s_w = self.config.size.segment_width;
        let s_h = self.config.size.segment_height;
        let show_text = self.config.show_text;
        let origins = geometry::segment_origins(&sizes, &self.config.size);

        let mut segments = [ShapeId(0); 7];
        for (i, &(ox, oy)) in origins.iter().enumerate() {
            let number = (i + 1) as u8;
            let horizontal = geometry::segment_is_horizontal(number);
            let shifts = if horizontal {
                self.shifts_horizontal
            } else {
                self.shifts_vertical
            };
            let points: Vec<(f64, f64)> = shifts
                .iter()
                .map(|&(px, py)| (px + x + ox, py + oy))
                .collect();
            segments[i] = self
                .canvas
                .create_polygon(&points, &self.config.colors.normal);

            if show_text {
                let (lx, ly) = if horizontal {
                    (x + ox + s_h / 2.0, oy + s_w / 2.0)
                } else {
                    (x + ox + s_w / 2.0, oy + s_h / 2.0)
                };
                self.canvas.create_label(lx, ly, SEGMENT_NAMES[i], true);
            }
        }

        let dp = if self.config.show_dp {
            let (cx, cy) = geometry::dp_center(&sizes);
            Some(
                self.canvas
                    .create_circle(x + cx, cy, sizes.radius, &self.config.colors.dot),
            )
        } else {
            None
        };

        if show_text {
            let shift = s_w / 2.0 + sizes.gap_h;
            self.canvas
                .create_label(x + shift + s_h / 2.0, shift + s_h / 2.0, &index.to_string(), false);
        }

        Digit { segments, dp, mask: 0, dp_on: false }
    }

    fn make_separator(&mut self, x: f64, after_digit: u8) {
        let ((ux, uy), (dx, dy)) =
            geometry::separator_centers(&self.sizes, x, self.config.size.segment_height);
        let dot_up = self
            .canvas
            .create_circle(ux, uy, self.sizes.radius, &self.config.colors.dot);
        let dot_down = self
            .canvas
            .create_circle(dx, dy, self.sizes.radius, &self.config.colors.dot);
        self.separators.push(SeparatorPair {
            after_digit,
            dot_up,
            dot_down,
            up_on: false,
            down_on: false,
        });
    }

    /// Change one segment's state.
    ///
    /// `digit` is 0-based, `segment` is 1..=7 (a=1 .. g=7). Anything out of
    /// range is a no-op.
    pub fn set_segment(&mut self, digit: usize, segment: u8, on: bool) {
        if !(1..=SEGMENTS_PER_DIGIT).contains(&segment) {
            trace!("set_segment: segment {segment} out of range, ignored");
            return;
        }
        let Some(slot) = self.digits.get_mut(digit) else {
            trace!("set_segment: digit {digit} out of range, ignored");
            return;
        };
        let bit = glyphs::segment_bit(segment);
        if on {
            slot.mask |= bit;
        } else {
            slot.mask &= !bit;
        }
        let id = slot.segments[usize::from(segment - 1)];
        self.fill_slot(id, on, false);
    }

    /// Change a digit's decimal point; a no-op when the display was built
    /// without decimal points.
    pub fn set_decimal_point(&mut self, digit: usize, on: bool) {
        let Some(slot) = self.digits.get_mut(digit) else {
            trace!("set_decimal_point: digit {digit} out of range, ignored");
            return;
        };
        let Some(id) = slot.dp else {
            trace!("set_decimal_point: digit {digit} has no decimal point, ignored");
            return;
        };
        slot.dp_on = on;
        self.fill_slot(id, on, true);
    }

    /// Show a character on one digit: all seven segments in a..g order,
    /// then the decimal point when the digit has one. Unsupported
    /// characters blank the digit.
    pub fn set_char(&mut self, digit: usize, ch: char, dp: bool) {
        let mask = glyphs::char_to_mask(ch);
        for segment in 1..=SEGMENTS_PER_DIGIT {
            self.set_segment(digit, segment, glyphs::mask_has_segment(mask, segment));
        }
        self.set_decimal_point(digit, dp);
    }

    /// Distribute a string across the digits, left to right.
    ///
    /// A `:` consumes no digit slot; it lights the separator pair sitting
    /// immediately before the digit about to be filled, where one exists -
    /// at any other position it is consumed without visual effect. A `.`
    /// sets the previously placed character's decimal point and likewise
    /// consumes no slot. Characters past the last digit are dropped.
    pub fn set_word(&mut self, text: &str) {
        let mut cursor: usize = 0;
        let mut last_filled: Option<usize> = None;
        for ch in text.chars() {
            match ch {
                ':' => {
                    if let Some(index) = self.separator_before(cursor) {
                        self.set_colon(index, true, true);
                    } else {
                        trace!("set_word: ':' before digit {cursor} has no separator, ignored");
                    }
                }
                '.' => {
                    if let Some(digit) = last_filled {
                        self.set_decimal_point(digit, true);
                    }
                }
                _ => {
                    if cursor < self.digits.len() {
                        self.set_char(cursor, ch, false);
                        last_filled = Some(cursor);
                        cursor += 1;
                    } else {
                        trace!("set_word: {ch:?} past the last digit, ignored");
                    }
                }
            }
        }
    }

    /// Change a separator pair's dots. Out-of-range index (which includes
    /// every index on a display built without separators) is a no-op.
    pub fn set_colon(&mut self, index: usize, up: bool, down: bool) {
        let Some(pair) = self.separators.get_mut(index) else {
            trace!("set_colon: separator {index} out of range, ignored");
            return;
        };
        pair.up_on = up;
        pair.down_on = down;
        let (dot_up, dot_down) = (pair.dot_up, pair.dot_down);
        self.fill_slot(dot_up, up, true);
        self.fill_slot(dot_down, down, true);
    }

    /// Blank one digit: segments and decimal point.
    pub fn clear_digit(&mut self, digit: usize) {
        for segment in 1..=SEGMENTS_PER_DIGIT {
            self.set_segment(digit, segment, false);
        }
        self.set_decimal_point(digit, false);
    }

    /// Blank the whole display: digit 0 first, separators after.
    pub fn clear(&mut self) {
        for digit in 0..self.digits.len() {
            self.clear_digit(digit);
        }
        for index in 0..self.separators.len() {
            self.set_colon(index, false, false);
        }
    }

    fn fill_slot(&mut self, id: ShapeId, on: bool, dot: bool) {
        let fill = if on {
            self.config.colors.active.as_str()
        } else if dot {
            self.config.colors.dot.as_str()
        } else {
            self.config.colors.normal.as_str()
        };
        self.canvas.set_fill(id, fill);
    }

    /// Index of the separator pair directly before `digit`, if any.
    fn separator_before(&self, digit: usize) -> Option<usize> {
        let prev = digit.checked_sub(1)?;
        self.separators
            .iter()
            .position(|pair| usize::from(pair.after_digit) == prev)
    }

    // ---- read-back ----------------------------------------------------

    pub fn digits_count(&self) -> usize {
        self.digits.len()
    }

    pub fn separator_count(&self) -> usize {
        self.separators.len()
    }

    /// Active mask of a digit (bit 6 = a .. bit 0 = g); 0 when out of range.
    pub fn digit_mask(&self, digit: usize) -> u8 {
        self.digits.get(digit).map_or(0, |d| d.mask)
    }

    /// Whether one segment is lit; false for anything out of range.
    pub fn segment_state(&self, digit: usize, segment: u8) -> bool {
        glyphs::mask_has_segment(self.digit_mask(digit), segment)
    }

    /// Whether a digit's decimal point is lit; false when absent.
    pub fn dp_state(&self, digit: usize) -> bool {
        self.digits.get(digit).is_some_and(|d| d.dp_on)
    }

    /// (up, down) state of a separator pair; (false, false) out of range.
    pub fn separator_state(&self, index: usize) -> (bool, bool) {
        self.separators
            .get(index)
            .map_or((false, false), |p| (p.up_on, p.down_on))
    }

    /// The digit index each separator pair follows, left to right.
    pub fn separator_positions(&self) -> Vec<u8> {
        self.separators.iter().map(|p| p.after_digit).collect()
    }

    pub fn sizes(&self) -> &DerivedSizes {
        &self.sizes
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn into_canvas(self) -> C {
        self.canvas
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::MockCanvas;
    use crate::config::DisplayConfig;

    fn build(config: DisplayConfig) -> SegmentDisplay<MockCanvas> {
        SegmentDisplay::new(MockCanvas::new(), config).unwrap()
    }

    #[test]
    fn test_topology_counts() {
        let display = build(DisplayConfig::default());
        let state = display.canvas().state().clone();

        // 4 digits x 7 segments
        assert_eq!(state.polygon_count, 28);
        // 4 decimal points + one separator pair
        assert_eq!(state.circle_count, 6);
        assert_eq!(display.separator_count(), 1);
        assert_eq!(display.separator_positions(), vec![1]);
        assert!(state.viewport.is_some());
    }

    #[test]
    fn test_no_dp_no_dots_topology() {
        let mut config = DisplayConfig::default();
        config.show_dp = false;
        config.show_dots = false;
        let display = build(config);

        assert_eq!(display.canvas().state().circle_count, 0);
        assert_eq!(display.separator_count(), 0);
        // Decimal point writes are no-ops, not crashes
        let mut display = display;
        display.set_decimal_point(0, true);
        assert!(!display.dp_state(0));
    }

    #[test]
    fn test_set_segment_updates_one_fill() {
        let mut display = build(DisplayConfig::default());
        display.canvas_mut().reset_state();

        display.set_segment(0, 1, true);
        assert!(display.segment_state(0, 1));
        assert_eq!(display.canvas().state().fill_changes, 1);
        assert_eq!(display.canvas().count_with_fill("red"), 1);

        display.set_segment(0, 1, false);
        assert!(!display.segment_state(0, 1));
        assert_eq!(display.canvas().count_with_fill("red"), 0);
    }

    #[test]
    fn test_out_of_range_is_silent() {
        let mut display = build(DisplayConfig::default());
        display.canvas_mut().reset_state();

        display.set_segment(99, 1, true);
        display.set_segment(0, 0, true);
        display.set_segment(0, 8, true);
        display.set_colon(5, true, true);
        display.clear_digit(42);

        assert_eq!(display.canvas().state().fill_changes, 0);
        assert_eq!(display.canvas().count_with_fill("red"), 0);
    }

    #[test]
    fn test_set_char_round_trip() {
        let mut display = build(DisplayConfig::default());
        for (i, ch) in ['0', '1', 'A', '?'].into_iter().enumerate() {
            display.set_char(i, ch, false);
            assert_eq!(display.digit_mask(i), glyphs::char_to_mask(ch), "char {ch:?}");
        }
    }

    #[test]
    fn test_set_char_dp_flag() {
        let mut display = build(DisplayConfig::default());
        display.set_char(2, '5', true);
        assert!(display.dp_state(2));
        display.set_char(2, '5', false);
        assert!(!display.dp_state(2));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut display = build(DisplayConfig::default());
        display.set_word("88:88");
        display.set_decimal_point(0, true);

        display.clear();
        let after_once: Vec<u8> = (0..4).map(|i| display.digit_mask(i)).collect();
        assert_eq!(after_once, vec![0, 0, 0, 0]);
        assert_eq!(display.separator_state(0), (false, false));
        assert_eq!(display.canvas().count_with_fill("red"), 0);

        display.clear();
        let after_twice: Vec<u8> = (0..4).map(|i| display.digit_mask(i)).collect();
        assert_eq!(after_once, after_twice);
    }

    #[test]
    fn test_set_word_clock() {
        let mut display = build(DisplayConfig::default());
        display.set_word("12:34");

        assert_eq!(display.digit_mask(0), glyphs::char_to_mask('1'));
        assert_eq!(display.digit_mask(1), glyphs::char_to_mask('2'));
        assert_eq!(display.digit_mask(2), glyphs::char_to_mask('3'));
        assert_eq!(display.digit_mask(3), glyphs::char_to_mask('4'));
        assert_eq!(display.separator_state(0), (true, true));
    }

    #[test]
    fn test_set_word_decimal_points() {
        let mut display = build(DisplayConfig::default());
        display.set_word("3.14");

        assert_eq!(display.digit_mask(0), glyphs::char_to_mask('3'));
        assert!(display.dp_state(0));
        assert_eq!(display.digit_mask(1), glyphs::char_to_mask('1'));
        assert_eq!(display.digit_mask(2), glyphs::char_to_mask('4'));
        assert!(!display.dp_state(1));
    }

    #[test]
    fn test_set_word_colon_off_boundary() {
        let mut display = build(DisplayConfig::default());
        // ':' before digit 0 and before digit 3 have no separators; the
        // word still lays out and nothing lights up wrongly
        display.set_word(":123:4");
        assert_eq!(display.digit_mask(0), glyphs::char_to_mask('1'));
        assert_eq!(display.digit_mask(3), glyphs::char_to_mask('4'));
        assert_eq!(display.separator_state(0), (false, false));
    }

    #[test]
    fn test_set_word_overflow_dropped() {
        let mut display = build(DisplayConfig::default());
        display.set_word("123456");
        assert_eq!(display.digit_mask(3), glyphs::char_to_mask('4'));
        // No fifth digit to inspect; nothing panicked, masks intact
        assert_eq!(display.digit_mask(4), 0);
    }
}
