/*
 *  snake.rs
 *
 *  SevSegS - scales and tails
 *  (c) 2020-26 Stuart Hunter
 *
 *  Randomized walk across the lit segments of an idle display
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

//! The snake crawls along segments: it enters a bar travelling in one of
//! four headings, and at the joint where the bar ends it picks uniformly
//! among the legal continuations - another bar of the same digit, or the
//! matching bar of a neighboring digit. Horizontal bars (a, g, d) are
//! travelled Right/Left, vertical bars (b, c, e, f) Down/Up.

use arrayvec::ArrayVec;
use log::debug;
use rand::Rng;

use crate::canvas::Canvas;
use crate::display::SegmentDisplay;
use crate::geometry::segment_is_horizontal;

/// Travel direction along a segment bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    Down,
    Right,
    Left,
    Up,
}

/// One walk position: a segment bar (1..=7, a=1 .. g=7) of one digit,
/// being travelled in one heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnakePos {
    pub heading: Heading,
    pub digit: u8,
    pub segment: u8,
}

/// Reset target when a position has no continuation: segment a of digit 0,
/// travelling right. Unreachable from any position the walk itself
/// produces; it guards against corrupted positions only.
pub const FALLBACK_POS: SnakePos = SnakePos {
    heading: Heading::Right,
    digit: 0,
    segment: 1,
};

/// One legal continuation: from a (heading, segment) pair to another,
/// optionally crossing into a neighboring digit.
#[derive(Debug, Clone, Copy)]
struct Step {
    heading: Heading,
    segment: u8,
    delta: i8,
    to_heading: Heading,
    to_segment: u8,
}

const fn step(heading: Heading, segment: u8, delta: i8, to_heading: Heading, to_segment: u8) -> Step {
    Step { heading, segment, delta, to_heading, to_segment }
}

use Heading::{Down, Left, Right, Up};

/// The full adjacency of the seven segments, within one digit and across
/// two neighbors. 34 entries, grouped by the joint the travelling snake
/// arrives at. Every source pair keeps at least one same-digit entry.
const STEPS: [Step; 34] = [
    // a travelling right -> top-right joint
    step(Right, 1, 1, Right, 1),
    step(Right, 1, 0, Down, 2),
    // g travelling right -> middle-right joint
    step(Right, 7, 1, Right, 7),
    step(Right, 7, 0, Up, 2),
    step(Right, 7, 0, Down, 3),
    // d travelling right -> bottom-right joint
    step(Right, 4, 1, Right, 4),
    step(Right, 4, 0, Up, 3),
    // a travelling left -> top-left joint
    step(Left, 1, -1, Left, 1),
    step(Left, 1, 0, Down, 6),
    // g travelling left -> middle-left joint
    step(Left, 7, -1, Left, 7),
    step(Left, 7, 0, Down, 5),
    step(Left, 7, 0, Up, 6),
    // d travelling left -> bottom-left joint
    step(Left, 4, -1, Left, 4),
    step(Left, 4, 0, Up, 5),
    // b travelling down -> middle-right joint
    step(Down, 2, 0, Down, 3),
    step(Down, 2, 0, Left, 7),
    step(Down, 2, 1, Right, 7),
    // c travelling down -> bottom-right joint
    step(Down, 3, 0, Left, 4),
    step(Down, 3, 1, Right, 4),
    // e travelling down -> bottom-left joint
    step(Down, 5, 0, Right, 4),
    step(Down, 5, -1, Left, 4),
    // f travelling down -> middle-left joint
    step(Down, 6, 0, Right, 7),
    step(Down, 6, 0, Down, 5),
    step(Down, 6, -1, Left, 7),
    // b travelling up -> top-right joint
    step(Up, 2, 0, Left, 1),
    step(Up, 2, 1, Right, 1),
    // c travelling up -> middle-right joint
    step(Up, 3, 0, Left, 7),
    step(Up, 3, 0, Up, 2),
    step(Up, 3, 1, Right, 7),
    // e travelling up -> middle-left joint
    step(Up, 5, 0, Right, 7),
    step(Up, 5, 0, Up, 6),
    step(Up, 5, -1, Left, 7),
    // f travelling up -> top-left joint
    step(Up, 6, 0, Right, 1),
    step(Up, 6, -1, Left, 1),
];

/// Boundary-adjusted views of [`STEPS`]: a digit on the display edge has
/// fewer legal continuations (no neighbor to cross into), a single-digit
/// display none at all. Filtered once at construction.
#[derive(Debug)]
struct StepViews {
    interior: Vec<Step>,
    first: Vec<Step>,
    last: Vec<Step>,
    single: Vec<Step>,
}

impl StepViews {
    fn build() -> Self {
        let keep = |pred: fn(i8) -> bool| -> Vec<Step> {
            STEPS.iter().copied().filter(|s| pred(s.delta)).collect()
        };
        StepViews {
            interior: keep(|_| true),
            first: keep(|d| d >= 0),
            last: keep(|d| d <= 0),
            single: keep(|d| d == 0),
        }
    }
}

/// The idle-display walker. Holds no visual state of its own - just the
/// three trail positions - and draws through the display's single
/// per-segment entry point.
pub struct Snake {
    digits_count: u8,
    delay_ms: u64,
    views: StepViews,
    head: Option<SnakePos>,
    tail1: Option<SnakePos>,
    tail2: Option<SnakePos>,
    enabled: bool,
    timer_ms: u64,
}

impl Snake {
    /// `digits_count` is the display's digit count (a zero is treated as
    /// one rather than producing an empty walk space).
    pub fn new(digits_count: u8, delay_ms: u64) -> Self {
        Snake {
            digits_count: digits_count.max(1),
            delay_ms,
            views: StepViews::build(),
            head: None,
            tail1: None,
            tail2: None,
            enabled: false,
            timer_ms: 0,
        }
    }

    /// Pick a uniformly random starting position: any segment of any
    /// digit, travelling either way its orientation allows.
    pub fn first_position(&self) -> SnakePos {
        let mut rng = rand::rng();
        let segment = rng.random_range(1..=7u8);
        let reverse = rng.random::<bool>();
        let heading = match (segment_is_horizontal(segment), reverse) {
            (true, false) => Right,
            (true, true) => Left,
            (false, false) => Down,
            (false, true) => Up,
        };
        SnakePos {
            heading,
            digit: rng.random_range(0..self.digits_count),
            segment,
        }
    }

    fn view_for(&self, digit: u8) -> &[Step] {
        if self.digits_count == 1 {
            &self.views.single
        } else if digit == 0 {
            &self.views.first
        } else if digit == self.digits_count - 1 {
            &self.views.last
        } else {
            &self.views.interior
        }
    }

    fn candidates(&self, pos: SnakePos) -> ArrayVec<Step, 3> {
        let mut found: ArrayVec<Step, 3> = ArrayVec::new();
        for s in self.view_for(pos.digit) {
            if s.heading == pos.heading && s.segment == pos.segment {
                found.push(*s);
            }
        }
        found
    }

    /// The continuation of the walk: uniform among the legal steps out of
    /// `pos`. A position with no continuation (possible only if `pos` was
    /// corrupted by the caller) resets to [`FALLBACK_POS`].
    fn next_position(&self, pos: SnakePos) -> SnakePos {
        let found = self.candidates(pos);
        if found.is_empty() {
            debug!("snake: no continuation from {pos:?}, resetting");
            return FALLBACK_POS;
        }
        let pick = if found.len() == 1 {
            found[0]
        } else {
            found[rand::rng().random_range(0..found.len())]
        };
        SnakePos {
            heading: pick.to_heading,
            digit: pos.digit.checked_add_signed(pick.delta).unwrap_or(0),
            segment: pick.to_segment,
        }
    }

    fn draw_seg<C: Canvas>(display: &mut SegmentDisplay<C>, pos: Option<SnakePos>, on: bool) {
        if let Some(p) = pos {
            display.set_segment(usize::from(p.digit), p.segment, on);
        }
    }

    /// One atomic move: unlight the oldest tail, shift the trail, light
    /// the new head. The visible trail never exceeds three segments.
    pub fn advance<C: Canvas>(&mut self, display: &mut SegmentDisplay<C>) {
        Self::draw_seg(display, self.tail2, false);

        self.tail2 = self.tail1;
        self.tail1 = self.head;
        let head = match self.head {
            Some(pos) => self.next_position(pos),
            None => self.first_position(),
        };
        self.head = Some(head);

        Self::draw_seg(display, self.head, true);
        debug!("snake: head {head:?}");
    }

    /// Advance when due. `now_ms` comes from the caller's clock and must
    /// be non-decreasing; at most one move fires per call no matter how
    /// much time has passed.
    pub fn tick<C: Canvas>(&mut self, now_ms: u64, display: &mut SegmentDisplay<C>) {
        if self.enabled && now_ms.saturating_sub(self.timer_ms) > self.delay_ms {
            self.timer_ms = now_ms;
            self.advance(display);
        }
    }

    /// Enable ticking. `reset_head` reseeds the walk and drops the trail;
    /// without it the walk resumes where it stopped.
    pub fn start<C: Canvas>(&mut self, now_ms: u64, reset_head: bool, display: &mut SegmentDisplay<C>) {
        if reset_head || self.head.is_none() {
            self.head = Some(self.first_position());
            self.tail1 = None;
            self.tail2 = None;
        }
        Self::draw_seg(display, self.head, true);
        self.timer_ms = now_ms;
        self.enabled = true;
    }

    /// Disable ticking; `hide` also blanks the display.
    pub fn stop<C: Canvas>(&mut self, hide: bool, display: &mut SegmentDisplay<C>) {
        self.enabled = false;
        if hide {
            display.clear();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn head(&self) -> Option<SnakePos> {
        self.head
    }

    /// Head first, oldest tail last.
    pub fn trail(&self) -> [Option<SnakePos>; 3] {
        [self.head, self.tail1, self.tail2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::MockCanvas;
    use crate::config::DisplayConfig;

    fn build_display(digits: u8) -> SegmentDisplay<MockCanvas> {
        let mut config = DisplayConfig::default();
        config.digits_count = digits;
        SegmentDisplay::new(MockCanvas::new(), config).unwrap()
    }

    fn valid(pos: SnakePos, digits: u8) -> bool {
        pos.digit < digits && (1..=7).contains(&pos.segment)
    }

    #[test]
    fn test_every_key_keeps_a_stay_step() {
        // Each (heading, segment) source in the table retains a delta-0
        // entry, so even the single-digit view never runs dry and the
        // fallback cannot trigger from a table-produced position.
        for s in STEPS {
            assert!(
                STEPS.iter().any(|t| t.heading == s.heading
                    && t.segment == s.segment
                    && t.delta == 0),
                "no stay step for {:?} {}",
                s.heading,
                s.segment,
            );
        }
    }

    #[test]
    fn test_headings_match_orientation() {
        for s in STEPS {
            for (heading, segment) in [(s.heading, s.segment), (s.to_heading, s.to_segment)] {
                let horizontal = matches!(heading, Right | Left);
                assert_eq!(
                    crate::geometry::segment_is_horizontal(segment),
                    horizontal,
                    "{heading:?} on segment {segment}",
                );
            }
        }
    }

    #[test]
    fn test_walk_stays_valid() {
        for digits in 1..=8u8 {
            let snake = Snake::new(digits, 400);
            let mut pos = snake.first_position();
            for _ in 0..500 {
                assert!(valid(pos, digits), "{pos:?} on {digits} digit(s)");
                // A legal position always has a continuation
                assert!(!snake.candidates(pos).is_empty(), "{pos:?} ran dry");
                pos = snake.next_position(pos);
            }
        }
    }

    #[test]
    fn test_boundary_views_never_cross_the_edge() {
        let snake = Snake::new(2, 400);
        for s in snake.view_for(0) {
            assert!(s.delta >= 0);
        }
        for s in snake.view_for(1) {
            assert!(s.delta <= 0);
        }

        let single = Snake::new(1, 400);
        for s in single.view_for(0) {
            assert_eq!(s.delta, 0);
        }
    }

    #[test]
    fn test_corrupt_position_falls_back() {
        let snake = Snake::new(4, 400);
        // Vertical heading on a horizontal bar never appears in the table
        let bogus = SnakePos { heading: Down, digit: 2, segment: 1 };
        assert_eq!(snake.next_position(bogus), FALLBACK_POS);
    }

    #[test]
    fn test_trail_is_at_most_three() {
        let mut display = build_display(4);
        let mut snake = Snake::new(4, 400);
        snake.start(0, true, &mut display);

        for _ in 0..50 {
            snake.advance(&mut display);
            let lit = display.canvas().count_with_fill("red");
            assert!((1..=3).contains(&lit), "{lit} segments lit");
        }
    }

    #[test]
    fn test_tick_fires_at_most_once() {
        let mut display = build_display(4);
        let mut snake = Snake::new(4, 400);
        snake.start(1_000, true, &mut display);
        let head0 = snake.head();

        // Not yet due
        snake.tick(1_200, &mut display);
        assert_eq!(snake.head(), head0);

        // Long overdue: still exactly one move
        snake.tick(10_000, &mut display);
        let head1 = snake.head();
        assert_ne!(head1, head0);
        snake.tick(10_000, &mut display);
        assert_eq!(snake.head(), head1);
    }

    #[test]
    fn test_stop_hides_and_start_resumes() {
        let mut display = build_display(4);
        let mut snake = Snake::new(4, 400);
        snake.start(0, true, &mut display);
        for _ in 0..5 {
            snake.advance(&mut display);
        }
        let head = snake.head();

        snake.stop(true, &mut display);
        assert!(!snake.is_enabled());
        assert_eq!(display.canvas().count_with_fill("red"), 0);

        // Resume without reseeding keeps the head position
        snake.start(0, false, &mut display);
        assert_eq!(snake.head(), head);
        assert!(snake.is_enabled());
    }
}
