/*
 *  tests/display_integration.rs
 *
 *  Integration tests for the display engine and the snake walk
 *
 *  SevSegS - scales and tails
 *  (c) 2020-26 Stuart Hunter
 */

use sevsegs::config::DisplayConfig;
use sevsegs::glyphs::char_to_mask;
use sevsegs::{MockCanvas, SegmentDisplay, Snake, SvgCanvas};

fn config(digits: u8) -> DisplayConfig {
    let mut config = DisplayConfig::default();
    config.digits_count = digits;
    config
}

fn build(digits: u8) -> SegmentDisplay<MockCanvas> {
    SegmentDisplay::new(MockCanvas::new(), config(digits)).unwrap()
}

#[test]
fn test_total_size_positive_and_linear() {
    let mut previous = 0.0;
    for digits in 1..=8 {
        let display = build(digits);
        let sizes = display.sizes();
        assert!(sizes.width > 0.0 && sizes.height > 0.0);
        assert!(sizes.width > previous, "{digits} digits should be wider");
        previous = sizes.width;
    }

    // Separators off: strictly linear growth per digit
    let width_of = |digits: u8| {
        let mut cfg = config(digits);
        cfg.show_dots = false;
        SegmentDisplay::new(MockCanvas::new(), cfg).unwrap().sizes().width
    };
    let (w3, w5, w7) = (width_of(3), width_of(5), width_of(7));
    assert!((w5 - w3 - (w7 - w5)).abs() < 1e-9);
}

#[test]
fn test_char_round_trip_whole_alphabet() {
    let supported = "0123456789ABCDEFGHIJLNOPQRSTUY\
                     abcdefghijlnopqrstuy-_°? ";
    let mut display = build(4);
    for ch in supported.chars() {
        display.set_char(1, ch, false);
        assert_eq!(
            display.digit_mask(1),
            char_to_mask(ch),
            "mask mismatch for {ch:?}",
        );
    }
    // Unsupported characters blank the digit
    display.set_char(1, '8', false);
    display.set_char(1, 'W', false);
    assert_eq!(display.digit_mask(1), 0);
}

#[test]
fn test_clear_idempotent() {
    let mut display = build(6);
    display.set_word("12:34:56");

    display.clear();
    let masks_once: Vec<u8> = (0..6).map(|i| display.digit_mask(i)).collect();
    display.clear();
    let masks_twice: Vec<u8> = (0..6).map(|i| display.digit_mask(i)).collect();

    assert_eq!(masks_once, vec![0; 6]);
    assert_eq!(masks_once, masks_twice);
    assert_eq!(display.canvas().count_with_fill("red"), 0);
}

#[test]
fn test_six_digit_separator_placement() {
    let display = build(6);
    // HH:MM:SS boundaries only: after digit 1 and after digit 3
    assert_eq!(display.separator_positions(), vec![1, 3]);

    // Never adjacent to digit 0 alone, never after the last digit
    let display = build(2);
    assert_eq!(display.separator_count(), 0);
}

#[test]
fn test_set_word_clock_face() {
    let mut display = build(4);
    display.set_word("12:34");

    assert_eq!(display.digit_mask(0), char_to_mask('1'));
    assert_eq!(display.digit_mask(1), char_to_mask('2'));
    assert_eq!(display.separator_state(0), (true, true));
    assert_eq!(display.digit_mask(2), char_to_mask('3'));
    assert_eq!(display.digit_mask(3), char_to_mask('4'));
}

#[test]
fn test_snake_trail_never_exceeds_three() {
    for digits in [1, 2, 4, 8] {
        let mut display = build(digits);
        let mut snake = Snake::new(digits, 100);
        snake.start(0, true, &mut display);

        for step in 0..200 {
            snake.advance(&mut display);
            let lit = display.canvas().count_with_fill("red");
            assert!(
                (1..=3).contains(&lit),
                "{lit} lit after step {step} on {digits} digit(s)",
            );

            if let Some(head) = snake.head() {
                assert!(usize::from(head.digit) < display.digits_count());
                assert!((1..=7).contains(&head.segment));
            } else {
                panic!("snake lost its head");
            }
        }
    }
}

#[test]
fn test_snake_stop_clears_when_hiding() {
    let mut display = build(4);
    let mut snake = Snake::new(4, 100);
    snake.start(0, true, &mut display);
    for _ in 0..10 {
        snake.advance(&mut display);
    }

    snake.stop(true, &mut display);
    assert_eq!(display.canvas().count_with_fill("red"), 0);

    // Disabled snakes ignore ticks
    snake.tick(1_000_000, &mut display);
    assert_eq!(display.canvas().count_with_fill("red"), 0);
}

#[test]
fn test_svg_document_round_trip() {
    let mut display = SegmentDisplay::new(SvgCanvas::new(), config(4)).unwrap();
    display.set_word("12:34");
    let svg = display.canvas().to_svg();

    assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
    // 28 segment polygons
    assert_eq!(svg.matches("<polygon").count(), 28);
    // 4 decimal points + 1 separator pair
    assert_eq!(svg.matches("<circle").count(), 6);
    // Something is lit
    assert!(svg.contains("fill=\"red\""));
}

#[cfg(feature = "raster")]
#[test]
fn test_svg_rasterizes() {
    use sevsegs::SvgImageRenderer;

    let mut display = SegmentDisplay::new(SvgCanvas::new(), config(4)).unwrap();
    display.set_word("88:88");

    let sizes = *display.sizes();
    let (w, h) = (sizes.width.ceil() as u32, sizes.height.ceil() as u32);
    let renderer = SvgImageRenderer::new(&display.canvas().to_svg(), w, h).unwrap();
    let pixmap = renderer.render_to_pixmap().unwrap();

    assert_eq!(pixmap.width(), w);
    assert_eq!(pixmap.height(), h);
    // The face is drawn: some pixels are opaque
    assert!(pixmap.pixels().iter().any(|p| p.alpha() > 0));
}
