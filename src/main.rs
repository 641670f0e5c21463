/*
 *  main.rs
 *
 *  SevSegS - scales and tails
 *  (c) 2020-26 Stuart Hunter
 *
 *  TODO:
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

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use chrono::Local;
use env_logger::Env;
use log::{debug, info};

use sevsegs::config::{self, Cli};
use sevsegs::{SegmentDisplay, Snake, SvgCanvas};

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

fn main() -> anyhow::Result<()> {
    let (settings, cli) = config::load()?;

    let default_level = if cli.debug {
        "debug"
    } else {
        settings.log_level.as_deref().unwrap_or("info")
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    info!("v.{} built {}", env!("CARGO_PKG_VERSION"), BUILD_DATE);

    let display_cfg = settings.display;
    let canvas = SvgCanvas::with_element_size(display_cfg.size.width, display_cfg.size.height);
    let mut display = SegmentDisplay::new(canvas, display_cfg)?;

    match cli.mode.as_str() {
        "clock" => {
            let word = clock_word(display.digits_count());
            info!("clock mode: {word}");
            display.set_word(&word);
            write_frame(&display, &cli.out)?;
        }
        "word" => {
            // Lamp test when no word was given
            let word = cli
                .word
                .clone()
                .unwrap_or_else(|| "8".repeat(display.digits_count()));
            info!("word mode: {word}");
            display.set_word(&word);
            write_frame(&display, &cli.out)?;
        }
        "snake" => run_snake(&mut display, &cli)?,
        other => anyhow::bail!("unknown mode {other}"),
    }

    #[cfg(feature = "raster")]
    preview(&display, &cli)?;

    Ok(())
}

/// Local time sized to the display: seconds from six digits up, hours and
/// minutes from four, bare hours below that.
fn clock_word(digits: usize) -> String {
    let now = Local::now();
    if digits >= 6 {
        now.format("%H:%M:%S").to_string()
    } else if digits >= 4 {
        now.format("%H:%M").to_string()
    } else {
        now.format("%H").to_string()
    }
}

fn write_frame(display: &SegmentDisplay<SvgCanvas>, path: &Path) -> anyhow::Result<()> {
    let svg = display.canvas().to_svg();
    fs::write(path, &svg).with_context(|| format!("writing {}", path.display()))?;
    debug!("wrote {}", path.display());
    Ok(())
}

/// Run the idle walk in real time, writing one SVG per move.
fn run_snake(display: &mut SegmentDisplay<SvgCanvas>, cli: &Cli) -> anyhow::Result<()> {
    let digits = display.digits_count() as u8;
    let mut snake = Snake::new(digits, cli.delay_ms);

    info!("snake mode: {} move(s), {}ms apart", cli.frames, cli.delay_ms);

    let started = Instant::now();
    snake.start(0, true, display);
    write_frame(display, &frame_path(&cli.out, 0))?;

    let mut written: u32 = 0;
    while written < cli.frames {
        std::thread::sleep(Duration::from_millis(cli.delay_ms / 4 + 1));
        let now_ms = started.elapsed().as_millis() as u64;
        let before = snake.head();
        snake.tick(now_ms, display);
        if snake.head() != before {
            written += 1;
            write_frame(display, &frame_path(&cli.out, written))?;
        }
    }
    snake.stop(false, display);
    Ok(())
}

/// `display.svg` -> `display_0007.svg`
fn frame_path(base: &Path, index: u32) -> PathBuf {
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "frame".to_string());
    let ext = base
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "svg".to_string());
    base.with_file_name(format!("{stem}_{index:04}.{ext}"))
}

#[cfg(feature = "raster")]
fn preview(display: &SegmentDisplay<SvgCanvas>, cli: &Cli) -> anyhow::Result<()> {
    use sevsegs::SvgImageRenderer;

    if cli.png.is_none() && !cli.ascii {
        return Ok(());
    }

    let svg = display.canvas().to_svg();
    let sizes = display.sizes();

    if let Some(png) = cli.png.as_ref() {
        let renderer = SvgImageRenderer::new(&svg, sizes.width.ceil() as u32, sizes.height.ceil() as u32)?;
        renderer.save_png(png)?;
        info!("PNG written to {}", png.display());
    }

    if cli.ascii {
        // Terminal cells are roughly twice as tall as wide
        let cols: u32 = 96;
        let rows = ((sizes.height / sizes.width * f64::from(cols)) / 2.0).ceil().max(1.0) as u32;
        let renderer = SvgImageRenderer::new(&svg, cols, rows)?;
        let pixmap = renderer.render_to_pixmap()?;

        // Lit segments print solid, resting ones faint, gaps blank
        let pixels = pixmap.pixels();
        for y in 0..rows as usize {
            let mut line = String::with_capacity(cols as usize);
            for x in 0..cols as usize {
                let p = pixels[y * cols as usize + x];
                let luminance =
                    0.299 * p.red() as f32 + 0.587 * p.green() as f32 + 0.114 * p.blue() as f32;
                line.push(if p.alpha() < 128 {
                    ' '
                } else if luminance < 128.0 {
                    '█'
                } else {
                    '·'
                });
            }
            println!("{line}");
        }
    }

    Ok(())
}
