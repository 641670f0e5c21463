use serde::{Deserialize, Serialize};
use clap::{ArgAction, Parser, ValueHint};
use dirs_next::home_dir;
use std::{fs, path::{Path, PathBuf}};
use thiserror::Error;

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Fully resolved settings: logging plus the display itself.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// e.g., "info" | "debug"
    pub log_level: Option<String>,
    pub display: DisplayConfig,
}

/// Fully resolved display configuration. Defaults mirror a four-digit
/// clock face; `validate()` is the one gate all construction paths pass
/// through.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Number of digit cells, left to right. Capped at 8: the snake walk
    /// packs its digit index into 3 bits.
    pub digits_count: u8,
    /// Give every digit a decimal point dot.
    pub show_dp: bool,
    /// Interleave clock-style separator dot pairs between digit groups.
    pub show_dots: bool,
    /// Emit debug labels (digit index, segment letters) on the canvas.
    pub show_text: bool,
    pub size: SizeConfig,
    pub colors: ColorConfig,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            digits_count: 4,
            show_dp: true,
            show_dots: true,
            show_text: false,
            size: SizeConfig::default(),
            colors: ColorConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizeConfig {
    /// Width of one segment bar; the display's whole geometry keys off it.
    pub segment_width: f64,
    /// Length of one segment bar.
    pub segment_height: f64,
    /// Distance between digits.
    pub margin: f64,
    /// Dot radius; half a segment width when unset.
    pub radius: Option<f64>,
    /// Rendered element width; the viewBox-derived size when unset.
    pub width: Option<f64>,
    /// Rendered element height; the viewBox-derived size when unset.
    pub height: Option<f64>,
}

impl Default for SizeConfig {
    fn default() -> Self {
        SizeConfig {
            segment_width: 16.0,
            segment_height: 64.0,
            margin: 10.0,
            radius: None,
            width: None,
            height: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorConfig {
    /// Color of an unlit segment.
    pub normal: String,
    /// Color of a lit segment.
    pub active: String,
    /// Resting color of decimal point and separator dots.
    pub dot: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        ColorConfig {
            normal: "lightgray".to_string(),
            active: "red".to_string(),
            dot: "lightgray".to_string(),
        }
    }
}

impl DisplayConfig {
    /// Put any invariants here (required fields, ranges, etc.)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.digits_count == 0 || self.digits_count > 8 {
            return Err(ConfigError::Validation(
                "digits_count must be 1..=8".into(),
            ));
        }
        for (name, v) in [
            ("segment_width", self.size.segment_width),
            ("segment_height", self.size.segment_height),
            ("margin", self.size.margin),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(ConfigError::Validation(format!(
                    "size.{name} must be finite and > 0"
                )));
            }
        }
        if let Some(r) = self.size.radius {
            if !r.is_finite() || r <= 0.0 {
                return Err(ConfigError::Validation(
                    "size.radius must be finite and > 0".into(),
                ));
            }
        }
        for (name, c) in [
            ("normal", &self.colors.normal),
            ("active", &self.colors.active),
            ("dot", &self.colors.dot),
        ] {
            if c.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "colors.{name} must not be empty"
                )));
            }
        }
        Ok(())
    }
}

/// Raw YAML shape. All fields are Options so a file can specify a subset
/// and be layered over the defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    pub log_level: Option<String>,
    pub display: Option<DisplayOverlay>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DisplayOverlay {
    pub digits_count: Option<u8>,
    pub show_dp: Option<bool>,
    pub show_dots: Option<bool>,
    pub show_text: Option<bool>,
    pub size: Option<SizeOverlay>,
    pub colors: Option<ColorOverlay>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SizeOverlay {
    pub segment_width: Option<f64>,
    pub segment_height: Option<f64>,
    pub margin: Option<f64>,
    pub radius: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ColorOverlay {
    pub normal: Option<String>,
    pub active: Option<String>,
    pub dot: Option<String>,
}

/// CLI overrides. All display fields are Options so we can layer them
/// over YAML; the trailing block drives the demo binary.
#[derive(Debug, Parser, Clone)]
#[command(name = "sevsegs", about = "Seven-segment SVG display with a snake idle animation", disable_help_flag = false)]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    /// Enable debug log level
    #[arg(long, short = 'v', alias = "verbose", action = ArgAction::SetTrue)]
    pub debug: bool,
    #[arg(long)]
    pub digits: Option<u8>,
    #[arg(long, action = ArgAction::Set)]
    pub show_dp: Option<bool>,
    #[arg(long, action = ArgAction::Set)]
    pub show_dots: Option<bool>,
    #[arg(long, action = ArgAction::Set)]
    pub show_text: Option<bool>,
    #[arg(long)]
    pub segment_width: Option<f64>,
    #[arg(long)]
    pub segment_height: Option<f64>,
    #[arg(long)]
    pub margin: Option<f64>,
    #[arg(long)]
    pub radius: Option<f64>,
    #[arg(long)]
    pub color_normal: Option<String>,
    #[arg(long)]
    pub color_active: Option<String>,
    #[arg(long)]
    pub color_dot: Option<String>,

    /// What the demo renders
    #[arg(long, value_parser = ["clock", "word", "snake"], default_value = "clock")]
    pub mode: String,
    /// Text for word mode
    #[arg(long)]
    pub word: Option<String>,
    /// Snake moves to render
    #[arg(long, default_value_t = 24)]
    pub frames: u32,
    /// Snake step delay in milliseconds
    #[arg(long, default_value_t = 400)]
    pub delay_ms: u64,
    /// Output SVG path (snake mode appends the frame number)
    #[arg(long, default_value = "display.svg")]
    pub out: PathBuf,
    /// Also write a PNG render of the final frame
    #[cfg(feature = "raster")]
    #[arg(long)]
    pub png: Option<PathBuf>,
    /// Print a terminal preview of the final frame
    #[cfg(feature = "raster")]
    #[arg(long, action = ArgAction::SetTrue)]
    pub ascii: bool,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

/// Public entry point: parse CLI, read YAML, merge, validate.
pub fn load() -> Result<(Settings, Cli), ConfigError> {
    load_with(Cli::parse())
}

/// Same as [`load`] with an already-parsed CLI, for tests.
pub fn load_with(cli: Cli) -> Result<(Settings, Cli), ConfigError> {
    // 1) defaults (from `Default` impl)
    let mut settings = Settings::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            apply_file(&mut settings, read_yaml(p)?);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        apply_file(&mut settings, read_yaml(&p)?);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut settings, &cli);

    // 4) Validate
    settings.display.validate()?;

    if cli.dump_config {
        // Pretty YAML of effective config (nice for debugging)
        let s = serde_yaml::to_string(&settings)?;
        println!("{s}");
        std::process::exit(0);
    }

    Ok((settings, cli))
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/sevsegs/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/sevsegs/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/sevsegs.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["sevsegs.yaml", "config.yaml", "config/sevsegs.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<ConfigFile, ConfigError> {
    let s = fs::read_to_string(path)?;
    let cfg: ConfigFile = serde_yaml::from_str(&s)?;
    Ok(cfg)
}

/// Layer a file's Options over the resolved settings, field by field.
fn apply_file(dst: &mut Settings, src: ConfigFile) {
    if src.log_level.is_some() { dst.log_level = src.log_level; }
    let Some(d) = src.display else { return };

    if let Some(v) = d.digits_count { dst.display.digits_count = v; }
    if let Some(v) = d.show_dp      { dst.display.show_dp = v; }
    if let Some(v) = d.show_dots    { dst.display.show_dots = v; }
    if let Some(v) = d.show_text    { dst.display.show_text = v; }
    if let Some(s) = d.size {
        if let Some(v) = s.segment_width  { dst.display.size.segment_width = v; }
        if let Some(v) = s.segment_height { dst.display.size.segment_height = v; }
        if let Some(v) = s.margin         { dst.display.size.margin = v; }
        if s.radius.is_some()             { dst.display.size.radius = s.radius; }
        if s.width.is_some()              { dst.display.size.width = s.width; }
        if s.height.is_some()             { dst.display.size.height = s.height; }
    }
    if let Some(c) = d.colors {
        if let Some(v) = c.normal { dst.display.colors.normal = v; }
        if let Some(v) = c.active { dst.display.colors.active = v; }
        if let Some(v) = c.dot    { dst.display.colors.dot = v; }
    }
}

fn apply_cli_overrides(settings: &mut Settings, cli: &Cli) {
    if cli.log_level.is_some() { settings.log_level = cli.log_level.clone(); }

    let display = &mut settings.display;
    if let Some(v) = cli.digits          { display.digits_count = v; }
    if let Some(v) = cli.show_dp         { display.show_dp = v; }
    if let Some(v) = cli.show_dots       { display.show_dots = v; }
    if let Some(v) = cli.show_text       { display.show_text = v; }
    if let Some(v) = cli.segment_width   { display.size.segment_width = v; }
    if let Some(v) = cli.segment_height  { display.size.segment_height = v; }
    if let Some(v) = cli.margin          { display.size.margin = v; }
    if cli.radius.is_some()              { display.size.radius = cli.radius; }
    if let Some(v) = cli.color_normal.clone() { display.colors.normal = v; }
    if let Some(v) = cli.color_active.clone() { display.colors.active = v; }
    if let Some(v) = cli.color_dot.clone()    { display.colors.dot = v; }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = DisplayConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.digits_count, 4);
        assert!(cfg.show_dp && cfg.show_dots && !cfg.show_text);
        assert_eq!(cfg.size.segment_width, 16.0);
        assert_eq!(cfg.colors.active, "red");
    }

    #[test]
    fn test_validate_rejects_bad_sizes() {
        let mut cfg = DisplayConfig::default();
        cfg.size.segment_width = 0.0;
        assert!(cfg.validate().is_err());

        let mut cfg = DisplayConfig::default();
        cfg.size.margin = -1.0;
        assert!(cfg.validate().is_err());

        let mut cfg = DisplayConfig::default();
        cfg.size.radius = Some(f64::NAN);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_digit_counts() {
        let mut cfg = DisplayConfig::default();
        cfg.digits_count = 0;
        assert!(cfg.validate().is_err());
        cfg.digits_count = 9;
        assert!(cfg.validate().is_err());
        cfg.digits_count = 8;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_file_overlay_is_partial() {
        let mut settings = Settings::default();
        let file: ConfigFile = serde_yaml::from_str(
            "display:\n  digits_count: 6\n  size:\n    margin: 4.5\n",
        )
        .unwrap();
        apply_file(&mut settings, file);

        assert_eq!(settings.display.digits_count, 6);
        assert_eq!(settings.display.size.margin, 4.5);
        // Untouched fields keep their defaults
        assert_eq!(settings.display.size.segment_width, 16.0);
        assert!(settings.display.show_dots);
    }
}
