//! `autotheme` - inspect color contrast and render themes from the terminal.

use std::path::PathBuf;

use anyhow::{Context, Result};
use autotheme::color::{
    contrast_ratio, ensure_contrast, parse_color, pick_on, DEFAULT_MIN_RATIO, MORE_CONTRAST_RATIO,
};
use autotheme::{
    AppearanceSource, FileStore, ModeSetting, PropertySurface, ResolvedTheme, Rgb,
    SystemAppearance, ThemeConfig, ThemeEngine,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use console::Style;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "autotheme")]
#[command(version)]
#[command(about = "Adaptive light/dark themes with readable text")]
struct Cli {
    /// Log debug output to stderr (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the WCAG contrast ratio between two colors
    Contrast {
        /// First color (#rgb, #rrggbb, rgb(...) or hsl(...))
        a: String,
        /// Second color
        b: String,
    },

    /// Pick white or black text for a background color
    PickOn {
        base: String,
        #[arg(long, default_value_t = DEFAULT_MIN_RATIO)]
        min_ratio: f64,
    },

    /// Adjust a foreground until it reads against a background
    Ensure {
        fg: String,
        bg: String,
        #[arg(long, default_value_t = DEFAULT_MIN_RATIO)]
        min_ratio: f64,
    },

    /// Resolve and print a full theme
    Apply(ApplyArgs),
}

#[derive(Args)]
struct ApplyArgs {
    /// YAML theme configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// light, dark or auto (overrides the configured mode; auto also
    /// forgets a stored choice)
    #[arg(short, long)]
    mode: Option<ModeSetting>,

    /// Treat the system as asking for more contrast
    #[arg(long)]
    more_contrast: bool,

    /// File that remembers explicit mode choices
    #[arg(long)]
    state: Option<PathBuf>,

    /// Do not write the chosen mode to the state file
    #[arg(long)]
    no_persist: bool,

    #[arg(short, long, value_enum, default_value_t = Format::Css)]
    format: Format,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Css,
    Json,
    Yaml,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Contrast { a, b } => {
            let a = color_arg(&a)?;
            let b = color_arg(&b)?;
            let ratio = contrast_ratio(a, b);
            println!("{}", swatch(a, b));
            println!(
                "{:.2}:1  AA {}  AAA {}",
                ratio,
                verdict(ratio >= DEFAULT_MIN_RATIO),
                verdict(ratio >= MORE_CONTRAST_RATIO)
            );
        }
        Command::PickOn { base, min_ratio } => {
            let base = color_arg(&base)?;
            let on = pick_on(base, min_ratio);
            println!("{}  {:.2}:1", swatch(on, base), contrast_ratio(on, base));
        }
        Command::Ensure { fg, bg, min_ratio } => {
            let fg = color_arg(&fg)?;
            let bg = color_arg(&bg)?;
            let adjusted = ensure_contrast(fg, bg, min_ratio);
            println!(
                "{}  {:.2}:1",
                swatch(adjusted, bg),
                contrast_ratio(adjusted, bg)
            );
        }
        Command::Apply(args) => {
            let appearance = SystemAppearance::new().with_more_contrast(args.more_contrast);
            let (theme, surface) = resolve_theme(&args, appearance)?;
            match args.format {
                Format::Css => print!("{}", surface.to_css()),
                Format::Json => println!("{}", serde_json::to_string_pretty(&theme)?),
                Format::Yaml => print!("{}", serde_yaml::to_string(&theme)?),
            }
        }
    }

    Ok(())
}

/// Runs the engine for `apply` and returns the theme with the written surface.
fn resolve_theme(
    args: &ApplyArgs,
    appearance: impl AppearanceSource + 'static,
) -> Result<(ResolvedTheme, PropertySurface)> {
    let mut config = match &args.config {
        Some(path) => ThemeConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ThemeConfig::default(),
    };
    if args.no_persist {
        config.persist = false;
    }

    let mut tokens = config.tokens.clone();
    if let Some(mode) = args.mode {
        tokens.mode = mode;
    }

    let mut engine = ThemeEngine::new(PropertySurface::new())
        .with_config(config)
        .with_appearance(appearance);
    if let Some(path) = &args.state {
        engine = engine.with_store(FileStore::new(path));
    }
    if args.mode == Some(ModeSetting::Auto) {
        engine.forget_mode();
    }

    let theme = engine.apply(tokens).context("applying theme")?;
    Ok((theme, engine.into_surface()))
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn color_arg(text: &str) -> Result<Rgb> {
    parse_color(text).with_context(|| format!("reading color {text:?}"))
}

/// Renders `fg` on `bg` as a terminal sample followed by the hex values.
fn swatch(fg: Rgb, bg: Rgb) -> String {
    let style = Style::new()
        .color256(fg.to_ansi256())
        .on_color256(bg.to_ansi256());
    format!("{} {} on {}", style.apply_to(" Aa "), fg, bg)
}

fn verdict(pass: bool) -> &'static str {
    if pass {
        "pass"
    } else {
        "fail"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autotheme::{ColorMode, FixedAppearance};
    use tempfile::TempDir;

    fn apply_args(mode: Option<ModeSetting>, state: PathBuf) -> ApplyArgs {
        ApplyArgs {
            config: None,
            mode,
            more_contrast: false,
            state: Some(state),
            no_persist: false,
            format: Format::Css,
        }
    }

    #[test]
    fn test_apply_auto_forgets_stored_mode() {
        let dir = TempDir::new().unwrap();
        let state = dir.path().join("mode");

        let args = apply_args(Some(ModeSetting::Dark), state.clone());
        let (theme, _) = resolve_theme(&args, FixedAppearance::light()).unwrap();
        assert_eq!(theme.mode, ColorMode::Dark);
        assert!(state.exists());

        // Without a mode the stored choice still wins.
        let args = apply_args(None, state.clone());
        let (theme, _) = resolve_theme(&args, FixedAppearance::light()).unwrap();
        assert_eq!(theme.mode, ColorMode::Dark);

        let args = apply_args(Some(ModeSetting::Auto), state.clone());
        let (theme, surface) = resolve_theme(&args, FixedAppearance::light()).unwrap();
        assert_eq!(theme.mode, ColorMode::Light);
        assert_eq!(surface.attribute("data-theme"), Some("light"));
        assert!(!state.exists());
    }

    #[test]
    fn test_cli_parses_apply_flags() {
        let cli = Cli::try_parse_from([
            "autotheme", "apply", "--mode", "auto", "--no-persist", "--format", "json",
        ])
        .unwrap();
        match cli.command {
            Command::Apply(args) => {
                assert_eq!(args.mode, Some(ModeSetting::Auto));
                assert!(args.no_persist);
                assert!(matches!(args.format, Format::Json));
            }
            _ => panic!("Expected apply"),
        }
    }
}
