//! Configuration management CLI commands.

use crate::cli::common::{load_config, print_json, CliError, CliResult};
use crate::config::Config;
use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Configuration management commands
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Display current configuration
    Show(ConfigShowArgs),
    /// Print the configuration file path
    Path(ConfigPathArgs),
    /// Set configuration values
    Set(ConfigSetArgs),
}

/// Display current configuration
#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Configuration file (defaults to the platform config file)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

/// Print the configuration file path
#[derive(Args, Debug)]
pub struct ConfigPathArgs {}

/// Set configuration values
#[derive(Args, Debug)]
pub struct ConfigSetArgs {
    /// Layout pixels per millimeter
    #[arg(long, value_name = "PX")]
    pixels_per_mm: Option<f64>,

    /// Captured-image pixel ratio used by `export --scaled`
    #[arg(long, value_name = "RATIO")]
    pixel_ratio: Option<f64>,

    /// Horizontal gap between doors, in layout pixels
    #[arg(long, value_name = "PX")]
    door_gap: Option<f64>,

    /// Enforce placement rules (true or false)
    #[arg(long, value_name = "BOOL")]
    rules_enabled: Option<bool>,

    /// Configuration file (defaults to the platform config file)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl ConfigArgs {
    /// Execute config subcommand
    pub fn execute(&self) -> CliResult<()> {
        match &self.command {
            ConfigCommand::Show(args) => args.execute(),
            ConfigCommand::Path(args) => args.execute(),
            ConfigCommand::Set(args) => args.execute(),
        }
    }
}

impl ConfigShowArgs {
    /// Execute show command
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config(self.config.as_deref())?;

        if self.json {
            print_json(&config)?;
        } else {
            output_human_readable(&config);
        }

        Ok(())
    }
}

impl ConfigPathArgs {
    /// Execute path command
    pub fn execute(&self) -> CliResult<()> {
        let path = Config::config_file_path()
            .map_err(|e| CliError::io(format!("Failed to resolve config path: {e}")))?;
        println!("{}", path.display());
        Ok(())
    }
}

impl ConfigSetArgs {
    /// Execute set command
    pub fn execute(&self) -> CliResult<()> {
        if self.pixels_per_mm.is_none()
            && self.pixel_ratio.is_none()
            && self.door_gap.is_none()
            && self.rules_enabled.is_none()
        {
            return Err(CliError::validation(
                "At least one configuration option must be specified: --pixels-per-mm, --pixel-ratio, --door-gap, or --rules-enabled",
            ));
        }

        let mut config = load_config(self.config.as_deref())?;
        self.apply(&mut config);

        config
            .validate()
            .map_err(|e| CliError::validation(format!("Invalid configuration: {e}")))?;

        let saved = match &self.config {
            Some(path) => config.save_to(path),
            None => config.save(),
        };
        saved.map_err(|e| CliError::io(format!("Failed to save configuration: {e:#}")))?;

        println!("Configuration updated successfully.");

        Ok(())
    }

    fn apply(&self, config: &mut Config) {
        if let Some(value) = self.pixels_per_mm {
            config.render.pixels_per_mm = value;
        }
        if let Some(value) = self.pixel_ratio {
            config.export.pixel_ratio = value;
        }
        if let Some(value) = self.door_gap {
            config.render.door_gap = value;
        }
        if let Some(value) = self.rules_enabled {
            config.editor.rules_enabled = value;
        }
    }
}

/// Output configuration in human-readable format
fn output_human_readable(config: &Config) {
    println!("Planogram Configuration");
    println!("=======================");
    println!();

    println!("Render:");
    println!("  Pixels per mm:     {}", config.render.pixels_per_mm);
    println!("  Frame border:      {}", config.render.frame_border);
    println!("  Header height:     {}", config.render.header_height);
    println!("  Grille height:     {}", config.render.grille_height);
    println!("  Door gap:          {}", config.render.door_gap);
    println!(
        "  Shelf correction:  {}",
        config.render.shelf_thickness_correction
    );
    println!();

    println!("Export:");
    println!("  Pixel ratio:       {}", config.export.pixel_ratio);
    println!();

    println!("Editor:");
    println!("  Rules enabled:     {}", config.editor.rules_enabled);
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_applies_only_given_values() {
        let args = ConfigSetArgs {
            pixels_per_mm: None,
            pixel_ratio: Some(2.0),
            door_gap: None,
            rules_enabled: Some(false),
            config: None,
        };
        let mut config = Config::default();
        args.apply(&mut config);

        assert!((config.export.pixel_ratio - 2.0).abs() < f64::EPSILON);
        assert!(!config.editor.rules_enabled);
        assert_eq!(config.render, Config::default().render);
    }
}
