//! dragboard - Entry Point

use clap::Parser;
use dragboard::config::{
    apply_cli_overrides, apply_env_overrides, load_config_with_precedence, merge_config,
    CliOverrides, EngineConfig,
};
use dragboard::model::AppError;
use dragboard::source::{demo_board, load_board};
use dragboard::state::BoardRepository;
use std::path::PathBuf;
use tracing::info;

/// dragboard - reorder cards and columns on a terminal board
#[derive(Parser, Debug)]
#[command(name = "dragboard")]
#[command(version)]
#[command(about = "Drag cards between columns of a board in the terminal")]
pub struct Args {
    /// Path to a board JSON file (a demo board is shown if not provided)
    pub board: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Auto-scroll speed factor (larger is slower)
    #[arg(long)]
    pub speed: Option<f32>,

    /// Scroll the board vertically instead of horizontally
    #[arg(long)]
    pub vertical: bool,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            drag_speed_factor: self.speed,
            horizontal: self.vertical.then_some(false),
        }
    }
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = load_config_with_precedence(args.config.clone())?;
        let merged = merge_config(config_file);
        let with_env = apply_env_overrides(merged);
        apply_cli_overrides(with_env, &args.overrides())
    };
    config.validate()?;

    dragboard::logging::init(&config.log_file_path)?;

    info!(config = ?config, "Configuration loaded and resolved");

    let data = match &args.board {
        Some(path) => load_board(path)?,
        None => demo_board(),
    };
    let repo = BoardRepository::from_data(data)?;

    dragboard::view::run(repo, EngineConfig::from(&config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_help_does_not_error() {
        let result = Args::try_parse_from(["dragboard", "--help"]);
        assert_eq!(result.unwrap_err().kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_does_not_error() {
        let result = Args::try_parse_from(["dragboard", "--version"]);
        assert_eq!(result.unwrap_err().kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_no_args_defaults() {
        let args = Args::parse_from(["dragboard"]);
        assert_eq!(args.board, None);
        assert_eq!(args.config, None);
        assert_eq!(args.speed, None);
        assert!(!args.vertical);
        assert_eq!(args.overrides(), CliOverrides::default());
    }

    #[test]
    fn test_board_path_populates_board_field() {
        let args = Args::parse_from(["dragboard", "sprint.json"]);
        assert_eq!(args.board, Some(PathBuf::from("sprint.json")));
    }

    #[test]
    fn test_speed_rejects_non_number() {
        let result = Args::try_parse_from(["dragboard", "--speed", "fast"]);
        assert_eq!(result.unwrap_err().kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_vertical_and_speed_become_overrides() {
        let args = Args::parse_from(["dragboard", "--vertical", "--speed", "2.5"]);
        let overrides = args.overrides();
        assert_eq!(overrides.horizontal, Some(false));
        assert_eq!(overrides.drag_speed_factor, Some(2.5));
    }

    #[test]
    fn test_cli_speed_flows_through_precedence_chain() {
        use dragboard::config::ConfigFile;

        let file = ConfigFile {
            drag_speed_factor: Some(3.0),
            ..ConfigFile::default()
        };
        let merged = merge_config(Some(file));
        assert_eq!(merged.drag_speed_factor, 3.0);

        let args = Args::parse_from(["dragboard", "--speed", "0.5"]);
        let resolved = apply_cli_overrides(merged, &args.overrides());
        assert_eq!(resolved.drag_speed_factor, 0.5);
        assert!(resolved.validate().is_ok());
    }
}
