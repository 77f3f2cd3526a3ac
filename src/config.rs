use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tileweave_solver::SolverConfig;

/// Global log level for the application.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

/// Configuration for the tileweave generator.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct AppConfig {
    /// Path to the RON rule file defining tiles and adjacencies.
    #[arg(short, long, value_name = "FILE")]
    pub rule_file: PathBuf,

    /// Width of the output grid.
    #[arg(long, default_value_t = 10)]
    pub width: usize,

    /// Height of the output grid.
    #[arg(long, default_value_t = 10)]
    pub height: usize,

    /// World-space distance between neighboring cells.
    #[arg(long, default_value_t = 100.0)]
    pub spacing: f32,

    /// Optional seed for the random number generator.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Maximum collapse iterations per attempt.
    #[arg(long, default_value_t = 1000)]
    pub max_iterations: u32,

    /// Maximum solve attempts before giving up.
    #[arg(long, default_value_t = 5)]
    pub max_retries: u32,

    /// Disable snapshot backtracking on contradictions.
    #[arg(long, default_value_t = false)]
    pub no_backtracking: bool,

    /// Number of snapshots kept for backtracking.
    #[arg(long, default_value_t = 10)]
    pub max_backtrack_steps: usize,

    /// Disable fallback tile injection when recovery fails.
    #[arg(long, default_value_t = false)]
    pub no_fallback: bool,

    /// Optional path to also write the rendered grid to.
    #[arg(short, long, value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Global log level. RUST_LOG still overrides per-module levels.
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

impl AppConfig {
    /// Maps the command-line arguments onto a solver configuration. An
    /// unset seed keeps the solver's default.
    pub fn solver_config(&self) -> SolverConfig {
        let mut builder = SolverConfig::builder()
            .dimensions(self.width, self.height)
            .spacing(self.spacing)
            .max_iterations(self.max_iterations)
            .max_retries(self.max_retries)
            .backtracking(!self.no_backtracking)
            .max_backtrack_steps(self.max_backtrack_steps)
            .allow_fallback(!self.no_fallback);
        if let Some(seed) = self.seed {
            builder = builder.seed(seed);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_args() {
        let args = vec!["tileweave", "--rule-file", "rules.ron", "--width", "20"];
        let config = AppConfig::try_parse_from(args).unwrap();
        assert_eq!(config.rule_file, PathBuf::from("rules.ron"));
        assert_eq!(config.width, 20);
        assert_eq!(config.height, 10); // Default
        assert_eq!(config.seed, None); // Default
        assert_eq!(config.log_level, LogLevel::Info); // Default
        assert!(!config.no_backtracking);
    }

    #[test]
    fn test_missing_rule_file_fails() {
        let args = vec!["tileweave", "--width", "20"];
        assert!(AppConfig::try_parse_from(args).is_err());
    }

    #[test]
    fn test_solver_config_mapping() {
        let args = vec![
            "tileweave",
            "--rule-file",
            "r.ron",
            "--width",
            "4",
            "--height",
            "6",
            "--seed",
            "77",
            "--no-backtracking",
            "--no-fallback",
            "--max-retries",
            "9",
        ];
        let config = AppConfig::try_parse_from(args).unwrap();
        let solver = config.solver_config();
        assert_eq!(solver.width, 4);
        assert_eq!(solver.height, 6);
        assert_eq!(solver.seed, 77);
        assert_eq!(solver.max_retries, 9);
        assert!(!solver.backtracking);
        assert!(!solver.allow_fallback);
    }

    #[test]
    fn test_unset_seed_keeps_solver_default() {
        let args = vec!["tileweave", "--rule-file", "r.ron"];
        let config = AppConfig::try_parse_from(args).unwrap();
        let default = SolverConfig::default();
        assert_eq!(config.solver_config().seed, default.seed);
    }
}
