use bevy::prelude::Resource;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Resource)]
#[command(name = "iterview")]
#[command(about = "A 3D viewer for per-iteration PLY reconstruction checkpoints", long_about = None)]
pub struct Args {
    /// Directory holding `{model}.ply` and `{model}_model_{iter}.ply` files
    #[arg(default_value = "models")]
    pub path: PathBuf,

    /// Model to show first (defaults to the first catalog entry)
    #[arg(long, short = 'm', value_name = "NAME")]
    pub model: Option<String>,

    /// Comma-separated model names, overriding the catalog
    #[arg(long, value_delimiter = ',', value_name = "NAMES")]
    pub names: Option<Vec<String>>,

    /// Comma-separated checkpoint numbers, overriding the catalog
    #[arg(long, value_delimiter = ',', value_name = "ITERATIONS")]
    pub iterations: Option<Vec<u32>>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Log frame-time diagnostics
    #[arg(long)]
    pub diagnostics: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Args::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["iterview"]);
        assert_eq!(args.path, PathBuf::from("models"));
        assert!(args.model.is_none());
        assert!(args.names.is_none());
        assert!(!args.verbose);
    }

    #[test]
    fn test_catalog_overrides() {
        let args = Args::parse_from([
            "iterview",
            "data/ply",
            "--model",
            "cat",
            "--names",
            "dolphin,cat",
            "--iterations",
            "0,5,10",
        ]);
        assert_eq!(args.path, PathBuf::from("data/ply"));
        assert_eq!(args.model.as_deref(), Some("cat"));
        assert_eq!(
            args.names,
            Some(vec!["dolphin".to_string(), "cat".to_string()])
        );
        assert_eq!(args.iterations, Some(vec![0, 5, 10]));
    }

    #[test]
    fn test_rejects_non_numeric_iterations() {
        assert!(Args::try_parse_from(["iterview", "--iterations", "0,five"]).is_err());
    }
}
