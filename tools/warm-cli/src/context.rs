//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::config::CliConfig;
use crate::output::Output;

/// Config file names, in lookup order.
pub const CONFIG_NAMES: [&str; 3] = ["edge-warm.toml", ".edge-warm.toml", "edge-warm.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Path the configuration was loaded from.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        Self::load_from(cwd, config_path, output)
    }

    /// Load context relative to a working directory.
    pub fn load_from(cwd: PathBuf, config_path: Option<&str>, output: Output) -> Result<Self> {
        let (config, config_path) = if let Some(path) = config_path {
            (CliConfig::load(path)?, Some(PathBuf::from(path)))
        } else {
            // Try to find config in current directory or parent directories
            match Self::find_config(&cwd)? {
                Some(path) => {
                    let config = CliConfig::load(&path.to_string_lossy())?;
                    (config, Some(path))
                }
                None => (CliConfig::default(), None),
            }
        };

        if let Some(path) = &config_path {
            tracing::debug!(path = %path.display(), "loaded configuration");
        }

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Result<Option<PathBuf>> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    return Ok(Some(config_path));
                }
            }

            if !current.pop() {
                break;
            }
        }

        Ok(None)
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_config_in_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("edge-warm.toml"),
            "[static_caching]\nstrategy = \"half\"\n",
        )
        .unwrap();
        let nested = dir.path().join("site").join("pages");
        std::fs::create_dir_all(&nested).unwrap();

        let ctx = Context::load_from(nested, None, Output::new(false, false)).unwrap();

        assert_eq!(ctx.config.static_caching.strategy.as_deref(), Some("half"));
        assert_eq!(ctx.config_path, Some(dir.path().join("edge-warm.toml")));
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("edge-warm.toml"), "[static_caching\n").unwrap();

        let result = Context::load_from(dir.path().to_path_buf(), None, Output::new(false, false));

        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_path() {
        let ctx = Context {
            config: CliConfig::default(),
            config_path: None,
            output: Output::new(false, false),
            cwd: PathBuf::from("/srv/site"),
        };

        assert_eq!(ctx.resolve_path("routes.txt"), PathBuf::from("/srv/site/routes.txt"));
        assert_eq!(ctx.resolve_path("/etc/routes.txt"), PathBuf::from("/etc/routes.txt"));
    }
}
