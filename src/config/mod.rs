use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Settings read from `stlmesh.toml`
///
/// Command-line flags take precedence over every value here.
#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub json: bool,
    #[serde(default)]
    pub validate: bool,
    /// Number of triangles to print
    #[serde(default)]
    pub list: usize,
}

impl FileConfig {
    /// Load the first config file found in the search paths
    pub fn load() -> Option<Self> {
        for path in get_config_paths() {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        // Runs before logging is set up
                        eprintln!("Warning: Failed to parse config file {}: {}", path.display(), e);
                    }
                }
            }
        }
        None
    }

    /// Load an explicitly requested config file
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("Config file not found: {}", path.display());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("stlmesh.toml"));
    paths.push(PathBuf::from(".stlmesh.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("stlmesh").join("config.toml"));
        paths.push(config_dir.join("stlmesh.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".stlmesh.toml"));
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn test_from_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stlmesh.toml");
        fs::write(&path, "verbose = true\nlist = 5\n").unwrap();

        let config = FileConfig::from_path(&path).unwrap();
        assert!(config.verbose);
        assert!(!config.json);
        assert_eq!(config.list, 5);
    }

    #[test]
    fn test_from_path_missing() {
        let dir = tempdir().unwrap();
        let err = FileConfig::from_path(&dir.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "colour = \"red\"\n").unwrap();
        assert!(FileConfig::from_path(&path).is_err());
    }

    #[test]
    fn test_search_paths_start_in_working_dir() {
        let paths = get_config_paths();
        assert_eq!(paths[0], PathBuf::from("stlmesh.toml"));
        assert_eq!(paths[1], PathBuf::from(".stlmesh.toml"));
    }
}
