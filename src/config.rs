use std::path::Path;

use crate::error::Error;

/// Project configuration loaded from `.yamlnav.toml`.
/// Include/exclude patterns are path prefixes applied to the workspace-
/// relative paths of candidate YAML files during a reverse search.
pub struct Config {
    exclude: Vec<String>,
    include: Vec<String>,
}

/// Raw TOML structure for `.yamlnav.toml`.
#[derive(serde::Deserialize)]
struct YamlnavTomlConfig {
    #[serde(default)]
    exclude: Vec<String>,
    #[serde(default)]
    include: Vec<String>,
}

impl Config {
    /// Load config from `.yamlnav.toml` in the given root directory.
    /// Returns a default that scans everything if the file doesn't exist.
    /// Returns an error if the file exists but is malformed — never silently
    /// falls back to defaults when the user wrote a config file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(".yamlnav.toml");
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::scan_everything_by_default());
            },
            Err(e) => return Err(Error::Io(e)),
        };

        let raw: YamlnavTomlConfig = toml::from_str(&content)?;
        Ok(Config {
            exclude: raw.exclude,
            include: raw.include,
        })
    }

    /// Default config that includes everything and excludes nothing.
    pub fn scan_everything_by_default() -> Self {
        Config {
            exclude: Vec::new(),
            include: Vec::new(),
        }
    }

    /// Check whether a workspace-relative YAML file path should be scanned.
    ///
    /// A path is included if no include patterns are set (scan everything),
    /// or if the path starts with at least one include pattern.
    /// An included path is then excluded if it starts with any exclude
    /// pattern.
    pub fn should_scan(&self, relative_path: &str) -> bool {
        let included = self.include.is_empty()
            || self
                .include
                .iter()
                .any(|prefix| relative_path.starts_with(prefix.as_str()));

        if !included {
            return false;
        }

        !self
            .exclude
            .iter()
            .any(|prefix| relative_path.starts_with(prefix.as_str()))
    }
}
