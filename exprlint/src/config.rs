use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::constants::{CONFIG_FILENAME, CONFIG_FILENAME_ALT};

#[derive(Debug, Deserialize, Default, Clone)]
/// Top-level configuration struct.
pub struct Config {
    #[serde(default)]
    /// The main configuration section for exprlint.
    pub exprlint: ExprlintConfig,
    /// The path to the configuration file this was loaded from.
    /// Set during `load_from_path`, `None` if using defaults or programmatic config.
    #[serde(skip)]
    pub config_file_path: Option<std::path::PathBuf>,
}

#[derive(Debug, Deserialize, Default, Clone)]
/// Configuration options for exprlint.
pub struct ExprlintConfig {
    /// List of rule codes to ignore.
    pub ignore: Option<Vec<String>>,
    /// List of folders to exclude.
    pub exclude_folders: Option<Vec<String>>,
    /// Exit with code 1 when findings remain (for CI).
    pub fail_on_findings: Option<bool>,
}

impl ExprlintConfig {
    /// Whether a rule code is on the ignore list (case-insensitive).
    #[must_use]
    pub fn is_ignored(&self, rule_id: &str) -> bool {
        self.ignore
            .as_ref()
            .is_some_and(|ids| ids.iter().any(|id| id.eq_ignore_ascii_case(rule_id)))
    }
}

impl Config {
    /// Loads configuration from default locations in the current directory.
    #[must_use]
    pub fn load() -> Self {
        Self::load_from_path(Path::new("."))
    }

    /// Loads configuration starting from a specific path and traversing up.
    #[must_use]
    pub fn load_from_path(path: &Path) -> Self {
        let mut current = path.to_path_buf();
        if current.is_file() {
            current.pop();
        }

        loop {
            for filename in [CONFIG_FILENAME, CONFIG_FILENAME_ALT] {
                let candidate = current.join(filename);
                if candidate.exists() {
                    if let Ok(content) = fs::read_to_string(&candidate) {
                        if let Ok(mut config) = toml::from_str::<Self>(&content) {
                            config.config_file_path = Some(candidate);
                            return config;
                        }
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_path_no_config() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from_path(dir.path());
        assert!(config.exprlint.ignore.is_none());
        assert!(config.config_file_path.is_none());
    }

    #[test]
    fn test_load_from_path_exprlint_toml() {
        let dir = TempDir::new().unwrap();
        let mut file = std::fs::File::create(dir.path().join(".exprlint.toml")).unwrap();
        writeln!(
            file,
            r#"[exprlint]
ignore = ["EXL-E001"]
fail_on_findings = true
"#
        )
        .unwrap();

        let config = Config::load_from_path(dir.path());
        assert_eq!(config.exprlint.fail_on_findings, Some(true));
        assert!(config.exprlint.is_ignored("EXL-E001"));
        assert!(config.exprlint.is_ignored("exl-e001"));
        assert!(!config.exprlint.is_ignored("EXL-W001"));
    }

    #[test]
    fn test_load_from_path_traverses_up() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("rules").join("checks");
        std::fs::create_dir_all(&nested).unwrap();

        let mut file = std::fs::File::create(dir.path().join("exprlint.toml")).unwrap();
        writeln!(
            file,
            r#"[exprlint]
exclude_folders = ["legacy"]
"#
        )
        .unwrap();

        let config = Config::load_from_path(&nested);
        assert_eq!(
            config.exprlint.exclude_folders,
            Some(vec!["legacy".to_owned()])
        );
    }

    #[test]
    fn test_load_from_file_path() {
        let dir = TempDir::new().unwrap();
        let mut file = std::fs::File::create(dir.path().join(".exprlint.toml")).unwrap();
        writeln!(
            file,
            r"[exprlint]
fail_on_findings = false
"
        )
        .unwrap();

        let expr_file = dir.path().join("rules.expr");
        std::fs::write(&expr_file, "x > 1\n").unwrap();

        // Load from file path (not directory)
        let config = Config::load_from_path(&expr_file);
        assert_eq!(config.exprlint.fail_on_findings, Some(false));
    }
}
