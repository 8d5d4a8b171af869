//! Configuration loading and management
//!
//! Handles parsing of `.todo.toml` configuration files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// File name looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = ".todo.toml";

/// File name looked up in the user config directory.
pub const USER_CONFIG_FILE: &str = "config.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Screen text and behavior of the terminal UI
    #[serde(default)]
    pub ui: UiConfig,

    /// Tasks configuration
    #[serde(default)]
    pub tasks: TasksConfig,
}

/// Terminal UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Header title; the first half and second half are drawn in two colors
    #[serde(default = "default_title")]
    pub title: String,

    /// Placeholder shown in the empty input line
    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    /// Label for the total task counter
    #[serde(default = "default_created_label")]
    pub created_label: String,

    /// Label for the completed task counter
    #[serde(default = "default_completed_label")]
    pub completed_label: String,

    /// Headline of the empty-list panel
    #[serde(default = "default_empty_title")]
    pub empty_title: String,

    /// Second line of the empty-list panel
    #[serde(default = "default_empty_hint")]
    pub empty_hint: String,

    /// Ask before deleting a task
    #[serde(default)]
    pub confirm_delete: bool,
}

fn default_title() -> String {
    "ToDo".to_string()
}

fn default_placeholder() -> String {
    "Add a new task".to_string()
}

fn default_created_label() -> String {
    "created tasks".to_string()
}

fn default_completed_label() -> String {
    "completed".to_string()
}

fn default_empty_title() -> String {
    "You don't have any tasks yet".to_string()
}

fn default_empty_hint() -> String {
    "Create tasks and organize your to-do items".to_string()
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            placeholder: default_placeholder(),
            created_label: default_created_label(),
            completed_label: default_completed_label(),
            empty_title: default_empty_title(),
            empty_hint: default_empty_hint(),
            confirm_delete: false,
        }
    }
}

/// Tasks configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TasksConfig {
    /// Tasks present when the list opens, in display order
    #[serde(default)]
    pub initial: Vec<String>,
}

impl UiConfig {
    fn validate(&self) -> Result<()> {
        let labels = [
            ("ui.title", &self.title),
            ("ui.placeholder", &self.placeholder),
            ("ui.created_label", &self.created_label),
            ("ui.completed_label", &self.completed_label),
            ("ui.empty_title", &self.empty_title),
            ("ui.empty_hint", &self.empty_hint),
        ];
        for (field, value) in labels {
            if value.trim().is_empty() {
                return Err(Error::InvalidConfig(format!("{field} cannot be empty")));
            }
        }
        Ok(())
    }
}

impl TasksConfig {
    fn validate(&self) -> Result<()> {
        for (idx, entry) in self.initial.iter().enumerate() {
            if entry.trim().is_empty() {
                return Err(Error::InvalidConfig(format!(
                    "tasks.initial[{idx}] cannot be empty"
                )));
            }
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a directory's `.todo.toml`, or return defaults
    pub fn load_from_dir(dir: &Path) -> Self {
        let config_path = dir.join(LOCAL_CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path).unwrap_or_else(|err| {
                tracing::warn!(path = %config_path.display(), error = %err, "ignoring config");
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Resolve the effective configuration.
    ///
    /// An explicit path must exist and parse. Otherwise `.todo.toml` in `cwd`
    /// wins over the user config file; unreadable implicit files fall back
    /// to defaults.
    pub fn resolve(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Error::ConfigNotFound(path.to_path_buf()));
            }
            return Self::load(path);
        }

        if cwd.join(LOCAL_CONFIG_FILE).exists() {
            return Ok(Self::load_from_dir(cwd));
        }

        if let Some(path) = user_config_path().filter(|path| path.exists()) {
            return Ok(Self::load(&path).unwrap_or_else(|err| {
                tracing::warn!(path = %path.display(), error = %err, "ignoring config");
                Self::default()
            }));
        }

        Ok(Self::default())
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|err| Error::OperationFailed(format!("failed to encode config: {err}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        self.ui.validate()?;
        self.tasks.validate()?;
        Ok(())
    }
}

/// Location of the per-user config file, when the platform has one.
pub fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "todo")
        .map(|dirs| dirs.config_dir().join(USER_CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_are_expected() {
        let cfg = Config::default();
        assert_eq!(cfg.ui.title, "ToDo");
        assert_eq!(cfg.ui.placeholder, "Add a new task");
        assert_eq!(cfg.ui.created_label, "created tasks");
        assert_eq!(cfg.ui.completed_label, "completed");
        assert!(!cfg.ui.confirm_delete);
        assert!(cfg.tasks.initial.is_empty());
    }

    #[test]
    fn load_from_dir_defaults_when_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from_dir(dir.path());
        assert_eq!(cfg.ui.title, "ToDo");
    }

    #[test]
    fn load_from_dir_reads_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(LOCAL_CONFIG_FILE);
        fs::write(&path, "[ui]\ntitle = \"Chores\"").expect("write config");

        let cfg = Config::load_from_dir(dir.path());
        assert_eq!(cfg.ui.title, "Chores");
        assert_eq!(cfg.ui.placeholder, "Add a new task");
    }

    #[test]
    fn load_rejects_blank_initial_task() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("todo.toml");
        fs::write(&path, "[tasks]\ninitial = [\"ok\", \"  \"]").expect("write config");

        let err = Config::load(&path).expect_err("blank entry");
        assert!(err.to_string().contains("tasks.initial[1]"));
    }

    #[test]
    fn resolve_requires_explicit_path_to_exist() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("nope.toml");
        let err = Config::resolve(Some(&missing), dir.path()).expect_err("missing");
        assert!(matches!(err, Error::ConfigNotFound(_)));
    }

    #[test]
    fn save_writes_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.toml");
        let cfg = Config::default();
        cfg.save(&path).expect("save config");

        let written = fs::read_to_string(&path).expect("read config");
        assert!(written.contains("title = \"ToDo\""));
        let reloaded = Config::load(&path).expect("reload");
        assert_eq!(reloaded.ui.empty_hint, cfg.ui.empty_hint);
    }
}
