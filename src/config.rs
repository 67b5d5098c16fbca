use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::analysis::DEFAULT_MINIMUM_WORDS;
use crate::ingest::IdColumn;
use crate::results::DEFAULT_OUTPUT_DIR;

#[derive(Debug, Clone)]
pub struct Config {
    pub model_path: Option<PathBuf>,
    pub separator: u8,
    pub id_column: IdColumn,
    pub minimum_words: usize,
    pub output_dir: PathBuf,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct FileConfig {
    model_path: Option<PathBuf>,
    separator: Option<String>,
    id_column: Option<String>,
    synthesize_ids: Option<bool>,
    minimum_words: Option<usize>,
    output_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub model_path: Option<PathBuf>,
    pub separator: Option<char>,
    pub id_column: Option<String>,
    pub synthesize_ids: bool,
    pub minimum_words: Option<usize>,
    pub output_dir: Option<PathBuf>,
}

impl Config {
    pub fn load(config_path: Option<PathBuf>, overrides: ConfigOverrides) -> Result<Self> {
        let file_config = load_file_config(config_path.as_ref())?;

        let model_path = overrides
            .model_path
            .or(file_config.model_path)
            .or_else(|| env::var("DAT_MODEL").ok().map(PathBuf::from));

        let separator_char = match overrides.separator {
            Some(sep) => sep,
            None => match file_config.separator.as_deref() {
                Some(raw) => parse_separator(raw)?,
                None => ';',
            },
        };
        if !separator_char.is_ascii() {
            anyhow::bail!("separator {separator_char:?} must be a single ASCII character");
        }
        let separator = separator_char as u8;

        let id_column = if overrides.synthesize_ids || file_config.synthesize_ids == Some(true) {
            IdColumn::Synthesized
        } else {
            overrides
                .id_column
                .or(file_config.id_column)
                .map(|raw| parse_id_column(&raw))
                .unwrap_or_default()
        };

        let minimum_words = overrides
            .minimum_words
            .or(file_config.minimum_words)
            .unwrap_or(DEFAULT_MINIMUM_WORDS);
        if minimum_words < 2 {
            anyhow::bail!("minimum_words must be at least 2, got {minimum_words}");
        }

        let output_dir = overrides
            .output_dir
            .or(file_config.output_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        Ok(Self {
            model_path,
            separator,
            id_column,
            minimum_words,
            output_dir,
        })
    }
}

/// A bare integer selects the column by position; anything else is a name.
pub fn parse_id_column(raw: &str) -> IdColumn {
    match raw.trim().parse::<usize>() {
        Ok(index) => IdColumn::ByPosition(index),
        Err(_) => IdColumn::ByName(raw.trim().to_string()),
    }
}

fn parse_separator(raw: &str) -> Result<char> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(sep), None) => Ok(sep),
        _ => anyhow::bail!("separator must be exactly one character, got {raw:?}"),
    }
}

fn load_file_config(path: Option<&PathBuf>) -> Result<FileConfig> {
    if let Some(path) = path {
        if path.exists() {
            return read_config_from_path(path);
        }
        anyhow::bail!("config path {:?} does not exist", path);
    }

    if let Some(default_path) = default_config_path() {
        if default_path.exists() {
            return read_config_from_path(&default_path);
        }
    }

    Ok(FileConfig::default())
}

fn read_config_from_path(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    toml::from_str(&raw)
        .with_context(|| format!("failed to parse config file at {}", path.display()))
}

fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "dat-cli", "dat-cli")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn empty_config_file(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("config.toml");
        fs::write(&path, "").unwrap();
        path
    }

    #[test]
    fn defaults_apply_without_file_values_or_overrides() {
        let dir = TempDir::new().unwrap();
        let path = empty_config_file(&dir);

        let config = Config::load(Some(path), ConfigOverrides::default()).unwrap();

        assert_eq!(config.separator, b';');
        assert_eq!(config.id_column, IdColumn::ByPosition(0));
        assert_eq!(config.minimum_words, DEFAULT_MINIMUM_WORDS);
        assert_eq!(config.output_dir, PathBuf::from("results"));
    }

    #[test]
    fn overrides_take_precedence_over_file_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "separator = \",\"\nid_column = \"code\"\nminimum_words = 5\n",
        )
        .unwrap();

        let overrides = ConfigOverrides {
            separator: Some('|'),
            minimum_words: Some(4),
            ..ConfigOverrides::default()
        };
        let config = Config::load(Some(path), overrides).unwrap();

        assert_eq!(config.separator, b'|');
        assert_eq!(config.id_column, IdColumn::ByName("code".to_string()));
        assert_eq!(config.minimum_words, 4);
    }

    #[test]
    fn synthesize_flag_beats_configured_id_column() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "id_column = \"code\"\n").unwrap();

        let overrides = ConfigOverrides {
            synthesize_ids: true,
            ..ConfigOverrides::default()
        };
        let config = Config::load(Some(path), overrides).unwrap();

        assert_eq!(config.id_column, IdColumn::Synthesized);
    }

    #[test]
    fn parses_numeric_id_column_as_position() {
        assert_eq!(parse_id_column("2"), IdColumn::ByPosition(2));
        assert_eq!(parse_id_column("code"), IdColumn::ByName("code".to_string()));
        assert_eq!(parse_id_column(" id "), IdColumn::ByName("id".to_string()));
    }

    #[test]
    fn rejects_multi_character_separator() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "separator = \";;\"\n").unwrap();

        assert!(Config::load(Some(path), ConfigOverrides::default()).is_err());
    }

    #[test]
    fn rejects_minimum_words_below_two() {
        let dir = TempDir::new().unwrap();
        let path = empty_config_file(&dir);

        let overrides = ConfigOverrides {
            minimum_words: Some(1),
            ..ConfigOverrides::default()
        };

        assert!(Config::load(Some(path), overrides).is_err());
    }
}
