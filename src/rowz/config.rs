use crate::error::{Result, RowzError};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_FILE_EXT: &str = ".csv";
const DEFAULT_DELIMITER: char = ',';

/// Configuration for rowz, stored as `config.json` in the config directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RowzConfig {
    /// Field delimiter for reading and writing files
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Extension given to new files and used when listing files (e.g. ".csv", ".tsv")
    #[serde(default = "default_file_ext")]
    pub file_ext: String,

    /// Rewrite files through a temporary file and a rename
    #[serde(default = "default_atomic_writes")]
    pub atomic_writes: bool,
}

fn default_delimiter() -> char {
    DEFAULT_DELIMITER
}

fn default_file_ext() -> String {
    DEFAULT_FILE_EXT.to_string()
}

fn default_atomic_writes() -> bool {
    true
}

impl Default for RowzConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            file_ext: DEFAULT_FILE_EXT.to_string(),
            atomic_writes: true,
        }
    }
}

pub const CONFIG_KEYS: &[&str] = &["delimiter", "file-ext", "atomic-writes"];

impl RowzConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(RowzError::Io)?;
        let mut config: RowzConfig =
            serde_json::from_str(&content).map_err(RowzError::Serialization)?;
        if let Err(reason) = parse_delimiter(&config.delimiter.to_string()) {
            warn!(
                "{}: {}, using {:?}",
                config_path.display(),
                reason,
                DEFAULT_DELIMITER
            );
            config.delimiter = DEFAULT_DELIMITER;
        }
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(RowzError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(RowzError::Serialization)?;
        fs::write(config_path, content).map_err(RowzError::Io)?;
        Ok(())
    }

    /// The delimiter as the single byte the CSV codec expects
    pub fn delimiter_byte(&self) -> u8 {
        if self.delimiter.is_ascii() {
            self.delimiter as u8
        } else {
            DEFAULT_DELIMITER as u8
        }
    }

    pub fn get_file_ext(&self) -> &str {
        &self.file_ext
    }

    /// Set the file extension (normalizes to start with a dot)
    pub fn set_file_ext(&mut self, ext: &str) {
        if ext.starts_with('.') {
            self.file_ext = ext.to_string();
        } else {
            self.file_ext = format!(".{}", ext);
        }
    }

    /// Appends the configured extension unless the name already ends with it
    pub fn with_extension(&self, name: &str) -> String {
        if name.to_lowercase().ends_with(&self.file_ext.to_lowercase()) {
            name.to_string()
        } else {
            format!("{}{}", name, self.file_ext)
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "delimiter" => Some(display_delimiter(self.delimiter)),
            "file-ext" => Some(self.file_ext.clone()),
            "atomic-writes" => Some(self.atomic_writes.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "delimiter" => {
                self.delimiter = parse_delimiter(value)?;
                Ok(())
            }
            "file-ext" => {
                if value.trim().is_empty() {
                    return Err("file-ext cannot be empty".to_string());
                }
                self.set_file_ext(value.trim());
                Ok(())
            }
            "atomic-writes" => {
                self.atomic_writes = value
                    .parse()
                    .map_err(|_| format!("atomic-writes must be true or false, got: {}", value))?;
                Ok(())
            }
            other => Err(format!(
                "Unknown config key: {} (known keys: {})",
                other,
                CONFIG_KEYS.join(", ")
            )),
        }
    }

    pub fn entries(&self) -> Vec<(String, String)> {
        CONFIG_KEYS
            .iter()
            .filter_map(|k| self.get(k).map(|v| (k.to_string(), v)))
            .collect()
    }
}

/// Accepts a literal single ASCII character or one of `tab`, `\t`, `comma`, `semicolon`, `pipe`.
pub fn parse_delimiter(value: &str) -> std::result::Result<char, String> {
    let c = match value {
        "tab" | "\\t" => '\t',
        "comma" => ',',
        "semicolon" => ';',
        "pipe" => '|',
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => return Err(format!("Delimiter must be a single character, got: {}", other)),
            }
        }
    };
    if !c.is_ascii() || c == '"' || c == '\n' || c == '\r' {
        return Err(format!("Unsupported delimiter: {:?}", c));
    }
    Ok(c)
}

fn display_delimiter(c: char) -> String {
    match c {
        '\t' => "tab".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = RowzConfig::default();
        assert_eq!(config.file_ext, ".csv");
        assert_eq!(config.delimiter, ',');
        assert!(config.atomic_writes);
    }

    #[test]
    fn test_set_file_ext_without_dot() {
        let mut config = RowzConfig::default();
        config.set_file_ext("tsv");
        assert_eq!(config.file_ext, ".tsv");
    }

    #[test]
    fn test_with_extension() {
        let config = RowzConfig::default();
        assert_eq!(config.with_extension("people"), "people.csv");
        assert_eq!(config.with_extension("people.CSV"), "people.CSV");
    }

    #[test]
    fn test_set_known_and_unknown_keys() {
        let mut config = RowzConfig::default();
        config.set("delimiter", "tab").unwrap();
        assert_eq!(config.delimiter, '\t');
        assert_eq!(config.get("delimiter").as_deref(), Some("tab"));

        config.set("atomic-writes", "false").unwrap();
        assert!(!config.atomic_writes);

        assert!(config.set("atomic-writes", "maybe").is_err());
        assert!(config.set("color", "red").is_err());
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(";"), Ok(';'));
        assert_eq!(parse_delimiter("pipe"), Ok('|'));
        assert!(parse_delimiter("\"").is_err());
        assert!(parse_delimiter(";;").is_err());
        assert!(parse_delimiter("é").is_err());
    }

    #[test]
    fn test_load_missing_config() {
        let dir = TempDir::new().unwrap();
        let config = RowzConfig::load(dir.path().join("nested")).unwrap();
        assert_eq!(config, RowzConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();

        let mut config = RowzConfig::default();
        config.set("delimiter", ";").unwrap();
        config.save(dir.path()).unwrap();

        let loaded = RowzConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.delimiter, ';');
    }

    #[test]
    fn test_unusable_delimiter_falls_back_to_comma() {
        let dir = TempDir::new().unwrap();

        fs::write(dir.path().join(CONFIG_FILENAME), r#"{"delimiter": "\""}"#).unwrap();
        assert_eq!(RowzConfig::load(dir.path()).unwrap().delimiter, ',');

        fs::write(dir.path().join(CONFIG_FILENAME), r#"{"delimiter": "é"}"#).unwrap();
        assert_eq!(RowzConfig::load(dir.path()).unwrap().delimiter, ',');

        fs::write(dir.path().join(CONFIG_FILENAME), r#"{"delimiter": "\t"}"#).unwrap();
        assert_eq!(RowzConfig::load(dir.path()).unwrap().delimiter, '\t');
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), r#"{"file_ext": ".tsv"}"#).unwrap();

        let loaded = RowzConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.file_ext, ".tsv");
        assert_eq!(loaded.delimiter, ',');
        assert!(loaded.atomic_writes);
    }
}
