use crate::commands::helpers::failure;
use crate::commands::{CmdMessage, CmdResult, RowzPaths};
use crate::config::RowzConfig;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

pub fn run(paths: &RowzPaths, action: ConfigAction) -> CmdResult {
    let mut config = match RowzConfig::load(&paths.config_dir) {
        Ok(config) => config,
        Err(err) => return failure("Could not read config", &err),
    };

    match action {
        ConfigAction::ShowAll => CmdResult::default().with_config(config),
        ConfigAction::ShowKey(key) => {
            let mut result = CmdResult::default();
            match config.get(&key) {
                Some(val) => result.add_message(CmdMessage::info(val)),
                None => {
                    result.success = false;
                    result.add_message(CmdMessage::error(format!("Unknown config key: {}", key)));
                }
            }
            result
        }
        ConfigAction::Set(key, value) => {
            if let Err(e) = config.set(&key, &value) {
                let mut result = CmdResult {
                    success: false,
                    ..CmdResult::default()
                };
                result.add_message(CmdMessage::error(e));
                return result;
            }
            if let Err(err) = config.save(&paths.config_dir) {
                return failure("Could not save config", &err);
            }
            let display_val = config.get(&key).unwrap_or_else(|| value.clone());
            let mut result = CmdResult::default().with_config(config);
            result.add_message(CmdMessage::success(format!("{} set to {}", key, display_val)));
            result
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn paths(dir: &TempDir) -> RowzPaths {
        RowzPaths {
            config_dir: dir.path().to_path_buf(),
        }
    }

    #[test]
    fn set_persists_value() {
        let dir = TempDir::new().unwrap();
        let result = run(
            &paths(&dir),
            ConfigAction::Set("delimiter".into(), ";".into()),
        );
        assert!(result.success);

        let shown = run(&paths(&dir), ConfigAction::ShowKey("delimiter".into()));
        assert_eq!(shown.messages[0].content, ";");
    }

    #[test]
    fn unknown_key_fails() {
        let dir = TempDir::new().unwrap();
        assert!(!run(&paths(&dir), ConfigAction::ShowKey("nope".into())).success);
        assert!(!run(&paths(&dir), ConfigAction::Set("nope".into(), "1".into())).success);
    }

    #[test]
    fn show_all_returns_defaults() {
        let dir = TempDir::new().unwrap();
        let result = run(&paths(&dir), ConfigAction::ShowAll);
        assert_eq!(result.config, Some(RowzConfig::default()));
    }
}
