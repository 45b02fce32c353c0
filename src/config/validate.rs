// src/config/validate.rs

use std::collections::HashMap;

use crate::config::model::{ConfigFile, RawConfigFile, ROOT_PROJECT_ID};
use crate::errors::{Result, ScanlinkError};
use crate::mask::SensitiveKeys;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::ScanlinkError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_scanner(cfg)?;
    validate_session(cfg)?;
    validate_projects(cfg)?;
    Ok(())
}

fn validate_scanner(cfg: &RawConfigFile) -> Result<()> {
    if cfg.scanner.dependencies_key.trim().is_empty() {
        return Err(ScanlinkError::ConfigError(
            "[scanner].dependencies_key must not be empty".to_string(),
        ));
    }

    SensitiveKeys::new(cfg.scanner.masked_keys.iter().cloned())
        .map_err(|e| ScanlinkError::ConfigError(format!("[scanner].masked_keys: {e:#}")))?;

    Ok(())
}

fn validate_session(cfg: &RawConfigFile) -> Result<()> {
    if cfg.session.dump_file.as_os_str().is_empty() {
        return Err(ScanlinkError::ConfigError(
            "[session].dump_file must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_projects(cfg: &RawConfigFile) -> Result<()> {
    let mut seen: HashMap<String, String> = HashMap::new();
    seen.insert(cfg.project.key(), ROOT_PROJECT_ID.to_string());

    for (id, module) in cfg.module.iter() {
        if id.is_empty() || id.contains('.') || id.chars().any(char::is_whitespace) {
            return Err(ScanlinkError::ConfigError(format!(
                "module id '{}' must be non-empty and contain no '.' or whitespace",
                id
            )));
        }
        if id == ROOT_PROJECT_ID {
            return Err(ScanlinkError::ConfigError(format!(
                "module id '{}' is reserved for the root project",
                ROOT_PROJECT_ID
            )));
        }
        if let Some(other) = seen.insert(module.key(), id.clone()) {
            return Err(ScanlinkError::ConfigError(format!(
                "module '{}' has the same coordinates ({}) as '{}'",
                id,
                module.key(),
                other
            )));
        }
    }
    Ok(())
}
