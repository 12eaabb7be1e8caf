//! Registry configuration.
//!
//! ```yaml
//! max_sessions: 10      # omit or null for no limit
//! on_full: evict_oldest # or reject
//! ```

use crate::{SessionError, SessionResult};
use dualpng_io::IoError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What happens when a session is created in a full registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityPolicy {
    /// Refuse with [`SessionError::CapacityExceeded`].
    #[default]
    Reject,
    /// Drop the earliest-created session to make room.
    EvictOldest,
}

/// Session registry settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Maximum number of live sessions, `None` for unbounded.
    pub max_sessions: Option<usize>,
    /// Behaviour once `max_sessions` is reached.
    pub on_full: CapacityPolicy,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_sessions: Some(10),
            on_full: CapacityPolicy::Reject,
        }
    }
}

impl RegistryConfig {
    /// No limit at all.
    pub fn unbounded() -> Self {
        Self {
            max_sessions: None,
            on_full: CapacityPolicy::Reject,
        }
    }

    /// Parses and validates YAML.
    pub fn from_yaml_str(yaml: &str) -> SessionResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> SessionResult<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|e| SessionError::Io(IoError::Io(e)))?;
        Self::from_yaml_str(&content)
    }

    /// Rejects a zero session limit, which would make every create fail.
    pub fn validate(&self) -> SessionResult<()> {
        if self.max_sessions == Some(0) {
            return Err(SessionError::Config("max_sessions must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = RegistryConfig::default();
        assert_eq!(config.max_sessions, Some(10));
        assert_eq!(config.on_full, CapacityPolicy::Reject);
        assert_eq!(RegistryConfig::from_yaml_str("{}").unwrap(), config);
    }

    #[test]
    fn test_parse_yaml() {
        let config = RegistryConfig::from_yaml_str("max_sessions: 3\non_full: evict_oldest\n").unwrap();
        assert_eq!(config.max_sessions, Some(3));
        assert_eq!(config.on_full, CapacityPolicy::EvictOldest);

        let config = RegistryConfig::from_yaml_str("max_sessions: null").unwrap();
        assert_eq!(config.max_sessions, None);
    }

    #[test]
    fn test_rejects_bad_yaml() {
        assert!(matches!(
            RegistryConfig::from_yaml_str("max_sessions: 0"),
            Err(SessionError::Config(_))
        ));
        assert!(RegistryConfig::from_yaml_str("on_full: shrug").is_err());
        assert!(RegistryConfig::from_yaml_str("max_session: 4").is_err());
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_sessions: 2").unwrap();
        let config = RegistryConfig::load(file.path()).unwrap();
        assert_eq!(config.max_sessions, Some(2));
        assert_eq!(config.on_full, CapacityPolicy::Reject);

        let missing = RegistryConfig::load(file.path().with_extension("absent"));
        assert!(matches!(missing, Err(SessionError::Io(_))));
    }
}
