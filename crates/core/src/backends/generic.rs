//! Any interpreter that takes the test file as its only argument

use super::{Backend, BackendBase, BackendDefaults};
use crate::{config::BackendConfig, error::Result};

const DEFAULTS: BackendDefaults = BackendDefaults::new("generic");

/// Runs `<path> <file>`; the interpreter path must be configured
#[derive(Debug)]
pub struct Generic {
    base: BackendBase,
}

impl Generic {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        Ok(Self {
            base: BackendBase::new(config, DEFAULTS)?,
        })
    }
}

impl Backend for Generic {
    fn name(&self) -> &'static str {
        DEFAULTS.name
    }

    fn display_name(&self) -> String {
        self.path()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path().to_string_lossy().into_owned())
    }

    fn base(&self) -> &BackendBase {
        &self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::Error, types::SourceTestCase};
    use std::path::PathBuf;

    #[test]
    fn test_requires_path() {
        assert!(matches!(
            Generic::new(&BackendConfig::default()),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_display_name_is_basename() {
        let config = BackendConfig {
            interp_path: Some(PathBuf::from("/usr/local/bin/d8")),
            ..Default::default()
        };
        let backend = Generic::new(&config).unwrap();
        assert_eq!(backend.display_name(), "d8");
        assert!(!backend.trashes_input());
    }

    #[test]
    fn test_build_args_is_path_then_file() {
        let config = BackendConfig {
            interp_path: Some(PathBuf::from("/usr/local/bin/d8")),
            ..Default::default()
        };
        let backend = Generic::new(&config).unwrap();
        let case = SourceTestCase::plain("/suite/a.js");

        assert_eq!(
            backend.build_args(&case).unwrap(),
            vec!["/usr/local/bin/d8", "/suite/a.js"]
        );
    }
}
