//! node.js

use super::{Backend, BackendBase, BackendDefaults};
use crate::{config::BackendConfig, error::Result};

const DEFAULTS: BackendDefaults = BackendDefaults {
    path: Some("/usr/bin/nodejs"),
    ..BackendDefaults::new("nodejs")
};

#[derive(Debug)]
pub struct NodeJs {
    base: BackendBase,
}

impl NodeJs {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        Ok(Self {
            base: BackendBase::new(config, DEFAULTS)?,
        })
    }
}

impl Backend for NodeJs {
    fn name(&self) -> &'static str {
        DEFAULTS.name
    }

    fn display_name(&self) -> String {
        "node.js".to_string()
    }

    fn base(&self) -> &BackendBase {
        &self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceTestCase;
    use std::path::{Path, PathBuf};

    #[test]
    fn test_default_path() {
        let backend = NodeJs::new(&BackendConfig::default()).unwrap();
        assert_eq!(backend.path(), Path::new("/usr/bin/nodejs"));
        assert_eq!(backend.display_name(), "node.js");
    }

    #[test]
    fn test_path_override() {
        let config = BackendConfig {
            interp_path: Some(PathBuf::from("/usr/local/bin/node")),
            ..Default::default()
        };
        let backend = NodeJs::new(&config).unwrap();
        let case = SourceTestCase::plain("/suite/a.js");
        assert_eq!(
            backend.build_args(&case).unwrap(),
            vec!["/usr/local/bin/node", "/suite/a.js"]
        );
    }
}
