//! LambdaS5, which must be run from its own install directory

use std::path::{Path, PathBuf};

use super::{Backend, BackendBase, BackendDefaults};
use crate::{config::BackendConfig, error::Result};

const DEFAULTS: BackendDefaults = BackendDefaults {
    path: Some("s5"),
    ..BackendDefaults::new("lambdas5")
};

#[derive(Debug)]
pub struct LambdaS5 {
    base: BackendBase,
}

impl LambdaS5 {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let base = BackendBase::new(config, DEFAULTS)?;
        // The interpreter runs from its own directory, so the path has to
        // survive the directory change
        let path = std::path::absolute(base.path())?;
        Ok(Self {
            base: base.with_path(path),
        })
    }

    /// Directory the interpreter is run from
    pub fn install_dir(&self) -> PathBuf {
        self.path()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/"))
    }
}

impl Backend for LambdaS5 {
    fn name(&self) -> &'static str {
        DEFAULTS.name
    }

    fn display_name(&self) -> String {
        "LambdaS5".to_string()
    }

    fn base(&self) -> &BackendBase {
        &self.base
    }

    fn working_dir(&self) -> Option<PathBuf> {
        Some(self.install_dir())
    }
}
