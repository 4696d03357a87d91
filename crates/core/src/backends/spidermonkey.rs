//! Mozilla's SpiderMonkey shell

use super::{Backend, BackendBase, BackendDefaults};
use crate::{config::BackendConfig, error::Result};

const DEFAULTS: BackendDefaults = BackendDefaults {
    path: Some("js"),
    // The shell reports uncaught exceptions with exit status 3
    fail_code: 3,
    ..BackendDefaults::new("spidermonkey")
};

#[derive(Debug)]
pub struct SpiderMonkey {
    base: BackendBase,
}

impl SpiderMonkey {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        Ok(Self {
            base: BackendBase::new(config, DEFAULTS)?,
        })
    }
}

impl Backend for SpiderMonkey {
    fn name(&self) -> &'static str {
        DEFAULTS.name
    }

    fn display_name(&self) -> String {
        "SpiderMonkey".to_string()
    }

    fn base(&self) -> &BackendBase {
        &self.base
    }
}
