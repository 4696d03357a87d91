//! JSRef compiled to OCaml bytecode, run through `ocamlrun`

use std::path::PathBuf;

use super::{Backend, BackendBase, BackendDefaults, path_arg};
use crate::{
    config::{BackendConfig, BackendOption},
    error::Result,
    types::TestCase,
};

pub const BYTECODE_RUNNER: &str = "ocamlrun";
pub const TEST_PRELUDE: &str = "test_prelude.js";

const DEFAULTS: BackendDefaults = BackendDefaults {
    path: Some("main.byte"),
    trashes_input: true,
    options: &[BackendOption::TestPrelude, BackendOption::SupportRoot],
    ..BackendDefaults::new("mljsref")
};

#[derive(Debug)]
pub struct MlJsRef {
    base: BackendBase,
    test_prelude: PathBuf,
}

impl MlJsRef {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        Ok(Self {
            base: BackendBase::new(config, DEFAULTS)?,
            test_prelude: config
                .test_prelude
                .clone()
                .unwrap_or_else(|| config.support_file(TEST_PRELUDE)),
        })
    }
}

impl Backend for MlJsRef {
    fn name(&self) -> &'static str {
        DEFAULTS.name
    }

    fn display_name(&self) -> String {
        "MLJSRef".to_string()
    }

    fn base(&self) -> &BackendBase {
        &self.base
    }

    fn build_args(&self, testcase: &dyn TestCase) -> Result<Vec<String>> {
        let mut staging = self.staging();
        Ok(vec![
            BYTECODE_RUNNER.to_string(),
            path_arg(self.path()),
            "-json".to_string(),
            "-test_prelude".to_string(),
            staging.stage_arg(&self.test_prelude)?,
            "-file".to_string(),
            staging.stage_arg(testcase.realpath())?,
        ])
    }
}
