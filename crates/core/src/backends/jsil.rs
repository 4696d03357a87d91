//! JSIL, the intermediate-language interpreter

use std::path::PathBuf;

use super::{Backend, BackendBase, BackendDefaults, path_arg};
use crate::{
    config::{BackendConfig, BackendOption},
    error::Result,
    types::TestCase,
};

pub const TEST_PRELUDE: &str = "test_prelude.js";

const DEFAULTS: BackendDefaults = BackendDefaults {
    path: Some("interpreter_run.byte"),
    trashes_input: true,
    options: &[
        BackendOption::Stats,
        BackendOption::Simp,
        BackendOption::TestPrelude,
        BackendOption::SupportRoot,
    ],
    ..BackendDefaults::new("jsil")
};

#[derive(Debug)]
pub struct Jsil {
    base: BackendBase,
    test_prelude: PathBuf,
    stats: bool,
    simp: bool,
}

impl Jsil {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        Ok(Self {
            base: BackendBase::new(config, DEFAULTS)?,
            test_prelude: config
                .test_prelude
                .clone()
                .unwrap_or_else(|| config.support_file(TEST_PRELUDE)),
            stats: config.stats,
            simp: config.simp,
        })
    }
}

impl Backend for Jsil {
    fn name(&self) -> &'static str {
        DEFAULTS.name
    }

    fn display_name(&self) -> String {
        "JSIL".to_string()
    }

    fn base(&self) -> &BackendBase {
        &self.base
    }

    // JSIL has no version reporting
    fn version(&self) -> String {
        String::new()
    }

    fn build_args(&self, testcase: &dyn TestCase) -> Result<Vec<String>> {
        let mut staging = self.staging();
        let mut args = vec![
            path_arg(self.path()),
            "-test_prelude".to_string(),
            staging.stage_arg(&self.test_prelude)?,
        ];
        if self.stats {
            args.push("-stats".to_string());
        }
        if self.simp {
            args.push("-simp".to_string());
        }
        args.push("-file".to_string());
        args.push(staging.stage_arg(testcase.realpath())?);
        Ok(args)
    }
}
