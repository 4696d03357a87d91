//! JSRef, the reference interpreter extracted from the Coq formalisation
//!
//! A plain test is run as
//!
//! ```text
//! interp/run_js -jsparser interp/parser/lib/js_parser.jar \
//!     -test_prelude interp/test_prelude.js -file test.js
//! ```
//!
//! Suite tests need extra preludes in front of (or around) the test file.

use std::path::{Path, PathBuf};

use super::{Backend, BackendBase, BackendDefaults, path_arg};
use crate::{
    config::{BackendConfig, BackendOption},
    error::Result,
    types::TestCase,
};

pub const DEFAULT_PARSER: &str = "interp/parser/lib/js_parser.jar";
pub const TEST_PRELUDE: &str = "interp/test_prelude.js";
pub const SPIDERMONKEY_PRELUDE: &str = "interp/test_prelude_SpiderMonkey.js";
pub const SPIDERMONKEY_SHELL: &str = "tests/SpiderMonkey/tests/shell.js";
pub const LAMBDAS5_PRE: &str = "tests/LambdaS5/lambda-pre.js";
pub const LAMBDAS5_POST: &str = "tests/LambdaS5/lambda-post.js";
pub const LIBLOADER: &str = "interp/libloader.js";

const DEFAULTS: BackendDefaults = BackendDefaults {
    path: Some("interp/run_js"),
    trashes_input: true,
    options: &[
        BackendOption::JsonParser,
        BackendOption::NoParasite,
        BackendOption::Parser,
        BackendOption::TestPrelude,
        BackendOption::SupportRoot,
    ],
    ..BackendDefaults::new("jsref")
};

#[derive(Debug)]
pub struct JsRef {
    base: BackendBase,
    parser: PathBuf,
    test_prelude: PathBuf,
    spidermonkey_prelude: PathBuf,
    spidermonkey_shell: PathBuf,
    lambdas5_pre: PathBuf,
    lambdas5_post: PathBuf,
    libloader: PathBuf,
    jsonparser: bool,
    no_parasite: bool,
}

impl JsRef {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        Ok(Self {
            base: BackendBase::new(config, DEFAULTS)?,
            parser: config
                .parser
                .clone()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| config.support_file(DEFAULT_PARSER)),
            test_prelude: config
                .test_prelude
                .clone()
                .unwrap_or_else(|| config.support_file(TEST_PRELUDE)),
            spidermonkey_prelude: config.support_file(SPIDERMONKEY_PRELUDE),
            spidermonkey_shell: config.support_file(SPIDERMONKEY_SHELL),
            lambdas5_pre: config.support_file(LAMBDAS5_PRE),
            lambdas5_post: config.support_file(LAMBDAS5_POST),
            libloader: config.support_file(LIBLOADER),
            jsonparser: config.jsonparser,
            no_parasite: config.no_parasite,
        })
    }

    pub fn parser(&self) -> &Path {
        &self.parser
    }
}

impl Backend for JsRef {
    fn name(&self) -> &'static str {
        DEFAULTS.name
    }

    fn display_name(&self) -> String {
        "JSRef".to_string()
    }

    fn base(&self) -> &BackendBase {
        &self.base
    }

    fn build_args(&self, testcase: &dyn TestCase) -> Result<Vec<String>> {
        let mut args = vec![
            path_arg(self.path()),
            "-jsparser".to_string(),
            path_arg(&self.parser),
        ];
        if self.jsonparser {
            args.push("-json".to_string());
        }

        let mut staging = self.staging();
        args.push("-test_prelude".to_string());
        args.push(staging.stage_arg(&self.test_prelude)?);

        let file = testcase.realpath();
        if testcase.is_lambdas5_test() {
            // The test itself is a prelude, wrapped by the pre/post scripts
            args.push("-test_prelude".to_string());
            args.push(staging.stage_arg(&self.lambdas5_pre)?);
            args.push("-test_prelude".to_string());
            args.push(staging.stage_arg(file)?);
            args.push("-file".to_string());
            args.push(staging.stage_arg(&self.lambdas5_post)?);
        } else if testcase.is_spidermonkey_test() {
            args.push("-test_prelude".to_string());
            args.push(staging.stage_arg(&self.spidermonkey_prelude)?);
            args.push("-test_prelude".to_string());
            args.push(staging.stage_arg(&self.spidermonkey_shell)?);
            args.push("-file".to_string());
            args.push(staging.stage_arg(file)?);
        } else if testcase.uses_include() {
            args.push("-test_prelude".to_string());
            args.push(staging.stage_arg(&self.libloader)?);
            args.push("-file".to_string());
            args.push(staging.stage_arg(file)?);
        } else {
            args.push("-file".to_string());
            args.push(staging.stage_arg(file)?);
        }

        if self.no_parasite {
            args.push("-no-parasite".to_string());
        }

        Ok(args)
    }
}
