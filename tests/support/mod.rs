//! Fixture helpers shared by the integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Write `contents` to `dir/relative`, creating parent directories
pub fn write_file(dir: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}

/// Write an executable shell script
#[cfg(unix)]
pub fn write_script(dir: &Path, relative: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = write_file(dir, relative, &format!("#!/bin/sh\n{body}"));
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// A JSRef checkout with every support file the interpreter is given,
/// and a `run_js` that reports the `-file` it was handed on stderr and
/// then runs that file as a shell script
pub struct JsRefTree {
    pub root: TempDir,
}

impl JsRefTree {
    pub fn new() -> Self {
        let root = TempDir::new().unwrap();
        let dir = root.path();
        write_file(dir, "interp/parser/lib/js_parser.jar", "");
        write_file(dir, "interp/test_prelude.js", "// prelude\n");
        write_file(dir, "interp/test_prelude_SpiderMonkey.js", "// sm prelude\n");
        write_file(dir, "interp/libloader.js", "// libloader\n");
        write_file(dir, "tests/SpiderMonkey/tests/shell.js", "// shell\n");
        write_file(dir, "tests/LambdaS5/lambda-pre.js", "// pre\n");
        write_file(dir, "tests/LambdaS5/lambda-post.js", "// post\n");
        #[cfg(unix)]
        write_script(
            dir,
            "interp/run_js",
            r#"while [ $# -gt 0 ]; do
  case "$1" in
    -file) file="$2"; shift ;;
  esac
  shift
done
echo "$file" >&2
. "$file"
"#,
        );
        Self { root }
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    pub fn interpreter(&self) -> PathBuf {
        self.path().join("interp/run_js")
    }

    pub fn test(&self, relative: &str, contents: &str) -> PathBuf {
        write_file(self.path(), relative, contents)
    }
}
