#![cfg(unix)]

mod support;

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use runtests_core::{
    Backend, BackendConfig, ProcessRunner, SourceTestCase, Status, backends::JsRef, construct,
};
use support::{JsRefTree, write_script};
use tempfile::TempDir;

fn jsref(tree: &JsRefTree, timeout: i64) -> JsRef {
    JsRef::new(&BackendConfig {
        interp_path: Some(tree.interpreter()),
        support_root: Some(tree.path().to_path_buf()),
        timeout,
        ..Default::default()
    })
    .unwrap()
}

#[test]
fn test_failing_test_is_fail() {
    let tree = JsRefTree::new();
    let test = tree.test("fails.js", "echo 'assertion failed' \nexit 1\n");
    let backend = jsref(&tree, 60);
    let mut testcase = SourceTestCase::new(&test);

    let result = ProcessRunner::new().run(&backend, &mut testcase).unwrap();
    assert_eq!(result.status, Status::Fail);
    assert_eq!(result.exit_code, Some(1));
    assert_eq!(result.stdout, "assertion failed\n");
    assert_eq!(testcase.result(), Some(&result));
}

#[test]
fn test_interpreter_reads_a_staged_copy() {
    let tree = JsRefTree::new();
    let test = tree.test("tests/misc/staged.js", "exit 0\n");
    let backend = jsref(&tree, 60);

    let result = ProcessRunner::new()
        .run(&backend, &mut SourceTestCase::new(&test))
        .unwrap();
    assert_eq!(result.status, Status::Pass);

    // The fake interpreter echoes the -file argument on stderr
    let staged = PathBuf::from(result.stderr.trim());
    assert!(staged.starts_with(backend.scratch_dir().unwrap()));
    assert_ne!(staged, test);
    assert_eq!(fs::read(&staged).unwrap(), fs::read(&test).unwrap());
}

#[test]
fn test_scratch_dir_is_removed_with_the_backend() {
    let tree = JsRefTree::new();
    let test = tree.test("a.js", "exit 0\n");
    let backend = jsref(&tree, 60);
    ProcessRunner::new()
        .run(&backend, &mut SourceTestCase::new(&test))
        .unwrap();

    let scratch = backend.scratch_dir().unwrap().to_path_buf();
    assert!(scratch.is_dir());
    drop(backend);
    assert!(!scratch.exists());
}

#[test]
fn test_timeout_keeps_partial_output() {
    let tree = JsRefTree::new();
    let test = tree.test("slow.js", "echo partial\nsleep 30\necho never\n");
    let backend = jsref(&tree, 1);

    let start = Instant::now();
    let result = ProcessRunner::new()
        .run(&backend, &mut SourceTestCase::new(&test))
        .unwrap();

    assert_eq!(result.status, Status::Timeout);
    assert_eq!(result.stdout, "partial\n");
    assert!(result.duration >= Duration::from_secs(1));
    assert!(start.elapsed() < Duration::from_secs(20));
}

#[test]
fn test_timeout_takes_down_descendants_after_the_child_exits() {
    let tree = JsRefTree::new();
    let marker = tree.path().join("survived");
    let test = tree.test(
        "detached.js",
        &format!(
            "(sleep 2; touch '{}') &\necho started\nexit 0\n",
            marker.display()
        ),
    );
    let backend = jsref(&tree, 1);

    let start = Instant::now();
    let result = ProcessRunner::new()
        .run(&backend, &mut SourceTestCase::new(&test))
        .unwrap();

    assert_eq!(result.status, Status::Timeout);
    assert_eq!(result.stdout, "started\n");
    assert!(start.elapsed() < Duration::from_secs(2));

    // Had the background job outlived the run it would touch the marker
    std::thread::sleep(Duration::from_secs(3));
    assert!(!marker.exists());
}

#[test]
fn test_non_positive_timeout_waits() {
    let tree = JsRefTree::new();
    let test = tree.test("quick.js", "sleep 1\nexit 0\n");

    for timeout in [0, -5] {
        let backend = jsref(&tree, timeout);
        assert_eq!(backend.timeout(), None);

        let result = ProcessRunner::new()
            .run(&backend, &mut SourceTestCase::new(&test))
            .unwrap();
        assert_eq!(result.status, Status::Pass);
    }
}

#[test]
fn test_custom_exit_codes() {
    let temp = TempDir::new().unwrap();
    let interpreter = write_script(temp.path(), "interp", "exit $(cat \"$1\")\n");
    let config = BackendConfig {
        interp_path: Some(interpreter),
        pass_code: Some(3),
        fail_code: Some(0),
        ..Default::default()
    };
    let backend = construct("generic", &config).unwrap();
    let runner = ProcessRunner::new();

    let expect = |code: &str, status: Status| {
        let test = support::write_file(temp.path(), &format!("exit{code}.js"), code);
        let result = runner
            .run(backend.as_ref(), &mut SourceTestCase::new(test))
            .unwrap();
        assert_eq!(result.status, status, "exit code {code}");
    };

    expect("3", Status::Pass);
    expect("0", Status::Fail);
    expect("1", Status::Abort);
}

#[test]
fn test_shared_backend_across_threads() {
    let tree = JsRefTree::new();
    let backend = jsref(&tree, 60);
    let tests: Vec<PathBuf> = (0..4)
        .map(|i| tree.test(&format!("dir{i}/case.js"), &format!("echo {i}\nexit 0\n")))
        .collect();

    std::thread::scope(|scope| {
        for (i, test) in tests.iter().enumerate() {
            let backend = &backend;
            scope.spawn(move || {
                let result = ProcessRunner::new()
                    .run(backend, &mut SourceTestCase::new(test.as_path()))
                    .unwrap();
                // Same staged basename, but executions never see each other's copy
                assert_eq!(result.stdout, format!("{i}\n"));
            });
        }
    });
}

#[test]
fn test_missing_interpreter_is_an_error() {
    let tree = JsRefTree::new();
    let test = tree.test("a.js", "exit 0\n");
    let backend = JsRef::new(&BackendConfig {
        interp_path: Some(PathBuf::from("/no/such/run_js")),
        support_root: Some(tree.path().to_path_buf()),
        ..Default::default()
    })
    .unwrap();
    let mut testcase = SourceTestCase::new(&test);

    let err = ProcessRunner::new().run(&backend, &mut testcase).unwrap_err();
    assert!(matches!(err, runtests_core::Error::Spawn { .. }));
    assert!(testcase.result().is_none());
}
