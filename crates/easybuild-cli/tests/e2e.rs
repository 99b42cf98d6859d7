//! End-to-end tests for the eb CLI.
//!
//! A shell script stands in for the compiler: it answers `-MM` with a
//! one-line make rule and creates whatever file follows `-o`.

#![cfg(unix)]
#![allow(deprecated)] // Allow deprecated Command::cargo_bin for tests

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// =============================================================================
// Test Helpers
// =============================================================================

const FAKE_CC: &str = r#"#!/bin/sh
if [ "$1" = "-MM" ]; then
    case "$2" in
        *noscan*) exit 1 ;;
    esac
    echo "x.o: $2"
    exit 0
fi
out=""
while [ $# -gt 0 ]; do
    case "$1" in
        -o) out="$2"; shift ;;
        *broken*) exit 1 ;;
    esac
    shift
done
: > "$out"
"#;

/// A project directory with a fake compiler.
struct TestProject {
    temp_dir: TempDir,
    cc: PathBuf,
}

impl TestProject {
    fn new(sources: &[&str]) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let cc = temp_dir.path().join("fake-cc");
        fs::write(&cc, FAKE_CC).expect("Failed to write fake compiler");
        fs::set_permissions(&cc, fs::Permissions::from_mode(0o755)).unwrap();

        for source in sources {
            let path = temp_dir.path().join("src").join(source);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, "int x;\n").expect("Failed to write source");
        }

        Self { temp_dir, cc }
    }

    fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    fn build_dir(&self) -> PathBuf {
        self.root().join("build")
    }

    fn eb(&self) -> Command {
        let mut cmd = Command::cargo_bin("eb").expect("Failed to find eb binary");
        cmd.current_dir(self.root())
            .arg("--cc")
            .arg(&self.cc)
            .arg("--cxx")
            .arg(&self.cc)
            .args(["--workdir", "build", "--target", "app", "src"]);
        cmd
    }
}

// =============================================================================
// eb Tests
// =============================================================================

#[test]
fn test_help_lists_options() {
    Command::cargo_bin("eb")
        .expect("Failed to find eb binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--without-link"))
        .stdout(predicate::str::contains("--workdir"));
}

#[test]
fn test_build_then_up_to_date() {
    let project = TestProject::new(&["a.c", "b.cpp"]);

    project
        .eb()
        .assert()
        .success()
        .stdout(predicate::str::contains("* Build:"))
        .stdout(predicate::str::contains("a.c => "))
        .stdout(predicate::str::contains("[ 100% ]"));

    assert!(project.build_dir().join("a.c.o").exists());
    assert!(project.build_dir().join("b.cpp.o").exists());
    assert!(project.build_dir().join("app").exists());

    project
        .eb()
        .assert()
        .success()
        .stdout(predicate::str::contains("is up to date"))
        .stdout(predicate::str::contains("=>").not());
}

#[test]
fn test_clean() {
    let project = TestProject::new(&["a.c"]);
    project.eb().assert().success();

    project
        .eb()
        .arg("--clean")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleaned"));

    assert!(!project.build_dir().join("a.c.o").exists());
    assert!(!project.build_dir().join("app").exists());
    assert!(project.root().join("src").join("a.c").exists());
}

#[test]
fn test_without_link() {
    let project = TestProject::new(&["a.c"]);

    project.eb().arg("--without-link").assert().success();

    assert!(project.build_dir().join("a.c.o").exists());
    assert!(!project.build_dir().join("app").exists());
}

#[test]
fn test_compile_failure_exit_code() {
    let project = TestProject::new(&["ok.c", "broken.c"]);

    project
        .eb()
        .assert()
        .code(3)
        .stderr(predicate::str::contains("failed to compile"))
        .stderr(predicate::str::contains("broken.c"));

    assert!(!project.build_dir().join("app").exists());
}

#[test]
fn test_dependency_scan_failure_exit_code() {
    let project = TestProject::new(&["noscan.c"]);

    project
        .eb()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to calculate dependencies"))
        .stderr(predicate::str::contains("noscan.c"));
}

#[test]
fn test_invalid_path() {
    let project = TestProject::new(&[]);

    project
        .eb()
        .arg("missing-dir")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid path"));
}

#[test]
fn test_no_sources() {
    let project = TestProject::new(&[]);
    fs::create_dir(project.root().join("src")).unwrap();

    project
        .eb()
        .assert()
        .success()
        .stdout(predicate::str::contains("No source files found"));
}

#[test]
fn test_workdir_occupied() {
    let project = TestProject::new(&["a.c"]);
    fs::write(project.build_dir(), "").unwrap();

    project
        .eb()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("has been occupied"));
}
