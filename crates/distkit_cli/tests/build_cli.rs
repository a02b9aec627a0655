use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn run_build(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_distkit-build"))
        .current_dir(cwd)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("spawn distkit-build")
}

#[test]
fn zero_argument_build_copies_src_into_dist() {
    let tmp = TempDir::new().expect("tempdir");
    fs::create_dir_all(tmp.path().join("src/lib")).expect("mkdir");
    fs::write(tmp.path().join("src/a.txt"), "hello").expect("write");
    fs::write(tmp.path().join("src/lib/sum.js"), "export {}").expect("write");

    let output = run_build(tmp.path(), &[]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Build completed ✅\n");
    assert_eq!(
        fs::read_to_string(tmp.path().join("dist/a.txt")).expect("read"),
        "hello"
    );
    assert!(tmp.path().join("dist/lib/sum.js").is_file());
}

#[test]
fn missing_source_exits_non_zero_with_stderr() {
    let tmp = TempDir::new().expect("tempdir");

    let output = run_build(tmp.path(), &[]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Source does not exist"), "stderr: {stderr}");
}

#[test]
fn explicit_paths_and_quiet_flag() {
    let tmp = TempDir::new().expect("tempdir");
    fs::create_dir_all(tmp.path().join("public")).expect("mkdir");
    fs::write(tmp.path().join("public/index.html"), "<html/>").expect("write");

    let output = run_build(
        tmp.path(),
        &["--source", "public", "--destination", "out/site", "--quiet"],
    );

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert!(tmp.path().join("out/site/index.html").is_file());
}

#[test]
fn repeated_build_is_idempotent() {
    let tmp = TempDir::new().expect("tempdir");
    fs::create_dir_all(tmp.path().join("src")).expect("mkdir");
    fs::write(tmp.path().join("src/a.txt"), "hello").expect("write");

    assert!(run_build(tmp.path(), &["-q"]).status.success());
    assert!(run_build(tmp.path(), &["-q"]).status.success());

    let l_names: Vec<_> = fs::read_dir(tmp.path().join("dist"))
        .expect("read dist")
        .map(|e| e.expect("entry").file_name())
        .collect();
    assert_eq!(l_names, vec!["a.txt"]);
    assert_eq!(
        fs::read_to_string(tmp.path().join("dist/a.txt")).expect("read"),
        "hello"
    );
}
