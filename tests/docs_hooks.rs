//! Build-finished hook behavior on real directory trees.

use dut_harness::docs::{on_build_finished, BuildOutcome, STATIC_DIR};
use std::fs;
use std::path::Path;

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn test_copies_static_tree_after_success() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let assets = src.path().join(STATIC_DIR);
    write(&assets.join("css/custom.css"), "body {}");
    write(&assets.join("latex/alif_semiconductor.sty"), "% style");
    write(&assets.join("logo.png"), "png");

    let summary = on_build_finished(src.path(), out.path(), &BuildOutcome::Succeeded)
        .unwrap()
        .expect("static tree copied");

    assert_eq!(summary.files, 3);
    assert_eq!(summary.dirs, 2);
    assert_eq!(summary.destination, out.path().join(STATIC_DIR));
    assert_eq!(
        fs::read_to_string(out.path().join("_static/css/custom.css")).unwrap(),
        "body {}"
    );
    assert!(out.path().join("_static/latex/alif_semiconductor.sty").is_file());
}

#[test]
fn test_merges_into_existing_output() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write(&src.path().join("_static/css/custom.css"), "new");
    write(&out.path().join("_static/css/custom.css"), "old");
    write(&out.path().join("_static/js/theme.js"), "generated");

    on_build_finished(src.path(), out.path(), &BuildOutcome::Succeeded).unwrap();

    assert_eq!(
        fs::read_to_string(out.path().join("_static/css/custom.css")).unwrap(),
        "new"
    );
    assert_eq!(
        fs::read_to_string(out.path().join("_static/js/theme.js")).unwrap(),
        "generated"
    );
}

#[test]
fn test_failed_build_leaves_output_untouched() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write(&src.path().join("_static/logo.png"), "png");

    let result = on_build_finished(
        src.path(),
        out.path(),
        &BuildOutcome::Failed("latexpdf returned 2".into()),
    )
    .unwrap();

    assert!(result.is_none());
    assert!(fs::read_dir(out.path()).unwrap().next().is_none());
}
