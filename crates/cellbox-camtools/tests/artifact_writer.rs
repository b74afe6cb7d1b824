//! Output files appear together or not at all

use cellbox_camtools::{artifact_paths, write_artifacts, CamToolError};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_writes_main_and_cover() {
    let dir = TempDir::new().unwrap();
    let paths = artifact_paths(&dir.path().join("pack.ngc"), true).unwrap();
    let artifacts: Vec<_> = paths
        .iter()
        .zip(["G21\nM2\n%\n", "G21\nM2\n%\n(cover)\n"])
        .map(|(path, text)| (path.clone(), text.to_string()))
        .collect();

    write_artifacts(&artifacts).unwrap();

    assert_eq!(
        fs::read_to_string(dir.path().join("pack_main.ngc")).unwrap(),
        "G21\nM2\n%\n"
    );
    assert!(fs::read_to_string(dir.path().join("pack_cover.ngc"))
        .unwrap()
        .ends_with("(cover)\n"));

    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_unwritable_artifact_leaves_nothing_behind() {
    let dir = TempDir::new().unwrap();
    let good = dir.path().join("main.ngc");
    let bad = dir.path().join("missing").join("cover.ngc");
    let artifacts = vec![
        (good.clone(), "M2\n%\n".to_string()),
        (bad.clone(), "M2\n%\n".to_string()),
    ];

    let err = write_artifacts(&artifacts).unwrap_err();
    match err {
        CamToolError::Artifact { path, .. } => assert_eq!(path, bad),
        other => panic!("unexpected error: {}", other),
    }
    assert!(!good.exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_replaces_existing_output() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("box.ngc");
    fs::write(&path, "old").unwrap();

    write_artifacts(&[(path.clone(), "new".to_string())]).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "new");
}
