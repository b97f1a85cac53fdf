use std::fs;

use picker_engine::{ensure_output_dir, existing_file_names, AtomicFileWriter};
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("out").join("gb");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing_file() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("Game (USA).zip", b"hello").unwrap();
    assert_eq!(first.file_name().unwrap(), "Game (USA).zip");
    assert_eq!(fs::read(&first).unwrap(), b"hello");

    let second = writer.write("Game (USA).zip", b"world").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read(&second).unwrap(), b"world");
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    let result = writer.write("Game.zip", b"data");
    assert!(result.is_err());
    assert!(!file_path.with_file_name("Game.zip").exists());
}

#[test]
fn existing_names_list_only_files() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("b.zip"), "x").unwrap();
    fs::write(temp.path().join("a.zip"), "x").unwrap();
    fs::create_dir(temp.path().join("subdir")).unwrap();

    let names = existing_file_names(temp.path()).unwrap();
    assert_eq!(names, vec!["a.zip".to_string(), "b.zip".to_string()]);

    let missing = existing_file_names(&temp.path().join("nope")).unwrap();
    assert!(missing.is_empty());
}

#[test]
fn pending_file_appears_only_on_commit() {
    let dir = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(dir.path().to_path_buf());

    let abandoned = writer.begin("Tetris (World).zip").unwrap();
    assert!(!abandoned.target().exists());
    drop(abandoned);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);

    let pending = writer.begin("Tetris (World).zip").unwrap();
    let path = pending.commit().unwrap();
    assert_eq!(path, dir.path().join("Tetris (World).zip"));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}
