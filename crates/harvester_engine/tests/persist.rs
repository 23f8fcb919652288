use std::fs;
use harvester_engine::{ensure_output_dir, AtomicFileWriter};
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("out").join("nested");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn rejects_file_as_output_dir() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();
    assert!(ensure_output_dir(&file_path).is_err());
}

#[test]
fn atomic_write_replaces_existing() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("lake.png", b"hello").unwrap();
    assert_eq!(first.file_name().unwrap(), "lake.png");
    assert_eq!(fs::read(&first).unwrap(), b"hello");

    let second = writer.write("lake.png", b"world").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read(&second).unwrap(), b"world");
}

#[test]
fn streamed_write_is_invisible_until_commit() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let mut pending = writer.begin("dunes.jpeg").unwrap();
    pending.append(b"abc").unwrap();
    pending.append(b"def").unwrap();
    assert_eq!(pending.written(), 6);
    assert!(!temp.path().join("dunes.jpeg").exists());

    let path = pending.commit().unwrap();
    assert_eq!(fs::read(path).unwrap(), b"abcdef");
}

#[test]
fn dropped_write_leaves_nothing_behind() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let mut pending = writer.begin("partial.png").unwrap();
    pending.append(b"half").unwrap();
    drop(pending);

    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    let result = writer.write("doc.png", b"data");
    assert!(result.is_err());
    assert!(!file_path.with_file_name("doc.png").exists());
}
