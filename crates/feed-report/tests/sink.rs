//! Feed sink tests.

use std::fs;

use tempfile::TempDir;

use feed_report::{FeedSink, FileSink, MemorySink};

#[test]
fn file_sink_creates_directories_and_replaces_target() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("uploads").join("feed.xml");
    let mut sink = FileSink::new(&path);

    let location = sink.write(b"<first/>").expect("first write");
    assert_eq!(location.bytes_written, 8);
    assert_eq!(fs::read(&path).expect("read feed"), b"<first/>");

    sink.write(b"<second/>").expect("second write");
    assert_eq!(fs::read(&path).expect("read feed"), b"<second/>");

    let leftovers: Vec<_> = fs::read_dir(path.parent().expect("parent"))
        .expect("list dir")
        .filter_map(Result::ok)
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(leftovers, vec!["feed.xml"]);
}

#[test]
fn file_sink_reports_unwritable_target() {
    let dir = TempDir::new().expect("temp dir");
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, b"not a directory").expect("write blocker");
    let mut sink = FileSink::new(blocker.join("feed.xml"));
    let error = sink.write(b"<x/>").expect_err("parent is a file");
    assert!(error.to_string().contains("feed.xml"));
}

#[test]
fn memory_sink_keeps_last_write() {
    let mut sink = MemorySink::new();
    assert_eq!(sink.write_count(), 0);
    sink.write(b"abc").expect("write");
    assert_eq!(sink.bytes(), b"abc");
    assert_eq!(sink.write_count(), 1);
}
