mod common;

use std::path::Path;

use common::{make_mono, write_test_image};
use procyon_core::buffer::SampleDtype;
use procyon_core::host::{HostSession, LocalSession};

fn open_session(dir: &tempfile::TempDir) -> LocalSession {
    let buffer = make_mono(2, 3, &[0.0, 50.0, 100.0, 150.0, 200.0, 250.0], SampleDtype::U8);
    let base = write_test_image(dir, "base.png", &buffer);
    LocalSession::open(&base).unwrap()
}

#[test]
fn test_open_missing_file_fails() {
    assert!(LocalSession::open(Path::new("/nonexistent/base.png")).is_err());
}

#[test]
fn test_dimensions_are_channels_height_width() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open_session(&dir);
    assert_eq!(session.image_dimensions().unwrap(), (1, 2, 3));
}

#[test]
fn test_commands_are_accepted_without_host() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open_session(&dir);
    session.send_command("autostretch", &["-2.8".into()]).unwrap();
}

#[test]
fn test_load_missing_file_keeps_current_image() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open_session(&dir);
    let before = session.image_path().unwrap();

    session.load(Path::new("does_not_exist.tif")).unwrap();

    assert_eq!(session.image_path().unwrap(), before);
    assert_eq!(session.image_dimensions().unwrap(), (1, 2, 3));
}

#[test]
fn test_relative_save_resolves_against_base_directory() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open_session(&dir);

    session.save(Path::new("intermediate")).unwrap();

    assert!(dir.path().join("intermediate").exists());
}

#[test]
fn test_load_switches_current_image() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open_session(&dir);

    let other = write_test_image(
        &dir,
        "other.png",
        &make_mono(3, 3, &[128.0; 9], SampleDtype::U8),
    );
    session.load(&other).unwrap();

    assert_eq!(session.image_path().unwrap(), other);
    assert_eq!(session.image_dimensions().unwrap(), (1, 3, 3));
}
