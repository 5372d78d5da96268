use std::path::{Path, PathBuf};

use procyon_core::tracker::StepTracker;

// ---------------------------------------------------------------------------
// Tag accumulation
// ---------------------------------------------------------------------------

#[test]
fn test_tracker_starts_empty() {
    let tracker = StepTracker::new();
    assert!(tracker.is_empty());
    assert!(!tracker.contains("UC"));
}

#[test]
fn test_tracker_appends_in_order() {
    let mut tracker = StepTracker::new();
    tracker.append("UC");
    tracker.append("BE");
    tracker.append("ST");
    assert_eq!(tracker.tags(), &["UC", "BE", "ST"]);
    assert!(tracker.contains("BE"));
}

#[test]
fn test_tracker_allows_duplicate_tags() {
    let mut tracker = StepTracker::new();
    tracker.append("Curves");
    tracker.append("Curves");
    assert_eq!(tracker.tags(), &["Curves", "Curves"]);
}

#[test]
fn test_tracker_reset_clears_tags() {
    let mut tracker = StepTracker::new();
    tracker.append("UC");
    tracker.reset();
    assert!(tracker.is_empty());
}

// ---------------------------------------------------------------------------
// Artifact naming
// ---------------------------------------------------------------------------

#[test]
fn test_artifact_name_joins_tags_into_stem() {
    let mut tracker = StepTracker::new();
    tracker.append("UC");
    tracker.append("BE");
    let name = tracker.artifact_name(Path::new("/a/b/img.fit"), None);
    assert_eq!(name, PathBuf::from("/a/b/img_UC_BE.fit"));
}

#[test]
fn test_artifact_name_without_tags_is_base() {
    let tracker = StepTracker::new();
    let name = tracker.artifact_name(Path::new("/data/target.png"), None);
    assert_eq!(name, PathBuf::from("/data/target.png"));
}

#[test]
fn test_artifact_name_suffix_override() {
    let mut tracker = StepTracker::new();
    tracker.append("ST");
    let name = tracker.artifact_name(Path::new("/a/b/img.fit"), Some(".tif"));
    assert_eq!(name, PathBuf::from("/a/b/img_ST.tif"));
}

#[test]
fn test_artifact_name_relative_base() {
    let mut tracker = StepTracker::new();
    tracker.append("CR");
    let name = tracker.artifact_name(Path::new("img.fit"), None);
    assert_eq!(name, PathBuf::from("img_CR.fit"));
}

#[test]
fn test_artifact_name_base_without_extension() {
    let mut tracker = StepTracker::new();
    tracker.append("UC");
    let name = tracker.artifact_name(Path::new("/a/img"), None);
    assert_eq!(name, PathBuf::from("/a/img_UC"));
}
