use pretty_assertions::assert_eq;
use rstest::rstest;
use sshcfg_fs::{absolutize, resolve_relative, sibling_dir};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[rstest]
#[case("extra.conf", "/home/u/.ssh/extra.conf")]
#[case("config.d/*.conf", "/home/u/.ssh/config.d/*.conf")]
#[case("/etc/ssh/ssh_config.d/*", "/etc/ssh/ssh_config.d/*")]
fn test_resolve_relative_against_including_dir(#[case] pattern: &str, #[case] expected: &str) {
    let resolved = resolve_relative(pattern, Some(Path::new("/home/u/.ssh")));
    assert_eq!(resolved, PathBuf::from(expected));
}

#[test]
fn test_resolve_relative_without_base_is_unchanged() {
    assert_eq!(resolve_relative("extra.conf", None), PathBuf::from("extra.conf"));
}

#[test]
fn test_sibling_dir_next_to_target() {
    assert_eq!(
        sibling_dir(Path::new("/home/u/.ssh/config"), "backups"),
        PathBuf::from("/home/u/.ssh/backups")
    );
}

#[test]
fn test_absolutize_collapses_dot_dot() {
    let temp = TempDir::new().unwrap();
    let nested = temp.path().join("sub");
    std::fs::create_dir(&nested).unwrap();
    std::fs::write(temp.path().join("config"), "").unwrap();

    let via_parent = nested.join("..").join("config");
    assert_eq!(absolutize(&via_parent), absolutize(&temp.path().join("config")));
}

#[test]
fn test_absolutize_missing_file_is_absolute() {
    let resolved = absolutize(Path::new("does-not-exist.conf"));
    assert!(resolved.is_absolute());
}
