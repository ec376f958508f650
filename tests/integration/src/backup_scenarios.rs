//! Backup scenarios spanning the editor and the backup manager

use pretty_assertions::assert_eq;
use sshcfg_core::backup::{BackupManager, PruneOptions, parse_cutoff};
use sshcfg_core::{ConfigEditor, EditorConfig};
use sshcfg_test_utils::{SAMPLE_CONFIG, fake_backup, sample_config, temp_config};
use std::fs;
use tempfile::TempDir;

const NEWER: &str = "20240101010101";
const OLDER: &str = "20231224083000";

#[test]
fn test_prune_by_count_and_cutoff_select_the_older() {
    let (_temp, config) = temp_config("Host a\n");
    let newer = fake_backup(&config, NEWER, "new\n");
    let older = fake_backup(&config, OLDER, "old\n");
    let manager = BackupManager::new(&config);

    let by_count = manager
        .prune(&PruneOptions {
            keep: Some(1),
            dry_run: true,
            ..PruneOptions::default()
        })
        .unwrap();
    let by_cutoff = manager
        .prune(&PruneOptions {
            before: Some(parse_cutoff("20240101000000").unwrap()),
            dry_run: true,
            ..PruneOptions::default()
        })
        .unwrap();

    assert_eq!(by_count.selected, vec![older.clone()]);
    assert_eq!(by_cutoff.selected, vec![older.clone()]);
    assert!(newer.exists());
    assert!(older.exists());

    let report = manager
        .prune(&PruneOptions {
            keep: Some(1),
            ..PruneOptions::default()
        })
        .unwrap();
    assert_eq!(report.removed, vec![older.clone()]);
    assert!(report.failed.is_empty());
    assert!(!older.exists());
    assert!(newer.exists());
}

#[test]
fn test_restore_prefers_newest_of_two_matches() {
    let (_temp, config) = temp_config("Host current\n");
    // Matched by file name.
    fake_backup(&config, NEWER, "Host stamped\n");
    // Matched by stamp; no parseable stamp, so it sorts by its fresh mtime.
    fake_backup(&config, &format!("config.backup.{NEWER}"), "Host fresh\n");

    let manager = BackupManager::new(&config);
    let selector = format!("config.backup.{NEWER}");
    let entries = manager.discover().unwrap();
    assert_eq!(entries.iter().filter(|e| e.matches(&selector)).count(), 2);

    manager.restore(&selector, false).unwrap();
    assert_eq!(fs::read_to_string(&config).unwrap(), "Host fresh\n");
}

#[test]
fn test_edit_then_restore_returns_previous_content() {
    let temp = TempDir::new().unwrap();
    let sample = sample_config(temp.path());
    let editor = ConfigEditor::new();

    let backup = editor
        .append(&sample.config, &["bar".to_string()], &[])
        .unwrap()
        .expect("sample config is non-empty");
    assert_eq!(backup.parent().unwrap(), sample.ssh_dir.join("backups"));
    assert_ne!(fs::read_to_string(&sample.config).unwrap(), SAMPLE_CONFIG);

    let outcome = editor
        .backups_for(&sample.config)
        .restore(&backup.to_string_lossy(), false)
        .unwrap();

    assert_eq!(outcome.restored_from, backup);
    assert_eq!(fs::read_to_string(&sample.config).unwrap(), SAMPLE_CONFIG);
}

#[test]
fn test_custom_backup_directory_from_toml() {
    let (temp, config) = temp_config("Host a\n");
    let settings = EditorConfig::from_toml_str("[backups]\ndirectory = \"ssh-history\"\n").unwrap();
    let editor = ConfigEditor::with_config(settings);

    let backup = editor
        .append(&config, &["b".to_string()], &[])
        .unwrap()
        .unwrap();

    assert_eq!(backup.parent().unwrap(), temp.path().join("ssh-history"));
    assert_eq!(editor.backups_for(&config).discover().unwrap().len(), 1);
    assert!(!temp.path().join("backups").exists());
}
