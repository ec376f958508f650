//! End-to-end editing flows
//!
//! These tests exercise the complete path: parse -> match -> mutate -> re-parse.

use pretty_assertions::assert_eq;
use sshcfg_blocks::{format_block, parse_config, parse_config_files, rank};
use sshcfg_core::{ConfigEditor, Error, add_tags, hosts_with_tag, set_tag_color, tag_counts};
use sshcfg_fs::absolutize;
use sshcfg_test_utils::{sample_config, temp_config, write_config};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_literal_host_is_sole_primary_over_included_wildcard() {
    let temp = TempDir::new().unwrap();
    let sample = sample_config(temp.path());

    let blocks = parse_config_files(&[&sample.config]);
    let ranking = rank("foo", &blocks);

    assert_eq!(ranking.primary().len(), 1);
    let foo = ranking.single().unwrap();
    assert_eq!(foo.patterns, vec!["foo"]);
    assert_eq!(foo.source_file, absolutize(&sample.config));

    let ranking = rank("db.example.com", &blocks);
    assert_eq!(ranking.single().unwrap().source_file, absolutize(&sample.include));
}

#[test]
fn test_set_option_on_matched_host() {
    let temp = TempDir::new().unwrap();
    let sample = sample_config(temp.path());

    let blocks = parse_config_files(&[&sample.config]);
    let mut updated = rank("foo", &blocks).single().unwrap().clone();
    let original = updated.clone();
    updated.set_option("user", "bob");
    updated.set_option("Port", "2222");

    ConfigEditor::new()
        .replace(&original.source_file, &original, &updated.patterns, &updated.options)
        .unwrap();

    let blocks = parse_config_files(&[&sample.config]);
    let foo = rank("foo", &blocks).single().unwrap();
    assert_eq!(foo.option("User"), Some("bob"));
    assert_eq!(foo.option("Port"), Some("2222"));
    assert_eq!(foo.option("HostName"), Some("foo.example.com"));
    assert_eq!(blocks.len(), 2, "included file must still be parsed");
}

#[test]
fn test_replace_with_same_content_is_identity() {
    let content = "\
# @tagdef prod red

# @tags: prod
Host web
    HostName 10.0.0.5
    User deploy

Host db
    HostName 10.0.0.6
";
    let (_temp, config) = temp_config(content);

    for query in ["web", "db"] {
        let blocks = parse_config_files(&[&config]);
        let block = rank(query, &blocks).single().unwrap().clone();
        ConfigEditor::new()
            .replace(&config, &block, &block.patterns, &block.options)
            .unwrap();
    }

    assert_eq!(fs::read_to_string(&config).unwrap(), content);
}

#[test]
fn test_appended_block_parses_back_identically() {
    let (_temp, config) = temp_config("Host a\n    User x");
    let patterns = vec!["b".to_string(), "b.local".to_string()];
    let options = vec![
        ("HostName".to_string(), "10.1.1.1".to_string()),
        ("IdentityFile".to_string(), "~/.ssh/id_b".to_string()),
    ];

    ConfigEditor::new().append(&config, &patterns, &options).unwrap();

    let content = fs::read_to_string(&config).unwrap();
    assert!(content.ends_with(&format!("\n\n{}", format_block(&patterns, &options))));

    let blocks = parse_config_files(&[&config]);
    assert_eq!(blocks[1].patterns, patterns);
    assert_eq!(blocks[1].options, options);
}

#[test]
fn test_ambiguous_query_blocks_mutation() {
    let (_temp, config) = temp_config("Host web*\n    User a\n\nHost web?\n    User b\n");
    let blocks = parse_config_files(&[&config]);

    let ranking = rank("web1", &blocks);
    let err = ranking.single().map(|_| ()).map_err(Error::from).unwrap_err();
    let message = err.to_string();
    assert!(message.contains(":1"), "got: {message}");
    assert!(message.contains(":4"), "got: {message}");

    // Read-only lookups still resolve to the first declaration.
    assert_eq!(ranking.best().unwrap().lineno, 1);
}

#[test]
fn test_tag_lifecycle() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "config", "Host api\n    HostName 10.0.0.2\n");
    let editor = ConfigEditor::new();

    set_tag_color(&editor, &config, "prod", "red").unwrap();

    let parsed = parse_config(&[&config]);
    let api = rank("api", &parsed.blocks).single().unwrap().clone();
    add_tags(&editor, &parsed, &api, &["PROD"]).unwrap();

    let parsed = parse_config(&[&config]);
    assert_eq!(tag_counts(&parsed.blocks).get("prod"), Some(&1));
    let tagged: Vec<String> = hosts_with_tag(&parsed.blocks, "prod")
        .iter()
        .map(|b| b.display_name())
        .collect();
    assert_eq!(tagged, vec!["api"]);

    assert_eq!(
        fs::read_to_string(&config).unwrap(),
        "# @tagdef prod red\n\n# @tags: prod\nHost api\n    HostName 10.0.0.2\n"
    );
}

#[test]
fn test_remove_then_reparse_line_numbers() {
    let content = "\
Host a
    User 1
    Port 1

Host b
    User 2
    Port 2
Host c
    User 3
    Port 3
";
    let (_temp, config) = temp_config(content);
    let blocks = parse_config_files(&[&config]);
    let b = rank("b", &blocks).single().unwrap().clone();
    assert_eq!(b.lineno, 5);

    ConfigEditor::new().remove(&config, &b).unwrap();

    let updated = fs::read_to_string(&config).unwrap();
    assert_eq!(updated.lines().count(), 7);
    let lines: Vec<&str> = updated.lines().collect();
    for block in parse_config_files(&[&config]) {
        assert!(lines[block.lineno - 1].starts_with("Host "));
    }
}
