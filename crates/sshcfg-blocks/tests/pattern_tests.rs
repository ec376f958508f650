//! Integration tests for host pattern scoring and ranking.

use proptest::prelude::*;
use rstest::rstest;
use sshcfg_blocks::{Error, HostBlock, best_score, find_exact, glob_match, parse_config_files, rank, score_pattern};
use sshcfg_test_utils::sample_config;
use tempfile::TempDir;

fn block(patterns: &[&str], lineno: usize) -> HostBlock {
    HostBlock::new(
        patterns.iter().map(|p| p.to_string()).collect(),
        "/tmp/ssh/config",
        lineno,
    )
}

#[test]
fn test_literal_beats_longer_wildcard_beats_shorter_wildcard() {
    let literal = score_pattern("foo", "foo", 0).unwrap();
    let prefix = score_pattern("foo", "foo*", 0).unwrap();
    let infix = score_pattern("foo", "f*o", 0).unwrap();

    assert!(literal > prefix);
    assert!(prefix > infix);
    assert!(score_pattern("foo", "bar*", 0).is_none());
}

#[rstest]
#[case("web1", "web?", true)]
#[case("web12", "web?", false)]
#[case("web12", "web*", true)]
#[case("db.example.com", "*.example.com", true)]
#[case("example.com", "*.example.com", false)]
#[case("WEB1", "web*", false)]
#[case("a*b", "a*b", true)]
fn test_glob_match_cases(#[case] text: &str, #[case] pattern: &str, #[case] expected: bool) {
    assert_eq!(glob_match(text, pattern), expected);
}

#[test]
fn test_fewer_wildcards_rank_higher() {
    let one = score_pattern("web01", "web*", 0).unwrap();
    let two = score_pattern("web01", "w*b*", 0).unwrap();
    assert!(one > two);
}

#[test]
fn test_earlier_declaration_wins_full_tie() {
    let first = score_pattern("web01", "web*", 0).unwrap();
    let later = score_pattern("web01", "web*", 3).unwrap();
    assert!(first > later);
}

#[test]
fn test_best_score_uses_best_pattern_of_block() {
    let b = block(&["*", "foo*", "foo"], 1);
    let score = best_score("foo", &b, 0).unwrap();
    assert_eq!(score.literal, 1);
    assert_eq!(score.length, 3);
    assert_eq!(score.declaration, 0);
}

#[test]
fn test_literal_is_sole_primary_over_included_wildcard() {
    let temp = TempDir::new().unwrap();
    let sample = sample_config(temp.path());
    let blocks = parse_config_files(&[&sample.config]);

    let ranking = rank("foo", &blocks);
    assert_eq!(ranking.primary().len(), 1);
    assert_eq!(ranking.single().unwrap().patterns, vec!["foo"]);

    let ranking = rank("foo.example.com", &blocks);
    assert_eq!(ranking.single().unwrap().patterns, vec!["*.example.com"]);
}

#[test]
fn test_rank_lists_every_match_in_parse_order() {
    let blocks = vec![block(&["*"], 1), block(&["web*"], 3), block(&["db*"], 5), block(&["web1"], 7)];

    let ranking = rank("web1", &blocks);
    let all: Vec<usize> = ranking.all().iter().map(|b| b.lineno).collect();
    assert_eq!(all, vec![1, 3, 7]);
    assert_eq!(ranking.single().unwrap().lineno, 7);
}

#[test]
fn test_no_match_reports_query() {
    let blocks = vec![block(&["web*"], 1)];
    let ranking = rank("db1", &blocks);

    assert!(ranking.is_empty());
    let err = ranking.single().unwrap_err();
    assert!(matches!(err, Error::NoMatch { ref query } if query == "db1"));
}

#[test]
fn test_ambiguous_match_lists_candidates_with_locations() {
    let blocks = vec![block(&["app*"], 2), block(&["app*"], 9)];
    let ranking = rank("app1", &blocks);

    let err = ranking.single().unwrap_err();
    let message = err.to_string();
    assert!(message.contains("/tmp/ssh/config:2"), "got: {message}");
    assert!(message.contains("/tmp/ssh/config:9"), "got: {message}");
}

#[test]
fn test_single_any_refuses_any_overlap() {
    let blocks = vec![block(&["*"], 1), block(&["web1"], 3)];
    let ranking = rank("web1", &blocks);

    assert_eq!(ranking.single().unwrap().lineno, 3);
    assert!(matches!(ranking.single_any(), Err(Error::AmbiguousMatch { .. })));
}

#[test]
fn test_find_exact_matches_declared_pattern_only() {
    let blocks = vec![block(&["web", "web.local"], 1), block(&["web*"], 4)];
    let found = find_exact("web", &blocks);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].lineno, 1);
}

proptest! {
    #[test]
    fn test_literal_pattern_matches_itself(s in "[a-z0-9.-]{0,24}") {
        prop_assert!(glob_match(&s, &s));
        let score = score_pattern(&s, &s, 0);
        prop_assert!(score.is_some());
        prop_assert_eq!(score.unwrap().literal, 1);
    }

    #[test]
    fn test_star_matches_everything(s in "\\PC*") {
        prop_assert!(glob_match(&s, "*"));
    }

    #[test]
    fn test_literal_outranks_any_wildcard(s in "[a-z]{1,12}", cut in 0usize..12) {
        let cut = cut.min(s.len());
        let wildcard = format!("{}*", &s[..cut]);
        let literal = score_pattern(&s, &s, 5).unwrap();
        let wild = score_pattern(&s, &wildcard, 0).unwrap();
        prop_assert!(literal > wild);
    }
}
