//! Integration tests for the text profiler.

use metaprofile::config::ExtractionConfig;
use metaprofile::model::{ColumnStats, SemanticType};
use metaprofile::profile::{profile, profile_text};

fn rows(values: &[Option<&str>]) -> Vec<Option<String>> {
    values.iter().map(|v| v.map(str::to_string)).collect()
}

#[test]
fn test_length_statistics() {
    let values = rows(&[Some("a"), Some("abcde"), Some("abc"), None]);
    let stats = profile_text(&values);

    assert_eq!(stats.min_length, Some(1));
    assert_eq!(stats.max_length, Some(5));
    assert_eq!(stats.median_length, Some(3.0));
}

#[test]
fn test_even_sample_median_is_interpolated() {
    let values = rows(&[Some("ab"), Some("abcd")]);
    let stats = profile_text(&values);
    assert_eq!(stats.median_length, Some(3.0));
}

#[test]
fn test_all_null_column() {
    let stats = profile_text(&rows(&[None, None, None]));
    assert_eq!(stats.min_length, None);
    assert_eq!(stats.max_length, None);
    assert_eq!(stats.median_length, None);
}

#[test]
fn test_dispatcher_tracks_nulls_and_distincts() {
    let values = rows(&[Some("one"), Some("two"), Some("one"), None]);
    let config = ExtractionConfig::new("s", "t");
    let profiled = profile("notes", SemanticType::Text, &values, &config).unwrap();

    assert_eq!(profiled.null_count, 1);
    assert_eq!(profiled.distinct_count, 2);
    assert!(matches!(profiled.stats, ColumnStats::Text(_)));
}

#[test]
fn test_empty_string_is_a_value_not_a_null() {
    let values = rows(&[Some(""), Some("abc")]);
    let stats = profile_text(&values);
    assert_eq!(stats.min_length, Some(0));
    assert_eq!(stats.max_length, Some(3));
}
