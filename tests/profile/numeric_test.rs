//! Integration tests for the numeric profiler.

use metaprofile::config::ExtractionConfig;
use metaprofile::model::SemanticType;
use metaprofile::profile::{profile, profile_numeric};

fn rows(values: &[Option<&str>]) -> Vec<Option<String>> {
    values.iter().map(|v| v.map(str::to_string)).collect()
}

#[test]
fn test_full_summary_statistics() {
    let values = rows(&[Some("2"), Some("4"), Some("4"), Some("4"), Some("5"), Some("5"), Some("7"), Some("9")]);
    let (stats, unparsable) = profile_numeric("col", &values).unwrap();

    assert_eq!(unparsable, 0);
    assert_eq!(stats.min, Some(2.0));
    assert_eq!(stats.max, Some(9.0));
    assert_eq!(stats.mean, Some(5.0));
    // population stddev of the classic 2,4,4,4,5,5,7,9 sample
    assert_eq!(stats.stddev, Some(2.0));
}

#[test]
fn test_quartiles_use_linear_interpolation() {
    let values = rows(&[Some("1"), Some("2"), Some("3"), Some("4")]);
    let (stats, _) = profile_numeric("col", &values).unwrap();

    let quartiles = stats.quartiles.unwrap();
    assert_eq!(quartiles.q1, 1.75);
    assert_eq!(quartiles.median, 2.5);
    assert_eq!(quartiles.q3, 3.25);
}

#[test]
fn test_quartile_ordering_invariant() {
    let values = rows(&[
        Some("12.5"),
        Some("-4"),
        Some("0"),
        Some("99"),
        Some("7"),
        Some("7"),
        Some("3.25"),
    ]);
    let (stats, _) = profile_numeric("col", &values).unwrap();

    let quartiles = stats.quartiles.unwrap();
    assert!(stats.min.unwrap() <= quartiles.q1);
    assert!(quartiles.q1 <= quartiles.median);
    assert!(quartiles.median <= quartiles.q3);
    assert!(quartiles.q3 <= stats.max.unwrap());
}

#[test]
fn test_unparsable_values_count_as_nulls() {
    let values = rows(&[Some("1"), Some("x"), Some("3"), None]);
    let config = ExtractionConfig::new("s", "t");
    let profiled = profile("col", SemanticType::Numeric, &values, &config).unwrap();

    // one source null plus one unparsable value
    assert_eq!(profiled.null_count, 2);
}

#[test]
fn test_forced_numeric_on_text_column_fails() {
    // Scenario: an override forces numeric onto a column of plain words.
    let values = rows(&[Some("apple"), Some("pear")]);
    let config = ExtractionConfig::new("s", "t");
    let err = profile("fruit", SemanticType::Numeric, &values, &config).unwrap_err();

    assert_eq!(err.column, "fruit");
    assert_eq!(err.expected, SemanticType::Numeric);
}

#[test]
fn test_single_value_column() {
    let values = rows(&[Some("42")]);
    let (stats, _) = profile_numeric("col", &values).unwrap();

    assert_eq!(stats.min, Some(42.0));
    assert_eq!(stats.max, Some(42.0));
    assert_eq!(stats.stddev, Some(0.0));
    let quartiles = stats.quartiles.unwrap();
    assert_eq!(quartiles.q1, 42.0);
    assert_eq!(quartiles.median, 42.0);
    assert_eq!(quartiles.q3, 42.0);
}
