mod common;

use chrono::NaiveDate;
use colmap::{
    ColumnMappingGenerator, DataType, Document, INCOMPATIBLE_DATA_TYPES, Locale, TimeUnit, Value,
    generate, time_guess::TimeGuesser,
};
use common::{documents, pair};
use serde_json::json;

fn en_us() -> Locale {
    Locale::en_us()
}

#[test]
fn numeric_strings_mixed_with_text_resolve_to_text() {
    let docs = documents(json!([{"a": "1"}, {"a": "2"}, {"a": "x"}]));
    let pairs = generate(&docs, &en_us());

    assert_eq!(pairs.len(), 1);
    let a = &pairs[0];
    assert_eq!(a.data_type(), Some(DataType::Text));
    assert_eq!(a.target.data_type, Some(DataType::Text));
    assert_eq!(a.source.width, 10);
    assert_eq!(a.target.width, 10);
    assert!(a.warning.is_none());
    assert!(a.source.format.is_none());
}

#[test]
fn millisecond_epochs_promote_to_time() {
    let docs = documents(json!([{"t": 1_547_809_200_000_i64}, {"t": 1_547_812_800_000_i64}]));
    let pairs = generate(&docs, &en_us());

    let t = pair(&pairs, "t");
    assert_eq!(t.data_type(), Some(DataType::Time));
    assert_eq!(
        t.target.format.as_deref(),
        Some(TimeUnit::Second.display_format())
    );
    assert!(t.source.format.is_none());
    assert_eq!(t.target.width, 13);
    assert!(t.warning.is_none());
}

#[test]
fn fractional_number_downgrades_epoch_column_with_warning() {
    let docs = documents(json!([{"t": 1_547_809_200_000_i64}, {"t": 1.5}]));
    let pairs = generate(&docs, &en_us());

    let t = pair(&pairs, "t");
    assert_eq!(t.data_type(), Some(DataType::Number));
    assert_eq!(t.target.data_type, Some(DataType::Number));
    assert!(t.source.format.is_none());
    assert!(t.target.format.is_none());
    assert_eq!(t.warning.as_deref(), Some(INCOMPATIBLE_DATA_TYPES));
}

#[test]
fn long_text_disables_indexing_for_good() {
    let long = "a".repeat(150);
    let docs = documents(json!([{"desc": "short"}, {"desc": long}, {"desc": "short"}]));
    let pairs = generate(&docs, &en_us());

    let desc = pair(&pairs, "desc");
    assert_eq!(desc.target.indexed, Some(false));
    assert_eq!(desc.source.indexed, None);
    assert_eq!(desc.target.width, 150);
    assert_eq!(desc.data_type(), Some(DataType::Text));
}

#[test]
fn text_at_exactly_the_threshold_stays_indexed() {
    let docs = documents(json!([{"desc": "b".repeat(100)}]));
    let pairs = generate(&docs, &en_us());
    assert_eq!(pairs[0].target.indexed, Some(true));
}

#[test]
fn always_null_field_defaults_to_text() {
    let docs = documents(json!([
        {"id": 1, "note": null},
        {"id": 2},
        {"id": 3, "note": null}
    ]));
    let pairs = generate(&docs, &en_us());

    assert_eq!(pairs.len(), 2);
    let note = pair(&pairs, "note");
    assert_eq!(note.data_type(), Some(DataType::Text));
    assert_eq!(note.target.data_type, Some(DataType::Text));
    assert_eq!(note.target.width, 10);
    assert_eq!(note.target.indexed, Some(true));
    assert!(note.warning.is_none());
}

#[test]
fn type_resolves_from_first_non_null_value() {
    let docs = documents(json!([{"score": null}, {"score": ""}, {"score": 42}, {"score": 7}]));
    let pairs = generate(&docs, &en_us());
    assert_eq!(pairs[0].data_type(), Some(DataType::Number));
    assert!(pairs[0].warning.is_none());
}

#[test]
fn empty_input_yields_no_pairs() {
    assert!(generate(&[], &en_us()).is_empty());
    assert!(generate(&[Document::new()], &en_us()).is_empty());
}

#[test]
fn pairs_follow_first_seen_field_order() {
    let docs = documents(json!([
        {"b": 1, "a": "x"},
        {"c": true, "a": "y"},
        {"d": null, "b": 2}
    ]));
    let pairs = generate(&docs, &en_us());
    let names = pairs.iter().map(|p| p.name()).collect::<Vec<_>>();
    assert_eq!(names, vec!["b", "a", "c", "d"]);
    for p in &pairs {
        assert_eq!(p.source.name, p.target.name);
    }
}

#[test]
fn booleans_objects_and_arrays_keep_their_types() {
    let docs = documents(json!([
        {"active": true, "meta": {"k": 1}, "tags": ["a", "b"]},
        {"active": false, "meta": {"k": 2}, "tags": []}
    ]));
    let pairs = generate(&docs, &en_us());
    assert_eq!(pair(&pairs, "active").data_type(), Some(DataType::Boolean));
    assert_eq!(pair(&pairs, "meta").data_type(), Some(DataType::Object));
    assert_eq!(pair(&pairs, "tags").data_type(), Some(DataType::Object));
    assert_eq!(pair(&pairs, "active").target.width, 10);
}

#[test]
fn boolean_conflict_collapses_without_warning() {
    let docs = documents(json!([{"flag": true}, {"flag": 1}]));
    let pairs = generate(&docs, &en_us());
    assert_eq!(pairs[0].data_type(), Some(DataType::Text));
    assert!(pairs[0].warning.is_none());
}

#[test]
fn text_is_never_promoted_back() {
    let docs = documents(json!([{"code": "abc"}, {"code": 12}, {"code": "2024-01-01"}]));
    let pairs = generate(&docs, &en_us());
    assert_eq!(pairs[0].data_type(), Some(DataType::Text));
    assert!(pairs[0].source.format.is_none());
}

#[test]
fn iso_text_dates_fix_source_pattern_and_display_unit() {
    let docs = documents(json!([
        {"ordered_at": "2024-01-05 10:15:00"},
        {"ordered_at": "2024-02-11 08:00:30"}
    ]));
    let pairs = generate(&docs, &en_us());
    let ordered = &pairs[0];
    assert_eq!(ordered.data_type(), Some(DataType::Time));
    assert_eq!(ordered.source.format.as_deref(), Some("%Y-%m-%d %H:%M:%S%.f"));
    assert_eq!(
        ordered.target.format.as_deref(),
        Some(TimeUnit::Second.display_format())
    );
    assert_eq!(ordered.target.width, 19);
}

#[test]
fn ambiguous_dates_follow_locale_until_resolved() {
    let docs = documents(json!([{"day": "05/06/2024"}, {"day": "07/08/2024"}]));
    let pairs = generate(&docs, &en_us());
    assert_eq!(pairs[0].data_type(), Some(DataType::Time));
    assert!(pairs[0].source.format.is_none());
    assert_eq!(
        pairs[0].target.format.as_deref(),
        Some(TimeUnit::Day.display_format())
    );

    let docs = documents(json!([{"day": "05/06/2024"}, {"day": "06/25/2024"}]));
    let pairs = generate(&docs, &"de-DE".parse::<Locale>().expect("locale"));
    assert_eq!(pairs[0].source.format.as_deref(), Some("%m/%d/%Y"));
}

#[test]
fn locale_controls_decimal_separator() {
    let docs = documents(json!([{"price": "1,5"}, {"price": "1.234,75"}]));

    let german = generate(&docs, &"de-DE".parse::<Locale>().expect("locale"));
    assert_eq!(german[0].data_type(), Some(DataType::Number));

    let english = generate(&docs, &en_us());
    assert_eq!(english[0].data_type(), Some(DataType::Text));
}

#[test]
fn column_names_imply_time_units() {
    let docs = documents(json!([
        {"created_ts": 1_547_809_200, "year": 2019, "duration_ms": 1_547_809_200_i64, "user_id": 2019}
    ]));
    let pairs = generate(&docs, &en_us());

    let created = pair(&pairs, "created_ts");
    assert_eq!(created.data_type(), Some(DataType::Time));
    assert_eq!(
        created.target.format.as_deref(),
        Some(TimeUnit::Second.display_format())
    );

    let year = pair(&pairs, "year");
    assert_eq!(year.data_type(), Some(DataType::Time));
    assert_eq!(year.target.format.as_deref(), Some(TimeUnit::Year.display_format()));

    assert_eq!(pair(&pairs, "duration_ms").data_type(), Some(DataType::Number));
    assert_eq!(pair(&pairs, "user_id").data_type(), Some(DataType::Number));
}

#[test]
fn large_counts_with_incidental_temporal_words_stay_numbers() {
    let docs = documents(json!([{
        "amount_at_risk": 150_000_000,
        "last_balance": 150_000_000,
        "population_on_record": 331_000_000,
        "login_at": 1_547_809_200
    }]));
    let pairs = generate(&docs, &en_us());

    for name in ["amount_at_risk", "last_balance", "population_on_record"] {
        let column = pair(&pairs, name);
        assert_eq!(column.data_type(), Some(DataType::Number), "{name}");
        assert!(column.target.format.is_none(), "{name}");
    }
    assert_eq!(pair(&pairs, "login_at").data_type(), Some(DataType::Time));
}

#[test]
fn rfc3339_offsets_and_zulu_share_one_time_column() {
    let docs = documents(json!([
        {"seen": "2024-01-05T10:00:00+02:00"},
        {"seen": "2024-01-05T10:00:00Z"},
        {"seen": "2024-01-06T11:30:00.250-05:00"}
    ]));
    let pairs = generate(&docs, &en_us());

    let seen = &pairs[0];
    assert_eq!(seen.data_type(), Some(DataType::Time));
    assert_eq!(seen.source.format.as_deref(), Some("%Y-%m-%dT%H:%M:%S%.f%:z"));
    assert!(seen.warning.is_none());
    assert_eq!(seen.target.width, 29);
}

#[test]
fn native_date_values_take_the_second_display_format() {
    let when = NaiveDate::from_ymd_opt(2021, 3, 4)
        .and_then(|d| d.and_hms_opt(5, 6, 7))
        .expect("valid date");
    let docs = vec![
        [("when", Value::DateTime(when))].into_iter().collect::<Document>(),
        [("when", Value::Integer(1_614_834_367_000))].into_iter().collect::<Document>(),
    ];
    let pairs = generate(&docs, &en_us());
    assert_eq!(pairs[0].data_type(), Some(DataType::Time));
    assert_eq!(pairs[0].target.width, 19);
    assert!(pairs[0].warning.is_none());
}

#[test]
fn custom_epoch_window_changes_promotion() {
    let narrow = TimeGuesser::with_window(
        NaiveDate::from_ymd_opt(2020, 1, 1).expect("date"),
        NaiveDate::from_ymd_opt(2021, 1, 1).expect("date"),
    );
    let generator = ColumnMappingGenerator::with_time_guesser(narrow);
    let docs = documents(json!([{"t": 1_547_809_200_000_i64}]));
    let pairs = generator.generate(&docs, &en_us());
    assert_eq!(pairs[0].data_type(), Some(DataType::Number));

    let pairs = ColumnMappingGenerator::new().generate(&docs, &en_us());
    assert_eq!(pairs[0].data_type(), Some(DataType::Time));
}

#[test]
fn widths_grow_monotonically_and_stay_bounded() {
    let docs = documents(json!([
        {"s": "a".repeat(40)},
        {"s": "b"},
        {"s": "c".repeat(400)}
    ]));
    let pairs = generate(&docs, &en_us());
    assert_eq!(pairs[0].source.width, 300);
    assert_eq!(pairs[0].target.width, 300);
}

#[test]
fn generation_is_repeatable() {
    let docs = documents(json!([
        {"day": "05/06/2024", "n": 3},
        {"day": "07/08/2024", "n": 4.5}
    ]));
    let generator = ColumnMappingGenerator::new();
    let first = generator.generate(&docs, &en_us());
    let second = generator.generate(&docs, &en_us());
    assert_eq!(first, second);
}
