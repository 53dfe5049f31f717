//! End-to-end tests: sample → schema → descriptor → schema → records.

use chrono::{DateTime, Utc};
use data_mocker::fields::{
    decode, Descriptor, FieldError, FieldSpec, ProviderExtension, Resolution, TypeRegistry,
};
use data_mocker::infer::Matcher;
use data_mocker::DataMocker;
use rand::rngs::StdRng;
use rand::Rng;
use serde_json::{json, Value};
use tempfile::TempDir;

fn nested_sample() -> Value {
    json!({
        "a": {"1": "2022-01-01T00:00:00", "2": "20.22", "3": 20.22, "4": 100},
        "b": 1680441525,
        "c": 1680441525000u64,
        "d": "i am strong",
        "e": ["1680441525000000", "2022-01-01T00:00:001", {"f": 1000, "g": "10000"}]
    })
}

fn nested_descriptor() -> Descriptor {
    Descriptor::from_json(
        r#"{"a": {"1": "Datetime_%Y-%m-%dT%H:%M:%S", "2": "StrFloat_2_10", "3": "Float_2_10", "4": "Int"},
            "b": "Timestamp_0", "c": "Timestamp_3", "d": "Str",
            "e": ["StrTimestamp_6", "Str", {"f": "Int", "g": "StrInt"}]}"#,
    )
    .unwrap()
}

#[test]
fn test_nested_sample_infers_expected_tree() {
    let registry = TypeRegistry::builtin();
    let reference: DateTime<Utc> = DateTime::from_timestamp(1_680_441_525, 0).unwrap();
    let matcher = Matcher::new(&registry).with_reference_time(reference);

    let models = matcher.infer(&nested_sample()).unwrap();
    let mut mocker = DataMocker::new().with_models(models).with_seed(42);
    assert_eq!(mocker.descriptor(), nested_descriptor());

    let record = mocker.mock().unwrap();
    assert!(record["b"].is_i64());
    assert!(record["e"][0].as_str().unwrap().bytes().all(|b| b.is_ascii_digit()));
    assert_eq!(record["e"].as_array().unwrap().len(), 3);
}

#[test]
fn test_descriptor_round_trip_is_stable() {
    let registry = TypeRegistry::builtin();
    let descriptor = nested_descriptor();

    let once = decode(&descriptor, &registry).unwrap().descriptor();
    let twice = decode(&once, &registry).unwrap().descriptor();
    assert_eq!(once, descriptor);
    assert_eq!(twice, descriptor);

    let json = descriptor.to_json_pretty().unwrap();
    assert_eq!(Descriptor::from_json(&json).unwrap(), descriptor);
    let yaml = descriptor.to_yaml().unwrap();
    assert_eq!(Descriptor::from_yaml(&yaml).unwrap(), descriptor);
}

#[test]
fn test_mocked_records_reinfer_to_same_descriptor() {
    let registry = TypeRegistry::builtin();
    let reference = Utc::now();
    let matcher = Matcher::new(&registry).with_reference_time(reference);

    let mut mocker = DataMocker::from_descriptor(&nested_descriptor())
        .unwrap()
        .with_seed(42);
    for record in mocker.mock_many(1000).unwrap() {
        let reinferred = matcher.infer(&record).unwrap();
        assert_eq!(reinferred.descriptor(), nested_descriptor(), "record {record}");
    }
}

#[test]
fn test_default_datetime_and_flat_temporals_reinfer() {
    let descriptor = Descriptor::from_json(
        r#"{"when": "Datetime", "iso": ["Datetime_%Y-%m-%dT%H:%M:%S"],
            "ms": "Timestamp_3", "s": "Timestamp_0", "us": "StrTimestamp_6",
            "count": "StrInt", "price": "StrFloat_2_10", "label": "Str"}"#,
    )
    .unwrap();
    let mut mocker = DataMocker::from_descriptor(&descriptor).unwrap().with_seed(7);
    let expected = mocker.descriptor();
    assert_eq!(
        expected.to_string(),
        r#"{"when":"Datetime_%Y-%m-%d %H:%M:%S","iso":["Datetime_%Y-%m-%dT%H:%M:%S"],"ms":"Timestamp_3","s":"Timestamp_0","us":"StrTimestamp_6","count":"StrInt","price":"StrFloat_2_10","label":"Str"}"#
    );

    for record in mocker.mock_many(1000).unwrap() {
        let reinferred = DataMocker::from_sample(&record).unwrap();
        assert_eq!(reinferred.descriptor(), expected, "record {record}");
    }
}

#[test]
fn test_underscore_format_survives_round_trip() {
    let mut mocker = DataMocker::new()
        .with_models(FieldSpec::dict([(
            "day",
            FieldSpec::datetime("%Y_%m_%d").unwrap(),
        )]))
        .with_seed(1);
    let descriptor = mocker.descriptor();
    assert_eq!(descriptor.to_string(), r#"{"day":"Datetime_%Y\\_%m\\_%d"}"#);

    let mut decoded = DataMocker::from_descriptor(&descriptor).unwrap();
    assert_eq!(decoded.descriptor(), descriptor);

    let day = decoded.mock().unwrap()["day"].as_str().unwrap().to_string();
    assert_eq!(day.split('_').count(), 3);
    let _ = mocker.mock().unwrap();
}

#[test]
fn test_unknown_and_malformed_descriptors() {
    let err = DataMocker::from_descriptor(&Descriptor::from_json(r#"{"x": "Decimal"}"#).unwrap())
        .unwrap_err();
    assert_eq!(err, FieldError::UnknownFieldType("Decimal".to_string()));

    let err = DataMocker::from_descriptor(&Descriptor::from("Timestamp_7")).unwrap_err();
    assert!(matches!(
        err,
        FieldError::MalformedDescriptor { ref descriptor, .. } if descriptor == "Timestamp_7"
    ));
}

struct Tickers;

impl ProviderExtension for Tickers {
    fn name(&self) -> &str {
        "tickers"
    }

    fn call(&self, method: &str, rng: &mut StdRng) -> Option<Value> {
        match method {
            "ticker" => {
                let symbols = ["AAPL", "MSFT", "NVDA"];
                Some(Value::from(symbols[rng.random_range(0..symbols.len())]))
            }
            _ => None,
        }
    }
}

#[test]
fn test_provider_extension_reaches_existing_fields() {
    let mut mocker =
        DataMocker::from_descriptor(&Descriptor::from_json(r#"{"sym": "Fake_ticker"}"#).unwrap())
            .unwrap()
            .with_seed(9);

    let err = mocker.mock().unwrap_err();
    assert_eq!(err, FieldError::UnknownProviderMethod("ticker".to_string()));

    mocker.add_provider(Tickers);
    let record = mocker.mock().unwrap();
    assert!(["AAPL", "MSFT", "NVDA"].contains(&record["sym"].as_str().unwrap()));
}

#[test]
fn test_builder_with_provider_extension() {
    let mut mocker = DataMocker::builder()
        .declare("id", "UInt32")
        .field("sym", FieldSpec::fake("ticker").unwrap())
        .field("at", FieldSpec::timestamp(Resolution::Seconds))
        .provider(Tickers)
        .seed(5)
        .build()
        .unwrap();

    assert_eq!(
        mocker.descriptor().to_string(),
        r#"{"id":"UInt32","sym":"Fake_ticker","at":"Timestamp_0"}"#
    );
    let record = mocker.mock().unwrap();
    assert!(record["id"].as_u64().unwrap() <= u32::MAX as u64);
}

#[test]
fn test_descriptor_file_to_jsonl() {
    let temp_dir = TempDir::new().unwrap();
    let schema_path = temp_dir.path().join("schema.yaml");
    std::fs::write(&schema_path, "name: Str\nage: UInt8\nscores: [Float_3_2, Float_3_2]\n").unwrap();

    let mocker = DataMocker::from_descriptor_file(&schema_path)
        .unwrap()
        .with_seed(42);
    let output_path = temp_dir.path().join("out.jsonl");
    let metrics = mocker.into_populator().populate(&output_path, 20).unwrap();
    assert_eq!(metrics.rows_written, 20);

    let content = std::fs::read_to_string(&output_path).unwrap();
    for line in content.lines() {
        let record: Value = serde_json::from_str(line).unwrap();
        assert!(record["age"].as_u64().unwrap() <= 255);
        for score in record["scores"].as_array().unwrap() {
            assert!(score.as_f64().unwrap().abs() < 1000.0);
        }
    }
}
