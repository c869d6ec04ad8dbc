use std::collections::HashMap;
use std::time::Duration;

use colmap::{
    BindError, DestinationError, Record, Resolver, ResolverConfig, Value, bind_column, bind_row, bind_rows,
    validate_destination,
};

#[derive(Debug, Default, PartialEq, Record)]
pub struct Limits {
    pub max_rows: u16,
    pub timeout: Duration,
}

#[derive(Debug, Default, PartialEq, Record)]
pub struct Job {
    pub name: String,
    #[record(db = ",inline")]
    pub limits: Limits,
    pub payload: serde_json::Value,
    pub raw: Value,
    pub checksum: Vec<u8>,
    #[record(db = "-")]
    pub attempts: u8,
}

#[derive(Debug, Default, Record)]
pub struct Renamed {
    #[record(db = "-", field = "legacy_name")]
    pub name: String,
    #[record(json = "-")]
    pub label: String,
    #[record(db = " -")]
    pub padded: String,
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn binds_nested_and_generic_fields() {
    init_logging();
    let mut job = Job::default();
    let bound = bind_row(
        &mut job,
        HashMap::from([
            ("Name", "nightly"),
            ("MAX_ROWS", "500"),
            ("timeout", "2m30s"),
            ("payload", "{\"a\":1}"),
            ("raw", " keep "),
            ("checksum", "abc"),
            ("attempts", "3"),
        ]),
    )
    .expect("row binds");

    assert_eq!(bound, 6);
    assert_eq!(job.name, "nightly");
    assert_eq!(job.limits.max_rows, 500);
    assert_eq!(job.limits.timeout, Duration::from_secs(150));
    assert_eq!(job.payload, serde_json::Value::String("{\"a\":1}".into()));
    assert_eq!(job.raw, Value::String(" keep ".into()));
    assert_eq!(job.checksum, b"abc".to_vec());
    assert_eq!(job.attempts, 0);
}

#[test]
fn unknown_columns_are_skipped() {
    let mut job = Job::default();
    assert!(!bind_column(&mut job, "nobody", "x").expect("no error"));
    assert!(bind_column(&mut job, "name", "x").expect("no error"));
    assert_eq!(job.name, "x");
}

#[test]
fn negative_duration_does_not_fit_std_duration() {
    let mut job = Job::default();
    let err = bind_row(&mut job, [("timeout", "-5s")]).expect_err("negative std duration");
    match err {
        BindError::TypeMismatch { column, expected } => {
            assert_eq!(column, "timeout");
            assert_eq!(expected, "std::time::Duration");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn assign_rejects_bad_paths_and_types() {
    let mut job = Job::default();
    assert!(matches!(job.assign(&[0], Value::I32(1)), Err(BindError::TypeMismatch { .. })));
    assert!(matches!(job.assign(&[42], Value::Null), Err(BindError::InvalidPath { record: "Job", .. })));
    // Opted-out fields are not addressable.
    assert!(matches!(job.assign(&[5], Value::U8(1)), Err(BindError::InvalidPath { .. })));
    assert!(job.assign(&[1, 0], Value::U16(9)).is_ok());
    assert_eq!(job.limits.max_rows, 9);
}

#[test]
fn bulk_destination_guard() {
    let mut jobs: Vec<Job> = Vec::new();
    assert_eq!(validate_destination(&&mut jobs), Ok(()));
    assert_eq!(validate_destination(&jobs), Err(DestinationError::ExpectingPointer));

    let err: BindError = DestinationError::ExpectingSliceMapStruct.into();
    assert!(err.to_string().contains("slice of maps or structs"));
}

#[test]
fn custom_resolver_config_applies_to_binding() {
    let resolver = Resolver::new(ResolverConfig {
        max_depth: 0,
        ..ResolverConfig::default()
    });
    let mut job = Job::default();
    let bound = colmap::bind::bind_row_with(&resolver, &mut job, [("max_rows", "7"), ("name", "n")])
        .expect("binds");
    assert_eq!(bound, 1);
    assert_eq!(job.limits.max_rows, 0);
}

#[test]
fn convert_for_uses_the_field_type() {
    assert_eq!(colmap::bind::convert_for::<Job>(&[1, 0], "12"), Some(Value::U16(12)));
    assert_eq!(colmap::bind::convert_for::<Job>(&[1, 0], "lots"), Some(Value::U16(0)));
    assert_eq!(colmap::bind::convert_for::<Job>(&[9], "12"), None);
}

#[test]
fn legacy_name_overrides_opt_out() {
    let mut renamed = Renamed::default();
    let bound = bind_row(&mut renamed, [("legacy_name", "x"), ("label", "l")]).expect("row binds");
    assert_eq!(bound, 2);
    assert_eq!(renamed.name, "x");
    assert_eq!(renamed.label, "l");

    assert!(renamed.assign(&[2], Value::String("p".into())).is_ok());
    assert_eq!(renamed.padded, "p");
}

#[test]
fn failed_bulk_bind_leaves_destination_unchanged() {
    let mut jobs = vec![Job::default()];
    let rows = vec![vec![("name", "first"), ("timeout", "1s")], vec![("name", "second"), ("timeout", "-5s")]];

    let result = bind_rows(&mut jobs, rows);
    assert!(matches!(result, Err(BindError::TypeMismatch { .. })));
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0], Job::default());

    let appended = bind_rows(&mut jobs, vec![vec![("name", "third")]]).expect("rows bind");
    assert_eq!(appended, 1);
    assert_eq!(jobs.len(), 2);
}
