use super::*;

fn raw() -> RawOptions {
    RawOptions::default()
}

fn violations(raw: RawOptions) -> ValidationErrors {
    match raw.validate() {
        Err(OliveError::Validation(errors)) => errors,
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn defaults_validate() {
    let req = raw().validate().unwrap();
    assert_eq!(req.count(), 1);
    assert_eq!((req.width(), req.height()), (100, 100));
    assert_eq!(req.kind(), ImageKind::Solid);
    assert_eq!(req.color(), "#808080");
    assert_eq!(req.start_color(), "#ffffff");
    assert_eq!(req.end_color(), "#000000");
    assert_eq!(req.direction(), Direction::Horizontal);
    assert_eq!(req.text(), "Dummy Image");
    assert_eq!(req.font(), "Arial");
    assert_eq!(req.font_file(), None);
    assert_eq!(req.font_size(), 20);
    assert_eq!(req.text_color(), "#000000");
    assert_eq!(req.background_color(), "#ffffff");
    assert_eq!(req.format(), OutputFormat::Png);
    assert_eq!(req.quality(), 80);
    assert_eq!(req.output(), Path::new("."));
    assert_eq!(req.prefix(), "dummy");
    assert_eq!(req.concurrency(), None);
    assert!(!req.verbose());
}

#[test]
fn size_overrides_width_and_height() {
    let req = RawOptions {
        width: Some("10".into()),
        height: Some("20".into()),
        size: Some("50".into()),
        ..raw()
    }
    .validate()
    .unwrap();
    assert_eq!((req.width(), req.height()), (50, 50));

    let same = RawOptions {
        width: Some("50".into()),
        height: Some("50".into()),
        ..raw()
    }
    .validate()
    .unwrap();
    assert_eq!(req, same);
}

#[test]
fn normalize_size_is_a_separate_step() {
    let normalized = RawOptions {
        size: Some("7".into()),
        ..raw()
    }
    .normalize_size();
    assert_eq!(normalized.width.as_deref(), Some("7"));
    assert_eq!(normalized.height.as_deref(), Some("7"));
}

#[test]
fn every_violation_is_reported() {
    let errors = violations(RawOptions {
        count: Some("0".into()),
        width: Some("abc".into()),
        kind: Some("circle".into()),
        quality: Some("101".into()),
        format: Some("gif".into()),
        ..raw()
    });

    assert_eq!(errors.violations().len(), 5);
    for field in ["count", "width", "type", "quality", "format"] {
        assert!(errors.has_field(field), "missing violation for {field}");
    }
    assert!(!errors.has_field("height"));
}

#[test]
fn invalid_size_is_reported_for_all_three_fields() {
    let errors = violations(RawOptions {
        size: Some("0".into()),
        ..raw()
    });
    assert!(errors.has_field("size"));
    assert!(errors.has_field("width"));
    assert!(errors.has_field("height"));
}

#[test]
fn quality_bounds_are_inclusive() {
    for q in ["0", "100"] {
        let req = RawOptions {
            quality: Some(q.into()),
            ..raw()
        }
        .validate()
        .unwrap();
        assert_eq!(req.quality().to_string(), q);
    }
    for q in ["-1", "101"] {
        let errors = violations(RawOptions {
            quality: Some(q.into()),
            ..raw()
        });
        assert_eq!(
            errors.violations()[0].message,
            "Quality must be between 0 and 100"
        );
    }
}

#[test]
fn numeric_flags_reject_non_numbers() {
    let errors = violations(RawOptions {
        count: Some("3x".into()),
        font_size: Some("big".into()),
        height: Some("1.5".into()),
        ..raw()
    });
    assert_eq!(errors.violations().len(), 3);
    assert!(
        errors
            .violations()
            .iter()
            .all(|v| v.message.starts_with("Expected an integer"))
    );
}

#[test]
fn count_zero_is_rejected_with_message() {
    let errors = violations(RawOptions {
        count: Some("0".into()),
        ..raw()
    });
    assert_eq!(
        errors.violations(),
        &[crate::FieldViolation {
            field: "count".into(),
            message: "Count must be at least 1".into(),
        }]
    );
}

#[test]
fn enums_and_concurrency_parse() {
    let req = RawOptions {
        kind: Some("gradient".into()),
        direction: Some("vertical".into()),
        format: Some("jpeg".into()),
        concurrency: Some(" 4 ".into()),
        output: Some(PathBuf::from("out")),
        verbose: true,
        ..raw()
    }
    .validate()
    .unwrap();
    assert_eq!(req.kind(), ImageKind::Gradient);
    assert_eq!(req.direction(), Direction::Vertical);
    assert_eq!(req.format(), OutputFormat::Jpeg);
    assert_eq!(req.format().extension(), "jpg");
    assert_eq!(req.concurrency(), Some(4));
    assert_eq!(req.output(), Path::new("out"));
    assert!(req.verbose());

    let errors = violations(RawOptions {
        concurrency: Some("0".into()),
        direction: Some("diagonal".into()),
        ..raw()
    });
    assert!(errors.has_field("concurrency"));
    assert!(errors.has_field("direction"));
}
