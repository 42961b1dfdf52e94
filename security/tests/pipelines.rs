use parapet_security::{
    Component, FailureKind, HttpBody, ParameterValidator, PatternFamily, Pipeline, SecurityConfig,
    SecurityEventCounter, UrlParameter,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn harness() -> (Arc<SecurityConfig>, Arc<SecurityEventCounter>) {
    let _ = env_logger::try_init();
    (
        Arc::new(SecurityConfig::default()),
        Arc::new(SecurityEventCounter::new()),
    )
}

#[test]
fn path_traversal_is_rejected_and_counted() {
    let (config, counter) = harness();
    let path = Pipeline::url_path(config, counter.clone());

    let error = path.validate(Some("/api/../../etc/passwd")).unwrap_err();
    assert_eq!(error.kind(), FailureKind::PathTraversal);
    assert_eq!(error.component(), Component::UrlPath);
    assert_eq!(counter.count(FailureKind::PathTraversal), 1);
}

#[test]
fn encoded_traversal_is_decoded_then_caught() {
    let (config, counter) = harness();
    let path = Pipeline::url_path(config, counter);

    let error = path.validate(Some("/%2e%2e/etc")).unwrap_err();
    assert_eq!(error.kind(), FailureKind::PathTraversal);

    // traversal that stays within the root is canonicalized instead
    assert_eq!(
        path.validate(Some("/api/%2e%2e/etc")).unwrap(),
        Some("/etc".into())
    );
}

#[test]
fn double_encoding_is_rejected() {
    let (config, counter) = harness();
    let path = Pipeline::url_path(config, counter.clone());

    let error = path.validate(Some("/api/%252e%252e/x")).unwrap_err();
    assert_eq!(error.kind(), FailureKind::DoubleEncoding);
    assert_eq!(counter.count(FailureKind::DoubleEncoding), 1);
}

#[test]
fn null_byte_reports_position() {
    let (config, counter) = harness();
    let path = Pipeline::url_path(config, counter.clone());

    let error = path.validate(Some("/ok%00evil")).unwrap_err();
    assert_eq!(error.kind(), FailureKind::NullByte);
    assert!(error.detail().unwrap().contains("position 3"));
    assert_eq!(counter.count(FailureKind::NullByte), 1);
}

#[test]
fn absent_and_empty_input_short_circuit() {
    let (config, counter) = harness();
    let path = Pipeline::url_path(config, counter.clone());

    assert_eq!(path.validate(None).unwrap(), None);
    assert_eq!(path.validate(Some("")).unwrap(), None);
    assert_eq!(counter.total(), 0);
}

#[test]
fn sanitized_output_respects_the_length_limit() {
    let (config, counter) = harness();
    let limit = config.max_length(Component::UrlPath);
    let path = Pipeline::url_path(config, counter);

    let error = path.validate(Some(&format!("/{}", "a".repeat(limit)))).unwrap_err();
    assert_eq!(error.kind(), FailureKind::LengthExceeded);

    let ok = path.validate(Some("/fine")).unwrap().unwrap();
    assert!(ok.chars().count() <= limit);
}

#[test]
fn pattern_families_are_attributed() {
    let (config, counter) = harness();

    let path = Pipeline::url_path(config.clone(), counter.clone());
    let error = path.validate(Some("/go/javascript:alert")).unwrap_err();
    assert_eq!(error.kind(), FailureKind::SuspiciousPattern);
    assert_eq!(error.pattern_family(), Some(PatternFamily::Xss));

    let body = Pipeline::body(config.clone(), counter.clone());
    let error = body.validate(Some("id=1 union select password")).unwrap_err();
    assert_eq!(error.pattern_family(), Some(PatternFamily::Sqli));

    let error = body.validate(Some("hello ${payload}")).unwrap_err();
    assert_eq!(error.pattern_family(), Some(PatternFamily::Template));

    assert_eq!(counter.count(FailureKind::SuspiciousPattern), 3);
}

#[test]
fn command_injection_in_path_but_not_headers() {
    let (config, counter) = harness();

    let path = Pipeline::url_path(config.clone(), counter.clone());
    let error = path.validate(Some("/run;reboot")).unwrap_err();
    assert_eq!(
        error.pattern_family(),
        Some(PatternFamily::CommandInjection)
    );

    let header = Pipeline::header_value(config, counter);
    assert_eq!(
        header.validate(Some("text/html;q=0.9")).unwrap(),
        Some("text/html;q=0.9".into())
    );
}

#[test]
fn header_values_reject_crlf() {
    let (config, counter) = harness();
    let header = Pipeline::header_value(config, counter.clone());

    let error = header.validate(Some("ok\r\nSet-Cookie: owned")).unwrap_err();
    assert_eq!(error.kind(), FailureKind::ControlCharacter);
    assert_eq!(error.component(), Component::HeaderValue);
    assert_eq!(counter.count(FailureKind::ControlCharacter), 1);
}

#[test]
fn lenient_config_counts_but_passes_patterns() {
    let counter = Arc::new(SecurityEventCounter::new());
    let body = Pipeline::body(Arc::new(SecurityConfig::lenient()), counter.clone());

    assert_eq!(
        body.validate(Some("try {{payload}} here")).unwrap(),
        Some("try {{payload}} here".into())
    );
    assert_eq!(counter.count(FailureKind::SuspiciousPattern), 1);
}

#[test]
fn pipeline_output_is_stable_under_revalidation() {
    let (config, counter) = harness();
    let path = Pipeline::url_path(config, counter);

    let once = path.validate(Some("/a//b/./c/../d")).unwrap().unwrap();
    assert_eq!(once, "/a/b/d");
    assert_eq!(path.validate(Some(&once)).unwrap(), Some(once.clone()));
}

#[test]
fn parameter_validator_sanitizes_and_counts() {
    let (config, counter) = harness();
    let validator = ParameterValidator::new(config, counter.clone());

    let sanitized = validator
        .validate(&UrlParameter::new("page", "b%41r"))
        .unwrap();
    assert_eq!(sanitized.value(), "bAr");

    let error = validator
        .validate(&UrlParameter::new("q", "x%00y"))
        .unwrap_err();
    assert_eq!(error.kind(), FailureKind::NullByte);
    assert_eq!(error.component(), Component::ParameterValue);

    let error = validator
        .validate(&UrlParameter::new("", "x"))
        .unwrap_err();
    assert_eq!(error.kind(), FailureKind::InvalidInput);
}

#[test]
fn parameter_count_limit() {
    let counter = Arc::new(SecurityEventCounter::new());
    let config = Arc::new(
        SecurityConfig::builder()
            .max_parameter_count(2)
            .build()
            .unwrap(),
    );
    let validator = ParameterValidator::new(config, counter.clone());

    let parameters: Vec<_> = (0..3)
        .map(|i| UrlParameter::new(format!("p{i}"), "v"))
        .collect();

    let error = validator.validate_all(&parameters).unwrap_err();
    assert_eq!(error.kind(), FailureKind::CountExceeded);
    assert_eq!(counter.count(FailureKind::CountExceeded), 1);

    assert!(validator.validate_all(&parameters[..2]).is_ok());
}

#[test]
fn body_validator_enforces_content_type_sets() {
    let counter = Arc::new(SecurityEventCounter::new());
    let config = Arc::new(
        SecurityConfig::builder()
            .allowed_content_types(["application/json"])
            .build()
            .unwrap(),
    );
    let validator = parapet_security::BodyValidator::new(config, counter.clone());

    let json = HttpBody::new(
        "ordinary text",
        Some("application/json; charset=utf-8".to_string()),
        None,
    );
    assert!(validator.validate(&json).is_ok());

    let html = HttpBody::new("ordinary text", Some("text/html".to_string()), None);
    let error = validator.validate(&html).unwrap_err();
    assert_eq!(error.kind(), FailureKind::InvalidInput);
    assert_eq!(counter.count(FailureKind::InvalidInput), 1);
}
