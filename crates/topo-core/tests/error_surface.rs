use topo_core::errors::{ErrorInfo, TopoError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("id", "1")
        .with_context("reason", "example")
}

#[test]
fn potential_error_surface() {
    let err = TopoError::Potential(sample_info("P001", "dimension mismatch"));
    assert_eq!(err.info().code, "P001");
    assert!(err.info().context.contains_key("id"));
}

#[test]
fn network_error_surface() {
    let err = TopoError::Network(sample_info("N001", "unknown minimum"));
    assert_eq!(err.info().code, "N001");
    assert!(err.info().context.contains_key("reason"));
}

#[test]
fn search_and_config_error_surface() {
    let search = TopoError::Search(sample_info("S001", "coincident endpoints"));
    let config = TopoError::Config(sample_info("C001", "negative temperature"));
    assert_eq!(search.info().code, "S001");
    assert_eq!(config.info().code, "C001");
}

#[test]
fn serde_error_display_includes_context_and_hint() {
    let err = TopoError::Serde(
        ErrorInfo::new("count-mismatch", "ts files disagree")
            .with_context("ts.data", "3")
            .with_hint("re-dump the network"),
    );
    let rendered = err.to_string();
    assert!(rendered.starts_with("serde error: ts files disagree (code: count-mismatch)"));
    assert!(rendered.contains("ts.data=3"));
    assert!(rendered.contains("hint: re-dump the network"));
}

#[test]
fn dimension_mismatch_records_sizes() {
    let err = TopoError::dimension_mismatch(2, 3);
    assert!(matches!(&err, TopoError::Potential(info) if info.code == "dimension-mismatch"));
    assert_eq!(err.info().context["expected"], "2");
    assert_eq!(err.info().context["found"], "3");
}

#[test]
fn errors_round_trip_json() {
    let err = TopoError::Rng(sample_info("RN001", "invalid seed"));
    let json = serde_json::to_string(&err).expect("serialize");
    let decoded: TopoError = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, err);
}
