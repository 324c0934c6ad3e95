use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        TypesetError::invalid("x")
            .to_string()
            .contains("invalid configuration:")
    );
    assert!(
        TypesetError::measure("x")
            .to_string()
            .contains("measurement error:")
    );
    assert!(
        TypesetError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = TypesetError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn promoted_warning_keeps_its_message() {
    let w = Warning::FitUnattainable {
        block: "rules".to_string(),
        floor: 6.0,
    };
    let err = TypesetError::from(w.clone());
    assert_eq!(err.to_string(), w.to_string());
    assert!(err.to_string().contains("'rules'"));
}

#[test]
fn warnings_serialize_with_kind_tag() {
    let w = Warning::Overflow {
        required: 320.0,
        available: 300.0,
    };
    let v = serde_json::to_value(&w).unwrap();
    assert_eq!(v["kind"], "overflow");
    assert_eq!(v["required"], 320.0);
}
