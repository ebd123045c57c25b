use trustkeep_license::{LicenseError, StoreError};

#[test]
fn error_display_validation() {
    let err = LicenseError::Validation("token must not be empty".into());
    assert!(format!("{err}").contains("validation"));
}

#[test]
fn error_display_not_configured() {
    assert!(format!("{}", LicenseError::NotConfigured).contains("not configured"));
}

#[test]
fn error_display_network() {
    let err = LicenseError::Network("timeout".into());
    assert!(format!("{err}").contains("network"));
}

#[test]
fn error_display_invalid_token() {
    let msg = format!("{}", LicenseError::InvalidToken("revoked".into()));
    assert!(msg.contains("invalid token"));
    assert!(msg.contains("revoked"));
}

#[test]
fn error_display_invalid_license() {
    let msg = format!("{}", LicenseError::InvalidLicense("expired".into()));
    assert!(msg.contains("invalid license"));
    assert!(msg.contains("expired"));
}

#[test]
fn store_not_found_maps_to_not_configured() {
    let err: LicenseError = StoreError::NotFound.into();
    assert!(matches!(err, LicenseError::NotConfigured));
}

#[test]
fn store_validation_maps_to_validation() {
    let err: LicenseError = StoreError::Validation("empty".into()).into();
    assert!(matches!(err, LicenseError::Validation(msg) if msg == "empty"));
}

#[test]
fn other_store_errors_stay_store_errors() {
    let err: LicenseError = StoreError::NothingWritten.into();
    assert!(matches!(err, LicenseError::Store(StoreError::NothingWritten)));
    assert!(format!("{err}").contains("storage"));
}

#[test]
fn error_from_serde_json() {
    let serde_err: Result<serde_json::Value, _> = serde_json::from_str("not json");
    let err: LicenseError = serde_err.unwrap_err().into();
    assert!(format!("{err}").contains("serialization"));
}
