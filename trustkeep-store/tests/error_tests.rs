use trustkeep_store::StoreError;

#[test]
fn error_display_validation() {
    let err = StoreError::Validation("token must not be empty".into());
    let msg = format!("{err}");
    assert!(msg.contains("validation"));
    assert!(msg.contains("token must not be empty"));
}

#[test]
fn error_display_not_found() {
    assert!(format!("{}", StoreError::NotFound).contains("no license record"));
}

#[test]
fn error_display_nothing_written() {
    assert!(format!("{}", StoreError::NothingWritten).contains("no rows"));
}

#[test]
fn error_from_io() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err: StoreError = io.into();
    assert!(format!("{err}").contains("IO error"));
}

#[test]
fn error_from_rusqlite() {
    let err: StoreError = rusqlite::Error::QueryReturnedNoRows.into();
    assert!(format!("{err}").contains("database error"));
}

#[test]
fn error_is_debug() {
    let _ = format!("{:?}", StoreError::Poisoned);
}
