use super::*;

fn rendered(versions: &[Version]) -> Vec<String> {
    versions.iter().map(|v| v.to_string()).collect()
}

#[tokio::test]
async fn test_empty_directory() {
    let dir = tempfile::tempdir().unwrap();
    let versions = list_available(dir.path()).await.unwrap();
    assert!(versions.is_empty());
}

#[tokio::test]
async fn test_versions_sorted_numerically() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["0.10.0", "0.2.0", "0.9.0"] {
        std::fs::create_dir(dir.path().join(name)).unwrap();
    }

    let versions = list_available(dir.path()).await.unwrap();
    assert_eq!(rendered(&versions), vec!["0.2.0", "0.9.0", "0.10.0"]);
}

#[tokio::test]
async fn test_plain_files_excluded() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("0.1.0")).unwrap();
    std::fs::write(dir.path().join("README.md"), "notes").unwrap();
    // A file whose name parses as a version is still not a migration
    std::fs::write(dir.path().join("9.9.9"), "").unwrap();

    let versions = list_available(dir.path()).await.unwrap();
    assert_eq!(rendered(&versions), vec!["0.1.0"]);
}

#[tokio::test]
async fn test_non_version_directory_is_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("0.1.0")).unwrap();
    std::fs::create_dir(dir.path().join("not-a-version")).unwrap();

    let err = list_available(dir.path()).await.unwrap_err();
    assert!(matches!(
        err,
        EngineError::Core(CoreError::MalformedVersion { .. })
    ));
}

#[tokio::test]
async fn test_missing_directory_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("no-such-dir");

    let err = list_available(&missing).await.unwrap_err();
    assert!(matches!(
        err,
        EngineError::Core(CoreError::IoWithPath { .. })
    ));
}
