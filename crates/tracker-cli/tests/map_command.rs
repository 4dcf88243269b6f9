use std::fs;
use std::path::PathBuf;

use tracker_cli::cli::MapArgs;
use tracker_cli::commands::map::map_query;
use tracker_search::{MapperError, SearchSettings, ValidationError};

const METADATA: &str = r#"{
  "organisationUnits": [
    { "uid": "ImspTQPwCqd", "name": "Sierra Leone" },
    { "uid": "O6uvpzGd5pu", "name": "Bo", "parent": "ImspTQPwCqd" },
    { "uid": "DiszpKrYNg8", "name": "Bo Clinic", "parent": "O6uvpzGd5pu" },
    { "uid": "at6UHUQatSo", "name": "Bombali", "parent": "ImspTQPwCqd" }
  ],
  "programs": [{ "uid": "IpHINAT79UW", "name": "Child Programme" }],
  "trackedEntityAttributes": [
    { "uid": "w75KJ2mc4zz", "name": "First name" },
    { "uid": "zDhUuAYrxNC", "name": "Last name" }
  ],
  "trackedEntityTypes": [{ "uid": "nEenWmSyUEp", "name": "Person" }],
  "users": [
    { "uid": "xE7jOejl9FI", "username": "admin", "searchOrganisationUnits": ["O6uvpzGd5pu"] }
  ]
}"#;

fn args(dir: &tempfile::TempDir, user: &str, query: &str) -> MapArgs {
    let metadata: PathBuf = dir.path().join("metadata.json");
    fs::write(&metadata, METADATA).expect("write metadata");
    MapArgs {
        metadata,
        user: user.to_string(),
        query: query.to_string(),
        compact: true,
    }
}

#[tokio::test]
async fn maps_query_for_snapshot_user() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let args = args(
        &dir,
        "admin",
        "ou=DiszpKrYNg8&program=IpHINAT79UW&filter=w75KJ2mc4zz:LIKE:ja&eventEndDate=2020-07-07",
    );

    let params = map_query(&args, &SearchSettings::default())
        .await
        .expect("mapping succeeds");
    assert_eq!(params.organisation_units[0].uid, "DiszpKrYNg8");
    assert_eq!(params.filters[0].uid(), "w75KJ2mc4zz");
    assert_eq!(params.page_size, None);
    assert_eq!(params.page_size_with_default(), 50);

    let json = serde_json::to_value(&params).expect("serializes");
    assert_eq!(json["eventEndDate"], "2020-07-08T00:00:00Z");
    assert_eq!(json["program"]["uid"], "IpHINAT79UW");
}

#[tokio::test]
async fn reports_scope_violation() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let args = args(&dir, "xE7jOejl9FI", "ou=at6UHUQatSo");

    let err = map_query(&args, &SearchSettings::default())
        .await
        .expect_err("unit is outside the user's scope");
    let mapper_error = err.downcast_ref::<MapperError>().expect("mapper error");
    assert_eq!(
        mapper_error.as_validation(),
        Some(&ValidationError::OrganisationUnitNotInSearchScope(
            "at6UHUQatSo".into()
        ))
    );
}

#[tokio::test]
async fn unknown_user_is_an_error() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let args = args(&dir, "nobody", "");
    let err = map_query(&args, &SearchSettings::default())
        .await
        .expect_err("user does not exist");
    assert!(err.to_string().contains("user not found"));
}

#[tokio::test]
async fn unparseable_query_is_an_error() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let args = args(&dir, "admin", "pageSize=many");
    let err = map_query(&args, &SearchSettings::default())
        .await
        .expect_err("page size is not a number");
    assert!(err.downcast_ref::<ValidationError>().is_some());
}
