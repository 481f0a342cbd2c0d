//! Result adapters for synchronous and asynchronous computations

use errchain::{new_error, try_async, try_sync, ChainError, Result};
use serde_json::json;

#[tokio::test]
async fn test_try_async_resolved_value() {
    let result = try_async(async { Ok::<_, ChainError>(5) }).await;
    assert_eq!(result.unwrap(), 5);
}

#[tokio::test]
async fn test_try_async_resolved_unit_and_none() {
    assert!(try_async(async { Ok::<(), ChainError>(()) }).await.is_ok());

    let result = try_async(async { Ok::<Option<String>, ChainError>(None) }).await;
    assert_eq!(result.unwrap(), None);
}

#[tokio::test]
async fn test_try_async_rejection_keeps_identity() {
    let err = new_error("x");
    let rejected = err.clone();

    let result: Result<()> = try_async(async move { Err(rejected) }).await;
    assert!(result.unwrap_err().ptr_eq(&err));
}

#[tokio::test]
async fn test_try_async_panic_with_plain_string() {
    let result: Result<()> = try_async(async {
        if true {
            panic!("plain string");
        }
        Ok::<(), ChainError>(())
    })
    .await;

    assert_eq!(result.unwrap_err().message(), "plain string");
}

#[tokio::test]
async fn test_try_async_awaits_suspension_points() {
    let result = try_async(async {
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        Err::<u8, _>(std::io::Error::new(std::io::ErrorKind::Other, "late failure"))
    })
    .await;

    let err = result.unwrap_err();
    assert!(err.is_foreign());
    assert_eq!(err.to_string(), "late failure");
}

#[test]
fn test_try_sync_mirrors_async() {
    assert_eq!(try_sync(|| Ok::<_, ChainError>("data")).unwrap(), "data");

    let err = new_error("x");
    let thrown = err.clone();
    let result: Result<()> = try_sync(move || Err(thrown));
    assert!(result.unwrap_err().ptr_eq(&err));

    let result = try_sync(|| -> Result<()> { panic!("plain string") });
    assert_eq!(result.unwrap_err().to_string(), "plain string");
}

#[test]
fn test_try_sync_panic_with_json_value() {
    let result = try_sync(|| -> Result<()> { std::panic::panic_any(json!({ "code": 1 })) });
    assert_eq!(result.unwrap_err().message(), r#"{"code":1}"#);
}

#[test]
fn test_try_sync_runs_immediately() {
    let mut calls = 0;
    let result = try_sync(|| {
        calls += 1;
        Ok::<_, ChainError>(calls)
    });

    assert_eq!(result.unwrap(), 1);
    assert_eq!(calls, 1);
}
