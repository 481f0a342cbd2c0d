//! Chain construction, rendering and traversal through the public API

use errchain::{
    deepest_cause, find_in_chain, find_named, is_in_chain, new_error, wrap, ChainError,
    ResultExt, StackCapture,
};

#[derive(Debug, thiserror::Error)]
#[error("request rejected with status {code}")]
struct HttpError {
    code: u16,
}

fn wrap_quiet(err: ChainError, message: String) -> ChainError {
    ChainError::builder(message)
        .capture(StackCapture::Never)
        .cause(err)
        .build()
}

fn as_chain<'a>(err: &'a (dyn std::error::Error + 'static)) -> &'a ChainError {
    err.downcast_ref::<ChainError>().unwrap()
}

#[test]
fn test_new_error_renders_message() {
    for message in ["", "boom", "disk: full", "ünïcode"] {
        let err = new_error(message);
        assert_eq!(err.message(), message);
        assert_eq!(err.to_string(), message);
    }
}

#[test]
fn test_wrap_renders_outer_to_inner() {
    let err = wrap(wrap(new_error("root"), "mid"), "top");
    assert_eq!(err.to_string(), "top: mid: root");
}

#[test]
fn test_wrap_rendering_extends_inner_rendering() {
    let inner = wrap(new_error("root"), "mid");
    let outer = wrap(inner.clone(), "top");
    assert_eq!(outer.to_string(), format!("top: {}", inner));
}

#[test]
fn test_wrap_cause_identity() {
    let e1 = new_error("e1");
    let e2 = wrap(e1.clone(), "e2");
    assert!(e2.cause().unwrap().ptr_eq(&e1));
}

#[test]
fn test_deepest_cause_of_terminal_error() {
    let err = new_error("only");
    assert!(as_chain(deepest_cause(&err)).ptr_eq(&err));
}

#[test]
fn test_deep_chain() {
    let root = new_error("root");
    let mut err = root.clone();
    for level in 0..1_000 {
        err = wrap_quiet(err, format!("level {}", level));
    }

    assert!(as_chain(deepest_cause(&err)).ptr_eq(&root));
    assert!(is_in_chain(&err, &root));
    assert_eq!(err.chain().count(), 1_001);

    let rendered = err.to_string();
    assert!(rendered.starts_with("level 999: level 998"));
    assert!(rendered.ends_with("level 0: root"));
}

#[test]
fn test_dropping_long_chain() {
    let mut err = new_error("root");
    for level in 0..100_000 {
        err = wrap_quiet(err, format!("level {}", level));
    }
    drop(err);
}

#[test]
fn test_is_in_chain() {
    let e = new_error("e");
    let unrelated = new_error("e");

    assert!(is_in_chain(&e, &e));
    assert!(is_in_chain(&wrap(e.clone(), "x"), &e));
    assert!(!is_in_chain(&e, &unrelated));
}

#[derive(Debug, thiserror::Error)]
#[error("record missing")]
struct Missing;

#[derive(Debug, thiserror::Error)]
#[error("deadline passed")]
struct Deadline;

#[test]
fn test_is_in_chain_distinct_adopted_errors() {
    let user = wrap(Missing, "loading user");
    let orders = wrap(Deadline, "loading orders");
    let profile = wrap(Missing, "loading profile");

    assert!(!is_in_chain(&user, orders.cause().unwrap()));
    assert!(!is_in_chain(&user, profile.cause().unwrap()));
    assert!(!is_in_chain(&user, find_in_chain::<Missing>(&profile).unwrap()));

    assert!(is_in_chain(&user, user.cause().unwrap()));
    assert!(is_in_chain(&user, find_in_chain::<Missing>(&user).unwrap()));
    assert!(is_in_chain(&user, deepest_cause(&user)));
}

#[test]
fn test_is_in_chain_foreign_target_elsewhere() {
    let ours = wrap(HttpError { code: 500 }, "fetch");
    let theirs = wrap(HttpError { code: 500 }, "fetch");

    assert!(!is_in_chain(&ours, theirs.cause().unwrap()));
    assert!(!is_in_chain(&ours, find_in_chain::<HttpError>(&theirs).unwrap()));
    assert!(is_in_chain(&ours, find_in_chain::<HttpError>(&ours).unwrap()));
}

#[test]
fn test_malformed_cause_ends_traversal() {
    let malformed = ChainError::builder("malformed")
        .cause_value("a string")
        .build();
    let top = wrap(malformed.clone(), "top");

    assert!(as_chain(deepest_cause(&top)).ptr_eq(&malformed));
    assert_eq!(top.to_string(), "top: malformed");
    assert_eq!(top.chain().count(), 2);
    assert!(find_in_chain::<HttpError>(&top).is_none());
}

#[test]
fn test_find_in_chain_by_kind() {
    let err = wrap(wrap(HttpError { code: 503 }, "fetching index"), "sync");

    let http = find_in_chain::<HttpError>(&err).unwrap();
    assert_eq!(http.code, 503);
    assert_eq!(
        err.to_string(),
        "sync: fetching index: request rejected with status 503"
    );

    // The deepest cause is the foreign error itself
    assert!(deepest_cause(&err).downcast_ref::<HttpError>().is_some());
}

#[test]
fn test_find_named_kind_tag() {
    let timeout = ChainError::builder("deadline exceeded")
        .name("TimeoutError")
        .field("after_ms", 1500)
        .build();
    let err = wrap(timeout.clone(), "query");

    let found = find_named(&err, "TimeoutError").unwrap();
    assert!(found.ptr_eq(&timeout));
    assert_eq!(found.field("after_ms"), Some(&serde_json::json!(1500)));
    assert!(find_named(&err, "HttpError").is_none());
}

#[test]
fn test_context_chain() {
    fn read_manifest() -> std::io::Result<String> {
        Err(std::io::Error::new(std::io::ErrorKind::NotFound, "manifest.json missing"))
    }

    fn load() -> errchain::Result<String> {
        read_manifest().context("loading manifest")
    }

    let err = load().context("starting up").unwrap_err();
    assert_eq!(
        err.to_string(),
        "starting up: loading manifest: manifest.json missing"
    );
    assert!(find_in_chain::<std::io::Error>(&err).is_some());
}

#[test]
fn test_chain_is_shareable_across_threads() {
    let root = new_error("root");
    let err = wrap(root.clone(), "top");

    let handle = std::thread::spawn(move || {
        assert!(is_in_chain(&err, &root));
        err.to_string()
    });

    assert_eq!(handle.join().unwrap(), "top: root");
}
