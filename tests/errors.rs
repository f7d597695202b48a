use mini_mvvm::*;
use serde_json::json;
use test_log::test;
use std::cell::RefCell;
use std::rc::Rc;

fn root(json: serde_json::Value) -> Object {
    create_reactive_root(Object::from_json(json).unwrap())
}

fn recorder() -> (Rc<RefCell<Vec<Value>>>, impl Fn(&Value) + 'static) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let seen2 = seen.clone();
    (seen, move |value: &Value| seen2.borrow_mut().push(value.clone()))
}

/// Whether `error` or anything it wraps is a [Error::PropagationDepthExceeded].
fn hit_depth_limit(error: &Error) -> bool {
    match error {
        Error::PropagationDepthExceeded { .. } => true,
        Error::Notify(failures) => failures.iter().any(hit_depth_limit),
        Error::Callback { source, .. } => source.downcast_ref::<Error>().map_or(false, hit_depth_limit),
        _ => false
    }
}

#[test]
fn test_invalid_paths() {
    let root = root(json!({ "a": 1 }));
    for path in ["", "a..b", ".a", "a."] {
        let (_, on_change) = recorder();
        assert!(matches!(subscribe(&root, path, on_change), Err(Error::InvalidPath(_))), "{:?}", path);
    }
    assert!(matches!(Path::new(Vec::<String>::new()), Err(Error::InvalidPath(_))));
}

#[test]
fn test_path_through_primitive() {
    let root = root(json!({ "a": 1 }));
    let (seen, on_change) = recorder();
    let error = subscribe(&root, "a.x", on_change).unwrap_err();
    match &error {
        Error::PathResolution { path, segment, found } => {
            assert_eq!(path, "a.x");
            assert_eq!(segment, "x");
            assert_eq!(*found, "number");
        }
        other => panic!("unexpected error: {}", other)
    }
    assert_eq!(error.to_string(), "cannot resolve `a.x`: read `x` on a number");

    // The failed subscription left nothing active and nothing live behind
    assert!(ActiveSubscriber::current().is_none());
    assert_eq!(root.subscriber_count("a"), 0);
    root.set("a", 2).unwrap();
    assert!(seen.borrow().is_empty());
}

#[test]
fn test_missing_key() {
    let root = root(json!({ "b": { "b": 2 } }));
    let (_, on_change) = recorder();
    assert!(matches!(
        subscribe(&root, "b.zz", on_change),
        Err(Error::MissingKey { ref path, ref segment }) if path == "b.zz" && segment == "zz"
    ));
    assert!(ActiveSubscriber::current().is_none());
    assert_eq!(root.subscriber_count("b"), 0);
}

#[test]
fn test_failed_subscriptions_dont_pile_up() {
    let root = root(json!({ "b": { "b": 2 } }));
    for _ in 0..1000 {
        let (_, on_change) = recorder();
        assert!(subscribe(&root, "b.zz", on_change).is_err());
    }
    assert_eq!(root.subscriber_count("b"), 0);

    // A live one registers next to whatever is left and still fires
    let (seen, on_change) = recorder();
    let _sub = subscribe(&root, "b.b", on_change).unwrap();
    assert_eq!(root.subscriber_count("b"), 1);
    root.set("b", Object::from_json(json!({ "b": 3 })).unwrap()).unwrap();
    assert_eq!(*seen.borrow(), vec![Value::from(3)]);
    assert_eq!(root.subscriber_count("b"), 1);
}

#[test]
fn test_not_an_object() {
    assert!(matches!(Object::from_json(json!(1)), Err(Error::NotAnObject { found: "number" })));
    assert!(matches!(Object::try_from(json!("s")), Err(Error::NotAnObject { found: "string" })));
    assert!(matches!(ViewModel::from_json(json!(null)), Err(Error::NotAnObject { found: "null" })));
}

#[test]
fn test_failing_subscriber_is_isolated() {
    let root = root(json!({ "a": 1 }));
    let _failing = try_subscribe(&root, "a", |_| Err("boom".into())).unwrap();
    let (seen, on_change) = recorder();
    let _ok = subscribe(&root, "a", on_change).unwrap();

    let error = root.set("a", 2).unwrap_err();
    assert_eq!(*seen.borrow(), vec![Value::from(2)]);
    assert_eq!(error.failures().len(), 1);
    match &error.failures()[0] {
        Error::Callback { path, source } => {
            assert_eq!(path, "a");
            assert_eq!(source.to_string(), "boom");
        }
        other => panic!("unexpected error: {}", other)
    }
    // The write itself went through
    assert_eq!(root.get("a"), Some(Value::from(2)));
}

#[test]
fn test_every_failure_is_reported() {
    let root = root(json!({ "a": 1 }));
    let _failing1 = try_subscribe(&root, "a", |_| Err("one".into())).unwrap();
    let (seen, on_change) = recorder();
    let _ok = subscribe(&root, "a", on_change).unwrap();
    let _failing2 = try_subscribe(&root, "a", |_| Err("two".into())).unwrap();

    let error = root.set("a", 2).unwrap_err();
    assert_eq!(error.to_string(), "2 subscriber(s) failed during notify");
    assert_eq!(error.failures().len(), 2);
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn test_path_breaks_after_write() {
    let root = root(json!({ "b": { "b": 2 } }));
    let (seen, on_change) = recorder();
    let _sub = subscribe(&root, "b.b", on_change).unwrap();

    let error = root.set("b", 5).unwrap_err();
    assert!(matches!(error.failures(), [Error::PathResolution { found: "number", .. }]));
    assert!(seen.borrow().is_empty());
    assert_eq!(root.get("b"), Some(Value::from(5)));
}

#[test]
fn test_runaway_propagation_is_detected() {
    let previous = Config { max_propagation_depth: 8 }.install();
    assert_eq!(Config::current().max_propagation_depth, 8);

    let root = root(json!({ "a": 0 }));
    let calls = Rc::new(RefCell::new(0));
    let calls2 = calls.clone();
    let root2 = root.clone();
    let root3 = root2.clone();
    // Never converges
    let _sub = try_subscribe(&root, "a", move |value| {
        *calls2.borrow_mut() += 1;
        root3.set("a", value.as_f64().unwrap() + 1.0)?;
        Ok(())
    }).unwrap();

    let error = root.set("a", 1).unwrap_err();
    assert!(hit_depth_limit(&error), "{}", error);
    assert_eq!(*calls.borrow(), 8);
    assert_eq!(root.get("a"), Some(Value::from(9)));

    // Depth is back to zero afterwards
    let _ = Config { max_propagation_depth: 1 }.install();
    let (seen, on_change) = recorder();
    let _sub2 = subscribe(&root2, "a", on_change);
    drop(_sub);
    root.set("a", 100).unwrap();
    assert_eq!(*seen.borrow(), vec![Value::from(100)]);

    previous.install();
}
