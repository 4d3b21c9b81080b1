// tests/resolver_tests.rs

use tkpath::ast::Token;
use tkpath::grammar::ContainerRole;
use tkpath::{Engine, ErrorKind, Options, PathError, Value};

fn int(n: i64) -> Value {
    Value::Integer(n)
}

fn text(s: &str) -> Value {
    Value::String(s.to_string())
}

fn accounts() -> Value {
    Value::object([
        (
            "accounts",
            Value::list([
                Value::object([
                    ("owner", text("ada")),
                    ("checking", int(10)),
                    ("savings", int(200)),
                ]),
                Value::object([
                    ("owner", text("bob")),
                    ("checking", int(30)),
                    ("savings", int(5)),
                    ("saver", int(90)),
                ]),
            ]),
        ),
        ("meta", Value::object([("field", text("owner"))])),
    ])
}

// ============================================================================
// Keys and Indices
// ============================================================================

#[test]
fn test_simple_keys() {
    let engine = Engine::new();
    let doc = accounts();
    assert_eq!(engine.get(&doc, "accounts.0.owner", &[]), Some(text("ada")));
    assert_eq!(engine.get(&doc, "accounts.1.checking", &[]), Some(int(30)));
}

#[test]
fn test_missing_key_fails() {
    let engine = Engine::new();
    let doc = accounts();
    assert_eq!(engine.get(&doc, "accounts.5", &[]), None);
    let err = engine.try_get(&doc, "accounts.0.loan", &[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ResolutionFailed);
}

#[test]
fn test_quoted_key_with_specials() {
    let engine = Engine::new();
    let doc = Value::object([("a.b", Value::object([("c", int(1))]))]);
    assert_eq!(engine.get(&doc, "'a.b'.c", &[]), Some(int(1)));
}

// ============================================================================
// Wildcards
// ============================================================================

#[test]
fn test_wildcard_read() {
    let engine = Engine::new();
    let doc = Value::object([("a", int(1)), ("ab", int(2)), ("b", int(3))]);
    assert_eq!(engine.get(&doc, "a*", &[]), Some(Value::list([int(1), int(2)])));
    assert_eq!(engine.get(&doc, "*b", &[]), Some(Value::list([int(2), int(3)])));
    assert_eq!(engine.get(&doc, "z*", &[]), Some(Value::list([])));
}

#[test]
fn test_wildcard_write() {
    let engine = Engine::new();
    let doc = Value::object([("a", int(1)), ("ab", int(2)), ("b", int(3))]);
    assert!(engine.set(&doc, "a*", int(0), &[]));
    assert_eq!(
        doc,
        Value::object([("a", int(0)), ("ab", int(0)), ("b", int(3))])
    );
    // no matching key means nothing to set, which still succeeds
    assert!(engine.set(&doc, "z*", int(0), &[]));
    assert_eq!(engine.get(&doc, "z", &[]), None);
}

// ============================================================================
// Collections
// ============================================================================

#[test]
fn test_collection_read() {
    let engine = Engine::new();
    let doc = Value::object([("x", Value::list([int(10), int(20), int(30)]))]);
    assert_eq!(engine.get(&doc, "x.0,2", &[]), Some(Value::list([int(10), int(30)])));
}

#[test]
fn test_collection_flattens_wildcard_members() {
    let engine = Engine::new();
    let doc = accounts();
    assert_eq!(
        engine.get(&doc, "accounts.1.sav*,checking", &[]),
        Some(Value::list([int(5), int(90), int(30)]))
    );
}

#[test]
fn test_collection_write() {
    let engine = Engine::new();
    let doc = Value::object([("a", int(1)), ("b", int(2)), ("c", int(3))]);
    assert!(engine.set(&doc, "a,b", int(0), &[]));
    assert_eq!(
        doc,
        Value::object([("a", int(0)), ("b", int(0)), ("c", int(3))])
    );
}

// ============================================================================
// Modifiers
// ============================================================================

#[test]
fn test_parent_modifier_reads_sibling() {
    let engine = Engine::new();
    let doc = Value::object([("a", Value::object([("b", int(1))])), ("b", int(2))]);
    assert_eq!(engine.get(&doc, "a.<b", &[]), Some(int(2)));

    let doc = Value::object([("a", Value::object([("b", int(1))]))]);
    assert_eq!(engine.get(&doc, "a.<b", &[]), None);
}

#[test]
fn test_parent_past_root_fails() {
    let engine = Engine::new();
    let doc = Value::object([("a", int(1))]);
    assert_eq!(engine.get(&doc, "<<a", &[]), None);
}

#[test]
fn test_root_modifier() {
    let engine = Engine::new();
    let doc = accounts();
    assert_eq!(engine.get(&doc, "accounts.0.~meta.field", &[]), Some(text("owner")));
}

#[test]
fn test_placeholder_modifier() {
    let engine = Engine::new();
    let doc = Value::object([("foo", int(42))]);
    assert_eq!(engine.get(&doc, "%1", &[text("foo")]), Some(int(42)));

    let doc = accounts();
    assert_eq!(
        engine.get(&doc, "accounts.%1.%2", &[int(1), text("owner")]),
        Some(text("bob"))
    );
}

#[test]
fn test_placeholder_without_argument_fails() {
    let engine = Engine::new();
    let doc = Value::object([("foo", int(42))]);
    assert_eq!(engine.get(&doc, "%2", &[text("foo")]), None);
}

#[test]
fn test_context_modifier() {
    let engine = Engine::new();
    let doc = Value::object([("unused", int(0))]);
    let arg = Value::object([("x", int(7))]);
    assert_eq!(engine.get(&doc, "@1.x", &[arg]), Some(int(7)));
}

#[test]
fn test_context_modifier_cannot_be_written() {
    let engine = Engine::new();
    let doc = Value::empty_map();
    assert!(!engine.set(&doc, "@1", int(1), &[int(0)]));
}

// ============================================================================
// Containers
// ============================================================================

#[test]
fn test_eval_property() {
    let engine = Engine::new();
    let doc = accounts();
    assert_eq!(
        engine.get(&doc, "accounts.1{~meta.field}", &[]),
        Some(text("bob"))
    );
}

#[test]
fn test_eval_property_write() {
    let engine = Engine::new();
    let doc = Value::object([("key", text("slot")), ("m", Value::empty_map())]);
    assert!(engine.set(&doc, "m{~key}", int(3), &[]));
    assert_eq!(engine.get(&doc, "m.slot", &[]), Some(int(3)));
}

#[test]
fn test_call_with_receiver_and_arguments() {
    let engine = Engine::new();
    let greet = Value::callable("greet", |receiver, args| {
        let name = receiver.get_key("name").unwrap_or(Value::Null).to_key()?;
        let greeting = args.first().map(Value::to_key).transpose()?.unwrap_or_default();
        Ok(Value::String(format!("{} {}", greeting, name)))
    });
    let doc = Value::object([(
        "user",
        Value::object([("name", text("ada")), ("greet", greet)]),
    )]);

    assert_eq!(engine.get(&doc, "user.greet(hello)", &[]), Some(text("hello ada")));
    assert_eq!(
        engine.get(&doc, "user.greet(%1)", &[text("hi")]),
        Some(text("hi ada"))
    );
}

#[test]
fn test_call_spreads_collection_arguments() {
    let engine = Engine::new();
    let count = Value::callable("count", |_, args| Ok(Value::Integer(args.len() as i64)));
    let doc = Value::object([("count", count), ("a", int(1))]);
    assert_eq!(engine.get(&doc, "count(x,y,z)", &[]), Some(int(3)));
    assert_eq!(engine.get(&doc, "count()", &[]), Some(int(0)));
}

#[test]
fn test_call_on_non_callable() {
    let engine = Engine::new();
    let doc = Value::object([("a", int(1))]);
    let err = engine.try_get(&doc, "a()", &[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotCallable);
}

#[test]
fn test_call_cannot_be_assigned() {
    let engine = Engine::new();
    let f = Value::callable("f", |_, _| Ok(Value::Null));
    let doc = Value::object([("f", f)]);
    assert!(!engine.set(&doc, "f()", int(1), &[]));
}

// ============================================================================
// Intrinsics
// ============================================================================

#[test]
fn test_sort_and_index() {
    let engine = Engine::new();
    let doc = Value::object([("list", Value::list([int(3), int(1), int(2)]))]);
    assert_eq!(engine.get(&doc, "list.sort().0", &[]), Some(int(1)));
    // sorted in place
    assert_eq!(engine.get(&doc, "list.2", &[]), Some(int(3)));
}

#[test]
fn test_sort_wildcard_results() {
    let engine = Engine::new();
    let doc = accounts();
    assert_eq!(
        engine.get(&doc, "accounts.1.sav*.sort()", &[]),
        Some(Value::list([int(5), int(90)]))
    );
    assert_eq!(engine.get(&doc, "accounts.0.sav*.sort().0", &[]), Some(int(200)));
}

#[test]
fn test_length_and_string_methods() {
    let engine = Engine::new();
    let doc = accounts();
    assert_eq!(engine.get(&doc, "accounts.length", &[]), Some(int(2)));
    assert_eq!(engine.get(&doc, "accounts.0.owner.upper()", &[]), Some(text("ADA")));
    assert_eq!(
        engine.get(&doc, "accounts.0.keys().join(;)", &[]),
        Some(text("owner;checking;savings"))
    );
}

#[test]
fn test_own_key_shadows_intrinsic() {
    let engine = Engine::new();
    let doc = Value::object([("length", text("own"))]);
    assert_eq!(engine.get(&doc, "length", &[]), Some(text("own")));
}

// ============================================================================
// Writes
// ============================================================================

#[test]
fn test_set_existing_key() {
    let engine = Engine::new();
    let doc = accounts();
    assert!(engine.set(&doc, "accounts.0.checking", int(11), &[]));
    assert_eq!(engine.get(&doc, "accounts.0.checking", &[]), Some(int(11)));
}

#[test]
fn test_set_appends_to_list_end_only() {
    let engine = Engine::new();
    let doc = Value::object([("x", Value::list([int(1)]))]);
    assert!(engine.set(&doc, "x.1", int(2), &[]));
    assert!(!engine.set(&doc, "x.5", int(3), &[]));
    assert_eq!(engine.get(&doc, "x", &[]), Some(Value::list([int(1), int(2)])));
}

#[test]
fn test_set_missing_intermediate() {
    let doc = Value::empty_map();
    let engine = Engine::new();
    assert!(!engine.set(&doc, "a.b", int(5), &[]));
    assert_eq!(doc, Value::empty_map());

    let engine = Engine::with_options(&Options::new().auto_vivify(true)).unwrap();
    assert!(engine.set(&doc, "a.b", int(5), &[]));
    assert_eq!(doc, Value::object([("a", Value::object([("b", int(5))]))]));
}

#[test]
fn test_auto_vivify_through_tokenized_path() {
    let engine = Engine::with_options(&Options::new().auto_vivify(true)).unwrap();
    let doc = Value::empty_map();
    assert!(engine.set(&doc, "a.[b.c]", int(1), &[]));
    assert_eq!(engine.get(&doc, "a.b.c", &[]), Some(int(1)));
}

#[test]
fn test_set_into_scalar_fails() {
    let engine = Engine::with_options(&Options::new().auto_vivify(true)).unwrap();
    let doc = Value::object([("a", int(1))]);
    assert!(!engine.set(&doc, "a.b", int(2), &[]));
}

// ============================================================================
// Limits
// ============================================================================

#[test]
fn test_resolution_depth_limit() {
    let engine = Engine::with_options(&Options::new().max_depth(2)).unwrap();
    let mut tree = vec![Token::word("a")];
    for _ in 0..4 {
        tree = vec![Token::container(tree, ContainerRole::Property)];
    }
    let doc = Value::object([("a", int(1))]);
    let err = engine.try_get(&doc, &tree, &[]).unwrap_err();
    assert_eq!(err, PathError::DepthExceeded(2));
}

#[test]
fn test_pre_tokenized_path() {
    let engine = Engine::new();
    let doc = accounts();
    let tree = engine.tokenize("accounts.1.owner").unwrap();
    assert_eq!(engine.get(&doc, &tree, &[]), Some(text("bob")));
}
