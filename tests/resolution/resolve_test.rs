use objcat::engine::signature::parse_signature;
use objcat::host::EvalResult;
use objcat::{ObjcError, Resolver};

use crate::test_helpers::{FakeRuntime, ScriptedEvaluator};

#[test]
fn test_resolution_order_and_expressions() {
    // The protocol is dependent: each expression embeds the previous step's
    // concrete pointer, so the exact sequence is observable
    let mut eval = ScriptedEvaluator::new(vec![
        EvalResult::success(0x1000, "0x1000"),
        EvalResult::success(0x2000, "0x2000"),
        EvalResult::success(0x1010, "0x1010"),
        EvalResult::success(0x3000, "0x3000"),
    ]);

    let sig = parse_signature("+[NSDate date]").unwrap();
    let resolved = Resolver::new(&mut eval).resolve(&sig).unwrap();

    assert_eq!(
        eval.seen,
        vec![
            "(Class)NSClassFromString(@\"NSDate\")",
            "(SEL)NSSelectorFromString(@\"date\")",
            "(Class)object_getClass((id)0x1000)",
            "(void *)class_getMethodImplementation((Class)0x1010, (SEL)0x2000)",
        ]
    );
    assert_eq!(resolved.imp_addr, 0x3000);
}

#[test]
fn test_class_failure_stops_after_one_evaluation() {
    let mut eval = ScriptedEvaluator::new(vec![EvalResult::failure(
        "error: use of undeclared identifier",
    )]);

    let sig = parse_signature("-[NoSuchClass999 x]").unwrap();
    let err = Resolver::new(&mut eval).resolve(&sig).unwrap_err();

    assert!(matches!(err, ObjcError::ClassNotFound { .. }));
    assert_eq!(eval.seen.len(), 1, "no step may run after a failure");
}

#[test]
fn test_null_class_stops_after_one_evaluation() {
    // Success-with-zero is the runtime's way of saying "no such class"
    let mut eval = ScriptedEvaluator::new(vec![EvalResult::success(0, "0x0")]);

    let sig = parse_signature("-[NoSuchClass999 x]").unwrap();
    let err = Resolver::new(&mut eval).resolve(&sig).unwrap_err();

    assert!(matches!(err, ObjcError::ClassNotFound { .. }));
    assert_eq!(eval.seen.len(), 1);
}

#[test]
fn test_error_carries_the_host_diagnostic() {
    let mut eval = ScriptedEvaluator::new(vec![
        EvalResult::success(0x1000, "0x1000"),
        EvalResult::failure("error: couldn't run expression"),
    ]);

    let sig = parse_signature("-[NSString bogus]").unwrap();
    let err = Resolver::new(&mut eval).resolve(&sig).unwrap_err();

    let rendered = err.to_string();
    assert!(rendered.contains("bogus"));
    assert!(rendered.contains("couldn't run expression"));
}

#[test]
fn test_instance_method_makes_no_metaclass_call() {
    let mut eval = ScriptedEvaluator::new(vec![
        EvalResult::success(0x1000, "0x1000"),
        EvalResult::success(0x2000, "0x2000"),
        EvalResult::success(0x3000, "0x3000"),
    ]);

    let sig = parse_signature("-[NSString length]").unwrap();
    let resolved = Resolver::new(&mut eval).resolve(&sig).unwrap();

    assert_eq!(resolved.lookup_class_ptr, resolved.class_ptr);
    assert!(
        !eval.seen.iter().any(|e| e.contains("object_getClass")),
        "instance methods must not resolve the metaclass"
    );
}

#[test]
fn test_resolution_is_idempotent_for_fixed_state() {
    let mut rt = FakeRuntime::cocoa();
    let sig = parse_signature("-[NSString length]").unwrap();

    let first = Resolver::new(&mut rt).resolve(&sig).unwrap();
    let second = Resolver::new(&mut rt).resolve(&sig).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_root_class_resolves_with_own_class_pointer() {
    let mut rt = FakeRuntime::cocoa();
    let sig = parse_signature("-[NSObject init]").unwrap();

    let resolved = Resolver::new(&mut rt).resolve(&sig).unwrap();
    assert_ne!(resolved.lookup_class_ptr, 0);
    assert_eq!(resolved.lookup_class_ptr, resolved.class_ptr);
}

#[test]
fn test_class_method_resolves_against_metaclass() {
    let mut rt = FakeRuntime::cocoa();
    let sig = parse_signature("+[NSDate date]").unwrap();

    let resolved = Resolver::new(&mut rt).resolve(&sig).unwrap();
    assert_eq!(resolved.class_ptr, rt.class_ptr("NSDate"));
    assert_eq!(resolved.lookup_class_ptr, rt.meta_ptr("NSDate"));
    assert_ne!(resolved.lookup_class_ptr, resolved.class_ptr);
}

#[test]
fn test_inherited_method_resolves_through_superclass() {
    // class_getMethodImplementation walks the chain in the runtime;
    // NSMutableString inherits length from NSString
    let mut rt = FakeRuntime::cocoa();
    let sig = parse_signature("-[NSMutableString length]").unwrap();

    let resolved = Resolver::new(&mut rt).resolve(&sig).unwrap();
    assert_ne!(resolved.imp_addr, 0);
}

#[test]
fn test_missing_implementation_is_typed_error() {
    let mut rt = FakeRuntime::cocoa();
    // The selector registers fine, but no class in the chain implements it
    let sig = parse_signature("-[NSDate marzipan]").unwrap();

    let err = Resolver::new(&mut rt).resolve(&sig).unwrap_err();
    assert!(matches!(err, ObjcError::ImplementationNotFound { .. }));
}
