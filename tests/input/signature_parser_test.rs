use objcat::engine::signature::{parse_call, parse_signature, CallTarget, MethodKind};
use objcat::ObjcError;
use test_case::test_case;

#[test_case("-[NSString length]", MethodKind::Instance, "NSString", "length" ; "instance no colon")]
#[test_case("+[NSDate date]", MethodKind::Class, "NSDate", "date" ; "class no colon")]
#[test_case("-[UIView initWithFrame:]", MethodKind::Instance, "UIView", "initWithFrame:" ; "single keyword")]
#[test_case("-[NSDictionary setObject:forKey:]", MethodKind::Instance, "NSDictionary", "setObject:forKey:" ; "multi keyword")]
#[test_case("+[IDSService _internalInit:]", MethodKind::Class, "IDSService", "_internalInit:" ; "private prefix")]
#[test_case("  -[NSString length]  ", MethodKind::Instance, "NSString", "length" ; "surrounding whitespace")]
fn test_well_formed_references(input: &str, kind: MethodKind, class_name: &str, selector: &str) {
    let sig = parse_signature(input).unwrap();
    assert_eq!(sig.kind, kind);
    assert_eq!(sig.class_name, class_name);
    assert_eq!(sig.selector, selector);
}

#[test_case("" ; "empty")]
#[test_case("NSString length" ; "no prefix")]
#[test_case("[NSString length]" ; "bare brackets")]
#[test_case("*[NSString length]" ; "wrong sigil")]
#[test_case("-[NSString]" ; "one part")]
#[test_case("-[TooMany Here Words]" ; "three parts")]
#[test_case("-[]" ; "empty body")]
#[test_case("-[NSString le ngth]" ; "split selector")]
fn test_malformed_references(input: &str) {
    let err = parse_signature(input).unwrap_err();
    assert!(matches!(err, ObjcError::Syntax(_)), "expected SyntaxError for {:?}", input);
}

#[test]
fn test_display_round_trip() {
    for input in ["-[NSString length]", "+[NSDate date]", "-[NSDictionary setObject:forKey:]"] {
        let sig = parse_signature(input).unwrap();
        assert_eq!(sig.to_string(), input);
        let reparsed = parse_signature(&sig.to_string()).unwrap();
        assert_eq!(reparsed, sig);
    }
}

#[test]
fn test_parser_never_touches_the_process() {
    // Semantic failures are not the parser's business: a reference to a
    // class that cannot exist still parses
    let sig = parse_signature("-[DefinitelyNotARealClass999 bogusSelector:]").unwrap();
    assert_eq!(sig.class_name, "DefinitelyNotARealClass999");
}

#[test]
fn test_very_long_input() {
    // A pathological input must be rejected, not crash anything
    let long = format!("-[{} {}]", "A".repeat(10_000), "b".repeat(10_000));
    let sig = parse_signature(&long).unwrap();
    assert_eq!(sig.class_name.len(), 10_000);

    let garbage = "x".repeat(50_000);
    assert!(parse_signature(&garbage).is_err());
}

#[test]
fn test_unicode_input_does_not_panic() {
    for input in ["-[日本語 テスト]", "-[💡 💡]", "-[NSString 💡]"] {
        // Non-ASCII selectors are syntax errors, never panics
        assert!(parse_signature(input).is_err());
    }
}

#[test]
fn test_call_receiver_forms() {
    let call = parse_call("+[NSDate date]").unwrap();
    assert_eq!(call.target, CallTarget::Class("NSDate".to_string()));
    assert_eq!(call.selector, "date");

    let call = parse_call("-[0x600001234560 description]").unwrap();
    assert_eq!(call.target, CallTarget::Address(0x6000_0123_4560));

    let call = parse_call("-[$x0 description]").unwrap();
    assert_eq!(call.target, CallTarget::Token("$x0".to_string()));

    let call = parse_call("-[$testStr description]").unwrap();
    assert_eq!(call.target, CallTarget::Token("$testStr".to_string()));
}

#[test]
fn test_call_arguments_survive_verbatim() {
    let call = parse_call("+[NSString stringWithString:@\"hello\"]").unwrap();
    assert_eq!(call.args, vec!["@\"hello\"".to_string()]);

    let call = parse_call("+[NSNumber numberWithInt:42]").unwrap();
    assert_eq!(call.args, vec!["42".to_string()]);

    // Quoted whitespace stays inside one argument
    let call = parse_call("+[NSString stringWithString:@\"two words\"]").unwrap();
    assert_eq!(call.args, vec!["@\"two words\"".to_string()]);

    // Nested message sends stay inside one argument
    let call = parse_call("-[$arr addObject:[NSNumber numberWithInt:7]]").unwrap();
    assert_eq!(call.args, vec!["[NSNumber numberWithInt:7]".to_string()]);
}

#[test_case("ocall invalid syntax here" ; "not a call at all")]
#[test_case("-[$x0]" ; "receiver only")]
#[test_case("-[$x0 two words]" ; "plain selector with extra token")]
#[test_case("-[$x0 missingArg:]" ; "keyword without argument")]
#[test_case("+[$x0 description]" ; "register receiver for class method")]
fn test_malformed_calls(input: &str) {
    assert!(matches!(parse_call(input), Err(ObjcError::Syntax(_))));
}
