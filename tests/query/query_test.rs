use objcat::{MatchTier, NamePattern, RuntimeQuery, MAX_SUPERCLASS_DEPTH};
use test_case::test_case;

use crate::test_helpers::FakeRuntime;

#[test_case(1, MatchTier::Single ; "one match")]
#[test_case(2, MatchTier::Compact ; "lower compact bound")]
#[test_case(20, MatchTier::Compact ; "upper compact bound")]
#[test_case(21, MatchTier::List ; "lower list bound")]
#[test_case(500, MatchTier::List ; "many")]
fn test_tier_selection(count: usize, expected: MatchTier) {
    assert_eq!(MatchTier::for_count(count), expected);
}

#[test]
fn test_classes_matching_pattern() {
    let mut rt = FakeRuntime::cocoa();
    let mut query = RuntimeQuery::new(&mut rt);

    let matches = query
        .classes_matching(&NamePattern::parse("NSMutable*"))
        .unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].name, "NSMutableString");

    let matches = query.classes_matching(&NamePattern::parse("NS*")).unwrap();
    assert_eq!(matches.len(), 6);

    let matches = query
        .classes_matching(&NamePattern::parse("WKNothing*"))
        .unwrap();
    assert!(matches.is_empty());
}

#[test]
fn test_class_list_buffers_are_released() {
    let mut rt = FakeRuntime::cocoa();
    let mut query = RuntimeQuery::new(&mut rt);
    query
        .classes_matching(&NamePattern::parse("NSString"))
        .unwrap();

    let frees = rt.log.iter().filter(|e| e.starts_with("(void)free")).count();
    assert_eq!(frees, 2, "the count cell and the copied list must be freed");
}

#[test]
fn test_hierarchy_walk_reaches_the_root() {
    let mut rt = FakeRuntime::cocoa();
    let leaf = rt.class_ptr("NSMutableString");
    let mut query = RuntimeQuery::new(&mut rt);

    let chain = query.hierarchy("NSMutableString", leaf).unwrap();
    assert_eq!(chain, vec!["NSMutableString", "NSString", "NSObject"]);
}

#[test]
fn test_hierarchy_walk_on_root_class() {
    let mut rt = FakeRuntime::cocoa();
    let root = rt.class_ptr("NSObject");
    let mut query = RuntimeQuery::new(&mut rt);

    let chain = query.hierarchy("NSObject", root).unwrap();
    assert_eq!(chain, vec!["NSObject"]);
}

#[test]
fn test_hierarchy_walk_survives_a_corrupted_cycle() {
    let mut rt = FakeRuntime::cocoa();
    let leaf = rt.class_ptr("NSString");
    // Corrupt the graph: NSString's superclass pointer loops back to itself
    rt.set_superclass_ptr("NSString", leaf);
    let mut query = RuntimeQuery::new(&mut rt);

    let chain = query.hierarchy("NSString", leaf).unwrap();
    // Bounded, not hung: one entry for the class plus the capped walk
    assert_eq!(chain.len(), MAX_SUPERCLASS_DEPTH + 1);
}

#[test]
fn test_ancestors_exclude_the_class_itself() {
    let mut rt = FakeRuntime::cocoa();
    let leaf = rt.class_ptr("NSMutableString");
    let mut query = RuntimeQuery::new(&mut rt);

    let ancestors = query.ancestors(leaf).unwrap();
    let names: Vec<&str> = ancestors.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["NSString", "NSObject"]);
}

#[test]
fn test_selectors_of_lists_own_methods_only() {
    let mut rt = FakeRuntime::cocoa();
    let class_ptr = rt.class_ptr("NSString");
    let mut query = RuntimeQuery::new(&mut rt);

    let selectors = query.selectors_of(class_ptr).unwrap();
    assert_eq!(selectors, vec!["length", "uppercaseString"]);
}

#[test]
fn test_selectors_of_metaclass_lists_class_methods() {
    let mut rt = FakeRuntime::cocoa();
    let meta_ptr = rt.meta_ptr("NSDate");
    let mut query = RuntimeQuery::new(&mut rt);

    let selectors = query.selectors_of(meta_ptr).unwrap();
    assert_eq!(selectors, vec!["date"]);
}

#[test]
fn test_empty_method_table() {
    let mut rt = FakeRuntime::cocoa();
    rt.add_class("WKEmpty", Some("NSObject"));
    let class_ptr = rt.class_ptr("WKEmpty");
    let mut query = RuntimeQuery::new(&mut rt);

    assert!(query.selectors_of(class_ptr).unwrap().is_empty());
    assert!(query.ivars_of(class_ptr).unwrap().is_empty());
    assert!(query.protocols_of(class_ptr).unwrap().is_empty());
}

#[test]
fn test_ivar_table_with_escaped_type_encoding() {
    let mut rt = FakeRuntime::cocoa();
    rt.add_class("WKPuppet", Some("NSObject"));
    rt.add_ivar("WKPuppet", "_flags", 8, "I");
    rt.add_ivar("WKPuppet", "_target", 16, "@\"NSString\"");
    let class_ptr = rt.class_ptr("WKPuppet");
    let mut query = RuntimeQuery::new(&mut rt);

    let ivars = query.ivars_of(class_ptr).unwrap();
    assert_eq!(ivars.len(), 2);
    assert_eq!(ivars[0].name, "_flags");
    assert_eq!(ivars[0].offset, 8);
    // The host renders the encoding with escaped quotes; they must come
    // back intact, not stripped
    assert_eq!(ivars[1].type_encoding, "@\"NSString\"");
}

#[test]
fn test_protocols_of_class() {
    let mut rt = FakeRuntime::cocoa();
    let class_ptr = rt.class_ptr("NSString");
    let mut query = RuntimeQuery::new(&mut rt);

    let protocols = query.protocols_of(class_ptr).unwrap();
    assert_eq!(protocols, vec!["NSCopying", "NSMutableCopying", "NSSecureCoding"]);
}
