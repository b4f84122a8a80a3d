#![cfg(all(feature = "serde", feature = "persistent"))]
//! Serialization tests for OrderedMap.

use lambda_rt::persistent::OrderedMap;
use rstest::rstest;

#[rstest]
fn test_serialize_in_key_order() {
    let map = OrderedMap::new().insert("b", 2).insert("c", 3).insert("a", 1);
    let json = serde_json::to_string(&map).unwrap();
    assert_eq!(json, r#"{"a":1,"b":2,"c":3}"#);
}

#[rstest]
fn test_serialize_empty_map() {
    let map: OrderedMap<String, i32> = OrderedMap::new();
    assert_eq!(serde_json::to_string(&map).unwrap(), "{}");
}

#[rstest]
fn test_deserialize_builds_balanced_map() {
    let json = r#"{"z":26,"a":1,"m":13}"#;
    let map: OrderedMap<String, i32> = serde_json::from_str(json).unwrap();

    assert_eq!(map.cardinal(), 3);
    assert_eq!(map.get(&"m".to_string()), Some(&13));
    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["a", "m", "z"]);
}

#[rstest]
fn test_roundtrip_nested_maps() {
    let inner = OrderedMap::new().insert(2u8, "two".to_string());
    let outer = OrderedMap::new().insert("inner".to_string(), inner);

    let json = serde_json::to_string(&outer).unwrap();
    let restored: OrderedMap<String, OrderedMap<u8, String>> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, outer);
}

#[rstest]
fn test_deserialize_rejects_non_map() {
    let result: Result<OrderedMap<String, i32>, _> = serde_json::from_str("[1, 2]");
    assert!(result.is_err());
}
