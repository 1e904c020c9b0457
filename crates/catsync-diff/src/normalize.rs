use serde_json::Value;
use unicode_normalization::{UnicodeNormalization, is_nfc};

/// Return a copy of `value` with every string in NFC form.
///
/// Object keys and non-string scalars are left as they are; arrays keep
/// their order and length.
pub fn normalize(value: &Value) -> Value {
    let mut value = value.clone();
    normalize_in_place(&mut value);
    value
}

/// In-place variant of [`normalize`].
pub fn normalize_in_place(value: &mut Value) {
    match value {
        Value::String(s) => {
            if !is_nfc(s) {
                *s = s.nfc().collect();
            }
        }
        Value::Array(items) => items.iter_mut().for_each(normalize_in_place),
        Value::Object(map) => map.values_mut().for_each(normalize_in_place),
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const CAFE_NFD: &str = "cafe\u{0301}";
    const CAFE_NFC: &str = "caf\u{00e9}";

    #[test]
    fn test_composes_strings() {
        assert_eq!(normalize(&json!(CAFE_NFD)), json!(CAFE_NFC));
    }

    #[test]
    fn test_descends_into_containers() {
        let doc = json!({ "apps": [{ "name": CAFE_NFD, "id": 1 }], "ok": true });
        let expected = json!({ "apps": [{ "name": CAFE_NFC, "id": 1 }], "ok": true });
        assert_eq!(normalize(&doc), expected);
    }

    #[test]
    fn test_keys_are_untouched() {
        let doc = json!({ CAFE_NFD: 1 });
        let normalized = normalize(&doc);
        let map = normalized.as_object().unwrap();
        assert!(map.contains_key(CAFE_NFD));
        assert!(!map.contains_key(CAFE_NFC));
    }

    #[test]
    fn test_scalars_pass_through() {
        for v in [json!(null), json!(false), json!(42), json!(-1.5)] {
            assert_eq!(normalize(&v), v);
        }
    }

    #[test]
    fn test_preserves_key_order() {
        let doc: Value = serde_json::from_str(r#"{"z":1,"a":2,"m":3}"#).unwrap();
        let keys: Vec<_> = normalize(&doc).as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }
}
