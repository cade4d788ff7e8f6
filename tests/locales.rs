use std::collections::BTreeSet;
use std::fs;

use serde_yaml::Value;

fn keys(prefix: &str, value: &Value, out: &mut BTreeSet<String>) {
    match value {
        Value::Mapping(map) => {
            for (k, v) in map {
                let k = k.as_str().expect("string key");
                let path = if prefix.is_empty() {
                    k.to_string()
                } else {
                    format!("{prefix}.{k}")
                };
                keys(&path, v, out);
            }
        }
        _ => {
            out.insert(prefix.to_string());
        }
    }
}

fn locale_keys(name: &str) -> BTreeSet<String> {
    let path = format!("{}/locales/{name}.yml", env!("CARGO_MANIFEST_DIR"));
    let content = fs::read_to_string(&path).unwrap();
    let value: Value = serde_yaml::from_str(&content).unwrap();
    let mut out = BTreeSet::new();
    keys("", &value, &mut out);
    out
}

#[test]
fn locales_define_the_same_keys() {
    let cs = locale_keys("cs");
    let en = locale_keys("en");
    assert!(!cs.is_empty());
    assert_eq!(
        cs.symmetric_difference(&en).collect::<Vec<_>>(),
        Vec::<&String>::new()
    );
}

#[test]
fn bundled_locales_are_available() {
    let available = kalkulacka::available_locales();
    assert!(available.contains(&"cs"));
    assert!(available.contains(&"en"));
}
