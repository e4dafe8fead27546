//! Structural merge engine
//!
//! Deep-merges two nested YAML mappings with destination-favoring
//! semantics:
//! - Mappings: deep-merge by key (recursive)
//! - Scalars: destination wins (a source value never overwrites one)
//! - Explicit null in the destination: deletion marker; the key is
//!   removed and does not reappear from the source
//!
//! Callers control precedence by merge order: the higher-precedence
//! fragment is always passed as the destination.

use std::collections::BTreeMap;

use serde_yaml::{Mapping, Value};
use tracing::warn;

/// Deep merge two YAML values, favoring `dest`.
///
/// A `Null` on either side yields the other side unchanged, so optional
/// fragments can be chained without special-casing absence.
pub fn merge_values(dest: Value, src: Value) -> Value {
    match (dest, src) {
        (Value::Null, src) => src,
        (dest, Value::Null) => dest,
        (Value::Mapping(dest_map), Value::Mapping(src_map)) => {
            Value::Mapping(merge_mappings(dest_map, src_map))
        }
        // Non-mapping destination: destination wins.
        (dest, _) => dest,
    }
}

fn merge_mappings(mut dest: Mapping, src: Mapping) -> Mapping {
    for (key, src_value) in src {
        match dest.get(&key) {
            // Explicit null marks a deletion: drop the key and make sure
            // the source cannot resurrect it.
            Some(Value::Null) => {
                dest.remove(&key);
            }
            None => {
                dest.insert(key, src_value);
            }
            Some(dest_value) => {
                if let Value::Mapping(_) = src_value {
                    if dest_value.is_mapping() {
                        let merged = merge_values(
                            dest.remove(&key).unwrap_or(Value::Null),
                            src_value,
                        );
                        dest.insert(key, merged);
                    } else {
                        warn!(
                            key = %key_display(&key),
                            "cannot merge mapping into non-mapping value, keeping destination"
                        );
                    }
                } else if dest_value.is_mapping() {
                    warn!(
                        key = %key_display(&key),
                        "destination is a mapping, ignoring non-mapping source value"
                    );
                }
                // Both scalars: destination wins, nothing to do.
            }
        }
    }
    dest
}

/// Union of string maps; later layers win ties.
pub fn merge_string_maps(layers: &[&BTreeMap<String, String>]) -> BTreeMap<String, String> {
    let mut output = BTreeMap::new();
    for layer in layers {
        for (k, v) in *layer {
            output.insert(k.clone(), v.clone());
        }
    }
    output
}

fn key_display(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => format!("{other:?}"),
    }
}
