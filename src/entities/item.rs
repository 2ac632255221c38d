//! Menu item: one slice on the wheel.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Labels longer than this many characters are shortened on the wheel
pub const WHEEL_LABEL_MAX_CHARS: usize = 8;

/// Immutable menu entry. Identity is `id`; `label` is display text only.
///
/// Serialized as `{ "id": .., "name": .. }`, the shape exported lists use.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    #[serde(rename = "name", alias = "label")]
    pub label: String,
}

impl Item {
    /// New item with a fresh random id
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
        }
    }

    pub fn with_id(id: Uuid, label: impl Into<String>) -> Self {
        Self { id, label: label.into() }
    }

    /// Same identity, different label
    pub fn relabeled(&self, label: impl Into<String>) -> Self {
        Self { id: self.id, label: label.into() }
    }

    /// Label shortened for drawing inside a slice.
    pub fn wheel_label(&self) -> String {
        truncate_label(&self.label, WHEEL_LABEL_MAX_CHARS)
    }
}

/// Shorten `label` to `max_chars - 1` characters plus `..` when it is longer
/// than `max_chars`. Counts chars, not bytes, so CJK labels cut cleanly.
pub fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        return label.to_string();
    }
    let keep = max_chars.saturating_sub(1);
    let mut out: String = label.chars().take(keep).collect();
    out.push_str("..");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("Ramen", 8), "Ramen");
        assert_eq!(truncate_label("Carbonar", 8), "Carbonar");
        assert_eq!(truncate_label("Carbonara", 8), "Carbona..");
        assert_eq!(truncate_label("おまかせ握り寿司です", 8), "おまかせ握り寿..");
    }

    #[test]
    fn test_wheel_label_keeps_identity() {
        let item = Item::new("Katsu curry deluxe");
        assert_eq!(item.wheel_label(), "Katsu c..");
        assert_eq!(item.label, "Katsu curry deluxe");

        let renamed = item.relabeled("Katsu");
        assert_eq!(renamed.id, item.id);
        assert_ne!(renamed, item);
    }

    #[test]
    fn test_serde_uses_name_field() {
        let item = Item::with_id(Uuid::nil(), "Soba");
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(json, r#"{"id":"00000000-0000-0000-0000-000000000000","name":"Soba"}"#);

        let back: Item = serde_json::from_str(
            r#"{"id":"6f1c7c0e-3f0a-4d5e-9c1b-2a7d2b1e4f00","label":"Udon"}"#,
        )
        .unwrap();
        assert_eq!(back.label, "Udon");
    }
}
