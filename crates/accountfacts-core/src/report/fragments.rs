//! Fragment Index: two-level grouping of the flat fact-fragment sequence.
//!
//! The fact-contents endpoint returns one fragment per leaf value, in no
//! useful order. Everything downstream wants "the fields of record N on
//! machine M", so the index groups the whole sequence in a single pass
//! into machine → slot → leaf-field-name → values, replacing repeated
//! linear scans over the flat list.

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::{FactFragment, PathSegment};

/// Leaf fields for one record slot, keyed by leaf name.
///
/// A leaf name maps to every value reported under it, in input order.
/// Singular fields carry one entry; `members` carries one per member.
#[derive(Debug, Default)]
pub struct SlotFields {
    values: IndexMap<String, Vec<Value>>,
}

impl SlotFields {
    fn push(&mut self, leaf: String, value: Value) {
        self.values.entry(leaf).or_default().push(value);
    }

    /// First value reported under `leaf`, if any.
    pub fn singular(&self, leaf: &str) -> Option<&Value> {
        self.values.get(leaf).and_then(|values| values.first())
    }

    /// Every value reported under `leaf`, in input order.
    pub fn repeated(&self, leaf: &str) -> &[Value] {
        self.values.get(leaf).map(|v| v.as_slice()).unwrap_or(&[])
    }
}

/// Two-level index: source machine → slot ordinal → leaf fields.
///
/// Machines and slots are key-sorted after the build pass, so iteration
/// order is independent of the order fragments arrived in.
#[derive(Debug, Default)]
pub struct FragmentIndex {
    machines: IndexMap<String, IndexMap<u64, SlotFields>>,
}

impl FragmentIndex {
    /// Group `fragments` into the two-level index in one pass.
    ///
    /// A fragment whose path does not carry an integer slot at position 1
    /// and a string leaf name at position 2 is skipped with a warning.
    /// Paths longer than three segments keep `path[2]` as the leaf name;
    /// fact-contents flattens member arrays to
    /// `[family, slot, "members", i]`.
    pub fn build(fragments: Vec<FactFragment>) -> Self {
        let mut index = Self::default();
        for fragment in fragments {
            let (slot, leaf) = match (fragment.path.get(1), fragment.path.get(2)) {
                (Some(PathSegment::Index(slot)), Some(PathSegment::Key(leaf))) => {
                    (*slot, leaf.clone())
                }
                _ => {
                    warn!(
                        "skipping fragment with unexpected path shape on {}: {:?}",
                        fragment.certname, fragment.path
                    );
                    continue;
                }
            };
            index
                .machines
                .entry(fragment.certname)
                .or_default()
                .entry(slot)
                .or_default()
                .push(leaf, fragment.value);
        }

        index.machines.sort_keys();
        for slots in index.machines.values_mut() {
            slots.sort_keys();
        }

        debug!(
            "indexed fragments into {} slots across {} machines",
            index.slot_count(),
            index.machine_count()
        );
        index
    }

    pub fn machine_count(&self) -> usize {
        self.machines.len()
    }

    pub fn slot_count(&self) -> usize {
        self.machines.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.machines.is_empty()
    }

    /// Iterate machine-major, slot-ascending over every record slot.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64, &SlotFields)> {
        self.machines.iter().flat_map(|(machine, slots)| {
            slots
                .iter()
                .map(move |(slot, fields)| (machine.as_str(), *slot, fields))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn frag(node: &str, slot: u64, leaf: &str, value: Value) -> FactFragment {
        FactFragment {
            certname: node.to_string(),
            path: vec![
                PathSegment::Key("accountfacts_users".to_string()),
                PathSegment::Index(slot),
                PathSegment::Key(leaf.to_string()),
            ],
            value,
        }
    }

    #[test]
    fn groups_by_machine_and_slot() {
        let index = FragmentIndex::build(vec![
            frag("b.example.com", 1, "name", json!("bob")),
            frag("a.example.com", 0, "name", json!("alice")),
            frag("b.example.com", 0, "name", json!("root")),
        ]);

        assert_eq!(index.machine_count(), 2);
        assert_eq!(index.slot_count(), 3);
        let seen: Vec<(String, u64)> = index
            .iter()
            .map(|(node, slot, _)| (node.to_string(), slot))
            .collect();
        // Key-sorted, not input order.
        assert_eq!(
            seen,
            vec![
                ("a.example.com".to_string(), 0),
                ("b.example.com".to_string(), 0),
                ("b.example.com".to_string(), 1),
            ]
        );
    }

    #[test]
    fn singular_takes_first_value() {
        let index = FragmentIndex::build(vec![
            frag("a", 0, "shell", json!("/bin/bash")),
            frag("a", 0, "shell", json!("/bin/zsh")),
        ]);
        let (_, _, fields) = index.iter().next().unwrap();
        assert_eq!(fields.singular("shell"), Some(&json!("/bin/bash")));
    }

    #[test]
    fn repeated_collects_all_values() {
        let index = FragmentIndex::build(vec![
            frag("a", 0, "members", json!("bob")),
            frag("a", 0, "members", json!("alice")),
        ]);
        let (_, _, fields) = index.iter().next().unwrap();
        assert_eq!(fields.repeated("members").len(), 2);
        assert!(fields.repeated("absent").is_empty());
    }

    #[test]
    fn malformed_path_is_skipped() {
        let index = FragmentIndex::build(vec![
            FactFragment {
                certname: "a".to_string(),
                path: vec![PathSegment::Key("accountfacts_users".to_string())],
                value: json!("dangling"),
            },
            frag("a", 0, "name", json!("alice")),
        ]);
        assert_eq!(index.slot_count(), 1);
    }

    #[test]
    fn four_segment_member_paths_keep_leaf_name() {
        let index = FragmentIndex::build(vec![FactFragment {
            certname: "a".to_string(),
            path: vec![
                PathSegment::Key("accountfacts_groups".to_string()),
                PathSegment::Index(0),
                PathSegment::Key("members".to_string()),
                PathSegment::Index(2),
            ],
            value: json!("carol"),
        }]);
        let (_, _, fields) = index.iter().next().unwrap();
        assert_eq!(fields.repeated("members"), &[json!("carol")]);
    }
}
