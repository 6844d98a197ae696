//! Denormalizer: one flat row per reconstructed record for strictly
//! tabular output.
//!
//! Group member lists are variable-length, so rows allocate one
//! `member_<i>` column per position up to the longest member list seen,
//! and short rows fill the remainder with empty strings. Every row
//! therefore carries the identical column set and the nested member set
//! never appears as a column of its own.

use serde_json::json;

use crate::models::{FlatRow, GroupRecord, SortKey, UserRecord};

/// One row per user record, sorted by `sort_key` with the remaining
/// identity fields and the source node as tie-breakers.
pub fn denormalize_users(records: &[UserRecord], sort_key: SortKey) -> Vec<FlatRow> {
    let mut sorted: Vec<&UserRecord> = records.iter().collect();
    match sort_key {
        SortKey::Name => sorted.sort_by(|a, b| {
            (&a.uname, a.uid, &a.source_node).cmp(&(&b.uname, b.uid, &b.source_node))
        }),
        SortKey::Id => sorted.sort_by(|a, b| {
            (a.uid, &a.uname, &a.source_node).cmp(&(b.uid, &b.uname, &b.source_node))
        }),
    }

    sorted
        .into_iter()
        .map(|user| {
            let mut row = FlatRow::new();
            row.insert("uid".to_string(), json!(user.uid));
            row.insert("primary_gid".to_string(), json!(user.primary_gid));
            row.insert("name".to_string(), json!(user.uname));
            row.insert("shell".to_string(), json!(user.shell));
            row.insert("homedir".to_string(), json!(user.home_dir));
            row.insert("description".to_string(), json!(user.description));
            row.insert("node".to_string(), json!(user.source_node));
            row
        })
        .collect()
}

/// One row per group record with positionally filled member columns.
pub fn denormalize_groups(records: &[GroupRecord], sort_key: SortKey) -> Vec<FlatRow> {
    let width = records.iter().map(|g| g.members.len()).max().unwrap_or(0);

    let mut sorted: Vec<&GroupRecord> = records.iter().collect();
    match sort_key {
        SortKey::Name => sorted.sort_by(|a, b| {
            (&a.name, a.gid, &a.source_node).cmp(&(&b.name, b.gid, &b.source_node))
        }),
        SortKey::Id => sorted.sort_by(|a, b| {
            (a.gid, &a.name, &a.source_node).cmp(&(b.gid, &b.name, &b.source_node))
        }),
    }

    sorted
        .into_iter()
        .map(|group| {
            let mut row = FlatRow::new();
            row.insert("gid".to_string(), json!(group.gid));
            row.insert("name".to_string(), json!(group.name));
            row.insert("node".to_string(), json!(group.source_node));
            for (i, member) in group.members.iter().enumerate() {
                row.insert(format!("member_{i}"), json!(member));
            }
            for i in group.members.len()..width {
                row.insert(format!("member_{i}"), json!(""));
            }
            row
        })
        .collect()
}
