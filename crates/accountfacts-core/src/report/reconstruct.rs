//! Record Reconstructor: assembles one typed record per (machine, slot).
//!
//! Every singular field is looked up by leaf name; a missing singular
//! field is a hard failure carrying machine and slot context, since a
//! silently partial record would corrupt downstream grouping. `members`
//! is the one plural field and aggregates every matching fragment.

use std::collections::BTreeSet;

use serde_json::Value;
use tracing::debug;

use crate::errors::{ReportError, ReportResult};
use crate::models::{GroupRecord, UserRecord};
use crate::report::fragments::{FragmentIndex, SlotFields};

fn missing(field: &'static str, slot: u64, node: &str) -> ReportError {
    ReportError::MissingField {
        field,
        slot,
        node: node.to_string(),
    }
}

fn malformed(field: &'static str, slot: u64, node: &str, reason: String) -> ReportError {
    ReportError::MalformedField {
        field,
        slot,
        node: node.to_string(),
        reason,
    }
}

fn string_field(
    fields: &SlotFields,
    field: &'static str,
    slot: u64,
    node: &str,
) -> ReportResult<String> {
    let value = fields
        .singular(field)
        .ok_or_else(|| missing(field, slot, node))?;
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Null => Ok(String::new()),
        other => Ok(other.to_string()),
    }
}

fn id_field(fields: &SlotFields, field: &'static str, slot: u64, node: &str) -> ReportResult<i64> {
    let value = fields
        .singular(field)
        .ok_or_else(|| missing(field, slot, node))?;
    match value {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| malformed(field, slot, node, format!("non-integral number {n}"))),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| malformed(field, slot, node, format!("non-numeric string {s:?}"))),
        other => Err(malformed(
            field,
            slot,
            node,
            format!("expected a numeric id, got {other}"),
        )),
    }
}

/// Assemble one [`UserRecord`] per (machine, slot) in the index.
pub fn reconstruct_users(index: &FragmentIndex) -> ReportResult<Vec<UserRecord>> {
    let mut users = Vec::with_capacity(index.slot_count());
    for (node, slot, fields) in index.iter() {
        users.push(UserRecord {
            uid: id_field(fields, "uid", slot, node)?,
            primary_gid: id_field(fields, "primary gid", slot, node)?,
            uname: string_field(fields, "name", slot, node)?,
            shell: string_field(fields, "shell", slot, node)?,
            home_dir: string_field(fields, "homedir", slot, node)?,
            description: string_field(fields, "description", slot, node)?,
            source_node: node.to_string(),
        });
    }
    debug!(
        "reconstructed {} user records from {} machines",
        users.len(),
        index.machine_count()
    );
    Ok(users)
}

/// Assemble one [`GroupRecord`] per (machine, slot) in the index.
///
/// Member fragments with a null value are dropped; everything else is
/// coerced to a string, deduplicated, and sorted via the member set.
pub fn reconstruct_groups(index: &FragmentIndex) -> ReportResult<Vec<GroupRecord>> {
    let mut groups = Vec::with_capacity(index.slot_count());
    for (node, slot, fields) in index.iter() {
        let members: BTreeSet<String> = fields
            .repeated("members")
            .iter()
            .filter_map(|value| match value {
                Value::String(s) => Some(s.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect();
        groups.push(GroupRecord {
            gid: id_field(fields, "gid", slot, node)?,
            name: string_field(fields, "name", slot, node)?,
            members,
            source_node: node.to_string(),
        });
    }
    debug!(
        "reconstructed {} group records from {} machines",
        groups.len(),
        index.machine_count()
    );
    Ok(groups)
}
