//! Normalizer: collapse duplicate-by-identity records across machines,
//! keeping provenance.
//!
//! Grouping is keyed by the identity fields only, held in an `IndexMap`
//! so the partition is independent of input order, and every collected
//! list (nodes, descriptions, membership variants) is sorted before it
//! leaves this module. The group path is two-stage: identical
//! (gid, name, members) records collapse first, then the collapsed
//! tuples regroup by (gid, name) alone so each distinct membership
//! configuration stays visible under one entry.

use indexmap::IndexMap;
use tracing::debug;

use crate::models::{
    GroupRecord, MembershipVariant, NormalizedGroup, NormalizedUser, SortKey, UserRecord,
};

fn sorted_dedup(mut values: Vec<String>) -> Vec<String> {
    values.sort();
    values.dedup();
    values
}

/// Collapse user records into one entry per identity.
///
/// Output is sorted ascending by `sort_key`; ties fall back to the full
/// remaining identity tuple, so the order is total and deterministic.
pub fn normalize_users(records: &[UserRecord], sort_key: SortKey) -> Vec<NormalizedUser> {
    let mut by_identity: IndexMap<_, Vec<&UserRecord>> = IndexMap::new();
    for record in records {
        by_identity.entry(record.identity()).or_default().push(record);
    }

    let mut normalized: Vec<NormalizedUser> = by_identity
        .into_iter()
        .filter(|(identity, _)| !identity.uname.is_empty())
        .map(|(identity, group)| NormalizedUser {
            uid: identity.uid,
            primary_gid: identity.primary_gid,
            uname: identity.uname,
            shell: identity.shell,
            home_dir: identity.home_dir,
            nodes: sorted_dedup(group.iter().map(|r| r.source_node.clone()).collect()),
            descriptions: sorted_dedup(group.iter().map(|r| r.description.clone()).collect()),
        })
        .collect();

    match sort_key {
        SortKey::Name => normalized.sort_by(|a, b| {
            (&a.uname, a.uid, a.primary_gid, &a.shell, &a.home_dir)
                .cmp(&(&b.uname, b.uid, b.primary_gid, &b.shell, &b.home_dir))
        }),
        SortKey::Id => normalized.sort_by(|a, b| {
            (a.uid, &a.uname, a.primary_gid, &a.shell, &a.home_dir)
                .cmp(&(b.uid, &b.uname, b.primary_gid, &b.shell, &b.home_dir))
        }),
    }

    debug!(
        "normalized {} user records into {} identities",
        records.len(),
        normalized.len()
    );
    normalized
}

/// Collapse group records into one entry per (gid, name), listing every
/// distinct membership configuration with the nodes that reported it.
pub fn normalize_groups(records: &[GroupRecord], sort_key: SortKey) -> Vec<NormalizedGroup> {
    // Stage 1: collapse records identical in (gid, name, members).
    let mut by_identity: IndexMap<_, Vec<&GroupRecord>> = IndexMap::new();
    for record in records {
        by_identity.entry(record.identity()).or_default().push(record);
    }

    // Stage 2: regroup by (gid, name), collecting the membership variants.
    let mut by_group: IndexMap<(i64, String), Vec<MembershipVariant>> = IndexMap::new();
    for (identity, group) in by_identity {
        if identity.name.is_empty() {
            continue;
        }
        by_group
            .entry((identity.gid, identity.name))
            .or_default()
            .push(MembershipVariant {
                members: identity.members,
                nodes: sorted_dedup(group.iter().map(|r| r.source_node.clone()).collect()),
            });
    }

    let mut normalized: Vec<NormalizedGroup> = by_group
        .into_iter()
        .map(|((gid, name), mut membership)| {
            membership.sort();
            NormalizedGroup {
                gid,
                name,
                membership,
            }
        })
        .collect();

    match sort_key {
        SortKey::Name => normalized.sort_by(|a, b| (&a.name, a.gid).cmp(&(&b.name, b.gid))),
        SortKey::Id => normalized.sort_by(|a, b| (a.gid, &a.name).cmp(&(b.gid, &b.name))),
    }

    debug!(
        "normalized {} group records into {} (gid, name) entries",
        records.len(),
        normalized.len()
    );
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(node: &str, uname: &str, uid: i64, description: &str) -> UserRecord {
        UserRecord {
            uid,
            primary_gid: uid,
            uname: uname.to_string(),
            shell: "/bin/bash".to_string(),
            home_dir: format!("/home/{uname}"),
            description: description.to_string(),
            source_node: node.to_string(),
        }
    }

    fn group(node: &str, name: &str, gid: i64, members: &[&str]) -> GroupRecord {
        GroupRecord {
            gid,
            name: name.to_string(),
            members: members.iter().map(|m| m.to_string()).collect(),
            source_node: node.to_string(),
        }
    }

    #[test]
    fn identical_users_collapse_with_provenance() {
        let records = vec![
            user("host-a", "alice", 1000, "Alice"),
            user("host-b", "alice", 1000, "Alice B."),
        ];
        let normalized = normalize_users(&records, SortKey::Name);
        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized[0].nodes, vec!["host-a", "host-b"]);
        assert_eq!(normalized[0].descriptions, vec!["Alice", "Alice B."]);
    }

    #[test]
    fn grouping_is_independent_of_input_order() {
        let mut records = vec![
            user("host-a", "alice", 1000, "Alice"),
            user("host-b", "alice", 1000, "Alice B."),
            user("host-c", "bob", 1001, "Bob"),
            user("host-a", "bob", 1001, "Bob"),
        ];
        let forward = normalize_users(&records, SortKey::Name);
        records.reverse();
        let backward = normalize_users(&records, SortKey::Name);
        assert_eq!(forward, backward);
    }

    #[test]
    fn differing_identity_fields_do_not_collapse() {
        let mut zsh_alice = user("host-b", "alice", 1000, "Alice");
        zsh_alice.shell = "/bin/zsh".to_string();
        let records = vec![user("host-a", "alice", 1000, "Alice"), zsh_alice];
        let normalized = normalize_users(&records, SortKey::Name);
        assert_eq!(normalized.len(), 2);
    }

    #[test]
    fn sort_by_id_is_numeric() {
        let records = vec![
            user("a", "zed", 100, ""),
            user("a", "amy", 1000, ""),
            user("a", "mid", 20, ""),
        ];
        let normalized = normalize_users(&records, SortKey::Id);
        let uids: Vec<i64> = normalized.iter().map(|u| u.uid).collect();
        assert_eq!(uids, vec![20, 100, 1000]);
    }

    #[test]
    fn sort_by_name_is_lexicographic() {
        let records = vec![
            user("a", "zed", 100, ""),
            user("a", "amy", 1000, ""),
            user("a", "mid", 20, ""),
        ];
        let normalized = normalize_users(&records, SortKey::Name);
        let names: Vec<&str> = normalized.iter().map(|u| u.uname.as_str()).collect();
        assert_eq!(names, vec!["amy", "mid", "zed"]);
    }

    #[test]
    fn empty_uname_is_compacted_out() {
        let records = vec![user("a", "", 999, ""), user("a", "alice", 1000, "")];
        let normalized = normalize_users(&records, SortKey::Name);
        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized[0].uname, "alice");
    }

    #[test]
    fn identical_group_membership_collapses_to_one_variant() {
        let records = vec![
            group("host-a", "staff", 50, &["alice", "bob"]),
            group("host-b", "staff", 50, &["alice", "bob"]),
        ];
        let normalized = normalize_groups(&records, SortKey::Name);
        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized[0].membership.len(), 1);
        assert_eq!(
            normalized[0].membership[0].nodes,
            vec!["host-a", "host-b"]
        );
    }

    #[test]
    fn differing_membership_stays_as_distinct_variants() {
        let records = vec![
            group("host-a", "staff", 50, &["alice"]),
            group("host-b", "staff", 50, &["alice", "bob"]),
        ];
        let normalized = normalize_groups(&records, SortKey::Name);
        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized[0].membership.len(), 2);
        assert_eq!(normalized[0].membership[0].members, vec!["alice"]);
        assert_eq!(normalized[0].membership[0].nodes, vec!["host-a"]);
        assert_eq!(normalized[0].membership[1].members, vec!["alice", "bob"]);
        assert_eq!(normalized[0].membership[1].nodes, vec!["host-b"]);
    }

    #[test]
    fn groups_sort_by_gid_numerically() {
        let records = vec![
            group("a", "zz", 5, &[]),
            group("a", "aa", 100, &[]),
            group("a", "mm", 20, &[]),
        ];
        let normalized = normalize_groups(&records, SortKey::Id);
        let gids: Vec<i64> = normalized.iter().map(|g| g.gid).collect();
        assert_eq!(gids, vec![5, 20, 100]);
    }
}
