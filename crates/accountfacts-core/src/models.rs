//! Typed records shared across the reconstruction, reconciliation, and
//! rendering layers.
//!
//! The original fact data is loosely shaped (string-keyed mappings);
//! everything here is an explicit struct so a typo'd field name is a
//! compile error rather than a silently absent value.

use std::collections::BTreeSet;

use clap::ValueEnum;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Marker prefix distinguishing primary-group implied membership from
/// membership listed explicitly in the group database.
pub const IMPLIED_MEMBER_PREFIX: &str = "*";

// ---------------------------------------------------------------------------
// Wire shape
// ---------------------------------------------------------------------------

/// One segment of a fact-contents path: array indices arrive as JSON
/// numbers, map keys as JSON strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(u64),
    Key(String),
}

/// One key/value fact fragment as returned by the fact-contents endpoint.
///
/// `path[0]` is the fact family, `path[1]` the ordinal slot of the record
/// within that machine's collection, `path[2]` the leaf field name.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FactFragment {
    pub certname: String,
    pub path: Vec<PathSegment>,
    pub value: Value,
}

// ---------------------------------------------------------------------------
// Reconstructed records
// ---------------------------------------------------------------------------

/// One local user account as reported by a single machine.
///
/// Created once per (machine, slot) by the reconstructor and never
/// mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserRecord {
    pub uid: i64,
    pub primary_gid: i64,
    pub uname: String,
    pub shell: String,
    pub home_dir: String,
    pub description: String,
    pub source_node: String,
}

/// The fields that define "sameness" for user grouping: everything the
/// record was constructed from minus provenance and description.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserIdentity {
    pub uid: i64,
    pub primary_gid: i64,
    pub uname: String,
    pub shell: String,
    pub home_dir: String,
}

impl UserRecord {
    pub fn identity(&self) -> UserIdentity {
        UserIdentity {
            uid: self.uid,
            primary_gid: self.primary_gid,
            uname: self.uname.clone(),
            shell: self.shell.clone(),
            home_dir: self.home_dir.clone(),
        }
    }
}

/// One local group as reported by a single machine.
///
/// `members` is a set, so it is deduplicated and sorted at all times.
/// Created by the reconstructor, mutated exactly once more by the
/// reconciler (implied primary-group members), immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupRecord {
    pub gid: i64,
    pub name: String,
    pub members: BTreeSet<String>,
    pub source_node: String,
}

/// Group identity: gid, name, and the full (sorted) member set.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupIdentity {
    pub gid: i64,
    pub name: String,
    pub members: Vec<String>,
}

impl GroupRecord {
    pub fn identity(&self) -> GroupIdentity {
        GroupIdentity {
            gid: self.gid,
            name: self.name.clone(),
            members: self.members.iter().cloned().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Normalized records
// ---------------------------------------------------------------------------

/// A user identity collapsed across every machine that reported it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NormalizedUser {
    pub uid: i64,
    pub primary_gid: i64,
    #[serde(rename = "name")]
    pub uname: String,
    pub shell: String,
    #[serde(rename = "homedir")]
    pub home_dir: String,
    pub nodes: Vec<String>,
    pub descriptions: Vec<String>,
}

/// One distinct membership configuration of a group: a member set and
/// the machines that reported exactly that set.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct MembershipVariant {
    pub members: Vec<String>,
    pub nodes: Vec<String>,
}

/// A group collapsed to one entry per (gid, name), carrying every
/// distinct membership configuration seen across machines.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NormalizedGroup {
    pub gid: i64,
    pub name: String,
    pub membership: Vec<MembershipVariant>,
}

/// One flat, fixed-column output row. Insertion order is the column
/// order, so the delimited-text header is stable.
pub type FlatRow = IndexMap<String, Value>;

// ---------------------------------------------------------------------------
// Sort selection
// ---------------------------------------------------------------------------

/// Final report ordering: lexicographic by account/group name, or
/// numeric by uid/gid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SortKey {
    Name,
    Id,
}
