//! Cross-Reference Reconciler: primary-group implied membership.
//!
//! A user's primary group is referenced by gid on the user record and is
//! not visible in the group's explicit member list. For every user this
//! pass finds the first group on the same source node with a matching
//! gid and inserts the user's name with the implied-membership marker
//! prefix. Insertion goes through the member set, so running the pass
//! twice cannot duplicate an entry.

use tracing::debug;

use crate::models::{GroupRecord, UserRecord, IMPLIED_MEMBER_PREFIX};

/// Mark each user as an implied member of their primary group.
///
/// Only ever adds members; a primary gid with no matching group on that
/// machine is skipped silently (partial collection is normal). Never
/// creates group records.
pub fn reconcile_groups(groups: &mut [GroupRecord], users: &[UserRecord]) {
    let mut added = 0usize;
    for user in users {
        let matching = groups
            .iter_mut()
            .find(|g| g.source_node == user.source_node && g.gid == user.primary_gid);
        match matching {
            Some(group) => {
                if group
                    .members
                    .insert(format!("{IMPLIED_MEMBER_PREFIX}{}", user.uname))
                {
                    added += 1;
                }
            }
            None => debug!(
                "no group with gid {} on {} for user {}; skipping",
                user.primary_gid, user.source_node, user.uname
            ),
        }
    }
    debug!("reconciliation added {added} implied primary-group members");
}
