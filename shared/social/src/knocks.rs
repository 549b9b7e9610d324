//! Pure classification of knock lists into relationship buckets.
//!
//! Everything here is deterministic and free of I/O so the knock screens can
//! derive their display state without touching the network.

use crate::{KnockRequest, KnockStatus, Relation, UserSummary};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Canonical, direction-independent key for a two-user relationship: both
/// ids sorted lexicographically and joined.
pub fn pair_key(a: &str, b: &str) -> String {
    if a <= b {
        format!("{a}:{b}")
    } else {
        format!("{b}:{a}")
    }
}

/// Output of [`categorize_knocks`].
#[derive(Debug, Clone, Default)]
pub struct KnockBuckets {
    /// Users who knocked me and are waiting on my knock back.
    pub knockers: Vec<KnockRequest>,
    /// Users I knocked who have not reciprocated yet.
    pub knocking: Vec<KnockRequest>,
    /// Mutual relationships, one entry per distinct pair.
    pub locked_in: Vec<KnockRequest>,
    pub locked_in_count: usize,
}

/// Split the received and sent knock lists into display buckets.
///
/// A locked-in pair can be reachable from both lists; the pair-key dedup set
/// guarantees it is counted exactly once, so `locked_in_count` always equals
/// `locked_in.len()`.
pub fn categorize_knocks(
    received: &[KnockRequest],
    sent: &[KnockRequest],
    current_user_id: &str,
) -> KnockBuckets {
    let mut buckets = KnockBuckets::default();
    let mut seen_pairs: HashSet<String> = HashSet::new();

    for knock in received {
        match knock.status {
            KnockStatus::LockedIn => {
                if seen_pairs.insert(pair_key(current_user_id, &knock.user.id)) {
                    buckets.locked_in.push(knock.clone());
                }
            }
            KnockStatus::Onesidedlock => buckets.knockers.push(knock.clone()),
            KnockStatus::Pending | KnockStatus::Declined => {}
        }
    }

    for knock in sent {
        match knock.status {
            KnockStatus::LockedIn => {
                if seen_pairs.insert(pair_key(current_user_id, &knock.user.id)) {
                    buckets.locked_in.push(knock.clone());
                }
            }
            KnockStatus::Onesidedlock => buckets.knocking.push(knock.clone()),
            KnockStatus::Pending | KnockStatus::Declined => {}
        }
    }

    buckets.locked_in_count = seen_pairs.len();
    buckets
}

/// Derived relation plus the status that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationAndStatus {
    pub relation: Relation,
    pub status: Option<KnockStatus>,
}

/// Resolve the relation between the current user and `target_user_id` from
/// the received (`knockers`) and sent (`knocked`) knock lists.
///
/// A knocker entry with a non-locked-in status shadows a simultaneous sent
/// knock: the knocked branch only fires when the relation is still stranger
/// or when the sent side is locked in. That asymmetry is intentional product
/// behavior and is pinned by test; do not "fix" it here.
pub fn relation_and_status(
    target_user_id: &str,
    knockers: &[KnockRequest],
    knocked: &[KnockRequest],
) -> RelationAndStatus {
    let mut relation = Relation::Stranger;
    let mut status = None;

    if let Some(entry) = knockers.iter().find(|k| k.user.id == target_user_id) {
        relation = Relation::Knocker;
        status = Some(entry.status);
    }

    if let Some(entry) = knocked.iter().find(|k| k.user.id == target_user_id) {
        if relation == Relation::Knocker && entry.status == KnockStatus::LockedIn {
            relation = Relation::LockedIn;
            status = Some(KnockStatus::LockedIn);
        } else if relation == Relation::Stranger {
            relation = Relation::Knocked;
            status = Some(entry.status);
        }
    }

    RelationAndStatus { relation, status }
}

/// Which knock list a row is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnockList {
    Knockers,
    Knocking,
}

/// Action-button label for a knock row.
pub fn knock_button_label(knock: &KnockRequest, list: KnockList) -> String {
    match (knock.status, list) {
        (KnockStatus::LockedIn, _) => "Message".to_string(),
        (KnockStatus::Pending, _) => "Pending".to_string(),
        (KnockStatus::Onesidedlock, KnockList::Knockers) => "Knock Back".to_string(),
        (KnockStatus::Onesidedlock, KnockList::Knocking) => "Unknock".to_string(),
        (status, _) => status.to_string(),
    }
}

/// Human-readable relationship label for profile and search rows.
pub fn user_status_label(relation: Option<Relation>, status: Option<KnockStatus>) -> String {
    match (relation, status) {
        (Some(Relation::LockedIn), _) | (_, Some(KnockStatus::LockedIn)) => "Locked In",
        (Some(Relation::Knocker), Some(KnockStatus::Onesidedlock)) => "Pending your knock back",
        (Some(Relation::Knocker), Some(KnockStatus::Pending)) => "Waiting for their knock back",
        (Some(Relation::Knocked), Some(KnockStatus::Onesidedlock | KnockStatus::Pending)) => {
            "Knock request sent"
        }
        (Some(Relation::Stranger), _) | (None, None) => "New user",
        _ => "",
    }
    .to_string()
}

fn relation_priority(relation: Relation) -> u8 {
    match relation {
        Relation::LockedIn => 1,
        Relation::Knocker => 2,
        Relation::Knocked => 3,
        Relation::Stranger => 4,
    }
}

/// Search-result row decorated with the viewer's relation to that user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedUser {
    pub user: UserSummary,
    pub relation: Relation,
    pub status: Option<KnockStatus>,
}

/// Fixed relation priority first, then username ascending. The username
/// tie-break is plain byte order, standing in for the locale-sensitive
/// comparison the product originally used.
pub fn compare_by_relation(a: &RankedUser, b: &RankedUser) -> Ordering {
    relation_priority(a.relation)
        .cmp(&relation_priority(b.relation))
        .then_with(|| a.user.username.cmp(&b.user.username))
}

/// Decorate search candidates with their relation to the viewer and order
/// them for display.
pub fn rank_search_results(
    candidates: Vec<UserSummary>,
    received: &[KnockRequest],
    sent: &[KnockRequest],
) -> Vec<RankedUser> {
    let mut ranked: Vec<RankedUser> = candidates
        .into_iter()
        .map(|user| {
            let resolved = relation_and_status(&user.id, received, sent);
            RankedUser {
                user,
                relation: resolved.relation,
                status: resolved.status,
            }
        })
        .collect();
    ranked.sort_by(compare_by_relation);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn knock(id: &str, user_id: &str, status: KnockStatus) -> KnockRequest {
        KnockRequest {
            id: id.to_string(),
            user: UserSummary {
                id: user_id.to_string(),
                username: format!("user-{user_id}"),
                avatar: None,
            },
            status,
            timestamp: "2025-03-01T12:00:00Z".to_string(),
        }
    }

    #[test]
    fn pair_key_is_direction_independent() {
        assert_eq!(pair_key("alice", "bob"), pair_key("bob", "alice"));
        assert_eq!(pair_key("alice", "bob"), "alice:bob");
    }

    #[test]
    fn locked_in_pair_counted_once_across_both_lists() {
        let received = vec![knock("k1", "u2", KnockStatus::LockedIn)];
        let sent = vec![knock("k2", "u2", KnockStatus::LockedIn)];

        let buckets = categorize_knocks(&received, &sent, "u1");

        assert_eq!(buckets.locked_in.len(), 1);
        assert_eq!(buckets.locked_in_count, 1);
        assert_eq!(buckets.locked_in[0].id, "k1");
    }

    #[test]
    fn locked_in_count_always_matches_list_length() {
        let received = vec![
            knock("k1", "u2", KnockStatus::LockedIn),
            knock("k2", "u3", KnockStatus::Onesidedlock),
            knock("k3", "u4", KnockStatus::Pending),
        ];
        let sent = vec![
            knock("k4", "u2", KnockStatus::LockedIn),
            knock("k5", "u5", KnockStatus::LockedIn),
            knock("k6", "u6", KnockStatus::Onesidedlock),
        ];

        let buckets = categorize_knocks(&received, &sent, "u1");

        assert_eq!(buckets.locked_in_count, buckets.locked_in.len());
        assert_eq!(buckets.locked_in_count, 2);
        assert_eq!(buckets.knockers.len(), 1);
        assert_eq!(buckets.knocking.len(), 1);
    }

    #[test]
    fn declined_and_pending_entries_are_not_bucketed() {
        let received = vec![knock("k1", "u2", KnockStatus::Declined)];
        let sent = vec![knock("k2", "u3", KnockStatus::Pending)];

        let buckets = categorize_knocks(&received, &sent, "u1");

        assert!(buckets.knockers.is_empty());
        assert!(buckets.knocking.is_empty());
        assert!(buckets.locked_in.is_empty());
        assert_eq!(buckets.locked_in_count, 0);
    }

    #[test]
    fn relation_defaults_to_stranger() {
        let resolved = relation_and_status("u9", &[], &[]);
        assert_eq!(resolved.relation, Relation::Stranger);
        assert_eq!(resolved.status, None);
    }

    #[test]
    fn locked_in_sent_knock_overrides_knocker_relation() {
        let knockers = vec![knock("k1", "u2", KnockStatus::Onesidedlock)];
        let knocked = vec![knock("k2", "u2", KnockStatus::LockedIn)];

        let resolved = relation_and_status("u2", &knockers, &knocked);

        assert_eq!(resolved.relation, Relation::LockedIn);
        assert_eq!(resolved.status, Some(KnockStatus::LockedIn));
    }

    #[test]
    fn non_locked_in_sent_knock_is_shadowed_by_knocker_entry() {
        // Documented quirk: the sent-knock information is silently discarded
        // when a knocker entry with a non-locked-in status exists.
        let knockers = vec![knock("k1", "u2", KnockStatus::Onesidedlock)];
        let knocked = vec![knock("k2", "u2", KnockStatus::Pending)];

        let resolved = relation_and_status("u2", &knockers, &knocked);

        assert_eq!(resolved.relation, Relation::Knocker);
        assert_eq!(resolved.status, Some(KnockStatus::Onesidedlock));
    }

    #[test]
    fn sent_knock_alone_yields_knocked_relation() {
        let knocked = vec![knock("k1", "u2", KnockStatus::Pending)];

        let resolved = relation_and_status("u2", &[], &knocked);

        assert_eq!(resolved.relation, Relation::Knocked);
        assert_eq!(resolved.status, Some(KnockStatus::Pending));
    }

    #[test]
    fn button_labels_depend_on_status_and_list() {
        let one_sided = knock("k1", "u2", KnockStatus::Onesidedlock);
        assert_eq!(knock_button_label(&one_sided, KnockList::Knockers), "Knock Back");
        assert_eq!(knock_button_label(&one_sided, KnockList::Knocking), "Unknock");

        let locked = knock("k2", "u3", KnockStatus::LockedIn);
        assert_eq!(knock_button_label(&locked, KnockList::Knockers), "Message");

        let pending = knock("k3", "u4", KnockStatus::Pending);
        assert_eq!(knock_button_label(&pending, KnockList::Knocking), "Pending");

        let declined = knock("k4", "u5", KnockStatus::Declined);
        assert_eq!(knock_button_label(&declined, KnockList::Knockers), "declined");
    }

    #[test]
    fn status_labels_cover_fallbacks() {
        assert_eq!(
            user_status_label(Some(Relation::LockedIn), Some(KnockStatus::LockedIn)),
            "Locked In"
        );
        assert_eq!(
            user_status_label(Some(Relation::Knocker), Some(KnockStatus::Onesidedlock)),
            "Pending your knock back"
        );
        assert_eq!(
            user_status_label(Some(Relation::Knocked), Some(KnockStatus::Pending)),
            "Knock request sent"
        );
        assert_eq!(user_status_label(Some(Relation::Stranger), None), "New user");
        assert_eq!(user_status_label(None, None), "New user");
        assert_eq!(user_status_label(None, Some(KnockStatus::Declined)), "");
    }

    #[test]
    fn search_results_ordered_by_relation_then_username() {
        let received = vec![knock("k1", "u2", KnockStatus::Onesidedlock)];
        let sent = vec![knock("k2", "u3", KnockStatus::LockedIn)];

        let candidates = vec![
            UserSummary {
                id: "u4".into(),
                username: "zoe".into(),
                avatar: None,
            },
            UserSummary {
                id: "u2".into(),
                username: "mia".into(),
                avatar: None,
            },
            UserSummary {
                id: "u3".into(),
                username: "ada".into(),
                avatar: None,
            },
            UserSummary {
                id: "u5".into(),
                username: "abe".into(),
                avatar: None,
            },
        ];

        let ranked = rank_search_results(candidates, &received, &sent);

        let order: Vec<&str> = ranked.iter().map(|r| r.user.id.as_str()).collect();
        // u3 is locked in (sent side), u2 is a knocker, strangers sort last
        // by username.
        assert_eq!(order, vec!["u3", "u2", "u5", "u4"]);
    }
}
