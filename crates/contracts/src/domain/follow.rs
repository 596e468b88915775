use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A directed edge meaning "follower follows following". The edge set is the
/// sole source of truth for follow relationships; follower/following counts
/// are derived from it on read and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowEdge {
    #[serde(rename = "followerId")]
    pub follower_id: String,

    #[serde(rename = "followingId")]
    pub following_id: String,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Authoritative result of a follow toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowOutcome {
    pub following: bool,
}

/// Follow relationship as seen by a viewer on a profile.
/// `can_follow` is false when viewing your own profile or unauthenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowStatus {
    #[serde(rename = "isFollowing")]
    pub is_following: bool,

    #[serde(rename = "canFollow")]
    pub can_follow: bool,
}

/// Public profile summary used in follower/following listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrincipalSummary {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
}

/// Derived counters for a profile, reconciled from the edge set on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowCounts {
    #[serde(rename = "followersCount")]
    pub followers: i64,

    #[serde(rename = "followingCount")]
    pub following: i64,
}
