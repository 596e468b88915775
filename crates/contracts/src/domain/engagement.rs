use serde::{Deserialize, Serialize};

/// Authoritative result of a like toggle. Clients overwrite their optimistic
/// guess with this, never the other way around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeOutcome {
    pub liked: bool,

    #[serde(rename = "likeCount")]
    pub like_count: i64,
}
