use serde::{Deserialize, Serialize};

/// 使用者節點（id 由呼叫端提供，不由資料庫產生）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(alias = "Id")]
    pub id: i64,
    #[serde(alias = "Username")]
    pub username: String,
}

impl User {
    pub fn new(id: i64, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
        }
    }
}

/// 追蹤關係（有向邊）follower -> followed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Follow {
    #[serde(rename = "followerID")]
    pub follower_id: i64,
    #[serde(rename = "followedID")]
    pub followed_id: i64,
}

impl Follow {
    pub fn new(follower_id: i64, followed_id: i64) -> Self {
        Self {
            follower_id,
            followed_id,
        }
    }

    pub fn is_self_follow(&self) -> bool {
        self.follower_id == self.followed_id
    }
}
