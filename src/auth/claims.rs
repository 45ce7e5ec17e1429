use serde::{Deserialize, Serialize};

/// JWT payload: `{"email", "userId", "exp"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub exp: i64, // expires at (unix seconds)
}

/// Identity carried by a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub user_id: i64,
    pub email: String,
}
