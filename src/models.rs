use serde::{Deserialize, Serialize};

/// Access token claims. Tokens are issued by the account service; this crate
/// only verifies them.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    pub sub: String,
    pub role: u8, // role id
    pub exp: usize,

    /// Present only if this user is linked to an employee record
    pub employee_id: Option<u64>,
}
