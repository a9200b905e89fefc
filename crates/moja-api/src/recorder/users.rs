// Recorder user endpoints
//
// The signed-in user's own record and role administration.

use serde_json::json;
use tracing::debug;

use crate::auth::{Identity, Role};
use crate::error::Error;
use crate::recorder::client::RecorderClient;
use crate::recorder::models::UserEntry;

impl RecorderClient {
    /// The signed-in user.
    ///
    /// `GET me`
    pub async fn me<I: Identity>(&self, identity: &I) -> Result<UserEntry, Error> {
        self.get_json(identity, "me").await
    }

    /// The signed-in user, or `None` if the recorder refuses (not found,
    /// not authorized).
    ///
    /// `GET me`
    pub async fn me_optional<I: Identity>(
        &self,
        identity: &I,
    ) -> Result<Option<UserEntry>, Error> {
        self.get_json_optional(identity, "me").await
    }

    /// All users known to the recorder.
    ///
    /// `GET users`
    pub async fn list_users<I: Identity>(&self, identity: &I) -> Result<Vec<UserEntry>, Error> {
        self.get_json(identity, "users").await
    }

    /// Grant or revoke a user's role.
    ///
    /// `POST set_user_role/{id}` with `{"role": "admin" | "user" | null}`
    pub async fn set_user_role<I: Identity>(
        &self,
        identity: &I,
        user_id: &str,
        role: Option<Role>,
    ) -> Result<(), Error> {
        debug!(user_id, role = ?role, "setting user role");
        self.post_json(identity, &format!("set_user_role/{user_id}"), json!({ "role": role }))
            .await?;
        Ok(())
    }
}
