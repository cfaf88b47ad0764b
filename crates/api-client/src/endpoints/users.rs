//! User endpoints

use crate::client::SpacesClient;
use crate::error::ApiResult;
use crate::models::User;
use crate::query::encode_path_segment;

#[derive(Clone)]
pub struct UsersApi {
    client: SpacesClient,
}

impl UsersApi {
    pub(crate) fn new(client: SpacesClient) -> Self {
        Self { client }
    }

    /// GET /users/:userid
    pub async fn get(&self, uid: &str) -> ApiResult<User> {
        self.client
            .get(&format!("/users/{}", encode_path_segment(uid)))
            .await
    }
}
