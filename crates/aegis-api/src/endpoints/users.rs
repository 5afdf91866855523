// User administration endpoints
//
// Listing is page-numbered under `/users/data`; mutations address
// `/users[/:id]`. Deletes are soft on the server side.

use serde_json::Value;
use tracing::debug;

use super::dashboard::encode_segment;
use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{NewUser, PagedEnvelope, UserListParams, UserUpdate};

impl ApiClient {
    /// `GET /users/data?page=&limit=&search=&role=&status=`
    pub async fn list_users(&self, params: &UserListParams) -> Result<PagedEnvelope, Error> {
        self.get("/users/data", &params.query()).await
    }

    /// `GET /users/:id`
    pub async fn get_user(&self, id: &str) -> Result<Value, Error> {
        self.get(&format!("/users/{}", encode_segment(id)), &[])
            .await
    }

    /// `POST /users`
    pub async fn create_user(&self, user: &NewUser) -> Result<Value, Error> {
        debug!(email = %user.email, "creating user");
        self.post("/users", Some(user)).await
    }

    /// `PUT /users/:id`
    pub async fn update_user(&self, id: &str, update: &UserUpdate) -> Result<Value, Error> {
        debug!(id, "updating user");
        self.put(&format!("/users/{}", encode_segment(id)), update)
            .await
    }

    /// `DELETE /users/:id`
    pub async fn delete_user(&self, id: &str) -> Result<Value, Error> {
        debug!(id, "deleting user");
        self.delete(&format!("/users/{}", encode_segment(id))).await
    }
}
