// Authentication endpoints
//
// Login stores the issued token in the session; logout forgets it even
// when the server call fails.

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{ChangePasswordRequest, LoginRequest, LoginResponse};

impl ApiClient {
    /// Log in and store the returned bearer token.
    ///
    /// `POST /users/login` with `{"email": "...", "password": "..."}`
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<Value, Error> {
        debug!(email, "logging in");
        let body = LoginRequest {
            email,
            password: password.expose_secret(),
        };
        let resp: LoginResponse = self.post("/users/login", Some(&body)).await?;
        self.session().set_token(SecretString::from(resp.token));
        Ok(resp.user)
    }

    /// Log out; the local token is cleared regardless of the outcome.
    ///
    /// `POST /users/logout`
    pub async fn logout(&self) -> Result<(), Error> {
        let result: Result<Value, Error> = self.post("/users/logout", None::<&()>).await;
        self.session().clear();
        if let Err(ref e) = result {
            warn!(error = %e, "logout request failed, session cleared locally");
        }
        result.map(|_| ())
    }

    /// `GET /users/profile`
    pub async fn profile(&self) -> Result<Value, Error> {
        self.get("/users/profile", &[]).await
    }

    /// `PUT /users/change-password` with `{"currentPassword", "newPassword"}`
    pub async fn change_password(
        &self,
        current: &SecretString,
        new: &SecretString,
    ) -> Result<Value, Error> {
        let body = ChangePasswordRequest {
            current_password: current.expose_secret(),
            new_password: new.expose_secret(),
        };
        self.put("/users/change-password", &body).await
    }
}
