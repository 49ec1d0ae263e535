//! Auth endpoints: current user, token grants, logout.

use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Client, ClientError};

/// The identity the auth service reports for a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id:    Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub access_token:  String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in:    i64,
    pub user:          Identity,
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email:    &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

fn is_rejection(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
    )
}

impl Client {
    /// `None` when the service rejects the token (expired, revoked, malformed).
    pub async fn get_identity(&self, access_token: &str) -> Result<Option<Identity>, ClientError> {
        let resp = self
            .http
            .get(self.auth_url("user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        if is_rejection(resp.status()) {
            return Ok(None);
        }
        let resp = Client::check(resp).await?;
        Ok(Some(resp.json::<Identity>().await?))
    }

    /// Trade a refresh token for a new session. `None` when the refresh
    /// token is no longer accepted.
    pub async fn refresh_session(
        &self,
        refresh_token: &str,
    ) -> Result<Option<Session>, ClientError> {
        let resp = self
            .request(Method::POST, self.auth_url("token"))
            .query(&[("grant_type", "refresh_token")])
            .json(&RefreshGrant { refresh_token })
            .send()
            .await?;

        if is_rejection(resp.status()) {
            return Ok(None);
        }
        let resp = Client::check(resp).await?;
        Ok(Some(resp.json::<Session>().await?))
    }

    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, ClientError> {
        let resp = self
            .request(Method::POST, self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .json(&PasswordGrant { email, password })
            .send()
            .await?;
        let resp = Client::check(resp).await?;
        Ok(resp.json::<Session>().await?)
    }

    pub async fn logout(&self, access_token: &str) -> Result<(), ClientError> {
        let resp = self
            .http
            .post(self.auth_url("logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;
        // An already-dead token is as signed out as it gets.
        if is_rejection(resp.status()) || resp.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        Client::check(resp).await?;
        Ok(())
    }
}
