//! Authentication endpoints and the two-step password-reset flow.

use serde::{Deserialize, Serialize};
use tracing::info;
use transita_domain::models::Account;

use crate::client::ApiClient;
use crate::error::{ApiError, ApiResult};

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Serialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignUpRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<Account>,
}

/// Where a fresh login lands, derived from the token's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landing {
    AdminDashboard,
    Dashboard,
}

impl ApiClient {
    /// Signs in and saves the returned token into the session store.
    pub async fn sign_in(&self, email: &str, password: &str) -> ApiResult<AuthResponse> {
        let request = SignInRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let value = self
            .send_json(self.post_unauthenticated("/api/auth/signin").json(&request))
            .await?;
        let response: AuthResponse = serde_json::from_value(value)
            .map_err(|e| ApiError::ResponseParseFailed(e.to_string()))?;

        self.session().save_token(&response.token);
        info!("signed in");
        Ok(response)
    }

    pub async fn sign_up(&self, request: &SignUpRequest) -> ApiResult<()> {
        self.send_unit(self.post_unauthenticated("/api/auth/signup").json(request))
            .await
    }

    pub async fn request_password_reset(&self, email: &str) -> ApiResult<()> {
        self.send_unit(
            self.post_unauthenticated("/api/auth/forgot-password")
                .json(&serde_json::json!({ "email": email })),
        )
        .await
    }

    pub async fn reset_password(&self, email: &str, otp: &str, new_password: &str) -> ApiResult<()> {
        self.send_unit(
            self.post_unauthenticated("/api/auth/reset-password")
                .json(&serde_json::json!({
                    "email": email,
                    "otp": otp,
                    "newPassword": new_password,
                })),
        )
        .await
    }

    /// Clears the session token.
    pub fn logout(&self) {
        self.session().clear();
        info!("logged out");
    }

    pub fn landing_after_login(&self) -> Landing {
        if self.session().is_admin() {
            Landing::AdminDashboard
        } else {
            Landing::Dashboard
        }
    }
}

/// Two-step reset: first an OTP is mailed out, then the OTP plus the new
/// password complete the reset. Local checks run before anything is sent.
#[derive(Debug, Default)]
pub struct PasswordResetFlow {
    email: Option<String>,
}

impl PasswordResetFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn otp_requested(&self) -> bool {
        self.email.is_some()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Step one: request the OTP mail.
    pub async fn request(&mut self, api: &ApiClient, email: &str) -> ApiResult<()> {
        api.request_password_reset(email).await?;
        self.email = Some(email.to_string());
        Ok(())
    }

    /// Step two: complete the reset. Password length and confirmation match
    /// are validated locally and never reach the server.
    pub async fn complete(
        &self,
        api: &ApiClient,
        otp: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> ApiResult<()> {
        let email = self
            .email
            .as_deref()
            .ok_or_else(|| ApiError::Validation("request an OTP first".to_string()))?;
        Self::check_password(new_password, confirm_password)?;
        api.reset_password(email, otp, new_password).await
    }

    pub fn check_password(new_password: &str, confirm_password: &str) -> ApiResult<()> {
        if new_password.len() < MIN_PASSWORD_LEN {
            return Err(ApiError::Validation(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        if new_password != confirm_password {
            return Err(ApiError::Validation("passwords do not match".to_string()));
        }
        Ok(())
    }
}
