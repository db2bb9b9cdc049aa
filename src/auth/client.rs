//! Client wrappers for the auth endpoints. Keeping the paths here stops flow code
//! from building requests by hand and keeps secrets out of logs.

use crate::{
    api::{ApiClient, Auth, ClientError, decode},
    auth::types::{
        ForgotPasswordRequest, LoginRequest, ResetPasswordRequest, UserProfile,
        VerifyLoginRequest, VerifyLoginResponse,
    },
};
use secrecy::SecretString;

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const VERIFY_LOGIN_PATH: &str = "/api/auth/verify-login";
pub const FORGOT_PASSWORD_PATH: &str = "/api/auth/forgot-password";
pub const RESET_PASSWORD_PATH: &str = "/api/auth/reset-password";
pub const PROFILE_PATH: &str = "/api/user/profile";

/// Step one of login. The backend sends an OTP on success.
///
/// # Errors
/// Propagates gateway errors.
pub async fn login(
    api: &ApiClient,
    email: &str,
    password: &SecretString,
) -> Result<(), ClientError> {
    let request = LoginRequest { email, password };
    api.post_json(LOGIN_PATH, &request, Auth::None).await?;
    Ok(())
}

/// Step two of login. Returns the bearer credential; storing it is up to the caller.
///
/// # Errors
/// Propagates gateway errors, or `Parse` when no credential is present.
pub async fn verify_login(
    api: &ApiClient,
    email: &str,
    otp: &SecretString,
) -> Result<SecretString, ClientError> {
    let request = VerifyLoginRequest { email, otp };
    let value = api.post_json(VERIFY_LOGIN_PATH, &request, Auth::None).await?;
    let response: VerifyLoginResponse = decode(value)?;

    response
        .into_credential()
        .map(SecretString::from)
        .ok_or_else(|| ClientError::Parse("Empty credential in response".to_string()))
}

/// Asks the backend to send a password reset code.
///
/// # Errors
/// Propagates gateway errors.
pub async fn forgot_password(api: &ApiClient, email: &str) -> Result<(), ClientError> {
    api.post_json(FORGOT_PASSWORD_PATH, &ForgotPasswordRequest { email }, Auth::None)
        .await?;
    Ok(())
}

/// Consumes a reset code and sets the new password.
///
/// # Errors
/// Propagates gateway errors.
pub async fn reset_password(
    api: &ApiClient,
    email: &str,
    code: &SecretString,
    new_password: &SecretString,
) -> Result<(), ClientError> {
    let request = ResetPasswordRequest {
        email,
        code,
        new_password,
    };
    api.post_json(RESET_PASSWORD_PATH, &request, Auth::None)
        .await?;
    Ok(())
}

/// Fetches the profile for the stored credential.
///
/// # Errors
/// Propagates gateway errors.
pub async fn fetch_profile(api: &ApiClient) -> Result<UserProfile, ClientError> {
    api.get_json(PROFILE_PATH, Auth::Required).await
}
