//! Handlers for the authentication API.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::auth::RegisterData;
use crate::web::dto::{
    AuthResponse, AvailabilityResponse, EmailAvailabilityQuery, ForgotPasswordRequest,
    LoginRequest, MeResponse, MessageResponse, MobileAvailabilityQuery, OtpResponse,
    RefreshTokenRequest, RegisterRequest, ResendOtpRequest, ResetPasswordRequest, TokenResponse,
    VerifyOtpRequest,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request
        .validate()
        .map_err(ApiError::from_validation_errors)?;

    let outcome = state
        .auth
        .register(RegisterData {
            property_name: request.property_name,
            owner_name: request.owner_name,
            email: request.email,
            phone: request.phone,
            password: request.password,
            confirm_password: request.confirm_password,
            city: request.city,
            state: request.state,
            country: request.country,
            pincode: request.pincode,
        })
        .await?;

    let body = AuthResponse::from_outcome(
        "Registration successful, check your email for the verification code",
        &outcome,
    );
    Ok((StatusCode::CREATED, Json(body)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    request
        .validate()
        .map_err(ApiError::from_validation_errors)?;

    let outcome = state.auth.login(&request.email, &request.password).await?;
    let message = if outcome.requires_otp_verification {
        "Email not verified, a new verification code has been sent"
    } else {
        "Login successful"
    };
    Ok(Json(AuthResponse::from_outcome(message, &outcome)))
}

/// POST /api/auth/verify-otp
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(request): Json<VerifyOtpRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    request
        .validate()
        .map_err(ApiError::from_validation_errors)?;

    let outcome = state.auth.verify_otp(&request.email, &request.otp).await?;
    Ok(Json(AuthResponse::from_outcome(
        "Email verified successfully",
        &outcome,
    )))
}

/// POST /api/auth/resend-otp
pub async fn resend_otp(
    State(state): State<AppState>,
    Json(request): Json<ResendOtpRequest>,
) -> Result<Json<OtpResponse>, ApiError> {
    request
        .validate()
        .map_err(ApiError::from_validation_errors)?;

    let issued = state.auth.resend_otp(&request.email).await?;
    Ok(Json(OtpResponse {
        success: true,
        message: "Verification code sent".to_string(),
        email: issued.email,
        expires_at: issued.expires_at.to_rfc3339(),
    }))
}

/// POST /api/auth/forgot-password
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    request
        .validate()
        .map_err(ApiError::from_validation_errors)?;

    state.auth.forgot_password(&request.email).await?;
    // Same message whether or not the account exists
    Ok(Json(MessageResponse::ok(
        "If that email is registered, a reset link has been sent",
    )))
}

/// POST /api/auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    request
        .validate()
        .map_err(ApiError::from_validation_errors)?;

    state
        .auth
        .reset_password(
            &request.token,
            &request.new_password,
            &request.confirm_password,
        )
        .await?;
    Ok(Json(MessageResponse::ok("Password reset successfully")))
}

/// POST /api/auth/refresh-token
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(request): Json<RefreshTokenRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    request
        .validate()
        .map_err(ApiError::from_validation_errors)?;

    let tokens = state.auth.refresh(&request.refresh_token).await?;
    Ok(Json(TokenResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: tokens.expires_in,
    }))
}

/// POST /api/auth/logout
pub async fn logout(State(state): State<AppState>) -> Json<MessageResponse> {
    state.auth.logout();
    Json(MessageResponse::ok("Logged out"))
}

/// GET /api/auth/check-email
pub async fn check_email(
    State(state): State<AppState>,
    Query(query): Query<EmailAvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, ApiError> {
    let available = state.auth.is_email_available(&query.email).await?;
    Ok(Json(AvailabilityResponse { available }))
}

/// GET /api/auth/check-mobile
pub async fn check_mobile(
    State(state): State<AppState>,
    Query(query): Query<MobileAvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, ApiError> {
    let available = state.auth.is_mobile_available(&query.mobile).await?;
    Ok(Json(AvailabilityResponse { available }))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<MeResponse>, ApiError> {
    let principal = state.auth.principal(claims.account_id).await?;
    Ok(Json(MeResponse::from(principal)))
}
