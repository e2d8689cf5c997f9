use crate::domain::user::{
    ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateProfileRequest, UserProfile,
};
use crate::presentation::handlers::{ApiError, AppState, AuthenticatedUser};
use crate::presentation::validation;
use actix_web::{HttpResponse, web};
use serde::Serialize;
use tracing::{info, instrument};

#[derive(Serialize)]
struct AuthResponse {
    message: String,
    token: String,
    user: UserProfile,
}

#[derive(Serialize)]
struct ProfileResponse {
    user: UserProfile,
}

#[derive(Serialize)]
struct UpdatedProfileResponse {
    message: String,
    user: UserProfile,
}

#[derive(Serialize)]
struct VerifyResponse {
    valid: bool,
    user: UserProfile,
}

#[derive(Serialize)]
struct MessageResponse {
    message: String,
}

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn register(
    state: web::Data<AppState>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    validation::validate_register(&req)?;

    let (user, token) = state
        .auth
        .register(req.into_inner())
        .await
        .map_err(ApiError::from)?;

    info!(user_id = %user.id, "Registration completed");
    Ok(HttpResponse::Created().json(AuthResponse {
        message: "User created successfully".to_string(),
        token,
        user,
    }))
}

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    validation::validate_login(&req)?;

    let (user, token) = state
        .auth
        .login(req.into_inner())
        .await
        .map_err(ApiError::from)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        message: "Login successful".to_string(),
        token,
        user,
    }))
}

#[instrument(skip(user), fields(user_id = %user.0.id))]
pub async fn get_profile(user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(ProfileResponse {
        user: user.0.profile(),
    })
}

#[instrument(skip(state, user, req), fields(user_id = %user.0.id))]
pub async fn update_profile(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, ApiError> {
    validation::validate_profile_update(&req)?;

    let updated = state
        .auth
        .update_profile(&user.0.id, req.into_inner())
        .await
        .map_err(ApiError::from)?;

    Ok(HttpResponse::Ok().json(UpdatedProfileResponse {
        message: "Profile updated successfully".to_string(),
        user: updated,
    }))
}

#[instrument(skip(state, user, req), fields(user_id = %user.0.id))]
pub async fn change_password(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse, ApiError> {
    validation::validate_new_password(&req.new_password)?;

    state
        .auth
        .change_password(&user.0.id, &req.new_password)
        .await
        .map_err(ApiError::from)?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Password changed successfully".to_string(),
    }))
}

/// Lets clients check whether their stored token is still good; the
/// extractor has already resolved it to a live profile by the time this
/// body runs.
#[instrument(skip(user), fields(user_id = %user.0.id))]
pub async fn verify(user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(VerifyResponse {
        valid: true,
        user: user.0.profile(),
    })
}
