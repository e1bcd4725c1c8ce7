use crate::{
    auth::{
        generate_token, hash_password, verify_password, AuthResponse, AuthenticatedUserId,
        LoginRequest, RegisterRequest, UpdateProfileRequest,
    },
    error::AppError,
    models::{Credential, User},
};
use actix_web::{get, post, put, web, HttpResponse, Responder};
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

async fn fetch_user(pool: &SqlitePool, id: Uuid) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, avatar, created_at FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

/// Register a new user
///
/// Creates a new user account and returns the user together with an
/// authentication token.
#[post("/register")]
pub async fn register(
    pool: web::Data<SqlitePool>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    // Validate input
    register_data.validate()?;

    let email = register_data.email.trim().to_lowercase();

    // Check if email already exists
    let existing = sqlx::query_as::<_, Credential>(
        "SELECT id, password_hash FROM users WHERE email = ?",
    )
    .bind(&email)
    .fetch_optional(&**pool)
    .await?;

    if existing.is_some() {
        return Err(AppError::DuplicateEmail("Email already registered".into()));
    }

    // Hash password
    let password_hash = hash_password(&register_data.password)?;

    // Insert new user
    let user = User::new(register_data.name.clone(), email);
    sqlx::query(
        "INSERT INTO users (id, name, email, password_hash, avatar, created_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(user.id)
    .bind(&user.name)
    .bind(&user.email)
    .bind(&password_hash)
    .bind(&user.avatar)
    .bind(user.created_at)
    .execute(&**pool)
    .await?;

    // Generate token
    let token = generate_token(user.id)?;

    Ok(HttpResponse::Created().json(AuthResponse { user, token }))
}

/// Login user
///
/// Authenticates a user and returns the user together with an authentication
/// token. A missing account and a wrong password produce the same error.
#[post("/login")]
pub async fn login(
    pool: web::Data<SqlitePool>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    // Validate input
    login_data.validate()?;

    let email = login_data.email.trim().to_lowercase();

    let credential = sqlx::query_as::<_, Credential>(
        "SELECT id, password_hash FROM users WHERE email = ?",
    )
    .bind(&email)
    .fetch_optional(&**pool)
    .await?;

    let credential = credential.ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&login_data.password, &credential.password_hash)? {
        return Err(AppError::InvalidCredentials);
    }

    let user = fetch_user(&pool, credential.id)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let token = generate_token(user.id)?;

    Ok(HttpResponse::Ok().json(AuthResponse { user, token }))
}

/// Current user
///
/// Returns the user record for the identity proven by the bearer token. The
/// record may have been removed since the token was issued, in which case
/// the token no longer proves anything.
#[get("/me")]
pub async fn me(
    pool: web::Data<SqlitePool>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let user = fetch_user(&pool, user_id.0)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User no longer exists".into()))?;

    Ok(HttpResponse::Ok().json(user))
}

/// Update profile
///
/// Applies the provided fields (name, avatar) to the authenticated user.
/// Email and password cannot be changed here.
#[put("/profile")]
pub async fn update_profile(
    pool: web::Data<SqlitePool>,
    user_id: AuthenticatedUserId,
    update_data: web::Json<UpdateProfileRequest>,
) -> Result<impl Responder, AppError> {
    update_data.validate()?;

    let mut user = fetch_user(&pool, user_id.0)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User no longer exists".into()))?;

    let update = update_data.into_inner();
    if let Some(name) = update.name {
        user.name = name;
    }
    if let Some(avatar) = update.avatar {
        user.avatar = Some(avatar);
    }

    sqlx::query("UPDATE users SET name = ?, avatar = ? WHERE id = ?")
        .bind(&user.name)
        .bind(&user.avatar)
        .bind(user.id)
        .execute(&**pool)
        .await?;

    Ok(HttpResponse::Ok().json(user))
}
