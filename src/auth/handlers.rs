use crate::{
    auth::{
        password::verify_password,
        session::{issue_token, removal_cookie, session_cookie},
    },
    config::Config,
    error::AppError,
    model::{admin::Admin, role::UserRole},
    models::LoginForm,
};
use actix_web::{HttpResponse, Responder, http::header, web};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{debug, info, instrument};

/// Employee credential row; only what login needs.
#[derive(sqlx::FromRow)]
struct EmployeeLoginRow {
    id: u64,
    email: String,
    full_name: String,
    password: Option<String>,
}

/// Administrator lookup + hash check. Absent row and hash mismatch are
/// indistinguishable to the caller.
pub async fn authenticate(pool: &MySqlPool, email: &str, password: &str) -> Result<Admin, AppError> {
    let admin = sqlx::query_as::<_, Admin>(
        r#"
        SELECT id, email, password, name
        FROM admins
        WHERE email = ?
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Database error while fetching admin");
        AppError::Storage
    })?
    .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(password, &admin.password) {
        return Err(AppError::InvalidCredentials);
    }

    Ok(admin)
}

/// Employee lookup, restricted to active accounts. A NULL password hash
/// means the employee has no login account at all; the failure reads the
/// same as a wrong password or an unknown email.
pub async fn authenticate_employee(
    pool: &MySqlPool,
    email: &str,
    password: &str,
) -> Result<(u64, String, String), AppError> {
    let row = sqlx::query_as::<_, EmployeeLoginRow>(
        r#"
        SELECT id, email, full_name, password
        FROM employees
        WHERE email = ? AND is_active = TRUE
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Database error while fetching employee");
        AppError::Storage
    })?
    .ok_or(AppError::InvalidCredentials)?;

    let hashed = row.password.ok_or(AppError::InvalidCredentials)?;
    if !verify_password(password, &hashed) {
        return Err(AppError::InvalidCredentials);
    }

    // Record the login; not worth failing the whole login over.
    if let Err(e) = sqlx::query("UPDATE employees SET last_login = CURRENT_TIMESTAMP WHERE id = ?")
        .bind(row.id)
        .execute(pool)
        .await
    {
        tracing::error!(error = %e, employee_id = row.id, "Failed to update last_login");
    }

    Ok((row.id, row.email, row.full_name))
}

/// Administrator login; issues the session cookie on success.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginForm,
    responses(
        (status = 200, description = "Logged in; session cookie set", body = Object, example = json!({
            "id": 1, "email": "admin@rh.com", "name": "Administrateur RH", "type": "admin"
        })),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_login", skip(pool, config, form), fields(email = %form.email))]
pub async fn login(
    form: web::Json<LoginForm>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<impl Responder, AppError> {
    info!("Admin login request received");

    if form.email.trim().is_empty() || form.password.is_empty() {
        return Err(AppError::validation("email and password are required"));
    }

    let admin = authenticate(pool.get_ref(), form.email.trim(), &form.password).await?;

    debug!(admin_id = admin.id, "Password verified, issuing session");

    let token = issue_token(
        admin.id,
        &admin.email,
        &admin.name,
        UserRole::Admin,
        &config.session_secret,
        config.session_ttl,
    )
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to sign session token");
        AppError::Storage
    })?;

    info!("Admin login successful");

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(token, config.get_ref()))
        .json(json!({
            "id": admin.id,
            "email": admin.email,
            "name": admin.name,
            "type": UserRole::Admin,
        })))
}

/// Employee login; issues the session cookie on success and records
/// last_login.
#[utoipa::path(
    post,
    path = "/auth/employee-login",
    request_body = LoginForm,
    responses(
        (status = 200, description = "Logged in; session cookie set", body = Object, example = json!({
            "id": 7, "email": "marie.dupont@rh.com", "name": "Marie Dupont", "type": "employee"
        })),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid credentials, unknown account, or deactivated account")
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_employee_login", skip(pool, config, form), fields(email = %form.email))]
pub async fn employee_login(
    form: web::Json<LoginForm>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<impl Responder, AppError> {
    info!("Employee login request received");

    if form.email.trim().is_empty() || form.password.is_empty() {
        return Err(AppError::validation("email and password are required"));
    }

    let (id, email, full_name) =
        authenticate_employee(pool.get_ref(), form.email.trim(), &form.password).await?;

    let token = issue_token(
        id,
        &email,
        &full_name,
        UserRole::Employee,
        &config.session_secret,
        config.session_ttl,
    )
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to sign session token");
        AppError::Storage
    })?;

    info!("Employee login successful");

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(token, config.get_ref()))
        .json(json!({
            "id": id,
            "email": email,
            "name": full_name,
            "type": UserRole::Employee,
        })))
}

/// Clears the session cookie and sends the caller back to the login page.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 303, description = "Session cleared; redirected to the login page")
    ),
    tag = "Auth"
)]
pub async fn logout(config: web::Data<Config>) -> impl Responder {
    HttpResponse::SeeOther()
        .cookie(removal_cookie(config.get_ref()))
        .insert_header((header::LOCATION, "/login"))
        .finish()
}
