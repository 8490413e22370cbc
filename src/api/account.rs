use crate::{
    auth::{
        auth::SessionUser,
        password::{hash_password, verify_password},
    },
    error::AppError,
};
use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{error, info};
use utoipa::ToSchema;

/// Password every newly provisioned account starts with.
pub const DEFAULT_EMPLOYEE_PASSWORD: &str = "employee123";

const MIN_PASSWORD_LEN: usize = 6;

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: u64,
    full_name: String,
    email: String,
    position: String,
    has_account: i64,
    is_active: bool,
    last_login: Option<DateTime<Utc>>,
}

/// One line of the admin account-overview page.
#[derive(Serialize, ToSchema)]
pub struct AccountOverview {
    #[schema(example = 7)]
    pub id: u64,
    #[schema(example = "Marie Dupont")]
    pub full_name: String,
    #[schema(example = "marie.dupont@rh.com")]
    pub email: String,
    #[schema(example = "Comptable")]
    pub position: String,
    /// Whether a password hash is stored at all. An employee without one
    /// cannot log in no matter what is_active says.
    pub has_account: bool,
    pub is_active: bool,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub last_login: Option<DateTime<Utc>>,
}

impl From<AccountRow> for AccountOverview {
    fn from(row: AccountRow) -> Self {
        AccountOverview {
            id: row.id,
            full_name: row.full_name,
            email: row.email,
            position: row.position,
            has_account: row.has_account != 0,
            is_active: row.is_active,
            last_login: row.last_login,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct ChangePasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Hashes and stores a fresh credential and flips the account active.
/// Also the reactivation path, so a reactivated account comes back with
/// the default password rather than the one it had before.
pub async fn create_account(
    pool: &MySqlPool,
    employee_id: u64,
    password: &str,
) -> Result<u64, AppError> {
    let hashed = hash_password(password).map_err(|e| {
        error!(error = %e, "Failed to hash password");
        AppError::Storage
    })?;

    let result = sqlx::query("UPDATE employees SET password = ?, is_active = TRUE WHERE id = ?")
        .bind(&hashed)
        .bind(employee_id)
        .execute(pool)
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, "Failed to provision account");
            AppError::Storage
        })?;

    Ok(result.rows_affected())
}

/// Flips is_active off. The password hash is kept; it only becomes
/// relevant again if the account is re-provisioned.
pub async fn deactivate_account(pool: &MySqlPool, employee_id: u64) -> Result<u64, AppError> {
    let result = sqlx::query("UPDATE employees SET is_active = FALSE WHERE id = ?")
        .bind(employee_id)
        .execute(pool)
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, "Failed to deactivate account");
            AppError::Storage
        })?;

    Ok(result.rows_affected())
}

fn validate_password_change(
    current: &str,
    new: &str,
    confirm: &str,
) -> Result<(), AppError> {
    if current.is_empty() || new.is_empty() || confirm.is_empty() {
        return Err(AppError::validation("all fields are required"));
    }
    if new != confirm {
        return Err(AppError::validation("new passwords do not match"));
    }
    if new.len() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(
            "password must be at least 6 characters",
        ));
    }
    Ok(())
}

/* =========================
Account overview (admin)
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/accounts",
    responses(
        (status = 200, description = "Every employee with their account state", body = [AccountOverview]),
        (status = 303, description = "Not logged in or not an administrator")
    ),
    tag = "Account"
)]
pub async fn list_accounts(
    auth: SessionUser,
    pool: web::Data<MySqlPool>,
) -> Result<impl Responder, AppError> {
    auth.require_admin()?;

    let rows = sqlx::query_as::<_, AccountRow>(
        r#"
        SELECT
            id,
            full_name,
            email,
            position,
            CAST(password IS NOT NULL AS SIGNED) AS has_account,
            is_active,
            last_login
        FROM employees
        ORDER BY full_name
        "#,
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch account overview");
        AppError::Storage
    })?;

    let accounts: Vec<AccountOverview> = rows.into_iter().map(AccountOverview::from).collect();
    Ok(HttpResponse::Ok().json(accounts))
}

/* =========================
Provision / reactivate (admin)
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/accounts/{employee_id}",
    params(("employee_id" = u64, Path, description = "Employee to provision")),
    responses(
        (status = 200, description = "Account created or reactivated with the default password", body = Object, example = json!({
            "message": "Account active"
        })),
        (status = 404, description = "Employee not found"),
        (status = 303, description = "Not logged in or not an administrator")
    ),
    tag = "Account"
)]
pub async fn provision_account(
    auth: SessionUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<impl Responder, AppError> {
    auth.require_admin()?;

    let employee_id = path.into_inner();

    let affected = create_account(pool.get_ref(), employee_id, DEFAULT_EMPLOYEE_PASSWORD).await?;
    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        })));
    }

    info!(employee_id, "Employee account provisioned");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Account active"
    })))
}

/* =========================
Deactivate (admin)
========================= */
#[utoipa::path(
    delete,
    path = "/api/v1/accounts/{employee_id}",
    params(("employee_id" = u64, Path, description = "Employee to lock out")),
    responses(
        (status = 200, description = "Account deactivated", body = Object, example = json!({
            "message": "Account deactivated"
        })),
        (status = 404, description = "Employee not found"),
        (status = 303, description = "Not logged in or not an administrator")
    ),
    tag = "Account"
)]
pub async fn remove_account(
    auth: SessionUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<impl Responder, AppError> {
    auth.require_admin()?;

    let employee_id = path.into_inner();

    let affected = deactivate_account(pool.get_ref(), employee_id).await?;
    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        })));
    }

    info!(employee_id, "Employee account deactivated");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Account deactivated"
    })))
}

/* =========================
Change own password (employee)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/me/password",
    request_body = ChangePasswordForm,
    responses(
        (status = 200, description = "Password changed", body = Object, example = json!({
            "message": "Password changed"
        })),
        (status = 400, description = "Missing field, mismatched confirmation, or too short"),
        (status = 401, description = "Current password incorrect"),
        (status = 303, description = "Not logged in")
    ),
    tag = "Account"
)]
pub async fn change_password(
    auth: SessionUser,
    pool: web::Data<MySqlPool>,
    form: web::Json<ChangePasswordForm>,
) -> Result<impl Responder, AppError> {
    let employee_id = auth.employee_id()?;

    validate_password_change(
        &form.current_password,
        &form.new_password,
        &form.confirm_password,
    )?;

    let stored: Option<Option<String>> =
        sqlx::query_scalar("SELECT password FROM employees WHERE id = ?")
            .bind(employee_id)
            .fetch_optional(pool.get_ref())
            .await
            .map_err(|e| {
                error!(error = %e, employee_id, "Failed to fetch stored password");
                AppError::Storage
            })?;

    let hashed = stored.flatten().ok_or(AppError::InvalidCredentials)?;
    if !verify_password(&form.current_password, &hashed) {
        return Err(AppError::InvalidCredentials);
    }

    let new_hash = hash_password(&form.new_password).map_err(|e| {
        error!(error = %e, "Failed to hash new password");
        AppError::Storage
    })?;

    sqlx::query("UPDATE employees SET password = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?")
        .bind(&new_hash)
        .bind(employee_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, "Failed to store new password");
            AppError::Storage
        })?;

    info!(employee_id, "Password changed");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Password changed"
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fields_are_rejected() {
        for (cur, new, conf) in [
            ("", "secret1", "secret1"),
            ("old", "", "secret1"),
            ("old", "secret1", ""),
        ] {
            let err = validate_password_change(cur, new, conf).unwrap_err();
            assert_eq!(err, AppError::Validation("all fields are required".into()));
        }
    }

    #[test]
    fn mismatched_confirmation_is_rejected_before_touching_storage() {
        let err = validate_password_change("old", "secret1", "secret2").unwrap_err();
        assert_eq!(
            err,
            AppError::Validation("new passwords do not match".into())
        );
    }

    #[test]
    fn short_passwords_are_rejected() {
        let err = validate_password_change("old", "abc12", "abc12").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(validate_password_change("old", "abc123", "abc123").is_ok());
    }
}
