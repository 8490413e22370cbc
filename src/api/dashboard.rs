use crate::{
    api::{employee::fetch_employee, leave_request::LeaveResponse},
    auth::auth::SessionUser,
    error::AppError,
    model::{
        employee::Employee,
        leave_request::{LeaveRequest, LeaveStatus},
    },
};
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct PositionCount {
    #[schema(example = "Comptable")]
    pub position: String,
    #[schema(example = 3)]
    pub count: i64,
}

#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct RecentEmployee {
    #[schema(example = "Marie Dupont")]
    pub full_name: String,
    #[schema(example = "Comptable")]
    pub position: String,
    #[schema(example = "2023-09-01", value_type = String, format = "date")]
    pub hire_date: NaiveDate,
}

#[derive(Serialize, ToSchema)]
pub struct DashboardStats {
    #[schema(example = 12)]
    pub total_employees: i64,
    pub positions: Vec<PositionCount>,
    pub recent_employees: Vec<RecentEmployee>,
    #[schema(example = 2)]
    pub pending_leaves: i64,
    #[schema(example = 4)]
    pub approved_this_month: i64,
}

#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct LeaveStats {
    #[schema(example = 5)]
    pub total_requests: i64,
    #[schema(example = 3)]
    pub approved_requests: i64,
    #[schema(example = 1)]
    pub pending_requests: i64,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeDashboard {
    pub employee: Employee,
    pub leave_requests: Vec<LeaveResponse>,
    pub stats: LeaveStats,
}

/* =========================
Admin overview
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    responses(
        (status = 200, description = "Headcount and leave figures", body = DashboardStats),
        (status = 303, description = "Not logged in or not an administrator")
    ),
    tag = "Dashboard"
)]
pub async fn admin_dashboard(
    auth: SessionUser,
    pool: web::Data<MySqlPool>,
) -> Result<impl Responder, AppError> {
    auth.require_admin()?;

    let pool = pool.get_ref();

    let total_employees = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees")
        .fetch_one(pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to count employees");
            AppError::Storage
        })?;

    let positions = sqlx::query_as::<_, PositionCount>(
        r#"
        SELECT position, COUNT(*) AS count
        FROM employees
        GROUP BY position
        ORDER BY count DESC
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to count positions");
        AppError::Storage
    })?;

    let recent_employees = sqlx::query_as::<_, RecentEmployee>(
        r#"
        SELECT full_name, position, hire_date
        FROM employees
        ORDER BY created_at DESC
        LIMIT 5
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch recent employees");
        AppError::Storage
    })?;

    let pending_leaves =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM leave_requests WHERE status = ?")
            .bind(LeaveStatus::EnAttente)
            .fetch_one(pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to count pending leaves");
                AppError::Storage
            })?;

    let approved_this_month = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM leave_requests
        WHERE status = ?
        AND MONTH(created_at) = MONTH(CURRENT_DATE())
        AND YEAR(created_at) = YEAR(CURRENT_DATE())
        "#,
    )
    .bind(LeaveStatus::Approuve)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to count approved leaves");
        AppError::Storage
    })?;

    Ok(HttpResponse::Ok().json(DashboardStats {
        total_employees,
        positions,
        recent_employees,
        pending_leaves,
        approved_this_month,
    }))
}

/* =========================
Employee overview
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/me/dashboard",
    responses(
        (status = 200, description = "Own profile, recent requests, and totals", body = EmployeeDashboard),
        (status = 404, description = "Profile not found"),
        (status = 303, description = "Not logged in")
    ),
    tag = "Dashboard"
)]
pub async fn employee_dashboard(
    auth: SessionUser,
    pool: web::Data<MySqlPool>,
) -> Result<impl Responder, AppError> {
    let employee_id = auth.employee_id()?;

    let pool = pool.get_ref();

    let Some(employee) = fetch_employee(pool, employee_id).await? else {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Profile not found"
        })));
    };

    let rows = sqlx::query_as::<_, LeaveRequest>(
        r#"
        SELECT id, employee_id, start_date, end_date, leave_type, reason, status,
               admin_comment, created_at, updated_at
        FROM leave_requests
        WHERE employee_id = ?
        ORDER BY created_at DESC
        LIMIT 10
        "#,
    )
    .bind(employee_id)
    .fetch_all(pool)
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Failed to fetch leave requests");
        AppError::Storage
    })?;

    let stats = sqlx::query_as::<_, LeaveStats>(
        r#"
        SELECT
            COUNT(*) AS total_requests,
            CAST(COALESCE(SUM(CASE WHEN status = ? THEN 1 ELSE 0 END), 0) AS SIGNED) AS approved_requests,
            CAST(COALESCE(SUM(CASE WHEN status = ? THEN 1 ELSE 0 END), 0) AS SIGNED) AS pending_requests
        FROM leave_requests
        WHERE employee_id = ?
        "#,
    )
    .bind(LeaveStatus::Approuve)
    .bind(LeaveStatus::EnAttente)
    .bind(employee_id)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Failed to compute leave stats");
        AppError::Storage
    })?;

    Ok(HttpResponse::Ok().json(EmployeeDashboard {
        employee,
        leave_requests: rows.into_iter().map(LeaveResponse::from).collect(),
        stats,
    }))
}
