use crate::auth::auth::SessionUser;
use crate::error::AppError;
use crate::model::leave_request::{LeaveRequest, LeaveStatus, LeaveType};
use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};

const LEAVE_COLUMNS: &str = "id, employee_id, start_date, end_date, leave_type, reason, status, \
     admin_comment, created_at, updated_at";

#[derive(Deserialize, ToSchema)]
pub struct SubmitLeave {
    #[schema(example = "2024-03-01", format = "date", value_type = Option<String>)]
    pub start_date: Option<NaiveDate>,
    #[schema(example = "2024-03-05", format = "date", value_type = Option<String>)]
    pub end_date: Option<NaiveDate>,
    #[schema(example = "annuel")]
    pub leave_type: Option<LeaveType>,
    #[schema(example = "Vacances d'été", nullable = true)]
    pub reason: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct AddLeave {
    #[schema(example = 7)]
    pub employee_id: Option<u64>,
    #[schema(example = "2024-03-01", format = "date", value_type = Option<String>)]
    pub start_date: Option<NaiveDate>,
    #[schema(example = "2024-03-05", format = "date", value_type = Option<String>)]
    pub end_date: Option<NaiveDate>,
    #[schema(example = "annuel")]
    pub leave_type: Option<LeaveType>,
    #[schema(nullable = true)]
    pub reason: Option<String>,
}

/// Administrator verdict on a pending request.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approuve,
    Refuse,
}

impl Decision {
    pub fn status(self) -> LeaveStatus {
        match self {
            Decision::Approuve => LeaveStatus::Approuve,
            Decision::Refuse => LeaveStatus::Refuse,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct DecisionForm {
    #[schema(example = "approuve")]
    pub decision: Decision,
    #[schema(example = "Bonnes vacances", nullable = true)]
    pub comment: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveResponse {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 7)]
    pub employee_id: u64,
    #[schema(example = "2024-03-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2024-03-05", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "annuel")]
    pub leave_type: LeaveType,
    #[schema(nullable = true)]
    pub reason: Option<String>,
    #[schema(example = "en_attente")]
    pub status: LeaveStatus,
    #[schema(nullable = true)]
    pub admin_comment: Option<String>,
    /// Inclusive day count of the requested range.
    #[schema(example = 5)]
    pub duration_days: i64,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub created_at: Option<DateTime<Utc>>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<LeaveRequest> for LeaveResponse {
    fn from(req: LeaveRequest) -> Self {
        let duration_days = req.duration_days();
        LeaveResponse {
            id: req.id,
            employee_id: req.employee_id,
            start_date: req.start_date,
            end_date: req.end_date,
            leave_type: req.leave_type,
            reason: req.reason,
            status: req.status,
            admin_comment: req.admin_comment,
            duration_days,
            created_at: req.created_at,
            updated_at: req.updated_at,
        }
    }
}

/// Admin listing row, joined with the employee's name; the duration is
/// computed in SQL so the row serializes as-is.
#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct LeaveWithEmployee {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 7)]
    pub employee_id: u64,
    #[schema(example = "Marie Dupont")]
    pub employee_name: String,
    #[schema(example = "2024-03-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2024-03-05", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "annuel")]
    pub leave_type: LeaveType,
    #[schema(nullable = true)]
    pub reason: Option<String>,
    #[schema(example = "en_attente")]
    pub status: LeaveStatus,
    #[schema(nullable = true)]
    pub admin_comment: Option<String>,
    #[schema(example = 5)]
    pub duration_days: i64,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub created_at: Option<DateTime<Utc>>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveListResponse {
    pub data: Vec<LeaveWithEmployee>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct LeaveFilter {
    /// Filter by employee ID
    #[schema(example = 7)]
    pub employee_id: Option<u64>,
    /// Filter by leave status
    #[schema(example = "en_attente")]
    pub status: Option<String>,
    /// Pagination page number (start with 1)
    #[schema(example = 1)]
    pub page: Option<u64>,
    /// Pagination per page number
    #[schema(example = 10)]
    pub per_page: Option<u64>,
}

// Helper enum for typed SQLx binding
enum FilterValue {
    U64(u64),
    Str(&'static str),
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::validation(format!("{field} is required")))
}

/// Date-range policy: no retroactive leave, and the range must not be
/// inverted. A single-day request (start == end) is fine.
pub(crate) fn validate_date_range(
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> Result<(), AppError> {
    if start < today {
        return Err(AppError::validation("leave cannot start in the past"));
    }
    if end < start {
        return Err(AppError::validation(
            "end date must be on or after the start date",
        ));
    }
    Ok(())
}

fn validate_submission(form: SubmitLeave) -> Result<(NaiveDate, NaiveDate, LeaveType, Option<String>), AppError> {
    let start = required(form.start_date, "start date")?;
    let end = required(form.end_date, "end date")?;
    let leave_type = required(form.leave_type, "leave type")?;

    validate_date_range(start, end, Local::now().date_naive())?;

    let reason = form.reason.filter(|r| !r.trim().is_empty());
    Ok((start, end, leave_type, reason))
}

/// Inserts a pending request and returns the stored row. Overlapping
/// requests for the same employee are not rejected; nothing deduplicates
/// concurrent submissions.
async fn insert_leave(
    pool: &MySqlPool,
    employee_id: u64,
    start: NaiveDate,
    end: NaiveDate,
    leave_type: LeaveType,
    reason: Option<String>,
) -> Result<LeaveRequest, AppError> {
    let result = sqlx::query(
        r#"
        INSERT INTO leave_requests
            (employee_id, start_date, end_date, leave_type, reason, status)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(employee_id)
    .bind(start)
    .bind(end)
    .bind(leave_type)
    .bind(&reason)
    .bind(LeaveStatus::EnAttente)
    .execute(pool)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Failed to create leave request");
        AppError::Storage
    })?;

    let id = result.last_insert_id();

    sqlx::query_as::<_, LeaveRequest>(&format!(
        "SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE id = ?"
    ))
    .bind(id)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id = id, "Failed to read back leave request");
        AppError::Storage
    })
}

/* =========================
Submit leave request (employee, self)
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/me/leaves",
    request_body = SubmitLeave,
    responses(
        (status = 201, description = "Leave request created in en_attente state", body = LeaveResponse),
        (status = 400, description = "Missing field or invalid date range"),
        (status = 303, description = "Not logged in"),
    ),
    tag = "Leave"
)]
pub async fn submit_leave(
    auth: SessionUser,
    pool: web::Data<MySqlPool>,
    form: web::Json<SubmitLeave>,
) -> Result<impl Responder, AppError> {
    let employee_id = auth.employee_id()?;

    let (start, end, leave_type, reason) = validate_submission(form.into_inner())?;

    let created = insert_leave(pool.get_ref(), employee_id, start, end, leave_type, reason).await?;

    Ok(HttpResponse::Created().json(LeaveResponse::from(created)))
}

/* =========================
Create leave request on behalf of an employee (admin)
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/leaves",
    request_body = AddLeave,
    responses(
        (status = 201, description = "Leave request created in en_attente state", body = LeaveResponse),
        (status = 400, description = "Missing field or invalid date range"),
        (status = 303, description = "Not logged in or not an administrator"),
    ),
    tag = "Leave"
)]
pub async fn add_leave(
    auth: SessionUser,
    pool: web::Data<MySqlPool>,
    form: web::Json<AddLeave>,
) -> Result<impl Responder, AppError> {
    auth.require_admin()?;

    let form = form.into_inner();
    let employee_id = required(form.employee_id, "employee")?;
    let (start, end, leave_type, reason) = validate_submission(SubmitLeave {
        start_date: form.start_date,
        end_date: form.end_date,
        leave_type: form.leave_type,
        reason: form.reason,
    })?;

    let created = insert_leave(pool.get_ref(), employee_id, start, end, leave_type, reason).await?;

    Ok(HttpResponse::Created().json(LeaveResponse::from(created)))
}

/* =========================
Decide on a request (admin)
========================= */
/// Sets the status and optional comment. Deliberately no check that the
/// request is still pending: an administrator may re-decide, and the new
/// decision overwrites the old one.
#[utoipa::path(
    put,
    path = "/api/v1/leaves/{leave_id}/decision",
    params(("leave_id" = u64, Path, description = "ID of the leave request to decide")),
    request_body = DecisionForm,
    responses(
        (status = 200, description = "Decision recorded", body = Object, example = json!({
            "message": "Decision recorded"
        })),
        (status = 404, description = "Leave request not found"),
        (status = 303, description = "Not logged in or not an administrator"),
    ),
    tag = "Leave"
)]
pub async fn decide_leave(
    auth: SessionUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    form: web::Json<DecisionForm>,
) -> Result<impl Responder, AppError> {
    auth.require_admin()?;

    let leave_id = path.into_inner();
    let form = form.into_inner();

    let result = sqlx::query(
        r#"
        UPDATE leave_requests
        SET status = ?, admin_comment = ?, updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(form.decision.status())
    .bind(&form.comment)
    .bind(leave_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id, "Failed to record leave decision");
        AppError::Storage
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Leave request not found"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Decision recorded"
    })))
}

/* =========================
Own requests (employee)
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/me/leaves",
    responses(
        (status = 200, description = "Caller's leave requests, newest first", body = [LeaveResponse]),
        (status = 303, description = "Not logged in"),
    ),
    tag = "Leave"
)]
pub async fn list_my_leaves(
    auth: SessionUser,
    pool: web::Data<MySqlPool>,
) -> Result<impl Responder, AppError> {
    let employee_id = auth.employee_id()?;

    let rows = sqlx::query_as::<_, LeaveRequest>(&format!(
        r#"
        SELECT {LEAVE_COLUMNS}
        FROM leave_requests
        WHERE employee_id = ?
        ORDER BY created_at DESC
        "#
    ))
    .bind(employee_id)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Failed to fetch leave requests");
        AppError::Storage
    })?;

    let leaves: Vec<LeaveResponse> = rows.into_iter().map(LeaveResponse::from).collect();
    Ok(HttpResponse::Ok().json(leaves))
}

/* =========================
Fetch one request (admin)
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/leaves/{leave_id}",
    params(("leave_id" = u64, Path, description = "ID of the leave request to fetch")),
    responses(
        (status = 200, description = "Leave request found", body = LeaveResponse),
        (status = 404, description = "Leave request not found"),
        (status = 303, description = "Not logged in or not an administrator"),
    ),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: SessionUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<impl Responder, AppError> {
    auth.require_admin()?;

    let leave_id = path.into_inner();

    let leave = sqlx::query_as::<_, LeaveRequest>(&format!(
        "SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE id = ?"
    ))
    .bind(leave_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id, "Failed to fetch leave request");
        AppError::Storage
    })?;

    match leave {
        Some(row) => Ok(HttpResponse::Ok().json(LeaveResponse::from(row))),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Leave request not found"
        }))),
    }
}

/* =========================
List all requests (admin)
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/leaves",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Paginated leave list joined with employee names", body = LeaveListResponse),
        (status = 400, description = "Unknown status filter"),
        (status = 303, description = "Not logged in or not an administrator"),
    ),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: SessionUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<LeaveFilter>,
) -> Result<impl Responder, AppError> {
    auth.require_admin()?;

    // -------------------------
    // Pagination
    // -------------------------
    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    // -------------------------
    // WHERE clause
    // -------------------------
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(emp_id) = query.employee_id {
        where_sql.push_str(" AND lr.employee_id = ?");
        args.push(FilterValue::U64(emp_id));
    }

    if let Some(status) = query.status.as_deref() {
        let status = LeaveStatus::from_str(status)
            .map_err(|_| AppError::validation("unknown status filter"))?;
        where_sql.push_str(" AND lr.status = ?");
        args.push(FilterValue::Str(status.into()));
    }

    // -------------------------
    // COUNT query
    // -------------------------
    let count_sql = format!("SELECT COUNT(*) FROM leave_requests lr{where_sql}");

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(*s),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count leave requests");
        AppError::Storage
    })?;

    // -------------------------
    // DATA query
    // -------------------------
    let data_sql = format!(
        r#"
        SELECT lr.id, lr.employee_id, e.full_name AS employee_name,
               lr.start_date, lr.end_date, lr.leave_type, lr.reason,
               lr.status, lr.admin_comment,
               CAST(DATEDIFF(lr.end_date, lr.start_date) + 1 AS SIGNED) AS duration_days,
               lr.created_at, lr.updated_at
        FROM leave_requests lr
        JOIN employees e ON lr.employee_id = e.id
        {where_sql}
        ORDER BY lr.created_at DESC
        LIMIT ? OFFSET ?
        "#
    );

    let mut data_q = sqlx::query_as::<_, LeaveWithEmployee>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
        };
    }

    let leaves = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch leave list");
            AppError::Storage
        })?;

    Ok(HttpResponse::Ok().json(LeaveListResponse {
        data: leaves,
        page: page as u32,
        per_page: per_page as u32,
        total,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::from_str(s).unwrap()
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = validate_date_range(date("2024-03-05"), date("2024-03-01"), date("2024-01-01"))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn retroactive_start_is_rejected() {
        let err = validate_date_range(date("2024-02-28"), date("2024-03-05"), date("2024-03-01"))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn single_day_leave_is_accepted() {
        assert!(
            validate_date_range(date("2024-03-01"), date("2024-03-01"), date("2024-03-01")).is_ok()
        );
    }

    #[test]
    fn start_today_is_accepted() {
        assert!(
            validate_date_range(date("2024-03-01"), date("2024-03-05"), date("2024-03-01")).is_ok()
        );
    }

    #[test]
    fn overlapping_submissions_are_not_deduplicated() {
        // Validation is stateless: the same range passes twice, so two
        // concurrent submissions both end up as pending rows.
        let today = date("2024-03-01");
        for _ in 0..2 {
            assert!(validate_date_range(date("2024-03-01"), date("2024-03-05"), today).is_ok());
        }
    }

    #[test]
    fn missing_fields_are_rejected() {
        let form = SubmitLeave {
            start_date: Some(date("2099-03-01")),
            end_date: Some(date("2099-03-05")),
            leave_type: None,
            reason: None,
        };
        let err = validate_submission(form).unwrap_err();
        assert_eq!(err, AppError::Validation("leave type is required".into()));
    }

    #[test]
    fn blank_reason_is_stored_as_null() {
        let form = SubmitLeave {
            start_date: Some(date("2099-03-01")),
            end_date: Some(date("2099-03-05")),
            leave_type: Some(LeaveType::Annuel),
            reason: Some("   ".into()),
        };
        let (_, _, _, reason) = validate_submission(form).unwrap();
        assert_eq!(reason, None);
    }

    #[test]
    fn decision_maps_to_terminal_status() {
        assert_eq!(Decision::Approuve.status(), LeaveStatus::Approuve);
        assert_eq!(Decision::Refuse.status(), LeaveStatus::Refuse);
    }

    #[test]
    fn response_carries_inclusive_duration() {
        let row = LeaveRequest {
            id: 1,
            employee_id: 7,
            start_date: date("2024-03-01"),
            end_date: date("2024-03-05"),
            leave_type: LeaveType::Annuel,
            reason: None,
            status: LeaveStatus::EnAttente,
            admin_comment: None,
            created_at: None,
            updated_at: None,
        };
        assert_eq!(LeaveResponse::from(row).duration_days, 5);
    }
}
