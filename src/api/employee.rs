use crate::{
    auth::auth::SessionUser,
    error::AppError,
    model::employee::{EMPLOYEE_COLUMNS, Employee},
};
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "Marie Dupont")]
    pub full_name: String,
    #[schema(example = "marie.dupont@rh.com", format = "email")]
    pub email: String,
    #[schema(example = "+33612345678", nullable = true)]
    pub phone: Option<String>,
    #[schema(example = "Comptable")]
    pub position: String,
    #[schema(example = "2023-09-01", format = "date", value_type = String)]
    pub hire_date: NaiveDate,
    #[schema(example = 2800.0, nullable = true)]
    pub salary: Option<f64>,
}

/// Full-field update; the edit form always submits every column.
#[derive(Deserialize, ToSchema)]
pub struct UpdateEmployee {
    #[schema(example = "Marie Dupont")]
    pub full_name: String,
    #[schema(example = "marie.dupont@rh.com", format = "email")]
    pub email: String,
    #[schema(nullable = true)]
    pub phone: Option<String>,
    #[schema(example = "Comptable")]
    pub position: String,
    #[schema(example = "2023-09-01", format = "date", value_type = String)]
    pub hire_date: NaiveDate,
    #[schema(nullable = true)]
    pub salary: Option<f64>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct EmployeeQuery {
    /// Matches against name, email, and position
    pub search: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdatePhone {
    #[schema(example = "+33612345678", nullable = true)]
    pub phone: Option<String>,
}

/* =========================
Create employee (admin)
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created", body = Object, example = json!({
            "message": "Employee created"
        })),
        (status = 409, description = "Email already in use"),
        (status = 303, description = "Not logged in or not an administrator"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    auth: SessionUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateEmployee>,
) -> Result<impl Responder, AppError> {
    auth.require_admin()?;

    let result = sqlx::query(
        r#"
        INSERT INTO employees
        (full_name, email, phone, position, hire_date, salary)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&payload.full_name)
    .bind(&payload.email)
    .bind(&payload.phone)
    .bind(&payload.position)
    .bind(payload.hire_date)
    .bind(payload.salary)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Created().json(json!({
            "message": "Employee created"
        }))),
        Err(e) => {
            // Unique email constraint
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::Conflict().json(json!({
                        "message": "Email already in use"
                    })));
                }
            }

            error!(error = %e, "Failed to create employee");
            Err(AppError::Storage)
        }
    }
}

/* =========================
List / search employees (admin)
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/employees",
    params(EmployeeQuery),
    responses(
        (status = 200, description = "Employees, newest first", body = [Employee]),
        (status = 303, description = "Not logged in or not an administrator")
    ),
    tag = "Employee"
)]
pub async fn list_employees(
    auth: SessionUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<EmployeeQuery>,
) -> Result<impl Responder, AppError> {
    auth.require_admin()?;

    let mut sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees");
    if query.search.is_some() {
        sql.push_str(" WHERE full_name LIKE ? OR email LIKE ? OR position LIKE ?");
    }
    sql.push_str(" ORDER BY created_at DESC");

    let mut q = sqlx::query_as::<_, Employee>(&sql);
    if let Some(search) = &query.search {
        let like = format!("%{search}%");
        q = q.bind(like.clone()).bind(like.clone()).bind(like);
    }

    let employees = q.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to fetch employees");
        AppError::Storage
    })?;

    Ok(HttpResponse::Ok().json(employees))
}

/* =========================
Fetch one employee (admin)
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/employees/{employee_id}",
    params(("employee_id" = u64, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found"),
        (status = 303, description = "Not logged in or not an administrator")
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    auth: SessionUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<impl Responder, AppError> {
    auth.require_admin()?;

    let employee_id = path.into_inner();

    let employee = fetch_employee(pool.get_ref(), employee_id).await?;

    match employee {
        Some(emp) => Ok(HttpResponse::Ok().json(emp)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        }))),
    }
}

/* =========================
Update employee (admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/employees/{employee_id}",
    params(("employee_id" = u64, Path, description = "Employee ID")),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Employee updated", body = Object, example = json!({
            "message": "Employee updated"
        })),
        (status = 404, description = "Employee not found"),
        (status = 303, description = "Not logged in or not an administrator")
    ),
    tag = "Employee"
)]
pub async fn update_employee(
    auth: SessionUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdateEmployee>,
) -> Result<impl Responder, AppError> {
    auth.require_admin()?;

    let employee_id = path.into_inner();

    let result = sqlx::query(
        r#"
        UPDATE employees
        SET full_name = ?, email = ?, phone = ?, position = ?, hire_date = ?,
            salary = ?, updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(&payload.full_name)
    .bind(&payload.email)
    .bind(&payload.phone)
    .bind(&payload.position)
    .bind(payload.hire_date)
    .bind(payload.salary)
    .bind(employee_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Failed to update employee");
        AppError::Storage
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee updated"
    })))
}

/* =========================
Delete employee (admin)
========================= */
/// Leave requests referencing the employee go with the row via the
/// foreign-key cascade.
#[utoipa::path(
    delete,
    path = "/api/v1/employees/{employee_id}",
    params(("employee_id" = u64, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee deleted", body = Object, example = json!({
            "message": "Employee deleted"
        })),
        (status = 404, description = "Employee not found"),
        (status = 303, description = "Not logged in or not an administrator")
    ),
    tag = "Employee"
)]
pub async fn delete_employee(
    auth: SessionUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<impl Responder, AppError> {
    auth.require_admin()?;

    let employee_id = path.into_inner();

    let result = sqlx::query("DELETE FROM employees WHERE id = ?")
        .bind(employee_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, "Failed to delete employee");
            AppError::Storage
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee deleted"
    })))
}

/* =========================
Own profile (employee)
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Caller's employee record", body = Employee),
        (status = 404, description = "Profile not found"),
        (status = 303, description = "Not logged in")
    ),
    tag = "Profile"
)]
pub async fn my_profile(
    auth: SessionUser,
    pool: web::Data<MySqlPool>,
) -> Result<impl Responder, AppError> {
    let employee_id = auth.employee_id()?;

    let employee = fetch_employee(pool.get_ref(), employee_id).await?;

    match employee {
        Some(emp) => Ok(HttpResponse::Ok().json(emp)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Profile not found"
        }))),
    }
}

/// The only self-service field on the profile page.
#[utoipa::path(
    put,
    path = "/api/v1/me",
    request_body = UpdatePhone,
    responses(
        (status = 200, description = "Phone updated", body = Object, example = json!({
            "message": "Profile updated"
        })),
        (status = 303, description = "Not logged in")
    ),
    tag = "Profile"
)]
pub async fn update_my_phone(
    auth: SessionUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<UpdatePhone>,
) -> Result<impl Responder, AppError> {
    let employee_id = auth.employee_id()?;

    let phone = payload.phone.as_deref().filter(|p| !p.trim().is_empty());

    sqlx::query("UPDATE employees SET phone = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?")
        .bind(phone)
        .bind(employee_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, "Failed to update phone");
            AppError::Storage
        })?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Profile updated"
    })))
}

pub(crate) async fn fetch_employee(
    pool: &MySqlPool,
    employee_id: u64,
) -> Result<Option<Employee>, AppError> {
    sqlx::query_as::<_, Employee>(&format!(
        "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = ?"
    ))
    .bind(employee_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Failed to fetch employee");
        AppError::Storage
    })
}
