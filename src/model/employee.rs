use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Employee record as exposed to clients. The password hash never leaves
/// the storage boundary; auth queries select it into their own row types.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 7,
        "full_name": "Marie Dupont",
        "email": "marie.dupont@rh.com",
        "phone": "+33612345678",
        "position": "Comptable",
        "hire_date": "2023-09-01",
        "salary": 2800.0,
        "is_active": true,
        "last_login": null,
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z"
    })
)]
pub struct Employee {
    #[schema(example = 7)]
    pub id: u64,

    #[schema(example = "Marie Dupont")]
    pub full_name: String,

    #[schema(example = "marie.dupont@rh.com")]
    pub email: String,

    #[schema(example = "+33612345678", nullable = true)]
    pub phone: Option<String>,

    #[schema(example = "Comptable")]
    pub position: String,

    #[schema(example = "2023-09-01", value_type = String, format = "date")]
    pub hire_date: NaiveDate,

    #[schema(example = 2800.0, nullable = true)]
    pub salary: Option<f64>,

    pub is_active: bool,

    #[schema(value_type = Option<String>, format = "date-time")]
    pub last_login: Option<DateTime<Utc>>,

    #[schema(value_type = Option<String>, format = "date-time")]
    pub created_at: Option<DateTime<Utc>>,

    #[schema(value_type = Option<String>, format = "date-time")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Column list matching [`Employee`]; keeps SELECTs from dragging the
/// password column along.
pub const EMPLOYEE_COLUMNS: &str = "id, full_name, email, phone, position, hire_date, salary, \
     is_active, last_login, created_at, updated_at";
