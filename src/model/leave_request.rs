use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString, IntoStaticStr};
use utoipa::ToSchema;

/// Leave categories, stored under their French wire names.
#[derive(
    Debug,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Serialize,
    Deserialize,
    sqlx::Type,
    ToSchema,
    Display,
    EnumString,
    AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeaveType {
    Annuel,
    Maladie,
    Exceptionnel,
    Maternite,
    Paternite,
}

/// Approval workflow states. A request starts in `en_attente`; an
/// administrator moves it to `approuve` or `refuse`. Re-deciding an
/// already-decided request overwrites the previous decision.
#[derive(
    Debug,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Serialize,
    Deserialize,
    sqlx::Type,
    ToSchema,
    Display,
    EnumString,
    AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LeaveStatus {
    EnAttente,
    Approuve,
    Refuse,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveRequest {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 7)]
    pub employee_id: u64,

    #[schema(example = "2024-03-01", value_type = String, format = "date")]
    pub start_date: NaiveDate,

    #[schema(example = "2024-03-05", value_type = String, format = "date")]
    pub end_date: NaiveDate,

    #[schema(example = "annuel")]
    pub leave_type: LeaveType,

    #[schema(example = "Vacances d'été", nullable = true)]
    pub reason: Option<String>,

    #[schema(example = "en_attente")]
    pub status: LeaveStatus,

    #[schema(nullable = true)]
    pub admin_comment: Option<String>,

    #[schema(value_type = Option<String>, format = "date-time")]
    pub created_at: Option<DateTime<Utc>>,

    #[schema(value_type = Option<String>, format = "date-time")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl LeaveRequest {
    /// Inclusive day count: a single-day leave lasts one day.
    pub fn duration_days(&self) -> i64 {
        duration_days(self.start_date, self.end_date)
    }
}

pub fn duration_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn duration_is_inclusive() {
        let d = |s| NaiveDate::from_str(s).unwrap();
        assert_eq!(duration_days(d("2024-01-01"), d("2024-01-01")), 1);
        assert_eq!(duration_days(d("2024-01-01"), d("2024-01-03")), 3);
    }

    #[test]
    fn leave_type_round_trips_through_stored_strings() {
        for (ty, s) in [
            (LeaveType::Annuel, "annuel"),
            (LeaveType::Maladie, "maladie"),
            (LeaveType::Exceptionnel, "exceptionnel"),
            (LeaveType::Maternite, "maternite"),
            (LeaveType::Paternite, "paternite"),
        ] {
            assert_eq!(ty.as_ref(), s);
            assert_eq!(LeaveType::from_str(s).unwrap(), ty);
            assert_eq!(serde_json::to_string(&ty).unwrap(), format!("\"{s}\""));
        }
    }

    #[test]
    fn status_round_trips_through_stored_strings() {
        for (st, s) in [
            (LeaveStatus::EnAttente, "en_attente"),
            (LeaveStatus::Approuve, "approuve"),
            (LeaveStatus::Refuse, "refuse"),
        ] {
            assert_eq!(st.as_ref(), s);
            assert_eq!(LeaveStatus::from_str(s).unwrap(), st);
        }
        assert!(LeaveStatus::from_str("annule").is_err());
    }
}
