use crate::api::account::{AccountOverview, ChangePasswordForm};
use crate::api::dashboard::{
    DashboardStats, EmployeeDashboard, LeaveStats, PositionCount, RecentEmployee,
};
use crate::api::employee::{CreateEmployee, UpdateEmployee, UpdatePhone};
use crate::api::leave_request::{
    AddLeave, Decision, DecisionForm, LeaveFilter, LeaveListResponse, LeaveResponse,
    LeaveWithEmployee, SubmitLeave,
};
use crate::model::employee::Employee;
use crate::model::leave_request::{LeaveRequest, LeaveStatus, LeaveType};
use crate::model::role::UserRole;
use crate::models::LoginForm;
use utoipa::Modify;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "RH Portal API",
        version = "1.0.0",
        description = r#"
## RH Portal

Back office for a small HR department.

### Key Features
- **Employee Management**
  - Create, update, list, and search employee records
- **Leave Management**
  - Submit requests, approve/refuse them, and review history
- **Account Provisioning**
  - Open, reactivate, or lock an employee's login account
- **Dashboards**
  - Headcount and leave figures for admins, personal history for employees

### Security
Sessions ride in a signed `user` cookie issued by the login endpoints.
Admin-only endpoints redirect other callers to the login page.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::login,
        crate::auth::handlers::employee_login,
        crate::auth::handlers::logout,

        crate::api::leave_request::submit_leave,
        crate::api::leave_request::add_leave,
        crate::api::leave_request::decide_leave,
        crate::api::leave_request::list_my_leaves,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::leave_list,

        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,
        crate::api::employee::my_profile,
        crate::api::employee::update_my_phone,

        crate::api::account::list_accounts,
        crate::api::account::provision_account,
        crate::api::account::remove_account,
        crate::api::account::change_password,

        crate::api::dashboard::admin_dashboard,
        crate::api::dashboard::employee_dashboard
    ),
    components(
        schemas(
            LoginForm,
            UserRole,
            Employee,
            CreateEmployee,
            UpdateEmployee,
            UpdatePhone,
            AccountOverview,
            ChangePasswordForm,
            LeaveRequest,
            LeaveType,
            LeaveStatus,
            SubmitLeave,
            AddLeave,
            Decision,
            DecisionForm,
            LeaveFilter,
            LeaveResponse,
            LeaveWithEmployee,
            LeaveListResponse,
            DashboardStats,
            PositionCount,
            RecentEmployee,
            LeaveStats,
            EmployeeDashboard
        )
    ),
    modifiers(&SessionCookieSecurity),
    tags(
        (name = "Auth", description = "Login, logout, and session issuance"),
        (name = "Leave", description = "Leave request workflow"),
        (name = "Employee", description = "Employee record management"),
        (name = "Account", description = "Login account provisioning"),
        (name = "Profile", description = "Employee self-service profile"),
        (name = "Dashboard", description = "Aggregate views"),
    )
)]
pub struct ApiDoc;

struct SessionCookieSecurity;

impl Modify for SessionCookieSecurity {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("user"))),
            );
        }
    }
}
