use crate::{auth::session, config::Config, error::AppError, model::role::UserRole};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web::Data};
use futures::future::{Ready, ready};

/// Authenticated caller, recovered from the session cookie on every
/// request. Failing to recover one redirects to the login page.
pub struct SessionUser {
    pub id: u64,
    pub email: String,
    pub name: String,
    pub role: UserRole,
}

impl FromRequest for SessionUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let config = match req.app_data::<Data<Config>>() {
            Some(c) => c,
            None => {
                tracing::error!("app config missing from request state");
                return ready(Err(AppError::Storage));
            }
        };

        let cookie = match req.cookie(session::SESSION_COOKIE) {
            Some(c) => c,
            None => return ready(Err(AppError::Unauthenticated)),
        };

        let claims = match session::verify_token(cookie.value(), &config.session_secret) {
            Ok(c) => c,
            Err(_) => return ready(Err(AppError::Unauthenticated)),
        };

        ready(Ok(SessionUser {
            id: claims.id,
            email: claims.email,
            name: claims.name,
            role: claims.role,
        }))
    }
}

impl SessionUser {
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role == UserRole::Admin {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    /// The caller's employee id; administrators have no employee profile.
    pub fn employee_id(&self) -> Result<u64, AppError> {
        if self.role == UserRole::Employee {
            Ok(self.id)
        } else {
            Err(AppError::Forbidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: UserRole) -> SessionUser {
        SessionUser {
            id: 3,
            email: "x@rh.com".into(),
            name: "X".into(),
            role,
        }
    }

    #[test]
    fn admin_gate() {
        assert!(user(UserRole::Admin).require_admin().is_ok());
        assert_eq!(
            user(UserRole::Employee).require_admin(),
            Err(AppError::Forbidden)
        );
    }

    #[test]
    fn employee_id_only_for_employees() {
        assert_eq!(user(UserRole::Employee).employee_id(), Ok(3));
        assert_eq!(user(UserRole::Admin).employee_id(), Err(AppError::Forbidden));
    }
}
