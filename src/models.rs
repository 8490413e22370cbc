use crate::model::role::UserRole;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct LoginForm {
    #[schema(example = "admin@rh.com")]
    pub email: String,
    #[schema(example = "password")]
    pub password: String,
}

/// Minimal authenticated-identity record carried by the session cookie.
/// The cookie value is this struct signed as a JWT; the `type` field is
/// the role discriminant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub id: u64,
    pub email: String,
    pub name: String,
    #[serde(rename = "type")]
    pub role: UserRole,
    pub exp: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_serialize_role_under_type_key() {
        let claims = SessionClaims {
            id: 1,
            email: "admin@rh.com".into(),
            name: "Administrateur RH".into(),
            role: UserRole::Admin,
            exp: 0,
        };
        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value["type"], "admin");
        assert_eq!(value["id"], 1);
        assert_eq!(value["email"], "admin@rh.com");
        assert_eq!(value["name"], "Administrateur RH");
    }
}
