use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

/// Discriminant carried by the session cookie's `type` field. Admins and
/// employees live in different tables; this tag is the only thing that
/// tells the two apart once a session is issued.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, ToSchema, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UserRole {
    Admin,
    Employee,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn wire_form_is_lowercase() {
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"admin\"");
        assert_eq!(
            serde_json::to_string(&UserRole::Employee).unwrap(),
            "\"employee\""
        );
        assert_eq!(UserRole::from_str("employee").unwrap(), UserRole::Employee);
    }
}
