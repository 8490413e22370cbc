use std::time::{SystemTime, UNIX_EPOCH};

use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::Error};

use crate::{config::Config, model::role::UserRole, models::SessionClaims};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "user";

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize
}

/// Signs a session descriptor into the cookie value.
pub fn issue_token(
    id: u64,
    email: &str,
    name: &str,
    role: UserRole,
    secret: &str,
    ttl: usize,
) -> Result<String, Error> {
    let claims = SessionClaims {
        id,
        email: email.to_owned(),
        name: name.to_owned(),
        role,
        exp: now() + ttl,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Parses and verifies a cookie value back into the session descriptor.
/// Expired or tampered values fail here.
pub fn verify_token(token: &str, secret: &str) -> Result<SessionClaims, Error> {
    decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

pub fn session_cookie(token: String, config: &Config) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .max_age(CookieDuration::seconds(config.session_ttl as i64))
        .finish()
}

/// A zero-max-age replacement cookie; sending it removes the session.
pub fn removal_cookie(config: &Config) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .max_age(CookieDuration::ZERO)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn token_round_trips_descriptor() {
        let token = issue_token(
            7,
            "marie.dupont@rh.com",
            "Marie Dupont",
            UserRole::Employee,
            SECRET,
            3600,
        )
        .unwrap();

        let claims = verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.id, 7);
        assert_eq!(claims.email, "marie.dupont@rh.com");
        assert_eq!(claims.name, "Marie Dupont");
        assert_eq!(claims.role, UserRole::Employee);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let token = issue_token(1, "admin@rh.com", "Admin", UserRole::Admin, SECRET, 3600).unwrap();

        let mut forged = token.clone();
        forged.pop();
        forged.push(if token.ends_with('A') { 'B' } else { 'A' });
        assert!(verify_token(&forged, SECRET).is_err());

        assert!(verify_token(&token, "other-secret").is_err());
        assert!(verify_token("not-a-token", SECRET).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let claims = SessionClaims {
            id: 1,
            email: "admin@rh.com".into(),
            name: "Admin".into(),
            role: UserRole::Admin,
            // well past the default decode leeway
            exp: now() - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(verify_token(&token, SECRET).is_err());
    }
}
