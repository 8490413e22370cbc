use sqlx::FromRow;

/// Administrator credential row. Created out-of-band; never serialized to
/// clients because it carries the password hash.
#[derive(Debug, FromRow)]
pub struct Admin {
    pub id: u64,
    pub email: String,
    pub password: String,
    pub name: String,
}
