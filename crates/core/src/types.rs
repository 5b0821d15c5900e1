/// All primary keys are UUIDs generated by the application.
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Stable identifier issued by the external identity provider.
///
/// An empty string means "no identity" (unauthenticated or unresolved).
pub type UserId = String;
