/// Opaque user identifier, as issued by the accounts service.
pub type UserId = String;

/// Opaque trip identifier, as issued by the trips service.
pub type TripId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
