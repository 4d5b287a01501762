/// Provider profile as consumed by the availability engine. The profile
/// itself is owned by an external collaborator; this service only reads
/// `booking_limit_days` (the horizon) and the display name.
#[derive(Debug, Clone)]
pub struct Provider {
    pub id: String,
    pub display_name: String,
    pub booking_limit_days: i64,
}
