/// One single-field tracking edit; each variant maps to one UPDATE that also
/// stamps `last_update_date`.
#[derive(Debug, Clone)]
pub enum TrackingUpdate {
    Status(String),
    CurrentLocation(String),
    CourierName(String),
    AdditionalComments(String),
}

impl TrackingUpdate {
    pub fn field_name(&self) -> &'static str {
        match self {
            TrackingUpdate::Status(_) => "status",
            TrackingUpdate::CurrentLocation(_) => "current_location",
            TrackingUpdate::CourierName(_) => "courier_name",
            TrackingUpdate::AdditionalComments(_) => "additional_comments",
        }
    }
}
