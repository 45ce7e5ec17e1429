use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{error::AppError, events::repo::{Event, NewEvent}};

/// Body of `POST /event` and `PUT /event/:id`. Unknown fields such as `userId`
/// are ignored; the owner always comes from the token.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    pub name: String,
    pub description: String,
    pub location: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date_time: OffsetDateTime,
}

impl TryFrom<EventRequest> for NewEvent {
    type Error = AppError;

    fn try_from(req: EventRequest) -> Result<Self, Self::Error> {
        let name = required("name", req.name)?;
        let description = required("description", req.description)?;
        let location = required("location", req.location)?;
        Ok(NewEvent {
            name,
            description,
            location,
            date_time: req.date_time,
        })
    }
}

fn required(field: &str, value: String) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("Invalid Data - {field} is required")));
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub message: &'static str,
    pub event: Event,
}
