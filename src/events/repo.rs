use async_trait::async_trait;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

use crate::store::StoreError;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub location: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date_time: OffsetDateTime,
    #[sqlx(rename = "user_id")]
    #[serde(rename = "userId")]
    pub owner_id: i64,
}

/// Client-editable event fields. The owner is never part of it.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub name: String,
    pub description: String,
    pub location: String,
    pub date_time: OffsetDateTime,
}

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn create(&self, event: NewEvent, owner_id: i64) -> Result<Event, StoreError>;
    async fn list(&self) -> Result<Vec<Event>, StoreError>;
    async fn get(&self, id: i64) -> Result<Event, StoreError>;
    /// Overwrites the editable fields; `owner_id` is left as is.
    async fn update(&self, id: i64, event: NewEvent) -> Result<Event, StoreError>;
    /// Deletes the event together with its registrations.
    async fn delete(&self, id: i64) -> Result<(), StoreError>;
    async fn register(&self, event_id: i64, user_id: i64) -> Result<(), StoreError>;
    async fn unregister(&self, event_id: i64, user_id: i64) -> Result<(), StoreError>;
}

pub struct PgEventStore {
    db: PgPool,
}

impl PgEventStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn create(&self, event: NewEvent, owner_id: i64) -> Result<Event, StoreError> {
        sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (name, description, location, date_time, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, description, location, date_time, user_id
            "#,
        )
        .bind(event.name)
        .bind(event.description)
        .bind(event.location)
        .bind(event.date_time)
        .bind(owner_id)
        .fetch_one(&self.db)
        .await
        .map_err(|e| StoreError::from_sqlx(e, "user", "Event already exists"))
    }

    async fn list(&self) -> Result<Vec<Event>, StoreError> {
        let rows = sqlx::query_as::<_, Event>(
            r#"
            SELECT id, name, description, location, date_time, user_id
            FROM events
            ORDER BY date_time ASC, id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn get(&self, id: i64) -> Result<Event, StoreError> {
        sqlx::query_as::<_, Event>(
            r#"
            SELECT id, name, description, location, date_time, user_id
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(StoreError::NotFound("event"))
    }

    async fn update(&self, id: i64, event: NewEvent) -> Result<Event, StoreError> {
        sqlx::query_as::<_, Event>(
            r#"
            UPDATE events
               SET name = $1, description = $2, location = $3, date_time = $4
             WHERE id = $5
            RETURNING id, name, description, location, date_time, user_id
            "#,
        )
        .bind(event.name)
        .bind(event.description)
        .bind(event.location)
        .bind(event.date_time)
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(StoreError::NotFound("event"))
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        // registrations.event_id is ON DELETE CASCADE
        let res = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound("event"));
        }
        Ok(())
    }

    async fn register(&self, event_id: i64, user_id: i64) -> Result<(), StoreError> {
        let res = sqlx::query(
            r#"
            INSERT INTO registrations (user_id, event_id)
            SELECT $1, id FROM events WHERE id = $2
            "#,
        )
        .bind(user_id)
        .bind(event_id)
        .execute(&self.db)
        .await
        // the event row exists at this point, so a dangling key can only be the user
        .map_err(|e| StoreError::from_sqlx(e, "user", "Already registered for event"))?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound("event"));
        }
        Ok(())
    }

    async fn unregister(&self, event_id: i64, user_id: i64) -> Result<(), StoreError> {
        let res = sqlx::query("DELETE FROM registrations WHERE user_id = $1 AND event_id = $2")
            .bind(user_id)
            .bind(event_id)
            .execute(&self.db)
            .await?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound("registration"));
        }
        Ok(())
    }
}
