//! In-memory `UserStore` + `EventStore` used by router tests.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use super::StoreError;
use crate::{
    auth::repo::{User, UserStore},
    events::repo::{Event, EventStore, NewEvent},
};

#[derive(Default)]
struct Tables {
    next_user_id: i64,
    next_event_id: i64,
    users: BTreeMap<i64, User>,
    events: BTreeMap<i64, Event>,
    registrations: BTreeSet<(i64, i64)>, // (event_id, user_id)
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// User ids registered for the event.
    pub async fn registrations(&self, event_id: i64) -> Vec<i64> {
        let t = self.tables.lock().await;
        t.registrations
            .range((event_id, i64::MIN)..=(event_id, i64::MAX))
            .map(|(_, user_id)| *user_id)
            .collect()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        let mut t = self.tables.lock().await;
        if t.users.values().any(|u| u.email == email) {
            return Err(StoreError::Conflict("Email already registered".into()));
        }
        t.next_user_id += 1;
        let user = User {
            id: t.next_user_id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        t.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let t = self.tables.lock().await;
        Ok(t.users.values().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn create(&self, event: NewEvent, owner_id: i64) -> Result<Event, StoreError> {
        let mut t = self.tables.lock().await;
        if !t.users.contains_key(&owner_id) {
            return Err(StoreError::NotFound("user"));
        }
        t.next_event_id += 1;
        let event = Event {
            id: t.next_event_id,
            name: event.name,
            description: event.description,
            location: event.location,
            date_time: event.date_time,
            owner_id,
        };
        t.events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn list(&self) -> Result<Vec<Event>, StoreError> {
        let t = self.tables.lock().await;
        let mut events: Vec<Event> = t.events.values().cloned().collect();
        events.sort_by_key(|e| (e.date_time, e.id));
        Ok(events)
    }

    async fn get(&self, id: i64) -> Result<Event, StoreError> {
        let t = self.tables.lock().await;
        t.events.get(&id).cloned().ok_or(StoreError::NotFound("event"))
    }

    async fn update(&self, id: i64, event: NewEvent) -> Result<Event, StoreError> {
        let mut t = self.tables.lock().await;
        let stored = t.events.get_mut(&id).ok_or(StoreError::NotFound("event"))?;
        stored.name = event.name;
        stored.description = event.description;
        stored.location = event.location;
        stored.date_time = event.date_time;
        Ok(stored.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut t = self.tables.lock().await;
        if t.events.remove(&id).is_none() {
            return Err(StoreError::NotFound("event"));
        }
        t.registrations.retain(|(event_id, _)| *event_id != id);
        Ok(())
    }

    async fn register(&self, event_id: i64, user_id: i64) -> Result<(), StoreError> {
        let mut t = self.tables.lock().await;
        if !t.events.contains_key(&event_id) {
            return Err(StoreError::NotFound("event"));
        }
        if !t.users.contains_key(&user_id) {
            return Err(StoreError::NotFound("user"));
        }
        if !t.registrations.insert((event_id, user_id)) {
            return Err(StoreError::Conflict("Already registered for event".into()));
        }
        Ok(())
    }

    async fn unregister(&self, event_id: i64, user_id: i64) -> Result<(), StoreError> {
        let mut t = self.tables.lock().await;
        if !t.registrations.remove(&(event_id, user_id)) {
            return Err(StoreError::NotFound("registration"));
        }
        Ok(())
    }
}
