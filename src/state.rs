use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::{
    auth::{
        jwt::TokenService,
        password::CredentialHasher,
        repo::{PgUserStore, UserStore},
    },
    config::AppConfig,
    events::repo::{EventStore, PgEventStore},
};

#[derive(Clone)]
pub struct AppState {
    pub tokens: TokenService,
    pub hasher: CredentialHasher,
    pub users: Arc<dyn UserStore>,
    pub events: Arc<dyn EventStore>,
}

impl AppState {
    /// Wires the Postgres-backed stores around an already connected pool.
    pub fn init(config: AppConfig, db: PgPool) -> anyhow::Result<Self> {
        let tokens = TokenService::from_config(&config.jwt)?;
        let hasher = CredentialHasher::new(config.hash)?;

        Ok(Self::from_parts(
            tokens,
            hasher,
            Arc::new(PgUserStore::new(db.clone())),
            Arc::new(PgEventStore::new(db)),
        ))
    }

    pub fn from_parts(
        tokens: TokenService,
        hasher: CredentialHasher,
        users: Arc<dyn UserStore>,
        events: Arc<dyn EventStore>,
    ) -> Self {
        Self {
            tokens,
            hasher,
            users,
            events,
        }
    }

    /// In-memory stores, a fixed secret and the cheapest hashing parameters.
    #[cfg(test)]
    pub fn fake() -> Self {
        Self::fake_with_store().0
    }

    /// Like [`AppState::fake`], also handing back the store so tests can look inside it.
    #[cfg(test)]
    pub fn fake_with_store() -> (Self, Arc<crate::store::memory::MemoryStore>) {
        use crate::config::JwtConfig;
        use crate::store::memory::MemoryStore;

        let jwt = JwtConfig {
            secret: "test-secret".into(),
            ttl_minutes: 120,
        };
        let tokens = TokenService::from_config(&jwt).expect("test secret is set");
        let store = Arc::new(MemoryStore::default());

        let state = Self::from_parts(
            tokens,
            CredentialHasher::insecure_fast(),
            store.clone(),
            store.clone(),
        );
        (state, store)
    }
}

impl FromRef<AppState> for TokenService {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}
