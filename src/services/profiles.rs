//! User profile storage keyed by identity-provider uid

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::models::{Role, User};

/// Registration payload sent by the client after sign-in
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterProfile {
    pub display_name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
    pub uid: Option<String>,
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Insert or refresh the profile for `uid`. Role and id survive a refresh.
    async fn register(&self, uid: &str, email: &str, profile: &RegisterProfile) -> User;

    async fn get(&self, uid: &str) -> Option<User>;

    async fn len(&self) -> usize;
}

#[derive(Default)]
struct Inner {
    next_id: u64,
    by_uid: HashMap<String, User>,
}

/// Process-local profile store
#[derive(Default)]
pub struct MemoryProfileStore {
    inner: RwLock<Inner>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn register(&self, uid: &str, email: &str, profile: &RegisterProfile) -> User {
        let mut inner = self.inner.write().await;

        if let Some(existing) = inner.by_uid.get_mut(uid) {
            existing.email = email.to_string();
            existing.display_name = profile.display_name.clone();
            existing.photo_url = profile.photo_url.clone();
            debug!(uid, id = existing.id, "register: refreshed existing profile");
            return existing.clone();
        }

        inner.next_id += 1;
        let user = User {
            id: inner.next_id,
            display_name: profile.display_name.clone(),
            email: email.to_string(),
            photo_url: profile.photo_url.clone(),
            role: Role::default(),
            uid: uid.to_string(),
        };
        inner.by_uid.insert(uid.to_string(), user.clone());
        info!(uid, id = user.id, "Registered new profile");
        user
    }

    async fn get(&self, uid: &str) -> Option<User> {
        self.inner.read().await.by_uid.get(uid).cloned()
    }

    async fn len(&self) -> usize {
        self.inner.read().await.by_uid.len()
    }
}
