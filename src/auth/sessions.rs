use std::collections::HashMap;
use std::sync::Mutex;

use time::{Duration, OffsetDateTime};
use uuid::Uuid;

struct SessionEntry {
    user_id: i64,
    expires_at: OffsetDateTime,
}

/// In-process session store keyed by opaque tokens. Sessions are
/// deliberately not persisted: a restart logs everyone out.
pub struct SessionStore {
    ttl: Duration,
    entries: Mutex<HashMap<String, SessionEntry>>,
}

impl SessionStore {
    pub fn new(ttl_minutes: i64) -> Self {
        Self {
            ttl: Duration::minutes(ttl_minutes),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Issue a fresh token bound to the user id.
    pub fn create(&self, user_id: i64) -> String {
        let token = Uuid::new_v4().to_string();
        let entry = SessionEntry {
            user_id,
            expires_at: OffsetDateTime::now_utc() + self.ttl,
        };
        self.lock().insert(token.clone(), entry);
        token
    }

    /// Resolve a token to its user id. Expired entries are dropped on
    /// lookup.
    pub fn resolve(&self, token: &str) -> Option<i64> {
        let mut entries = self.lock();
        match entries.get(token) {
            Some(entry) if entry.expires_at > OffsetDateTime::now_utc() => Some(entry.user_id),
            Some(_) => {
                entries.remove(token);
                None
            }
            None => None,
        }
    }

    /// Remove a session. Removing an unknown token is a no-op.
    pub fn destroy(&self, token: &str) {
        self.lock().remove(token);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, SessionEntry>> {
        self.entries.lock().expect("session store lock poisoned")
    }
}
