use std::sync::Arc;

use time::OffsetDateTime;

use crate::errors::StoreError;
use crate::session::{Attendee, AttendeeForm, ClassSession};
use crate::store::KeyValueStore;

/// The one key the active session lives under.
pub const CURRENT_CLASS_KEY: &str = "currentClass";

pub type SafeStore = dyn KeyValueStore + Send + Sync;

/// Owns the persisted active session. Everything that reads or changes
/// the session goes through here.
///
/// Updates are read-modify-write without any locking; callers keep at
/// most one flow mutating the session at a time.
#[derive(Clone)]
pub struct RosterStore {
    store: Arc<SafeStore>,
    key: String,
}

impl RosterStore {
    pub fn new(store: Arc<SafeStore>) -> Self {
        Self::with_key(store, CURRENT_CLASS_KEY)
    }

    pub fn with_key(store: Arc<SafeStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Loads the active session, if there is one.
    pub async fn load(&self) -> Result<Option<ClassSession>, StoreError> {
        let raw = self.store.get(&self.key).await?;

        raw.map(|raw| {
            serde_json::from_str(&raw).map_err(|source| StoreError::MalformedRecord {
                key: self.key.clone(),
                source,
            })
        })
        .transpose()
    }

    /// Makes the given session the active one, replacing any other.
    pub async fn save(&self, session: &ClassSession) -> Result<(), StoreError> {
        let raw = serde_json::to_string(session).map_err(StoreError::SerializationFailed)?;

        self.store.set(&self.key, raw).await
    }

    /// Appends a checked-in attendee to the active session. Returns
    /// `None` without writing anything when no session is active.
    pub async fn append(
        &self,
        form: AttendeeForm,
        checked_in_at: OffsetDateTime,
    ) -> Result<Option<Attendee>, StoreError> {
        let mut session = match self.load().await? {
            Some(session) => session,
            None => return Ok(None),
        };

        let attendee = Attendee::new(form, &session.name, checked_in_at);
        session.attendees.push(attendee.clone());
        self.save(&session).await?;

        Ok(Some(attendee))
    }

    /// Destroys the active session.
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(&self.key).await
    }
}
