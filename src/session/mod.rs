pub mod company;
pub mod elevation;
pub mod prefs;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ClientError;
use crate::store::{StateStore, SESSION_KEY};

/// Closed set of account roles. Comparison is by exact variant: a more
/// privileged role never implicitly satisfies a request for a lesser one,
/// so every guard enumerates the roles it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Cashier,
    Waiter,
}

impl Role {
    /// Every role, for regions any authenticated account may enter.
    /// Spelled out because allowed sets are always enumerated explicitly.
    pub const ALL: [Role; 4] = [Role::Admin, Role::Manager, Role::Cashier, Role::Waiter];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Cashier => "cashier",
            Role::Waiter => "waiter",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Profile record returned by the who-am-I endpoint. The bearer token is
/// opaque to this layer; the role travels alongside the profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SessionSnapshot {
    token: Option<String>,
    user: Option<UserProfile>,
    role: Option<Role>,
}

/// Authenticated identity container: bearer token, user profile and role.
///
/// The three fields are set together by the login flows and cleared
/// together on logout; the setters are individual so the container stays
/// pure state, with the flows responsible for never committing a partial
/// identity. Every mutation is mirrored to the backing store so a restart
/// restores the last known session without re-authenticating.
pub struct SessionStore<S: StateStore> {
    snapshot: SessionSnapshot,
    store: S,
}

impl<S: StateStore> SessionStore<S> {
    /// Rehydrates from the backing store. A missing or corrupt snapshot
    /// is treated as logged out.
    pub fn open(store: S) -> Result<Self, ClientError> {
        let snapshot = match store.load(SESSION_KEY)? {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_default(),
            None => SessionSnapshot::default(),
        };
        Ok(Self { snapshot, store })
    }

    pub fn token(&self) -> Option<&str> {
        self.snapshot.token.as_deref()
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.snapshot.user.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        self.snapshot.role
    }

    /// True only when token, user and role are all present.
    pub fn is_authenticated(&self) -> bool {
        self.snapshot.token.is_some() && self.snapshot.user.is_some() && self.snapshot.role.is_some()
    }

    pub fn set_token(&mut self, token: impl Into<String>) -> Result<(), ClientError> {
        self.snapshot.token = Some(token.into());
        self.persist()
    }

    pub fn set_user(&mut self, user: UserProfile) -> Result<(), ClientError> {
        self.snapshot.user = Some(user);
        self.persist()
    }

    pub fn set_role(&mut self, role: Role) -> Result<(), ClientError> {
        self.snapshot.role = Some(role);
        self.persist()
    }

    /// Commits token, user and role as one snapshot in a single write.
    /// Neither memory nor storage is touched unless the write succeeds,
    /// so a storage fault can never leave a partial identity behind.
    pub fn establish(
        &mut self,
        token: impl Into<String>,
        user: UserProfile,
        role: Role,
    ) -> Result<(), ClientError> {
        let snapshot = SessionSnapshot {
            token: Some(token.into()),
            user: Some(user),
            role: Some(role),
        };
        let raw = serde_json::to_string_pretty(&snapshot)?;
        self.store.save(SESSION_KEY, &raw)?;
        self.snapshot = snapshot;
        Ok(())
    }

    /// Resets to the logged-out state. Idempotent.
    pub fn clear(&mut self) -> Result<(), ClientError> {
        self.snapshot = SessionSnapshot::default();
        self.store.remove(SESSION_KEY)
    }

    fn persist(&mut self) -> Result<(), ClientError> {
        let raw = serde_json::to_string_pretty(&self.snapshot)?;
        self.store.save(SESSION_KEY, &raw)
    }
}
