pub mod auth;
pub mod company;
pub mod prefs;

use chrono::Utc;

use crate::error::ClientError;
use crate::guard::{ensure_admin, GuardDecision, Readiness, RouteGuard};
use crate::session::elevation::ElevationStore;
use crate::session::{Role, SessionStore};
use crate::store::StateStore;

/// CLI stand-in for the dashboard shell's readiness signal: by the time
/// a command runs, the stores have been rehydrated from disk, so the
/// guards may trust what they read.
fn shell_readiness() -> Readiness {
    let mut readiness = Readiness::new();
    readiness.mark_ready();
    readiness
}

/// Routes a command through the role guard the way the dashboard shell
/// wraps a protected screen. A redirect decision becomes a denial error.
pub(crate) fn require_role<S: StateStore>(
    session: &SessionStore<S>,
    allowed: &[Role],
) -> Result<(), ClientError> {
    let guard = RouteGuard::new(allowed.to_vec());
    match guard.evaluate(&shell_readiness(), session.role()) {
        GuardDecision::Render => Ok(()),
        _ => match session.role() {
            Some(role) => Err(ClientError::Unauthorized {
                role: role.to_string(),
            }),
            None => Err(ClientError::Unauthenticated),
        },
    }
}

/// Admin-only commands re-check the elevation deadline on every
/// invocation, exactly like the admin screens do on every render pass.
pub(crate) fn require_admin<S: StateStore>(
    session: &SessionStore<S>,
    elevation: &ElevationStore<S>,
) -> Result<(), ClientError> {
    ensure_admin(session.role(), elevation.valid_until(), Utc::now())
}
