use chrono::{DateTime, Utc};

use crate::error::ClientError;
use crate::session::Role;

/// Roles allowed through the admin elevation guard.
pub const PRIVILEGED_ROLES: [Role; 2] = [Role::Admin, Role::Manager];

/// Redirect targets the guard layer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Public landing screen, the target for any authorization failure.
    Landing,
    /// Elevated login form, the target when only the elevation proof
    /// has lapsed and the base session should be kept.
    ElevatedLogin,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::ElevatedLogin => "/admin/login",
        }
    }
}

/// Outcome of a guard evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Readiness not yet confirmed: show the neutral placeholder,
    /// never the protected content.
    Verifying,
    /// Render the protected content.
    Render,
    /// Navigate away; keep showing the placeholder until navigation
    /// completes.
    Redirect(Route),
}

/// One-shot readiness gate. Persisted state is only trustworthy after
/// the environment has fully attached; guards refuse to decide until
/// this flips, and it never flips back.
#[derive(Debug, Default)]
pub struct Readiness {
    ready: bool,
}

impl Readiness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_ready(&mut self) {
        self.ready = true;
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }
}

/// Role-gated access wrapper. Membership is by exact role: there is no
/// hierarchy, so each protected region enumerates every role it accepts.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    allowed: Vec<Role>,
}

impl RouteGuard {
    pub fn new(allowed: impl Into<Vec<Role>>) -> Self {
        Self {
            allowed: allowed.into(),
        }
    }

    pub fn evaluate(&self, readiness: &Readiness, role: Option<Role>) -> GuardDecision {
        if !readiness.is_ready() {
            return GuardDecision::Verifying;
        }
        match role {
            Some(role) if self.allowed.contains(&role) => GuardDecision::Render,
            Some(role) => {
                tracing::debug!("route guard denied role '{}', redirecting to landing", role);
                GuardDecision::Redirect(Route::Landing)
            }
            None => {
                tracing::debug!("route guard found no session role, redirecting to landing");
                GuardDecision::Redirect(Route::Landing)
            }
        }
    }
}

/// Error-returning form of the admin check, for call sites that are not
/// rendering anything (e.g. issuing an admin API call directly).
pub fn ensure_admin(
    role: Option<Role>,
    elevation_valid_until: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<(), ClientError> {
    let role = role.ok_or(ClientError::Unauthenticated)?;
    if !PRIVILEGED_ROLES.contains(&role) {
        return Err(ClientError::Unauthorized {
            role: role.to_string(),
        });
    }
    match elevation_valid_until {
        Some(until) if until > now => Ok(()),
        _ => Err(ClientError::ElevationExpired),
    }
}

/// Stricter guard for admin configuration screens: requires a privileged
/// role AND a still-valid elevation deadline. A role failure redirects to
/// the landing route; an elevation-only failure redirects to the elevated
/// login form so the base session survives re-elevation.
#[derive(Debug, Clone, Default)]
pub struct AdminGuard;

impl AdminGuard {
    pub fn new() -> Self {
        Self
    }

    pub fn evaluate_at(
        &self,
        readiness: &Readiness,
        role: Option<Role>,
        elevation_valid_until: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> GuardDecision {
        if !readiness.is_ready() {
            return GuardDecision::Verifying;
        }
        match ensure_admin(role, elevation_valid_until, now) {
            Ok(()) => GuardDecision::Render,
            Err(ClientError::ElevationExpired) => {
                tracing::debug!("admin guard: role ok but elevation missing or expired");
                GuardDecision::Redirect(Route::ElevatedLogin)
            }
            Err(_) => {
                tracing::debug!("admin guard denied non-privileged session");
                GuardDecision::Redirect(Route::Landing)
            }
        }
    }

    pub fn evaluate(
        &self,
        readiness: &Readiness,
        role: Option<Role>,
        elevation_valid_until: Option<DateTime<Utc>>,
    ) -> GuardDecision {
        self.evaluate_at(readiness, role, elevation_valid_until, Utc::now())
    }
}
