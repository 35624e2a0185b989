use chrono::{DateTime, Utc};

use crate::client::{AuthApi, Credentials};
use crate::error::ClientError;
use crate::guard::PRIVILEGED_ROLES;
use crate::session::company::CompanyStore;
use crate::session::elevation::ElevationStore;
use crate::session::{SessionStore, UserProfile};
use crate::store::StateStore;

/// Exchanges credentials for a token, retrying exactly once after a fixed
/// delay when the request fails before reaching the server. A server that
/// answered with a rejection is surfaced immediately and never retried.
async fn exchange_credentials<A: AuthApi + Sync>(
    api: &A,
    credentials: &Credentials,
    retry_delay: std::time::Duration,
) -> Result<String, ClientError> {
    match api.login(credentials).await {
        Ok(token) => Ok(token),
        Err(e) if e.is_transient() => {
            tracing::warn!("login request failed in transit, retrying once: {}", e);
            tokio::time::sleep(retry_delay).await;
            api.login(credentials).await
        }
        Err(e) => Err(e),
    }
}

/// Full login flow: credential exchange, profile lookup, company
/// resolution, then a single commit of token, user and role. Nothing is
/// written until every step has succeeded, so no partial session is ever
/// observable.
pub async fn login<A, S>(
    api: &A,
    session: &mut SessionStore<S>,
    company: &mut CompanyStore<S>,
    credentials: &Credentials,
    retry_delay: std::time::Duration,
) -> Result<UserProfile, ClientError>
where
    A: AuthApi + Sync,
    S: StateStore,
{
    let token = exchange_credentials(api, credentials, retry_delay).await?;
    let who = api.whoami(&token).await?;
    let active = api.active_company(&token).await?;

    let (profile, role) = who.into_parts();
    session.establish(token, profile.clone(), role)?;
    company.set(active)?;

    tracing::info!("session established for '{}' as {}", profile.username, role);
    Ok(profile)
}

/// Elevated login flow for admin configuration screens. Credentials are
/// re-verified against the server, and the returned role must be
/// privileged: valid credentials on a non-privileged account raise an
/// access-denied outcome and write nothing, not even the base session.
/// On success the elevation deadline is set to `now + window`.
pub async fn elevated_login<A, S>(
    api: &A,
    session: &mut SessionStore<S>,
    elevation: &mut ElevationStore<S>,
    credentials: &Credentials,
    retry_delay: std::time::Duration,
    window: chrono::Duration,
) -> Result<DateTime<Utc>, ClientError>
where
    A: AuthApi + Sync,
    S: StateStore,
{
    let token = exchange_credentials(api, credentials, retry_delay).await?;
    let who = api.whoami(&token).await?;

    if !PRIVILEGED_ROLES.contains(&who.role) {
        tracing::warn!(
            "elevated login refused: '{}' authenticated with non-privileged role {}",
            who.username,
            who.role
        );
        return Err(ClientError::AccessDenied {
            role: who.role.to_string(),
        });
    }

    let (profile, role) = who.into_parts();
    session.establish(token, profile.clone(), role)?;
    let until = elevation.grant(window)?;

    tracing::info!(
        "admin elevation granted to '{}' until {}",
        profile.username,
        until
    );
    Ok(until)
}

/// Clears session, elevation and company selection together. Idempotent.
pub fn logout<S: StateStore>(
    session: &mut SessionStore<S>,
    elevation: &mut ElevationStore<S>,
    company: &mut CompanyStore<S>,
) -> Result<(), ClientError> {
    session.clear()?;
    elevation.clear()?;
    company.clear()?;
    Ok(())
}
