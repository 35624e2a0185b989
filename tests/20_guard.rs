use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use chrono::Duration;
use uuid::Uuid;

use ima_client::guard::{AdminGuard, GuardDecision, Readiness, Route, RouteGuard};
use ima_client::session::elevation::ElevationStore;
use ima_client::session::{Role, SessionStore, UserProfile};
use ima_client::store::FileStore;

fn temp_dir() -> PathBuf {
    std::env::temp_dir().join(format!("ima-client-test-{}", Uuid::new_v4()))
}

fn seed_session(dir: &PathBuf, role: Role) -> Result<()> {
    let mut session = SessionStore::open(FileStore::open(dir.clone())?)?;
    session.set_token("tok-seed")?;
    session.set_user(UserProfile {
        id: Uuid::new_v4(),
        username: "seed".to_string(),
        email: None,
    })?;
    session.set_role(role)?;
    Ok(())
}

#[test]
fn rehydrated_role_is_not_trusted_before_readiness() -> Result<()> {
    let dir = temp_dir();
    seed_session(&dir, Role::Admin)?;

    // Fresh process: state already rehydrated, readiness not yet signalled.
    let session = SessionStore::open(FileStore::open(dir.clone())?)?;
    let guard = RouteGuard::new([Role::Admin]);
    let mut readiness = Readiness::new();

    assert_eq!(
        guard.evaluate(&readiness, session.role()),
        GuardDecision::Verifying
    );

    readiness.mark_ready();
    assert_eq!(
        guard.evaluate(&readiness, session.role()),
        GuardDecision::Render
    );

    fs::remove_dir_all(dir)?;
    Ok(())
}

#[test]
fn cashier_session_is_redirected_from_management_screen() -> Result<()> {
    let dir = temp_dir();
    seed_session(&dir, Role::Cashier)?;

    let session = SessionStore::open(FileStore::open(dir.clone())?)?;
    let guard = RouteGuard::new([Role::Admin, Role::Manager]);
    let mut readiness = Readiness::new();
    readiness.mark_ready();

    assert_eq!(
        guard.evaluate(&readiness, session.role()),
        GuardDecision::Redirect(Route::Landing)
    );

    fs::remove_dir_all(dir)?;
    Ok(())
}

#[test]
fn stale_elevation_from_disk_redirects_to_elevated_login() -> Result<()> {
    let dir = temp_dir();
    seed_session(&dir, Role::Admin)?;

    // A deadline granted long ago, rehydrated by a later process.
    let mut elevation = ElevationStore::open(FileStore::open(dir.clone())?)?;
    let until = elevation.grant(Duration::milliseconds(1))?;
    drop(elevation);

    let session = SessionStore::open(FileStore::open(dir.clone())?)?;
    let elevation = ElevationStore::open(FileStore::open(dir.clone())?)?;
    let mut readiness = Readiness::new();
    readiness.mark_ready();

    let decision = AdminGuard::new().evaluate_at(
        &readiness,
        session.role(),
        elevation.valid_until(),
        until + Duration::seconds(1),
    );
    assert_eq!(decision, GuardDecision::Redirect(Route::ElevatedLogin));

    fs::remove_dir_all(dir)?;
    Ok(())
}

#[test]
fn redirect_targets_resolve_to_routes() {
    assert_eq!(Route::Landing.path(), "/");
    assert_eq!(Route::ElevatedLogin.path(), "/admin/login");
}
