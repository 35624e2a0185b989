use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use uuid::Uuid;

use ima_client::session::company::{ActiveCompany, Branding, CompanyStore};
use ima_client::session::elevation::ElevationStore;
use ima_client::session::{Role, SessionStore, UserProfile};
use ima_client::store::FileStore;

fn temp_dir() -> PathBuf {
    std::env::temp_dir().join(format!("ima-client-test-{}", Uuid::new_v4()))
}

#[test]
fn session_survives_reopen() -> Result<()> {
    let dir = temp_dir();

    let mut session = SessionStore::open(FileStore::open(dir.clone())?)?;
    session.set_token("tok-maria")?;
    session.set_user(UserProfile {
        id: Uuid::new_v4(),
        username: "maria".to_string(),
        email: None,
    })?;
    session.set_role(Role::Manager)?;
    drop(session);

    let rehydrated = SessionStore::open(FileStore::open(dir.clone())?)?;
    assert!(rehydrated.is_authenticated());
    assert_eq!(rehydrated.token(), Some("tok-maria"));
    assert_eq!(rehydrated.role(), Some(Role::Manager));

    fs::remove_dir_all(dir)?;
    Ok(())
}

#[test]
fn elevation_persists_as_plain_millis() -> Result<()> {
    let dir = temp_dir();

    let mut elevation = ElevationStore::open(FileStore::open(dir.clone())?)?;
    let until = elevation.grant(chrono::Duration::minutes(15))?;

    // The deadline lives in its own file as a bare millisecond value,
    // not inside the session blob.
    let raw = fs::read_to_string(dir.join("admin_elevation.json"))?;
    assert_eq!(raw.trim().parse::<i64>()?, until.timestamp_millis());
    assert!(!dir.join("session.json").exists());

    let rehydrated = ElevationStore::open(FileStore::open(dir.clone())?)?;
    assert_eq!(rehydrated.valid_until(), Some(until));

    fs::remove_dir_all(dir)?;
    Ok(())
}

#[test]
fn corrupt_session_blob_reads_as_logged_out() -> Result<()> {
    let dir = temp_dir();
    fs::create_dir_all(&dir)?;
    fs::write(dir.join("session.json"), "{not valid json")?;

    let session = SessionStore::open(FileStore::open(dir.clone())?)?;
    assert!(!session.is_authenticated());
    assert!(session.token().is_none());

    fs::remove_dir_all(dir)?;
    Ok(())
}

#[test]
fn clear_removes_the_backing_file() -> Result<()> {
    let dir = temp_dir();

    let mut company = CompanyStore::open(FileStore::open(dir.clone())?)?;
    company.set(ActiveCompany {
        id: Uuid::new_v4(),
        name: "Bar Demo".to_string(),
        branding: Branding::default(),
    })?;
    assert!(dir.join("company.json").exists());

    company.clear()?;
    assert!(!dir.join("company.json").exists());
    // Clearing again is a no-op, not an error.
    company.clear()?;

    fs::remove_dir_all(dir)?;
    Ok(())
}
