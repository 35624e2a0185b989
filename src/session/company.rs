use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ClientError;
use crate::store::{StateStore, COMPANY_KEY};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Branding {
    #[serde(default)]
    pub primary_color: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

/// The company (tenant) currently selected as the active data scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveCompany {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub branding: Branding,
}

/// Tenant-selection container: set once after login-time tenant
/// resolution, read by many screens, cleared on logout.
pub struct CompanyStore<S: StateStore> {
    current: Option<ActiveCompany>,
    store: S,
}

impl<S: StateStore> CompanyStore<S> {
    pub fn open(store: S) -> Result<Self, ClientError> {
        let current = match store.load(COMPANY_KEY)? {
            Some(raw) => serde_json::from_str(&raw).ok(),
            None => None,
        };
        Ok(Self { current, store })
    }

    pub fn current(&self) -> Option<&ActiveCompany> {
        self.current.as_ref()
    }

    pub fn set(&mut self, company: ActiveCompany) -> Result<(), ClientError> {
        let raw = serde_json::to_string_pretty(&company)?;
        self.store.save(COMPANY_KEY, &raw)?;
        self.current = Some(company);
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), ClientError> {
        self.current = None;
        self.store.remove(COMPANY_KEY)
    }
}
