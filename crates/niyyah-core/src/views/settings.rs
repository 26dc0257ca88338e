use crate::client::ApiClient;
use crate::error::Result;
use crate::session::Session;
use crate::types::{SettingsPatch, UserSettings};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SettingsView {
    pub settings: UserSettings,
}

impl SettingsView {
    pub fn load(api: &ApiClient, session: &mut Session) -> Result<Self> {
        let settings = api.get(session, "/settings")?;
        Ok(Self { settings })
    }

    pub fn update(&self, api: &ApiClient, session: &mut Session, patch: &SettingsPatch) -> Result<Self> {
        let settings = api.patch(session, "/settings", patch)?;
        Ok(Self { settings })
    }
}
