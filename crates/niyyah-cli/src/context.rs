use anyhow::{bail, Context};
use niyyah_core::client::ApiClient;
use niyyah_core::config::ClientConfig;
use niyyah_core::session::{Session, SessionStore};
use std::path::{Path, PathBuf};

/// Everything a command needs: where state lives, the effective config and
/// the output mode.
pub struct Ctx {
    pub home: PathBuf,
    pub config: ClientConfig,
    pub json: bool,
}

impl Ctx {
    pub fn load(home: PathBuf, api_url: Option<&str>, json: bool) -> anyhow::Result<Self> {
        let mut config = ClientConfig::load(&home)
            .with_context(|| format!("failed to read config in {}", home.display()))?;
        if let Some(url) = api_url {
            config.api_url = url.to_string();
        }
        Ok(Self { home, config, json })
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn store(&self) -> SessionStore {
        SessionStore::new(&self.home)
    }

    pub fn client(&self) -> anyhow::Result<ApiClient> {
        ApiClient::new(&self.config).context("failed to build HTTP client")
    }

    /// Run `f` against the stored session, then persist whatever state the
    /// session ended in (rotated tokens or logged out), even when `f` fails.
    pub fn with_session<T>(
        &self,
        f: impl FnOnce(&ApiClient, &mut Session) -> niyyah_core::Result<T>,
    ) -> anyhow::Result<T> {
        let store = self.store();
        let mut session = store.load().context("failed to read session")?;
        if !session.is_active() && !session.is_logged_out() {
            bail!(niyyah_core::NiyyahError::NotLoggedIn);
        }
        let api = self.client()?;
        let result = f(&api, &mut session);
        store.save(&session).context("failed to save session")?;
        Ok(result?)
    }
}
