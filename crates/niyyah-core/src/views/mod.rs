//! Page-level view-models.
//!
//! Each view holds the data one screen shows. Operations talk to the API
//! through the caller's [`ApiClient`](crate::client::ApiClient) and
//! [`Session`](crate::session::Session) and return a new view with the
//! updated collection; the receiver is left untouched.

pub mod dashboard;
pub mod persona;
pub mod principle;
pub mod schedule;
pub mod settings;
pub mod tracker;

pub use dashboard::DashboardView;
pub use persona::PersonasView;
pub use principle::PrinciplesView;
pub use schedule::ScheduleView;
pub use settings::SettingsView;
pub use tracker::TrackerView;

#[cfg(test)]
pub(crate) mod testing {
    use crate::client::ApiClient;
    use crate::config::ClientConfig;
    use crate::session::Session;
    use crate::types::TokenPair;

    pub fn client(server: &mockito::Server) -> ApiClient {
        let cfg = ClientConfig {
            api_url: server.url(),
            ..Default::default()
        };
        ApiClient::new(&cfg).unwrap()
    }

    pub fn session() -> Session {
        Session::with_tokens(TokenPair {
            access_token: "tok".into(),
            refresh_token: "ref".into(),
            token_type: "bearer".into(),
        })
    }
}
