use crate::client::ApiClient;
use crate::error::{NiyyahError, Result};
use crate::session::Session;
use crate::types::{NewPrinciple, Principle, PrinciplePatch};
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct PrinciplesView {
    pub principles: Vec<Principle>,
}

impl PrinciplesView {
    pub fn load(api: &ApiClient, session: &mut Session) -> Result<Self> {
        let principles = api.get(session, "/principles")?;
        Ok(Self { principles })
    }

    pub fn get(&self, id: i64) -> Result<&Principle> {
        self.principles
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| NiyyahError::NotFound(format!("principle {id}")))
    }

    pub fn create(&self, api: &ApiClient, session: &mut Session, new: &NewPrinciple) -> Result<Self> {
        let created: Principle = api.post(session, "/principles", new)?;
        let mut principles = self.principles.clone();
        principles.push(created);
        Ok(Self { principles })
    }

    pub fn update(
        &self,
        api: &ApiClient,
        session: &mut Session,
        id: i64,
        patch: &PrinciplePatch,
    ) -> Result<Self> {
        self.get(id)?;
        let updated: Principle = api.patch(session, &format!("/principles/{id}"), patch)?;
        let mut principles: Vec<Principle> = self
            .principles
            .iter()
            .map(|p| if p.id == id { updated.clone() } else { p.clone() })
            .collect();
        principles.sort_by_key(|p| p.order);
        Ok(Self { principles })
    }

    pub fn delete(&self, api: &ApiClient, session: &mut Session, id: i64) -> Result<Self> {
        api.delete(session, &format!("/principles/{id}"))?;
        let principles = self.principles.iter().filter(|p| p.id != id).cloned().collect();
        Ok(Self { principles })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::testing::{client, session};
    use mockito::{Matcher, Server};

    const IHSAN: &str = r#"{"id": 1, "name": "Ihsan", "arabic": "إحسان", "meaning": "Excellence", "verse": null, "icon": "heart", "order": 0, "created_at": "2025-01-01T00:00:00Z", "updated_at": "2025-01-01T00:00:00Z"}"#;

    #[test]
    fn load_create_delete() {
        let mut server = Server::new();
        server
            .mock("GET", "/api/v1/principles")
            .with_header("content-type", "application/json")
            .with_body(format!("[{IHSAN}]"))
            .create();
        server
            .mock("POST", "/api/v1/principles")
            .match_body(Matcher::PartialJson(serde_json::json!({"name": "Sabr", "icon": "heart"})))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": 2, "name": "Sabr", "arabic": "", "meaning": "Patience", "verse": null, "icon": "heart", "order": 1, "created_at": "2025-01-02T00:00:00Z", "updated_at": "2025-01-02T00:00:00Z"}"#)
            .create();
        server.mock("DELETE", "/api/v1/principles/1").with_status(204).create();

        let api = client(&server);
        let mut s = session();
        let view = PrinciplesView::load(&api, &mut s).unwrap();
        assert_eq!(view.principles.len(), 1);

        let view = view.create(&api, &mut s, &NewPrinciple::new("Sabr", "Patience")).unwrap();
        assert_eq!(view.principles.len(), 2);

        let view = view.delete(&api, &mut s, 1).unwrap();
        assert_eq!(view.principles.len(), 1);
        assert_eq!(view.principles[0].name, "Sabr");
    }

    #[test]
    fn update_replaces_in_place() {
        let mut server = Server::new();
        server
            .mock("PATCH", "/api/v1/principles/1")
            .match_body(Matcher::Json(serde_json::json!({"meaning": "Doing what is beautiful"})))
            .with_header("content-type", "application/json")
            .with_body(IHSAN.replace("Excellence", "Doing what is beautiful"))
            .create();

        let view = PrinciplesView {
            principles: vec![serde_json::from_str(IHSAN).unwrap()],
        };
        let patch = PrinciplePatch {
            meaning: Some("Doing what is beautiful".into()),
            ..Default::default()
        };
        let next = view.update(&client(&server), &mut session(), 1, &patch).unwrap();
        assert_eq!(next.get(1).unwrap().meaning, "Doing what is beautiful");
        assert_eq!(view.get(1).unwrap().meaning, "Excellence");
    }
}
