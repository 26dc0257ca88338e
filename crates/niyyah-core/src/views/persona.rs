use crate::client::ApiClient;
use crate::error::{NiyyahError, Result};
use crate::session::Session;
use crate::types::{Milestone, NewMilestone, NewPersona, Persona, PersonaPatch, ReorderRequest};
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct PersonasView {
    pub personas: Vec<Persona>,
}

impl PersonasView {
    pub fn load(api: &ApiClient, session: &mut Session) -> Result<Self> {
        let personas = api.get(session, "/personas")?;
        Ok(Self { personas })
    }

    pub fn get(&self, id: i64) -> Result<&Persona> {
        self.personas
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| NiyyahError::NotFound(format!("persona {id}")))
    }

    pub fn create(&self, api: &ApiClient, session: &mut Session, new: &NewPersona) -> Result<Self> {
        let created: Persona = api.post(session, "/personas", new)?;
        let mut personas = self.personas.clone();
        personas.push(created);
        Ok(Self { personas })
    }

    pub fn update(
        &self,
        api: &ApiClient,
        session: &mut Session,
        id: i64,
        patch: &PersonaPatch,
    ) -> Result<Self> {
        self.get(id)?;
        let updated: Persona = api.patch(session, &format!("/personas/{id}"), patch)?;
        Ok(self.replace(updated))
    }

    pub fn delete(&self, api: &ApiClient, session: &mut Session, id: i64) -> Result<Self> {
        api.delete(session, &format!("/personas/{id}"))?;
        let personas = self.personas.iter().filter(|p| p.id != id).cloned().collect();
        Ok(Self { personas })
    }

    /// Persist a new display order. `ids` lists personas first to last;
    /// unknown ids are ignored by the server and dropped here too.
    pub fn reorder(&self, api: &ApiClient, session: &mut Session, ids: &[i64]) -> Result<Self> {
        api.post_empty(session, "/personas/reorder", &ReorderRequest { ids })?;

        let mut personas = self.personas.clone();
        for p in personas.iter_mut() {
            if let Some(pos) = ids.iter().position(|id| *id == p.id) {
                p.order = pos as i32;
            }
        }
        personas.sort_by_key(|p| p.order);
        Ok(Self { personas })
    }

    pub fn add_milestone(
        &self,
        api: &ApiClient,
        session: &mut Session,
        persona_id: i64,
        new: &NewMilestone,
    ) -> Result<Self> {
        let mut persona = self.get(persona_id)?.clone();
        let created: Milestone =
            api.post(session, &format!("/personas/{persona_id}/milestones"), new)?;
        persona.milestones.push(created);
        Ok(self.replace(persona))
    }

    pub fn delete_milestone(
        &self,
        api: &ApiClient,
        session: &mut Session,
        persona_id: i64,
        milestone_id: i64,
    ) -> Result<Self> {
        let mut persona = self.get(persona_id)?.clone();
        api.delete(
            session,
            &format!("/personas/{persona_id}/milestones/{milestone_id}"),
        )?;
        persona.milestones.retain(|m| m.id != milestone_id);
        Ok(self.replace(persona))
    }

    fn replace(&self, updated: Persona) -> Self {
        let personas = self
            .personas
            .iter()
            .map(|p| if p.id == updated.id { updated.clone() } else { p.clone() })
            .collect();
        Self { personas }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::testing::{client, session};
    use mockito::{Matcher, Server};

    fn persona_json(id: i64, name: &str, order: i32) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "name": name,
            "arabic_name": "",
            "domain": "Knowledge",
            "eventually": "",
            "icon": "star",
            "color": "#e11d48",
            "one_thing": null,
            "ritual": null,
            "guardrail": null,
            "points": [],
            "milestones": [],
            "order": order,
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z"
        })
    }

    fn view() -> PersonasView {
        let personas = vec![
            serde_json::from_value(persona_json(1, "Scholar", 0)).unwrap(),
            serde_json::from_value(persona_json(2, "Athlete", 1)).unwrap(),
        ];
        PersonasView { personas }
    }

    #[test]
    fn create_appends() {
        let mut server = Server::new();
        server
            .mock("POST", "/api/v1/personas")
            .match_body(Matcher::PartialJson(serde_json::json!({"name": "Father", "icon": "star"})))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(persona_json(3, "Father", 2).to_string())
            .create();

        let next = view()
            .create(&client(&server), &mut session(), &NewPersona::new("Father", "Family"))
            .unwrap();
        assert_eq!(next.personas.len(), 3);
        assert_eq!(next.get(3).unwrap().name, "Father");
    }

    #[test]
    fn free_tier_limit_surfaces_detail() {
        let mut server = Server::new();
        server
            .mock("POST", "/api/v1/personas")
            .with_status(403)
            .with_body(r#"{"detail":"Free tier limited to 3 personas"}"#)
            .create();

        let err = view()
            .create(&client(&server), &mut session(), &NewPersona::new("Fourth", "x"))
            .unwrap_err();
        assert_eq!(err.to_string(), "API error (403): Free tier limited to 3 personas");
    }

    #[test]
    fn reorder_applies_locally() {
        let mut server = Server::new();
        let m = server
            .mock("POST", "/api/v1/personas/reorder")
            .match_body(Matcher::Json(serde_json::json!({"ids": [2, 1]})))
            .with_status(204)
            .create();

        let next = view().reorder(&client(&server), &mut session(), &[2, 1]).unwrap();
        let names: Vec<&str> = next.personas.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Athlete", "Scholar"]);
        m.assert();
    }

    #[test]
    fn milestones_add_and_delete() {
        let mut server = Server::new();
        server
            .mock("POST", "/api/v1/personas/1/milestones")
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": 10, "persona_id": 1, "target_date": "2026-12-31", "goal": "Memorise Juz Amma", "is_completed": false}"#)
            .create();
        server
            .mock("DELETE", "/api/v1/personas/1/milestones/10")
            .with_status(204)
            .create();

        let api = client(&server);
        let mut s = session();
        let new = NewMilestone {
            goal: "Memorise Juz Amma".into(),
            target_date: chrono::NaiveDate::from_ymd_opt(2026, 12, 31),
        };
        let with = view().add_milestone(&api, &mut s, 1, &new).unwrap();
        assert_eq!(with.get(1).unwrap().milestones.len(), 1);

        let without = with.delete_milestone(&api, &mut s, 1, 10).unwrap();
        assert!(without.get(1).unwrap().milestones.is_empty());
    }

    #[test]
    fn delete_filters_persona() {
        let mut server = Server::new();
        server.mock("DELETE", "/api/v1/personas/1").with_status(204).create();
        let next = view().delete(&client(&server), &mut session(), 1).unwrap();
        assert_eq!(next.personas.len(), 1);
        assert!(matches!(next.get(1), Err(NiyyahError::NotFound(_))));
    }
}
