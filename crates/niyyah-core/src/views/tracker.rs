use crate::client::ApiClient;
use crate::error::{NiyyahError, Result};
use crate::session::Session;
use crate::types::{
    CheckRequest, DailyCheck, NewNonNegotiable, NonNegotiable, NonNegotiablePatch, TrackerDay,
};
use chrono::NaiveDate;
use serde::Serialize;

/// Today's non-negotiables and the checks recorded against them.
///
/// Streaks are computed server-side, so every mutation re-reads the day.
#[derive(Debug, Clone, Serialize)]
pub struct TrackerView {
    pub day: TrackerDay,
}

impl TrackerView {
    pub fn load(api: &ApiClient, session: &mut Session) -> Result<Self> {
        let day = api.get(session, "/tracker/today")?;
        Ok(Self { day })
    }

    pub fn items(&self) -> &[NonNegotiable] {
        &self.day.non_negotiables
    }

    pub fn is_checked(&self, non_negotiable_id: i64) -> bool {
        self.day.check_for(non_negotiable_id).is_some()
    }

    pub fn checked_count(&self) -> usize {
        self.items().iter().filter(|nn| self.is_checked(nn.id)).count()
    }

    pub fn create(&self, api: &ApiClient, session: &mut Session, new: &NewNonNegotiable) -> Result<Self> {
        let _created: NonNegotiable = api.post(session, "/tracker/non-negotiables", new)?;
        Self::load(api, session)
    }

    pub fn update(
        &self,
        api: &ApiClient,
        session: &mut Session,
        id: i64,
        patch: &NonNegotiablePatch,
    ) -> Result<Self> {
        let _updated: NonNegotiable =
            api.patch(session, &format!("/tracker/non-negotiables/{id}"), patch)?;
        Self::load(api, session)
    }

    pub fn delete(&self, api: &ApiClient, session: &mut Session, id: i64) -> Result<Self> {
        api.delete(session, &format!("/tracker/non-negotiables/{id}"))?;
        Self::load(api, session)
    }

    /// Record a check for `non_negotiable_id` on `date` (server default: today).
    pub fn check(
        &self,
        api: &ApiClient,
        session: &mut Session,
        non_negotiable_id: i64,
        date: Option<NaiveDate>,
    ) -> Result<Self> {
        let body = CheckRequest {
            non_negotiable_id,
            check_date: date,
        };
        let _check: DailyCheck = api.post(session, "/tracker/check", &body)?;
        Self::load(api, session)
    }

    /// Remove today's check for `non_negotiable_id`.
    pub fn uncheck(&self, api: &ApiClient, session: &mut Session, non_negotiable_id: i64) -> Result<Self> {
        let check = self
            .day
            .check_for(non_negotiable_id)
            .ok_or_else(|| NiyyahError::NotFound(format!("check for non-negotiable {non_negotiable_id}")))?;
        api.delete(session, &format!("/tracker/check/{}", check.id))?;
        Self::load(api, session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::testing::{client, session};
    use mockito::{Matcher, Server};

    const UNCHECKED: &str = r#"{
        "date": "2026-10-18",
        "checks": [],
        "non_negotiables": [
            {"id": 1, "title": "Fajr on time", "category": "spiritual", "order": 0,
             "streak": {"current_streak": 2, "longest_streak": 5, "last_check_date": "2026-10-17"}}
        ]
    }"#;

    const CHECKED: &str = r#"{
        "date": "2026-10-18",
        "checks": [{"id": 77, "non_negotiable_id": 1, "check_date": "2026-10-18", "is_completed": true}],
        "non_negotiables": [
            {"id": 1, "title": "Fajr on time", "category": "spiritual", "order": 0,
             "streak": {"current_streak": 3, "longest_streak": 5, "last_check_date": "2026-10-18"}}
        ]
    }"#;

    fn view(body: &str) -> TrackerView {
        TrackerView {
            day: serde_json::from_str(body).unwrap(),
        }
    }

    #[test]
    fn check_reloads_streaks() {
        let mut server = Server::new();
        let post = server
            .mock("POST", "/api/v1/tracker/check")
            .match_body(Matcher::Json(serde_json::json!({"non_negotiable_id": 1})))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": 77, "non_negotiable_id": 1, "check_date": "2026-10-18", "is_completed": true}"#)
            .create();
        server
            .mock("GET", "/api/v1/tracker/today")
            .with_header("content-type", "application/json")
            .with_body(CHECKED)
            .create();

        let before = view(UNCHECKED);
        assert!(!before.is_checked(1));
        let after = before.check(&client(&server), &mut session(), 1, None).unwrap();
        assert!(after.is_checked(1));
        assert_eq!(after.checked_count(), 1);
        assert_eq!(after.items()[0].streak.as_ref().unwrap().current_streak, 3);
        post.assert();
    }

    #[test]
    fn already_checked_is_api_error() {
        let mut server = Server::new();
        server
            .mock("POST", "/api/v1/tracker/check")
            .with_status(400)
            .with_body(r#"{"detail":"Already checked for this date"}"#)
            .create();

        let err = view(CHECKED)
            .check(&client(&server), &mut session(), 1, None)
            .unwrap_err();
        assert!(matches!(err, NiyyahError::Api { status: 400, .. }));
    }

    #[test]
    fn uncheck_deletes_todays_check() {
        let mut server = Server::new();
        let del = server
            .mock("DELETE", "/api/v1/tracker/check/77")
            .with_status(204)
            .create();
        server
            .mock("GET", "/api/v1/tracker/today")
            .with_header("content-type", "application/json")
            .with_body(UNCHECKED)
            .create();

        let after = view(CHECKED).uncheck(&client(&server), &mut session(), 1).unwrap();
        assert!(!after.is_checked(1));
        del.assert();
    }

    #[test]
    fn uncheck_without_check_is_not_found() {
        let server = Server::new();
        let err = view(UNCHECKED)
            .uncheck(&client(&server), &mut session(), 1)
            .unwrap_err();
        assert!(matches!(err, NiyyahError::NotFound(_)));
    }
}
