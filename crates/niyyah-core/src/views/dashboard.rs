use crate::client::ApiClient;
use crate::error::Result;
use crate::schedule::{
    block_progress, day_progress, resolve_active_block, timeline_segment, BlockProgress,
    ScheduleBlock, TimelineSegment,
};
use crate::session::Session;
use crate::time::TimeOfDay;
use crate::types::{Dashboard, PersonaSummary};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub data: Dashboard,
}

/// The block occupying "now" together with its owner and progress.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentBlock<'a> {
    pub block: &'a ScheduleBlock,
    pub persona: Option<&'a PersonaSummary>,
    pub progress: BlockProgress,
    /// False when the resolver fell back to the earliest block.
    pub in_progress: bool,
}

/// A snapshot of the dashboard evaluated at one instant.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot<'a> {
    pub now: TimeOfDay,
    pub day_progress: f64,
    pub current: Option<CurrentBlock<'a>>,
    pub timeline: Vec<(i64, TimelineSegment)>,
    pub checked_percent: u32,
}

impl DashboardView {
    pub fn load(api: &ApiClient, session: &mut Session) -> Result<Self> {
        let data = api.get(session, "/dashboard")?;
        Ok(Self { data })
    }

    pub fn current(&self, now: TimeOfDay) -> Option<CurrentBlock<'_>> {
        let block = resolve_active_block(&self.data.schedule_blocks, now)?;
        Some(CurrentBlock {
            block,
            persona: self.data.persona(block.persona_id),
            progress: block_progress(block, now),
            in_progress: block.contains(now),
        })
    }

    pub fn snapshot(&self, now: TimeOfDay) -> DashboardSnapshot<'_> {
        DashboardSnapshot {
            now,
            day_progress: day_progress(now),
            current: self.current(now),
            timeline: self
                .data
                .schedule_blocks
                .iter()
                .map(|b| (b.id, timeline_segment(b)))
                .collect(),
            checked_percent: self.data.checked_percent(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::testing::{client, session};
    use mockito::Server;

    const DASHBOARD: &str = r##"{
        "super_objective": "Allah SWT's Satisfaction",
        "personas": [
            {"id": 1, "name": "Worshipper", "arabic_name": "عابد", "domain": "Spiritual", "icon": "moon", "color": "#0f766e"},
            {"id": 2, "name": "Builder", "arabic_name": "", "domain": "Career", "icon": "hammer", "color": "#1d4ed8"}
        ],
        "schedule_blocks": [
            {"id": 10, "start_time": "05:00", "end_time": "06:00", "activity": "Fajr + Quran", "persona_id": 1, "is_prayer_block": true},
            {"id": 11, "start_time": "09:00", "end_time": "17:00", "activity": "Deep work", "persona_id": 2, "is_prayer_block": false}
        ],
        "non_negotiables_total": 4,
        "non_negotiables_checked_today": 1,
        "streaks": []
    }"##;

    fn loaded() -> DashboardView {
        let mut server = Server::new();
        server
            .mock("GET", "/api/v1/dashboard")
            .with_header("content-type", "application/json")
            .with_body(DASHBOARD)
            .create();
        DashboardView::load(&client(&server), &mut session()).unwrap()
    }

    #[test]
    fn snapshot_at_noon() {
        let view = loaded();
        let snap = view.snapshot(TimeOfDay::parse("12:00").unwrap());
        assert_eq!(snap.day_progress, 50.0);
        assert_eq!(snap.checked_percent, 25);
        let current = snap.current.unwrap();
        assert_eq!(current.block.id, 11);
        assert_eq!(current.persona.unwrap().name, "Builder");
        assert_eq!(current.progress.remaining, 300);
        assert!(current.in_progress);
        assert_eq!(snap.timeline.len(), 2);
    }

    #[test]
    fn fallback_block_is_flagged() {
        let view = loaded();
        let current = view.current(TimeOfDay::parse("03:00").unwrap()).unwrap();
        assert_eq!(current.block.id, 10);
        assert!(!current.in_progress);
    }
}
