use crate::client::ApiClient;
use crate::error::{NiyyahError, Result};
use crate::schedule::{block_progress, resolve_active_block, BlockProgress, ScheduleBlock};
use crate::session::Session;
use crate::time::TimeOfDay;
use crate::types::{NewScheduleBlock, ScheduleBlockPatch};
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScheduleView {
    pub blocks: Vec<ScheduleBlock>,
}

impl ScheduleView {
    pub fn from_blocks(blocks: Vec<ScheduleBlock>) -> Self {
        let mut view = Self { blocks };
        view.sort();
        view
    }

    pub fn load(api: &ApiClient, session: &mut Session) -> Result<Self> {
        let blocks: Vec<ScheduleBlock> = api.get(session, "/schedule")?;
        Ok(Self::from_blocks(blocks))
    }

    pub fn create(&self, api: &ApiClient, session: &mut Session, new: &NewScheduleBlock) -> Result<Self> {
        let created: ScheduleBlock = api.post(session, "/schedule", new)?;
        let mut blocks = self.blocks.clone();
        blocks.push(created);
        Ok(Self::from_blocks(blocks))
    }

    pub fn update(
        &self,
        api: &ApiClient,
        session: &mut Session,
        id: i64,
        patch: &ScheduleBlockPatch,
    ) -> Result<Self> {
        self.get(id)?;
        let updated: ScheduleBlock = api.patch(session, &format!("/schedule/{id}"), patch)?;
        let blocks = self
            .blocks
            .iter()
            .map(|b| if b.id == id { updated.clone() } else { b.clone() })
            .collect();
        Ok(Self::from_blocks(blocks))
    }

    pub fn delete(&self, api: &ApiClient, session: &mut Session, id: i64) -> Result<Self> {
        api.delete(session, &format!("/schedule/{id}"))?;
        let blocks = self.blocks.iter().filter(|b| b.id != id).cloned().collect();
        Ok(Self { blocks })
    }

    pub fn get(&self, id: i64) -> Result<&ScheduleBlock> {
        self.blocks
            .iter()
            .find(|b| b.id == id)
            .ok_or_else(|| NiyyahError::NotFound(format!("schedule block {id}")))
    }

    pub fn active(&self, now: TimeOfDay) -> Option<(&ScheduleBlock, BlockProgress)> {
        resolve_active_block(&self.blocks, now).map(|b| (b, block_progress(b, now)))
    }

    /// Keep the backend's ordering: by start time, stable for ties.
    fn sort(&mut self) {
        self.blocks.sort_by_key(|b| b.start_time);
    }
}
