use crate::schedule::ScheduleBlock;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// DayType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayType {
    Weekday,
    Weekend,
    #[default]
    Daily,
}

impl DayType {
    pub fn as_str(self) -> &'static str {
        match self {
            DayType::Weekday => "weekday",
            DayType::Weekend => "weekend",
            DayType::Daily => "daily",
        }
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DayType {
    type Err = crate::error::NiyyahError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekday" => Ok(DayType::Weekday),
            "weekend" => Ok(DayType::Weekend),
            "daily" => Ok(DayType::Daily),
            _ => Err(crate::error::NiyyahError::InvalidDayType(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    Spiritual,
    Health,
    Growth,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Spiritual => "spiritual",
            Category::Health => "health",
            Category::Growth => "growth",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = crate::error::NiyyahError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spiritual" => Ok(Category::Spiritual),
            "health" => Ok(Category::Health),
            "growth" => Ok(Category::Growth),
            _ => Err(crate::error::NiyyahError::InvalidCategory(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Theme {
    type Err = crate::error::NiyyahError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            _ => Err(crate::error::NiyyahError::InvalidTheme(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionTier {
    #[default]
    Free,
    Pro,
}

impl SubscriptionTier {
    pub fn as_str(self) -> &'static str {
        match self {
            SubscriptionTier::Free => "free",
            SubscriptionTier::Pro => "pro",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub timezone: String,
    pub locale: String,
    #[serde(default)]
    pub subscription_tier: SubscriptionTier,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub timezone: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

// ---------------------------------------------------------------------------
// Persona / Milestone
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub arabic_name: String,
    pub domain: String,
    #[serde(default)]
    pub eventually: String,
    pub icon: String,
    pub color: String,
    pub one_thing: Option<String>,
    pub ritual: Option<String>,
    pub guardrail: Option<String>,
    #[serde(default)]
    pub points: Vec<String>,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: i64,
    pub persona_id: i64,
    pub target_date: Option<NaiveDate>,
    pub goal: String,
    #[serde(default)]
    pub is_completed: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NewPersona {
    pub name: String,
    pub arabic_name: String,
    pub domain: String,
    pub eventually: String,
    pub icon: String,
    pub color: String,
    pub one_thing: Option<String>,
    pub ritual: Option<String>,
    pub guardrail: Option<String>,
    pub points: Vec<String>,
}

impl NewPersona {
    /// Persona with the backend's default icon and colour.
    pub fn new(name: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: domain.into(),
            icon: "star".to_string(),
            color: "#e11d48".to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PersonaPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arabic_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eventually: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_thing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ritual: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guardrail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewMilestone {
    pub goal: String,
    pub target_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ReorderRequest<'a> {
    pub ids: &'a [i64],
}

// ---------------------------------------------------------------------------
// Schedule request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct NewScheduleBlock {
    pub persona_id: i64,
    pub start_time: crate::time::TimeOfDay,
    pub end_time: crate::time::TimeOfDay,
    pub activity: String,
    pub day_type: DayType,
    pub is_prayer_block: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScheduleBlockPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persona_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<crate::time::TimeOfDay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<crate::time::TimeOfDay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_type: Option<DayType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_prayer_block: Option<bool>,
}

// ---------------------------------------------------------------------------
// Principle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Principle {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub arabic: String,
    pub meaning: String,
    pub verse: Option<String>,
    pub icon: String,
    #[serde(default)]
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewPrinciple {
    pub name: String,
    pub arabic: String,
    pub meaning: String,
    pub verse: Option<String>,
    pub icon: String,
}

impl NewPrinciple {
    pub fn new(name: impl Into<String>, meaning: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arabic: String::new(),
            meaning: meaning.into(),
            verse: None,
            icon: "heart".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PrinciplePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arabic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meaning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verse: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

// ---------------------------------------------------------------------------
// Tracker
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonNegotiable {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub streak: Option<Streak>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Streak {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_check_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCheck {
    pub id: i64,
    pub non_negotiable_id: i64,
    pub check_date: NaiveDate,
    #[serde(default = "default_true")]
    pub is_completed: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerDay {
    pub date: NaiveDate,
    #[serde(default)]
    pub checks: Vec<DailyCheck>,
    #[serde(default)]
    pub non_negotiables: Vec<NonNegotiable>,
}

impl TrackerDay {
    /// The check recorded today for `non_negotiable_id`, if any.
    pub fn check_for(&self, non_negotiable_id: i64) -> Option<&DailyCheck> {
        self.checks
            .iter()
            .find(|c| c.non_negotiable_id == non_negotiable_id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewNonNegotiable {
    pub title: String,
    pub category: Category,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NonNegotiablePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckRequest {
    pub non_negotiable_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_date: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    pub super_objective: String,
    pub prayer_calculation_method: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub theme: Theme,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub super_objective: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prayer_calculation_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaSummary {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub arabic_name: String,
    pub domain: String,
    pub icon: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakSummary {
    pub title: String,
    pub current: u32,
    pub longest: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub super_objective: String,
    #[serde(default)]
    pub personas: Vec<PersonaSummary>,
    #[serde(default)]
    pub schedule_blocks: Vec<ScheduleBlock>,
    pub non_negotiables_total: u32,
    pub non_negotiables_checked_today: u32,
    #[serde(default)]
    pub streaks: Vec<StreakSummary>,
}

impl Dashboard {
    /// Share of today's non-negotiables already checked, rounded to a whole percent.
    pub fn checked_percent(&self) -> u32 {
        if self.non_negotiables_total == 0 {
            return 0;
        }
        let pct = f64::from(self.non_negotiables_checked_today)
            / f64::from(self.non_negotiables_total)
            * 100.0;
        pct.round() as u32
    }

    pub fn persona(&self, id: i64) -> Option<&PersonaSummary> {
        self.personas.iter().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dashboard(total: u32, checked: u32) -> Dashboard {
        Dashboard {
            super_objective: "Allah SWT's Satisfaction".into(),
            personas: vec![],
            schedule_blocks: vec![],
            non_negotiables_total: total,
            non_negotiables_checked_today: checked,
            streaks: vec![],
        }
    }

    #[test]
    fn checked_percent_rounds() {
        assert_eq!(dashboard(3, 1).checked_percent(), 33);
        assert_eq!(dashboard(3, 2).checked_percent(), 67);
        assert_eq!(dashboard(4, 4).checked_percent(), 100);
    }

    #[test]
    fn checked_percent_zero_total() {
        assert_eq!(dashboard(0, 0).checked_percent(), 0);
    }

    #[test]
    fn enums_roundtrip_through_str() {
        for d in [DayType::Weekday, DayType::Weekend, DayType::Daily] {
            assert_eq!(d.as_str().parse::<DayType>().unwrap(), d);
        }
        assert!("monthly".parse::<DayType>().is_err());
        assert_eq!("health".parse::<Category>().unwrap(), Category::Health);
        assert!("dim".parse::<Theme>().is_err());
    }

    #[test]
    fn patch_skips_unset_fields() {
        let patch = PersonaPatch {
            color: Some("#000000".into()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            serde_json::json!({ "color": "#000000" })
        );
    }

    #[test]
    fn dashboard_blocks_without_day_type_deserialize() {
        let json = serde_json::json!({
            "super_objective": "Focus",
            "personas": [{"id": 1, "name": "Scholar", "arabic_name": "", "domain": "Knowledge", "icon": "book", "color": "#111111"}],
            "schedule_blocks": [{"id": 7, "start_time": "05:00:00", "end_time": "06:00:00", "activity": "Fajr + Quran", "persona_id": 1, "is_prayer_block": true}],
            "non_negotiables_total": 2,
            "non_negotiables_checked_today": 1,
            "streaks": [{"title": "Quran", "current": 4, "longest": 9}]
        });
        let d: Dashboard = serde_json::from_value(json).unwrap();
        assert_eq!(d.schedule_blocks[0].day_type, DayType::Daily);
        assert_eq!(d.schedule_blocks[0].start_time.minutes(), 300);
        assert_eq!(d.persona(1).map(|p| p.name.as_str()), Some("Scholar"));
        assert!(d.persona(2).is_none());
    }
}
