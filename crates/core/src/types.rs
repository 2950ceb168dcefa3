use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_NICHE: &str = "Entertainment";

/// Niches offered by the input form. Any other string is accepted as well.
pub const NICHE_PRESETS: [&str; 5] = [
    "Entertainment",
    "Education",
    "Lifestyle/Vlog",
    "Tech/Gadgets",
    "Finance",
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    #[default]
    TikTok,
    YouTube,
    Instagram,
}

impl Platform {
    pub fn name(&self) -> &'static str {
        match self {
            Platform::TikTok => "TikTok",
            Platform::YouTube => "YouTube",
            Platform::Instagram => "Instagram",
        }
    }

    /// Name of the short-form surface the analysis targets.
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::TikTok => "TikTok",
            Platform::YouTube => "YouTube (Shorts)",
            Platform::Instagram => "Instagram Reels",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    pub description: String,
    pub hashtags: Vec<String>,
    pub niche: String,
    pub platform: Platform,
}

impl Default for VideoMetadata {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            hashtags: Vec::new(),
            niche: DEFAULT_NICHE.to_string(),
            platform: Platform::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreComponent {
    pub score: f64,
    pub label: String,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
}

impl ScoreComponent {
    pub fn band(&self) -> ScoreBand {
        ScoreBand::of(self.score)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreBand {
    Strong,
    Fair,
    Weak,
}

impl ScoreBand {
    pub fn of(score: f64) -> Self {
        if score >= 80.0 {
            ScoreBand::Strong
        } else if score >= 60.0 {
            ScoreBand::Fair
        } else {
            ScoreBand::Weak
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            ScoreBand::Strong => "#22c55e",
            ScoreBand::Fair => "#eab308",
            ScoreBand::Weak => "#ef4444",
        }
    }
}

/// Category of a retention timeline marker.
///
/// The provider schema declares this as a plain string, so unknown tags are
/// kept verbatim in `Other` rather than failing the whole report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IssueKind {
    Drop,
    Attention,
    LowQuality,
    Other(String),
}

impl From<String> for IssueKind {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "drop" => IssueKind::Drop,
            "attention" => IssueKind::Attention,
            "low-quality" => IssueKind::LowQuality,
            _ => IssueKind::Other(value),
        }
    }
}

impl From<IssueKind> for String {
    fn from(kind: IssueKind) -> Self {
        match kind {
            IssueKind::Drop => "drop".to_string(),
            IssueKind::Attention => "attention".to_string(),
            IssueKind::LowQuality => "low-quality".to_string(),
            IssueKind::Other(raw) => raw,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimelineIssue {
    pub timestamp: String,
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub message: String,
    pub color: String,
}

/// Same treatment as [`IssueKind`]: the schema only promises a string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    High,
    Medium,
    Low,
    Other(String),
}

impl From<String> for Priority {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "high" => Priority::High,
            "medium" => Priority::Medium,
            "low" => Priority::Low,
            _ => Priority::Other(value),
        }
    }
}

impl From<Priority> for String {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::High => "High".to_string(),
            Priority::Medium => "Medium".to_string(),
            Priority::Low => "Low".to_string(),
            Priority::Other(raw) => raw,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => f.write_str("High"),
            Priority::Medium => f.write_str("Medium"),
            Priority::Low => f.write_str("Low"),
            Priority::Other(raw) => f.write_str(raw),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionPlanItem {
    pub task: String,
    pub priority: Priority,
    pub impact: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedAssets {
    pub alternative_titles: Vec<String>,
    pub description_hook: String,
    pub optimized_hashtags: Vec<String>,
    pub thumbnail_prompt: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViralityReport {
    pub overall_score: f64,
    pub metadata_score: ScoreComponent,
    pub thumbnail_score: ScoreComponent,
    pub video_score: ScoreComponent,
    pub trend_score: ScoreComponent,
    pub timeline_issues: Vec<TimelineIssue>,
    pub action_plan: Vec<ActionPlanItem>,
    pub generated_assets: GeneratedAssets,
}

impl ViralityReport {
    /// The four sub-scores in display order.
    pub fn components(&self) -> [(&'static str, &ScoreComponent); 4] {
        [
            ("Metadata", &self.metadata_score),
            ("Thumbnail", &self.thumbnail_score),
            ("Video", &self.video_score),
            ("Trend", &self.trend_score),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metadata_matches_form_defaults() {
        let metadata = VideoMetadata::default();
        assert_eq!(metadata.title, "");
        assert_eq!(metadata.description, "");
        assert!(metadata.hashtags.is_empty());
        assert_eq!(metadata.niche, "Entertainment");
        assert_eq!(metadata.platform, Platform::TikTok);
    }

    #[test]
    fn score_bands_follow_thresholds() {
        assert_eq!(ScoreBand::of(80.0), ScoreBand::Strong);
        assert_eq!(ScoreBand::of(79.9), ScoreBand::Fair);
        assert_eq!(ScoreBand::of(60.0), ScoreBand::Fair);
        assert_eq!(ScoreBand::of(12.0), ScoreBand::Weak);
        assert_eq!(ScoreBand::Weak.color(), "#ef4444");
    }

    #[test]
    fn unknown_tags_are_kept_verbatim() {
        let issue: TimelineIssue = serde_json::from_value(serde_json::json!({
            "timestamp": "0:03",
            "type": "pacing",
            "message": "Slow intro",
            "color": "orange"
        }))
        .unwrap();
        assert_eq!(issue.kind, IssueKind::Other("pacing".to_string()));

        let item: ActionPlanItem = serde_json::from_value(serde_json::json!({
            "task": "Cut the intro",
            "priority": "high",
            "impact": "+20% retention"
        }))
        .unwrap();
        assert_eq!(item.priority, Priority::High);
    }

    #[test]
    fn issue_kind_serializes_back_to_wire_tag() {
        let value = serde_json::to_value(IssueKind::LowQuality).unwrap();
        assert_eq!(value, serde_json::json!("low-quality"));
    }
}
