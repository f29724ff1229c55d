use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Chart,
    Recommendation,
    #[serde(alias = "insight")]
    Observation,
}

impl InsightKind {
    /// Short label shown next to the attachment title.
    pub fn label(&self) -> &'static str {
        match self {
            InsightKind::Chart => "Chart",
            InsightKind::Recommendation => "Recommendation",
            InsightKind::Observation => "Insight",
        }
    }
}

/// A typed, titled snippet attached to an assistant turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub body: String,
}

impl Insight {
    pub fn new(kind: InsightKind, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            body: body.into(),
        }
    }
}
