use serde::{Deserialize, Serialize};

/// Question category the responder recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Efficiency,
    Inventory,
    Cost,
    General,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Efficiency => "efficiency",
            Topic::Inventory => "inventory",
            Topic::Cost => "cost",
            Topic::General => "general",
        }
    }
}
