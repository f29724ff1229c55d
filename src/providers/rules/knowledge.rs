use crate::models::{Insight, InsightKind, Topic};

/// Narrative and attachments produced for a topic.
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesis {
    pub narrative: String,
    pub insights: Vec<Insight>,
}

struct Entry {
    narrative: &'static str,
    insights: &'static [(InsightKind, &'static str, &'static str)],
}

static EFFICIENCY: Entry = Entry {
    narrative: "The recent drop in OEE is primarily due to increased downtime on Assembly Line A. \
Our analysis shows that the main causes are unplanned maintenance issues (42%), material shortages (28%), \
and operator availability (18%).",
    insights: &[
        (
            InsightKind::Chart,
            "OEE Trend Analysis",
            "The chart shows a 4.2% decline in OEE over the past week, with availability being the most affected component.",
        ),
        (
            InsightKind::Recommendation,
            "Recommended Actions",
            "Implement preventive maintenance on Assembly Line A and review material ordering processes to prevent shortages.",
        ),
    ],
};

static INVENTORY: Entry = Entry {
    narrative: "Your current inventory levels for raw materials are at 92% of optimal levels. \
However, I've detected that 3 critical materials (Aluminum Sheet 3mm, Plastic Resin Type B, and Circuit Board v2) \
are below their reorder points and require immediate attention.",
    insights: &[
        (
            InsightKind::Observation,
            "Critical Materials",
            "Aluminum Sheet 3mm (15 units), Plastic Resin Type B (18 units), and Circuit Board v2 (32 units) are below threshold levels.",
        ),
        (
            InsightKind::Recommendation,
            "Order Recommendation",
            "Place orders for these materials within the next 48 hours to avoid production disruptions.",
        ),
    ],
};

static COST: Entry = Entry {
    narrative: "Your current cost per unit is $12.47, which is 24.7% above your target of $10.00. \
The main cost drivers are raw materials (38.7%), labor (29.3%), and overhead (16.8%). \
I've identified several optimization opportunities that could reduce costs by up to $0.85 per unit.",
    insights: &[
        (
            InsightKind::Chart,
            "Cost Breakdown Analysis",
            "Raw materials and labor costs have increased by 5.2% and 3.8% respectively compared to last quarter.",
        ),
        (
            InsightKind::Recommendation,
            "Cost Reduction Opportunities",
            "Material substitution ($0.42/unit), process optimization ($0.28/unit), and supplier negotiation ($0.15/unit) could reduce total costs by 6.8%.",
        ),
    ],
};

/// Headline dashboard figures quoted by the general overview.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadlineMetrics {
    pub efficiency_pct: f64,
    pub efficiency_target_pct: f64,
    pub inventory_pct: f64,
    pub materials_below_reorder: u32,
    pub cost_per_unit: f64,
    pub cost_target: f64,
}

pub const HEADLINE_METRICS: HeadlineMetrics = HeadlineMetrics {
    efficiency_pct: 78.3,
    efficiency_target_pct: 85.0,
    inventory_pct: 92.0,
    materials_below_reorder: 3,
    cost_per_unit: 12.47,
    cost_target: 10.00,
};

impl HeadlineMetrics {
    pub fn overview(&self) -> String {
        format!(
            "Based on your current manufacturing data, I've identified several areas for improvement. \
Your production efficiency is at {}% (target: {}%), inventory levels are at {}% with {} materials below reorder points, \
and your cost per unit is ${:.2} (target: ${:.2}). \
Would you like me to provide more specific insights on any of these areas?",
            self.efficiency_pct,
            self.efficiency_target_pct,
            self.inventory_pct,
            self.materials_below_reorder,
            self.cost_per_unit,
            self.cost_target,
        )
    }
}

fn entry(topic: Topic) -> Option<&'static Entry> {
    match topic {
        Topic::Efficiency => Some(&EFFICIENCY),
        Topic::Inventory => Some(&INVENTORY),
        Topic::Cost => Some(&COST),
        Topic::General => None,
    }
}

pub fn synthesize(topic: Topic) -> Synthesis {
    match entry(topic) {
        Some(entry) => Synthesis {
            narrative: entry.narrative.to_string(),
            insights: entry
                .insights
                .iter()
                .map(|(kind, title, body)| Insight::new(*kind, *title, *body))
                .collect(),
        },
        None => Synthesis {
            narrative: HEADLINE_METRICS.overview(),
            insights: Vec::new(),
        },
    }
}
