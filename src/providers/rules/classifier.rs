use crate::models::Topic;

/// Keyword rules in priority order. The first rule with a matching keyword
/// wins; anything unmatched is `Topic::General`.
const RULES: &[(&[&str], Topic)] = &[
    (&["oee", "efficiency"], Topic::Efficiency),
    (&["inventory", "materials"], Topic::Inventory),
    (&["cost", "profit"], Topic::Cost),
];

pub fn classify(query: &str) -> Topic {
    let normalized = query.to_lowercase();

    let topic = RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| normalized.contains(k)))
        .map(|(_, topic)| *topic)
        .unwrap_or(Topic::General);

    tracing::debug!(topic = topic.as_str(), "Classified query");
    topic
}
