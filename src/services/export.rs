use crate::config::APP_NAME;
use crate::models::{Conversation, Role};

pub fn export_to_markdown(conversation: &Conversation) -> String {
    let mut output = format!("# {}\n\n", APP_NAME);
    output.push_str(&format!(
        "> Conversation: {} | Date: {}\n\n",
        conversation.id,
        conversation.created_at.format("%Y-%m-%d %H:%M")
    ));
    output.push_str("---\n\n");

    for turn in conversation.turns() {
        let role_label = match turn.role {
            Role::User => "You",
            Role::Assistant => "Assistant",
        };
        output.push_str(&format!(
            "### {} ({})\n\n{}\n\n",
            role_label,
            turn.timestamp.format("%H:%M"),
            turn.content
        ));

        for insight in &turn.insights {
            output.push_str(&format!(
                "- **{}: {}** {}\n",
                insight.kind.label(),
                insight.title,
                insight.body
            ));
        }
        if turn.has_insights() {
            output.push('\n');
        }
    }

    output
}
