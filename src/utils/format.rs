use crate::bot::router::Reply;
use crate::ledger::{CompletedEntry, ExternalRoster, StatusReport};
use poise::serenity_prelude as serenity;

/// Discord rejects embed field values longer than this.
const FIELD_VALUE_LIMIT: usize = 1024;

pub fn format_error_message(error: &str) -> String {
    format!("❌ **Error**: {}", error)
}

pub fn format_success_message(message: &str) -> String {
    format!("✅ {}", message)
}

pub fn format_info_message(message: &str) -> String {
    format!("ℹ️ {}", message)
}

pub fn format_completed_entry(entry: &CompletedEntry) -> String {
    match &entry.helper {
        Some(helper) => format!("{} ({})", entry.display_name, helper),
        None => entry.display_name.clone(),
    }
}

/// One name per line; lines that don't fit are summarised as "…and N more".
pub fn format_name_list(lines: &[String], empty: &str) -> String {
    if lines.is_empty() {
        return empty.to_string();
    }

    let mut value = String::new();
    for (i, line) in lines.iter().enumerate() {
        let remaining = lines.len() - i;
        let suffix = format!("\n…and {} more", remaining);
        let separator = usize::from(!value.is_empty());
        let needed = value.chars().count() + separator + line.chars().count();
        let reserve = if remaining > 1 { suffix.chars().count() } else { 0 };

        if needed + reserve > FIELD_VALUE_LIMIT {
            value.push_str(&suffix);
            return value;
        }
        if separator == 1 {
            value.push('\n');
        }
        value.push_str(line);
    }
    value
}

// Embed utility functions
pub fn create_error_embed(title: &str, description: &str) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(title)
        .description(description)
        .color(0xff0000) // Red
        .timestamp(chrono::Utc::now())
}

pub fn create_fish_prompt_embed() -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title("Fishing Activity")
        .description("Click the button below to mark your fishing as done for the day.")
        .color(0x1abc9c) // Aqua
}

pub fn create_status_embed(report: &StatusReport) -> serenity::CreateEmbed {
    let total = report.total();
    let fished: Vec<String> = report.completed.iter().map(format_completed_entry).collect();
    let not_fished: Vec<String> = report
        .pending
        .iter()
        .map(|p| p.display_name.clone())
        .collect();

    serenity::CreateEmbed::new()
        .title("Fishing Status")
        .description(format!("Here's the fishing status for today ({}):", report.day))
        .field(
            format!("🎣 Fished ({}/{}):", fished.len(), total),
            format_name_list(&fished, "No one has fished yet."),
            false,
        )
        .field(
            format!("❌ Not Fished ({}/{}):", not_fished.len(), total),
            format_name_list(&not_fished, "Everyone has fished!"),
            false,
        )
        .footer(serenity::CreateEmbedFooter::new(format!("Total: {} members", total)))
        .color(0x57f287) // Green
}

pub fn create_roster_embed(roster: &ExternalRoster) -> serenity::CreateEmbed {
    let names: Vec<String> = roster.iter().map(str::to_string).collect();
    serenity::CreateEmbed::new()
        .title("Offline Roster")
        .description(format_name_list(
            &names,
            "No offline participants yet. Add one with `/addexternal`.",
        ))
        .footer(serenity::CreateEmbedFooter::new(format!("{} names", roster.len())))
        .color(0x3498db) // Blue
}

pub fn create_reply(reply: Reply) -> poise::CreateReply {
    match reply {
        Reply::Message { content, ephemeral } => poise::CreateReply::default()
            .content(content)
            .ephemeral(ephemeral),
        Reply::Status(report) => poise::CreateReply::default().embed(create_status_embed(&report)),
    }
}

pub fn create_interaction_message(reply: Reply) -> serenity::CreateInteractionResponseMessage {
    match reply {
        Reply::Message { content, ephemeral } => serenity::CreateInteractionResponseMessage::new()
            .content(content)
            .ephemeral(ephemeral),
        Reply::Status(report) => {
            serenity::CreateInteractionResponseMessage::new().embed(create_status_embed(&report))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Participant;

    #[test]
    fn completed_entry_shows_helper_in_parentheses() {
        let helped = CompletedEntry {
            participant: Participant::Member(42),
            display_name: "Kenji".into(),
            helper: Some("Aiko".into()),
        };
        let alone = CompletedEntry {
            helper: None,
            ..helped.clone()
        };

        assert_eq!(format_completed_entry(&helped), "Kenji (Aiko)");
        assert_eq!(format_completed_entry(&alone), "Kenji");
    }

    #[test]
    fn name_list_uses_placeholder_when_empty() {
        assert_eq!(format_name_list(&[], "No one has fished yet."), "No one has fished yet.");
        assert_eq!(
            format_name_list(&["Kenji".into(), "Aiko".into()], ""),
            "Kenji\nAiko"
        );
    }

    #[test]
    fn long_lists_fit_in_a_field() {
        let names: Vec<String> = (0..200).map(|i| format!("Participant number {}", i)).collect();

        let value = format_name_list(&names, "");

        assert!(value.chars().count() <= FIELD_VALUE_LIMIT);
        assert!(value.starts_with("Participant number 0\n"));
        assert!(value.contains("more"));
    }
}
