use crate::bot::Data;
use crate::bot::Error;
use crate::bot::router::FishingEvent;
use crate::ledger::Participant;
use crate::utils::format::{create_interaction_message, format_error_message};
use poise::serenity_prelude as serenity;

pub const FISH_BUTTON_ID: &str = "fish_button";
pub const OFFLINE_SELECT_ID: &str = "offline_select";

pub async fn handle_fishing_interaction(
    ctx: &serenity::Context,
    interaction: &serenity::ComponentInteraction,
    data: &Data,
) -> Result<(), Error> {
    let actor = Participant::Member(interaction.user.id.get());

    let event = match interaction.data.custom_id.as_str() {
        FISH_BUTTON_ID => Some(FishingEvent::SelfMark { actor }),
        OFFLINE_SELECT_ID => selected_value(&interaction.data.kind)
            .map(|name| FishingEvent::MarkOffline { actor, name }),
        other => {
            tracing::warn!("Unknown component interaction: {}", other);
            None
        }
    };

    let message = match event {
        // Neither event needs the member directory: a self-mark names the
        // actor and an offline pick only matches roster entries.
        Some(event) => create_interaction_message(data.dispatch(&[], event).await),
        None => serenity::CreateInteractionResponseMessage::new()
            .content(format_error_message("This control is no longer supported."))
            .ephemeral(true),
    };

    interaction
        .create_response(&ctx.http, serenity::CreateInteractionResponse::Message(message))
        .await?;

    Ok(())
}

fn selected_value(kind: &serenity::ComponentInteractionDataKind) -> Option<String> {
    match kind {
        serenity::ComponentInteractionDataKind::StringSelect { values } => values.first().cloned(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_first_selected_name() {
        let kind = serenity::ComponentInteractionDataKind::StringSelect {
            values: vec!["Grandpa Joe".into()],
        };
        assert_eq!(selected_value(&kind).as_deref(), Some("Grandpa Joe"));
        assert_eq!(selected_value(&serenity::ComponentInteractionDataKind::Button), None);
    }
}
