use crate::bot::interactions::fishing_components::{FISH_BUTTON_ID, OFFLINE_SELECT_ID};
use crate::bot::router::FishingEvent;
use crate::bot::{Context, Error, guild_members, send_reply};
use crate::ledger::{Participant, TargetQuery};
use crate::utils::format::{create_fish_prompt_embed, format_error_message, format_info_message};
use crate::utils::roster_selector::RosterSelector;
use poise::serenity_prelude as serenity;

/// Start the fishing activity.
#[poise::command(slash_command)]
pub async fn fish(ctx: Context<'_>) -> Result<(), Error> {
    let components = vec![serenity::CreateActionRow::Buttons(vec![
        serenity::CreateButton::new(FISH_BUTTON_ID)
            .label("🎣 Mark Fishing as Done")
            .style(serenity::ButtonStyle::Primary),
    ])];

    ctx.send(
        poise::CreateReply::default()
            .embed(create_fish_prompt_embed())
            .components(components)
            .ephemeral(true),
    )
    .await?;

    Ok(())
}

/// Help someone else fish.
#[poise::command(slash_command, guild_only)]
pub async fn fishfor(
    ctx: Context<'_>,
    #[description = "The user you want to help fish"] target: Option<serenity::User>,
    #[description = "Name of a member or offline participant (instead of target)"] name: Option<String>,
) -> Result<(), Error> {
    let target = match target_query(target.map(|user| user.id.get()), name) {
        Ok(target) => target,
        Err(message) => {
            ctx.send(
                poise::CreateReply::default()
                    .content(format_error_message(message))
                    .ephemeral(true),
            )
            .await?;
            return Ok(());
        }
    };

    let Some(members) = guild_members(ctx).await? else {
        return Ok(());
    };

    let event = FishingEvent::MarkFor {
        actor: Participant::Member(ctx.author().id.get()),
        target,
    };
    let reply = ctx.data().dispatch(&members, event).await;
    send_reply(ctx, reply).await
}

/// Exactly one of the two `/fishfor` options must be given.
fn target_query(user: Option<u64>, name: Option<String>) -> Result<TargetQuery, &'static str> {
    match (user, name) {
        (Some(id), None) => Ok(TargetQuery::Member(id)),
        (None, Some(name)) => Ok(TargetQuery::Name(name)),
        (Some(_), Some(_)) => Err("Please use either `target` or `name`, not both."),
        (None, None) => Err("Please specify a valid user to fish for!"),
    }
}

/// Mark fishing as done for someone who isn't on Discord.
#[poise::command(slash_command, guild_only)]
pub async fn fishoffline(ctx: Context<'_>) -> Result<(), Error> {
    let roster = ctx.data().ledger.lock().await.roster().clone();
    let selector = RosterSelector::new(&roster);

    let builder = match selector.create_select_menu(OFFLINE_SELECT_ID, "Who went fishing?") {
        Some(menu) => poise::CreateReply::default()
            .content("🎣 Choose the offline participant you fished for:")
            .components(vec![serenity::CreateActionRow::SelectMenu(menu)]),
        None => poise::CreateReply::default().content(format_info_message(
            "No offline participants yet. Add one with `/addexternal`.",
        )),
    };

    ctx.send(builder.ephemeral(true)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fishfor_takes_exactly_one_option() {
        assert_eq!(target_query(Some(42), None), Ok(TargetQuery::Member(42)));
        assert_eq!(
            target_query(None, Some("Kenji".into())),
            Ok(TargetQuery::Name("Kenji".into()))
        );
        assert!(target_query(Some(42), Some("Kenji".into())).is_err());
        assert!(target_query(None, None).is_err());
    }
}
