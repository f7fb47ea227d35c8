use crate::bot::router::FishingEvent;
use crate::bot::{Context, Error, send_reply};
use crate::utils::format::{create_roster_embed, format_error_message};
use poise::serenity_prelude as serenity;

/// With ADMIN_ROLE_ID set, only holders of that role may edit the roster.
async fn roster_maintainer(ctx: Context<'_>) -> Result<bool, Error> {
    let Some(role_id) = ctx.data().config.admin_role_id else {
        return Ok(true);
    };

    let allowed = match ctx.author_member().await {
        Some(member) => member.roles.contains(&serenity::RoleId::new(role_id)),
        None => false,
    };

    if !allowed {
        tracing::warn!("{} tried to edit the roster without the admin role", ctx.author().name);
        ctx.send(
            poise::CreateReply::default()
                .content(format_error_message(
                    "You need the admin role to change the offline roster.",
                ))
                .ephemeral(true),
        )
        .await?;
    }
    Ok(allowed)
}

/// Add someone who isn't on Discord to the offline roster.
#[poise::command(slash_command, guild_only, check = "roster_maintainer")]
pub async fn addexternal(
    ctx: Context<'_>,
    #[description = "Name of the offline participant"] name: String,
) -> Result<(), Error> {
    let reply = ctx.data().dispatch(&[], FishingEvent::AddExternal { name }).await;
    send_reply(ctx, reply).await
}

/// Remove someone from the offline roster.
#[poise::command(slash_command, guild_only, check = "roster_maintainer")]
pub async fn removeexternal(
    ctx: Context<'_>,
    #[description = "Name of the offline participant"] name: String,
) -> Result<(), Error> {
    let reply = ctx.data().dispatch(&[], FishingEvent::RemoveExternal { name }).await;
    send_reply(ctx, reply).await
}

/// List the offline roster.
#[poise::command(slash_command)]
pub async fn externals(ctx: Context<'_>) -> Result<(), Error> {
    let roster = ctx.data().ledger.lock().await.roster().clone();
    ctx.send(
        poise::CreateReply::default()
            .embed(create_roster_embed(&roster))
            .ephemeral(true),
    )
    .await?;
    Ok(())
}
