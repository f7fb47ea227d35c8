use crate::bot::router::FishingEvent;
use crate::bot::{Context, Error, guild_members, send_reply};

/// Check who has fished and who has not.
#[poise::command(slash_command, guild_only)]
pub async fn checked(ctx: Context<'_>) -> Result<(), Error> {
    let Some(members) = guild_members(ctx).await? else {
        return Ok(());
    };

    let reply = ctx.data().dispatch(&members, FishingEvent::Status).await;
    send_reply(ctx, reply).await
}
