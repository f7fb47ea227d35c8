pub mod commands;
pub mod handlers;
pub mod interactions;
pub mod members;
pub mod router;

use crate::config::Config;
use crate::database::StoreBackend;
use crate::ledger::Member;
use crate::scheduler::SharedLedger;
use crate::utils::format::{create_error_embed, create_reply, format_error_message};
use anyhow::Result;
use poise::serenity_prelude as serenity;
use router::{FishingEvent, Reply};

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

#[derive(Clone)]
pub struct Data {
    pub ledger: SharedLedger<StoreBackend>,
    pub config: Config,
}

impl Data {
    /// Runs one event against the ledger while holding its lock.
    pub async fn dispatch(&self, members: &[Member], event: FishingEvent) -> Reply {
        let mut ledger = self.ledger.lock().await;
        router::dispatch(&mut ledger, members, event).await
    }
}

/// Non-bot members of the guild the command came from. Replies with an
/// error and returns `None` when the list can't be fetched.
pub async fn guild_members(ctx: Context<'_>) -> Result<Option<Vec<Member>>, Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.send(
            poise::CreateReply::default()
                .content(format_error_message("This command only works in a server."))
                .ephemeral(true),
        )
        .await?;
        return Ok(None);
    };

    match members::fetch_directory(ctx.http(), guild_id).await {
        Ok(members) => Ok(Some(members)),
        Err(e) => {
            tracing::error!("Failed to fetch members of guild {}: {:?}", guild_id, e);
            let embed = create_error_embed("Error", &format!("Couldn't fetch the member list: {}", e));
            ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
                .await?;
            Ok(None)
        }
    }
}

pub async fn send_reply(ctx: Context<'_>, reply: Reply) -> Result<(), Error> {
    ctx.send(create_reply(reply)).await?;
    Ok(())
}

pub async fn create_bot(config: Config, ledger: SharedLedger<StoreBackend>) -> Result<serenity::Client> {
    let data = Data {
        ledger,
        config: config.clone(),
    };

    // Listing members for the status roster needs the privileged members intent.
    let intents = serenity::GatewayIntents::non_privileged() | serenity::GatewayIntents::GUILD_MEMBERS;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::fishing::fish(),
                commands::fishing::fishfor(),
                commands::fishing::fishoffline(),
                commands::status::checked(),
                commands::roster::addexternal(),
                commands::roster::removeexternal(),
                commands::roster::externals(),
            ],
            event_handler: |ctx, event, framework, data| {
                Box::pin(handlers::event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(|ctx, _ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                tracing::info!("Commands registered!");
                Ok(data)
            })
        })
        .build();

    let client = serenity::ClientBuilder::new(&config.discord_token, intents)
        .framework(framework)
        .await?;

    Ok(client)
}
