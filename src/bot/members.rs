use crate::ledger::Member;
use poise::serenity_prelude as serenity;

/// Discord returns at most this many members per request.
const PAGE_SIZE: u64 = 1000;

/// Every non-bot member of the guild, paging through the member list.
pub async fn fetch_directory(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
) -> Result<Vec<Member>, serenity::Error> {
    let mut directory = Vec::new();
    let mut after: Option<serenity::UserId> = None;

    loop {
        let page = guild_id.members(http, Some(PAGE_SIZE), after).await?;
        let fetched = page.len() as u64;
        after = page.last().map(|m| m.user.id);

        directory.extend(page.iter().filter(|m| !m.user.bot).map(to_member));

        if fetched < PAGE_SIZE || after.is_none() {
            break;
        }
    }

    tracing::debug!("Fetched {} members for guild {}", directory.len(), guild_id);
    Ok(directory)
}

pub fn to_member(member: &serenity::Member) -> Member {
    Member::new(member.user.id.get(), member.display_name())
}
