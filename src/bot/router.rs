use crate::database::LedgerStore;
use crate::ledger::{
    AddOutcome, AttendanceLedger, LedgerError, MarkOutcome, Member, Participant, RemoveOutcome,
    SelfMarkOutcome, StatusReport, TargetQuery,
};
use crate::utils::format::{
    format_error_message, format_info_message, format_success_message,
};
use crate::utils::validation::MAX_EXTERNAL_NAME_CHARS;

/// An inbound request, already stripped of platform details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FishingEvent {
    SelfMark { actor: Participant },
    MarkFor { actor: Participant, target: TargetQuery },
    MarkOffline { actor: Participant, name: String },
    Status,
    AddExternal { name: String },
    RemoveExternal { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Message { content: String, ephemeral: bool },
    Status(StatusReport),
}

impl Reply {
    fn private(content: String) -> Self {
        Reply::Message {
            content,
            ephemeral: true,
        }
    }
}

/// Calls exactly one ledger operation for `event` and renders its outcome.
/// `members` is the guild directory with bots already removed.
pub async fn dispatch<S: LedgerStore>(
    ledger: &mut AttendanceLedger<S>,
    members: &[Member],
    event: FishingEvent,
) -> Reply {
    match event {
        FishingEvent::SelfMark { actor } => match ledger.mark_self(actor).await {
            Ok(SelfMarkOutcome::Marked) => Reply::private(format_success_message(
                "🎣 You marked your fishing as done for today!",
            )),
            Ok(SelfMarkOutcome::AlreadyMarked) => Reply::private(format_info_message(
                "You have already marked your fishing as done today!",
            )),
            Err(e) => save_failed(e),
        },
        FishingEvent::MarkFor { actor, target } => {
            let query = describe_query(&target);
            let outcome = ledger.mark_for(&target, actor, members).await;
            render_helped(ledger, members, outcome, &query)
        }
        FishingEvent::MarkOffline { actor, name } => {
            let target = TargetQuery::External(name.clone());
            let outcome = ledger.mark_for(&target, actor, members).await;
            render_helped(ledger, members, outcome, &name)
        }
        FishingEvent::Status => {
            let known = ledger.known_participants(members);
            Reply::Status(ledger.status(&known))
        }
        FishingEvent::AddExternal { name } => match ledger.add_external(&name).await {
            Ok(AddOutcome::Added(name)) => Reply::private(format_success_message(&format!(
                "Added **{}** to the offline roster.",
                name
            ))),
            Ok(AddOutcome::Duplicate(name)) => Reply::private(format_info_message(&format!(
                "**{}** is already on the offline roster.",
                name
            ))),
            Ok(AddOutcome::Invalid) => Reply::private(format_error_message(&format!(
                "Please give a name between 1 and {} characters.",
                MAX_EXTERNAL_NAME_CHARS
            ))),
            Err(e) => save_failed(e),
        },
        FishingEvent::RemoveExternal { name } => match ledger.remove_external(&name).await {
            Ok(RemoveOutcome::Removed(name)) => Reply::private(format_success_message(&format!(
                "Removed **{}** from the offline roster.",
                name
            ))),
            Ok(RemoveOutcome::NotFound) => Reply::private(format_error_message(&format!(
                "No one called `{}` is on the offline roster.",
                name.trim()
            ))),
            Err(e) => save_failed(e),
        },
    }
}

fn render_helped<S: LedgerStore>(
    ledger: &AttendanceLedger<S>,
    members: &[Member],
    outcome: Result<MarkOutcome, LedgerError>,
    query: &str,
) -> Reply {
    match outcome {
        Ok(MarkOutcome::Marked(target)) => Reply::private(format_success_message(&format!(
            "🎣 You helped {} fish for today!",
            display_name(ledger, members, &target)
        ))),
        Ok(MarkOutcome::AlreadyMarked(target)) => Reply::private(format_info_message(&format!(
            "{} has already fished today!",
            display_name(ledger, members, &target)
        ))),
        Ok(MarkOutcome::UnknownTarget) => unknown_target(query),
        Err(e) => save_failed(e),
    }
}

fn display_name<S: LedgerStore>(
    ledger: &AttendanceLedger<S>,
    members: &[Member],
    participant: &Participant,
) -> String {
    ledger
        .known_participants(members)
        .into_iter()
        .find(|k| &k.participant == participant)
        .map(|k| k.display_name)
        .unwrap_or_else(|| match participant {
            Participant::Member(id) => format!("<@{}>", id),
            Participant::External(name) => name.clone(),
        })
}

fn describe_query(target: &TargetQuery) -> String {
    match target {
        TargetQuery::Member(id) => format!("<@{}>", id),
        TargetQuery::Name(name) | TargetQuery::External(name) => name.trim().to_string(),
    }
}

fn unknown_target(query: &str) -> Reply {
    Reply::private(format_error_message(&format!(
        "Couldn't find anyone called `{}` to fish for.",
        query
    )))
}

fn save_failed(error: LedgerError) -> Reply {
    tracing::error!("Ledger operation failed: {}", error);
    Reply::private(format_error_message(
        "Couldn't save that right now, so nothing was changed. Please try again.",
    ))
}
