use crate::ledger::ExternalRoster;
use poise::serenity_prelude as serenity;

/// Discord select menu limit is 25 options.
const MAX_OPTIONS: usize = 25;

pub struct RosterSelector {
    names: Vec<String>,
}

impl RosterSelector {
    pub fn new(roster: &ExternalRoster) -> Self {
        Self {
            names: roster.iter().take(MAX_OPTIONS).map(str::to_string).collect(),
        }
    }

    pub fn create_select_menu(
        &self,
        custom_id: &str,
        placeholder: &str,
    ) -> Option<serenity::CreateSelectMenu> {
        if self.names.is_empty() {
            return None;
        }

        let options = self
            .names
            .iter()
            .map(|name| serenity::CreateSelectMenuOption::new(name.as_str(), name.as_str()))
            .collect();

        Some(
            serenity::CreateSelectMenu::new(
                custom_id,
                serenity::CreateSelectMenuKind::String { options },
            )
            .placeholder(placeholder),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_roster_has_no_menu() {
        let selector = RosterSelector::new(&ExternalRoster::default());
        assert!(selector.names.is_empty());
        assert!(selector.create_select_menu("offline_select", "Pick").is_none());
    }

    #[test]
    fn caps_options_at_discord_limit() {
        let roster = ExternalRoster::new((0..30).map(|i| format!("Guest {}", i)).collect());
        let selector = RosterSelector::new(&roster);

        assert_eq!(selector.names.len(), 25);
        assert_eq!(selector.names[0], "Guest 0");
        assert!(selector.create_select_menu("offline_select", "Pick").is_some());
    }
}
