use anyhow::Result;

/// Discord caps select menu option labels at 100 characters, and roster
/// names are shown in the offline selection menu.
pub const MAX_EXTERNAL_NAME_CHARS: usize = 100;

/// Returns the trimmed name if it can go on the roster.
pub fn validate_external_name(name: &str) -> Result<&str> {
    let name = name.trim();

    if name.is_empty() {
        return Err(anyhow::anyhow!("Name must not be empty"));
    }

    if name.chars().count() > MAX_EXTERNAL_NAME_CHARS {
        return Err(anyhow::anyhow!(
            "Name must be at most {} characters",
            MAX_EXTERNAL_NAME_CHARS
        ));
    }

    if name.chars().any(char::is_control) {
        return Err(anyhow::anyhow!("Name must not contain control characters"));
    }

    Ok(name)
}
