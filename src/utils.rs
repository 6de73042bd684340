use crossterm::event::{KeyCode, KeyModifiers};
use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

/// Profile mode for the application (dev or prod)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Dev,
    Prod,
}

impl Profile {
    /// Directory name used under the platform config/data roots
    pub fn app_name(&self) -> &'static str {
        match self {
            Profile::Dev => "grow-tracker-dev",
            Profile::Prod => "grow-tracker",
        }
    }
}

/// Get the configuration directory path
/// If profile is Dev, uses "grow-tracker-dev" instead of "grow-tracker"
pub fn get_config_dir(profile: Profile) -> Option<PathBuf> {
    ProjectDirs::from("com", "grow-tracker", profile.app_name())
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the data directory path (database and log file live here)
pub fn get_data_dir(profile: Profile) -> Option<PathBuf> {
    ProjectDirs::from("com", "grow-tracker", profile.app_name())
        .map(|dirs| dirs.data_dir().to_path_buf())
}

/// Expand `~` in a path string to the user's home directory
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Parse a date string in ISO 8601 format (YYYY-MM-DD)
pub fn parse_date(date_str: &str) -> Result<chrono::NaiveDate, chrono::ParseError> {
    chrono::NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
}

/// Get the current date as an ISO 8601 string (YYYY-MM-DD)
pub fn get_current_date_string() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}

/// Get the current UTC time as a sortable timestamp (YYYY-MM-DD HH:MM:SS)
pub fn get_current_timestamp_string() -> String {
    chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a stored timestamp (YYYY-MM-DD HH:MM:SS); a bare date means midnight
pub fn parse_timestamp(value: &str) -> Result<chrono::NaiveDateTime, chrono::ParseError> {
    let value = value.trim();
    chrono::NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).or_else(|e| {
        parse_date(value)
            .map(|d| d.and_time(chrono::NaiveTime::MIN))
            .map_err(|_| e)
    })
}

/// Parsed key binding information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedKeyBinding {
    pub key_code: KeyCode,
    pub requires_ctrl: bool,
}

impl ParsedKeyBinding {
    /// Whether a pressed key matches this binding
    pub fn matches(&self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        if self.key_code != code {
            return false;
        }
        // Shifted characters arrive with SHIFT set; only the primary modifier is significant
        self.requires_ctrl == has_primary_modifier(modifiers)
    }
}

/// Check if a key event has the primary modifier (Ctrl on Windows/Linux, Option/Alt on macOS)
pub fn has_primary_modifier(modifiers: KeyModifiers) -> bool {
    #[cfg(target_os = "macos")]
    {
        modifiers.contains(KeyModifiers::CONTROL) || modifiers.contains(KeyModifiers::ALT)
    }

    #[cfg(not(target_os = "macos"))]
    {
        modifiers.contains(KeyModifiers::CONTROL)
    }
}

/// Format a key binding string for display, showing the platform-appropriate modifier
/// On macOS, "Ctrl+" is replaced with "Opt+"
pub fn format_key_binding_for_display(key_binding: &str) -> String {
    #[cfg(target_os = "macos")]
    {
        key_binding.replace("Ctrl+", "Opt+")
    }

    #[cfg(not(target_os = "macos"))]
    {
        key_binding.to_string()
    }
}

/// Parse a key binding string from config into a ParsedKeyBinding
/// Supports: single keys ("q", "w", "j", "k"), special keys ("Enter", "F1", "Up"),
/// and modifiers ("Ctrl+r")
pub fn parse_key_binding(key_str: &str) -> Result<ParsedKeyBinding, String> {
    let key_str = key_str.trim();

    if let Some(key_part) = key_str.strip_prefix("Ctrl+") {
        let key_code = parse_key_code(key_part)?;
        return Ok(ParsedKeyBinding {
            key_code,
            requires_ctrl: true,
        });
    }

    let key_code = parse_key_code(key_str)?;
    Ok(ParsedKeyBinding {
        key_code,
        requires_ctrl: false,
    })
}

/// Parse a key code from a string (without modifiers)
fn parse_key_code(key_str: &str) -> Result<KeyCode, String> {
    match key_str {
        "Enter" => Ok(KeyCode::Enter),
        "Esc" | "Escape" => Ok(KeyCode::Esc),
        "Backspace" => Ok(KeyCode::Backspace),
        "Tab" => Ok(KeyCode::Tab),
        "Space" | " " => Ok(KeyCode::Char(' ')),
        "Left" => Ok(KeyCode::Left),
        "Right" => Ok(KeyCode::Right),
        "Up" => Ok(KeyCode::Up),
        "Down" => Ok(KeyCode::Down),
        "Home" => Ok(KeyCode::Home),
        "End" => Ok(KeyCode::End),
        "PageUp" => Ok(KeyCode::PageUp),
        "PageDown" => Ok(KeyCode::PageDown),
        "Delete" => Ok(KeyCode::Delete),
        _ => {
            if let Some(n) = key_str.strip_prefix('F').and_then(|n| n.parse::<u8>().ok()) {
                if (1..=12).contains(&n) {
                    return Ok(KeyCode::F(n));
                }
            }
            let mut chars = key_str.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(KeyCode::Char(c)),
                (None, _) => Err("Empty key binding".to_string()),
                _ => Err(format!("Unknown key binding: {}", key_str)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_special_and_ctrl_keys() {
        assert_eq!(parse_key_binding("w").unwrap().key_code, KeyCode::Char('w'));
        assert_eq!(parse_key_binding("F1").unwrap().key_code, KeyCode::F(1));
        assert_eq!(parse_key_binding("Space").unwrap().key_code, KeyCode::Char(' '));

        let ctrl = parse_key_binding("Ctrl+r").unwrap();
        assert_eq!(ctrl.key_code, KeyCode::Char('r'));
        assert!(ctrl.requires_ctrl);
    }

    #[test]
    fn rejects_unknown_bindings() {
        assert!(parse_key_binding("").is_err());
        assert!(parse_key_binding("Hyper+x").is_err());
        assert!(parse_key_binding("F13").is_err());
    }

    #[test]
    fn binding_matches_respects_ctrl() {
        let binding = parse_key_binding("w").unwrap();
        assert!(binding.matches(KeyCode::Char('w'), KeyModifiers::NONE));
        assert!(!binding.matches(KeyCode::Char('w'), KeyModifiers::CONTROL));
        assert!(!binding.matches(KeyCode::Char('q'), KeyModifiers::NONE));
    }

    #[test]
    fn parse_date_accepts_iso_dates_only() {
        assert!(parse_date("2024-02-29").is_ok());
        assert!(parse_date(" 2024-03-01 ").is_ok());
        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("03/01/2024").is_err());
    }

    #[test]
    fn parse_timestamp_accepts_stored_format_and_bare_dates() {
        let full = parse_timestamp("2024-06-05 07:30:00").unwrap();
        assert_eq!(full.format(TIMESTAMP_FORMAT).to_string(), "2024-06-05 07:30:00");
        let bare = parse_timestamp("2024-06-05").unwrap();
        assert_eq!(bare.format(TIMESTAMP_FORMAT).to_string(), "2024-06-05 00:00:00");
        assert!(parse_timestamp("not a date").is_err());
        assert!(parse_timestamp("2024-06-05T07:30:00Z").is_err());
    }

    #[test]
    fn expand_path_leaves_absolute_paths_alone() {
        assert_eq!(expand_path("/tmp/grow.db"), PathBuf::from("/tmp/grow.db"));
    }
}
