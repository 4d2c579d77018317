//! Shared formatting helpers: palette, emoji lookup, truncation.

use crate::models::StateType;

/// Linear brand color.
pub const COLOR_BLUE: u32 = 0x005E_6AD2;
/// Success / created.
pub const COLOR_GREEN: u32 = 0x0022_C55E;
/// Warning / updated.
pub const COLOR_YELLOW: u32 = 0x00EA_B308;
/// Error / removed / urgent.
pub const COLOR_RED: u32 = 0x00EF_4444;
/// Neutral.
pub const COLOR_GRAY: u32 = 0x006B_7280;
/// Comments.
pub const COLOR_PURPLE: u32 = 0x008B_5CF6;

/// Avatar shown on every relayed message.
pub const LINEAR_AVATAR_URL: &str = "https://asset.brandfetch.io/ideiLNHwrW/id_xq4rBdb.png";

/// Group name used for issues without an assignee.
pub const UNASSIGNED: &str = "Unassigned";

const ELLIPSIS: &str = "...";

/// Shorten `s` to at most `max_chars` characters, ending in `...` when cut.
///
/// Counts characters rather than bytes so multi-byte text is never split.
#[must_use]
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let mut out: String = s.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Upper-case the first character of `word`.
#[must_use]
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Emoji for a workflow state category.
#[must_use]
pub const fn state_emoji(state_type: StateType) -> &'static str {
    match state_type {
        StateType::Backlog => "📥",
        StateType::Unstarted => "⚪",
        StateType::Started => "🔵",
        StateType::Completed => "✅",
        StateType::Canceled => "❌",
        StateType::Other => "📋",
    }
}

/// Emoji for a Linear priority value.
#[must_use]
pub const fn priority_emoji(priority: i32) -> &'static str {
    match priority {
        1 => "🔴",
        2 => "🟠",
        3 => "🟡",
        4 => "🟢",
        _ => "⬜",
    }
}

/// Emoji prefix for an assignee group.
#[must_use]
pub fn assignee_emoji(name: &str) -> &'static str {
    if name == UNASSIGNED {
        "❓"
    } else {
        "👤"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_strings_unchanged() {
        assert_eq!(truncate("", 10), "");
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
    }

    #[test]
    fn test_truncate_long_strings() {
        let out = truncate("The quick brown fox jumps", 10);
        assert_eq!(out, "The qui...");
        assert_eq!(out.chars().count(), 10);
    }

    #[test]
    fn test_truncate_is_idempotent() {
        let long = "a".repeat(1000);
        for limit in [5, 40, 50, 300, 500] {
            let once = truncate(&long, limit);
            assert_eq!(truncate(&once, limit), once);
        }
    }

    #[test]
    fn test_truncate_multibyte() {
        let s = "ééééééééééééééé";
        let out = truncate(s, 8);
        assert_eq!(out, "ééééé...");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("archive"), "Archive");
        assert_eq!(capitalize("Restore"), "Restore");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_priority_emoji() {
        assert_eq!(priority_emoji(0), "⬜");
        assert_eq!(priority_emoji(1), "🔴");
        assert_eq!(priority_emoji(2), "🟠");
        assert_eq!(priority_emoji(3), "🟡");
        assert_eq!(priority_emoji(4), "🟢");
        assert_eq!(priority_emoji(7), "⬜");
    }

    #[test]
    fn test_state_emoji() {
        assert_eq!(state_emoji(StateType::Started), "🔵");
        assert_eq!(state_emoji(StateType::Backlog), "📥");
        assert_eq!(state_emoji(StateType::Other), "📋");
    }
}
