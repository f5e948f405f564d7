//! Paginator custom id encoding and parsing.
//!
//! Buttons and selects carry `pgn:{session}:{action}`, jump modals `pgnm:{session}`.

use std::{
    sync::{
        LazyLock,
        atomic::{AtomicU64, Ordering},
    },
    time::{SystemTime, UNIX_EPOCH},
};

/// Prefix routed to paginator component handlers.
pub const TOKEN_PREFIX: &str = "pgn:";
/// Prefix routed to paginator modal handlers.
pub const MODAL_TOKEN_PREFIX: &str = "pgnm:";
/// Custom id of the page number text input inside the jump modal.
pub const PAGE_INPUT_ID: &str = "page";

const CUSTOM_PREFIX: &str = "c:";

// Seeded from the clock so ids from a previous process do not match new sessions.
static NEXT_SESSION: LazyLock<AtomicU64> = LazyLock::new(|| AtomicU64::new(now_unix_millis()));

/// Allocate a process-unique session id.
pub fn next_session_id() -> u64 {
    NEXT_SESSION.fetch_add(1, Ordering::Relaxed)
}

/// What a paginator component asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginatorAction {
    First,
    Previous,
    /// Page indicator: opens the jump modal.
    Jump,
    Next,
    Last,
    Stop,
    /// Page indicator when switcher and stop are combined.
    OpenSwitcher,
    /// "Switch Page" inside the ephemeral switcher.
    SwitcherJump,
    /// "Stop" inside the ephemeral switcher.
    SwitcherStop,
    Select,
    Custom(String),
}

impl PaginatorAction {
    fn as_token(&self) -> String {
        match self {
            Self::First => "first".to_owned(),
            Self::Previous => "prev".to_owned(),
            Self::Jump => "jump".to_owned(),
            Self::Next => "next".to_owned(),
            Self::Last => "last".to_owned(),
            Self::Stop => "stop".to_owned(),
            Self::OpenSwitcher => "switch".to_owned(),
            Self::SwitcherJump => "cjump".to_owned(),
            Self::SwitcherStop => "cstop".to_owned(),
            Self::Select => "select".to_owned(),
            Self::Custom(id) => format!("{CUSTOM_PREFIX}{id}"),
        }
    }

    fn from_token(raw: &str) -> Option<Self> {
        if let Some(id) = raw.strip_prefix(CUSTOM_PREFIX) {
            return Some(Self::Custom(id.to_owned()));
        }

        Some(match raw {
            "first" => Self::First,
            "prev" => Self::Previous,
            "jump" => Self::Jump,
            "next" => Self::Next,
            "last" => Self::Last,
            "stop" => Self::Stop,
            "switch" => Self::OpenSwitcher,
            "cjump" => Self::SwitcherJump,
            "cstop" => Self::SwitcherStop,
            "select" => Self::Select,
            _ => return None,
        })
    }
}

/// Parsed paginator component custom id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginatorToken {
    pub session: u64,
    pub action: PaginatorAction,
}

pub fn build_custom_id(session: u64, action: &PaginatorAction) -> String {
    format!("{TOKEN_PREFIX}{session}:{}", action.as_token())
}

pub fn parse_custom_id(custom_id: &str) -> Option<PaginatorToken> {
    let rest = custom_id.strip_prefix(TOKEN_PREFIX)?;
    let (session, action) = rest.split_once(':')?;

    Some(PaginatorToken {
        session: session.parse().ok()?,
        action: PaginatorAction::from_token(action)?,
    })
}

pub fn build_modal_custom_id(session: u64) -> String {
    format!("{MODAL_TOKEN_PREFIX}{session}")
}

pub fn parse_modal_custom_id(custom_id: &str) -> Option<u64> {
    custom_id.strip_prefix(MODAL_TOKEN_PREFIX)?.parse().ok()
}

fn now_unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_ids_parse_back() {
        let id = build_custom_id(12, &PaginatorAction::OpenSwitcher);
        assert_eq!(id, "pgn:12:switch");
        assert_eq!(
            parse_custom_id(&id),
            Some(PaginatorToken {
                session: 12,
                action: PaginatorAction::OpenSwitcher,
            })
        );
    }

    #[test]
    fn custom_button_ids_keep_colons() {
        let token = parse_custom_id("pgn:3:c:vote:up").unwrap();
        assert_eq!(token.action, PaginatorAction::Custom("vote:up".to_owned()));
    }

    #[test]
    fn rejects_foreign_ids() {
        assert_eq!(parse_custom_id("pg:help:next:2:3:1:0"), None);
        assert_eq!(parse_custom_id("pgn:abc:next"), None);
        assert_eq!(parse_custom_id("pgn:1:sideways"), None);
        assert_eq!(parse_modal_custom_id("pgn:1:jump"), None);
        assert_eq!(parse_modal_custom_id(&build_modal_custom_id(9)), Some(9));
    }

    #[test]
    fn sessions_are_unique() {
        assert_ne!(next_session_id(), next_session_id());
    }
}
