use uuid::Uuid;

/// Label reported for players without an authenticated identity.
pub const ANONYMOUS_LABEL: &str = "anonymous";

/// Identity attached to a session's final report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Player {
    /// An authenticated player with a stable identifier.
    Known { id: Uuid, name: String },
    /// A guest playing without signing in.
    Anonymous,
}

impl Player {
    #[must_use]
    pub fn known(id: Uuid, name: impl Into<String>) -> Self {
        Self::Known {
            id,
            name: name.into(),
        }
    }

    /// Display label used in leaderboard submissions.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Player::Known { name, .. } => name,
            Player::Anonymous => ANONYMOUS_LABEL,
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Player::Known { .. })
    }

    #[must_use]
    pub fn id(&self) -> Option<Uuid> {
        match self {
            Player::Known { id, .. } => Some(*id),
            Player::Anonymous => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_label_is_fixed() {
        assert_eq!(Player::Anonymous.label(), ANONYMOUS_LABEL);
        assert!(!Player::Anonymous.is_authenticated());
        assert!(Player::Anonymous.id().is_none());
    }

    #[test]
    fn known_player_reports_name() {
        let id = Uuid::new_v4();
        let player = Player::known(id, "Ada");
        assert_eq!(player.label(), "Ada");
        assert_eq!(player.id(), Some(id));
    }
}
