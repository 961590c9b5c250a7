use std::sync::Arc;

use tracing::warn;

use quiz_core::{Player, SessionReport};

use crate::api::{LeaderboardApi, ProgressApi, ProgressUpdate, ScoreSubmission};

/// Delivers a terminal session report to the leaderboard and progress
/// collaborators.
///
/// Delivery is fire-and-forget: failures are logged and swallowed, never
/// retried, and never surfaced to the completion screen already shown.
#[derive(Clone)]
pub struct ResultReporter {
    leaderboard: Arc<dyn LeaderboardApi>,
    progress: Arc<dyn ProgressApi>,
}

impl ResultReporter {
    #[must_use]
    pub fn new(leaderboard: Arc<dyn LeaderboardApi>, progress: Arc<dyn ProgressApi>) -> Self {
        Self {
            leaderboard,
            progress,
        }
    }

    /// Submit the score row and progress update for a finished session.
    pub async fn submit(&self, player: &Player, report: &SessionReport) {
        let submission = ScoreSubmission::from_report(player, report);
        if let Err(err) = self.leaderboard.submit_score(&submission).await {
            warn!(
                subject = %report.subject(),
                level = %report.level(),
                error = %err,
                "leaderboard submission failed"
            );
        }

        let update = ProgressUpdate::from_report(report);
        if let Err(err) = self.progress.submit_progress(&update).await {
            warn!(
                subject = %report.subject(),
                level = %report.level(),
                error = %err,
                "progress submission failed"
            );
        }
    }
}
