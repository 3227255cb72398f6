//! Difficulty profiles and between-game adaptation
//!
//! The controller owns the effective [`DifficultyProfile`] the search plays
//! with. It only ever transitions between games: a sustained run of human
//! wins deepens the search by one ply up to the named level's ceiling, a
//! sustained run of losses shallows it down to a single ply, and a
//! hint-heavy game nudges the imperfection rate up so the agent becomes a
//! little more forgiving. The thresholds live in [`AdaptationTuning`]
//! rather than being baked into the transition rule.

use std::time::Duration;

use crate::search::{SearchConfig, DEFAULT_IMPERFECTION_TOLERANCE};

/// The player-facing difficulty names
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum DifficultyLevel {
    Easy,
    Medium,
    Hard,
}

impl DifficultyLevel {
    /// The profile a fresh session starts from
    pub fn base_profile(self) -> DifficultyProfile {
        match self {
            DifficultyLevel::Easy => DifficultyProfile {
                level: self,
                depth: 2,
                imperfection_rate: 0.35,
                time_budget: Duration::from_millis(500),
            },
            DifficultyLevel::Medium => DifficultyProfile {
                level: self,
                depth: 4,
                imperfection_rate: 0.15,
                time_budget: Duration::from_secs(2),
            },
            DifficultyLevel::Hard => DifficultyProfile {
                level: self,
                depth: 6,
                imperfection_rate: 0.0,
                time_budget: Duration::from_secs(5),
            },
        }
    }

    /// Hard ceiling on the adapted depth, below the next level's base
    /// depth so a level never silently turns into the one above it
    pub fn max_depth(self) -> u8 {
        match self {
            DifficultyLevel::Easy => 3,
            DifficultyLevel::Medium => 5,
            DifficultyLevel::Hard => 8,
        }
    }
}

/// The concrete knobs a difficulty level translates to
#[derive(Copy, Clone, Debug)]
pub struct DifficultyProfile {
    pub level: DifficultyLevel,
    pub depth: u8,
    pub imperfection_rate: f64,
    pub time_budget: Duration,
}

impl DifficultyProfile {
    /// The search configuration this profile stands for
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            depth: self.depth,
            time_budget: Some(self.time_budget),
            use_cache: true,
            imperfection_rate: self.imperfection_rate,
            imperfection_tolerance: DEFAULT_IMPERFECTION_TOLERANCE,
        }
    }
}

/// Named adaptation thresholds, adjustable per session
#[derive(Copy, Clone, Debug)]
pub struct AdaptationTuning {
    /// Consecutive human wins (or losses) that move the depth one ply
    pub streak_threshold: u32,
    /// Hints in a single game that count as heavy usage
    pub hint_nudge_threshold: u32,
    /// How much heavy hint usage raises the imperfection rate
    pub imperfection_step: f64,
    /// Upper limit the imperfection rate can be nudged to
    pub imperfection_cap: f64,
}

impl Default for AdaptationTuning {
    fn default() -> Self {
        Self {
            streak_threshold: 2,
            hint_nudge_threshold: 3,
            imperfection_step: 0.05,
            imperfection_cap: 0.5,
        }
    }
}

/// Who took a finished game
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Winner {
    Human,
    Machine,
    Draw,
}

/// Everything the presentation and persistence layers want to know about
/// one finished game
#[derive(Clone, Debug)]
pub struct GameSummary {
    pub winner: Winner,
    pub human_moves: u32,
    pub machine_moves: u32,
    pub machine_think_time: Duration,
    pub machine_nodes: usize,
    pub hints_used: u32,
    pub duration: Duration,
}

/// Rolling performance signals for the current session
#[derive(Clone, Debug, Default)]
pub struct PerformanceTracker {
    consecutive_human_wins: u32,
    consecutive_human_losses: u32,
    hints_used: u32,
    human_moves: u32,
    human_move_time: Duration,
    games_played: u32,
}

impl PerformanceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one human move and the time it took to enter it
    pub fn record_human_move(&mut self, latency: Duration) {
        self.human_moves += 1;
        self.human_move_time += latency;
    }

    pub fn record_hint(&mut self) {
        self.hints_used += 1;
    }

    /// Records a finished game; a draw breaks both streaks
    pub fn record_game(&mut self, winner: Winner) {
        self.games_played += 1;
        match winner {
            Winner::Human => {
                self.consecutive_human_wins += 1;
                self.consecutive_human_losses = 0;
            }
            Winner::Machine => {
                self.consecutive_human_losses += 1;
                self.consecutive_human_wins = 0;
            }
            Winner::Draw => {
                self.consecutive_human_wins = 0;
                self.consecutive_human_losses = 0;
            }
        }
    }

    pub fn consecutive_human_wins(&self) -> u32 {
        self.consecutive_human_wins
    }

    pub fn consecutive_human_losses(&self) -> u32 {
        self.consecutive_human_losses
    }

    pub fn hints_used(&self) -> u32 {
        self.hints_used
    }

    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    pub fn average_human_latency(&self) -> Option<Duration> {
        if self.human_moves == 0 {
            None
        } else {
            Some(self.human_move_time / self.human_moves)
        }
    }

    fn consume_win_streak(&mut self) {
        self.consecutive_human_wins = 0;
    }

    fn consume_loss_streak(&mut self) {
        self.consecutive_human_losses = 0;
    }
}

/// Retunes the effective difficulty between games
#[derive(Clone, Debug)]
pub struct AdaptiveDifficultyController {
    base: DifficultyProfile,
    effective: DifficultyProfile,
    tuning: AdaptationTuning,
}

impl AdaptiveDifficultyController {
    pub fn new(level: DifficultyLevel) -> Self {
        Self::with_tuning(level, AdaptationTuning::default())
    }

    pub fn with_tuning(level: DifficultyLevel, tuning: AdaptationTuning) -> Self {
        let base = level.base_profile();
        Self {
            base,
            effective: base,
            tuning,
        }
    }

    /// The profile the next machine move should be searched with
    pub fn profile(&self) -> &DifficultyProfile {
        &self.effective
    }

    /// The search configuration for the next machine move
    pub fn search_config(&self) -> SearchConfig {
        self.effective.search_config()
    }

    /// Applies the transition rule for one finished game. A streak that
    /// triggers a depth change is consumed; the hint nudge is independent
    /// of the win/loss adjustment.
    pub fn record_outcome(&mut self, summary: &GameSummary, tracker: &mut PerformanceTracker) {
        if tracker.consecutive_human_wins() >= self.tuning.streak_threshold {
            if self.effective.depth < self.base.level.max_depth() {
                self.effective.depth += 1;
            }
            tracker.consume_win_streak();
        } else if tracker.consecutive_human_losses() >= self.tuning.streak_threshold {
            if self.effective.depth > 1 {
                self.effective.depth -= 1;
            }
            tracker.consume_loss_streak();
        }

        if summary.hints_used >= self.tuning.hint_nudge_threshold {
            self.effective.imperfection_rate = (self.effective.imperfection_rate
                + self.tuning.imperfection_step)
                .min(self.tuning.imperfection_cap);
        }
    }

    /// Returns to the base profile selected by the user
    pub fn reset(&mut self) {
        self.effective = self.base;
    }
}

/// Session-scoped state threaded from the presentation layer into the
/// adaptation machinery: one tracker, one controller, explicit lifecycle.
#[derive(Clone, Debug)]
pub struct SessionContext {
    pub tracker: PerformanceTracker,
    pub controller: AdaptiveDifficultyController,
}

impl SessionContext {
    pub fn new(level: DifficultyLevel) -> Self {
        Self::with_tuning(level, AdaptationTuning::default())
    }

    pub fn with_tuning(level: DifficultyLevel, tuning: AdaptationTuning) -> Self {
        Self {
            tracker: PerformanceTracker::new(),
            controller: AdaptiveDifficultyController::with_tuning(level, tuning),
        }
    }

    /// Feeds one finished game into the tracker and the controller
    pub fn finish_game(&mut self, summary: &GameSummary) {
        self.tracker.record_game(summary.winner);
        self.controller.record_outcome(summary, &mut self.tracker);
    }

    /// Restarts the session: fresh tracker, base difficulty
    pub fn reset(&mut self) {
        self.tracker = PerformanceTracker::new();
        self.controller.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(winner: Winner, hints_used: u32) -> GameSummary {
        GameSummary {
            winner,
            human_moves: 12,
            machine_moves: 12,
            machine_think_time: Duration::from_millis(800),
            machine_nodes: 4_000,
            hints_used,
            duration: Duration::from_secs(90),
        }
    }

    #[test]
    fn win_streak_deepens_the_search_by_one_ply() {
        let mut session = SessionContext::new(DifficultyLevel::Medium);
        assert_eq!(session.controller.profile().depth, 4);

        session.finish_game(&summary(Winner::Human, 0));
        assert_eq!(session.controller.profile().depth, 4);
        session.finish_game(&summary(Winner::Human, 0));
        assert_eq!(session.controller.profile().depth, 5);
    }

    #[test]
    fn depth_is_capped_per_level() {
        let mut session = SessionContext::new(DifficultyLevel::Medium);
        for _ in 0..10 {
            session.finish_game(&summary(Winner::Human, 0));
        }
        assert_eq!(
            session.controller.profile().depth,
            DifficultyLevel::Medium.max_depth()
        );
        assert_eq!(session.controller.profile().level, DifficultyLevel::Medium);
    }

    #[test]
    fn loss_streak_shallows_the_search_down_to_one_ply() {
        let mut session = SessionContext::new(DifficultyLevel::Easy);
        for _ in 0..10 {
            session.finish_game(&summary(Winner::Machine, 0));
        }
        assert_eq!(session.controller.profile().depth, 1);
    }

    #[test]
    fn a_consumed_streak_must_build_up_again() {
        let mut session = SessionContext::new(DifficultyLevel::Medium);
        session.finish_game(&summary(Winner::Human, 0));
        session.finish_game(&summary(Winner::Human, 0));
        assert_eq!(session.controller.profile().depth, 5);

        // one more win is not a fresh streak
        session.finish_game(&summary(Winner::Human, 0));
        assert_eq!(session.controller.profile().depth, 5);
    }

    #[test]
    fn draws_break_both_streaks() {
        let mut session = SessionContext::new(DifficultyLevel::Medium);
        session.finish_game(&summary(Winner::Human, 0));
        session.finish_game(&summary(Winner::Draw, 0));
        session.finish_game(&summary(Winner::Human, 0));
        assert_eq!(session.controller.profile().depth, 4);
    }

    #[test]
    fn heavy_hint_usage_raises_the_imperfection_rate() {
        let mut session = SessionContext::new(DifficultyLevel::Easy);
        let base_rate = session.controller.profile().imperfection_rate;

        session.finish_game(&summary(Winner::Machine, 3));
        let nudged = session.controller.profile().imperfection_rate;
        assert!(nudged > base_rate);

        for _ in 0..20 {
            session.finish_game(&summary(Winner::Machine, 5));
        }
        let capped = session.controller.profile().imperfection_rate;
        assert!(capped <= AdaptationTuning::default().imperfection_cap);
    }

    #[test]
    fn light_hint_usage_leaves_the_rate_alone() {
        let mut session = SessionContext::new(DifficultyLevel::Easy);
        let base_rate = session.controller.profile().imperfection_rate;
        session.finish_game(&summary(Winner::Human, 2));
        assert_eq!(session.controller.profile().imperfection_rate, base_rate);
    }

    #[test]
    fn reset_returns_to_the_base_profile() {
        let mut session = SessionContext::new(DifficultyLevel::Medium);
        session.finish_game(&summary(Winner::Human, 4));
        session.finish_game(&summary(Winner::Human, 4));
        session.tracker.record_hint();
        session.reset();

        assert_eq!(session.controller.profile().depth, 4);
        assert_eq!(session.controller.profile().imperfection_rate, 0.15);
        assert_eq!(session.tracker.hints_used(), 0);
        assert_eq!(session.tracker.games_played(), 0);
    }

    #[test]
    fn tracker_reports_rolling_latency() {
        let mut tracker = PerformanceTracker::new();
        assert_eq!(tracker.average_human_latency(), None);
        tracker.record_human_move(Duration::from_secs(2));
        tracker.record_human_move(Duration::from_secs(4));
        assert_eq!(tracker.average_human_latency(), Some(Duration::from_secs(3)));
    }

    #[test]
    fn custom_tuning_is_honoured() {
        let tuning = AdaptationTuning {
            streak_threshold: 1,
            hint_nudge_threshold: 1,
            imperfection_step: 0.2,
            imperfection_cap: 0.25,
        };
        let mut session = SessionContext::with_tuning(DifficultyLevel::Easy, tuning);
        session.finish_game(&summary(Winner::Human, 1));
        assert_eq!(session.controller.profile().depth, 3);
        assert_eq!(session.controller.profile().imperfection_rate, 0.25);
    }
}
