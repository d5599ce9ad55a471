use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

/// Lifecycle of an engine. `GameOver` is only entered by a collision,
/// `Stopped` only by an explicit stop; both leave through a fresh start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Idle,
    Running,
    GameOver,
    Stopped,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub run_id: Uuid,
    pub phase: GamePhase,
    pub score: u32,
    pub background_offset: f64,
    pub frames: u64,
    pub run_started_at: Option<DateTime<Utc>>,
    pub run_ended_at: Option<DateTime<Utc>>,
    pub best_score: u32,
    pub runs_played: u32,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            phase: GamePhase::Idle,
            score: 0,
            background_offset: 0.0,
            frames: 0,
            run_started_at: None,
            run_ended_at: None,
            best_score: 0,
            runs_played: 0,
        }
    }

    /// Resets per-run counters. The background phase carries over.
    pub fn begin_run(&mut self) {
        self.run_id = Uuid::new_v4();
        self.phase = GamePhase::Running;
        self.score = 0;
        self.frames = 0;
        self.run_started_at = Some(Utc::now());
        self.run_ended_at = None;
        self.runs_played += 1;
    }

    pub fn end_run(&mut self, phase: GamePhase) {
        debug_assert!(matches!(phase, GamePhase::GameOver | GamePhase::Stopped));
        self.phase = phase;
        self.run_ended_at = Some(Utc::now());
        self.best_score = self.best_score.max(self.score);
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn add_point(&mut self) {
        self.score += 1;
    }

    pub fn scroll_background(&mut self, speed: f64, canvas_height: f64) {
        self.background_offset = (self.background_offset + speed) % canvas_height;
    }

    pub fn run_duration_seconds(&self) -> i64 {
        match self.run_started_at {
            Some(started) => {
                let ended = self.run_ended_at.unwrap_or_else(Utc::now);
                ended.signed_duration_since(started).num_seconds()
            }
            None => 0,
        }
    }

    pub fn get_statistics(&self) -> RunStatistics {
        RunStatistics {
            run_id: self.run_id,
            phase: self.phase,
            score: self.score,
            best_score: self.best_score.max(self.score),
            frames: self.frames,
            runs_played: self.runs_played,
            duration_seconds: self.run_duration_seconds(),
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStatistics {
    pub run_id: Uuid,
    pub phase: GamePhase,
    pub score: u32,
    pub best_score: u32,
    pub frames: u64,
    pub runs_played: u32,
    pub duration_seconds: i64,
}

impl RunStatistics {
    pub fn get_duration_formatted(&self) -> String {
        let minutes = self.duration_seconds / 60;
        let seconds = self.duration_seconds % 60;

        if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_state_creation() {
        let state = GameState::new();

        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.score, 0);
        assert!(!state.is_running());
        assert!(state.run_started_at.is_none());
    }

    #[test]
    fn test_run_lifecycle() {
        let mut state = GameState::new();
        let first_run = state.run_id;

        state.begin_run();
        assert!(state.is_running());
        assert_ne!(state.run_id, first_run);

        state.add_point();
        state.add_point();
        state.end_run(GamePhase::GameOver);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.score, 2);
        assert_eq!(state.best_score, 2);

        state.begin_run();
        assert_eq!(state.score, 0);
        assert_eq!(state.best_score, 2);
        assert_eq!(state.runs_played, 2);
    }

    #[test]
    fn test_background_wraps() {
        let mut state = GameState::new();
        for _ in 0..401 {
            state.scroll_background(2.0, 800.0);
        }
        assert_eq!(state.background_offset, 2.0);
    }

    #[test]
    fn test_statistics_formatting() {
        let mut state = GameState::new();
        state.begin_run();
        state.add_point();
        state.end_run(GamePhase::Stopped);

        let mut stats = state.get_statistics();
        assert_eq!(stats.score, 1);
        assert_eq!(stats.phase, GamePhase::Stopped);

        stats.duration_seconds = 75;
        assert_eq!(stats.get_duration_formatted(), "1m 15s");
        stats.duration_seconds = 9;
        assert_eq!(stats.get_duration_formatted(), "9s");
    }
}
