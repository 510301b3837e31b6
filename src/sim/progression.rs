//! Progression: per-tick timers, difficulty ramp, levels and achievements
//!
//! Timer phase of a tick, in order:
//! 1. invulnerability countdown (back to vulnerable at 0)
//! 2. combo decay (combo resets at 0)
//! 3. speed ramp from the score band
//! 4. level from score
//!
//! The ramp and level react to the score as it stood at the end of the
//! previous tick's collision phase.

use serde::Serialize;

use super::state::{GameEvent, GameState};
use crate::tuning::{SpeedRampPolicy, Tuning};

/// Run the timer phase of a tick
pub fn advance_timers(state: &mut GameState) {
    tick_invulnerability(state);
    tick_combo(state);
    apply_speed_ramp(state);
    update_level(state);
}

fn tick_invulnerability(state: &mut GameState) {
    let player = &mut state.player;
    if !player.invulnerable {
        return;
    }
    player.invulnerability_ticks = player.invulnerability_ticks.saturating_sub(1);
    if player.invulnerability_ticks == 0 {
        player.invulnerable = false;
        log::debug!("tick {}: player vulnerable again", state.time_ticks);
    }
}

fn tick_combo(state: &mut GameState) {
    let player = &mut state.player;
    if player.combo == 0 {
        return;
    }
    player.combo_ticks = player.combo_ticks.saturating_sub(1);
    if player.combo_ticks == 0 {
        log::debug!("tick {}: combo x{} expired", state.time_ticks, player.combo);
        player.combo = 0;
    }
}

/// Raise `game_speed` when the score enters a new threshold band
pub fn apply_speed_ramp(state: &mut GameState) {
    let tuning = &state.tuning;
    let band = state.score / tuning.speed_threshold;
    if band <= state.speed_band {
        return;
    }

    let steps = match tuning.ramp_policy {
        SpeedRampPolicy::OncePerCheck => 1,
        SpeedRampPolicy::PerBandCrossed => band - state.speed_band,
    };
    let target = (state.game_speed + tuning.speed_increment * steps as f32).min(tuning.max_speed);
    state.speed_band = band;

    if target > state.game_speed {
        state.game_speed = target;
        log::debug!("tick {}: game speed now {:.2}", state.time_ticks, target);
        state.emit(GameEvent::SpeedIncreased { speed: target });
    }
}

/// 1-based level for a score
pub fn level_for_score(score: u64, tuning: &Tuning) -> u32 {
    let level = 1 + score / tuning.points_per_level;
    u32::try_from(level).unwrap_or(u32::MAX)
}

fn update_level(state: &mut GameState) {
    let level = level_for_score(state.score, &state.tuning);
    while state.level < level {
        let completed = state.level;
        state.level += 1;
        log::info!("Level {completed} complete (score {})", state.score);
        state.emit(GameEvent::LevelComplete { level: completed });
    }
}

/// Threshold-based achievements awarded at session end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Achievement {
    #[serde(rename = "first_steps")]
    FirstSteps,
    #[serde(rename = "high_roller")]
    HighRoller,
    #[serde(rename = "legend")]
    Legend,
    #[serde(rename = "combo_5")]
    ComboFive,
    #[serde(rename = "combo_10")]
    ComboTen,
    #[serde(rename = "survivor")]
    Survivor,
    #[serde(rename = "untouchable")]
    Untouchable,
}

/// Ticks alive for `Survivor` (one minute at 60 Hz)
pub const SURVIVOR_TICKS: u64 = 3600;
/// Ticks without a hit for `Untouchable`
pub const UNTOUCHABLE_TICKS: u64 = 600;

impl Achievement {
    pub const ALL: [Achievement; 7] = [
        Achievement::FirstSteps,
        Achievement::HighRoller,
        Achievement::Legend,
        Achievement::ComboFive,
        Achievement::ComboTen,
        Achievement::Survivor,
        Achievement::Untouchable,
    ];

    /// Stable identifier reported to the host
    pub fn id(&self) -> &'static str {
        match self {
            Achievement::FirstSteps => "first_steps",
            Achievement::HighRoller => "high_roller",
            Achievement::Legend => "legend",
            Achievement::ComboFive => "combo_5",
            Achievement::ComboTen => "combo_10",
            Achievement::Survivor => "survivor",
            Achievement::Untouchable => "untouchable",
        }
    }

    fn earned(&self, state: &GameState) -> bool {
        match self {
            Achievement::FirstSteps => state.score >= 100,
            Achievement::HighRoller => state.score >= 500,
            Achievement::Legend => state.score >= 1000,
            Achievement::ComboFive => state.stats.max_combo >= 5,
            Achievement::ComboTen => state.stats.max_combo >= 10,
            Achievement::Survivor => state.time_ticks >= SURVIVOR_TICKS,
            Achievement::Untouchable => {
                state.stats.obstacles_hit == 0 && state.time_ticks >= UNTOUCHABLE_TICKS
            }
        }
    }
}

/// Every achievement the session has earned
pub fn achievements(state: &GameState) -> Vec<Achievement> {
    Achievement::ALL
        .iter()
        .copied()
        .filter(|a| a.earned(state))
        .collect()
}
