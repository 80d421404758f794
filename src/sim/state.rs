//! Run state and its transitions
//!
//! Everything the presentation layer reads about the current run lives here:
//! score, lives, combo multiplier, inventory and level progression. Fields are
//! public for reading; all mutation goes through the operations below.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::lanes_for;

/// Top-level run status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameStatus {
    /// Title screen, no run in progress
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    /// Player is inside the shop between levels
    Shop,
    /// Run ended by losing the last life
    GameOver,
    /// Final word completed on the last level
    Victory,
}

/// Items sold in the shop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShopItem {
    DoubleJump,
    MaxLife,
    Heal,
    Immortal,
}

impl ShopItem {
    pub const ALL: [ShopItem; 4] = [
        ShopItem::DoubleJump,
        ShopItem::MaxLife,
        ShopItem::Heal,
        ShopItem::Immortal,
    ];

    /// Shop price in score points
    pub fn cost(&self) -> u64 {
        match self {
            ShopItem::DoubleJump => 1000,
            ShopItem::MaxLife => 1500,
            ShopItem::Heal => 1000,
            ShopItem::Immortal => 3000,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShopItem::DoubleJump => "Double Jump",
            ShopItem::MaxLife => "Max Life Up",
            ShopItem::Heal => "Repair Hull",
            ShopItem::Immortal => "Immortality",
        }
    }
}

/// Authoritative state of a single run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    pub status: GameStatus,
    pub score: u64,
    pub lives: u32,
    pub max_lives: u32,
    /// World scroll rate (units/s)
    pub speed: f32,
    /// Current level (1..=MAX_LEVEL)
    pub level: u32,
    /// Odd number of lanes, grows by 2 per level
    pub lane_count: u32,
    /// Distinct letter indices collected this level, in pickup order
    pub collected_letters: Vec<usize>,
    pub multiplier: u32,
    /// Clock time (ms) after which the combo window is closed
    pub multiplier_end_ms: f64,
    pub gems_collected: u32,
    /// Display distance for the HUD
    pub distance: f32,
    pub has_double_jump: bool,
    pub has_immortality: bool,
    pub is_immortality_active: bool,
    /// Expiry of the current immortality activation
    #[serde(default)]
    immortality_end_ms: Option<f64>,
    /// Simulated clock (ms), advanced by the world step
    now_ms: f64,
    /// Bumped on every start/restart so observers can tell runs apart
    #[serde(default)]
    run_id: u64,
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}

impl RunState {
    /// Fresh state sitting in the menu
    pub fn new() -> Self {
        Self {
            status: GameStatus::Menu,
            score: 0,
            lives: START_LIVES,
            max_lives: START_LIVES,
            speed: 0.0,
            level: 1,
            lane_count: START_LANE_COUNT,
            collected_letters: Vec::with_capacity(WORD_LENGTH),
            multiplier: 1,
            multiplier_end_ms: 0.0,
            gems_collected: 0,
            distance: 0.0,
            has_double_jump: false,
            has_immortality: false,
            is_immortality_active: false,
            immortality_end_ms: None,
            now_ms: 0.0,
            run_id: 0,
        }
    }

    /// Current simulated clock in milliseconds
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Identifies the current run; changes on every start or restart
    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    /// Valid lane indices for the current lane count
    pub fn lanes(&self) -> Vec<i32> {
        lanes_for(self.lane_count)
    }

    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }

    /// Begin a run, discarding anything left from a previous one
    pub fn start_game(&mut self) {
        self.reset_run();
        self.run_id += 1;
        self.status = GameStatus::Playing;
        log::info!("Run started (lanes={}, speed={})", self.lane_count, self.speed);
    }

    /// Same as `start_game`; kept separate for the game-over/victory buttons
    pub fn restart_game(&mut self) {
        self.start_game();
    }

    fn reset_run(&mut self) {
        self.score = 0;
        self.lives = START_LIVES;
        self.max_lives = START_LIVES;
        self.speed = BASE_SPEED;
        self.level = 1;
        self.lane_count = START_LANE_COUNT;
        self.collected_letters.clear();
        self.multiplier = 1;
        self.multiplier_end_ms = 0.0;
        self.gems_collected = 0;
        self.distance = 0.0;
        self.has_double_jump = false;
        self.has_immortality = false;
        self.is_immortality_active = false;
        self.immortality_end_ms = None;
    }

    /// Advance the run clock and expire immortality at its timestamp
    pub fn advance_clock(&mut self, dt: f32) {
        self.now_ms += dt as f64 * 1000.0;
        if let Some(end) = self.immortality_end_ms {
            if self.now_ms >= end {
                self.is_immortality_active = false;
                self.immortality_end_ms = None;
            }
        }
    }

    /// Update the HUD distance counter
    pub fn record_distance(&mut self, distance: f32) {
        self.distance = distance;
    }

    /// Apply one hit. Returns true if a life (or the run) was lost.
    pub fn take_damage(&mut self) -> bool {
        if self.status != GameStatus::Playing || self.is_immortality_active {
            return false;
        }

        self.multiplier = 1;
        self.multiplier_end_ms = 0.0;

        if self.lives > 1 {
            self.lives -= 1;
        } else {
            self.lives = 0;
            self.status = GameStatus::GameOver;
            self.speed = 0.0;
            log::info!("Game over at level {} with score {}", self.level, self.score);
        }
        true
    }

    pub fn add_score(&mut self, amount: u64) {
        self.score += amount;
    }

    /// Combo rule shared by every pickup: returns `base * new multiplier`
    fn apply_combo(&mut self, base: u64) -> u64 {
        let active = self.now_ms < self.multiplier_end_ms;
        self.multiplier = if active {
            (self.multiplier + 1).min(MAX_MULTIPLIER)
        } else {
            1
        };
        self.multiplier_end_ms = self.now_ms + COMBO_WINDOW_MS;
        base * self.multiplier as u64
    }

    /// Score a gem through the combo rule. Returns the points awarded.
    pub fn collect_gem(&mut self, value: u64) -> u64 {
        let points = self.apply_combo(value);
        self.score += points;
        self.gems_collected += 1;
        points
    }

    /// Score a letter and record it. Duplicate indices still score but
    /// don't count toward the word.
    pub fn collect_letter(&mut self, index: usize) -> u64 {
        let points = self.apply_combo(LETTER_SCORE);
        self.score += points;

        if self.collected_letters.contains(&index) {
            return points;
        }

        self.collected_letters.push(index);
        self.speed += BASE_SPEED * 0.1;

        if self.collected_letters.len() >= WORD_LENGTH {
            if self.level < MAX_LEVEL {
                self.advance_level();
            } else {
                self.status = GameStatus::Victory;
                self.score += VICTORY_BONUS;
                log::info!("Victory! Final score {}", self.score);
            }
        }
        points
    }

    /// Move to the next level: more lanes, faster scroll, fresh word.
    /// No-op on the last level.
    pub fn advance_level(&mut self) {
        if self.level >= MAX_LEVEL {
            log::warn!("advance_level called on the final level");
            return;
        }
        self.level += 1;
        self.lane_count = (self.lane_count + 2).min(MAX_LANE_COUNT);
        self.speed += BASE_SPEED * 0.4;
        self.collected_letters.clear();
        self.status = GameStatus::Playing;
        log::info!(
            "Level {} reached (lanes={}, speed={})",
            self.level,
            self.lane_count,
            self.speed
        );
    }

    /// Drop the multiplier once its window has passed (called every frame)
    pub fn tick_combo(&mut self) {
        if self.status == GameStatus::Playing
            && self.multiplier > 1
            && self.now_ms >= self.multiplier_end_ms
        {
            self.multiplier = 1;
        }
    }

    /// Attempt a purchase. Returns false (and changes nothing) if the
    /// player can't afford it.
    pub fn buy_item(&mut self, item: ShopItem, cost: u64) -> bool {
        if self.score < cost {
            return false;
        }
        self.score -= cost;

        match item {
            ShopItem::DoubleJump => self.has_double_jump = true,
            ShopItem::MaxLife => {
                self.max_lives += 1;
                self.lives += 1;
            }
            ShopItem::Heal => self.lives = (self.lives + 1).min(self.max_lives),
            ShopItem::Immortal => self.has_immortality = true,
        }
        true
    }

    /// Start the timed invulnerability if owned and not already running
    pub fn activate_immortality(&mut self) {
        if !self.has_immortality || self.is_immortality_active {
            return;
        }
        self.is_immortality_active = true;
        self.immortality_end_ms = Some(self.now_ms + IMMORTALITY_DURATION_MS);
    }

    pub fn open_shop(&mut self) {
        if self.status == GameStatus::Playing {
            self.status = GameStatus::Shop;
            log::info!("Entered shop with {} points", self.score);
        }
    }

    pub fn close_shop(&mut self) {
        if self.status == GameStatus::Shop {
            self.status = GameStatus::Playing;
        }
    }

    pub fn go_to_menu(&mut self) {
        self.status = GameStatus::Menu;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn playing() -> RunState {
        let mut state = RunState::new();
        state.start_game();
        state
    }

    #[test]
    fn test_start_game_resets_everything() {
        let mut state = playing();
        state.score = 999;
        state.lives = 1;
        state.level = 3;
        state.lane_count = 7;
        state.collected_letters.push(2);
        state.has_double_jump = true;
        state.status = GameStatus::GameOver;

        state.restart_game();
        assert_eq!(state.status, GameStatus::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 3);
        assert_eq!(state.max_lives, 3);
        assert_eq!(state.level, 1);
        assert_eq!(state.lane_count, 3);
        assert_eq!(state.speed, BASE_SPEED);
        assert!(state.collected_letters.is_empty());
        assert!(!state.has_double_jump);
    }

    #[test]
    fn test_combo_example() {
        let mut state = playing();
        state.collect_gem(50);
        assert_eq!(state.score, 50);
        assert_eq!(state.multiplier, 1);

        state.advance_clock(0.05);
        state.collect_gem(50);
        assert_eq!(state.multiplier, 2);
        assert_eq!(state.score, 150);
        assert_eq!(state.gems_collected, 2);
    }

    #[test]
    fn test_combo_resets_after_gap() {
        let mut state = playing();
        state.collect_gem(10);
        state.advance_clock(0.1);
        state.collect_gem(10);
        assert_eq!(state.multiplier, 2);

        state.advance_clock((COMBO_WINDOW_MS / 1000.0) as f32);
        state.collect_gem(10);
        assert_eq!(state.multiplier, 1);
    }

    #[test]
    fn test_tick_combo_decays_when_idle() {
        let mut state = playing();
        state.collect_gem(10);
        state.advance_clock(0.1);
        state.collect_gem(10);
        assert_eq!(state.multiplier, 2);

        state.tick_combo();
        assert_eq!(state.multiplier, 2);

        state.advance_clock(2.5);
        state.tick_combo();
        assert_eq!(state.multiplier, 1);
    }

    #[test]
    fn test_damage_until_game_over() {
        let mut state = playing();
        assert!(state.take_damage());
        assert!(state.take_damage());
        assert_eq!(state.lives, 1);
        assert_eq!(state.status, GameStatus::Playing);

        state.take_damage();
        assert_eq!(state.lives, 0);
        assert_eq!(state.status, GameStatus::GameOver);
        assert_eq!(state.speed, 0.0);

        assert!(!state.take_damage());
        assert_eq!(state.lives, 0);
        assert_eq!(state.status, GameStatus::GameOver);
    }

    #[test]
    fn test_damage_resets_combo() {
        let mut state = playing();
        state.collect_gem(10);
        state.advance_clock(0.1);
        state.collect_gem(10);
        state.take_damage();
        assert_eq!(state.multiplier, 1);
        assert_eq!(state.multiplier_end_ms, 0.0);
    }

    #[test]
    fn test_immortality_blocks_damage_then_expires() {
        let mut state = playing();
        state.score = 5000;
        assert!(state.buy_item(ShopItem::Immortal, ShopItem::Immortal.cost()));
        state.collect_gem(10);
        state.advance_clock(0.1);
        state.collect_gem(10);
        let multiplier = state.multiplier;

        state.activate_immortality();
        assert!(state.is_immortality_active);
        assert!(!state.take_damage());
        assert_eq!(state.lives, 3);
        assert_eq!(state.multiplier, multiplier);

        state.advance_clock(4.9);
        assert!(state.is_immortality_active);
        state.advance_clock(0.2);
        assert!(!state.is_immortality_active);
        assert!(state.take_damage());
        assert_eq!(state.lives, 2);
    }

    #[test]
    fn test_immortality_requires_ownership() {
        let mut state = playing();
        state.activate_immortality();
        assert!(!state.is_immortality_active);
    }

    #[test]
    fn test_stale_immortality_does_not_leak_into_new_run() {
        let mut state = playing();
        state.has_immortality = true;
        state.activate_immortality();
        state.restart_game();
        assert!(!state.is_immortality_active);

        state.has_immortality = true;
        state.advance_clock(3.0);
        state.activate_immortality();
        // The old activation would have expired here; the new one must not.
        state.advance_clock(2.5);
        assert!(state.is_immortality_active);
    }

    #[test]
    fn test_full_word_advances_level_once() {
        let mut state = playing();
        for index in 0..WORD_LENGTH {
            state.collect_letter(index);
        }
        assert_eq!(state.level, 2);
        assert_eq!(state.lane_count, 5);
        assert!(state.collected_letters.is_empty());
        let expected = BASE_SPEED + BASE_SPEED * 0.1 * WORD_LENGTH as f32 + BASE_SPEED * 0.4;
        assert!((state.speed - expected).abs() < 1e-4);
        assert_eq!(state.status, GameStatus::Playing);
    }

    #[test]
    fn test_duplicate_letter_scores_without_progress() {
        let mut state = playing();
        state.collect_letter(1);
        let speed = state.speed;
        state.collect_letter(1);
        assert_eq!(state.collected_letters, vec![1]);
        assert_eq!(state.speed, speed);
        assert_eq!(state.score, 500 + 1000);
    }

    #[test]
    fn test_victory_on_last_level() {
        let mut state = playing();
        state.level = MAX_LEVEL;
        for index in 0..WORD_LENGTH - 1 {
            state.collect_letter(index);
        }
        let before = state.score;
        let points = state.collect_letter(WORD_LENGTH - 1);
        assert_eq!(state.status, GameStatus::Victory);
        assert_eq!(state.score, before + points + VICTORY_BONUS);
        assert_eq!(state.level, MAX_LEVEL);
    }

    #[test]
    fn test_level_and_lane_count_cap() {
        let mut state = playing();
        for _ in 0..6 {
            state.advance_level();
        }
        assert_eq!(state.level, MAX_LEVEL);
        assert_eq!(state.lane_count, 7);
        assert!(state.lane_count <= MAX_LANE_COUNT);
        let expected = BASE_SPEED + BASE_SPEED * 0.4 * (MAX_LEVEL - 1) as f32;
        assert!((state.speed - expected).abs() < 1e-4);
        assert_eq!(state.lanes(), (-3..=3).collect::<Vec<_>>());
    }

    #[test]
    fn test_restart_changes_run_id() {
        let mut state = RunState::new();
        assert_eq!(state.run_id(), 0);
        state.start_game();
        let first = state.run_id();
        state.restart_game();
        assert_ne!(state.run_id(), first);
    }

    #[test]
    fn test_buy_item_effects() {
        let mut state = playing();
        assert!(!state.buy_item(ShopItem::DoubleJump, 1000));
        assert_eq!(state.score, 0);

        state.score = 10_000;
        assert!(state.buy_item(ShopItem::DoubleJump, 1000));
        assert!(state.has_double_jump);
        assert!(state.buy_item(ShopItem::MaxLife, 1500));
        assert_eq!((state.lives, state.max_lives), (4, 4));
        assert!(state.buy_item(ShopItem::Heal, 1000));
        assert_eq!(state.lives, 4);
        assert_eq!(state.score, 10_000 - 3500);
    }

    #[test]
    fn test_shop_transitions() {
        let mut state = playing();
        state.close_shop();
        assert_eq!(state.status, GameStatus::Playing);
        state.open_shop();
        assert_eq!(state.status, GameStatus::Shop);
        state.close_shop();
        assert_eq!(state.status, GameStatus::Playing);
        state.go_to_menu();
        assert_eq!(state.status, GameStatus::Menu);
    }

    proptest! {
        #[test]
        fn prop_combo_climbs_then_plateaus(gaps in proptest::collection::vec(1u32..1999, 1..20)) {
            let mut state = playing();
            state.collect_gem(10);
            let mut expected = 1;
            for gap in gaps {
                state.advance_clock(gap as f32 / 1000.0);
                state.collect_gem(10);
                expected = (expected + 1).min(MAX_MULTIPLIER);
                prop_assert_eq!(state.multiplier, expected);
            }
        }

        #[test]
        fn prop_heal_never_exceeds_max(lives in 1u32..3, buys in 1usize..6) {
            let mut state = playing();
            state.lives = lives;
            state.score = 100_000;
            for _ in 0..buys {
                state.buy_item(ShopItem::Heal, 100);
                prop_assert!(state.lives <= state.max_lives);
            }
        }

        #[test]
        fn prop_purchase_rejected_when_short(score in 0u64..1000, extra in 1u64..1000) {
            let mut state = playing();
            state.score = score;
            prop_assert!(!state.buy_item(ShopItem::MaxLife, score + extra));
            prop_assert_eq!(state.score, score);
            prop_assert_eq!(state.max_lives, START_LIVES);
        }

        #[test]
        fn prop_damage_floors_at_zero(hits in 1usize..20) {
            let mut state = playing();
            for _ in 0..hits {
                state.take_damage();
            }
            prop_assert_eq!(state.lives, START_LIVES.saturating_sub(hits as u32));
            if hits as u32 >= START_LIVES {
                prop_assert_eq!(state.status, GameStatus::GameOver);
                prop_assert_eq!(state.speed, 0.0);
            }
        }
    }
}
