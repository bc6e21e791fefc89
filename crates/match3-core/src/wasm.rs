//! WebAssembly bindings for the match-three engine.
//!
//! This module exposes the controller to JavaScript through wasm-bindgen. The
//! page drives `tick` from its own timer and renders from `getSnapshot`.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use crate::actions::GameEvent;
#[cfg(feature = "wasm")]
use crate::config::{Customizations, EngineConfig};
#[cfg(feature = "wasm")]
use crate::game::MatchGame;
#[cfg(any(feature = "wasm", test))]
use std::time::Duration;
#[cfg(feature = "wasm")]
use tracing::warn;

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// WASM-exposed game wrapper
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub struct WasmMatchGame {
    game: MatchGame,
    on_score_change: Option<js_sys::Function>,
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
impl WasmMatchGame {
    /// Create an idle game from the builder's customizations JSON
    #[wasm_bindgen(constructor)]
    pub fn new(customizations_json: &str) -> Result<WasmMatchGame, JsValue> {
        let customizations = Customizations::from_json(customizations_json)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let game = MatchGame::new(customizations, EngineConfig::default())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(WasmMatchGame {
            game,
            on_score_change: None,
        })
    }

    /// Register the `onScoreChange(score)` callback
    #[wasm_bindgen(js_name = setOnScoreChange)]
    pub fn set_on_score_change(&mut self, callback: js_sys::Function) {
        self.on_score_change = Some(callback);
    }

    pub fn start(&mut self) -> String {
        let events = self.game.start();
        self.publish(events)
    }

    pub fn reset(&mut self) -> String {
        let events = self.game.reset();
        self.publish(events)
    }

    /// Handle a click on a cell, returns events JSON
    #[wasm_bindgen(js_name = selectCell)]
    pub fn select_cell(&mut self, row: usize, col: usize) -> String {
        let events = self.game.select_cell(row, col);
        self.publish(events)
    }

    #[wasm_bindgen(js_name = forceCheckMatches)]
    pub fn force_check_matches(&mut self) -> String {
        let events = self.game.force_check_matches();
        self.publish(events)
    }

    /// Advance the engine clock by `ms` milliseconds
    pub fn tick(&mut self, ms: f64) -> String {
        let events = self.game.tick(elapsed_from_millis(ms));
        self.publish(events)
    }

    /// Grid, score and flags as JSON (for rendering)
    #[wasm_bindgen(js_name = getSnapshot)]
    pub fn get_snapshot(&self) -> String {
        serde_json::to_string(&self.game.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }

    #[wasm_bindgen(js_name = getScore)]
    pub fn get_score(&self) -> u32 {
        self.game.score()
    }

    #[wasm_bindgen(js_name = isAnimating)]
    pub fn is_animating(&self) -> bool {
        self.game.is_animating()
    }

    #[wasm_bindgen(js_name = isStarted)]
    pub fn is_started(&self) -> bool {
        self.game.is_started()
    }

    #[wasm_bindgen(js_name = getGridSize)]
    pub fn get_grid_size(&self) -> usize {
        self.game.grid_size()
    }

    /// CSS class for a tile color in the configured scheme
    #[wasm_bindgen(js_name = colorClass)]
    pub fn color_class(&self, color: u8) -> Option<String> {
        self.game.customizations().color_scheme.color_class(color)
    }

    /// Forward score changes to the JS callback and serialize the events
    fn publish(&self, events: Vec<GameEvent>) -> String {
        if let Some(callback) = &self.on_score_change {
            for score in events.iter().filter_map(GameEvent::score_change) {
                if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from(score)) {
                    warn!(score, error = ?e, "onScoreChange callback threw");
                }
            }
        }
        serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())
    }
}

/// Host timer delta to engine time; negative or non-finite values count as zero
#[cfg(any(feature = "wasm", test))]
fn elapsed_from_millis(ms: f64) -> Duration {
    Duration::try_from_secs_f64(ms / 1000.0).unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_from_millis() {
        assert_eq!(elapsed_from_millis(250.0), Duration::from_millis(250));
        assert_eq!(elapsed_from_millis(0.0), Duration::ZERO);
    }

    #[test]
    fn test_bad_host_deltas_count_as_zero() {
        assert_eq!(elapsed_from_millis(-16.0), Duration::ZERO);
        assert_eq!(elapsed_from_millis(f64::INFINITY), Duration::ZERO);
        assert_eq!(elapsed_from_millis(f64::NEG_INFINITY), Duration::ZERO);
        assert_eq!(elapsed_from_millis(f64::NAN), Duration::ZERO);
    }
}
