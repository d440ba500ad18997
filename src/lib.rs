//! Soul Chain core crate.
//!
//! A small browser widget: the player is shown two fates chained side by side,
//! clicks one, and the chosen block drops into the void while the chain drags
//! the next dilemma into place. All choreography state lives in a pure,
//! natively-testable core under [`presenter`]; the DOM wiring is wasm-only.

use wasm_bindgen::prelude::*;

pub mod presenter;

pub use presenter::chain::{tile_count, CHAIN_BAND_HEIGHT, CHAIN_TILE_WIDTH};
pub use presenter::choreography::{ChoiceSide, Choreographer, Phase, SessionState, Slot, Viewport};
pub use presenter::timeline::{intro_plan, Ease, Timeline, TransitionPlan};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    #[cfg(target_arch = "wasm32")]
    let _ = console_log::init_with_level(log::Level::Info);
}

// -----------------------------------------------------------------------------
// Dilemma dataset
// One record per screen: two labelled fates. Order matters only for the cycling
// sequence; ids are stable labels for overlays / future content tooling.
// -----------------------------------------------------------------------------

/// A paired dilemma: two fates, one click.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DilemmaPair {
    pub id: u32,
    pub left: &'static str,
    pub right: &'static str,
}

pub const DILEMMAS: &[DilemmaPair] = &[
    DilemmaPair { id: 1, left: "Save the puppy", right: "Save the kitten" },
    DilemmaPair { id: 2, left: "Save the doctor", right: "Save the teacher" },
    DilemmaPair { id: 3, left: "Save the sailor", right: "Save the lighthouse keeper" },
    DilemmaPair { id: 4, left: "Save the poet", right: "Save the librarian" },
    DilemmaPair { id: 5, left: "Save the gardener", right: "Save the beekeeper" },
    DilemmaPair { id: 6, left: "Save the stranger", right: "Save the old friend" },
];

// -----------------------------------------------------------------------------
// Unified entrypoint
// -----------------------------------------------------------------------------

#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    // Mount the choice presenter into the current document.
    presenter::mount()
}
