//! Choice presenter: DOM wiring around the pure choreography core.
//!
//! This module owns the browser side of the widget: it builds the elements
//! (intro label, chain band, two slots of two fate blocks, counter overlay),
//! wires click and resize listeners, and runs a requestAnimationFrame loop
//! that samples the active timeline into element styles. All decisions —
//! busy guard, counter, index advance, slot flip — live in
//! [`choreography::Choreographer`]; this file only executes its plans.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, window};

pub mod chain;
pub mod choreography;
pub mod timeline;

use chain::{CHAIN_BAND_HEIGHT, CHAIN_TILE_WIDTH, band_offset, band_width, tile_count, tile_svg};
use choreography::{ChoiceSide, Choreographer, Phase, Slot, Viewport};
use timeline::{Prop, Target, Timeline, TransitionPlan};

use crate::{DILEMMAS, DilemmaPair};

const GOLD: &str = "#FFD700";
const SURFACE_BG: &str = "#111827";
const BLOCK_BG: &str = "rgba(17, 24, 39, 0.5)";
/// Distance from the chain band down to the block row.
const BLOCK_TOP_PX: f64 = 120.0;

// --- Per-element ids ---------------------------------------------------------

const ROOT_ID: &str = "sc-root";
const INTRO_ID: &str = "sc-intro";
const CHAIN_BAND_ID: &str = "sc-chain-band";
const CHAIN_STRIP_ID: &str = "sc-chain-strip";
const COUNTER_ID: &str = "sc-counter";

fn block_id(slot: Slot, side: ChoiceSide) -> &'static str {
    match (slot, side) {
        (Slot::A, ChoiceSide::Left) => "sc-block-a-left",
        (Slot::A, ChoiceSide::Right) => "sc-block-a-right",
        (Slot::B, ChoiceSide::Left) => "sc-block-b-left",
        (Slot::B, ChoiceSide::Right) => "sc-block-b-right",
    }
}

fn label_id(slot: Slot, side: ChoiceSide) -> &'static str {
    match (slot, side) {
        (Slot::A, ChoiceSide::Left) => "sc-label-a-left",
        (Slot::A, ChoiceSide::Right) => "sc-label-a-right",
        (Slot::B, ChoiceSide::Left) => "sc-label-b-left",
        (Slot::B, ChoiceSide::Right) => "sc-label-b-right",
    }
}

fn pair_text(pair: &DilemmaPair, side: ChoiceSide) -> &'static str {
    match side {
        ChoiceSide::Left => pair.left,
        ChoiceSide::Right => pair.right,
    }
}

// --- Runtime state -----------------------------------------------------------

struct ActiveTransition {
    plan: TransitionPlan,
    chosen: ChoiceSide,
    start_ms: f64,
}

struct PresenterState {
    choreographer: Choreographer,
    /// Running intro timeline, cleared once the label has left the surface.
    intro: Option<(Timeline, f64)>,
    transition: Option<ActiveTransition>,
}

// RefCell::new isn't const on this toolchain; allow Clippy lint until a const initializer is feasible.
thread_local! {
    static PRESENTER_STATE: std::cell::RefCell<Option<PresenterState>> =
        std::cell::RefCell::new(None);
}

type FrameCallback = std::rc::Rc<std::cell::RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

fn read_viewport() -> Viewport {
    let (mut w, mut h) = (1280.0, 720.0);
    if let Some(win) = window() {
        if let Some(px) = win.inner_width().ok().and_then(|v| v.as_f64()) {
            w = px;
        }
        if let Some(px) = win.inner_height().ok().and_then(|v| v.as_f64()) {
            h = px;
        }
    }
    Viewport { width: w, height: h }
}

// --- Mount -------------------------------------------------------------------

pub fn mount() -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let viewport = read_viewport();
    let choreographer = Choreographer::new(DILEMMAS.len(), viewport);

    build_surface(&doc, &choreographer)?;

    let now = now_ms();
    let intro = choreographer.intro_timeline();
    PRESENTER_STATE.with(|cell| {
        cell.replace(Some(PresenterState {
            choreographer,
            intro: Some((intro, now)),
            transition: None,
        }))
    });

    attach_click_listeners(&doc)?;
    attach_resize_listener(&win)?;
    start_presenter_loop();

    log::info!(
        "soul chain mounted: {} dilemmas, viewport {:.0}x{:.0}",
        DILEMMAS.len(),
        viewport.width,
        viewport.height
    );
    Ok(())
}

/// Create (or reuse) every element the widget needs. Play elements start
/// hidden behind the intro label and are revealed when the intro finishes.
fn build_surface(doc: &Document, ch: &Choreographer) -> Result<(), JsValue> {
    let body = doc
        .body()
        .ok_or_else(|| JsValue::from_str("no document body"))?;

    // Root container: full-viewport dark surface, clips the sliding chain.
    let root: Element = if let Some(el) = doc.get_element_by_id(ROOT_ID) {
        el
    } else {
        let el = doc.create_element("div")?;
        el.set_id(ROOT_ID);
        body.append_child(&el)?;
        el
    };
    root.set_attribute(
        "style",
        &format!("position:fixed; inset:0; overflow:hidden; background:{SURFACE_BG}; z-index:10;"),
    )?;

    // Chain band + tiled strip.
    if doc.get_element_by_id(CHAIN_BAND_ID).is_none() {
        let band = doc.create_element("div")?;
        band.set_id(CHAIN_BAND_ID);
        band.set_attribute(
            "style",
            &format!(
                "position:absolute; top:0; left:0; width:100%; height:{CHAIN_BAND_HEIGHT}px; overflow:hidden;"
            ),
        )?;
        let strip = doc.create_element("div")?;
        strip.set_id(CHAIN_STRIP_ID);
        band.append_child(&strip)?;
        root.append_child(&band)?;
    }
    retile_chain(doc, ch.viewport().width)?;

    // Intro label, centered; the first timeline drops it off the surface.
    if doc.get_element_by_id(INTRO_ID).is_none() {
        let intro = doc.create_element("div")?;
        intro.set_id(INTRO_ID);
        intro.set_text_content(Some("Choose Their Fate"));
        set_intro_style(&intro, 0.0, true)?;
        root.append_child(&intro)?;
    }

    // Two slots of two blocks. Only the active slot is visible at mount;
    // during the intro even that stays hidden.
    let first = &DILEMMAS[ch.current_index()];
    for slot in [Slot::A, Slot::B] {
        for side in [ChoiceSide::Left, ChoiceSide::Right] {
            if doc.get_element_by_id(block_id(slot, side)).is_none() {
                let block = doc.create_element("div")?;
                block.set_id(block_id(slot, side));
                // Hanging link down from the band + the fate label.
                block.set_inner_html(&format!(
                    "<div style=\"position:absolute; top:100%; left:50%; transform:translateX(-50%); width:2px; height:64px; background:{GOLD};\"></div>\
                     <div id=\"{label}\" style=\"padding:8px; text-align:center; font-size:14px; color:{GOLD};\"></div>",
                    label = label_id(slot, side),
                ));
                root.append_child(&block)?;
            }
            // Hidden behind the intro; the intro completion reveals the
            // active slot with click affordances.
            set_block_style(doc, slot, side, BlockPose::hidden())?;
            if slot == ch.active_slot() {
                set_label_text(doc, slot, side, pair_text(first, side));
            }
        }
    }

    // Counter overlay (top right), updated every frame. Hidden behind the
    // intro like the blocks; revealed once the intro finishes.
    if doc.get_element_by_id(COUNTER_ID).is_none() {
        let counter = doc.create_element("div")?;
        counter.set_id(COUNTER_ID);
        counter.set_text_content(Some("Souls released: 0"));
        root.append_child(&counter)?;
    }
    if let Some(counter) = doc.get_element_by_id(COUNTER_ID) {
        counter.set_attribute("style", &counter_style(false))?;
    }

    Ok(())
}

/// Rebuild the chain strip for the current viewport width: `ceil(3W / tile)`
/// tiles across a band three screens wide, shifted one screen to the left.
fn retile_chain(doc: &Document, viewport_w: f64) -> Result<(), JsValue> {
    if let Some(strip) = doc.get_element_by_id(CHAIN_STRIP_ID) {
        let n = tile_count(viewport_w, CHAIN_TILE_WIDTH);
        strip.set_inner_html(&tiles_html(n));
        strip.set_attribute("style", &strip_style(viewport_w, 0.0))?;
    }
    Ok(())
}

fn tiles_html(n: usize) -> String {
    let tile = format!(
        "<div style=\"flex:none; width:{CHAIN_TILE_WIDTH}px; height:{CHAIN_BAND_HEIGHT}px;\">{}</div>",
        tile_svg()
    );
    tile.repeat(n)
}

// --- Style writers -----------------------------------------------------------

/// Dynamic portion of a block's presentation for one frame.
struct BlockPose {
    x: f64,
    y: f64,
    rotation: f64,
    visible: bool,
    clickable: bool,
}

impl BlockPose {
    fn baseline(clickable: bool) -> Self {
        Self { x: 0.0, y: 0.0, rotation: 0.0, visible: clickable, clickable }
    }

    fn hidden() -> Self {
        Self { x: 0.0, y: 0.0, rotation: 0.0, visible: false, clickable: false }
    }
}

fn set_block_style(
    doc: &Document,
    slot: Slot,
    side: ChoiceSide,
    pose: BlockPose,
) -> Result<(), JsValue> {
    if let Some(el) = doc.get_element_by_id(block_id(slot, side)) {
        let left_pct = match side {
            ChoiceSide::Left => 33.333,
            ChoiceSide::Right => 66.667,
        };
        let style = format!(
            "position:absolute; left:{left_pct}%; top:{BLOCK_TOP_PX}px; width:96px; height:96px; \
             border:2px solid {GOLD}; background:{BLOCK_BG}; \
             transform:translateX(-50%) translate({x}px, {y}px) rotate({r}deg); \
             visibility:{vis}; pointer-events:{pe}; cursor:pointer;",
            x = pose.x,
            y = pose.y,
            r = pose.rotation,
            vis = if pose.visible { "visible" } else { "hidden" },
            pe = if pose.clickable { "auto" } else { "none" },
        );
        el.set_attribute("style", &style)?;
    }
    Ok(())
}

fn counter_style(visible: bool) -> String {
    format!(
        "position:absolute; top:16px; right:16px; font-size:20px; color:{GOLD}; z-index:30; \
         visibility:{vis};",
        vis = if visible { "visible" } else { "hidden" },
    )
}

fn set_label_text(doc: &Document, slot: Slot, side: ChoiceSide, text: &str) {
    if let Some(el) = doc.get_element_by_id(label_id(slot, side)) {
        el.set_text_content(Some(text));
    }
}

fn set_intro_style(el: &Element, y: f64, visible: bool) -> Result<(), JsValue> {
    el.set_attribute(
        "style",
        &format!(
            "position:absolute; left:50%; top:40%; \
             transform:translate(-50%, -50%) translateY({y}px); \
             font-size:40px; font-weight:bold; color:{GOLD}; \
             visibility:{vis}; pointer-events:none; z-index:40;",
            vis = if visible { "visible" } else { "hidden" },
        ),
    )?;
    Ok(())
}

/// Full strip style: baseline geometry (three screens wide, one screen to the
/// left) plus the animated horizontal shift.
fn strip_style(viewport_w: f64, x: f64) -> String {
    format!(
        "position:absolute; display:flex; width:{w}px; left:{left}px; transform:translateX({x}px);",
        w = band_width(viewport_w),
        left = band_offset(viewport_w),
    )
}

fn set_chain_offset(doc: &Document, viewport_w: f64, x: f64) {
    if let Some(strip) = doc.get_element_by_id(CHAIN_STRIP_ID) {
        let _ = strip.set_attribute("style", &strip_style(viewport_w, x));
    }
}

// --- Event wiring ------------------------------------------------------------

fn attach_click_listeners(doc: &Document) -> Result<(), JsValue> {
    for slot in [Slot::A, Slot::B] {
        for side in [ChoiceSide::Left, ChoiceSide::Right] {
            if let Some(el) = doc.get_element_by_id(block_id(slot, side)) {
                let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
                    on_block_click(slot, side);
                }) as Box<dyn FnMut(_)>);
                el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
                closure.forget();
            }
        }
    }
    Ok(())
}

fn attach_resize_listener(win: &web_sys::Window) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
        let viewport = read_viewport();
        PRESENTER_STATE.with(|cell| {
            if let Some(state) = cell.borrow_mut().as_mut() {
                // Geometry only: an in-flight transition keeps running.
                state.choreographer.set_viewport(viewport);
            }
        });
        if let Some(doc) = window().and_then(|w| w.document()) {
            let _ = retile_chain(&doc, viewport.width);
        }
        log::debug!("viewport resized to {:.0}px, chain re-tiled", viewport.width);
    }) as Box<dyn FnMut(_)>);
    win.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Click entry: defer everything to the choreographer, and when it accepts,
/// stage the next pair off-screen and start the clock on the plan.
fn on_block_click(slot: Slot, side: ChoiceSide) {
    PRESENTER_STATE.with(|cell| {
        if let Some(state) = cell.borrow_mut().as_mut() {
            if slot != state.choreographer.active_slot() {
                return;
            }
            let Some(plan) = state.choreographer.choose(side) else {
                return;
            };

            if let Some(doc) = window().and_then(|w| w.document()) {
                // Stage the incoming pair one screen to the left, visible but
                // not clickable until it lands. The departing pair keeps its
                // old text until completion.
                let staged = state.choreographer.staged_slot();
                let next = &DILEMMAS[state.choreographer.next_index()];
                let offscreen = -state.choreographer.viewport().width;
                for s in [ChoiceSide::Left, ChoiceSide::Right] {
                    set_label_text(&doc, staged, s, pair_text(next, s));
                    let _ = set_block_style(
                        &doc,
                        staged,
                        s,
                        BlockPose {
                            x: offscreen,
                            y: 0.0,
                            rotation: 0.0,
                            visible: true,
                            clickable: false,
                        },
                    );
                }
            }

            state.transition = Some(ActiveTransition {
                plan,
                chosen: side,
                start_ms: now_ms(),
            });
        }
    });
}

// --- Frame loop --------------------------------------------------------------

fn start_presenter_loop() {
    let f: FrameCallback = std::rc::Rc::new(std::cell::RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        PRESENTER_STATE.with(|cell| {
            if let Some(state) = cell.borrow_mut().as_mut() {
                presenter_tick(state, ts);
            }
        });
        if let Some(w) = window() {
            let _ =
                w.request_animation_frame(f.borrow().as_ref().unwrap().as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let Some(w) = window() {
        let _ = w.request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}

fn presenter_tick(state: &mut PresenterState, now: f64) {
    let Some(doc) = window().and_then(|w| w.document()) else {
        return;
    };

    advance_intro(state, &doc, now);
    advance_transition(state, &doc, now);

    // Counter overlay tracks the click-time count every frame.
    if let Some(el) = doc.get_element_by_id(COUNTER_ID) {
        el.set_text_content(Some(&format!(
            "Souls released: {}",
            state.choreographer.state().released_count
        )));
    }
}

fn advance_intro(state: &mut PresenterState, doc: &Document, now: f64) {
    let finished = match &state.intro {
        Some((tl, start)) => {
            let elapsed = now - *start;
            if let Some(intro_el) = doc.get_element_by_id(INTRO_ID) {
                let y = tl.value_of(Target::IntroLabel, Prop::Y, elapsed).unwrap_or(0.0);
                let _ = set_intro_style(&intro_el, y, !tl.finished(elapsed));
            }
            tl.finished(elapsed)
        }
        None => return,
    };
    if finished {
        state.intro = None;
        state.choreographer.complete_intro();
        debug_assert_eq!(state.choreographer.state().phase, Phase::Playing);
        // Reveal the play chrome: the active pair with click affordances,
        // plus the counter overlay.
        let active = state.choreographer.active_slot();
        for side in [ChoiceSide::Left, ChoiceSide::Right] {
            let _ = set_block_style(doc, active, side, BlockPose::baseline(true));
        }
        if let Some(counter) = doc.get_element_by_id(COUNTER_ID) {
            let _ = counter.set_attribute("style", &counter_style(true));
        }
    }
}

fn advance_transition(state: &mut PresenterState, doc: &Document, now: f64) {
    let Some(active) = &state.transition else {
        return;
    };
    let elapsed = now - active.start_ms;
    let viewport_w = state.choreographer.viewport().width;
    let slot = state.choreographer.active_slot();
    let staged = state.choreographer.staged_slot();
    let chosen = active.chosen;
    let other = match chosen {
        ChoiceSide::Left => ChoiceSide::Right,
        ChoiceSide::Right => ChoiceSide::Left,
    };

    if !active.plan.finished(elapsed) {
        let tl = &active.plan.timeline;
        let chosen_pose = BlockPose {
            x: 0.0,
            y: tl.value_of(Target::ChosenBlock, Prop::Y, elapsed).unwrap_or(0.0),
            rotation: tl
                .value_of(Target::ChosenBlock, Prop::Rotation, elapsed)
                .unwrap_or(0.0),
            visible: true,
            clickable: false,
        };
        let other_pose = BlockPose {
            x: tl.value_of(Target::OtherBlock, Prop::X, elapsed).unwrap_or(0.0),
            y: 0.0,
            rotation: 0.0,
            visible: true,
            clickable: false,
        };
        let next_x = tl.value_of(Target::NextSlot, Prop::X, elapsed).unwrap_or(0.0);
        let _ = set_block_style(doc, slot, chosen, chosen_pose);
        let _ = set_block_style(doc, slot, other, other_pose);
        for s in [ChoiceSide::Left, ChoiceSide::Right] {
            let _ = set_block_style(
                doc,
                staged,
                s,
                BlockPose { x: next_x, y: 0.0, rotation: 0.0, visible: true, clickable: false },
            );
        }
        set_chain_offset(
            doc,
            viewport_w,
            tl.value_of(Target::Chain, Prop::X, elapsed).unwrap_or(0.0),
        );
        return;
    }

    // Completion: chain snaps back to baseline, the departed pair hides, the
    // staged pair lands clickable, and the choreographer flips slot + index.
    set_chain_offset(doc, viewport_w, 0.0);
    for side in [ChoiceSide::Left, ChoiceSide::Right] {
        let _ = set_block_style(doc, slot, side, BlockPose::hidden());
        let _ = set_block_style(doc, staged, side, BlockPose::baseline(true));
    }
    state.transition = None;
    state.choreographer.complete_transition();
    debug_assert!(!state.choreographer.state().busy);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_and_label_ids_are_distinct() {
        let mut ids = std::collections::HashSet::new();
        for slot in [Slot::A, Slot::B] {
            for side in [ChoiceSide::Left, ChoiceSide::Right] {
                assert!(ids.insert(block_id(slot, side)));
                assert!(ids.insert(label_id(slot, side)));
            }
        }
        assert_eq!(ids.len(), 8);
    }

    #[test]
    fn tiles_html_repeats_one_svg_per_tile() {
        assert_eq!(tiles_html(0), "");
        let html = tiles_html(3);
        assert_eq!(html.matches("<svg").count(), 3);
    }

    #[test]
    fn counter_stays_hidden_until_revealed() {
        assert!(counter_style(false).contains("visibility:hidden"));
        assert!(counter_style(true).contains("visibility:visible"));
    }

    #[test]
    fn pair_text_picks_the_labelled_side() {
        let pair = DilemmaPair { id: 9, left: "l", right: "r" };
        assert_eq!(pair_text(&pair, ChoiceSide::Left), "l");
        assert_eq!(pair_text(&pair, ChoiceSide::Right), "r");
    }
}
