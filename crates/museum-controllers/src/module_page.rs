//! Module page controller: entrance animation, scroll reveal, card and button feedback,
//! scroll progress bar, responsive card spacing, messages and loading overlays.

use crate::controller::Controller;
use crate::effect::{DomOp, Effect, Severity, Target, Toast};
use museum_core::LayoutMode;
use std::collections::BTreeSet;
use std::time::Duration;

pub const SECTION_SELECTORS: &[&str] = &[".module-header", ".content-section"];
pub const CARD_SELECTORS: &[&str] = &[
    ".structure-card",
    ".organelle-item",
    ".quiz-card",
    ".comparison-card",
];
/// Cards whose margin follows the layout mode.
pub const SPACED_CARD_SELECTORS: &[&str] = &[".structure-card", ".organelle-item"];
pub const BUTTON_SELECTORS: &[&str] = &[".btn-primary", ".btn-secondary"];

/// A card is revealed once its top edge is this far above the viewport bottom.
pub const REVEAL_THRESHOLD_PX: f64 = 150.0;

const SECTION_STAGGER: Duration = Duration::from_millis(200);
const BUTTON_PULSE: Duration = Duration::from_millis(150);

pub const MODULE_STYLESHEET_ID: &str = "module-animations";
const MODULE_STYLESHEET: &str = r#"
@keyframes loading {
    0% { left: -100%; }
    100% { left: 100%; }
}
@keyframes slideInRight {
    from { transform: translateX(100%); opacity: 0; }
    to { transform: translateX(0); opacity: 1; }
}
@keyframes slideOutRight {
    from { transform: translateX(0); opacity: 1; }
    to { transform: translateX(100%); opacity: 0; }
}
"#;

/// Scroll state sampled on a `scroll` event.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollSnapshot {
    pub scroll_y: f64,
    pub scroll_height: f64,
    pub viewport_height: f64,
    /// `getBoundingClientRect().top` of every card, in document order.
    pub card_tops: Vec<f64>,
}

/// Progress bar width in percent for the given scroll position.
pub fn scroll_progress(scroll_y: f64, scroll_height: f64, viewport_height: f64) -> f64 {
    let scrollable = scroll_height - viewport_height;
    if scrollable <= 0.0 || !scrollable.is_finite() {
        return 0.0;
    }
    (scroll_y / scrollable * 100.0).clamp(0.0, 100.0)
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModuleMsg {
    /// `window` load event; `sections` is the number of header/section elements.
    Loaded { sections: usize },
    RevealSection(usize),
    Scrolled(ScrollSnapshot),
    PointerEntered(usize),
    PointerLeft(usize),
    ButtonActivated(usize),
    ButtonReleased(usize),
    Resized(f64),
    ShowMessage { text: String, severity: Severity },
    /// Show the shimmer overlay on the element with this id.
    AttachLoader(String),
    DetachLoader(String),
}

#[derive(Debug, Clone, Default)]
pub struct ModuleController {
    revealed: BTreeSet<usize>,
    layout: Option<LayoutMode>,
    loaders: BTreeSet<String>,
}

impl ModuleController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layout(&self) -> Option<LayoutMode> {
        self.layout
    }

    pub fn is_revealed(&self, card: usize) -> bool {
        self.revealed.contains(&card)
    }

    fn card(index: usize) -> Target {
        Target::Nth(CARD_SELECTORS, index)
    }

    fn on_scroll(&mut self, snapshot: ScrollSnapshot, fx: &mut Vec<Effect<ModuleMsg>>) {
        let limit = snapshot.viewport_height - REVEAL_THRESHOLD_PX;
        for (index, top) in snapshot.card_tops.iter().enumerate() {
            if *top < limit && self.revealed.insert(index) {
                fx.push(Effect::add_class(Self::card(index), "bounce-in"));
            }
        }
        let percent = scroll_progress(
            snapshot.scroll_y,
            snapshot.scroll_height,
            snapshot.viewport_height,
        );
        fx.push(Effect::Dom(DomOp::SetProgress(percent)));
    }

    fn adjust_spacing(&mut self, viewport_width: f64, fx: &mut Vec<Effect<ModuleMsg>>) {
        let mode = LayoutMode::for_width(viewport_width);
        if self.layout == Some(mode) {
            return;
        }
        self.layout = Some(mode);
        let margin = match mode {
            LayoutMode::Mobile => "10px 0",
            LayoutMode::Desktop => "",
        };
        fx.push(Effect::style(Target::All(SPACED_CARD_SELECTORS), "margin", margin));
    }
}

impl Controller for ModuleController {
    type Msg = ModuleMsg;

    fn name(&self) -> &str {
        "module"
    }

    fn init(&mut self, viewport_width: f64, fx: &mut Vec<Effect<ModuleMsg>>) {
        fx.push(Effect::style(Target::Root, "scroll-behavior", "smooth"));
        fx.push(Effect::Dom(DomOp::InjectStyleSheet {
            id: MODULE_STYLESHEET_ID,
            css: MODULE_STYLESHEET,
        }));
        fx.push(Effect::Dom(DomOp::MountProgressBar));
        self.adjust_spacing(viewport_width, fx);
    }

    fn update(&mut self, msg: ModuleMsg, fx: &mut Vec<Effect<ModuleMsg>>) {
        match msg {
            ModuleMsg::Loaded { sections } => {
                for index in 0..sections {
                    fx.push(Effect::After {
                        delay: SECTION_STAGGER * index as u32,
                        msg: ModuleMsg::RevealSection(index),
                    });
                }
            }
            ModuleMsg::RevealSection(index) => {
                fx.push(Effect::add_class(Target::Nth(SECTION_SELECTORS, index), "fade-in"));
            }
            ModuleMsg::Scrolled(snapshot) => self.on_scroll(snapshot, fx),
            ModuleMsg::PointerEntered(index) => {
                fx.push(Effect::style(
                    Self::card(index),
                    "transform",
                    "translateY(-5px) scale(1.02)",
                ));
                fx.push(Effect::style(
                    Self::card(index),
                    "box-shadow",
                    "0 15px 35px rgba(0, 172, 193, 0.2)",
                ));
            }
            ModuleMsg::PointerLeft(index) => {
                fx.push(Effect::style(Self::card(index), "transform", ""));
                fx.push(Effect::style(Self::card(index), "box-shadow", ""));
            }
            ModuleMsg::ButtonActivated(index) => {
                fx.push(Effect::style(
                    Target::Nth(BUTTON_SELECTORS, index),
                    "transform",
                    "scale(0.95)",
                ));
                fx.push(Effect::After {
                    delay: BUTTON_PULSE,
                    msg: ModuleMsg::ButtonReleased(index),
                });
            }
            ModuleMsg::ButtonReleased(index) => {
                fx.push(Effect::style(Target::Nth(BUTTON_SELECTORS, index), "transform", ""));
            }
            ModuleMsg::Resized(width) => self.adjust_spacing(width, fx),
            ModuleMsg::ShowMessage { text, severity } => {
                fx.push(Effect::Toast(Toast::module(text, severity)));
            }
            ModuleMsg::AttachLoader(id) => {
                if !self.loaders.insert(id.clone()) {
                    return;
                }
                let target = Target::Id(id);
                fx.push(Effect::style(target.clone(), "position", "relative"));
                fx.push(Effect::style(target.clone(), "overflow", "hidden"));
                fx.push(Effect::Dom(DomOp::AttachLoader(target)));
            }
            ModuleMsg::DetachLoader(id) => {
                if self.loaders.remove(&id) {
                    fx.push(Effect::Dom(DomOp::DetachLoader(Target::Id(id))));
                }
            }
        }
    }
}
