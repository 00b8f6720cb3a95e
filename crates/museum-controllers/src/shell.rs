//! Shell page controller: sidebar navigation across the four halls, keyword search with
//! live (debounced) input, the embedded content frame, and the responsive sidebar.

use crate::controller::Controller;
use crate::effect::{DomOp, Effect, Target, Toast};
use museum_core::{KeywordIndex, LayoutMode, ModuleId, SearchQuery};
use std::time::Duration;

/// Quiet period after the last keystroke before live search runs.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(500);
/// Time given to a newly selected module to load before highlighting in it.
pub const SWITCH_SETTLE_DELAY: Duration = Duration::from_millis(1000);

const LOADING_HOLD: Duration = Duration::from_millis(1000);
const LOADING_FADE: Duration = Duration::from_millis(500);
const CHROME_STAGGER: Duration = Duration::from_millis(200);
const PULSE_SETTLE: Duration = Duration::from_millis(100);

/// Page chrome revealed one after another once the loading screen is gone.
pub const CHROME_SELECTORS: &[&str] = &[".header", ".sidebar", ".main-content", ".footer"];

const LOADING_SCREEN: &str = "loading-screen";
const MAIN_CONTAINER: &str = "main-container";
const CONTENT_FRAME: &str = "content-frame";

pub const SHELL_STYLESHEET_ID: &str = "shell-animations";
const SHELL_STYLESHEET: &str = r#"
@keyframes slideInRight {
    from { transform: translateX(100%); opacity: 0; }
    to { transform: translateX(0); opacity: 1; }
}

.content-frame {
    transition: opacity 0.3s ease, transform 0.3s ease;
}
"#;

pub fn too_short_message() -> String {
    "请输入至少2个字符进行搜索".to_string()
}

pub fn not_found_message(query: &str) -> String {
    format!("未找到与\"{query}\"相关的内容")
}

pub fn found_in_current_message(count: usize) -> String {
    format!("在当前模块找到 {count} 个相关结果")
}

pub fn switch_prompt(module: ModuleId) -> String {
    format!("在{}中找到相关结果，是否切换到该模块？", module.display_name())
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShellMsg {
    /// `window` load event.
    WindowLoaded,
    LoadingFaded,
    RevealChrome(usize),
    /// Click on the navigation entry carrying this module.
    NavActivated(ModuleId),
    /// The embedded frame finished loading its document.
    FrameLoaded,
    TransitionSettled,
    /// Search button click or Enter in the search box.
    SearchSubmitted(String),
    /// Every `input` event of the search box.
    SearchInput(String),
    DebounceElapsed(u64),
    SwitchAccepted { module: ModuleId, query: String },
    HighlightAfterSwitch(String),
    Resized(f64),
}

/// Per-page context of the shell.
#[derive(Debug, Clone)]
pub struct ShellController {
    active: ModuleId,
    index: KeywordIndex,
    layout: Option<LayoutMode>,
    input_generation: u64,
    latest_input: String,
}

impl ShellController {
    pub fn new() -> Self {
        Self::with_index(KeywordIndex::builtin())
    }

    pub fn with_index(index: KeywordIndex) -> Self {
        Self {
            active: ModuleId::default(),
            index,
            layout: None,
            input_generation: 0,
            latest_input: String::new(),
        }
    }

    pub fn active_module(&self) -> ModuleId {
        self.active
    }

    pub fn layout(&self) -> Option<LayoutMode> {
        self.layout
    }

    fn frame() -> Target {
        Target::Id(CONTENT_FRAME.to_string())
    }

    fn activate(&mut self, module: ModuleId, fx: &mut Vec<Effect<ShellMsg>>) {
        self.active = module;
        tracing::debug!(target: "museum::shell", module = %module, "Module activated");
        fx.push(Effect::Dom(DomOp::ActivateNav(module)));
        fx.push(Effect::style(Self::frame(), "opacity", "0.5"));
        fx.push(Effect::Dom(DomOp::SetFrameSource(module.frame_url())));
        Self::pulse(fx);
    }

    fn pulse(fx: &mut Vec<Effect<ShellMsg>>) {
        fx.push(Effect::style(Self::frame(), "transform", "scale(0.95)"));
        fx.push(Effect::style(
            Self::frame(),
            "transition",
            "transform 0.3s ease, opacity 0.3s ease",
        ));
        fx.push(Effect::After {
            delay: PULSE_SETTLE,
            msg: ShellMsg::TransitionSettled,
        });
    }

    fn search(&mut self, raw: &str, fx: &mut Vec<Effect<ShellMsg>>) {
        let query = match SearchQuery::parse(raw) {
            SearchQuery::Empty => {
                fx.push(Effect::ClearHighlights);
                return;
            }
            SearchQuery::TooShort => {
                fx.push(Effect::Toast(Toast::shell(too_short_message())));
                return;
            }
            SearchQuery::Ready(query) => query,
        };

        let results = self.index.search(&query);
        tracing::debug!(
            target: "museum::shell",
            %query,
            total = results.total(),
            active = %self.active,
            "Search"
        );

        if let Some(current) = results.for_module(self.active) {
            fx.push(Effect::Highlight {
                query: query.clone(),
            });
            fx.push(Effect::Toast(Toast::shell(found_in_current_message(
                current.matches.len(),
            ))));
        } else if let Some(first) = results.first() {
            fx.push(Effect::Confirm {
                prompt: switch_prompt(first.module),
                on_accept: ShellMsg::SwitchAccepted {
                    module: first.module,
                    query,
                },
            });
        } else {
            fx.push(Effect::Toast(Toast::shell(not_found_message(&query))));
        }
    }

    fn adjust_layout(&mut self, viewport_width: f64, fx: &mut Vec<Effect<ShellMsg>>) {
        let mode = LayoutMode::for_width(viewport_width);
        if self.layout == Some(mode) {
            return;
        }
        self.layout = Some(mode);
        let (position, display, overflow) = match mode {
            LayoutMode::Mobile => ("static", "flex", "auto"),
            LayoutMode::Desktop => ("sticky", "block", "visible"),
        };
        fx.push(Effect::style(Target::First(".sidebar"), "position", position));
        fx.push(Effect::style(Target::First(".nav-menu"), "display", display));
        fx.push(Effect::style(Target::First(".nav-menu"), "overflow-x", overflow));
    }
}

impl Default for ShellController {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller for ShellController {
    type Msg = ShellMsg;

    fn name(&self) -> &str {
        "shell"
    }

    fn init(&mut self, viewport_width: f64, fx: &mut Vec<Effect<ShellMsg>>) {
        fx.push(Effect::Dom(DomOp::InjectStyleSheet {
            id: SHELL_STYLESHEET_ID,
            css: SHELL_STYLESHEET,
        }));
        self.adjust_layout(viewport_width, fx);
    }

    fn update(&mut self, msg: ShellMsg, fx: &mut Vec<Effect<ShellMsg>>) {
        match msg {
            ShellMsg::WindowLoaded => fx.push(Effect::After {
                delay: LOADING_HOLD,
                msg: ShellMsg::LoadingFaded,
            }),
            ShellMsg::LoadingFaded => {
                fx.push(Effect::style(Target::Id(LOADING_SCREEN.into()), "opacity", "0"));
                fx.push(Effect::After {
                    delay: LOADING_FADE,
                    msg: ShellMsg::RevealChrome(0),
                });
            }
            ShellMsg::RevealChrome(0) => {
                fx.push(Effect::style(Target::Id(LOADING_SCREEN.into()), "display", "none"));
                fx.push(Effect::add_class(Target::Id(MAIN_CONTAINER.into()), "loaded"));
                fx.push(Effect::add_class(Target::Nth(CHROME_SELECTORS, 0), "fade-in-up"));
                for index in 1..CHROME_SELECTORS.len() {
                    fx.push(Effect::After {
                        delay: CHROME_STAGGER * index as u32,
                        msg: ShellMsg::RevealChrome(index),
                    });
                }
            }
            ShellMsg::RevealChrome(index) => {
                fx.push(Effect::add_class(Target::Nth(CHROME_SELECTORS, index), "fade-in-up"));
            }
            ShellMsg::NavActivated(module) => self.activate(module, fx),
            ShellMsg::FrameLoaded => {
                fx.push(Effect::style(Self::frame(), "opacity", "1"));
                Self::pulse(fx);
            }
            ShellMsg::TransitionSettled => {
                fx.push(Effect::style(Self::frame(), "transform", "scale(1)"));
            }
            ShellMsg::SearchSubmitted(raw) => self.search(&raw, fx),
            ShellMsg::SearchInput(raw) => {
                self.input_generation += 1;
                self.latest_input = raw;
                fx.push(Effect::After {
                    delay: DEBOUNCE_DELAY,
                    msg: ShellMsg::DebounceElapsed(self.input_generation),
                });
            }
            ShellMsg::DebounceElapsed(generation) => {
                if generation != self.input_generation {
                    return;
                }
                match SearchQuery::parse(&self.latest_input) {
                    SearchQuery::Ready(_) => {
                        let raw = self.latest_input.clone();
                        self.search(&raw, fx);
                    }
                    _ => fx.push(Effect::ClearHighlights),
                }
            }
            ShellMsg::SwitchAccepted { module, query } => {
                self.activate(module, fx);
                fx.push(Effect::After {
                    delay: SWITCH_SETTLE_DELAY,
                    msg: ShellMsg::HighlightAfterSwitch(query),
                });
            }
            ShellMsg::HighlightAfterSwitch(query) => fx.push(Effect::Highlight { query }),
            ShellMsg::Resized(width) => self.adjust_layout(width, fx),
        }
    }
}
