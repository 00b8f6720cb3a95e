//! museum-controllers: behaviour of the shell page and the module pages.
//!
//! Each page is one [`PageRuntime`]: a [`Controller`] turns page events into [`Effect`]s,
//! the runtime executes them against a [`Page`] and keeps the page's timers. Timers run on
//! a virtual clock ([`PageRuntime::advance`]) or on tokio's clock ([`PageRuntime::run`]).

mod controller;
mod effect;
mod module_page;
mod page;
mod runtime;
mod shell;

pub use controller::Controller;
pub use effect::{DomOp, Effect, Severity, Target, Toast, ToastId, ToastStyle, TOAST_FADE_OUT, TOAST_LIFETIME};
pub use page::{HeadlessPage, Page};
pub use runtime::PageRuntime;

// Shell page
pub use shell::{
    found_in_current_message, not_found_message, switch_prompt, too_short_message,
    ShellController, ShellMsg, CHROME_SELECTORS, DEBOUNCE_DELAY, SHELL_STYLESHEET_ID,
    SWITCH_SETTLE_DELAY,
};

// Module pages
pub use module_page::{
    scroll_progress, ModuleController, ModuleMsg, ScrollSnapshot, BUTTON_SELECTORS,
    CARD_SELECTORS, MODULE_STYLESHEET_ID, REVEAL_THRESHOLD_PX, SECTION_SELECTORS,
    SPACED_CARD_SELECTORS,
};
