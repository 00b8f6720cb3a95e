//! Side effects requested by controllers and carried out by the runtime and the page.

use museum_core::ModuleId;
use std::fmt;
use std::time::Duration;

/// How long a toast stays on screen before it is dismissed.
pub const TOAST_LIFETIME: Duration = Duration::from_millis(3000);
/// Fade-out of module toasts before removal.
pub const TOAST_FADE_OUT: Duration = Duration::from_millis(300);

/// Element(s) a DOM operation applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    /// Element with this id.
    Id(String),
    /// First element matching a selector.
    First(&'static str),
    /// Every element matching any of the selectors.
    All(&'static [&'static str]),
    /// The n-th element (document order) matching any of the selectors.
    Nth(&'static [&'static str], usize),
    /// The document element.
    Root,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Id(id) => write!(f, "#{id}"),
            Target::First(selector) => f.write_str(selector),
            Target::All(selectors) => f.write_str(&selectors.join(", ")),
            Target::Nth(selectors, index) => write!(f, "{}[{index}]", selectors.join(", ")),
            Target::Root => f.write_str(":root"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    /// Background colour of the toast.
    pub fn color(&self) -> &'static str {
        match self {
            Severity::Info => "#00ACC1",
            Severity::Success => "#4CAF50",
            Severity::Warning => "#FF9800",
            Severity::Error => "#F44336",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// Which page a toast belongs to; decides placement and dismissal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToastStyle {
    /// Search advisories on the shell page. Removed without animation.
    Shell,
    /// Module page messages. Slide out before removal.
    Module,
}

/// Transient on-screen message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub text: String,
    pub severity: Severity,
    pub style: ToastStyle,
}

impl Toast {
    pub fn shell(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Info,
            style: ToastStyle::Shell,
        }
    }

    pub fn module(text: impl Into<String>, severity: Severity) -> Self {
        Self {
            text: text.into(),
            severity,
            style: ToastStyle::Module,
        }
    }

    pub fn class_name(&self) -> String {
        match self.style {
            ToastStyle::Shell => "search-message".to_string(),
            ToastStyle::Module => format!("module-message {}", self.severity.as_str()),
        }
    }

    /// Distance from the top of the viewport in px.
    pub fn top_px(&self) -> u32 {
        match self.style {
            ToastStyle::Shell => 120,
            ToastStyle::Module => 20,
        }
    }

    pub fn lifetime(&self) -> Duration {
        TOAST_LIFETIME
    }

    pub fn fade_out(&self) -> Option<Duration> {
        match self.style {
            ToastStyle::Shell => None,
            ToastStyle::Module => Some(TOAST_FADE_OUT),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId(pub u64);

/// A mutation of the page's DOM.
#[derive(Debug, Clone, PartialEq)]
pub enum DomOp {
    /// Mark the navigation entry of this module active and every other entry inactive.
    ActivateNav(ModuleId),
    /// Point the embedded content frame at a new URL.
    SetFrameSource(String),
    SetStyle {
        target: Target,
        property: &'static str,
        value: String,
    },
    AddClass {
        target: Target,
        class: &'static str,
    },
    /// Append a `<style>` element once; `id` identifies it.
    InjectStyleSheet {
        id: &'static str,
        css: &'static str,
    },
    /// Add the fixed scroll progress bar to the body.
    MountProgressBar,
    /// Progress bar width in percent.
    SetProgress(f64),
    /// Add the shimmer overlay to an element.
    AttachLoader(Target),
    DetachLoader(Target),
    ShowToast {
        id: ToastId,
        toast: Toast,
    },
    /// Start the slide-out animation of a toast.
    FadeToast(ToastId),
    RemoveToast(ToastId),
}

/// Everything a controller can ask for in response to a message.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect<M> {
    Dom(DomOp),
    /// Show a toast; the runtime schedules its dismissal.
    Toast(Toast),
    /// Deliver `msg` back to the controller after `delay` (fire-and-forget).
    After { delay: Duration, msg: M },
    /// Ask the visitor a yes/no question; `on_accept` is delivered on yes.
    Confirm { prompt: String, on_accept: M },
    /// Best-effort highlight of `query` inside the embedded frame.
    Highlight { query: String },
    /// Best-effort removal of highlight markers inside the embedded frame.
    ClearHighlights,
}

impl<M> Effect<M> {
    pub fn style(target: Target, property: &'static str, value: impl Into<String>) -> Self {
        Effect::Dom(DomOp::SetStyle {
            target,
            property,
            value: value.into(),
        })
    }

    pub fn add_class(target: Target, class: &'static str) -> Self {
        Effect::Dom(DomOp::AddClass { target, class })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_toasts_fade_and_carry_severity_class() {
        let toast = Toast::module("保存成功", Severity::Success);
        assert_eq!(toast.class_name(), "module-message success");
        assert_eq!(toast.severity.color(), "#4CAF50");
        assert_eq!(toast.fade_out(), Some(TOAST_FADE_OUT));
        assert_eq!(toast.top_px(), 20);
    }

    #[test]
    fn shell_toasts_are_info_without_fade() {
        let toast = Toast::shell("请输入至少2个字符进行搜索");
        assert_eq!(toast.class_name(), "search-message");
        assert_eq!(toast.severity, Severity::Info);
        assert_eq!(toast.fade_out(), None);
        assert_eq!(toast.lifetime(), TOAST_LIFETIME);
    }

    #[test]
    fn targets_render_as_selectors() {
        assert_eq!(Target::Id("content-frame".into()).to_string(), "#content-frame");
        assert_eq!(Target::Nth(&[".a", ".b"], 2).to_string(), ".a, .b[2]");
        assert_eq!(Target::All(&[".structure-card"]).to_string(), ".structure-card");
    }
}
