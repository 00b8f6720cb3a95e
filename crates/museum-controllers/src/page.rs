//! The page seam: what controllers need from a DOM, plus a headless implementation.

use crate::effect::{DomOp, Target, Toast, ToastId};
use museum_core::{ContentDocument, FrameAccessError, ModuleId};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

/// DOM capabilities used by the runtime. Operations on targets that do not exist are ignored.
pub trait Page {
    /// Current `innerWidth` in logical px.
    fn viewport_width(&self) -> f64;

    fn apply(&mut self, op: DomOp);

    /// Blocking yes/no dialog.
    fn confirm(&mut self, prompt: &str) -> bool;

    /// Document of the embedded content frame, if this page has one and may access it.
    fn frame_document(&mut self) -> Result<&mut ContentDocument, FrameAccessError> {
        Err(FrameAccessError::NoFrame)
    }
}

#[derive(Debug, Clone)]
enum FrameState {
    Absent,
    CrossOrigin,
    Loaded(ContentDocument),
}

/// In-memory page: keeps the resulting DOM state and a log of every applied operation.
#[derive(Debug, Clone)]
pub struct HeadlessPage {
    viewport_width: f64,
    applied: Vec<DomOp>,
    active_nav: Option<ModuleId>,
    frame_src: Option<String>,
    frame: FrameState,
    classes: HashMap<String, BTreeSet<&'static str>>,
    styles: HashMap<(String, &'static str), String>,
    style_sheets: Vec<&'static str>,
    progress_bar: Option<f64>,
    loaders: HashSet<String>,
    toasts: BTreeMap<ToastId, Toast>,
    fading: BTreeSet<ToastId>,
    confirm_answers: VecDeque<bool>,
    prompts: Vec<String>,
}

impl HeadlessPage {
    pub fn new(viewport_width: f64) -> Self {
        Self {
            viewport_width,
            applied: Vec::new(),
            active_nav: None,
            frame_src: None,
            frame: FrameState::Absent,
            classes: HashMap::new(),
            styles: HashMap::new(),
            style_sheets: Vec::new(),
            progress_bar: None,
            loaders: HashSet::new(),
            toasts: BTreeMap::new(),
            fading: BTreeSet::new(),
            confirm_answers: VecDeque::new(),
            prompts: Vec::new(),
        }
    }

    /// Embedded frame showing a same-origin document.
    pub fn with_frame_document(mut self, document: ContentDocument) -> Self {
        self.frame = FrameState::Loaded(document);
        self
    }

    /// Embedded frame whose document is not accessible.
    pub fn with_cross_origin_frame(mut self) -> Self {
        self.frame = FrameState::CrossOrigin;
        self
    }

    pub fn set_viewport_width(&mut self, width: f64) {
        self.viewport_width = width;
    }

    /// Replaces the frame's document, as if a new module finished loading.
    pub fn load_frame_document(&mut self, document: ContentDocument) {
        self.frame = FrameState::Loaded(document);
    }

    /// Queues the visitor's answer to the next confirmation. Unanswered prompts are declined.
    pub fn answer_next_confirm(&mut self, accept: bool) {
        self.confirm_answers.push_back(accept);
    }

    pub fn applied(&self) -> &[DomOp] {
        &self.applied
    }

    pub fn active_nav(&self) -> Option<ModuleId> {
        self.active_nav
    }

    pub fn frame_src(&self) -> Option<&str> {
        self.frame_src.as_deref()
    }

    pub fn frame_doc(&self) -> Option<&ContentDocument> {
        match &self.frame {
            FrameState::Loaded(document) => Some(document),
            _ => None,
        }
    }

    pub fn has_class(&self, target: &Target, class: &str) -> bool {
        self.classes
            .get(&target.to_string())
            .map(|set| set.contains(class))
            .unwrap_or(false)
    }

    pub fn style(&self, target: &Target, property: &str) -> Option<&str> {
        self.styles
            .iter()
            .find(|((key, prop), _)| *prop == property && *key == target.to_string())
            .map(|(_, value)| value.as_str())
    }

    pub fn style_sheets(&self) -> &[&'static str] {
        &self.style_sheets
    }

    /// Progress bar width, once the bar is mounted.
    pub fn progress(&self) -> Option<f64> {
        self.progress_bar
    }

    pub fn has_loader(&self, target: &Target) -> bool {
        self.loaders.contains(&target.to_string())
    }

    /// Texts of toasts currently on screen, oldest first.
    pub fn toast_texts(&self) -> Vec<&str> {
        self.toasts.values().map(|t| t.text.as_str()).collect()
    }

    pub fn toasts(&self) -> impl Iterator<Item = (&ToastId, &Toast)> {
        self.toasts.iter()
    }

    pub fn is_fading(&self, id: ToastId) -> bool {
        self.fading.contains(&id)
    }

    /// Every confirmation prompt shown so far.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl Page for HeadlessPage {
    fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    fn apply(&mut self, op: DomOp) {
        match &op {
            DomOp::ActivateNav(module) => self.active_nav = Some(*module),
            DomOp::SetFrameSource(url) => {
                self.frame_src = Some(url.clone());
                // navigating away discards the old document until the new one loads
                if let FrameState::Loaded(_) = self.frame {
                    self.frame = FrameState::Absent;
                }
            }
            DomOp::SetStyle {
                target,
                property,
                value,
            } => {
                self.styles
                    .insert((target.to_string(), *property), value.clone());
            }
            DomOp::AddClass { target, class } => {
                self.classes
                    .entry(target.to_string())
                    .or_default()
                    .insert(*class);
            }
            DomOp::InjectStyleSheet { id, .. } => {
                if !self.style_sheets.contains(id) {
                    self.style_sheets.push(*id);
                }
            }
            DomOp::MountProgressBar => {
                if self.progress_bar.is_none() {
                    self.progress_bar = Some(0.0);
                }
            }
            DomOp::SetProgress(percent) => {
                if let Some(width) = self.progress_bar.as_mut() {
                    *width = *percent;
                }
            }
            DomOp::AttachLoader(target) => {
                self.loaders.insert(target.to_string());
            }
            DomOp::DetachLoader(target) => {
                self.loaders.remove(&target.to_string());
            }
            DomOp::ShowToast { id, toast } => {
                self.toasts.insert(*id, toast.clone());
            }
            DomOp::FadeToast(id) => {
                if self.toasts.contains_key(id) {
                    self.fading.insert(*id);
                }
            }
            DomOp::RemoveToast(id) => {
                self.toasts.remove(id);
                self.fading.remove(id);
            }
        }
        self.applied.push(op);
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        self.prompts.push(prompt.to_string());
        self.confirm_answers.pop_front().unwrap_or(false)
    }

    fn frame_document(&mut self) -> Result<&mut ContentDocument, FrameAccessError> {
        match &mut self.frame {
            FrameState::Loaded(document) => Ok(document),
            FrameState::CrossOrigin => Err(FrameAccessError::CrossOrigin),
            FrameState::Absent if self.frame_src.is_some() => Err(FrameAccessError::NotLoaded),
            FrameState::Absent => Err(FrameAccessError::NoFrame),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_discards_loaded_document_until_reload() {
        let mut page = HeadlessPage::new(1024.0).with_frame_document(ContentDocument::parse("<p>x</p>"));
        assert!(page.frame_document().is_ok());
        page.apply(DomOp::SetFrameSource("modules/models/index.html".into()));
        assert_eq!(page.frame_document().unwrap_err(), FrameAccessError::NotLoaded);
        page.load_frame_document(ContentDocument::parse("<p>y</p>"));
        assert_eq!(page.frame_document().unwrap().text_content(), "y");
    }

    #[test]
    fn cross_origin_frame_is_reported() {
        let mut page = HeadlessPage::new(1024.0).with_cross_origin_frame();
        assert_eq!(page.frame_document().unwrap_err(), FrameAccessError::CrossOrigin);
    }

    #[test]
    fn unanswered_confirm_is_declined() {
        let mut page = HeadlessPage::new(1024.0);
        page.answer_next_confirm(true);
        assert!(page.confirm("first"));
        assert!(!page.confirm("second"));
        assert_eq!(page.prompts(), ["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn progress_is_ignored_until_bar_is_mounted() {
        let mut page = HeadlessPage::new(1024.0);
        page.apply(DomOp::SetProgress(40.0));
        assert_eq!(page.progress(), None);
        page.apply(DomOp::MountProgressBar);
        page.apply(DomOp::SetProgress(40.0));
        assert_eq!(page.progress(), Some(40.0));
    }
}
