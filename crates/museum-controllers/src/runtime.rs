//! Single-threaded page event loop: dispatches messages to one controller, executes its
//! effects against the page, and keeps a timer queue on a virtual clock.

use crate::controller::Controller;
use crate::effect::{DomOp, Effect, ToastId};
use crate::page::Page;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Duration;
use tokio::sync::mpsc;

enum Timer<M> {
    Deliver(M),
    FadeToast { id: ToastId, removal: Duration },
    RemoveToast(ToastId),
}

struct Scheduled<M> {
    due: Duration,
    seq: u64,
    timer: Timer<M>,
}

impl<M> PartialEq for Scheduled<M> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<M> Eq for Scheduled<M> {}

impl<M> PartialOrd for Scheduled<M> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<M> Ord for Scheduled<M> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

/// One page instance: its controller, its DOM, and its pending timers.
pub struct PageRuntime<C: Controller, P: Page> {
    controller: C,
    page: P,
    clock: Duration,
    timers: BinaryHeap<Reverse<Scheduled<C::Msg>>>,
    next_seq: u64,
    next_toast: u64,
}

impl<C: Controller, P: Page> PageRuntime<C, P> {
    /// Builds the runtime and runs the controller's start-up effects.
    pub fn start(controller: C, page: P) -> Self {
        let mut runtime = Self {
            controller,
            page,
            clock: Duration::ZERO,
            timers: BinaryHeap::new(),
            next_seq: 0,
            next_toast: 0,
        };
        let width = runtime.page.viewport_width();
        let mut fx = Vec::new();
        runtime.controller.init(width, &mut fx);
        tracing::debug!(
            target: "museum::runtime",
            controller = runtime.controller.name(),
            viewport_width = width,
            "Controller started"
        );
        runtime.execute(fx);
        runtime
    }

    /// Handles one message synchronously.
    pub fn dispatch(&mut self, msg: C::Msg) {
        tracing::trace!(target: "museum::runtime", controller = self.controller.name(), ?msg, "Dispatch");
        let mut fx = Vec::new();
        self.controller.update(msg, &mut fx);
        self.execute(fx);
    }

    /// Moves the clock forward, firing every timer that falls due, in order.
    pub fn advance(&mut self, by: Duration) {
        let target = self.clock + by;
        self.advance_to(target);
    }

    /// Time elapsed on this page's clock.
    pub fn now(&self) -> Duration {
        self.clock
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    pub fn into_parts(self) -> (C, P) {
        (self.controller, self.page)
    }

    /// Drives the page in real time: page events arrive on `events`, timers fire on tokio's
    /// clock. Returns when the event channel closes; timers still pending are dropped.
    pub async fn run(mut self, mut events: mpsc::Receiver<C::Msg>) -> Self {
        let origin = tokio::time::Instant::now();
        let base = self.clock;
        loop {
            let wait = self
                .next_due()
                .map(|due| due.saturating_sub(base + origin.elapsed()));
            tokio::select! {
                event = events.recv() => {
                    self.advance_to(base + origin.elapsed());
                    match event {
                        Some(msg) => self.dispatch(msg),
                        None => break,
                    }
                }
                _ = tokio::time::sleep(wait.unwrap_or_default()), if wait.is_some() => {
                    self.advance_to(base + origin.elapsed());
                }
            }
        }
        tracing::debug!(
            target: "museum::runtime",
            controller = self.controller.name(),
            dropped_timers = self.timers.len(),
            "Page event stream closed"
        );
        self
    }

    fn next_due(&self) -> Option<Duration> {
        self.timers.peek().map(|Reverse(next)| next.due)
    }

    fn advance_to(&mut self, target: Duration) {
        while self
            .timers
            .peek()
            .is_some_and(|Reverse(next)| next.due <= target)
        {
            if let Some(Reverse(next)) = self.timers.pop() {
                self.clock = self.clock.max(next.due);
                self.fire(next.timer);
            }
        }
        self.clock = self.clock.max(target);
    }

    fn schedule(&mut self, delay: Duration, timer: Timer<C::Msg>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.push(Reverse(Scheduled {
            due: self.clock + delay,
            seq,
            timer,
        }));
    }

    fn fire(&mut self, timer: Timer<C::Msg>) {
        match timer {
            Timer::Deliver(msg) => self.dispatch(msg),
            Timer::FadeToast { id, removal } => {
                self.page.apply(DomOp::FadeToast(id));
                self.schedule(removal, Timer::RemoveToast(id));
            }
            Timer::RemoveToast(id) => self.page.apply(DomOp::RemoveToast(id)),
        }
    }

    fn execute(&mut self, fx: Vec<Effect<C::Msg>>) {
        for effect in fx {
            match effect {
                Effect::Dom(op) => self.page.apply(op),
                Effect::Toast(toast) => {
                    let id = ToastId(self.next_toast);
                    self.next_toast += 1;
                    let lifetime = toast.lifetime();
                    let fade_out = toast.fade_out();
                    self.page.apply(DomOp::ShowToast { id, toast });
                    match fade_out {
                        Some(removal) => self.schedule(lifetime, Timer::FadeToast { id, removal }),
                        None => self.schedule(lifetime, Timer::RemoveToast(id)),
                    }
                }
                Effect::After { delay, msg } => self.schedule(delay, Timer::Deliver(msg)),
                Effect::Confirm { prompt, on_accept } => {
                    if self.page.confirm(&prompt) {
                        self.dispatch(on_accept);
                    } else {
                        tracing::debug!(target: "museum::runtime", %prompt, "Confirmation declined");
                    }
                }
                Effect::Highlight { query } => match self.page.frame_document() {
                    Ok(document) => {
                        let added = document.highlight(&query);
                        tracing::debug!(target: "museum::runtime", %query, added, "Highlighted matches in content frame");
                    }
                    Err(e) => {
                        tracing::info!(target: "museum::runtime", error = %e, "Could not highlight search results in content frame");
                    }
                },
                Effect::ClearHighlights => match self.page.frame_document() {
                    Ok(document) => {
                        let removed = document.clear_highlights();
                        tracing::debug!(target: "museum::runtime", removed, "Cleared highlight markers");
                    }
                    Err(e) => {
                        tracing::debug!(target: "museum::runtime", error = %e, "Highlight markers not cleared");
                    }
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{Severity, Target, Toast, TOAST_FADE_OUT, TOAST_LIFETIME};
    use crate::page::HeadlessPage;

    /// Records delivered messages; `Later(n, ms)` re-delivers `n` after `ms`.
    #[derive(Default)]
    struct Recorder {
        seen: Vec<u32>,
    }

    #[derive(Debug, Clone)]
    enum Msg {
        Now(u32),
        Later(u32, u64),
        Ask(u32),
        Notify(&'static str),
    }

    impl Controller for Recorder {
        type Msg = Msg;

        fn name(&self) -> &str {
            "recorder"
        }

        fn init(&mut self, _viewport_width: f64, fx: &mut Vec<Effect<Msg>>) {
            fx.push(Effect::add_class(Target::Root, "ready"));
        }

        fn update(&mut self, msg: Msg, fx: &mut Vec<Effect<Msg>>) {
            match msg {
                Msg::Now(n) => self.seen.push(n),
                Msg::Later(n, ms) => fx.push(Effect::After {
                    delay: Duration::from_millis(ms),
                    msg: Msg::Now(n),
                }),
                Msg::Ask(n) => fx.push(Effect::Confirm {
                    prompt: format!("deliver {n}?"),
                    on_accept: Msg::Now(n),
                }),
                Msg::Notify(text) => fx.push(Effect::Toast(Toast::shell(text))),
            }
        }
    }

    fn runtime() -> PageRuntime<Recorder, HeadlessPage> {
        PageRuntime::start(Recorder::default(), HeadlessPage::new(1024.0))
    }

    #[test]
    fn start_runs_init_effects() {
        let runtime = runtime();
        assert!(runtime.page().has_class(&Target::Root, "ready"));
        assert_eq!(runtime.now(), Duration::ZERO);
    }

    #[test]
    fn timers_fire_in_due_order_then_schedule_order() {
        let mut runtime = runtime();
        runtime.dispatch(Msg::Later(3, 300));
        runtime.dispatch(Msg::Later(1, 100));
        runtime.dispatch(Msg::Later(2, 100));
        assert_eq!(runtime.pending_timers(), 3);

        runtime.advance(Duration::from_millis(99));
        assert!(runtime.controller().seen.is_empty());
        runtime.advance(Duration::from_millis(201));
        assert_eq!(runtime.controller().seen, vec![1, 2, 3]);
        assert_eq!(runtime.now(), Duration::from_millis(300));
        assert_eq!(runtime.pending_timers(), 0);
    }

    #[test]
    fn timers_scheduled_while_firing_use_the_firing_time() {
        let mut runtime = runtime();
        runtime.dispatch(Msg::Later(7, 100));
        runtime.advance(Duration::from_millis(500));
        runtime.dispatch(Msg::Later(8, 100));
        runtime.advance(Duration::from_millis(99));
        assert_eq!(runtime.controller().seen, vec![7]);
        runtime.advance(Duration::from_millis(1));
        assert_eq!(runtime.controller().seen, vec![7, 8]);
    }

    #[test]
    fn confirm_delivers_only_on_accept() {
        let mut runtime = runtime();
        runtime.dispatch(Msg::Ask(1));
        runtime.page_mut().answer_next_confirm(true);
        runtime.dispatch(Msg::Ask(2));
        assert_eq!(runtime.controller().seen, vec![2]);
        assert_eq!(runtime.page().prompts().len(), 2);
    }

    #[test]
    fn shell_toasts_are_removed_after_lifetime() {
        let mut runtime = runtime();
        runtime.dispatch(Msg::Notify("a"));
        runtime.advance(Duration::from_millis(1500));
        runtime.dispatch(Msg::Notify("b"));
        assert_eq!(runtime.page().toast_texts(), vec!["a", "b"]);
        runtime.advance(Duration::from_millis(1500));
        assert_eq!(runtime.page().toast_texts(), vec!["b"]);
        runtime.advance(Duration::from_millis(1500));
        assert!(runtime.page().toast_texts().is_empty());
    }

    #[test]
    fn module_toasts_fade_before_removal() {
        let mut runtime = runtime();
        runtime.execute(vec![Effect::Toast(Toast::module("saved", Severity::Success))]);
        runtime.advance(TOAST_LIFETIME);
        assert!(runtime.page().is_fading(ToastId(0)));
        runtime.advance(TOAST_FADE_OUT);
        assert!(runtime.page().toast_texts().is_empty());
    }

    #[test]
    fn into_parts_returns_controller_and_page() {
        let mut runtime = runtime();
        runtime.dispatch(Msg::Now(4));
        let (controller, page) = runtime.into_parts();
        assert_eq!(controller.seen, vec![4]);
        assert!(page.has_class(&Target::Root, "ready"));
    }

    #[tokio::test(start_paused = true)]
    async fn run_fires_timers_on_tokio_clock() {
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(runtime().run(rx));
        tx.send(Msg::Later(5, 250)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;
        tx.send(Msg::Now(6)).await.unwrap();
        drop(tx);
        let runtime = handle.await.unwrap();
        assert_eq!(runtime.controller().seen, vec![5, 6]);
    }
}
