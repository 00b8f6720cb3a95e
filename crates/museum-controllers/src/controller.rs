use crate::effect::Effect;
use std::fmt;

/// A page controller: owns its state and turns messages into effects.
///
/// Controllers never touch the page directly; the runtime executes the effects they push.
pub trait Controller {
    type Msg: Clone + fmt::Debug;

    /// Name used in logs.
    fn name(&self) -> &str;

    /// Runs once when the page's DOM is ready.
    fn init(&mut self, viewport_width: f64, fx: &mut Vec<Effect<Self::Msg>>);

    /// Handles one event or timer message.
    fn update(&mut self, msg: Self::Msg, fx: &mut Vec<Effect<Self::Msg>>);
}
