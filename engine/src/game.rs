use crate::{input::Input, render::Color, time::GameTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameFlow {
    Continue,
    Exit,
}

/// Game logic driven by [`crate::EngineContext`].
///
/// `update` runs zero or more times per frame depending on the clock,
/// `draw` once per presented frame.
pub trait Game: 'static {
    /// Runs once, before the first update.
    fn initialize(&mut self) {}

    fn update(&mut self, time: &GameTime, input: &Input) -> GameFlow;

    /// Returns the colour the frame is cleared to.
    fn draw(&mut self, time: &GameTime) -> Color;

    /// Runs once when the context is disposed.
    fn unload(&mut self) {}
}
