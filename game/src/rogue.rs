use engine::{render::CORNFLOWER_BLUE, Color, Game, GameFlow, GameTime, Input, KeyCode};
use gilrs::{Button, EventType, Gilrs};
use log::{debug, info, warn};

/// The HybridRogue game as seen by the engine.
pub struct HybridRogue {
    gamepads: Option<Gilrs>,
    updates: u64,
}

impl Default for HybridRogue {
    fn default() -> Self {
        Self::new()
    }
}

impl HybridRogue {
    pub fn new() -> Self {
        Self {
            gamepads: None,
            updates: 0,
        }
    }

    /// Drains pending gamepad events, reporting whether Back was pressed.
    fn back_pressed(&mut self) -> bool {
        let Some(gamepads) = self.gamepads.as_mut() else {
            return false;
        };
        let mut back = false;
        while let Some(gilrs::Event { event, .. }) = gamepads.next_event() {
            if let EventType::ButtonPressed(Button::Select, _) = event {
                back = true;
            }
        }
        back
    }
}

impl Game for HybridRogue {
    fn initialize(&mut self) {
        match Gilrs::new() {
            Ok(gilrs) => {
                let connected = gilrs.gamepads().count();
                debug!("gamepad support ready, {connected} connected");
                self.gamepads = Some(gilrs);
            }
            Err(err) => warn!("gamepad support unavailable: {err}"),
        }
    }

    fn update(&mut self, _time: &GameTime, input: &Input) -> GameFlow {
        if self.back_pressed() || input.is_down(KeyCode::Escape) {
            return GameFlow::Exit;
        }
        self.updates += 1;
        GameFlow::Continue
    }

    fn draw(&mut self, _time: &GameTime) -> Color {
        CORNFLOWER_BLUE
    }

    fn unload(&mut self) {
        self.gamepads = None;
        info!("unloaded after {} updates", self.updates);
    }
}
