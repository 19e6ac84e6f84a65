use std::collections::HashSet;

pub use winit::keyboard::KeyCode;

/// Keyboard state as seen by [`crate::Game::update`].
#[derive(Debug, Default)]
pub struct Input {
    down: HashSet<KeyCode>,
    pressed: HashSet<KeyCode>,
}

impl Input {
    pub fn press(&mut self, key: KeyCode) {
        // Key repeat arrives as another press while the key is still down.
        if self.down.insert(key) {
            self.pressed.insert(key);
        }
    }

    pub fn release(&mut self, key: KeyCode) {
        self.down.remove(&key);
    }

    pub fn is_down(&self, key: KeyCode) -> bool {
        self.down.contains(&key)
    }

    /// True if `key` went down since the last [`Input::end_frame`].
    pub fn just_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    pub fn end_frame(&mut self) {
        self.pressed.clear();
    }

    /// Forgets every key, e.g. when the window loses focus and releases
    /// would go unseen.
    pub fn clear(&mut self) {
        self.down.clear();
        self.pressed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_then_release() {
        let mut input = Input::default();
        input.press(KeyCode::Escape);
        assert!(input.is_down(KeyCode::Escape));
        assert!(input.just_pressed(KeyCode::Escape));

        input.release(KeyCode::Escape);
        assert!(!input.is_down(KeyCode::Escape));
        // still reported until the frame ends
        assert!(input.just_pressed(KeyCode::Escape));

        input.end_frame();
        assert!(!input.just_pressed(KeyCode::Escape));
    }

    #[test]
    fn repeat_is_not_a_new_press() {
        let mut input = Input::default();
        input.press(KeyCode::KeyW);
        input.end_frame();
        input.press(KeyCode::KeyW);
        assert!(input.is_down(KeyCode::KeyW));
        assert!(!input.just_pressed(KeyCode::KeyW));
    }

    #[test]
    fn clear_drops_held_keys() {
        let mut input = Input::default();
        input.press(KeyCode::ArrowLeft);
        input.press(KeyCode::ArrowUp);
        input.clear();
        assert!(!input.is_down(KeyCode::ArrowLeft));
        assert!(!input.just_pressed(KeyCode::ArrowUp));
    }
}
