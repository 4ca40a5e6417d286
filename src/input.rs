/// Keys the simulation reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Fire,
    Escape,
}

/// Snapshot of the keyboard, queried once per tick.
pub trait Keyboard {
    fn is_down(&self, key: Key) -> bool;
}

impl Keyboard for [Key] {
    fn is_down(&self, key: Key) -> bool {
        self.contains(&key)
    }
}

impl<const N: usize> Keyboard for [Key; N] {
    fn is_down(&self, key: Key) -> bool {
        self.contains(&key)
    }
}

/// Scheduler events delivered to [`crate::Game::handle_event`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Fixed-rate simulation tick.
    Tick,
    /// The player closed the window.
    DisplayClose,
}
