#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Input translation system for the herdsman simulation.
//!
//! The hosting adapter collects raw pointer and key activity into an
//! [`InputFrame`] once per rendered frame. [`Input::handle`] replays the frame
//! in arrival order, keeps the directional key latches truthful, and emits the
//! guidance commands the world understands. Pause requests are not world
//! state, so they are surfaced to the driver through [`InputSignals`] instead
//! of a command.

use glam::Vec2;

use herdsman_core::Command;

/// Logical control keys after the host resolved its key bindings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlKey {
    /// Steer the hero up.
    Up,
    /// Steer the hero down.
    Down,
    /// Steer the hero left.
    Left,
    /// Steer the hero right.
    Right,
    /// Toggle the pause gate.
    Pause,
}

/// A single input occurrence reported by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    /// Pointer button pressed at a viewport-space position.
    PointerDown {
        /// Position of the press.
        position: Vec2,
    },
    /// Pointer moved to a viewport-space position.
    PointerMoved {
        /// Position after the move.
        position: Vec2,
    },
    /// Pointer button released, possibly outside the viewport.
    PointerUp,
    /// Press-and-release without dragging, resolved by the host.
    Tap {
        /// Position of the tap.
        position: Vec2,
    },
    /// Control key pressed. Hosts suppress auto-repeat before reporting.
    KeyDown {
        /// Key that went down.
        key: ControlKey,
    },
    /// Control key released.
    KeyUp {
        /// Key that went up.
        key: ControlKey,
    },
}

/// Ordered input activity gathered by the host for one frame.
#[derive(Clone, Debug, Default)]
pub struct InputFrame {
    events: Vec<InputEvent>,
}

impl InputFrame {
    /// Creates an empty frame.
    #[must_use]
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Appends an event in arrival order.
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Returns the recorded events in arrival order.
    #[must_use]
    pub fn events(&self) -> &[InputEvent] {
        &self.events
    }
}

/// Driver-facing outcome of one input pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSignals {
    /// The player asked to toggle pause this frame.
    pub pause_requested: bool,
}

/// Translates host input frames into hero guidance commands.
#[derive(Debug, Default)]
pub struct Input {
    pressed: PressedKeys,
}

impl Input {
    /// Creates the system with no keys latched.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replays one input frame, pushing guidance commands into `out`.
    ///
    /// Pointer events are forwarded as-is; the world owns the guidance-mode
    /// transition rules. Directional keys update the latches, engage keyboard
    /// guidance on every fresh press, and re-emit the steering axes whenever
    /// they change. A key reported down while already latched is dropped.
    pub fn handle(&mut self, frame: &InputFrame, out: &mut Vec<Command>) -> InputSignals {
        let mut signals = InputSignals::default();

        for event in frame.events() {
            match *event {
                InputEvent::PointerDown { position } => {
                    out.push(Command::PressAt { position });
                }
                InputEvent::PointerMoved { position } => {
                    out.push(Command::DragTo { position });
                }
                InputEvent::PointerUp => {
                    out.push(Command::Release);
                }
                InputEvent::Tap { position } => {
                    out.push(Command::TapAt { position });
                }
                InputEvent::KeyDown {
                    key: ControlKey::Pause,
                } => {
                    signals.pause_requested = true;
                }
                InputEvent::KeyDown { key } => {
                    if self.pressed.press(key) {
                        out.push(Command::EngageKeyboard);
                        out.push(self.steer_command());
                    }
                }
                InputEvent::KeyUp {
                    key: ControlKey::Pause,
                } => {}
                InputEvent::KeyUp { key } => {
                    if self.pressed.release(key) {
                        out.push(self.steer_command());
                    }
                }
            }
        }

        signals
    }

    /// Returns a steering command for the currently latched axes.
    ///
    /// Drivers that drop guidance while frozen use this to re-sync the world
    /// after thawing, since key releases keep updating the latches meanwhile.
    #[must_use]
    pub fn steer_command(&self) -> Command {
        let (x, y) = self.pressed.axes();
        Command::Steer { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct PressedKeys {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
}

impl PressedKeys {
    /// Latches the key, reporting whether it was previously up.
    fn press(&mut self, key: ControlKey) -> bool {
        let slot = match key {
            ControlKey::Up => &mut self.up,
            ControlKey::Down => &mut self.down,
            ControlKey::Left => &mut self.left,
            ControlKey::Right => &mut self.right,
            ControlKey::Pause => return false,
        };
        let fresh = !*slot;
        *slot = true;
        fresh
    }

    /// Releases the key, reporting whether it was previously down.
    fn release(&mut self, key: ControlKey) -> bool {
        let slot = match key {
            ControlKey::Up => &mut self.up,
            ControlKey::Down => &mut self.down,
            ControlKey::Left => &mut self.left,
            ControlKey::Right => &mut self.right,
            ControlKey::Pause => return false,
        };
        let was_down = *slot;
        *slot = false;
        was_down
    }

    fn axes(&self) -> (i8, i8) {
        let x = i8::from(self.right) - i8::from(self.left);
        let y = i8::from(self.down) - i8::from(self.up);
        (x, y)
    }
}
