use std::collections::VecDeque;

/// Pointer and keyboard state as of the last poll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub mouse_x: i16,
    pub mouse_y: i16,
    pub buttons: u8,
    pub key: Option<u8>,
}

pub trait InputSource {
    fn poll(&mut self) -> InputState;
}

/// Input for headless runs; the pointer never moves.
#[derive(Debug, Default)]
pub struct NoInput;

impl InputSource for NoInput {
    fn poll(&mut self) -> InputState {
        InputState::default()
    }
}

/// Replays a fixed sequence of states, then holds the last one.
#[derive(Debug, Default)]
pub struct QueuedInput {
    queue: VecDeque<InputState>,
    last: InputState,
}

impl QueuedInput {
    pub fn new<I: IntoIterator<Item = InputState>>(states: I) -> QueuedInput {
        QueuedInput {
            queue: states.into_iter().collect(),
            last: InputState::default(),
        }
    }
}

impl InputSource for QueuedInput {
    fn poll(&mut self) -> InputState {
        if let Some(state) = self.queue.pop_front() {
            self.last = state;
        }
        self.last
    }
}
