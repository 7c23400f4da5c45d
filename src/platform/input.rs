//! Input normalization
//!
//! Gameplay never branches on platform. The host picks a [`Platform`] once
//! at startup, turns raw pointer samples into taps with a [`TapFilter`], lets
//! physics resolve taps to cubes, and feeds the resulting [`InputEvent`]s to
//! the session through an [`InputSource`].

use std::collections::VecDeque;

use glam::Vec2;

use crate::sim::InputEvent;

/// Input capability picked at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Mouse-driven (editor, desktop, web)
    Desktop,
    /// Touch-driven (phones, tablets)
    Touch,
}

impl Platform {
    pub fn detect() -> Self {
        if cfg!(any(target_os = "android", target_os = "ios")) {
            Platform::Touch
        } else {
            Platform::Desktop
        }
    }

    /// The only pointer kind this platform listens to
    pub fn primary_pointer(self) -> PointerKind {
        match self {
            Platform::Desktop => PointerKind::Mouse,
            Platform::Touch => PointerKind::Touch,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Began,
    Moved,
    Ended,
}

/// Raw pointer report from the windowing layer (screen coordinates)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub kind: PointerKind,
    pub phase: PointerPhase,
    pub position: Vec2,
}

/// Turns raw pointer samples into taps.
///
/// Mobile browsers report one tap as both a touch and an emulated mouse
/// click; listening to a single pointer kind keeps it to one tap.
#[derive(Debug, Clone, Copy)]
pub struct TapFilter {
    accept: PointerKind,
}

impl TapFilter {
    pub fn new(platform: Platform) -> Self {
        Self {
            accept: platform.primary_pointer(),
        }
    }

    /// Screen position of a tap, if this sample is one
    pub fn tap(&self, sample: &PointerSample) -> Option<Vec2> {
        (sample.kind == self.accept && sample.phase == PointerPhase::Began).then_some(sample.position)
    }
}

/// Source of normalized gameplay input
pub trait InputSource {
    /// Append every event gathered since the last poll
    fn poll(&mut self, out: &mut Vec<InputEvent>);
}

/// FIFO the host pushes resolved events into
#[derive(Debug, Default)]
pub struct QueuedInput {
    queue: VecDeque<InputEvent>,
}

impl QueuedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.queue.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl InputSource for QueuedInput {
    fn poll(&mut self, out: &mut Vec<InputEvent>) {
        out.extend(self.queue.drain(..));
    }
}
