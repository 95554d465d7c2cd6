//! Traversal of a deck, one slide at a time
//!
//! The controller only needs two things from its environment, the current
//! markup and a way to press a key ([`Presentation`]), and it tells a
//! [`CaptureSink`] when to persist the slide on screen.

pub mod controller;

pub use controller::{Phase, TraversalController, TraversalOptions, TraversalReport, TraversalState};

use crate::{error::Result, rules::Action};

/// Capabilities the controller consumes from the rendering surface
pub trait Presentation {
    /// Current rendered markup of the deck
    fn markup(&mut self) -> Result<String>;

    /// Deliver a navigation action to the deck
    fn navigate(&mut self, action: &Action) -> Result<()>;
}

/// Receives one capture signal per slide, before the deck advances
pub trait CaptureSink {
    fn capture(&mut self, slide_index: usize) -> Result<()>;
}

impl<T: Presentation + ?Sized> Presentation for &mut T {
    fn markup(&mut self) -> Result<String> {
        (**self).markup()
    }

    fn navigate(&mut self, action: &Action) -> Result<()> {
        (**self).navigate(action)
    }
}

impl<T: CaptureSink + ?Sized> CaptureSink for &mut T {
    fn capture(&mut self, slide_index: usize) -> Result<()> {
        (**self).capture(slide_index)
    }
}
