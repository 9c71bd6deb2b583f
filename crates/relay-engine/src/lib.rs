//! Decision logic of the relay.
//!
//! Capture side: [`NotificationListener`] filters platform events, consults
//! the stacking resolver and hands them to the [`Projector`]. Display side:
//! [`ServiceReceiver`] validates, sequences and rebuilds what the host
//! delivers. All mutable tables live in one [`RelayState`].

pub mod actions;
pub mod listener;
pub mod progress;
pub mod projector;
pub mod receiver;
pub mod reconstructor;
pub mod sequencer;
pub mod stacking;
pub mod state;

pub use actions::ActionReceiver;
pub use listener::{CaptureFilters, NotificationListener};
pub use progress::ProgressTracker;
pub use projector::{Projection, Projector};
pub use receiver::{Outcome, ServiceReceiver};
pub use reconstructor::Reconstructor;
pub use sequencer::{Sequencer, Verdict};
pub use state::{RelayState, RequestCodes};
