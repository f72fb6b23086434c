//! Host collaborators
//!
//! The provider only talks to the outside world through these traits: a
//! launcher for opening URLs and a display context for icon scaling.

mod display;
mod launcher;

pub use display::{DisplayContext, FixedScale};
pub use launcher::{PrintLauncher, SystemLauncher, UrlLauncher};
