//! Host-agnostic image lightbox.
//!
//! [`LightboxState`] holds the index arithmetic and open/closed phase,
//! [`route`] is the one table mapping pointer and key input to actions, and
//! [`LightboxController`] ties them to a host through [`ModalSurface`].

pub mod collection;
pub mod controller;
pub mod input;
pub mod state;
pub mod surface;

pub use collection::{GalleryImage, ImageCollection};
pub use controller::LightboxController;
pub use input::{route, Action, Input, JumpTarget, LightboxKey, PointerTarget};
pub use state::{LightboxState, Phase, Transition};
pub use surface::{Controls, ModalSurface};
