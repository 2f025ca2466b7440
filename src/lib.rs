//! Image gallery with a lightbox viewer.
//!
//! The [`lightbox`] module is host-agnostic; everything else is the native
//! host that discovers images, decodes them and draws the page.

pub mod cli;
pub mod error;
pub mod files;
pub mod lightbox;
pub mod loader;
pub mod ui;
