//! Events and their observers.
//!
//! - [`scene`] – apply pending scene switches
pub mod scene;
