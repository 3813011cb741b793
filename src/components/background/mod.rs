//! Animated starfield background.
//!
//! Renders a layered, continuously animated backdrop on an HTML canvas:
//! - A slowly drifting linear gradient sampled from the palette
//! - Depth-scaled stars oscillating around fixed origins (parallax)
//! - Proximity links between nearby stars, found through a uniform spatial grid
//! - Optional links from the pointer to nearby stars
//! - Randomly spawned shooting stars with fading tails
//!
//! # Example
//!
//! ```ignore
//! use starfield_background::{Background, Settings};
//!
//! let bg = Background::new("backgroundCanvas", Some(&[[255, 0, 0], [0, 0, 255]]), Settings::default())?;
//! bg.start()?;
//! // later, after the avatar palette is known
//! bg.update_colors(&[[12, 40, 90], [200, 180, 40]]);
//! ```

mod canvas;
mod component;
mod error;
pub mod grid;
mod lifecycle;
pub mod particles;
pub mod render;
pub mod settings;
pub mod shooting;
pub mod state;
pub mod surface;
pub mod theme;
mod types;

pub use component::BackgroundCanvas;
pub use error::BackgroundError;
pub use lifecycle::Background;
pub use settings::Settings;
pub use state::{BackgroundState, Lifecycle};
pub use types::{Bounds, Point, Rgb};
