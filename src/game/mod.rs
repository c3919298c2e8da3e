//! Game module
//!
//! Everything about playing a level: players and their locomotion, the
//! scene built from the level, the session that runs the tick, the events
//! it reports and the camera and renderer that present it.
//!
//! Design philosophy:
//! - Simple over flexible (we know what game we're making)
//! - Gameplay state is plain data, presentation reads it afterwards
//! - Capabilities passed in, no back-references to the session

pub mod camera;
pub mod event;
pub mod locomotion;
pub mod player;
pub mod renderer;
pub mod scene;
pub mod session;

pub use camera::FollowCamera;
pub use event::Events;
pub use locomotion::{Facing, LocomotionAdapter, MotionIntent};
pub use player::{GravityControl, Player, PressedInputs};
pub use renderer::{draw_session, Overlay, Textures};
pub use scene::Scene;
pub use session::{GamePhase, LevelState, Session, Transition};
