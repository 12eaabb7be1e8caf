//! # dualpng-session
//!
//! Per-user sessions for the upload, upload, merge, fetch workflow.
//!
//! A [`SessionRegistry`] hands out [`Session`] handles by id. Each session
//! holds two source slots, the last merge result and its gamma, guarded by
//! a private reader/writer lock.
//!
//! ```rust
//! use dualpng_core::Image;
//! use dualpng_ops::LanczosResizer;
//! use dualpng_session::{MergeParams, RegistryConfig, ResultMode, SessionRegistry, Slot};
//!
//! let registry = SessionRegistry::new(RegistryConfig::default());
//! let session = registry.create_anonymous().unwrap();
//!
//! session.set_source(Slot::One, Image::filled(4, 4, [255, 255, 255, 255]));
//! session.set_source(Slot::Two, Image::filled(4, 4, [0, 0, 0, 255]));
//!
//! let params = MergeParams::from_fields([("gamma", "2300"), ("r1end", "220")]).unwrap();
//! session.merge(&params, &LanczosResizer::new()).unwrap();
//!
//! let result = session.result(ResultMode::Gamma).unwrap();
//! assert_eq!(result.gamma, Some(2300));
//! ```

#![warn(missing_docs)]

mod config;
mod error;
pub mod params;
mod registry;
mod session;

pub use config::{CapacityPolicy, RegistryConfig};
pub use error::{SessionError, SessionResult};
pub use params::{parse_mask, parse_range, FieldError, MergeParams, DEFAULT_GAMMA};
pub use registry::SessionRegistry;
pub use session::{MergeSummary, RenderedResult, ResultMode, Session, SessionPhase, Slot};
