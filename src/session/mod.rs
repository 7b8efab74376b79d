//! Voice capture session — state machine, controller and streaming loop.
//!
//! [`SessionController`] is the foreground control surface (`start`/`stop`
//! plus the [`SharedStatus`] observable); [`run_streaming`] is the
//! cooperative capture loop the worker drives between the transcriber and
//! the text sink.

pub mod controller;
pub mod state;
pub mod streaming;

pub use controller::{SessionController, SessionError, TranscriberFactory};
pub use state::{new_shared_status, phase_of, SessionPhase, SessionStatus, SharedStatus};
pub use streaming::run_streaming;
