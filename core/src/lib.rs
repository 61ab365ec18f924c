//! Client logic of the TurmaFlow classroom dashboard.
//!
//! Everything here is platform-agnostic: the browser crate plugs in
//! `localStorage`, timers and rendering through the traits exposed by
//! [`session`], [`scheduler`], [`roster`] and [`controller`].

pub mod api;
pub mod auth;
pub mod class_editor;
pub mod config;
pub mod controller;
pub mod dashboard;
pub mod error;
pub mod roster;
pub mod scheduler;
pub mod session;
pub mod status;

pub use api::{ApiResponse, Gateway, HttpGateway};
pub use config::{default_config, load_config, ClientConfig, FailedRosterCounts};
pub use controller::{
    ActionOutcome, ClassDetailController, ClassSink, Interaction, Level, Shell, ViewContext,
    ViewPorts, ViewState,
};
pub use error::ClientError;
pub use roster::{RosterSink, RosterView};
pub use scheduler::{RefreshScheduler, TimerBackend};
pub use session::{KeyValueStore, MemoryStore, Role, Session, SessionAccessor};
pub use status::{classify, CohortCounts, Status};
