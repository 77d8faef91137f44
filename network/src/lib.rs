// SPDX-License-Identifier: MIT OR Apache-2.0

//! Abalone Network - AI service bridge and session driver
//!
//! This crate provides:
//! - The newline-delimited JSON protocol spoken with the AI service
//! - The `AiTransport` boundary and a TCP implementation
//! - `AiBridge`, with an explicit connect/close lifecycle
//! - The async driver that serializes user input, clock ticks and AI answers
//! - The client config file

#![deny(unsafe_code)]
#![deny(clippy::all)]

pub mod bridge;
pub mod config;
pub mod driver;
pub mod error;
pub mod msg;
pub mod protocol;
pub mod schedule;
pub mod transport;

// Re-exports
pub use bridge::{AiBridge, AiRequester, BridgeTimeouts};
pub use config::{load_config, load_config_from, save_config, ClientConfig};
pub use driver::{spawn, DriverHandle, DriverSettings, SessionDriver};
pub use error::BridgeError;
pub use msg::{Notice, SessionUpdate, UserCommand};
pub use protocol::{MoveRequest, MoveResponse};
pub use schedule::ClockSchedule;
pub use transport::{AiTransport, TcpTransport};
