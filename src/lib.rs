//! Daily piket (chore) rotation: picks today's task, shuffles the roster into
//! it and relays the resulting message to WhatsApp or Telegram.

pub mod config;
pub mod display;
pub mod error;
pub mod message;
pub mod relay;
pub mod schedule;
pub mod session;
pub mod settings;
pub mod web;

pub use error::{PiketError, Result};
