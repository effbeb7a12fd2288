//! ipswitch: IPv4 Adapter Configuration Manager
//!
//! A library for discovering network adapters, reading and rewriting their
//! IPv4 configuration (static or DHCP), and persisting named IP profiles
//! for quick reapplication.

pub mod config;
pub mod engine;
pub mod network;
pub mod profile;
pub mod subnet;
