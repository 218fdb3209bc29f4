//! Roomcast - RabbitMQ cluster bridge for real-time room broadcasts
//!
//! This crate lets multiple independent socket servers behave as one logical
//! cluster: broadcasts and room-membership changes on one instance are
//! propagated to every other instance over a topic exchange, with
//! self-originated traffic suppressed to prevent echo loops.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
