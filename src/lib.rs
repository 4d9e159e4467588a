//! BeatVault - Marketplace Settlement Core
//!
//! This crate implements the order, payment, and license settlement engine for a
//! marketplace selling time-limited usage licenses on digital audio assets.
//! It turns a buyer's purchase intent into a verified gateway transaction and
//! an issued, downloadable license, guaranteeing that money is never accepted
//! without a license and that no license is issued twice for the same payment.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod observability;
pub mod ports;
