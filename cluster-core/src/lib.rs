//! Core of a generative cluster animation.
//!
//! Drifting rings of nodes bounce around a canvas while one growing ring
//! absorbs every ring it touches.
//!
//! Main components:
//! - [`node`] — a single point on a ring.
//! - [`cluster`] — rings of nodes, their motion and drawing.
//! - [`field`] — the cluster collection, merging and connective lines.
//! - [`sketch`] — initial population and per-frame drawing.
//! - [`canvas`] — the drawing surface the host runtime provides.
//! - [`recorder`] — a canvas that records primitives for replay.
//! - [`config`] — tunable parameters.
//! - [`error`] — errors for configuration and field assembly.
//! - [`types`] — shared type aliases and constants.

pub mod canvas;
pub mod cluster;
pub mod config;
pub mod error;
pub mod field;
pub mod node;
pub mod recorder;
pub mod sketch;
pub mod types;
