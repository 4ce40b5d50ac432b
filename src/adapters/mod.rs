//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies (file I/O, caches, metrics). Each sub-module
//! groups adapters by infrastructure concern.
//!
//! Adapter categories:
//! - `cache`: TTL prediction cache wrapping any oracle
//! - `metrics`: Prometheus metrics registry
//! - `persistence`: JSON snapshot serving fixtures, predictions and odds

pub mod cache;
pub mod metrics;
pub mod persistence;
