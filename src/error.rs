//! Error types
//!
//! The simulation itself cannot fail; errors only arise from bad configuration
//! (rejected at construction) and from host capabilities (swallowed by the scheduler).

use thiserror::Error;

/// Why a [`crate::GameConfig`] was rejected
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be a finite number greater than zero, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field} must be a finite number not below zero, got {value}")]
    Negative { field: &'static str, value: f32 },
    #[error("{entity} of size {size} does not fit in an arena {arena} wide/high")]
    EntityTooLarge {
        entity: &'static str,
        size: f32,
        arena: f32,
    },
    #[error("{field} must be at least {min}ms, got {value}")]
    IntervalTooShort {
        field: &'static str,
        value: f32,
        min: f32,
    },
    #[error("{field} must be at most {max}, got {value}")]
    TooLarge {
        field: &'static str,
        value: f32,
        max: f32,
    },
    #[error("initial spawn interval {initial}ms is below the floor of {floor}ms")]
    SpawnIntervalBelowFloor { initial: f32, floor: f32 },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure reported by a renderer or audio backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{backend} failed: {message}")]
pub struct CapabilityError {
    pub backend: &'static str,
    pub message: String,
}

impl CapabilityError {
    pub fn new(backend: &'static str, message: impl Into<String>) -> Self {
        Self {
            backend,
            message: message.into(),
        }
    }
}
