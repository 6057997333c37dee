//! Ошибки конфигурации контроллера
//!
//! Runtime пути (tick, late tick, feedback) никогда не возвращают ошибки:
//! всё что может сломаться в рантайме деградирует визуально, а не падает.
//! Ошибка возможна только при создании контроллера с невалидным тюнингом.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("camera bottom clamp ({bottom}) is above top clamp ({top})")]
    InvertedPitchClamp { bottom: f32, top: f32 },

    #[error("fire interval must be positive, got {0}")]
    NonPositiveFireInterval(f32),

    #[error("gravity must be negative, got {0}")]
    NonNegativeGravity(f32),

    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("{field} is not a finite number")]
    NotFinite { field: &'static str },

    #[error("failed to parse tuning: {0}")]
    Parse(#[from] ron::error::SpannedError),
}
