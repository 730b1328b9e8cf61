//! UI Theme - Design system constants
//!
//! Icons and progress-bar geometry shared by the output and the progress
//! renderer.

use std::time::Duration;

/// Default theme for relpub output
#[derive(Debug, Clone, Default)]
pub struct Theme {
    /// Status icons
    pub icons: Icons,
    /// Progress bar layout
    pub bar: BarStyle,
}

/// Status icons for different states
#[derive(Debug, Clone)]
pub struct Icons {
    /// Success/completed state (✓)
    pub success: &'static str,
    /// Info/Tip state (ℹ)
    pub info: &'static str,
}

impl Default for Icons {
    fn default() -> Self {
        Self {
            success: "✓",
            info: "ℹ",
        }
    }
}

/// Progress bar geometry and refresh cadence
#[derive(Debug, Clone)]
pub struct BarStyle {
    /// Total bar width in columns, bounds included
    pub width: usize,
    /// Time between redraws
    pub refresh: Duration,
    /// EWMA age for the remaining-time estimate
    pub eta_age: f64,
    /// EWMA age for the transfer speed
    pub speed_age: f64,
    pub left: char,
    pub fill: char,
    pub tip: char,
    pub empty: char,
    pub right: char,
}

impl Default for BarStyle {
    fn default() -> Self {
        Self {
            width: 60,
            refresh: Duration::from_millis(180),
            eta_age: 90.0,
            speed_age: 60.0,
            left: '[',
            fill: '=',
            tip: '>',
            empty: '-',
            right: '|',
        }
    }
}
