//! Shared types and enums used across FESPRITE.
//! Includes `ColorVariant`, `FacingState`, `HeadSize` and `CompositeMode`.
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Unit palette variants, in the order they are stacked on output sheets.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorVariant {
    Blue,
    Red,
    Green,
    Purple,
}

impl ColorVariant {
    /// Output stacking order (source block order is a separate data table).
    pub const ALL: [ColorVariant; 4] = [
        ColorVariant::Blue,
        ColorVariant::Red,
        ColorVariant::Green,
        ColorVariant::Purple,
    ];
}

impl std::fmt::Display for ColorVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ColorVariant::Blue => "blue",
            ColorVariant::Red => "red",
            ColorVariant::Green => "green",
            ColorVariant::Purple => "purple",
        };
        write!(f, "{}", s)
    }
}

/// Animation states present on every prepared sheet.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingState {
    Idle,
    Left,
    Right,
}

impl FacingState {
    pub const ALL: [FacingState; 3] = [FacingState::Idle, FacingState::Left, FacingState::Right];

    /// Row index of this state within a composited color region.
    pub fn index(self) -> u32 {
        match self {
            FacingState::Idle => 0,
            FacingState::Left => 1,
            FacingState::Right => 2,
        }
    }
}

impl std::fmt::Display for FacingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FacingState::Idle => "idle",
            FacingState::Left => "left",
            FacingState::Right => "right",
        };
        write!(f, "{}", s)
    }
}

/// Head frame size category. Mounted classes use small heads.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadSize {
    Small,
    #[default]
    Large,
}

impl std::fmt::Display for HeadSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            HeadSize::Small => "small",
            HeadSize::Large => "large",
        };
        write!(f, "{}", s)
    }
}

/// Whether to composite only the idle row or all three state rows.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompositeMode {
    Idle,
    Full,
}

impl std::fmt::Display for CompositeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CompositeMode::Idle => "idle",
            CompositeMode::Full => "full",
        };
        write!(f, "{}", s)
    }
}
