// ABOUTME: Program generation pipeline: constraints, composition, lifecycle, daily resolution
// ABOUTME: Control flow: request -> policy -> composed draft -> accepted -> today's workout
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! The adaptive trainer.

pub mod composer;
pub mod constraints;
pub mod lifecycle;
pub mod schedule;

pub use composer::{ExerciseHistory, ProgramComposer};
pub use constraints::{GenerationRequest, RepScheme, SelectionPolicy, TrainingSplit};
pub use lifecycle::LifecycleManager;
pub use schedule::{resolve_daily_workout, DailyResolution};
