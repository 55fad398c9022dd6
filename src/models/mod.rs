// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: annotations, effects, the annotation store and sessions.

pub mod annotation;
pub mod effects;
pub mod session;
pub mod store;
