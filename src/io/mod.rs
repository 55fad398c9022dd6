// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for annotation envelopes and RV session files.

pub mod gto;
pub mod rv;
pub mod serialization;
