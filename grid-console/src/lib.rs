/********************************************************************************
 * Copyright (c) 2024 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! Scenario console for `rx-grid`.
//!
//! Runs a json5 list of counter and map operations through the reactive
//! adapter on top of an in-process [`memory_grid::MemoryGrid`] and reports
//! one JSON line per step.

pub mod config;
pub mod scenario;
