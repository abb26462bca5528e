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

//! # memory-grid
//!
//! In-process data grid implementing the [`rx_grid::client`] contract.
//!
//! Every operation is queued to a dedicated I/O thread and completes its
//! invocation from there, so callbacks never run on the caller's thread.
//! Configurable latency, failure injection and invocation counters make the
//! grid usable as a test double as well as a local backend.
//!
//! ```
//! use std::time::Duration;
//! use memory_grid::{MemoryGrid, MemoryGridConfig};
//! use rx_grid::client::{AtomicLong, GridInstance};
//!
//! let grid = MemoryGrid::start(
//!     MemoryGridConfig::default()
//!         .with_name("local")
//!         .with_latency(Duration::from_millis(1)),
//! )
//! .unwrap();
//! let counter = grid.get_atomic_long("hits");
//! assert_eq!(counter.name(), "hits");
//! assert_eq!(grid.invocation_count(), 0);
//! ```

mod atomic_long;
mod config;
mod executor;
mod map;

pub use atomic_long::MemoryAtomicLong;
pub use config::MemoryGridConfig;
pub use map::MemoryMap;

use executor::GridExecutor;
use rx_grid::client::{GridInstance, MapKey, MapValue};
use rx_grid::{ErrorCode, GridError};
use std::any::{type_name, Any};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

const MEMORY_GRID_TAG: &str = "MemoryGrid:";
const MEMORY_GRID_FN_START_TAG: &str = "start():";
const MEMORY_GRID_FN_GET_MAP_TAG: &str = "get_map():";

pub struct MemoryGrid {
    config: MemoryGridConfig,
    executor: Arc<GridExecutor>,
    counters: Mutex<HashMap<String, Arc<MemoryAtomicLong>>>,
    maps: Mutex<HashMap<String, Arc<dyn Any + Send + Sync>>>,
}

impl MemoryGrid {
    /// Starts the I/O thread and returns a connected instance.
    pub fn start(config: MemoryGridConfig) -> Result<Self, GridError> {
        let executor = GridExecutor::start(&config.name, config.latency)?;
        info!(
            "{MEMORY_GRID_TAG}:{MEMORY_GRID_FN_START_TAG} started {}, latency: {:?}, default_ttl: {:?}",
            config.name, config.latency, config.default_ttl
        );
        Ok(Self {
            config,
            executor: Arc::new(executor),
            counters: Mutex::new(HashMap::new()),
            maps: Mutex::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &MemoryGridConfig {
        &self.config
    }

    /// Operations issued against any proxy of this instance.
    pub fn invocation_count(&self) -> usize {
        self.executor.stats().invocations()
    }

    /// Operations that were cancelled before the I/O thread ran them.
    pub fn cancelled_invocation_count(&self) -> usize {
        self.executor.stats().skipped_after_cancel()
    }

    /// Fails the next operation the I/O thread executes with `error` instead
    /// of running it. Cancelled operations do not consume a failure.
    /// Queued failures are consumed in order, one per operation.
    pub fn inject_failure(&self, error: GridError) {
        warn!("{MEMORY_GRID_TAG} next invocation will fail with {error}");
        self.executor.stats().push_failure(error);
    }
}

impl GridInstance for MemoryGrid {
    type AtomicLong = MemoryAtomicLong;
    type Map<K: MapKey, V: MapValue> = MemoryMap<K, V>;

    fn name(&self) -> &str {
        &self.config.name
    }

    fn get_atomic_long(&self, name: &str) -> Arc<MemoryAtomicLong> {
        let mut counters = self.counters.lock().unwrap_or_else(PoisonError::into_inner);
        counters
            .entry(name.to_string())
            .or_insert_with(|| {
                debug!("{MEMORY_GRID_TAG} creating atomic long {name}");
                Arc::new(MemoryAtomicLong::new(name, self.executor.clone()))
            })
            .clone()
    }

    fn get_map<K: MapKey, V: MapValue>(
        &self,
        name: &str,
    ) -> Result<Arc<MemoryMap<K, V>>, GridError> {
        let mut maps = self.maps.lock().unwrap_or_else(PoisonError::into_inner);
        let proxy = maps
            .entry(name.to_string())
            .or_insert_with(|| -> Arc<dyn Any + Send + Sync> {
                debug!("{MEMORY_GRID_TAG}:{MEMORY_GRID_FN_GET_MAP_TAG} creating map {name}");
                Arc::new(MemoryMap::<K, V>::new(
                    name,
                    self.config.default_ttl,
                    self.executor.clone(),
                ))
            })
            .clone();

        proxy.downcast::<MemoryMap<K, V>>().map_err(|_| {
            GridError::fail_with_code(
                ErrorCode::InvalidArgument,
                format!(
                    "map {name} is already bound to other types than <{}, {}>",
                    type_name::<K>(),
                    type_name::<V>()
                ),
            )
        })
    }
}
