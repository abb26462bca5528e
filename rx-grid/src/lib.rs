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

//! # rx-grid
//!
//! `rx-grid` re-exposes the callback-based operations of a distributed data
//! grid client (atomic counters and maps) as cold, cancellable observables.
//!
//! Typical usage is centered on [`RxGrid`], [`RxAtomicLong`] and [`RxMap`].
//! The grid itself is consumed through the traits in [`client`].
//!
//! ## Counter
//!
//! ```
//! use std::sync::Arc;
//! use memory_grid::{MemoryGrid, MemoryGridConfig};
//! use rx_grid::RxGrid;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let instance = MemoryGrid::start(MemoryGridConfig::default()).unwrap();
//! let grid = RxGrid::from_instance(Arc::new(instance));
//! let hits = grid.get_atomic_long("hits");
//!
//! hits.set(5).first().await.unwrap();
//! assert_eq!(hits.add_and_get(3).first().await, Ok(Some(8)));
//! assert_eq!(hits.compare_and_set(8, 10).first().await, Ok(Some(true)));
//! assert_eq!(hits.compare_and_set(8, 20).first().await, Ok(Some(false)));
//! assert_eq!(hits.get().first().await, Ok(Some(10)));
//! # });
//! ```
//!
//! ## Map
//!
//! Absent entries are emitted as `None`.
//!
//! ```
//! use std::sync::Arc;
//! use memory_grid::{MemoryGrid, MemoryGridConfig};
//! use rx_grid::RxGrid;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let instance = MemoryGrid::start(MemoryGridConfig::default()).unwrap();
//! let grid = RxGrid::from_instance(Arc::new(instance));
//! let sessions = grid.get_map::<String, String>("sessions").unwrap();
//!
//! assert_eq!(sessions.get("k".to_string()).first().await, Ok(Some(None)));
//! assert_eq!(
//!     sessions.put("k".to_string(), "v".to_string()).first().await,
//!     Ok(Some(None))
//! );
//! assert_eq!(
//!     sessions.get("k".to_string()).first().await,
//!     Ok(Some(Some("v".to_string())))
//! );
//! # });
//! ```
//!
//! ## Cold subscriptions
//!
//! Building an observable does nothing. Each subscription issues exactly one
//! underlying call; subscribing twice issues two.
//!
//! ```
//! use std::sync::Arc;
//! use memory_grid::{MemoryGrid, MemoryGridConfig};
//! use rx_grid::RxGrid;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let instance = Arc::new(MemoryGrid::start(MemoryGridConfig::default()).unwrap());
//! let grid = RxGrid::from_instance(instance.clone());
//! let increment = grid.get_atomic_long("visits").increment_and_get();
//! assert_eq!(instance.invocation_count(), 0);
//!
//! assert_eq!(increment.first().await, Ok(Some(1)));
//! assert_eq!(increment.first().await, Ok(Some(2)));
//! assert_eq!(instance.invocation_count(), 2);
//! # });
//! ```
//!
//! ## Internal architecture map
//!
//! - Client contract: counter, map and instance traits consumed from the grid
//! - Bridge: one generic completion-callback to observable conversion
//! - Reactive facades: per-proxy method mapping onto the bridge
//!
//! ## Observability model
//!
//! The workspace uses `tracing` for logs/events.
//! Library code emits events/spans and does not unconditionally initialize a global
//! subscriber. Binaries and tests are responsible for one-time
//! `tracing_subscriber` initialization at process boundaries.

mod bridge;
pub use bridge::{Completable, Observable, ObservableStream, Observer, Subscription};

pub mod client;

mod error;
pub use error::{ErrorCode, GridError};

#[doc(hidden)]
pub mod observability;

mod rx;
pub use rx::atomic_long::RxAtomicLong;
pub use rx::instance::RxGrid;
pub use rx::map::RxMap;
