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

//! Client contract layer.
//!
//! The distributed grid itself is an external collaborator. This layer states
//! what the adapter consumes from it: named counter and map proxies whose
//! operations return a [`GridFuture`] with a completion callback.
//!
//! ```
//! use rx_grid::client::{GridFuture, InvocationPromise};
//!
//! let promise = InvocationPromise::<i64>::new();
//! promise.and_then(Box::new(|result| assert_eq!(result, Ok(8))));
//! assert!(promise.complete(Ok(8)));
//! ```

pub mod atomic_long;
pub mod function;
pub mod instance;
pub mod invocation;
pub mod map;

pub use atomic_long::AtomicLong;
pub use function::{EntryProcessor, FunctionRef, GridFunction, MapEntry, ProcessorRef};
pub use instance::GridInstance;
pub use invocation::{CompletionCallback, GridFuture, InvocationPromise, InvocationRef};
pub use map::{GridMap, MapKey, MapValue};
