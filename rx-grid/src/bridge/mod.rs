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

//! Future-to-stream bridge layer.
//!
//! Turns one completion callback into one cold observable. Each subscription
//! owns its pending invocation and moves through `issued` to exactly one of
//! completed, failed or cancelled.
//!
//! ```
//! use rx_grid::client::{InvocationPromise, InvocationRef};
//! use rx_grid::Observable;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let observable = Observable::from_invocation("get", || {
//!     InvocationPromise::completed(Ok(5_i64)) as InvocationRef<i64>
//! });
//!
//! assert_eq!(observable.first().await, Ok(Some(5)));
//! # });
//! ```

pub(crate) mod observable;
pub(crate) mod observer;
pub(crate) mod stream;
pub(crate) mod subscription;

pub use observable::{Completable, Observable};
pub use observer::Observer;
pub use stream::ObservableStream;
pub use subscription::Subscription;
