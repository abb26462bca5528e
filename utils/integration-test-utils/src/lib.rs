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

//! Shared helpers for workspace tests: logging setup, a recording
//! observer, and a manually driven counter double.

mod manual;
mod recording;

pub use manual::ManualAtomicLong;
pub use recording::{recording, Recording, RecordingObserver, Signal};

use rx_grid::client::{GridFuture, InvocationRef};
use rx_grid::GridError;
use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Installs a test-writer `tracing` subscriber once per process.
/// `RUST_LOG` overrides the default `warn` filter.
pub fn init_logging() {
    INIT_LOGGING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Waits for a raw client invocation to complete.
pub async fn resolve<T: Send + 'static>(invocation: InvocationRef<T>) -> Result<T, GridError> {
    let (sender, receiver) = futures::channel::oneshot::channel();
    invocation.and_then(Box::new(move |result| {
        let _ = sender.send(result);
    }));
    receiver
        .await
        .unwrap_or_else(|_| Err(GridError::cancelled("completion callback was dropped")))
}
