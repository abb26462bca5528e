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

//! Reactive facade layer.
//!
//! One facade per client proxy. Facades hold nothing but the delegate handle;
//! each method maps its arguments onto one bridged invocation.

pub mod atomic_long;
pub mod instance;
pub mod map;
