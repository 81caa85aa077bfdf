// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod backend;
pub mod console;
pub mod faults;

pub use backend::*;
pub use console::*;
pub use faults::*;
