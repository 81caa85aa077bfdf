// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod forms;
pub mod ids;
pub mod leads;
pub mod model;
pub mod opportunities;
pub mod prefs;
pub mod views;

pub use forms::*;
pub use ids::*;
pub use leads::*;
pub use model::*;
pub use opportunities::*;
pub use prefs::*;
pub use views::*;
