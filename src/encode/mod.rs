//! Visual encoding: pure functions from table rows to display data.
//!
//! Nothing here touches egui. The UI layer turns these values into widgets.

pub mod distribution;
pub mod fields;
pub mod view;
