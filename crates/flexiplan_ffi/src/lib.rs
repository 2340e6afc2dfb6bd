//! Flutter bridge for the FlexiPlan routine core.

pub mod api;
