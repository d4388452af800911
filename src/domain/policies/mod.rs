//! Domain Policies
//!
//! Business rules that govern what ships. Pure functions over domain types.

mod production_filter;

pub use production_filter::{
    Classified, FileInput, FilterBatch, FilterConfigError, FilterDecision, FilterRule,
    FilterStats, FilterSubject, ProductionFilter, EDITOR_MARKER,
};
