//! Domain Services
//!
//! Pure business logic services that operate on domain entities.
//! These services have no I/O dependencies and are easily testable.

mod page_generator;
mod planner;
mod props;

pub use page_generator::{
    GenerationError, OutputLayout, PageGenerator, SeoOverrides, GENERATED_HEADER, INDEX_FILE,
};
pub use planner::{CommitPlan, CommitPlanner, FileAction, PlannedFile};
pub use props::{insert_dotted, resolve_props, PropError};
