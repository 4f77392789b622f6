//! Planning domain models.
//!
//! Provides the record types exchanged with the planner: the work item and
//! worker catalogs it consumes, the business calendar it plans against, and
//! the schedule it produces.
//!
//! # Domain Mappings
//!
//! | grading-planner | Card grading shop |
//! |-----------------|-------------------|
//! | WorkItem | Order waiting in one stage |
//! | Worker | Employee |
//! | Stage | Order status / employee role |
//! | PriorityCode | Delivery-speed tier (`delai`) |
//! | Assignment | Planning entry |

mod calendar;
mod priority;
mod schedule;
mod stage;
mod work_item;
mod worker;

pub use calendar::{TimeWindow, WorkCalendar};
pub use priority::PriorityCode;
pub use schedule::{Assignment, Schedule, Unassignable, UnassignableReason};
pub use stage::Stage;
pub use work_item::WorkItem;
pub use worker::{Worker, DEFAULT_WORK_HOURS_PER_DAY};
