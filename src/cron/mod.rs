//! Cron expressions: parsing and fire-time computation.
//!
//! ## Contents
//! - [`CronExpression`] validated five-field expression (`minute hour day-of-month month day-of-week`)
//! - `field` per-field parsing into bitsets (internal)
//!
//! Pure computation only: no clocks, no sleeping, no shared state. The scheduler's cron
//! loop asks [`CronExpression::next_fire_time`] for the next instant and sleeps on the
//! difference.

mod expression;
mod field;

pub use expression::CronExpression;
