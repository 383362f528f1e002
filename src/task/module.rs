// src/task/module.rs

//! The contract every task module satisfies.

use anyhow::Result;

use crate::engine::DataContext;
use crate::task::TaskResult;

/// A pluggable unit of work bound to a command identifier.
///
/// Implementations may mutate the data context they are handed. Returning
/// `Err` (or panicking) is allowed: the engine contains both at the dispatch
/// boundary and records them as an `error` result on the node.
pub trait TaskModule: Send + Sync {
    fn run(&self, data: &mut DataContext) -> Result<TaskResult>;
}

/// Adapter that lets a plain closure act as a [`TaskModule`].
pub struct FnModule<F>(pub F);

impl<F> TaskModule for FnModule<F>
where
    F: Fn(&mut DataContext) -> Result<TaskResult> + Send + Sync,
{
    fn run(&self, data: &mut DataContext) -> Result<TaskResult> {
        (self.0)(data)
    }
}
