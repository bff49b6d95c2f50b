//! Deferred task queue.
//!
//! Tasks posted to a [`TaskQueue`] run when the host drains the queue, which
//! it does once at the end of each scheduling tick. Tasks posted while the
//! queue is being drained are deferred to the next drain.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::error::{CoreError, Result};
use crate::logging::targets;

/// A unique identifier for a deferred task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

impl TaskId {
    /// Get the raw u64 value of this task ID.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Global counter for generating unique, monotonically increasing task IDs.
static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

fn next_task_id() -> TaskId {
    TaskId(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed))
}

/// A boxed task closure.
type BoxedTask = Box<dyn FnOnce() + Send + 'static>;

struct TaskData {
    id: TaskId,
    task: BoxedTask,
}

/// A FIFO queue of deferred tasks with cancellation.
///
/// The queue locks internally, so it can be shared behind an `Arc` and posted
/// to from inside a running task.
pub struct TaskQueue {
    tasks: Mutex<VecDeque<TaskData>>,
}

impl TaskQueue {
    /// Create a new, empty task queue.
    pub fn new() -> Self {
        Self {
            tasks: Mutex::new(VecDeque::new()),
        }
    }

    /// Post a task to run on the next drain.
    ///
    /// Returns the task ID that can be used to cancel the task.
    pub fn post<F>(&self, task: F) -> TaskId
    where
        F: FnOnce() + Send + 'static,
    {
        // IDs are assigned under the lock so queue order matches ID order.
        let id = {
            let mut tasks = self.tasks.lock();
            let id = next_task_id();
            tasks.push_back(TaskData {
                id,
                task: Box::new(task),
            });
            id
        };
        tracing::trace!(target: targets::TASK, id = id.as_u64(), "task posted");
        id
    }

    /// Cancel a pending task.
    ///
    /// Returns an error if the task already ran or was never posted here.
    pub fn cancel(&self, id: TaskId) -> Result<()> {
        let mut tasks = self.tasks.lock();
        if let Some(pos) = tasks.iter().position(|t| t.id == id) {
            tasks.remove(pos);
            tracing::trace!(target: targets::TASK, id = id.as_u64(), "task cancelled");
            Ok(())
        } else {
            Err(CoreError::InvalidTask(id.as_u64()))
        }
    }

    /// Check if there are any pending tasks.
    pub fn has_pending(&self) -> bool {
        !self.tasks.lock().is_empty()
    }

    /// Get the number of pending tasks.
    pub fn pending_count(&self) -> usize {
        self.tasks.lock().len()
    }

    /// Run every task that was pending when the call started.
    ///
    /// The queue lock is released while each task runs. Tasks cancelled by an
    /// earlier task in the same drain do not run; tasks posted during the drain
    /// wait for the next one.
    ///
    /// Returns the number of tasks processed.
    pub fn process_all(&self) -> usize {
        let Some(boundary) = self.tasks.lock().back().map(|t| t.id) else {
            return 0;
        };

        let mut count = 0;
        loop {
            let next = {
                let mut tasks = self.tasks.lock();
                match tasks.front() {
                    Some(front) if front.id <= boundary => tasks.pop_front(),
                    _ => None,
                }
            };
            let Some(task_data) = next else {
                break;
            };
            (task_data.task)();
            count += 1;
        }

        tracing::trace!(target: targets::TASK, count, "processed deferred tasks");
        count
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskQueue")
            .field("pending", &self.pending_count())
            .finish()
    }
}
