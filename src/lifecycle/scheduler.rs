//! Hand-off from the watcher thread to the main execution context.
//!
//! The watcher never touches [`ConfigStore`](crate::config::ConfigStore). It
//! only emits [`ConfigSignal`]s through a [`Scheduler`]; the main context
//! drains them in order and applies each one.

use std::path::PathBuf;

use thiserror::Error;
use tokio::sync::mpsc;

/// Request for the main context, produced by the config watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSignal {
    /// The config file was written or created; re-read it.
    Reload { path: PathBuf },
    /// The config file was deleted or moved away.
    Removed { path: PathBuf },
}

/// The main-context queue no longer has a consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("main task queue is closed")]
pub struct SchedulerClosed;

/// Queues work onto the host's single-threaded execution context.
///
/// Implementations must preserve submission order.
pub trait Scheduler: Send + 'static {
    fn schedule(&self, signal: ConfigSignal) -> Result<(), SchedulerClosed>;
}

/// Any unbounded queue whose task type can carry a [`ConfigSignal`] works as a
/// scheduler, so a host can merge config signals with its own tasks.
impl<T> Scheduler for mpsc::UnboundedSender<T>
where
    T: From<ConfigSignal> + Send + 'static,
{
    fn schedule(&self, signal: ConfigSignal) -> Result<(), SchedulerClosed> {
        self.send(T::from(signal)).map_err(|_| SchedulerClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Task {
        Config(ConfigSignal),
        Place(u32),
    }

    impl From<ConfigSignal> for Task {
        fn from(signal: ConfigSignal) -> Self {
            Task::Config(signal)
        }
    }

    #[test]
    fn test_fifo_with_host_tasks() {
        let (tx, mut rx) = mpsc::unbounded_channel::<Task>();
        let reload = ConfigSignal::Reload {
            path: PathBuf::from("config.toml"),
        };

        tx.send(Task::Place(1)).unwrap();
        tx.schedule(reload.clone()).unwrap();
        tx.send(Task::Place(2)).unwrap();

        assert_eq!(rx.try_recv().unwrap(), Task::Place(1));
        assert_eq!(rx.try_recv().unwrap(), Task::Config(reload));
        assert_eq!(rx.try_recv().unwrap(), Task::Place(2));
    }

    #[test]
    fn test_closed_queue() {
        let (tx, rx) = mpsc::unbounded_channel::<ConfigSignal>();
        drop(rx);
        let result = tx.schedule(ConfigSignal::Removed {
            path: PathBuf::from("config.toml"),
        });
        assert_eq!(result, Err(SchedulerClosed));
    }
}
