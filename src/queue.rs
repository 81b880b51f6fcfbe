//! FIFO work queue with drain detection.
//!
//! `put` never blocks and never fails; `get` suspends until an item is
//! available; every dequeued item must be balanced by one `task_done` call.
//! `join` suspends until the number of items put equals the number marked
//! done, which is the crawl's only termination signal. FIFO order gives the
//! traversal its breadth-first shape.

use std::collections::VecDeque;

use parking_lot::Mutex;
use tokio::sync::{watch, Notify};

use crate::models::CrawlTask;

pub struct WorkQueue {
    items: Mutex<VecDeque<CrawlTask>>,
    item_available: Notify,
    // Tasks put but not yet marked done; reaching zero means drained.
    outstanding: watch::Sender<usize>,
}

impl WorkQueue {
    pub fn new() -> Self {
        let (outstanding, _) = watch::channel(0);
        Self {
            items: Mutex::new(VecDeque::new()),
            item_available: Notify::new(),
            outstanding,
        }
    }

    /// Enqueue a task and wake one waiting worker.
    pub fn put(&self, task: CrawlTask) {
        self.outstanding.send_modify(|count| *count += 1);
        self.items.lock().push_back(task);
        self.item_available.notify_one();
    }

    /// Dequeue the oldest task, suspending until one is available.
    pub async fn get(&self) -> CrawlTask {
        loop {
            // Register for the wakeup before checking the queue so a put
            // landing in between still wakes us.
            let notified = self.item_available.notified();
            if let Some(task) = self.items.lock().pop_front() {
                return task;
            }
            notified.await;
        }
    }

    /// Balance one earlier `get`. The call that brings the outstanding
    /// count to zero releases `join`.
    pub fn task_done(&self) {
        self.outstanding.send_modify(|count| {
            debug_assert!(*count > 0, "task_done called more times than put");
            *count = count.saturating_sub(1);
        });
    }

    /// Suspend until every task put has been marked done. Returns
    /// immediately when nothing is outstanding.
    pub async fn join(&self) {
        let mut drained = self.outstanding.subscribe();
        // The sender lives in self, so wait_for cannot observe a closed
        // channel here.
        let _ = drained.wait_for(|count| *count == 0).await;
    }

    /// Tasks sitting in the queue right now, not counting dequeued ones.
    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    /// Tasks put but not yet marked done, including in-flight ones.
    pub fn outstanding(&self) -> usize {
        *self.outstanding.borrow()
    }
}

impl Default for WorkQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::time::timeout;

    use super::*;

    fn task(url: &str) -> CrawlTask {
        CrawlTask::new(url, 10)
    }

    #[tokio::test]
    async fn test_get_returns_tasks_in_put_order() {
        let queue = WorkQueue::new();
        queue.put(task("https://test.local/a"));
        queue.put(task("https://test.local/b"));
        queue.put(task("https://test.local/c"));

        assert_eq!(queue.get().await.url, "https://test.local/a");
        assert_eq!(queue.get().await.url, "https://test.local/b");
        assert_eq!(queue.get().await.url, "https://test.local/c");
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_get_suspends_until_put() {
        let queue = Arc::new(WorkQueue::new());

        let waiter = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move { queue.get().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        queue.put(task("https://test.local/late"));

        let received = timeout(Duration::from_secs(5), waiter)
            .await
            .expect("get did not wake up")
            .unwrap();
        assert_eq!(received.url, "https://test.local/late");
    }

    #[tokio::test]
    async fn test_join_returns_immediately_when_nothing_outstanding() {
        let queue = WorkQueue::new();
        timeout(Duration::from_secs(1), queue.join())
            .await
            .expect("join should not block on an idle queue");
    }

    #[tokio::test]
    async fn test_join_waits_for_task_done() {
        let queue = Arc::new(WorkQueue::new());
        queue.put(task("https://test.local/a"));
        queue.put(task("https://test.local/b"));

        let worker = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move {
                for _ in 0..2 {
                    let _task = queue.get().await;
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    queue.task_done();
                }
            })
        };

        timeout(Duration::from_secs(5), queue.join())
            .await
            .expect("join did not release after all tasks were done");
        assert_eq!(queue.outstanding(), 0);
        worker.await.unwrap();
    }

    #[tokio::test]
    async fn test_join_covers_tasks_added_during_processing() {
        let queue = Arc::new(WorkQueue::new());
        queue.put(task("https://test.local/seed"));

        let worker = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move {
                // Processing the seed discovers one follow-up task.
                let seed = queue.get().await;
                assert_eq!(seed.url, "https://test.local/seed");
                queue.put(task("https://test.local/discovered"));
                queue.task_done();

                let followup = queue.get().await;
                assert_eq!(followup.url, "https://test.local/discovered");
                queue.task_done();
            })
        };

        timeout(Duration::from_secs(5), queue.join())
            .await
            .expect("join must account for tasks enqueued mid-flight");
        worker.await.unwrap();
    }

    #[tokio::test]
    async fn test_many_workers_drain_the_queue() {
        let queue = Arc::new(WorkQueue::new());
        for i in 0..100 {
            queue.put(task(&format!("https://test.local/{}", i)));
        }

        let mut workers = Vec::new();
        for _ in 0..4 {
            let queue = Arc::clone(&queue);
            workers.push(tokio::spawn(async move {
                loop {
                    tokio::select! {
                        task = queue.get() => {
                            drop(task);
                            queue.task_done();
                        }
                        _ = tokio::time::sleep(Duration::from_millis(500)) => break,
                    }
                }
            }));
        }

        timeout(Duration::from_secs(5), queue.join())
            .await
            .expect("queue did not drain");
        assert_eq!(queue.len(), 0);

        for worker in workers {
            worker.await.unwrap();
        }
    }
}
