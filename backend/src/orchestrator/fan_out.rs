//! Concurrent fan-out with ordered results

use futures_util::future::join_all;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Run `task` over every item concurrently and join once
///
/// All futures are created up front and polled together; with
/// `max_concurrent` set, at most that many run their body at a time.
/// Results come back in the order of `items`, whatever order the work
/// completes in.
pub async fn join_ordered<T, R, F, Fut>(
    items: Vec<T>,
    max_concurrent: Option<usize>,
    task: F,
) -> Vec<R>
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = R>,
{
    let limiter = max_concurrent
        .filter(|n| *n > 0)
        .map(|n| Arc::new(Semaphore::new(n)));

    let futures = items.into_iter().map(|item| {
        let limiter = limiter.clone();
        let work = task(item);
        async move {
            // The semaphore is never closed, so acquire only fails if it is
            let _permit = match &limiter {
                Some(sem) => sem.acquire().await.ok(),
                None => None,
            };
            work.await
        }
    });

    join_all(futures).await
}
