/*!
 * Bounded concurrent dispatch with order-preserving assembly.
 *
 * A fixed pool of workers drains one shared queue of items. Each worker
 * claims the next item under a lock, runs the work function, and stores
 * the result in a slot addressed by the item's original index. Results
 * come back in input order whatever order the work finishes in.
 *
 * Workers are polled concurrently on the calling task, so the only
 * suspension points are the ones inside the work function itself.
 */

use std::future::Future;
use futures::future::join_all;
use log::debug;
use parking_lot::Mutex;

use crate::errors::TranslationError;

/// Run `work` over every item with at most `concurrency` in flight
///
/// `work` receives the item's original index and the item. The returned
/// vector holds one result per item, in input order.
pub async fn run_all<T, R, F, Fut>(items: Vec<T>, concurrency: usize, work: F) -> Result<Vec<R>, TranslationError>
where
    F: Fn(usize, T) -> Fut,
    Fut: Future<Output = R>,
{
    if concurrency == 0 {
        return Err(TranslationError::Config("concurrency must be greater than zero".to_string()));
    }

    let total = items.len();
    let worker_count = concurrency.min(total);
    debug!("Dispatching {} items over {} workers", total, worker_count);

    let queue = Mutex::new(items.into_iter().enumerate());
    let slots: Mutex<Vec<Option<R>>> = Mutex::new((0..total).map(|_| None).collect());

    let (queue_ref, slots_ref, work_ref) = (&queue, &slots, &work);
    let workers = (0..worker_count).map(move |_| async move {
        loop {
            // The guard is dropped before the work is awaited
            let claimed = queue_ref.lock().next();
            let Some((index, item)) = claimed else {
                break;
            };
            let result = work_ref(index, item).await;
            slots_ref.lock()[index] = Some(result);
        }
    });
    join_all(workers).await;

    let slots = slots.into_inner();
    let filled = slots.iter().filter(|slot| slot.is_some()).count();
    if filled != total {
        return Err(TranslationError::LengthMismatch {
            expected: total,
            actual: filled,
        });
    }

    Ok(slots.into_iter().flatten().collect())
}
