/*!
 * Integration tests for ordering and the concurrency cap under load
 */

use std::time::Duration;

use srtai::providers::mock::MockBackend;
use srtai::TranslationService;
use crate::common;

fn random_delay(_texts: &[String]) -> Duration {
    Duration::from_millis(rand::random_range(1..50))
}

/// Batches finishing in random order still come back in cue order
#[tokio::test(start_paused = true)]
async fn test_translate_withRandomLatency_shouldKeepCueOrder() {
    let backend = MockBackend::working().with_delay(random_delay);
    let service = TranslationService::new(common::test_job(3, 5, 0), common::shared(&backend)).unwrap();
    let texts = common::numbered_texts(60);

    let result = service.translate_texts(texts.clone()).await.unwrap();

    let expected: Vec<String> = texts.iter().map(|t| MockBackend::translate_text(t)).collect();
    assert_eq!(result, expected);
    assert_eq!(backend.call_count(), 20);
}

/// Never more requests in flight than the configured concurrency
#[tokio::test(start_paused = true)]
async fn test_translate_withConcurrencyCap_shouldNeverExceedIt() {
    for concurrency in [1, 2, 4] {
        let backend = MockBackend::working().with_latency(Duration::from_millis(25));
        let service = TranslationService::new(common::test_job(1, concurrency, 0), common::shared(&backend)).unwrap();

        service.translate_texts(common::numbered_texts(12)).await.unwrap();

        assert_eq!(backend.call_count(), 12);
        assert_eq!(backend.peak_in_flight(), concurrency);
    }
}

/// Concurrency above the batch count runs every batch at once
#[tokio::test(start_paused = true)]
async fn test_translate_withMoreWorkersThanBatches_shouldRunAllAtOnce() {
    let backend = MockBackend::working().with_latency(Duration::from_millis(25));
    let service = TranslationService::new(common::test_job(2, 16, 0), common::shared(&backend)).unwrap();

    let result = service.translate_texts(common::numbered_texts(6)).await.unwrap();

    assert_eq!(result.len(), 6);
    assert_eq!(backend.peak_in_flight(), 3);
}

/// Sporadic failures are absorbed by retries without losing any cue
#[tokio::test(start_paused = true)]
async fn test_translate_withIntermittentFailures_shouldTranslateEverything() {
    let backend = MockBackend::intermittent(3);
    let service = TranslationService::new(common::test_job(2, 1, 2), common::shared(&backend)).unwrap();
    let texts = common::numbered_texts(10);

    let result = service.translate_texts(texts.clone()).await.unwrap();

    let expected: Vec<String> = texts.iter().map(|t| MockBackend::translate_text(t)).collect();
    assert_eq!(result, expected);
    // five batches plus one retry for each of the two failed calls
    assert_eq!(backend.call_count(), 7);
}
