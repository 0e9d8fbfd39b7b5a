use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Barrier};
use std::thread;
use std::time::Duration;

use fontbind_core::{ExpireAfterAccessCache, ManualClock, TypefaceCacheConfig};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn manual_cache(idle: Duration) -> (Arc<ExpireAfterAccessCache<String, Arc<String>>>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    let cache = Arc::new(ExpireAfterAccessCache::with_clock(idle, clock.clone()));
    (cache, clock)
}

#[test]
fn concurrent_misses_on_one_key_load_once() {
    init_logging();
    let (cache, _clock) = manual_cache(Duration::from_secs(60));
    let loads = Arc::new(AtomicUsize::new(0));
    let threads = 16;
    let barrier = Arc::new(Barrier::new(threads));

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let loads = Arc::clone(&loads);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                cache
                    .get_or_try_insert_with(&"Inter".to_string(), || {
                        loads.fetch_add(1, Ordering::SeqCst);
                        // Widen the window in which other threads can miss
                        thread::sleep(Duration::from_millis(20));
                        Ok::<_, Infallible>(Arc::new("typeface".to_string()))
                    })
                    .unwrap()
            })
        })
        .collect();

    let values: Vec<Arc<String>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(1, loads.load(Ordering::SeqCst), "loader should run once");
    assert!(values.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    assert_eq!(cache.len(), 1);
}

#[test]
fn different_keys_load_independently() {
    init_logging();
    let (cache, _clock) = manual_cache(Duration::from_secs(60));
    let loads = AtomicUsize::new(0);

    for key in ["a", "b", "c", "a", "b"] {
        cache
            .get_or_try_insert_with(&key.to_string(), || {
                loads.fetch_add(1, Ordering::SeqCst);
                Ok::<_, Infallible>(Arc::new(key.to_string()))
            })
            .unwrap();
    }

    assert_eq!(3, loads.load(Ordering::SeqCst));
    let stats = cache.stats();
    assert_eq!(stats.entries, 3);
    assert_eq!(stats.hits, 2);
    assert_eq!(stats.misses, 3);
}

#[test]
fn idle_entry_is_reloaded_after_window() {
    init_logging();
    let config = TypefaceCacheConfig::default();
    let (cache, clock) = manual_cache(config.idle_timeout);
    let loads = AtomicUsize::new(0);
    let key = "Roboto".to_string();

    let load = || {
        cache
            .get_or_try_insert_with(&key, || {
                loads.fetch_add(1, Ordering::SeqCst);
                Ok::<_, Infallible>(Arc::new("roboto".to_string()))
            })
            .unwrap()
    };

    let first = load();
    clock.advance(Duration::from_secs(59));
    let second = load();
    assert!(Arc::ptr_eq(&first, &second), "within the window the entry is reused");
    assert_eq!(1, loads.load(Ordering::SeqCst));

    clock.advance(Duration::from_secs(60));
    let third = load();
    assert_eq!(2, loads.load(Ordering::SeqCst), "idle entry should be reloaded");
    assert!(!Arc::ptr_eq(&first, &third));
    assert_eq!(cache.stats().evictions, 1);
}

#[test]
fn failed_loads_are_retried() {
    let (cache, _clock) = manual_cache(Duration::from_secs(60));
    let key = "missing".to_string();
    let attempts = AtomicUsize::new(0);

    for _ in 0..2 {
        let result = cache.get_or_try_insert_with(&key, || {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err::<Arc<String>, _>("not found")
        });
        assert!(result.is_err());
    }

    assert_eq!(2, attempts.load(Ordering::SeqCst));
    assert!(cache.is_empty());
}

#[test]
fn retry_after_failed_load_stays_cached() {
    init_logging();
    let (cache, _clock) = manual_cache(Duration::from_secs(60));
    let key = "Flaky".to_string();
    let (started_tx, started_rx) = mpsc::channel();
    let (fail_tx, fail_rx) = mpsc::channel::<()>();
    let (retrying_tx, retrying_rx) = mpsc::channel();
    let (finish_tx, finish_rx) = mpsc::channel::<()>();

    let failing = {
        let cache = Arc::clone(&cache);
        let key = key.clone();
        thread::spawn(move || {
            cache.get_or_try_insert_with(&key, || {
                started_tx.send(()).unwrap();
                fail_rx.recv().unwrap();
                Err("network down")
            })
        })
    };
    started_rx.recv().unwrap();

    let retrying = {
        let cache = Arc::clone(&cache);
        let key = key.clone();
        thread::spawn(move || {
            cache.get_or_try_insert_with(&key, || {
                retrying_tx.send(()).unwrap();
                finish_rx.recv().unwrap();
                Ok::<_, &str>(Arc::new("typeface".to_string()))
            })
        })
    };
    // Let the second caller queue up behind the first load
    thread::sleep(Duration::from_millis(50));

    fail_tx.send(()).unwrap();
    retrying_rx.recv().unwrap();
    assert_eq!(failing.join().unwrap(), Err("network down"));

    finish_tx.send(()).unwrap();
    let value = retrying.join().unwrap().unwrap();

    let again = cache
        .get_or_try_insert_with(&key, || Err::<Arc<String>, _>("should not reload"))
        .unwrap();
    assert!(Arc::ptr_eq(&value, &again));
    assert_eq!(cache.len(), 1);
}
