use ignix_lite::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

#[test]
fn concurrent_acquire_has_one_winner() {
    for round in 0..50 {
        let store = Arc::new(Store::new(StoreConfig::lazy_only()));
        let threads = 8;
        let barrier = Arc::new(Barrier::new(threads));
        let winners = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..threads)
            .map(|t| {
                let store = Arc::clone(&store);
                let barrier = Arc::clone(&barrier);
                let winners = Arc::clone(&winners);
                thread::spawn(move || {
                    barrier.wait();
                    let token = format!("{}-{}", round, t);
                    if store.acquire("lock", token, Duration::from_secs(10)) {
                        winners.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(winners.load(Ordering::SeqCst), 1);
    }
}

#[test]
fn counters_are_atomic() {
    let store = Arc::new(Store::default());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..1000 {
                    store.incr("hits").unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(store.incr_by("hits", 0).unwrap(), 8000);
}

#[test]
fn stale_token_cannot_release_new_holder() {
    let store = Store::new(StoreConfig::lazy_only());
    assert!(store.acquire("job", "first", Duration::from_millis(15)));
    thread::sleep(Duration::from_millis(30));
    assert!(store.acquire("job", "second", Duration::from_secs(10)));
    assert!(!store.release("job", "first"));
    assert!(store.exists("job"));
    assert!(store.release("job", "second"));
}

#[test]
fn batches_are_isolated() {
    // two keys always move together inside a batch; readers must never see
    // them disagree
    let store = Arc::new(Store::default());
    store.set_string("a", "0", None);
    store.set_string("b", "0", None);

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for _ in 0..2000 {
                let replies = store
                    .multi()
                    .cmd(Cmd::Incr("a".into()))
                    .cmd(Cmd::Incr("b".into()))
                    .exec();
                assert!(replies.iter().all(|r| r.is_ok()));
            }
        })
    };
    let reader = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for _ in 0..2000 {
                let replies = store.execute(vec![Cmd::Get("b".into()), Cmd::Get("a".into())]);
                assert_eq!(replies[0], replies[1]);
            }
        })
    };
    writer.join().unwrap();
    reader.join().unwrap();
    assert_eq!(store.incr_by("a", 0).unwrap(), 2000);
}

#[test]
fn mixed_multi_key_operations_do_not_deadlock() {
    let store = Arc::new(Store::default());
    let handles: Vec<_> = (0..6)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let (x, y) = if t % 2 == 0 { ("s1", "s2") } else { ("s2", "s1") };
                for i in 0..500 {
                    store.sadd(x, &format!("m{}", i % 17)).unwrap();
                    store.sunion(&[x, y]).unwrap();
                    store.sdiff(&[y, x]).unwrap();
                    store.rename(x, x).ok();
                    store.pfadd("hll-a", i.to_string()).unwrap();
                    store.pfmerge("hll-b", &["hll-a"]).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(store.scard("s1").unwrap(), 17);
}
