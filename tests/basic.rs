use bytes::Bytes;
use ignix_lite::*;
use std::collections::VecDeque;
use std::thread::sleep;
use std::time::{Duration, Instant};

fn store() -> Store {
    Store::new(StoreConfig::lazy_only())
}

#[test]
fn lpush_rpop_is_fifo() {
    let s = store();
    s.lpush("q", "a").unwrap();
    s.lpush("q", "b").unwrap();
    s.lpush("q", "c").unwrap();
    assert_eq!(s.rpop("q").unwrap(), Some(Bytes::from_static(b"a")));
    assert_eq!(s.rpop("q").unwrap(), Some(Bytes::from_static(b"b")));
    assert_eq!(s.rpop("q").unwrap(), Some(Bytes::from_static(b"c")));
    assert_eq!(s.llen("q").unwrap(), 0);
}

#[test]
fn bitmap_scenario() {
    let s = store();
    assert_eq!(s.setbit("bm", 125, 1).unwrap(), 0);
    assert_eq!(s.getbit("bm", 125).unwrap(), 1);
    assert_eq!(s.setbit("bm", 125, 0).unwrap(), 1);
    assert_eq!(s.setbit("bm", 1, 7), Err(StoreError::InvalidBitValue));
}

#[test]
fn hll_scenario() {
    let s = store();
    s.pfadd("u", "x").unwrap();
    s.pfadd("u", "y").unwrap();
    s.pfadd("u", "x").unwrap();
    assert_eq!(s.pfcount("u").unwrap(), 2);
}

#[test]
fn every_type_round_trips() {
    let s = store();

    let mut set = ignix_lite::value::Members::default();
    set.insert("m".to_string());
    let mut zset = SortedSet::new();
    zset.insert("m", 1.5).unwrap();
    let mut bitmap = Bitmap::new();
    bitmap.set(9, 1).unwrap();
    let mut hll = HyperLogLog::new();
    hll.add(b"x");
    let mut geo = GeoSet::new();
    geo.insert("m", 2.35, 48.85).unwrap();
    let mut hash = ignix_lite::value::Fields::default();
    hash.insert("f".to_string(), Bytes::from_static(b"v"));

    let values = vec![
        Value::from("plain"),
        Value::Set(set),
        Value::SortedSet(zset),
        Value::List(VecDeque::from(vec![Bytes::from_static(b"a"), Bytes::from_static(b"b")])),
        Value::Bitmap(bitmap),
        Value::Hll(hll),
        Value::Geo(geo),
        Value::Hash(hash),
    ];
    for (i, v) in values.into_iter().enumerate() {
        let key = format!("k{}", i);
        s.set(&key, v.clone(), None);
        assert_eq!(s.get(&key), Some(v.clone()));
        assert_eq!(s.key_type(&key), Some(v.type_name()));
    }
}

#[test]
fn typed_commands_read_values_set_generically() {
    let s = store();
    let mut zset = SortedSet::new();
    zset.insert("b", 2.0).unwrap();
    zset.insert("a", 1.0).unwrap();
    s.set("z", Value::SortedSet(zset), None);
    assert_eq!(s.zrange_by_score("z", f64::NEG_INFINITY, f64::INFINITY).unwrap(), ["a", "b"]);
    assert_eq!(s.sadd("z", "m"), Err(StoreError::TypeMismatch));
}

#[test]
fn expiry_boundary() {
    let s = store();
    let ttl = Duration::from_millis(60);
    let start = Instant::now();
    s.set_string("k", "v", Some(ttl));

    // present on every read strictly before the deadline
    while start.elapsed() + Duration::from_millis(20) < ttl {
        assert!(s.exists("k"));
        sleep(Duration::from_millis(5));
    }
    sleep(ttl);
    assert!(!s.exists("k"));
    assert_eq!(s.get_string("k").unwrap(), None);
    assert_eq!(s.ttl("k"), TtlStatus::Missing);
}

#[test]
fn expiry_does_not_depend_on_sweep() {
    // reaper on, but with a period far longer than the ttl
    let s = Store::new(StoreConfig::default().with_sweep_interval_ms(60_000));
    s.set_string("k", "v", Some(Duration::from_millis(10)));
    sleep(Duration::from_millis(30));
    assert!(!s.exists("k"));
}

#[test]
fn reaper_reclaims_untouched_keys() {
    let s = Store::new(StoreConfig::default().with_sweep_interval_ms(5));
    for i in 0..50 {
        s.set_string(&format!("tmp:{}", i), "x", Some(Duration::from_millis(10)));
    }
    s.set_string("keep", "x", None);

    let start = Instant::now();
    while s.len() > 1 && start.elapsed() < Duration::from_secs(5) {
        sleep(Duration::from_millis(10));
    }
    assert_eq!(s.len(), 1);
    assert!(s.exists("keep"));
}

#[test]
fn set_with_ttl_then_overwrite_clears_deadline() {
    let s = store();
    s.set_string("k", "v", Some(Duration::from_millis(20)));
    s.set_string("k", "w", None);
    sleep(Duration::from_millis(40));
    assert_eq!(s.get_string("k").unwrap(), Some(Bytes::from_static(b"w")));
}
