use ignix_lite::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;

fn store() -> Store {
    Store::new(StoreConfig::lazy_only())
}

#[test]
fn set_algebra_partitions_union() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..100 {
        let s = store();
        for _ in 0..rng.gen_range(0..30) {
            s.sadd("a", &rng.gen_range(0..40).to_string()).unwrap();
        }
        for _ in 0..rng.gen_range(0..30) {
            s.sadd("b", &rng.gen_range(0..40).to_string()).unwrap();
        }

        let inter = s.sinter(&["a", "b"]).unwrap();
        let a_only = s.sdiff(&["a", "b"]).unwrap();
        let b_only = s.sdiff(&["b", "a"]).unwrap();
        let union = s.sunion(&["a", "b"]).unwrap();

        assert!(inter.is_disjoint(&a_only));
        assert!(inter.is_disjoint(&b_only));
        assert!(a_only.is_disjoint(&b_only));

        let joined: BTreeSet<String> = inter.iter().chain(&a_only).chain(&b_only).cloned().collect();
        assert_eq!(joined, union);
    }
}

#[test]
fn zrange_is_ordered_by_score_then_member() {
    let mut rng = StdRng::seed_from_u64(11);
    let s = store();
    for i in 0..500 {
        // few distinct scores so ties are common
        let score = rng.gen_range(0..20) as f64 / 2.0;
        s.zadd("z", score, &format!("m{:03}", i)).unwrap();
    }
    for _ in 0..200 {
        s.zincrby("z", rng.gen_range(-3..=3) as f64, &format!("m{:03}", rng.gen_range(0..500)))
            .unwrap();
    }

    let members = s.zrange_by_score("z", f64::NEG_INFINITY, f64::INFINITY).unwrap();
    assert_eq!(members.len(), 500);
    let scored: Vec<(f64, &String)> = members
        .iter()
        .map(|m| (s.zscore("z", m).unwrap().unwrap(), m))
        .collect();
    for pair in scored.windows(2) {
        let ((s1, m1), (s2, m2)) = (pair[0], pair[1]);
        assert!(s1 < s2 || (s1 == s2 && m1 < m2), "{:?} before {:?}", pair[0], pair[1]);
    }

    let window = s.zrange_by_score("z", 2.0, 4.0).unwrap();
    for m in &window {
        let score = s.zscore("z", m).unwrap().unwrap();
        assert!((2.0..=4.0).contains(&score));
    }
}

#[test]
fn hll_error_is_bounded() {
    let s = store();
    let n = 20_000u64;
    for i in 0..n {
        s.pfadd("visitors", format!("user:{}", i)).unwrap();
    }
    let estimate = s.pfcount("visitors").unwrap() as f64;
    let error = (estimate - n as f64).abs() / n as f64;
    assert!(error < 0.03, "estimate {} off by {:.2}%", estimate, error * 100.0);
}

#[test]
fn lrange_matches_vec_slicing() {
    let mut rng = StdRng::seed_from_u64(3);
    let s = store();
    let items: Vec<String> = (0..25).map(|i| i.to_string()).collect();
    for item in &items {
        s.rpush("l", item).unwrap();
    }
    for _ in 0..200 {
        let start: i64 = rng.gen_range(-30..30);
        let stop: i64 = rng.gen_range(-30..30);
        let len = items.len() as i64;
        let norm = |i: i64| if i < 0 { (len + i).max(0) } else { i };
        let (from, to) = (norm(start), norm(stop).min(len - 1));
        let expected: Vec<&str> = if stop < -len || from > to {
            Vec::new()
        } else {
            items[from as usize..=to as usize].iter().map(String::as_str).collect()
        };
        let got = s.lrange("l", start, stop).unwrap();
        let got: Vec<&str> = got.iter().map(|b| std::str::from_utf8(b).unwrap()).collect();
        assert_eq!(got, expected, "lrange {} {}", start, stop);
    }
}
