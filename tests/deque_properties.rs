use keel::iter::{advance, distance, Bidirectional, Cursor as _, Reverse};
use keel::{Deque, Error};
use std::cell::Cell;
use std::rc::Rc;

const B: usize = 8;
type Small<T> = Deque<T, B>;

fn contents<T: Clone, const N: usize>(d: &Deque<T, N>) -> Vec<T> {
    d.iter().cloned().collect()
}

#[test]
fn test_push_back_order() {
    let mut d: Small<i32> = (0..20).collect();
    d.push_back(100);
    d.push_back(200);
    let len = d.len();
    assert_eq!(d[len - 2], 100);
    assert_eq!(d[len - 1], 200);
}

#[test]
fn test_range_round_trip_at_buffer_boundaries() {
    for n in [0, 1, B - 1, B, B + 1, 2 * B, 5 * B + 3] {
        let source: Vec<usize> = (0..n).collect();
        let d = Small::try_from_slice_in(&source, Default::default()).unwrap();
        assert_eq!(d.len(), n);
        assert_eq!(contents(&d), source, "length {n}");

        let moved = Small::from(source.clone());
        assert_eq!(contents(&moved), source, "length {n}");
    }
}

#[test]
fn test_cursor_difference_matches_stepping() {
    let mut d: Small<u32> = (0..30).collect();
    for i in 0..13 {
        d.push_front(100 + i);
    }
    let len = d.len();
    for i in 0..=len {
        for j in i..=len {
            let a = d.cursor_at(i);
            let b = d.cursor_at(j);
            let mut steps = 0isize;
            let mut c = a;
            while c != b {
                c.increment();
                steps += 1;
            }
            assert_eq!(b - a, steps);
            assert_eq!(a - b, -steps);
            assert_eq!(a + steps, b);
            assert_eq!(distance(&a, &b), steps);
        }
    }
}

#[test]
fn test_cursor_arithmetic_and_access() {
    let d: Small<i32> = (0..50).collect();
    let begin = d.begin();
    let end = d.end();
    assert_eq!(end - begin, 50);
    assert_eq!(begin.get(), Some(&0));
    assert_eq!(end.get(), None);
    assert_eq!(begin.get_at(17), Some(&17));
    assert_eq!((end - 1).get(), Some(&49));
    assert!(begin < end);

    let mut c = begin + 20;
    c -= 13;
    assert_eq!(c.get(), Some(&7));
    c.decrement();
    assert_eq!(c.position(), 6);
    advance(&mut c, 40);
    assert_eq!(c.get(), Some(&46));
    assert_eq!((c + 10).get(), None);

    let reversed: Vec<i32> = {
        let mut it = Reverse::new(end);
        let stop = Reverse::new(begin);
        let mut out = Vec::new();
        while it != stop {
            out.push(unsafe { *it.get_unchecked() });
            it.increment();
        }
        out
    };
    assert_eq!(reversed, (0..50).rev().collect::<Vec<_>>());
}

#[derive(Clone)]
struct Counted<'a> {
    drops: &'a Cell<usize>,
}

impl Drop for Counted<'_> {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

#[test]
fn test_clear_twice_drops_each_element_once() {
    let drops = Cell::new(0);
    let mut d = Small::default();
    for _ in 0..(3 * B + 5) {
        d.push_back(Counted { drops: &drops });
    }
    for _ in 0..4 {
        d.push_front(Counted { drops: &drops });
    }
    d.clear();
    assert_eq!(drops.get(), 3 * B + 9);
    d.clear();
    assert_eq!(d.len(), 0);
    assert_eq!(drops.get(), 3 * B + 9);
    assert!(d.begin() == d.end());
}

#[test]
fn test_alternating_pops_drain_everything() {
    let mut d: Deque<i32> = Deque::new();
    for i in 1..=1000 {
        d.push_back(i);
    }
    for _ in 0..500 {
        assert!(d.pop_front().is_some());
        assert!(d.pop_back().is_some());
    }
    assert_eq!(d.len(), 0);
    assert!(d.is_empty());
    assert_eq!(d.pop_front(), None);
}

#[test]
fn test_small_scenario() {
    let mut d: Small<i32> = (0..10).collect();
    d.push_back(10);
    d.push_front(-1);
    assert_eq!(d.len(), 12);
    assert_eq!(d[0], -1);
    assert_eq!(d[11], 10);
    assert_eq!(d.front(), Some(&-1));
    assert_eq!(d.back(), Some(&10));
    assert_eq!(d.at(12), Err(Error::OutOfRange { index: 12, len: 12 }));
}

#[test]
fn test_take_leaves_source_inert() {
    let mut d: Small<String> = (0..40).map(|i| i.to_string()).collect();
    let moved = d.take();
    assert_eq!(moved.len(), 40);
    assert_eq!(d.len(), 0);
    assert!(d.begin() == d.end());
    assert_eq!(d.map_size(), 0);
    assert_eq!(d.iter().next(), None);
    assert_eq!(d.pop_back(), None);
    d.clear();
    d.push_back("fresh".to_string());
    assert_eq!(contents(&d), ["fresh"]);
    assert_eq!(moved[39], "39");
}

#[test]
fn test_push_past_initial_map_keeps_order() {
    let mut d = Small::default();
    d.push_back(0usize);
    let initial = d.map_size() * B;
    for i in 1..(initial * 3) {
        if i % 2 == 0 {
            d.push_back(i);
        } else {
            d.push_front(i);
        }
    }
    assert!(d.map_size() > keel::config::MIN_MAP_SIZE);
    let fronts: Vec<usize> = (1..initial * 3).filter(|i| i % 2 == 1).rev().collect();
    let backs: Vec<usize> = std::iter::once(0)
        .chain((1..initial * 3).filter(|i| i % 2 == 0))
        .collect();
    let expected: Vec<usize> = fronts.into_iter().chain(backs).collect();
    assert_eq!(contents(&d), expected);
}

#[test]
fn test_iterators_are_double_ended_and_exact() {
    let mut d: Small<i32> = (0..25).collect();
    let mut it = d.iter();
    assert_eq!(it.len(), 25);
    assert_eq!(it.nth(9), Some(&9));
    assert_eq!(it.nth_back(4), Some(&20));
    assert_eq!(it.len(), 10);
    assert_eq!(it.next_back(), Some(&19));
    assert_eq!(it.nth(100), None);
    assert_eq!(it.next(), None);

    for x in d.iter_mut() {
        *x *= 2;
    }
    assert_eq!(d[12], 24);
    let back_to_front: Vec<i32> = d.clone().into_iter().rev().take(3).collect();
    assert_eq!(back_to_front, [48, 46, 44]);
}

#[test]
fn test_element_addresses_are_stable_under_end_growth() {
    let mut d: Small<u64> = (0..5).collect();
    let address = std::ptr::addr_of!(d[3]);
    for i in 0..1000 {
        d.push_back(i);
        d.push_front(i);
    }
    assert_eq!(std::ptr::addr_of!(d[1003]), address);
}

#[test]
fn test_clone_is_deep() {
    let token = Rc::new(());
    let d: Small<Rc<()>> = (0..20).map(|_| Rc::clone(&token)).collect();
    let copy = d.clone();
    assert_eq!(Rc::strong_count(&token), 41);
    assert_eq!(copy.len(), 20);
    drop(d);
    assert_eq!(Rc::strong_count(&token), 21);
    drop(copy);
    assert_eq!(Rc::strong_count(&token), 1);
}

#[test]
fn test_comparisons_and_hash() {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let a: Small<i32> = (0..10).collect();
    let mut b: Deque<i32, B> = Deque::default();
    for i in (0..10).rev() {
        b.push_front(i);
    }
    assert_eq!(a, b);
    let hash = |d: &Small<i32>| {
        let mut h = DefaultHasher::new();
        d.hash(&mut h);
        h.finish()
    };
    assert_eq!(hash(&a), hash(&b));
    b.push_back(0);
    assert!(a < b);
    assert_eq!(format!("{:?}", Small::from([1, 2, 3])), "[1, 2, 3]");
}
