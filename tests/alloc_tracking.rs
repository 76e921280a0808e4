use keel::{AllocStats, Deque, List, TrackingAllocator, Vector};
use std::rc::Rc;

type Tracked<T> = TrackingAllocator<T>;
type TrackedDeque<T> = Deque<T, 4, Tracked<T>>;

fn tracked<T>(budget: Option<usize>) -> Tracked<T> {
    let stats = AllocStats::new();
    stats.set_budget(budget);
    TrackingAllocator::with_stats(stats)
}

#[test]
fn test_growth_uses_one_allocation_per_buffer_plus_the_map() {
    let alloc = tracked::<u64>(None);
    let stats = alloc.stats().clone();
    let mut d = TrackedDeque::new_in(alloc);
    assert_eq!(stats.allocations(), 0);

    for i in 0..1000 {
        d.push_back(i);
    }
    let buffers = d.capacity() / d.buffer_size();
    assert_eq!(stats.live(), buffers + 1);
    assert!(d.map_size() > keel::config::MIN_MAP_SIZE);

    for i in 0..1000 {
        d.push_front(i);
    }
    let buffers = d.capacity() / d.buffer_size();
    assert_eq!(stats.live(), buffers + 1);

    drop(d);
    assert_eq!(stats.live(), 0);
    assert_eq!(stats.live_bytes(), 0);
}

#[test]
fn test_every_failure_point_of_construction_is_clean() {
    let items: Vec<Rc<u8>> = (0..23).map(Rc::new).collect();

    let reference = tracked::<Rc<u8>>(None);
    let needed = {
        let stats = reference.stats().clone();
        let d = TrackedDeque::try_from_slice_in(&items, reference).unwrap();
        assert_eq!(d.len(), items.len());
        stats.allocations()
    };

    for budget in 0..=needed {
        let alloc = tracked::<Rc<u8>>(Some(budget));
        let stats = alloc.stats().clone();
        match TrackedDeque::try_from_slice_in(&items, alloc) {
            Ok(d) => {
                assert_eq!(budget, needed);
                assert!(d.iter().eq(items.iter()));
            }
            Err(err) => {
                assert!(budget < needed);
                assert!(err.size() > 0);
                assert_eq!(stats.failures(), 1);
            }
        }
        assert_eq!(stats.live(), 0, "budget {budget}");
        assert!(items.iter().all(|rc| Rc::strong_count(rc) == 1));
    }
}

#[test]
fn test_failed_pushes_leave_contents_untouched() {
    for budget in 0..8 {
        let alloc = tracked::<String>(Some(budget));
        let stats = alloc.stats().clone();
        let mut d = TrackedDeque::new_in(alloc);
        let mut pushed = Vec::new();
        for i in 0.. {
            let value = i.to_string();
            let result = if i % 3 == 0 {
                d.try_push_front(value.clone())
            } else {
                d.try_push_back(value.clone())
            };
            match result {
                Ok(()) => {
                    if i % 3 == 0 {
                        pushed.insert(0, value);
                    } else {
                        pushed.push(value);
                    }
                }
                Err(_) => break,
            }
        }
        assert!(d.iter().eq(pushed.iter()));
        assert!(stats.failures() >= 1);
        drop(d);
        assert_eq!(stats.live(), 0);
    }
}

#[test]
fn test_failed_clone_releases_the_partial_copy() {
    let alloc = tracked::<i64>(None);
    let stats = alloc.stats().clone();
    let d: TrackedDeque<i64> = {
        let mut d = TrackedDeque::new_in(alloc);
        d.extend(0..50);
        d
    };
    let before = stats.live();
    stats.set_budget(Some(3));
    assert!(d.try_clone().is_err());
    assert_eq!(stats.live(), before);
    stats.set_budget(None);
    let copy = d.try_clone().unwrap();
    assert_eq!(copy, d);
    drop((copy, d));
    assert_eq!(stats.live(), 0);
}

#[test]
fn test_vector_growth_and_failure() {
    let alloc = tracked::<u32>(None);
    let stats = alloc.stats().clone();
    let mut v = Vector::new_in(alloc);
    for i in 0..100 {
        v.push(i);
    }
    assert_eq!(stats.live(), 1);
    assert!(v.capacity() >= 100);

    stats.set_budget(Some(0));
    let cap = v.capacity();
    let mut result = Ok(());
    while result.is_ok() {
        result = v.try_push(7);
    }
    assert_eq!(v.len(), cap);
    assert_eq!(v[..100], (0..100).collect::<Vec<_>>()[..]);
    assert!(v.try_clone().is_err());
    stats.set_budget(None);
    drop(v);
    assert_eq!(stats.live(), 0);
}

#[test]
fn test_list_nodes_come_from_the_rebound_allocator() {
    let alloc = tracked::<char>(None);
    let stats = alloc.stats().clone();
    let mut list = List::new_in(alloc);
    for c in "allocator".chars() {
        list.push_back(c);
    }
    assert_eq!(stats.live(), 9);
    list.remove(0);
    list.pop_back();
    assert_eq!(stats.live(), 7);

    stats.set_budget(Some(0));
    assert!(list.try_push_front('x').is_err());
    assert!(list.try_insert(3, 'y').is_err());
    assert_eq!(list.iter().collect::<String>(), "llocato");
    drop(list);
    assert_eq!(stats.live(), 0);
}
