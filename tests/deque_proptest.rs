use keel::{Deque, TrackingAllocator};
use proptest::prelude::*;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
enum Operation {
    PushBack(i32),
    PushFront(i32),
    PopBack,
    PopFront,
    Insert(usize, i32),
    Remove(usize),
    Erase(usize, usize),
    Truncate(usize),
    Swap(usize, usize),
    Set(usize, i32),
    Clear,
}

fn operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        4 => any::<i32>().prop_map(Operation::PushBack),
        4 => any::<i32>().prop_map(Operation::PushFront),
        2 => Just(Operation::PopBack),
        2 => Just(Operation::PopFront),
        2 => (any::<usize>(), any::<i32>()).prop_map(|(i, v)| Operation::Insert(i, v)),
        2 => any::<usize>().prop_map(Operation::Remove),
        1 => (any::<usize>(), 0..20usize).prop_map(|(i, n)| Operation::Erase(i, n)),
        1 => (0..64usize).prop_map(Operation::Truncate),
        1 => (any::<usize>(), any::<usize>()).prop_map(|(i, j)| Operation::Swap(i, j)),
        1 => (any::<usize>(), any::<i32>()).prop_map(|(i, v)| Operation::Set(i, v)),
        1 => Just(Operation::Clear),
    ]
}

fn apply<const B: usize>(d: &mut Deque<i32, B, TrackingAllocator<i32>>, model: &mut VecDeque<i32>, op: &Operation) {
    match *op {
        Operation::PushBack(v) => {
            d.push_back(v);
            model.push_back(v);
        }
        Operation::PushFront(v) => {
            d.push_front(v);
            model.push_front(v);
        }
        Operation::PopBack => assert_eq!(d.pop_back(), model.pop_back()),
        Operation::PopFront => assert_eq!(d.pop_front(), model.pop_front()),
        Operation::Insert(i, v) => {
            let i = i % (model.len() + 1);
            d.insert(i, v);
            model.insert(i, v);
        }
        Operation::Remove(i) => {
            let i = if model.is_empty() { i % 4 } else { i % model.len() };
            assert_eq!(d.remove(i), model.remove(i));
        }
        Operation::Erase(i, n) => {
            let from = i % (model.len() + 1);
            let to = (from + n).min(model.len());
            d.erase(from..to);
            model.drain(from..to);
        }
        Operation::Truncate(n) => {
            d.truncate(n);
            model.truncate(n);
        }
        Operation::Swap(i, j) => {
            if !model.is_empty() {
                let (i, j) = (i % model.len(), j % model.len());
                d.swap(i, j);
                model.swap(i, j);
            }
        }
        Operation::Set(i, v) => {
            if let Some(slot) = model.get_mut(i % (model.len() + 1)) {
                *slot = v;
            }
            if let Some(slot) = d.get_mut(i % (d.len() + 1)) {
                *slot = v;
            }
        }
        Operation::Clear => {
            d.clear();
            model.clear();
        }
    }
}

fn check<const B: usize>(ops: &[Operation]) {
    let alloc = TrackingAllocator::new();
    let stats = alloc.stats().clone();
    {
        let mut d: Deque<i32, B, _> = Deque::new_in(alloc);
        let mut model = VecDeque::new();
        for op in ops {
            apply(&mut d, &mut model, op);
            assert_eq!(d.len(), model.len());
            assert_eq!(d.front(), model.front());
            assert_eq!(d.back(), model.back());
        }
        assert!(d.iter().eq(model.iter()));
        assert!(d.iter().rev().eq(model.iter().rev()));
        assert_eq!(d.end() - d.begin(), model.len() as isize);
        for (i, x) in model.iter().enumerate() {
            assert_eq!(d.get(i), Some(x));
        }
        assert_eq!(d.get(model.len()), None);
    }
    assert_eq!(stats.live(), 0);
}

proptest! {
    #[test]
    fn test_matches_vec_deque_small_buffers(ops in proptest::collection::vec(operation(), 1..200)) {
        check::<1>(&ops);
        check::<3>(&ops);
    }

    #[test]
    fn test_matches_vec_deque_default_buffers(ops in proptest::collection::vec(operation(), 1..200)) {
        check::<8>(&ops);
        check::<{ keel::config::DEFAULT_BUFFER }>(&ops);
    }

    #[test]
    fn test_iterator_nth_matches_slice(
        items in proptest::collection::vec(any::<u16>(), 0..100),
        front in 0..20usize,
        back in 0..20usize,
    ) {
        let d: Deque<u16, 4> = items.iter().copied().collect();
        let mut it = d.iter();
        let mut expected = items.iter();
        prop_assert_eq!(it.nth(front), expected.nth(front));
        prop_assert_eq!(it.nth_back(back), expected.nth_back(back));
        prop_assert_eq!(it.len(), expected.len());
        prop_assert!(it.eq(expected));
    }

    #[test]
    fn test_cursor_jumps_match_indices(len in 0..200usize, from in 0..200usize, by in -200isize..200) {
        let d: Deque<usize, 7> = (0..len).collect();
        let from = from % (len + 1);
        let origin = d.cursor_at(from);
        let target = origin + by;
        let index = from as isize + by;
        prop_assert_eq!(target - origin, by);
        prop_assert_eq!(target.position(), index);
        let expected = usize::try_from(index).ok().filter(|&i| i < len);
        prop_assert_eq!(target.get().copied(), expected);
    }
}
