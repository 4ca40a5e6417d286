use space_invaders::error::GameError;
use space_invaders::pool::Pool;

fn filled(n: u32, capacity: usize) -> Pool<u32> {
    let mut pool = Pool::with_capacity(capacity);
    for i in 0..n {
        pool.append(i).unwrap();
    }
    pool
}

// ── append ────────────────────────────────────────────────────────────────────

#[test]
fn append_until_full_then_capacity_exceeded() {
    let mut pool = filled(3, 3);
    assert!(pool.is_full());

    let err = pool.append(99).unwrap_err();
    assert!(matches!(err, GameError::CapacityExceeded { capacity: 3 }));
    assert_eq!(pool.as_slice(), &[0, 1, 2]);
}

#[test]
fn zero_capacity_pool_rejects_everything() {
    let mut pool: Pool<u32> = Pool::with_capacity(0);
    assert!(pool.append(1).is_err());
    assert!(pool.is_empty());
}

// ── removal ───────────────────────────────────────────────────────────────────

#[test]
fn dequeue_front_is_fifo() {
    let mut pool = filled(3, 5);
    assert_eq!(pool.dequeue_front(), Some(0));
    assert_eq!(pool.dequeue_front(), Some(1));
    assert_eq!(pool.as_slice(), &[2]);
}

#[test]
fn dequeue_front_on_empty_pool_is_none() {
    let mut pool: Pool<u32> = Pool::with_capacity(2);
    assert_eq!(pool.dequeue_front(), None);
}

#[test]
fn extract_at_keeps_relative_order() {
    let mut pool = filled(5, 5);
    assert_eq!(pool.extract_at(2), Some(2));
    assert_eq!(pool.as_slice(), &[0, 1, 3, 4]);
    assert_eq!(pool.len(), 4);
}

#[test]
fn extract_at_out_of_range_is_a_no_op() {
    let mut pool = filled(2, 5);
    assert_eq!(pool.extract_at(2), None);
    assert_eq!(pool.extract_at(40), None);
    assert_eq!(pool.as_slice(), &[0, 1]);
}

#[test]
fn removal_frees_a_slot_for_append() {
    let mut pool = filled(3, 3);
    pool.extract_at(1);
    assert!(pool.append(7).is_ok());
    assert_eq!(pool.as_slice(), &[0, 2, 7]);
}

// ── lookup ────────────────────────────────────────────────────────────────────

#[test]
fn get_at_past_len_is_absent() {
    let mut pool = filled(3, 10);
    pool.extract_at(0);
    assert_eq!(pool.get_at(1), Some(&2));
    assert_eq!(pool.get_at(2), None);
    assert!(matches!(
        pool.try_get_at(2),
        Err(GameError::NotFound { index: 2, len: 2 })
    ));
}

#[test]
fn drain_moves_items_out_oldest_first() {
    let mut pool = filled(3, 3);
    let drained: Vec<u32> = pool.drain().collect();
    assert_eq!(drained, vec![0, 1, 2]);
    assert!(pool.is_empty());
}

// ── density invariant ─────────────────────────────────────────────────────────

#[test]
fn occupied_slots_stay_a_dense_prefix() {
    let mut pool = Pool::with_capacity(8);
    let mut model: Vec<u32> = Vec::new();
    let ops: &[(bool, usize)] = &[
        (true, 0), (true, 0), (true, 0), (false, 1), (true, 0), (false, 0),
        (false, 9), (true, 0), (true, 0), (false, 2), (true, 0), (false, 0),
    ];
    let mut next = 0;
    for &(append, index) in ops {
        if append {
            pool.append(next).unwrap();
            model.push(next);
            next += 1;
        } else {
            let got = pool.extract_at(index);
            let expected = (index < model.len()).then(|| model.remove(index));
            assert_eq!(got, expected);
        }
        assert_eq!(pool.len(), model.len());
        assert_eq!(pool.as_slice(), model.as_slice());
        for i in 0..pool.len() {
            assert!(pool.get_at(i).is_some());
        }
        assert!(pool.get_at(pool.len()).is_none());
    }
}
