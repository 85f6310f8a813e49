use crate::simulation::StaticPartition;

#[test]
fn test_ranges_cover_all_bodies_in_order() {
    for bodies in [0, 1, 5, 17, 240] {
        for workers in 1..=6 {
            let partition = StaticPartition::contiguous(bodies, workers);
            assert_eq!(partition.workers(), workers);
            let mut next = 0;
            for range in partition.ranges() {
                assert_eq!(range.start, next);
                next = range.end;
            }
            assert_eq!(next, bodies);
        }
    }
}

#[test]
fn test_ranges_are_balanced() {
    let partition = StaticPartition::contiguous(10, 4);
    let sizes: Vec<usize> = partition.ranges().iter().map(|r| r.len()).collect();
    assert_eq!(sizes, vec![2, 3, 2, 3]);
}

#[test]
fn test_more_workers_than_bodies() {
    let partition = StaticPartition::contiguous(2, 5);
    let non_empty = partition.ranges().iter().filter(|r| !r.is_empty()).count();
    assert_eq!(non_empty, 2);
}

#[test]
fn test_owner_of() {
    let partition = StaticPartition::contiguous(9, 3);
    assert_eq!(partition.owner_of(0), Some(0));
    assert_eq!(partition.owner_of(4), Some(1));
    assert_eq!(partition.owner_of(8), Some(2));
    assert_eq!(partition.owner_of(9), None);
}

#[test]
fn test_split_mut_matches_ranges() {
    let mut items: Vec<usize> = (0..11).collect();
    let partition = StaticPartition::contiguous(items.len(), 3);
    let chunks = partition.split_mut(&mut items);
    assert_eq!(chunks.len(), 3);
    for (chunk, range) in chunks.iter().zip(partition.ranges()) {
        assert_eq!(chunk.to_vec(), range.clone().collect::<Vec<_>>());
    }
}
