use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;
use crate::simulation::{HaltOnPanic, PhaseBarrier, PhaseOutcome};

#[test]
fn test_single_party_never_blocks() {
    let barrier = PhaseBarrier::new(1);
    assert_eq!(barrier.wait(), PhaseOutcome::Proceed);
    assert_eq!(barrier.wait(), PhaseOutcome::Proceed);
}

#[test]
fn test_zero_parties_is_treated_as_one() {
    assert_eq!(PhaseBarrier::new(0).parties(), 1);
}

#[test]
fn test_release_action_runs_once_per_generation() {
    let parties = 4;
    let rounds = 50;
    let barrier = PhaseBarrier::new(parties);
    let releases = AtomicUsize::new(0);

    thread::scope(|s| {
        for _ in 0..parties {
            s.spawn(|| {
                for _ in 0..rounds {
                    let outcome = barrier.wait_with(|| {
                        releases.fetch_add(1, Ordering::SeqCst);
                        true
                    });
                    assert_eq!(outcome, PhaseOutcome::Proceed);
                }
            });
        }
    });
    assert_eq!(releases.load(Ordering::SeqCst), rounds);
}

#[test]
fn test_release_action_happens_before_release() {
    // Every party must observe the value written by the release action of the same round.
    let parties = 3;
    let barrier = PhaseBarrier::new(parties);
    let shared = Mutex::new(0usize);

    thread::scope(|s| {
        for _ in 0..parties {
            s.spawn(|| {
                for round in 1..=20 {
                    barrier.wait_with(|| {
                        *shared.lock().unwrap() = round;
                        true
                    });
                    assert_eq!(*shared.lock().unwrap(), round);
                    barrier.wait();
                }
            });
        }
    });
}

#[test]
fn test_release_returning_false_halts_everyone() {
    let parties = 3;
    let barrier = PhaseBarrier::new(parties);

    thread::scope(|s| {
        for _ in 0..parties {
            s.spawn(|| {
                assert_eq!(barrier.wait_with(|| false), PhaseOutcome::Halted);
                // Later waits return immediately.
                assert_eq!(barrier.wait(), PhaseOutcome::Halted);
            });
        }
    });
    assert!(barrier.is_halted());
}

#[test]
fn test_panicking_party_does_not_hang_the_others() {
    let parties = 3;
    let barrier = PhaseBarrier::new(parties);

    let results: Vec<thread::Result<PhaseOutcome>> = thread::scope(|s| {
        let handles: Vec<_> = (0..parties)
            .map(|i| {
                let barrier = &barrier;
                s.spawn(move || {
                    let _guard = HaltOnPanic(barrier);
                    if i == 0 {
                        panic!("worker failure");
                    }
                    barrier.wait()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join()).collect()
    });

    assert!(results[0].is_err());
    for result in &results[1..] {
        assert_eq!(*result.as_ref().expect("healthy party"), PhaseOutcome::Halted);
    }
}

#[test]
fn test_panic_inside_release_action_halts_barrier() {
    let parties = 2;
    let barrier = PhaseBarrier::new(parties);

    let results: Vec<thread::Result<PhaseOutcome>> = thread::scope(|s| {
        let handles: Vec<_> = (0..parties)
            .map(|_| {
                let barrier = &barrier;
                s.spawn(move || {
                    let _guard = HaltOnPanic(barrier);
                    barrier.wait_with(|| panic!("release failure"))
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join()).collect()
    });

    assert_eq!(results.iter().filter(|r| r.is_err()).count(), 1);
    assert!(results.iter().any(|r| matches!(r, Ok(PhaseOutcome::Halted))));
    assert!(barrier.is_halted());
}
