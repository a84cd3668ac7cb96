// std
use std::sync::atomic::{AtomicUsize, Ordering};
// self
use platform_auth::sync::Guard;

const THREADS: usize = 32;
const ITERATIONS: usize = 500;

#[test]
fn scoped_bodies_never_overlap() {
	let guard = Guard::new(0_usize);
	let inside = AtomicUsize::new(0);
	let max_inside = AtomicUsize::new(0);

	std::thread::scope(|scope| {
		for _ in 0..THREADS {
			scope.spawn(|| {
				for _ in 0..ITERATIONS {
					guard.with_lock(|count| {
						let now = inside.fetch_add(1, Ordering::SeqCst) + 1;

						max_inside.fetch_max(now, Ordering::SeqCst);
						*count += 1;
						std::hint::spin_loop();
						inside.fetch_sub(1, Ordering::SeqCst);
					});
				}
			});
		}
	});

	assert_eq!(max_inside.load(Ordering::SeqCst), 1);
	assert_eq!(guard.into_inner(), THREADS * ITERATIONS);
}

#[test]
fn explicit_acquire_and_release_interleave_with_scoped_callers() {
	let guard = Guard::new(Vec::new());

	std::thread::scope(|scope| {
		for id in 0..THREADS {
			let guard = &guard;

			scope.spawn(move || {
				let mut lock = guard.acquire();

				guard.assert_held();
				lock.push(id);
				lock.release();
				guard.assert_not_held();
			});
		}
	});

	let mut seen = guard.into_inner();

	seen.sort_unstable();

	assert_eq!(seen, (0..THREADS).collect::<Vec<_>>());
}
