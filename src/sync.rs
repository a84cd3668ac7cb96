//! Non-reentrant mutual-exclusion guard with owner assertions.
//!
//! [`Guard`] serializes access to SDK-owned state such as the cached [`Environment`] or the
//! live [`TokenResponse`]. It offers strict mutual exclusion only: readers must acquire the
//! lock too. The guard tags its current owner with a per-thread identity so misuse can be
//! caught while debugging:
//!
//! - [`Guard::assert_held`] panics when the calling thread does not own the guard.
//! - [`Guard::assert_not_held`] panics when the calling thread already owns it.
//! - [`Guard::acquire`] panics instead of deadlocking when the owning thread acquires again.
//!
//! All three checks compile to no-ops when `debug_assertions` is disabled. In release builds a
//! reentrant acquire deadlocks; the guard is **not** reentrant and must never be locked twice
//! from the same thread.
//!
//! [`Environment`]: crate::discovery::Environment
//! [`TokenResponse`]: crate::token::TokenResponse

// std
use std::{
	ops::{Deref, DerefMut},
	sync::atomic::{AtomicU64, Ordering as AtomicOrdering},
};
// crates.io
use parking_lot::MutexGuard;
// self
use crate::_prelude::*;

const NO_OWNER: u64 = 0;

static NEXT_THREAD_TAG: AtomicU64 = AtomicU64::new(1);

thread_local! {
	static THREAD_TAG: u64 = NEXT_THREAD_TAG.fetch_add(1, AtomicOrdering::Relaxed);
}

fn current_thread_tag() -> u64 {
	THREAD_TAG.with(|tag| *tag)
}

/// Mutual-exclusion guard around a value of type `T`.
pub struct Guard<T>
where
	T: ?Sized,
{
	owner: AtomicU64,
	inner: Mutex<T>,
}
impl<T> Guard<T> {
	/// Wraps `value` in a new, unlocked guard.
	pub fn new(value: T) -> Self {
		Self { owner: AtomicU64::new(NO_OWNER), inner: Mutex::new(value) }
	}

	/// Consumes the guard and returns the protected value.
	pub fn into_inner(self) -> T {
		self.inner.into_inner()
	}
}
impl<T> Default for Guard<T>
where
	T: Default,
{
	fn default() -> Self {
		Self::new(T::default())
	}
}
impl<T> Guard<T>
where
	T: ?Sized,
{
	/// Blocks until the calling thread owns the guard.
	///
	/// Ownership is released when the returned [`GuardLock`] is dropped or passed to
	/// [`GuardLock::release`].
	///
	/// # Panics
	///
	/// With `debug_assertions` enabled, panics if the calling thread already holds the guard.
	#[track_caller]
	pub fn acquire(&self) -> GuardLock<'_, T> {
		let tag = current_thread_tag();

		debug_assert_ne!(
			self.owner.load(AtomicOrdering::Acquire),
			tag,
			"Guard is not reentrant; the current thread already holds it."
		);

		let inner = self.inner.lock();

		self.owner.store(tag, AtomicOrdering::Release);

		GuardLock { owner: &self.owner, inner }
	}

	/// Attempts to take ownership without blocking.
	pub fn try_acquire(&self) -> Option<GuardLock<'_, T>> {
		let inner = self.inner.try_lock()?;

		self.owner.store(current_thread_tag(), AtomicOrdering::Release);

		Some(GuardLock { owner: &self.owner, inner })
	}

	/// Runs `body` while holding the guard and releases it on every exit path, unwinding
	/// included.
	#[track_caller]
	pub fn with_lock<R, F>(&self, body: F) -> R
	where
		F: FnOnce(&mut T) -> R,
	{
		let mut lock = self.acquire();

		body(&mut lock)
	}

	/// Returns `true` if the calling thread currently owns the guard.
	pub fn is_held_by_current_thread(&self) -> bool {
		self.owner.load(AtomicOrdering::Acquire) == current_thread_tag()
	}

	/// Debug assertion that the calling thread owns the guard.
	#[track_caller]
	pub fn assert_held(&self) {
		debug_assert!(
			self.is_held_by_current_thread(),
			"Guard must be held by the current thread."
		);
	}

	/// Debug assertion that the calling thread does not own the guard.
	#[track_caller]
	pub fn assert_not_held(&self) {
		debug_assert!(
			!self.is_held_by_current_thread(),
			"Guard must not be held by the current thread."
		);
	}

	/// Mutable access without locking; the exclusive borrow proves no other holder exists.
	pub fn get_mut(&mut self) -> &mut T {
		self.inner.get_mut()
	}
}
impl<T> Debug for Guard<T>
where
	T: ?Sized,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Guard")
			.field("locked", &self.inner.is_locked())
			.field("held_by_current_thread", &self.is_held_by_current_thread())
			.finish()
	}
}

/// RAII ownership of a [`Guard`]; dereferences to the protected value.
pub struct GuardLock<'a, T>
where
	T: ?Sized,
{
	owner: &'a AtomicU64,
	inner: MutexGuard<'a, T>,
}
impl<T> GuardLock<'_, T>
where
	T: ?Sized,
{
	/// Relinquishes ownership; equivalent to dropping the lock.
	pub fn release(self) {}
}
impl<T> Deref for GuardLock<'_, T>
where
	T: ?Sized,
{
	type Target = T;

	fn deref(&self) -> &Self::Target {
		&self.inner
	}
}
impl<T> DerefMut for GuardLock<'_, T>
where
	T: ?Sized,
{
	fn deref_mut(&mut self) -> &mut Self::Target {
		&mut self.inner
	}
}
impl<T> Drop for GuardLock<'_, T>
where
	T: ?Sized,
{
	fn drop(&mut self) {
		// Clear the tag before the inner mutex guard unlocks.
		self.owner.store(NO_OWNER, AtomicOrdering::Release);
	}
}
impl<T> Debug for GuardLock<'_, T>
where
	T: ?Sized + Debug,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("GuardLock").field(&&*self.inner).finish()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::panic::{self, AssertUnwindSafe};
	// self
	use super::*;

	#[test]
	fn acquire_and_release_track_ownership() {
		let guard = Guard::new(1_u32);

		assert!(!guard.is_held_by_current_thread());

		let mut lock = guard.acquire();

		*lock += 1;

		assert!(guard.is_held_by_current_thread());

		guard.assert_held();
		lock.release();
		guard.assert_not_held();

		assert_eq!(guard.into_inner(), 2);
	}

	#[test]
	fn try_acquire_fails_while_another_thread_holds_the_guard() {
		let guard = Guard::new(());
		let _lock = guard.acquire();

		std::thread::scope(|scope| {
			let contender = scope.spawn(|| guard.try_acquire().is_none());

			assert!(contender.join().expect("Contender thread should not panic."));
		});
	}

	#[test]
	fn ownership_is_per_thread() {
		let guard = Guard::new(());
		let _lock = guard.acquire();

		std::thread::scope(|scope| {
			let observer = scope.spawn(|| guard.is_held_by_current_thread());

			assert!(!observer.join().expect("Observer thread should not panic."));
		});
	}

	#[test]
	fn with_lock_releases_after_unwinding() {
		let guard = Guard::new(Vec::<u8>::new());
		let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
			guard.with_lock(|values| {
				values.push(1);

				assert!(values.is_empty(), "body failed");
			})
		}));

		assert!(outcome.is_err());
		assert!(!guard.is_held_by_current_thread());
		assert_eq!(guard.with_lock(|values| values.clone()), vec![1]);
	}

	#[cfg(debug_assertions)]
	#[test]
	#[should_panic(expected = "not reentrant")]
	fn reentrant_acquire_panics_in_debug_builds() {
		let guard = Guard::new(());
		let _outer = guard.acquire();
		let _inner = guard.acquire();
	}

	#[cfg(debug_assertions)]
	#[test]
	#[should_panic(expected = "must be held")]
	fn assert_held_panics_without_the_lock() {
		Guard::new(0_u8).assert_held();
	}

	#[cfg(debug_assertions)]
	#[test]
	#[should_panic(expected = "must not be held")]
	fn assert_not_held_panics_inside_the_lock() {
		let guard = Guard::new(0_u8);

		guard.with_lock(|_| guard.assert_not_held());
	}
}
