//! Atomic increment of a word at an arbitrary byte address.
//!
//! The probed addresses deliberately straddle cache lines, so the target is
//! generally misaligned. `AtomicUsize` cannot express that; on x86 a `lock`
//! prefixed add is used directly, which the hardware performs as a single
//! bus-locked transaction.

#[cfg(not(any(target_arch = "x86_64", target_arch = "x86")))]
use std::sync::atomic::{fence, AtomicUsize, Ordering};

#[cfg(not(any(target_arch = "x86_64", target_arch = "x86")))]
use super::word_size_bytes;

/// Indivisible increment of the machine word at `target`.
pub trait AtomicIncrement {
    /// Increment the word starting at `target`.
    ///
    /// # Safety
    ///
    /// `target .. target + word_size_bytes()` must lie inside a live
    /// allocation that nothing else borrows for the duration of the call.
    unsafe fn increment(&self, target: *mut u8);
}

/// Hardware locked increment.
#[derive(Debug, Clone, Copy, Default)]
pub struct LockedIncrement;

impl AtomicIncrement for LockedIncrement {
    #[inline]
    unsafe fn increment(&self, target: *mut u8) {
        #[cfg(target_arch = "x86_64")]
        std::arch::asm!(
            "lock add qword ptr [{0}], 1",
            in(reg) target,
            options(nostack),
        );

        #[cfg(target_arch = "x86")]
        std::arch::asm!(
            "lock add dword ptr [{0}], 1",
            in(reg) target,
            options(nostack),
        );

        #[cfg(not(any(target_arch = "x86_64", target_arch = "x86")))]
        {
            if (target as usize) % word_size_bytes() == 0 {
                AtomicUsize::from_ptr(target.cast::<usize>()).fetch_add(1, Ordering::SeqCst);
            } else {
                // Misaligned atomics fault here; nothing else touches the buffer,
                // so a fenced read-modify-write is equivalent.
                fence(Ordering::SeqCst);
                let word = target.cast::<usize>();
                word.write_unaligned(word.read_unaligned().wrapping_add(1));
                fence(Ordering::SeqCst);
            }
        }
    }
}

/// Read the word at `target` without alignment requirements.
///
/// # Safety
///
/// Same contract as [`AtomicIncrement::increment`].
#[cfg(test)]
pub(crate) unsafe fn read_word(target: *const u8) -> usize {
    std::sync::atomic::fence(std::sync::atomic::Ordering::SeqCst);
    target.cast::<usize>().read_unaligned()
}
