/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Reading and writing values at the flat offsets a cursor visits.

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use crate::cursor::Cursor;

/// Flat, offset-addressed element storage.
///
/// Offsets are unchecked in the sense of the cursor protocol: passing
/// an offset `>= len()` is a precondition violation and panics.
pub trait Storage {
    type Value: Copy;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, index: usize) -> Self::Value;

    fn set(&mut self, index: usize, value: Self::Value);
}

impl<T: Copy> Storage for [T] {
    type Value = T;

    #[inline]
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    #[inline]
    fn get(&self, index: usize) -> T {
        self[index]
    }

    #[inline]
    fn set(&mut self, index: usize, value: T) {
        self[index] = value;
    }
}

impl<T: Copy> Storage for Vec<T> {
    type Value = T;

    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    #[inline]
    fn get(&self, index: usize) -> T {
        self[index]
    }

    #[inline]
    fn set(&mut self, index: usize, value: T) {
        self[index] = value;
    }
}

/// Rewrites every value the cursor visits (from its current position
/// to the end) with `f(index, value)`.
///
/// ```
/// use ndcursor::access::update;
/// use ndcursor::PlaneCursor;
///
/// // Zero the plane z = 1 of a 2 x 2 x 2 volume.
/// let mut data: Vec<u32> = (0..8).collect();
/// let mut cursor = PlaneCursor::dense(vec![2, 2, 2]).unwrap();
/// cursor.reset_plane(0, Some(1), &[0, 0, 1]).unwrap();
/// update(&mut cursor, &mut data, |_, _| 0);
/// assert_eq!(data, vec![0, 1, 2, 3, 0, 0, 0, 0]);
/// ```
pub fn update<C, S, F>(mut cursor: C, storage: &mut S, mut f: F)
where
    C: Cursor,
    S: Storage + ?Sized,
    F: FnMut(usize, S::Value) -> S::Value,
{
    while cursor.has_next() {
        cursor.fwd();
        let index = cursor.index();
        let value = storage.get(index);
        storage.set(index, f(index, value));
    }
}

const WORD_BITS: usize = u64::BITS as usize;

/// Packed boolean storage, 64 bits per word.
///
/// Writes through `&mut self` ([`Storage::set`], [`BitArray::set`])
/// assume a single writer. [`BitArray::set_shared`] may be called
/// from several threads at once, including for bits in the same word.
#[derive(Debug, Default)]
pub struct BitArray {
    words: Vec<AtomicU64>,
    len: usize,
}

impl BitArray {
    /// An array of `len` bits, all clear.
    pub fn new(len: usize) -> Self {
        let words = (0..len.div_ceil(WORD_BITS))
            .map(|_| AtomicU64::new(0))
            .collect();
        Self { words, len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn get(&self, index: usize) -> bool {
        let (word, mask) = self.locate(index);
        self.words[word].load(Ordering::Relaxed) & mask != 0
    }

    #[inline]
    pub fn set(&mut self, index: usize, value: bool) {
        let (word, mask) = self.locate(index);
        let word = self.words[word].get_mut();
        if value {
            *word |= mask;
        } else {
            *word &= !mask;
        }
    }

    /// Sets a bit through a shared reference. The word is updated
    /// atomically, so concurrent writers never lose each other's bits.
    #[inline]
    pub fn set_shared(&self, index: usize, value: bool) {
        let (word, mask) = self.locate(index);
        if value {
            self.words[word].fetch_or(mask, Ordering::Relaxed);
        } else {
            self.words[word].fetch_and(!mask, Ordering::Relaxed);
        }
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.words
            .iter()
            .map(|w| w.load(Ordering::Relaxed).count_ones() as usize)
            .sum()
    }

    #[inline]
    fn locate(&self, index: usize) -> (usize, u64) {
        assert!(
            index < self.len,
            "bit index {} out of range {}",
            index,
            self.len
        );
        (index / WORD_BITS, 1u64 << (index % WORD_BITS))
    }
}

impl Clone for BitArray {
    fn clone(&self) -> Self {
        Self {
            words: self
                .words
                .iter()
                .map(|w| AtomicU64::new(w.load(Ordering::Relaxed)))
                .collect(),
            len: self.len,
        }
    }
}

impl Storage for BitArray {
    type Value = bool;

    fn len(&self) -> usize {
        self.len
    }

    fn get(&self, index: usize) -> bool {
        BitArray::get(self, index)
    }

    fn set(&mut self, index: usize, value: bool) {
        BitArray::set(self, index, value)
    }
}
