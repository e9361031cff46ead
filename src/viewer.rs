//! State of the series currently on screen.
//!
//! The viewer owns an `Arc` snapshot of its series, so a rescan that replaces
//! the study index never changes the slices being browsed underneath it.
//! Pixel data is loaded on demand and cached only for this series.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use crate::model::{SeriesKey, SeriesNode, Slice, SliceRef};
use crate::windowing::Window;

#[derive(Debug, Clone)]
pub struct SeriesViewer {
    series: Arc<SeriesNode>,
    position: usize,
    cache: HashMap<usize, Arc<Slice>>,
    pending: HashSet<usize>,
    window_initialized: bool,
}

impl SeriesViewer {
    /// Opens `series` on its middle slice.
    pub fn open(series: Arc<SeriesNode>) -> Self {
        let position = series.slices.len() / 2;
        Self {
            series,
            position,
            cache: HashMap::new(),
            pending: HashSet::new(),
            window_initialized: false,
        }
    }

    pub fn key(&self) -> &SeriesKey {
        &self.series.key
    }

    pub fn series(&self) -> &Arc<SeriesNode> {
        &self.series
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn slice_count(&self) -> usize {
        self.series.slices.len()
    }

    pub fn current_ref(&self) -> Option<&SliceRef> {
        self.series.slices.get(self.position)
    }

    pub fn current_slice(&self) -> Option<&Arc<Slice>> {
        self.cache.get(&self.position)
    }

    pub fn is_loading(&self) -> bool {
        self.pending.contains(&self.position)
    }

    pub fn set_position(&mut self, position: usize) -> bool {
        let last = self.slice_count().saturating_sub(1);
        let position = position.min(last);
        if position == self.position {
            return false;
        }
        self.position = position;
        true
    }

    pub fn step(&mut self, delta: i32) -> bool {
        let target = if delta.is_negative() {
            self.position.saturating_sub(delta.unsigned_abs() as usize)
        } else {
            self.position.saturating_add(delta as usize)
        };
        self.set_position(target)
    }

    /// Marks the current slice as loading and returns what to load, unless it
    /// is already cached or in flight.
    pub fn begin_load(&mut self) -> Option<(usize, PathBuf)> {
        if self.cache.contains_key(&self.position) || self.pending.contains(&self.position) {
            return None;
        }
        let path = self.current_ref()?.path.clone();
        self.pending.insert(self.position);
        Some((self.position, path))
    }

    /// Caches a loaded slice. Returns the window the series should open with
    /// when this is the first slice loaded for it.
    pub fn store(&mut self, position: usize, slice: Arc<Slice>) -> Option<Window> {
        self.pending.remove(&position);
        let initial = if self.window_initialized {
            None
        } else {
            self.window_initialized = true;
            Some(slice.initial_window())
        };
        self.cache.insert(position, slice);
        initial
    }

    pub fn load_failed(&mut self, position: usize) {
        self.pending.remove(&position);
    }

    /// HU range of the slice on screen, used for slider limits.
    pub fn data_range(&self) -> Option<(f64, f64)> {
        self.current_slice().and_then(|slice| slice.hu_range())
    }
}
