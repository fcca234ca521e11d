//! Pushback-capable line source.

use std::collections::VecDeque;
use std::io::{self, BufRead};

use crate::error::Result;
use crate::model::Line;

/// Default number of lines read ahead for calibration.
pub const DEFAULT_PRELOAD_LINES: usize = 2000;

/// A queue of pending lines in front of a line source.
///
/// Lines are numbered as they are read from the source. Lines handed back
/// with [`push_back`](Self::push_back) are returned by the following
/// [`pull`](Self::pull) calls before anything new is read, so the source is
/// never read twice.
pub struct LineBuffer<I> {
    source: I,
    pending: VecDeque<Line>,
    capacity: usize,
    lines_read: usize,
    exhausted: bool,
}

impl<R: BufRead> LineBuffer<io::Lines<R>> {
    /// Create a buffer over a buffered reader.
    pub fn from_reader(reader: R) -> Self {
        Self::new(reader.lines())
    }
}

impl<I> LineBuffer<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    /// Create a buffer with the default preload cap.
    pub fn new(source: I) -> Self {
        Self::with_capacity(source, DEFAULT_PRELOAD_LINES)
    }

    /// Create a buffer that preloads at most `capacity` lines.
    pub fn with_capacity(source: I, capacity: usize) -> Self {
        Self {
            source,
            pending: VecDeque::with_capacity(capacity.min(DEFAULT_PRELOAD_LINES)),
            capacity,
            lines_read: 0,
            exhausted: false,
        }
    }

    /// Take the next line, or `None` at end of input.
    pub fn pull(&mut self) -> Result<Option<Line>> {
        if let Some(line) = self.pending.pop_front() {
            return Ok(Some(line));
        }
        self.read_source()
    }

    /// Return a line so the next `pull` yields it again.
    pub fn push_back(&mut self, line: Line) {
        self.pending.push_front(line);
    }

    /// Read ahead until the preload cap is reached or the source ends.
    ///
    /// Returns the number of lines buffered.
    pub fn preload(&mut self) -> Result<usize> {
        while self.pending.len() < self.capacity {
            match self.read_source()? {
                Some(line) => self.pending.push_back(line),
                None => break,
            }
        }
        log::debug!(
            "Preloaded {} lines (cap {}{})",
            self.pending.len(),
            self.capacity,
            if self.exhausted { ", source exhausted" } else { "" }
        );
        Ok(self.pending.len())
    }

    /// Number of lines currently buffered.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Check if no lines are buffered.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Preload cap in lines.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total lines read from the source so far.
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    /// Buffered lines in delivery order.
    pub fn window(&self) -> &VecDeque<Line> {
        &self.pending
    }

    pub(crate) fn window_mut(&mut self) -> &mut VecDeque<Line> {
        &mut self.pending
    }

    fn read_source(&mut self) -> Result<Option<Line>> {
        if self.exhausted {
            return Ok(None);
        }
        match self.source.next() {
            Some(raw) => {
                let raw = raw?;
                self.lines_read += 1;
                Ok(Some(Line::new(self.lines_read, raw)))
            }
            None => {
                self.exhausted = true;
                Ok(None)
            }
        }
    }
}
