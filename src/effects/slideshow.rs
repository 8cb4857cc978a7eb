pub const SLIDE_INTERVAL_MS: u32 = 5_000;
pub const ACTIVE_CLASS: &str = "active";

/// Cyclic position within the slide list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slideshow {
    current: usize,
    count: usize,
}

impl Slideshow {
    pub fn new(count: usize) -> Self {
        Self { current: 0, count }
    }

    #[cfg(test)]
    pub fn current(&self) -> usize {
        self.current
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Moves to the next slide, returning `(previous, next)`.
    /// Does nothing when there are no slides.
    pub fn advance(&mut self) -> Option<(usize, usize)> {
        if self.count == 0 {
            return None;
        }
        let previous = self.current;
        self.current = (self.current + 1) % self.count;
        Some((previous, self.current))
    }
}
