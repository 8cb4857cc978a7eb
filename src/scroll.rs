use crate::page::Viewport;

pub const SCROLL_THROTTLE_MS: u32 = 16;
pub const NAV_SCROLLED_AFTER: f64 = 100.0;
/// Offset kept above the features section when jumping to it.
pub const FEATURES_OFFSET: f64 = 100.0;

/// Inline styles for the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavPresentation {
    pub background: &'static str,
    pub padding: &'static str,
    pub backdrop_filter: &'static str,
    pub box_shadow: &'static str,
}

impl NavPresentation {
    pub const SCROLLED: NavPresentation = NavPresentation {
        background: "rgba(4, 14, 31, 0.98)",
        padding: "1rem 0",
        backdrop_filter: "blur(20px)",
        box_shadow: "0 4px 20px rgba(0, 0, 0, 0.15)",
    };

    pub const TOP: NavPresentation = NavPresentation {
        background: "rgba(4, 14, 31, 0.95)",
        padding: "1.5rem 0",
        backdrop_filter: "blur(10px)",
        box_shadow: "none",
    };

    pub fn declarations(&self) -> [(&'static str, &'static str); 4] {
        [
            ("background", self.background),
            ("padding", self.padding),
            ("backdrop-filter", self.backdrop_filter),
            ("box-shadow", self.box_shadow),
        ]
    }
}

/// What the page should look like at a given scroll position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollFrame {
    pub delta: f64,
    pub nav_scrolled: bool,
    pub sticky_visible: bool,
}

impl ScrollFrame {
    pub fn nav_presentation(&self) -> NavPresentation {
        if self.nav_scrolled {
            NavPresentation::SCROLLED
        } else {
            NavPresentation::TOP
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScrollReactor {
    last_y: f64,
}

impl ScrollReactor {
    #[cfg(test)]
    pub fn last_y(&self) -> f64 {
        self.last_y
    }

    pub fn react(&mut self, y: f64, viewport: Viewport) -> ScrollFrame {
        let frame = ScrollFrame {
            delta: y - self.last_y,
            nav_scrolled: y > NAV_SCROLLED_AFTER,
            sticky_visible: y > viewport.height / 2.0,
        };
        self.last_y = y;
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Viewport = Viewport {
        width: 1280.0,
        height: 800.0,
    };

    #[test]
    fn nav_switches_past_one_hundred_pixels() {
        let mut reactor = ScrollReactor::default();
        assert!(!reactor.react(100.0, VIEWPORT).nav_scrolled);
        let frame = reactor.react(101.0, VIEWPORT);
        assert!(frame.nav_scrolled);
        assert_eq!(frame.nav_presentation(), NavPresentation::SCROLLED);
    }

    #[test]
    fn sticky_cta_follows_half_the_viewport() {
        let mut reactor = ScrollReactor::default();
        assert!(!reactor.react(400.0, VIEWPORT).sticky_visible);
        assert!(reactor.react(401.0, VIEWPORT).sticky_visible);
        assert!(!reactor.react(0.0, VIEWPORT).sticky_visible);
    }

    #[test]
    fn tracks_delta_between_frames() {
        let mut reactor = ScrollReactor::default();
        assert_eq!(reactor.react(300.0, VIEWPORT).delta, 300.0);
        assert_eq!(reactor.react(250.0, VIEWPORT).delta, -50.0);
        assert_eq!(reactor.last_y(), 250.0);
    }

    #[test]
    fn presentations_cover_the_same_properties() {
        let top: Vec<_> = NavPresentation::TOP.declarations().iter().map(|d| d.0).collect();
        let scrolled: Vec<_> = NavPresentation::SCROLLED
            .declarations()
            .iter()
            .map(|d| d.0)
            .collect();
        assert_eq!(top, scrolled);
    }
}
