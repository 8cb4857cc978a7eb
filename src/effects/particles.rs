use crate::page::{Page, Viewport};
use crate::random::RandomSource;

pub const NARROW_COUNT: usize = 8;
pub const WIDE_COUNT: usize = 15;
pub const PARTICLE_CLASS: &str = "floating-particle";

/// One decorative dot in the particle field.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub size_px: f64,
    pub left_pct: f64,
    pub top_pct: f64,
    pub opacity: f64,
    pub delay_s: f64,
    pub duration_s: f64,
}

impl Particle {
    pub fn random(random: &dyn RandomSource) -> Self {
        Self {
            size_px: random.between(1.0, 4.0),
            left_pct: random.between(0.0, 100.0),
            top_pct: random.between(0.0, 100.0),
            delay_s: random.between(0.0, 8.0),
            duration_s: random.between(15.0, 30.0),
            opacity: random.between(0.1, 0.4),
        }
    }

    pub fn styles(&self) -> Vec<(&'static str, String)> {
        vec![
            ("position", "absolute".to_string()),
            ("width", format!("{}px", self.size_px)),
            ("height", format!("{}px", self.size_px)),
            ("background", format!("rgba(222, 198, 122, {})", self.opacity)),
            ("border-radius", "50%".to_string()),
            ("left", format!("{}%", self.left_pct)),
            ("top", format!("{}%", self.top_pct)),
            (
                "animation",
                format!(
                    "particleFloat {}s ease-in-out {}s infinite",
                    self.duration_s, self.delay_s
                ),
            ),
            ("will-change", "transform, opacity".to_string()),
        ]
    }
}

pub fn target_count(viewport: Viewport) -> usize {
    if viewport.is_narrow() {
        NARROW_COUNT
    } else {
        WIDE_COUNT
    }
}

/// The particles this controller created, so they can be swapped out
/// without re-querying the document.
#[derive(Debug, Clone)]
pub struct ParticleField<E> {
    particles: Vec<E>,
}

impl<E> Default for ParticleField<E> {
    fn default() -> Self {
        Self {
            particles: Vec::new(),
        }
    }
}

impl<E: Clone + PartialEq> ParticleField<E> {
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    #[cfg(test)]
    pub fn elements(&self) -> &[E] {
        &self.particles
    }

    /// Makes the field hold exactly the count the viewport calls for.
    /// Returns true if the particles were regenerated.
    pub fn sync<P: Page<Element = E>>(
        &mut self,
        page: &P,
        container: &E,
        viewport: Viewport,
        random: &dyn RandomSource,
    ) -> bool {
        let desired = target_count(viewport);
        if self.particles.len() == desired {
            return false;
        }
        self.clear(page);
        for _ in 0..desired {
            let particle = Particle::random(random);
            if let Some(element) = page.append_div(container, PARTICLE_CLASS, &particle.styles()) {
                self.particles.push(element);
            }
        }
        log::debug!("particle field regenerated with {} particles", self.particles.len());
        true
    }

    pub fn clear<P: Page<Element = E>>(&mut self, page: &P) {
        for particle in self.particles.drain(..) {
            page.remove(&particle);
        }
    }
}
