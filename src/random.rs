/// Source of uniform numbers in `[0, 1)`.
pub trait RandomSource {
    fn next_f64(&self) -> f64;

    /// Uniform value in `[low, high)`.
    fn between(&self, low: f64, high: f64) -> f64 {
        low + self.next_f64() * (high - low)
    }
}

/// `Math.random()` from the host page.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsRandom;

impl RandomSource for JsRandom {
    fn next_f64(&self) -> f64 {
        web_sys::js_sys::Math::random()
    }
}
