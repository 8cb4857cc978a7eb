use crate::page::Page;

const STAGGER_MS: usize = 2_000;
const BASE_DURATION_MS: usize = 6_000;
const DURATION_STEP_MS: usize = 1_000;

pub fn float_animation(index: usize) -> String {
    let delay = index * STAGGER_MS;
    let duration = BASE_DURATION_MS + index * DURATION_STEP_MS;
    format!("float {}ms ease-in-out {}ms infinite", duration, delay)
}

/// Staggers the floating background shapes. Runs once at start-up.
pub fn animate<P: Page>(page: &P, shapes: &[P::Element]) {
    for (index, shape) in shapes.iter().enumerate() {
        page.set_style(shape, "animation", &float_animation(index));
    }
}
