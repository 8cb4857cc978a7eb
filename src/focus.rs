/// Elements that take part in tab navigation inside the modal.
pub const FOCUSABLE: &str = "a[href], button:not([disabled]), input:not([disabled]), \
     select:not([disabled]), textarea:not([disabled]), [tabindex]:not([tabindex=\"-1\"])";

/// Index to move focus to when Tab is pressed with `count` focusable
/// elements, or `None` when the browser can handle the move itself.
///
/// `current` is the position of the focused element among them, `None` if
/// focus sits outside the trapped region.
pub fn trap_target(current: Option<usize>, count: usize, backwards: bool) -> Option<usize> {
    let last = count.checked_sub(1)?;
    match current {
        None => Some(if backwards { last } else { 0 }),
        Some(0) if backwards => Some(last),
        Some(index) if !backwards && index >= last => Some(0),
        Some(_) => None,
    }
}
