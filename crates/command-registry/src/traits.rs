/// A bindable unit of behavior with a forward effect and its inverse.
///
/// Actions take `&self` so one instance can sit in several slots at once;
/// anything an action needs to remember between `perform` and `reverse`
/// lives in interior cells.
pub trait Action {
    /// Apply the forward effect.
    fn perform(&self);

    /// Undo the forward effect.
    fn reverse(&self);

    /// Human-readable name shown in the remote table.
    fn label(&self) -> &str;
}
