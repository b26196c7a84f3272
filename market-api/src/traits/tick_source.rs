//! Defines the `TickSource` trait for tick producers.
//!
//! A source hands out the rows of one simulated second at a time, so callers
//! can either drain it into a single batch or pace it in real time. Sources
//! must yield ticks of the same instrument in temporal order.

use crate::model::tick::TickRow;

/// A trait for components that produce tick rows.
///
/// # Examples
///
/// ```
/// use market::traits::tick_source::TickSource;
/// use market::model::tick::TickRow;
///
/// struct Empty;
///
/// impl TickSource for Empty {
///     fn next_ticks(&mut self) -> Option<Vec<TickRow>> {
///         None
///     }
/// }
///
/// assert!(Empty.drain().is_empty());
/// ```
pub trait TickSource {
    /// Returns the rows of the next simulated second, or `None` once the
    /// source is exhausted.
    fn next_ticks(&mut self) -> Option<Vec<TickRow>>;

    /// Collects every remaining tick into one batch.
    fn drain(&mut self) -> Vec<TickRow> {
        let mut rows = Vec::new();
        while let Some(batch) = self.next_ticks() {
            rows.extend(batch);
        }
        rows
    }
}
