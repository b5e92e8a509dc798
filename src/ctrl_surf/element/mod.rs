mod vu;
pub use vu::{BankableVu, Vu, VuConfig};

use crate::midi::ChannelMessage;

/// An input element fed with incoming messages and periodic updates.
///
/// Callers must not interleave `handle` and `update` partially: each call
/// runs to completion on the element's state.
pub trait InputElement {
    /// Handles an incoming message, returns `true` if it was for this element.
    fn handle(&mut self, msg: &ChannelMessage) -> bool;

    /// Periodic update, called on each scheduler pass.
    fn update(&mut self);

    /// Resets the element to its initial state.
    fn reset(&mut self);

    /// Whether the state changed since the dirty flag was last cleared.
    fn dirty(&self) -> bool;

    fn clear_dirty(&mut self);
}
