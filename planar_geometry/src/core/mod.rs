//! Core module has common/shared math, traits, and visiting control flow.

use self::traits::ControlFlow;
pub mod math;
pub mod traits;

/// Basic control flow enum that can be used when visiting query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control<B = ()> {
    /// Indicates to the query function to continue visiting results.
    Continue,
    /// Indicates to the query function to stop visiting results and return a value.
    Break(B),
}

impl<B> Default for Control<B> {
    #[inline]
    fn default() -> Self {
        Control::Continue
    }
}

impl<B> ControlFlow for Control<B> {
    #[inline]
    fn continuing() -> Self {
        Control::Continue
    }

    #[inline]
    fn should_break(&self) -> bool {
        matches!(*self, Control::Break(_))
    }
}

impl ControlFlow for () {
    #[inline]
    fn continuing() -> Self {}

    #[inline]
    fn should_break(&self) -> bool {
        false
    }
}
