//! Domain error types.

use thiserror::Error;

/// Errors from pure domain operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A cart line would exceed the per-line quantity cap.
    #[error("quantity cannot exceed {max}")]
    QuantityTooLarge {
        /// The configured cap.
        max: u32,
    },

    /// The cart already holds the maximum number of distinct lines.
    #[error("cart cannot have more than {max} lines")]
    CartFull {
        /// The configured cap.
        max: usize,
    },

    /// The referenced (product, size) line is not in the cart.
    #[error("item not in cart")]
    ItemNotInCart,
}
