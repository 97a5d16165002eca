//! User-facing notifications for rejected cart operations.

use crate::error::CartError;
use crate::ports::Notifier;

/// Notifier that reports the shopper-facing message through `tracing`.
///
/// With the Sentry layer installed (see [`crate::telemetry`]) each notice
/// also becomes a breadcrumb, so error reports show the trail of rejected
/// cart actions leading up to them.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, error: &CartError) {
        tracing::warn!(
            operation = ?error.operation(),
            error = %error,
            "{}",
            error.user_message()
        );
    }
}

#[cfg(test)]
mod tests {
    use pocket_cart_core::ProductId;

    use super::*;
    use crate::error::CartOperation;

    #[test]
    fn test_notify_without_subscriber() {
        TracingNotifier.notify(&CartError::ItemNotFound {
            product_id: ProductId::new(1),
            operation: CartOperation::Remove,
        });
    }
}
