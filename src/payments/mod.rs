use async_trait::async_trait;

use crate::{domain::PaymentStatus, error::Result};

pub mod stripe_gateway;

pub use stripe_gateway::StripeGateway;

/// Provider-side artifacts minted for one checkout.
#[derive(Debug, Clone)]
pub struct CheckoutDetails {
    pub product_id: String,
    pub price_id: String,
    pub session_id: String,
    pub checkout_url: String,
}

/// Boundary to the external payment provider. The production implementation
/// talks to Stripe; tests substitute a canned one.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Mints a product named after the purchased material, a price for the
    /// amount, and a checkout session against that price.
    async fn create_checkout(
        &self,
        product_name: &str,
        amount_cents: i64,
    ) -> Result<CheckoutDetails>;

    /// Fetches the provider's current payment status for a session.
    async fn session_status(&self, session_id: &str) -> Result<PaymentStatus>;
}

#[cfg(any(test, feature = "test-utils"))]
pub mod fake {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::domain::PaymentStatus;
    use crate::error::{AppError, Result};

    use super::{CheckoutDetails, PaymentGateway};

    /// Canned gateway for tests: hands out deterministic identifiers and a
    /// settable session status, or fails every call when built with
    /// `failing()`.
    pub struct FakeCheckoutGateway {
        fail: bool,
        status: Mutex<PaymentStatus>,
        counter: AtomicU64,
    }

    impl FakeCheckoutGateway {
        pub fn new() -> Self {
            Self {
                fail: false,
                status: Mutex::new(PaymentStatus::Unpaid),
                counter: AtomicU64::new(0),
            }
        }

        pub fn failing() -> Self {
            Self {
                fail: true,
                status: Mutex::new(PaymentStatus::Unpaid),
                counter: AtomicU64::new(0),
            }
        }

        pub fn set_status(&self, status: PaymentStatus) {
            *self.status.lock().unwrap() = status;
        }
    }

    impl Default for FakeCheckoutGateway {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl PaymentGateway for FakeCheckoutGateway {
        async fn create_checkout(
            &self,
            _product_name: &str,
            _amount_cents: i64,
        ) -> Result<CheckoutDetails> {
            if self.fail {
                return Err(AppError::Provider("provider rejected the request".to_string()));
            }
            let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(CheckoutDetails {
                product_id: format!("prod_test_{}", n),
                price_id: format!("price_test_{}", n),
                session_id: format!("cs_test_{}", n),
                checkout_url: format!("https://checkout.test/pay/cs_test_{}", n),
            })
        }

        async fn session_status(&self, _session_id: &str) -> Result<PaymentStatus> {
            if self.fail {
                return Err(AppError::Provider("provider rejected the request".to_string()));
            }
            Ok(*self.status.lock().unwrap())
        }
    }
}
