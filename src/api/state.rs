use std::sync::Arc;
use crate::{
    config::Settings,
    service::{PaymentService, ServiceContext},
};

#[derive(Clone)]
pub struct AppState {
    pub service_context: Arc<ServiceContext>,
    /// Present only when a payment provider is configured; payment
    /// endpoints answer 503 without it.
    pub payments: Option<Arc<PaymentService>>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(
        service_context: Arc<ServiceContext>,
        payments: Option<Arc<PaymentService>>,
        settings: Arc<Settings>,
    ) -> Self {
        Self {
            service_context,
            payments,
            settings,
        }
    }
}
