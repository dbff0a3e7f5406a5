use async_trait::async_trait;
use stripe::{
    CheckoutSession, CheckoutSessionId, CheckoutSessionMode, CheckoutSessionPaymentStatus,
    Client, CreateCheckoutSession, CreateCheckoutSessionLineItems, CreatePrice, CreateProduct,
    Currency, IdOrCreate, Price, Product,
};

use crate::{
    domain::PaymentStatus,
    error::{AppError, Result},
    payments::{CheckoutDetails, PaymentGateway},
};

pub struct StripeGateway {
    client: Client,
    success_url: String,
    cancel_url: String,
}

impl StripeGateway {
    pub fn new(api_key: String, success_url: String, cancel_url: String) -> Self {
        Self {
            client: Client::new(api_key),
            success_url,
            cancel_url,
        }
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_checkout(
        &self,
        product_name: &str,
        amount_cents: i64,
    ) -> Result<CheckoutDetails> {
        // A fresh product and price per payment keeps the provider-side
        // catalog in step with material titles at purchase time.
        let product = Product::create(&self.client, CreateProduct::new(product_name))
            .await
            .map_err(|e| AppError::Provider(format!("Stripe error: {}", e)))?;

        let mut price_params = CreatePrice::new(Currency::USD);
        price_params.product = Some(IdOrCreate::Id(&product.id));
        price_params.unit_amount = Some(amount_cents);

        let price = Price::create(&self.client, price_params)
            .await
            .map_err(|e| AppError::Provider(format!("Stripe error: {}", e)))?;

        let price_id = price.id.to_string();

        let mut params = CreateCheckoutSession::new();
        params.mode = Some(CheckoutSessionMode::Payment);
        params.success_url = Some(&self.success_url);
        params.cancel_url = Some(&self.cancel_url);
        params.line_items = Some(vec![CreateCheckoutSessionLineItems {
            price: Some(price_id.clone()),
            quantity: Some(1),
            ..Default::default()
        }]);

        let session = CheckoutSession::create(&self.client, params)
            .await
            .map_err(|e| AppError::Provider(format!("Stripe error: {}", e)))?;

        let checkout_url = session.url
            .ok_or_else(|| AppError::Provider("No checkout URL returned".to_string()))?;

        Ok(CheckoutDetails {
            product_id: product.id.to_string(),
            price_id,
            session_id: session.id.to_string(),
            checkout_url,
        })
    }

    async fn session_status(&self, session_id: &str) -> Result<PaymentStatus> {
        let id = session_id.parse::<CheckoutSessionId>()
            .map_err(|e| AppError::Provider(format!("Invalid checkout session id: {}", e)))?;

        let session = CheckoutSession::retrieve(&self.client, &id, &[])
            .await
            .map_err(|e| AppError::Provider(format!("Stripe error: {}", e)))?;

        Ok(match session.payment_status {
            CheckoutSessionPaymentStatus::Paid => PaymentStatus::Paid,
            CheckoutSessionPaymentStatus::Unpaid => PaymentStatus::Unpaid,
            CheckoutSessionPaymentStatus::NoPaymentRequired => PaymentStatus::NoPaymentRequired,
        })
    }
}
