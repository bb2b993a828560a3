use suds_app::{context::AppContext, domain::checkout::CheckoutServiceError};

pub(crate) async fn run(context: &AppContext) -> Result<String, String> {
    match context.checkout().await {
        Ok(session) => Ok(format!("continue to payment: {}", session.url)),
        Err(CheckoutServiceError::EmptyCart) => Err("the cart is empty".to_string()),
        Err(error) => Err(format!("failed to start checkout: {error}")),
    }
}
