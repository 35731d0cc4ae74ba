use {
    crate::domain::{
        error::PaymentError,
        gateway::{
            CheckoutRequest, CheckoutSession, GatewayStatus, PaymentGateway, VerifiedTransaction,
        },
        id::TxRef,
    },
    async_trait::async_trait,
    serde::{Deserialize, Serialize},
    std::time::Duration,
};

/// REST client for Chapa's hosted checkout.
pub struct ChapaGateway {
    http: reqwest::Client,
    base_url: String,
    secret_key: String,
}

impl ChapaGateway {
    pub fn new(
        base_url: &str,
        secret_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, PaymentError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PaymentError::Gateway(format!("http client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            secret_key: secret_key.into(),
        })
    }
}

#[derive(Serialize)]
struct InitializeBody<'a> {
    amount: String,
    currency: &'a str,
    email: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone_number: Option<&'a str>,
    tx_ref: &'a str,
    callback_url: &'a str,
    return_url: &'a str,
    customization: Customization<'a>,
    subaccounts: Vec<SubaccountSplit<'a>>,
}

#[derive(Serialize)]
struct Customization<'a> {
    title: &'a str,
    description: &'a str,
}

#[derive(Serialize)]
struct SubaccountSplit<'a> {
    id: &'a str,
    split_type: &'static str,
    split_value: f64,
}

#[derive(Deserialize)]
struct InitializeData {
    checkout_url: String,
}

impl<'a> From<&'a CheckoutRequest> for InitializeBody<'a> {
    fn from(req: &'a CheckoutRequest) -> Self {
        Self {
            amount: req.amount.to_string(),
            currency: req.currency.as_str(),
            email: &req.email,
            first_name: &req.first_name,
            last_name: &req.last_name,
            phone_number: req.phone_number.as_deref(),
            tx_ref: req.tx_ref.as_str(),
            callback_url: &req.callback_url,
            return_url: &req.return_url,
            customization: Customization {
                title: &req.title,
                description: &req.description,
            },
            subaccounts: req
                .splits
                .iter()
                .map(|s| SubaccountSplit {
                    id: &s.subaccount_id,
                    split_type: "percentage",
                    split_value: s.fraction,
                })
                .collect(),
        }
    }
}

/// Transaction status lives in `data.status`; the top-level `status` only
/// says whether the API call itself worked.
fn transaction_status(body: &serde_json::Value) -> GatewayStatus {
    body.get("data")
        .and_then(|d| d.get("status"))
        .or_else(|| body.get("status"))
        .and_then(|s| s.as_str())
        .map(GatewayStatus::from)
        .unwrap_or_else(|| GatewayStatus::Unrecognized(String::new()))
}

fn rejection_message(body: &serde_json::Value) -> String {
    match body.get("message") {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "no message".to_string(),
    }
}

#[async_trait]
impl PaymentGateway for ChapaGateway {
    async fn initialize(&self, request: &CheckoutRequest) -> Result<CheckoutSession, PaymentError> {
        let url = format!("{}/transaction/initialize", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.secret_key)
            .json(&InitializeBody::from(request))
            .send()
            .await
            .map_err(|e| PaymentError::Gateway(format!("initialize request: {e}")))?;

        let status = response.status();
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| PaymentError::Gateway(format!("initialize response: {e}")))?;

        if !status.is_success() || body.get("status").and_then(|s| s.as_str()) != Some("success") {
            return Err(PaymentError::Gateway(format!(
                "initialize rejected ({status}): {}",
                rejection_message(&body)
            )));
        }

        let data: InitializeData = body
            .get("data")
            .cloned()
            .map(serde_json::from_value)
            .transpose()?
            .ok_or_else(|| PaymentError::Gateway("initialize response without checkout_url".into()))?;

        Ok(CheckoutSession {
            checkout_url: data.checkout_url,
        })
    }

    async fn verify(&self, tx_ref: &TxRef) -> Result<VerifiedTransaction, PaymentError> {
        let url = format!("{}/transaction/verify/{}", self.base_url, tx_ref.as_str());
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| PaymentError::Gateway(format!("verify request: {e}")))?;

        let status = response.status();
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| PaymentError::Gateway(format!("verify response: {e}")))?;

        if !status.is_success() {
            return Err(PaymentError::Gateway(format!(
                "verify rejected ({status}): {}",
                rejection_message(&body)
            )));
        }

        Ok(VerifiedTransaction {
            status: transaction_status(&body),
            data: body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prefers_transaction_status_over_call_status() {
        let body = json!({"status": "success", "data": {"status": "pending"}});
        assert_eq!(transaction_status(&body), GatewayStatus::Pending);

        let body = json!({"status": "failed", "data": null});
        assert_eq!(transaction_status(&body), GatewayStatus::Failed);

        let body = json!({"message": "odd"});
        assert_eq!(transaction_status(&body), GatewayStatus::Unrecognized(String::new()));
    }
}
