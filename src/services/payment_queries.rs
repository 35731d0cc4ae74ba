use {
    crate::domain::{
        error::PaymentError,
        payment::{Payment, PaymentFilter, PaymentStatus},
        store::MarketStore,
    },
    serde::Serialize,
    uuid::Uuid,
};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Raw listing parameters as they arrive from the query string.
#[derive(Debug, Default)]
pub struct ListParams {
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub total_pages: i64,
}

#[derive(Debug, Serialize)]
pub struct PaymentPage {
    pub payments: Vec<Payment>,
    pub pagination: Pagination,
}

impl ListParams {
    pub fn into_filter(self, user_id: Uuid) -> Result<PaymentFilter, PaymentError> {
        let status = self
            .status
            .filter(|s| !s.trim().is_empty())
            .map(|s| PaymentStatus::try_from(s.trim().to_ascii_uppercase().as_str()))
            .transpose()?;

        let page = self.page.unwrap_or(1);
        if page == 0 {
            return Err(PaymentError::Validation("page starts at 1".into()));
        }
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_SIZE);
        if limit == 0 || limit > MAX_PAGE_SIZE {
            return Err(PaymentError::Validation(format!(
                "limit must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }

        Ok(PaymentFilter {
            user_id,
            status,
            page,
            limit,
        })
    }
}

/// Payments the caller paid or received, newest first.
pub async fn list_payments(
    store: &dyn MarketStore,
    caller: Uuid,
    params: ListParams,
) -> Result<PaymentPage, PaymentError> {
    let filter = params.into_filter(caller)?;
    let (payments, total) = store.list_payments(&filter).await?;
    let limit = i64::from(filter.limit);

    Ok(PaymentPage {
        payments,
        pagination: Pagination {
            page: filter.page,
            limit: filter.limit,
            total,
            total_pages: (total + limit - 1) / limit,
        },
    })
}

pub async fn get_payment(
    store: &dyn MarketStore,
    caller: Uuid,
    payment_id: Uuid,
) -> Result<Payment, PaymentError> {
    let payment = store
        .find_payment(payment_id)
        .await?
        .ok_or_else(|| PaymentError::NotFound(format!("payment {payment_id}")))?;

    if !payment.is_visible_to(caller) {
        return Err(PaymentError::Forbidden(
            "not authorized to view this payment".into(),
        ));
    }
    Ok(payment)
}
