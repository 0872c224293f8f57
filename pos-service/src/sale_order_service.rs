use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::dto::SaleOrderRequest;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{order_number_at, SaleOrder};
use crate::pagination::{PageRequest, Paginated};
use crate::store::SaleOrderStore;

#[derive(Clone)]
pub struct SaleOrderService {
    store: Arc<dyn SaleOrderStore>,
}

impl SaleOrderService {
    pub fn new(store: Arc<dyn SaleOrderStore>) -> Self {
        Self { store }
    }

    /// `created_by` is always the authenticated caller, never client input.
    pub async fn create(&self, created_by: Uuid, request: SaleOrderRequest) -> ServiceResult<SaleOrder> {
        request.validate()?;
        let now = Utc::now();
        let order = SaleOrder {
            id: Uuid::new_v4(),
            order_number: order_number_at(now),
            customer_name: request.customer_name,
            total_amount: request.total_amount,
            status: request.status,
            created_by,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.store.insert(&order).await?;
        info!(order_id = %order.id, order_number = %order.order_number, %created_by, "sale order created");
        Ok(order)
    }

    pub async fn list(&self, page: PageRequest) -> ServiceResult<Paginated<SaleOrder>> {
        let (orders, total) = self.store.list(page).await?;
        Ok(Paginated::new(orders, total, page))
    }

    pub async fn get(&self, raw_id: &str) -> ServiceResult<SaleOrder> {
        let id = parse_id(raw_id)?;
        self.store
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound)
    }

    pub async fn update(&self, raw_id: &str, request: SaleOrderRequest) -> ServiceResult<SaleOrder> {
        request.validate()?;
        let mut order = self.get(raw_id).await?;
        order.customer_name = request.customer_name;
        order.total_amount = request.total_amount;
        order.status = request.status;
        order.updated_at = Utc::now();

        self.store.update(&order).await?;
        info!(order_id = %order.id, "sale order updated");
        Ok(order)
    }

    pub async fn delete(&self, raw_id: &str) -> ServiceResult<()> {
        let id = parse_id(raw_id)?;
        self.store.soft_delete(id, Utc::now()).await?;
        info!(order_id = %id, "sale order deleted");
        Ok(())
    }
}

fn parse_id(raw: &str) -> ServiceResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ServiceError::InvalidId(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemorySaleOrderStore;

    fn service() -> SaleOrderService {
        SaleOrderService::new(Arc::new(MemorySaleOrderStore::new()))
    }

    fn request(customer: &str, total: f64) -> SaleOrderRequest {
        SaleOrderRequest {
            customer_name: customer.into(),
            total_amount: total,
            status: "pending".into(),
        }
    }

    #[tokio::test]
    async fn create_stamps_creator_and_order_number() {
        let service = service();
        let creator = Uuid::new_v4();
        let order = service.create(creator, request("Walk-in", 42.0)).await.unwrap();

        assert_eq!(order.created_by, creator);
        assert!(order.order_number.starts_with("SO-"));
        assert_eq!(service.get(&order.id.to_string()).await.unwrap(), order);
    }

    #[tokio::test]
    async fn malformed_id_is_invalid_but_unknown_id_is_not_found() {
        let service = service();
        assert!(matches!(
            service.get("abc").await,
            Err(ServiceError::InvalidId(_))
        ));
        assert!(matches!(
            service.get(&Uuid::new_v4().to_string()).await,
            Err(ServiceError::NotFound)
        ));
        assert!(matches!(
            service.delete(&Uuid::new_v4().to_string()).await,
            Err(ServiceError::NotFound)
        ));
    }

    #[tokio::test]
    async fn deleted_orders_disappear_from_reads() {
        let service = service();
        let order = service
            .create(Uuid::new_v4(), request("Walk-in", 5.0))
            .await
            .unwrap();
        let id = order.id.to_string();

        service.delete(&id).await.unwrap();

        assert!(matches!(service.get(&id).await, Err(ServiceError::NotFound)));
        assert!(matches!(
            service.update(&id, request("Late", 1.0)).await,
            Err(ServiceError::NotFound)
        ));
        let page = service.list(PageRequest::default()).await.unwrap();
        assert_eq!(page.total_items, 0);
    }

    #[tokio::test]
    async fn update_rewrites_mutable_fields() {
        let service = service();
        let order = service
            .create(Uuid::new_v4(), request("Walk-in", 5.0))
            .await
            .unwrap();

        let mut changed = request("Regular", 7.5);
        changed.status = "paid".into();
        let updated = service.update(&order.id.to_string(), changed).await.unwrap();

        assert_eq!(updated.customer_name, "Regular");
        assert_eq!(updated.total_amount, 7.5);
        assert_eq!(updated.status, "paid");
        assert_eq!(updated.order_number, order.order_number);
        assert_eq!(updated.created_by, order.created_by);
    }
}
