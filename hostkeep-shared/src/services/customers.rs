//! Customer operations

use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ServiceError, ServiceResult};
use crate::integrity::{cascade, ConsistencyReport};
use crate::models::customer::{CreateCustomer, Customer, UpdateCustomer};
use crate::models::EntityKind;
use crate::populate::{self, CustomerDetail};
use crate::store::EntityStore;

pub async fn add(store: &dyn EntityStore, data: CreateCustomer) -> ServiceResult<Customer> {
    data.validate()?;

    let customer = store.create_customer(data).await?;
    info!(customer_id = %customer.id, "Customer created");
    Ok(customer)
}

pub async fn list(store: &dyn EntityStore) -> ServiceResult<Vec<Customer>> {
    Ok(store.list_customers().await?)
}

/// Customer with houses inlined, each house's tasks reduced to `{id, cost}`
pub async fn get(store: &dyn EntityStore, id: Uuid) -> ServiceResult<CustomerDetail> {
    populate::customer(store, id)
        .await?
        .ok_or_else(|| ServiceError::not_found(EntityKind::Customer, id))
}

pub async fn update(
    store: &dyn EntityStore,
    id: Uuid,
    update: UpdateCustomer,
) -> ServiceResult<Customer> {
    update.validate()?;

    let mut customer = store
        .find_customer(id)
        .await?
        .ok_or_else(|| ServiceError::not_found(EntityKind::Customer, id))?;

    customer.apply(update);
    if !store.update_customer(&customer).await? {
        return Err(ServiceError::not_found(EntityKind::Customer, id));
    }

    Ok(customer)
}

/// Deletes a customer, then its houses and everything below them
pub async fn remove(store: &dyn EntityStore, id: Uuid) -> ServiceResult<ConsistencyReport> {
    if !store.delete_customer(id).await? {
        return Err(ServiceError::not_found(EntityKind::Customer, id));
    }

    let mut report = ConsistencyReport::new();
    cascade::customer_removed(store, id, &mut report).await;

    info!(
        customer_id = %id,
        houses_removed = report.removed.houses,
        issues = report.issues.len(),
        "Customer deleted"
    );
    Ok(report)
}
