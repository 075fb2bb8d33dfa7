use std::collections::HashMap;

use diesel::prelude::*;

use crate::{
    domain::{
        order::{
            NewOrder as DomainNewOrder, Order as DomainOrder, OrderListQuery,
            UpdateOrder as DomainUpdateOrder,
        },
        payment::NewPaymentRecord,
    },
    models::{
        order::{
            NewOrder as DbNewOrder, NewOrderItem as DbNewOrderItem, Order as DbOrder,
            OrderItem as DbOrderItem, UpdateOrder as DbUpdateOrder,
        },
        payment::{NewPayment as DbNewPayment, Payment as DbPayment},
    },
    repository::{DieselRepository, OrderReader, OrderWriter},
    repository::errors::{RepositoryError, RepositoryResult},
};

fn load_order_children(
    conn: &mut crate::db::DbConnection,
    order_id: i32,
) -> Result<(Vec<DbOrderItem>, Vec<DbPayment>), diesel::result::Error> {
    use crate::schema::{order_items, payments};

    let items = order_items::table
        .filter(order_items::order_id.eq(order_id))
        .order(order_items::id.asc())
        .load::<DbOrderItem>(conn)?;

    let entries = payments::table
        .filter(payments::order_id.eq(order_id))
        .order(payments::id.asc())
        .load::<DbPayment>(conn)?;

    Ok((items, entries))
}

impl OrderReader for DieselRepository {
    fn get_order_by_id(&self, id: i32) -> RepositoryResult<Option<DomainOrder>> {
        use crate::schema::orders;

        let mut conn = self.conn()?;
        let order = orders::table
            .filter(orders::id.eq(id))
            .first::<DbOrder>(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        let (items, entries) = load_order_children(&mut conn, order.id)?;

        Ok(Some(DomainOrder::from((order, items, entries))))
    }

    fn get_order_by_tracking_id(&self, tracking_id: &str) -> RepositoryResult<Option<DomainOrder>> {
        use crate::schema::orders;

        let mut conn = self.conn()?;
        let order = orders::table
            .filter(orders::tracking_id.eq(tracking_id))
            .first::<DbOrder>(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        let (items, entries) = load_order_children(&mut conn, order.id)?;

        Ok(Some(DomainOrder::from((order, items, entries))))
    }

    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<DomainOrder>)> {
        use crate::schema::{order_items, orders, payments};

        let mut conn = self.conn()?;

        let OrderListQuery {
            status,
            search,
            pagination,
        } = query;

        let status_filter = status.map(|status| status.as_str().to_string());
        let search_pattern = search.as_ref().map(|term| format!("%{}%", term));

        let mut count_query = orders::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(ref status_value) = status_filter {
            count_query = count_query.filter(orders::status.eq(status_value.as_str()));
        }

        if let Some(ref pattern) = search_pattern {
            count_query = count_query.filter(
                orders::tracking_id
                    .like(pattern.clone())
                    .or(orders::customer_name.like(pattern.clone()))
                    .or(orders::customer_email.like(pattern.clone())),
            );
        }

        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items_query = orders::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(ref status_value) = status_filter {
            items_query = items_query.filter(orders::status.eq(status_value.as_str()));
        }

        if let Some(ref pattern) = search_pattern {
            items_query = items_query.filter(
                orders::tracking_id
                    .like(pattern.clone())
                    .or(orders::customer_name.like(pattern.clone()))
                    .or(orders::customer_email.like(pattern.clone())),
            );
        }

        items_query = items_query.order(orders::created_at.desc());

        if let Some(pagination) = pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            let limit = pagination.per_page as i64;
            items_query = items_query.offset(offset).limit(limit);
        }

        let db_orders = items_query.load::<DbOrder>(&mut conn)?;
        if db_orders.is_empty() {
            return Ok((total, Vec::new()));
        }

        let order_ids: Vec<i32> = db_orders.iter().map(|order| order.id).collect();

        let mut items_by_order: HashMap<i32, Vec<DbOrderItem>> = HashMap::new();
        let item_rows = order_items::table
            .filter(order_items::order_id.eq_any(&order_ids))
            .order(order_items::id.asc())
            .load::<DbOrderItem>(&mut conn)?;
        for item in item_rows {
            items_by_order.entry(item.order_id).or_default().push(item);
        }

        let mut payments_by_order: HashMap<i32, Vec<DbPayment>> = HashMap::new();
        let payment_rows = payments::table
            .filter(payments::order_id.eq_any(&order_ids))
            .order(payments::id.asc())
            .load::<DbPayment>(&mut conn)?;
        for entry in payment_rows {
            payments_by_order
                .entry(entry.order_id)
                .or_default()
                .push(entry);
        }

        let orders = db_orders
            .into_iter()
            .map(|order| {
                let order_id = order.id;
                let items = items_by_order.remove(&order_id).unwrap_or_default();
                let entries = payments_by_order.remove(&order_id).unwrap_or_default();
                DomainOrder::from((order, items, entries))
            })
            .collect();

        Ok((total, orders))
    }
}

impl OrderWriter for DieselRepository {
    fn create_order(&self, new_order: &DomainNewOrder) -> RepositoryResult<DomainOrder> {
        use crate::schema::{order_items, orders};

        let mut conn = self.conn()?;

        conn.transaction::<DomainOrder, RepositoryError, _>(|conn| {
            let db_new = DbNewOrder::from(new_order);

            let created = diesel::insert_into(orders::table)
                .values(&db_new)
                .get_result::<DbOrder>(conn)?;

            let order_id = created.id;

            if !new_order.items.is_empty() {
                let payload: Vec<DbNewOrderItem> = new_order
                    .items
                    .iter()
                    .map(|item| DbNewOrderItem::from_domain(order_id, item))
                    .collect();

                diesel::insert_into(order_items::table)
                    .values(&payload)
                    .execute(conn)?;
            }

            let (items, entries) = load_order_children(conn, order_id)?;

            Ok(DomainOrder::from((created, items, entries)))
        })
    }

    fn update_order(
        &self,
        order_id: i32,
        expected_version: i32,
        updates: &DomainUpdateOrder,
    ) -> RepositoryResult<DomainOrder> {
        use crate::schema::orders;

        let mut conn = self.conn()?;

        conn.transaction::<DomainOrder, RepositoryError, _>(|conn| {
            let db_updates = DbUpdateOrder::from_domain(updates, expected_version + 1);

            let target = orders::table
                .filter(orders::id.eq(order_id))
                .filter(orders::version.eq(expected_version));

            let updated = match diesel::update(target)
                .set(&db_updates)
                .get_result::<DbOrder>(conn)
            {
                Ok(order) => order,
                Err(diesel::result::Error::NotFound) => {
                    return Err(version_conflict_or_missing(conn, order_id)?);
                }
                Err(err) => return Err(err.into()),
            };

            let (items, entries) = load_order_children(conn, order_id)?;

            Ok(DomainOrder::from((updated, items, entries)))
        })
    }

    fn add_payment(
        &self,
        order_id: i32,
        expected_version: i32,
        entry: &NewPaymentRecord,
    ) -> RepositoryResult<DomainOrder> {
        use crate::schema::{orders, payments};

        let mut conn = self.conn()?;

        conn.transaction::<DomainOrder, RepositoryError, _>(|conn| {
            let target = orders::table
                .filter(orders::id.eq(order_id))
                .filter(orders::version.eq(expected_version));

            // The version bump makes the append race-safe against a
            // concurrent cancellation or another ledger write.
            let updated = match diesel::update(target)
                .set((
                    orders::version.eq(expected_version + 1),
                    orders::updated_at.eq(diesel::dsl::now),
                ))
                .get_result::<DbOrder>(conn)
            {
                Ok(order) => order,
                Err(diesel::result::Error::NotFound) => {
                    return Err(version_conflict_or_missing(conn, order_id)?);
                }
                Err(err) => return Err(err.into()),
            };

            diesel::insert_into(payments::table)
                .values(&DbNewPayment::from(entry))
                .execute(conn)?;

            let (items, entries) = load_order_children(conn, order_id)?;

            Ok(DomainOrder::from((updated, items, entries)))
        })
    }
}

/// Distinguish a lost conditional update from a missing row.
fn version_conflict_or_missing(
    conn: &mut crate::db::DbConnection,
    order_id: i32,
) -> Result<RepositoryError, diesel::result::Error> {
    use crate::schema::orders;

    let exists = orders::table
        .filter(orders::id.eq(order_id))
        .count()
        .get_result::<i64>(conn)?
        > 0;

    Ok(if exists {
        RepositoryError::Conflict
    } else {
        RepositoryError::NotFound
    })
}
