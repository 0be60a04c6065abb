use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};
use mongodb::options::ReturnDocument;
use serde_json::json;
use std::collections::HashMap;

use crate::database::MongoDB;
use crate::models::{
    CreateOrderRequest, Order, OrderItem, OrderItemInput, OrderResponse, PaymentConfirmation,
    PaymentResult, User,
};
use crate::utils::error::{parse_object_id, AppError};

const ORDERS: &str = "orders";
const USERS: &str = "users";

/// Congela os itens do carrinho: o `_id` enviado pelo cliente vira a
/// referência `product` e nunca é usado como id do item. Lista vazia é 400.
pub fn snapshot_items(items: &[OrderItemInput]) -> Result<Vec<OrderItem>, AppError> {
    if items.is_empty() {
        return Err(AppError::BadRequest("No order items".to_string()));
    }

    items
        .iter()
        .map(|item| {
            let product = parse_object_id(&item.id)?;
            Ok(OrderItem {
                name: item.name.clone(),
                qty: item.qty,
                image: item.image.clone(),
                price: item.price,
                product,
            })
        })
        .collect()
}

/// Payload do provedor gravado verbatim
pub fn payment_result_from(confirmation: &PaymentConfirmation) -> PaymentResult {
    PaymentResult {
        id: confirmation.id.clone(),
        status: confirmation.status.clone(),
        update_time: confirmation.update_time.clone(),
        email_address: confirmation.payer.email_address.clone(),
    }
}

// Checkout: snapshot dos itens + dono vindo do token, nada do cliente
pub async fn create_order(
    db: &MongoDB,
    user_id: &ObjectId,
    request: &CreateOrderRequest,
) -> Result<OrderResponse, AppError> {
    let order_items = snapshot_items(&request.order_items)?;

    let collection = db.collection::<Order>(ORDERS);

    let mut order = Order {
        id: None,
        user: *user_id,
        order_items,
        shipping_address: request.shipping_address.clone(),
        payment_method: request.payment_method.clone(),
        payment_result: None,
        items_price: request.items_price,
        tax_price: request.tax_price,
        shipping_price: request.shipping_price,
        total_price: request.total_price,
        is_paid: false,
        paid_at: None,
        is_delivered: false,
        delivered_at: None,
        created_at: Some(BsonDateTime::now()),
        updated_at: Some(BsonDateTime::now()),
    };

    let result = collection.insert_one(&order).await?;
    order.id = result.inserted_id.as_object_id();

    log::info!(
        "🛒 Order created: {} ({} items)",
        order.id.map(|id| id.to_hex()).unwrap_or_default(),
        order.order_items.len()
    );

    Ok(OrderResponse::from(order))
}

// Pedidos do usuário logado
pub async fn my_orders(db: &MongoDB, user_id: &ObjectId) -> Result<Vec<OrderResponse>, AppError> {
    let collection = db.collection::<Order>(ORDERS);

    let orders: Vec<Order> = collection
        .find(doc! { "user": user_id })
        .await?
        .try_collect()
        .await?;

    Ok(orders.into_iter().map(OrderResponse::from).collect())
}

// Qualquer usuário autenticado lê qualquer pedido por id - não há
// escopo de dono. Popula o dono com {_id, name, email}.
pub async fn get_order(db: &MongoDB, id: &str) -> Result<OrderResponse, AppError> {
    let object_id = parse_object_id(id)?;
    let collection = db.collection::<Order>(ORDERS);

    let order = collection
        .find_one(doc! { "_id": object_id })
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    let owner = db
        .collection::<User>(USERS)
        .find_one(doc! { "_id": order.user })
        .projection(doc! { "password": 0 })
        .await?;

    let mut response = OrderResponse::from(order);
    response.user = match owner {
        Some(user) => json!({
            "_id": user.id.map(|id| id.to_hex()).unwrap_or_default(),
            "name": user.name,
            "email": user.email,
        }),
        None => serde_json::Value::Null,
    };

    Ok(response)
}

// Marca como pago e grava o resultado do provedor. Re-chamada apenas
// sobrescreve paidAt - não há guarda de transição.
pub async fn pay_order(
    db: &MongoDB,
    id: &str,
    confirmation: &PaymentConfirmation,
) -> Result<OrderResponse, AppError> {
    let object_id = parse_object_id(id)?;
    let collection = db.collection::<Order>(ORDERS);

    let payment_result = payment_result_from(confirmation);
    let payment_bson = mongodb::bson::to_bson(&payment_result)
        .map_err(|e| AppError::Database(format!("Failed to encode payment result: {}", e)))?;

    let order = collection
        .find_one_and_update(
            doc! { "_id": object_id },
            doc! { "$set": {
                "isPaid": true,
                "paidAt": BsonDateTime::now(),
                "paymentResult": payment_bson,
                "updatedAt": BsonDateTime::now(),
            }},
        )
        .return_document(ReturnDocument::After)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    log::info!("💰 Order paid: {}", id);

    Ok(OrderResponse::from(order))
}

// Marca como entregue. Não exige pedido pago - mesma ausência de guarda.
pub async fn deliver_order(db: &MongoDB, id: &str) -> Result<OrderResponse, AppError> {
    let object_id = parse_object_id(id)?;
    let collection = db.collection::<Order>(ORDERS);

    let order = collection
        .find_one_and_update(
            doc! { "_id": object_id },
            doc! { "$set": {
                "isDelivered": true,
                "deliveredAt": BsonDateTime::now(),
                "updatedAt": BsonDateTime::now(),
            }},
        )
        .return_document(ReturnDocument::After)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    log::info!("📦 Order delivered: {}", id);

    Ok(OrderResponse::from(order))
}

// Todos os pedidos, com o dono populado como {_id, name}
pub async fn list_orders(db: &MongoDB) -> Result<Vec<OrderResponse>, AppError> {
    let collection = db.collection::<Order>(ORDERS);

    let orders: Vec<Order> = collection.find(doc! {}).await?.try_collect().await?;

    // Uma consulta só para todos os donos, como um populate faria
    let owner_ids: Vec<ObjectId> = orders.iter().map(|o| o.user).collect();
    let owners: Vec<User> = db
        .collection::<User>(USERS)
        .find(doc! { "_id": { "$in": owner_ids } })
        .projection(doc! { "password": 0 })
        .await?
        .try_collect()
        .await?;

    let by_id: HashMap<ObjectId, &User> = owners
        .iter()
        .filter_map(|u| u.id.map(|id| (id, u)))
        .collect();

    Ok(orders
        .into_iter()
        .map(|order| {
            let owner = by_id.get(&order.user);
            let mut response = OrderResponse::from(order);
            response.user = match owner {
                Some(user) => json!({
                    "_id": user.id.map(|id| id.to_hex()).unwrap_or_default(),
                    "name": user.name,
                }),
                None => serde_json::Value::Null,
            };
            response
        })
        .collect())
}
