use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// Item snapshotado no momento do checkout - preço congelado,
/// `product` referencia o documento de origem
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub name: String,
    pub qty: i32,
    pub image: String,
    pub price: f64,
    pub product: ObjectId,
}

#[derive(Debug, Serialize, Deserialize, Clone, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// Payload do provedor de pagamento, gravado verbatim.
/// Chaves no formato em que o provedor envia (não camelCase).
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct PaymentResult {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub update_time: String,
    #[serde(default)]
    pub email_address: String,
}

/// Documento da collection `orders`
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user: ObjectId,
    pub order_items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_result: Option<PaymentResult>,
    #[serde(default)]
    pub items_price: f64,
    #[serde(default)]
    pub tax_price: f64,
    #[serde(default)]
    pub shipping_price: f64,
    #[serde(default)]
    pub total_price: f64,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<BsonDateTime>,
    #[serde(default)]
    pub is_delivered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<BsonDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<BsonDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<BsonDateTime>,
}

// Request structures

/// Item do carrinho como o cliente envia - `_id` é o id do produto
/// e é descartado como identificador do item
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct OrderItemInput {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub qty: i32,
    pub image: String,
    pub price: f64,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub order_items: Vec<OrderItemInput>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    #[serde(default)]
    pub items_price: f64,
    #[serde(default)]
    pub tax_price: f64,
    #[serde(default)]
    pub shipping_price: f64,
    #[serde(default)]
    pub total_price: f64,
}

/// PUT /api/orders/{id}/pay - corpo repassado pelo cliente após o
/// callback do provedor
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct PaymentConfirmation {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub update_time: String,
    #[serde(default)]
    pub payer: Payer,
}

#[derive(Debug, Deserialize, Default, utoipa::ToSchema)]
pub struct Payer {
    #[serde(default)]
    pub email_address: String,
}

// Response structures

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub name: String,
    pub qty: i32,
    pub image: String,
    pub price: f64,
    pub product: String,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        OrderItemResponse {
            name: item.name,
            qty: item.qty,
            image: item.image,
            price: item.price,
            product: item.product.to_hex(),
        }
    }
}

/// Pedido como a API devolve. `user` é o id em hex, ou o objeto
/// `{_id, name, email}` nas rotas que populam o dono.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub user: serde_json::Value,
    pub order_items: Vec<OrderItemResponse>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_result: Option<PaymentResult>,
    pub items_price: f64,
    pub tax_price: f64,
    pub shipping_price: f64,
    pub total_price: f64,
    pub is_paid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<chrono::DateTime<chrono::Utc>>,
    pub is_delivered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        OrderResponse {
            id: order.id.map(|id| id.to_hex()).unwrap_or_default(),
            user: serde_json::Value::String(order.user.to_hex()),
            order_items: order
                .order_items
                .into_iter()
                .map(OrderItemResponse::from)
                .collect(),
            shipping_address: order.shipping_address,
            payment_method: order.payment_method,
            payment_result: order.payment_result,
            items_price: order.items_price,
            tax_price: order.tax_price,
            shipping_price: order.shipping_price,
            total_price: order.total_price,
            is_paid: order.is_paid,
            paid_at: order.paid_at.map(|d| d.to_chrono()),
            is_delivered: order.is_delivered,
            delivered_at: order.delivered_at.map(|d| d.to_chrono()),
            created_at: order.created_at.map(|d| d.to_chrono()),
            updated_at: order.updated_at.map(|d| d.to_chrono()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_flags_default_false() {
        let order: Order = serde_json::from_value(serde_json::json!({
            "user": { "$oid": "65a1b2c3d4e5f6a7b8c9d0e1" },
            "orderItems": [],
            "shippingAddress": {
                "address": "Rua A, 100",
                "city": "Lisboa",
                "postalCode": "1000-001",
                "country": "PT",
            },
            "paymentMethod": "PayPal",
        }))
        .unwrap();

        assert!(!order.is_paid);
        assert!(!order.is_delivered);
        assert!(order.paid_at.is_none());
        assert!(order.payment_result.is_none());
    }

    #[test]
    fn test_cart_item_id_becomes_product_ref() {
        let input: OrderItemInput = serde_json::from_value(serde_json::json!({
            "_id": "65a1b2c3d4e5f6a7b8c9d0e1",
            "name": "Camera",
            "qty": 2,
            "image": "/images/camera.jpg",
            "price": 499.9,
            // campos extras do carrinho são ignorados
            "countInStock": 3,
        }))
        .unwrap();

        assert_eq!(input.id, "65a1b2c3d4e5f6a7b8c9d0e1");
        assert_eq!(input.qty, 2);
    }

    #[test]
    fn test_payment_confirmation_tolerates_missing_payer() {
        let confirmation: PaymentConfirmation = serde_json::from_value(serde_json::json!({
            "id": "PAYID-123",
            "status": "COMPLETED",
            "update_time": "2024-01-10T10:00:00Z",
        }))
        .unwrap();

        assert_eq!(confirmation.payer.email_address, "");
        assert_eq!(confirmation.status, "COMPLETED");
    }
}
