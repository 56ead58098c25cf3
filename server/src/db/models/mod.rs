//! Database Models

// Serde helpers
pub mod serde_helpers;

// Catalog
pub mod product;

// Promotions
pub mod promotion;

// Orders
pub mod order;

// Tables and reservations
pub mod dining_table;

// Re-exports
pub use dining_table::{
    DiningTable, DiningTableCreate, Reservation, ReservationCreate, ReservationStatus,
    ReservationStatusUpdate, TableStatus, TableStatusUpdate,
};
pub use order::{
    Order, OrderCreate, OrderItem, OrderItemInput, OrderStatus, OrderStatusUpdate, OrderType,
    PaymentStatus,
};
pub use product::{Product, ProductCreate};
pub use promotion::{DiscountType, Promotion, PromotionCreate};
