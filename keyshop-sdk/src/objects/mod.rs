pub mod address;
pub mod catalog;
pub mod methods;
pub mod price;

pub use address::{AddressQuery, AddressResponse};
pub use catalog::{MethodInfo, Plan};
pub use methods::{AddressStrategy, Chain, PaymentMethod};
pub use price::{PriceTable, QUOTE_CURRENCY};
