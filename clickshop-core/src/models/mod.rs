pub mod invoice;
pub mod offer;
pub mod product;
pub mod ticket;
pub mod user;

pub use invoice::Invoice;
pub use offer::Offer;
pub use product::Product;
pub use ticket::SupportTicket;
pub use user::User;
