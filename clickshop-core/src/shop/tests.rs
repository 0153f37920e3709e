use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::RoleSecrets;
use crate::error::ShopError;
use crate::models::invoice::{CheckoutRequest, InvoiceStatus, PaymentMethod, DEFAULT_CUSTOMER};
use crate::models::offer::{Offer, OfferPayload, OfferStatus};
use crate::models::product::{Product, ProductCategory, RegisterStock, PLACEHOLDER_IMAGE};
use crate::models::ticket::{TicketReason, TicketRequest, TicketStatus};
use crate::models::user::{AccountStatus, Gender, RegisterUser, Role, User};
use crate::shop::Shop;
use crate::store::{keys, FileStore, MemoryStore, StorageBackend};

fn shop() -> Shop {
    Shop::open(MemoryStore::new()).expect("open on an empty store succeeds")
}

fn secrets() -> RoleSecrets {
    RoleSecrets {
        employee: "staff-key".into(),
        admin: "admin-key".into(),
    }
}

fn stock_submission(name: &str, price: u32, quantity: u32) -> RegisterStock {
    RegisterStock {
        name: name.into(),
        price: Decimal::from(price),
        category: ProductCategory::Dresses,
        description: "test stock".into(),
        quantity,
        image: None,
    }
}

fn seed_product(shop: &Shop, name: &str, price: u32, quantity: u32) -> Product {
    shop.register_stock(stock_submission(name, price, quantity))
        .expect("registration succeeds")
}

fn stock_of(shop: &Shop, product_id: Uuid) -> u32 {
    shop.catalog()
        .into_iter()
        .find(|p| p.id == product_id)
        .expect("product is in the catalog")
        .stock
}

fn customer_request(email: &str) -> RegisterUser {
    RegisterUser {
        name: "Jane Doe".into(),
        email: email.into(),
        password: "hunter22".into(),
        role: Role::Customer,
        secret_key: None,
        size: Some("M".into()),
        gender: Some(Gender::Female),
    }
}

fn checkout_cash() -> CheckoutRequest {
    CheckoutRequest {
        customer_name: None,
        payment_method: PaymentMethod::Cash,
    }
}

/// A directory record for cart/favorites tests that do not need real
/// credentials.
fn bare_user(role: Role) -> User {
    User {
        id: Uuid::new_v4(),
        name: "Test User".into(),
        email: format!("{}@example.com", Uuid::new_v4()),
        password_hash: String::new(),
        role,
        status: AccountStatus::Active,
        last_login: None,
        size: None,
        gender: None,
    }
}

// --- checkout / void reconciliation ---

#[test]
fn checkout_then_void_restores_stock_exactly_once() {
    let shop = shop();
    let product = seed_product(&shop, "Summer Dress", 10, 5);
    let clerk = Uuid::new_v4();

    for _ in 0..3 {
        shop.add_to_cart(clerk, product.id).expect("stock allows 3 units");
    }
    let invoice = shop.checkout(clerk, checkout_cash()).expect("checkout succeeds");

    assert_eq!(invoice.total, Decimal::from(30));
    assert_eq!(invoice.status, InvoiceStatus::Paid);
    assert_eq!(invoice.customer_name, DEFAULT_CUSTOMER);
    assert_eq!(stock_of(&shop, product.id), 2);
    assert!(shop.cart(clerk).lines.is_empty(), "cart is discarded");

    let voided = shop.void_invoice(invoice.id).expect("first void succeeds");
    assert_eq!(voided.status, InvoiceStatus::Void);
    assert_eq!(stock_of(&shop, product.id), 5);

    // Second void is rejected and restores nothing further.
    assert!(matches!(
        shop.void_invoice(invoice.id),
        Err(ShopError::AlreadyVoid)
    ));
    assert_eq!(stock_of(&shop, product.id), 5);
}

#[test]
fn checkout_total_matches_frozen_lines_not_current_prices() {
    let shop = shop();
    let product = seed_product(&shop, "Straw Hat", 10, 5);
    let clerk = Uuid::new_v4();

    shop.add_to_cart(clerk, product.id).unwrap();
    shop.set_quantity(clerk, product.id, 2).unwrap();

    // Re-registration overwrites the catalog price after the line froze.
    seed_product(&shop, "Straw Hat", 12, 0);

    let invoice = shop.checkout(clerk, checkout_cash()).unwrap();
    assert_eq!(invoice.total, Decimal::from(20));
    assert_eq!(invoice.lines[0].unit_price, Decimal::from(10));
}

#[test]
fn checkout_rejects_empty_cart() {
    let shop = shop();
    let clerk = Uuid::new_v4();
    assert!(matches!(
        shop.checkout(clerk, checkout_cash()),
        Err(ShopError::EmptyCart)
    ));
    assert!(shop.invoices().is_empty());
}

#[test]
fn checkout_revalidates_against_live_stock() {
    let shop = shop();
    let product = seed_product(&shop, "Silk Scarf", 15, 5);
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();

    // Both carts pass their own validation against stock 5.
    for _ in 0..3 {
        shop.add_to_cart(first, product.id).unwrap();
        shop.add_to_cart(second, product.id).unwrap();
    }
    shop.checkout(first, checkout_cash()).expect("first sale drains stock to 2");

    let err = shop.checkout(second, checkout_cash()).unwrap_err();
    assert!(matches!(err, ShopError::InsufficientStock { available: 2 }));

    // The rejected checkout mutated nothing.
    assert_eq!(stock_of(&shop, product.id), 2);
    assert_eq!(shop.invoices().len(), 1);
    assert_eq!(shop.cart(second).lines.len(), 1);
}

#[test]
fn stock_never_goes_negative_across_sequences() {
    let shop = shop();
    let product = seed_product(&shop, "Leather Belt", 20, 2);
    let clerk = Uuid::new_v4();

    shop.add_to_cart(clerk, product.id).unwrap();
    shop.add_to_cart(clerk, product.id).unwrap();
    let invoice = shop.checkout(clerk, checkout_cash()).unwrap();
    assert_eq!(stock_of(&shop, product.id), 0);

    assert!(matches!(
        shop.add_to_cart(clerk, product.id),
        Err(ShopError::OutOfStock)
    ));

    shop.void_invoice(invoice.id).unwrap();
    assert_eq!(stock_of(&shop, product.id), 2);
}

#[test]
fn checkout_records_customer_and_payment_method() {
    let shop = shop();
    let product = seed_product(&shop, "Denim Jacket", 45, 3);
    let clerk = Uuid::new_v4();

    shop.add_to_cart(clerk, product.id).unwrap();
    let invoice = shop
        .checkout(
            clerk,
            CheckoutRequest {
                customer_name: Some("  Maria Perez  ".into()),
                payment_method: PaymentMethod::Transfer,
            },
        )
        .unwrap();

    assert_eq!(invoice.customer_name, "Maria Perez");
    assert_eq!(invoice.payment_method, PaymentMethod::Transfer);
    assert!(invoice.number.starts_with("INV-"));

    // Ledger is newest first.
    shop.add_to_cart(clerk, product.id).unwrap();
    let later = shop.checkout(clerk, checkout_cash()).unwrap();
    assert_eq!(shop.invoices()[0].id, later.id);
}

// --- cart validation ---

#[test]
fn add_to_cart_rejects_zero_stock() {
    let shop = shop();
    let product = seed_product(&shop, "Gone Item", 10, 0);
    let clerk = Uuid::new_v4();

    assert!(matches!(
        shop.add_to_cart(clerk, product.id),
        Err(ShopError::OutOfStock)
    ));
    assert!(shop.cart(clerk).lines.is_empty());
}

#[test]
fn add_to_cart_stops_at_the_stock_limit() {
    let shop = shop();
    let product = seed_product(&shop, "Scarce Item", 10, 2);
    let clerk = Uuid::new_v4();

    shop.add_to_cart(clerk, product.id).unwrap();
    shop.add_to_cart(clerk, product.id).unwrap();
    assert!(matches!(
        shop.add_to_cart(clerk, product.id),
        Err(ShopError::StockLimitReached)
    ));
    assert_eq!(shop.cart(clerk).lines[0].quantity, 2);
}

#[test]
fn set_quantity_beyond_stock_leaves_the_line_unchanged() {
    let shop = shop();
    let product = seed_product(&shop, "Wool Coat", 80, 5);
    let clerk = Uuid::new_v4();

    shop.add_to_cart(clerk, product.id).unwrap();
    let err = shop.set_quantity(clerk, product.id, 10).unwrap_err();
    assert!(matches!(err, ShopError::InsufficientStock { available: 5 }));
    assert_eq!(shop.cart(clerk).lines[0].quantity, 1);

    assert!(matches!(
        shop.set_quantity(clerk, product.id, 0),
        Err(ShopError::Validation(_))
    ));
    assert_eq!(shop.cart(clerk).lines[0].quantity, 1);

    shop.set_quantity(clerk, product.id, 5).unwrap();
    assert_eq!(shop.cart(clerk).lines[0].quantity, 5);
}

#[test]
fn removing_a_line_is_unconditional() {
    let shop = shop();
    let product = seed_product(&shop, "Plain Tee", 8, 4);
    let clerk = Uuid::new_v4();

    shop.add_to_cart(clerk, product.id).unwrap();
    let view = shop.remove_line(clerk, product.id).unwrap();
    assert!(view.lines.is_empty());

    // Absent lines and unknown carts are fine too.
    let view = shop.remove_line(clerk, product.id).unwrap();
    assert!(view.lines.is_empty());
}

#[test]
fn set_quantity_requires_an_existing_line() {
    let shop = shop();
    let product = seed_product(&shop, "Linen Shirt", 25, 5);
    let clerk = Uuid::new_v4();

    assert!(matches!(
        shop.set_quantity(clerk, product.id, 2),
        Err(ShopError::LineNotFound)
    ));
}

// --- inventory registration ---

#[test]
fn registration_merges_case_insensitively() {
    let shop = shop();
    let first = shop
        .register_stock(RegisterStock {
            name: "Dress A".into(),
            price: Decimal::from(30),
            category: ProductCategory::Dresses,
            description: "first batch".into(),
            quantity: 10,
            image: None,
        })
        .unwrap();

    let merged = shop
        .register_stock(RegisterStock {
            name: "dress a".into(),
            price: Decimal::from(35),
            category: ProductCategory::Clearance,
            description: "second batch".into(),
            quantity: 5,
            image: None,
        })
        .unwrap();

    assert_eq!(merged.id, first.id, "no duplicate product is created");
    assert_eq!(merged.stock, 15);
    assert_eq!(merged.price, Decimal::from(35));
    assert_eq!(merged.category, ProductCategory::Clearance);
    assert_eq!(merged.description, "second batch");
    assert_eq!(shop.catalog().len(), 1);
}

#[test]
fn registration_fills_the_placeholder_image() {
    let shop = shop();
    let product = seed_product(&shop, "No Photo Yet", 10, 1);
    assert_eq!(product.image, PLACEHOLDER_IMAGE);
}

#[test]
fn registration_validates_name_and_price() {
    let shop = shop();
    assert!(matches!(
        shop.register_stock(stock_submission("x", 10, 1)),
        Err(ShopError::Validation(_))
    ));
    assert!(matches!(
        shop.register_stock(RegisterStock {
            price: Decimal::ZERO,
            ..stock_submission("Valid Name", 0, 1)
        }),
        Err(ShopError::Validation(_))
    ));
    assert!(shop.catalog().is_empty());
}

#[test]
fn catalog_visits_count_up() {
    let shop = shop();
    assert_eq!(shop.catalog_visits(), 0);
    shop.record_catalog_visit().unwrap();
    shop.record_catalog_visit().unwrap();
    assert_eq!(shop.catalog_visits(), 2);
}

// --- offers ---

#[test]
fn offer_window_is_inclusive_at_both_ends() {
    let now = Utc::now();
    let offer = Offer {
        id: Uuid::new_v4(),
        product_id: Uuid::new_v4(),
        discount_price: Decimal::from(5),
        starts_at: now,
        ends_at: now + Duration::days(7),
        description: "week special".into(),
    };

    assert_eq!(offer.status(now - Duration::seconds(1)), OfferStatus::Upcoming);
    assert_eq!(offer.status(now), OfferStatus::Active);
    assert_eq!(offer.status(now + Duration::days(7)), OfferStatus::Active);
    assert_eq!(
        offer.status(now + Duration::days(7) + Duration::seconds(1)),
        OfferStatus::Expired
    );
}

fn offer_payload(product_id: Uuid, discount: u32) -> OfferPayload {
    let now = Utc::now();
    OfferPayload {
        product_id,
        discount_price: Decimal::from(discount),
        starts_at: now - Duration::hours(1),
        ends_at: now + Duration::hours(1),
        description: "limited offer".into(),
    }
}

#[test]
fn discount_must_be_strictly_below_the_product_price() {
    let shop = shop();
    let product = seed_product(&shop, "Evening Gown", 50, 3);

    assert!(matches!(
        shop.create_offer(offer_payload(product.id, 50)),
        Err(ShopError::DiscountNotBelowPrice)
    ));
    assert!(matches!(
        shop.create_offer(offer_payload(product.id, 60)),
        Err(ShopError::DiscountNotBelowPrice)
    ));
    assert!(shop.offers().is_empty());

    shop.create_offer(offer_payload(product.id, 40)).unwrap();
    assert_eq!(shop.offers().len(), 1);
}

#[test]
fn offer_rejects_inverted_window_and_unknown_product() {
    let shop = shop();
    let product = seed_product(&shop, "Ankle Boots", 60, 4);

    let mut inverted = offer_payload(product.id, 40);
    std::mem::swap(&mut inverted.starts_at, &mut inverted.ends_at);
    assert!(matches!(
        shop.create_offer(inverted),
        Err(ShopError::OfferWindowInverted)
    ));

    assert!(matches!(
        shop.create_offer(offer_payload(Uuid::new_v4(), 40)),
        Err(ShopError::ProductNotFound)
    ));
}

#[test]
fn catalog_shows_the_first_active_offer_for_overlaps() {
    let shop = shop();
    let product = seed_product(&shop, "Canvas Bag", 20, 10);

    shop.create_offer(offer_payload(product.id, 15)).unwrap();
    shop.create_offer(offer_payload(product.id, 12)).unwrap();

    let item = shop
        .catalog()
        .into_iter()
        .find(|p| p.id == product.id)
        .unwrap();
    assert_eq!(item.offer_price, Some(Decimal::from(15)));
}

#[test]
fn inactive_offers_do_not_override_the_price() {
    let shop = shop();
    let product = seed_product(&shop, "Rain Coat", 30, 6);

    let now = Utc::now();
    shop.create_offer(OfferPayload {
        product_id: product.id,
        discount_price: Decimal::from(25),
        starts_at: now + Duration::days(1),
        ends_at: now + Duration::days(2),
        description: "upcoming".into(),
    })
    .unwrap();

    let item = shop
        .catalog()
        .into_iter()
        .find(|p| p.id == product.id)
        .unwrap();
    assert_eq!(item.offer_price, None);

    let views = shop.offers();
    assert_eq!(views[0].status, OfferStatus::Upcoming);
}

#[test]
fn offers_can_be_updated_and_deleted() {
    let shop = shop();
    let product = seed_product(&shop, "Wide Brim Hat", 40, 5);
    let offer = shop.create_offer(offer_payload(product.id, 35)).unwrap();

    // Updates validate against the product's current price.
    assert!(matches!(
        shop.update_offer(offer.id, offer_payload(product.id, 45)),
        Err(ShopError::DiscountNotBelowPrice)
    ));
    let updated = shop
        .update_offer(offer.id, offer_payload(product.id, 30))
        .unwrap();
    assert_eq!(updated.discount_price, Decimal::from(30));

    shop.delete_offer(offer.id).unwrap();
    assert!(matches!(
        shop.delete_offer(offer.id),
        Err(ShopError::OfferNotFound)
    ));
}

// --- user directory ---

#[test]
fn staff_registration_requires_the_shared_secret() {
    let shop = shop();
    let secrets = secrets();

    let mut request = customer_request("clerk@clickshop.test");
    request.role = Role::Employee;
    request.secret_key = None;
    assert!(matches!(
        shop.register(request.clone(), &secrets),
        Err(ShopError::InvalidSecretKey)
    ));

    request.secret_key = Some("wrong".into());
    assert!(matches!(
        shop.register(request.clone(), &secrets),
        Err(ShopError::InvalidSecretKey)
    ));

    request.secret_key = Some("staff-key".into());
    let user = shop.register(request, &secrets).unwrap();
    assert_eq!(user.role, Role::Employee);
    // Size and gender are customer-only fields.
    assert_eq!(user.size, None);
    assert_eq!(user.gender, None);
}

#[test]
fn duplicate_emails_are_rejected_case_insensitively() {
    let shop = shop();
    let secrets = secrets();

    shop.register(customer_request("jane@clickshop.test"), &secrets)
        .unwrap();
    assert!(matches!(
        shop.register(customer_request("JANE@clickshop.test"), &secrets),
        Err(ShopError::EmailTaken)
    ));
}

#[test]
fn login_verifies_credentials_and_stamps_last_login() {
    let shop = shop();
    let secrets = secrets();
    let registered = shop
        .register(customer_request("jane@clickshop.test"), &secrets)
        .unwrap();

    assert!(matches!(
        shop.login("jane@clickshop.test", "wrong-password"),
        Err(ShopError::InvalidCredentials)
    ));
    assert!(matches!(
        shop.login("nobody@clickshop.test", "hunter22"),
        Err(ShopError::InvalidCredentials)
    ));

    let logged_in = shop.login("Jane@clickshop.test", "hunter22").unwrap();
    assert_eq!(logged_in.id, registered.id);
    assert!(logged_in.last_login >= registered.last_login);
}

#[test]
fn blocked_accounts_cannot_establish_a_session() {
    let shop = shop();
    let secrets = secrets();
    let user = shop
        .register(customer_request("jane@clickshop.test"), &secrets)
        .unwrap();

    shop.set_user_status(user.id, AccountStatus::Blocked).unwrap();
    assert!(matches!(
        shop.login("jane@clickshop.test", "hunter22"),
        Err(ShopError::AccountBlocked)
    ));

    shop.set_user_status(user.id, AccountStatus::Active).unwrap();
    assert!(shop.login("jane@clickshop.test", "hunter22").is_ok());
}

#[test]
fn registration_validates_its_fields() {
    let shop = shop();
    let secrets = secrets();

    let mut bad_email = customer_request("not-an-email");
    bad_email.email = "not-an-email".into();
    assert!(matches!(
        shop.register(bad_email, &secrets),
        Err(ShopError::Validation(_))
    ));

    let mut short_password = customer_request("jane@clickshop.test");
    short_password.password = "12345".into();
    assert!(matches!(
        shop.register(short_password, &secrets),
        Err(ShopError::Validation(_))
    ));

    assert!(shop.users().is_empty());
}

// --- favorites ---

#[test]
fn favorites_toggle_round_trips_for_customers() {
    let shop = shop();
    let product = seed_product(&shop, "Charm Bracelet", 18, 9);
    let customer = bare_user(Role::Customer);

    let favorites = shop.toggle_favorite(&customer, product.id).unwrap();
    assert_eq!(favorites, vec![product.id]);

    let favorites = shop.toggle_favorite(&customer, product.id).unwrap();
    assert!(favorites.is_empty());
}

#[test]
fn favorites_toggle_is_a_noop_for_staff() {
    let shop = shop();
    let product = seed_product(&shop, "Charm Bracelet", 18, 9);
    let clerk = bare_user(Role::Employee);

    let favorites = shop.toggle_favorite(&clerk, product.id).unwrap();
    assert!(favorites.is_empty());
    assert!(shop.favorites(clerk.id).is_empty());
}

// --- support tickets ---

#[test]
fn tickets_accumulate_per_user_and_start_pending() {
    let shop = shop();
    let user_id = Uuid::new_v4();

    assert!(matches!(
        shop.submit_ticket(
            user_id,
            TicketRequest {
                reason: TicketReason::Complaint,
                message: "   ".into(),
            }
        ),
        Err(ShopError::Validation(_))
    ));

    let ticket = shop
        .submit_ticket(
            user_id,
            TicketRequest {
                reason: TicketReason::Question,
                message: "Where is my order?".into(),
            },
        )
        .unwrap();
    assert_eq!(ticket.status, TicketStatus::Pending);

    let history = shop.tickets(user_id);
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].reason, TicketReason::Question);
    assert!(shop.tickets(Uuid::new_v4()).is_empty());
}

// --- persistence ---

#[test]
fn corrupt_sections_are_reported_and_start_empty() {
    let store = MemoryStore::new();
    store.write(keys::PRODUCTS, "{definitely not json").unwrap();
    store.write(keys::OFFERS, "[]").unwrap();

    let shop = Shop::open(store).unwrap();
    let report = shop.load_report();
    assert!(!report.is_clean());
    assert_eq!(report.corrupt_keys, vec![keys::PRODUCTS.to_string()]);
    assert!(shop.catalog().is_empty());
}

#[test]
fn state_survives_a_reopen_from_disk() {
    let dir = tempfile::tempdir().unwrap();

    let product_id = {
        let shop = Shop::open(FileStore::open(dir.path()).unwrap()).unwrap();
        let product = seed_product(&shop, "Persisted Dress", 22, 7);
        shop.register(customer_request("jane@clickshop.test"), &secrets())
            .unwrap();
        shop.record_catalog_visit().unwrap();

        let clerk = Uuid::new_v4();
        shop.add_to_cart(clerk, product.id).unwrap();
        shop.checkout(clerk, checkout_cash()).unwrap();
        product.id
    };

    let reopened = Shop::open(FileStore::open(dir.path()).unwrap()).unwrap();
    assert!(reopened.load_report().is_clean());
    assert_eq!(stock_of(&reopened, product_id), 6);
    assert_eq!(reopened.invoices().len(), 1);
    assert_eq!(reopened.catalog_visits(), 1);
    assert!(reopened.login("jane@clickshop.test", "hunter22").is_ok());
    assert_eq!(reopened.invoices()[0].status, InvoiceStatus::Paid);
}
