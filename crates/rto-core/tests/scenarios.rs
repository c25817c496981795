//! Named pricing scenarios from the storefront, checked end to end through
//! `PricingEngine`.

use rstest::rstest;
use rto_core::cart::parse_stored_cart;
use rto_core::{
    CoreError, LineItem, Money, PricingConfig, PricingEngine, RentalContract, ValidationError,
};

fn engine() -> PricingEngine {
    PricingEngine::new(PricingConfig::default()).unwrap()
}

// =============================================================================
// Rate Calculator
// =============================================================================

#[rstest]
#[case(120000, 3, 42000)]
#[case(120000, 6, 22000)]
#[case(120000, 12, 11500)]
#[case(120000, 15, 9600)]
#[case(120000, 24, 6000)]
#[case(59999, 12, 5750)]
fn monthly_rate_by_term(#[case] price: i64, #[case] term: u32, #[case] expected: i64) {
    let rate = engine().monthly_rate(Money::from_cents(price), term).unwrap();
    assert_eq!(rate.cents(), expected);
}

#[rstest]
#[case(0, 12)]
#[case(-100, 12)]
#[case(120000, 0)]
#[case(120000, 2)]
#[case(120000, 25)]
fn monthly_rate_rejects(#[case] price: i64, #[case] term: u32) {
    let result = engine().monthly_rate(Money::from_cents(price), term);
    assert!(matches!(result, Err(CoreError::InvalidArgument(_))));
}

#[rstest]
fn quote_matches_calculator_display() {
    let quote = engine().quote(Money::from_cents(120000), 12).unwrap();
    assert_eq!(quote.total_cost.to_string(), "$1380.00");
    assert_eq!(quote.premium.to_string(), "$180.00");
    assert_eq!(quote.premium_percent_label(), "15.0%");
    assert_eq!(quote.buyout_checkpoints.len(), 3);
}

// =============================================================================
// Schedule Projector
// =============================================================================

#[rstest]
#[case(0, 138000)]
#[case(6, 69000)]
#[case(11, 11500)]
#[case(12, 0)]
#[case(13, 0)]
fn buyout_amount_over_schedule(#[case] elapsed: i64, #[case] expected: i64) {
    let owed = engine()
        .buyout_amount(Money::from_cents(120000), Money::from_cents(11500), 12, elapsed)
        .unwrap();
    assert_eq!(owed.cents(), expected);
}

#[rstest]
fn early_buyout_at_default_discount() {
    let price = engine().early_buyout_price(Money::from_cents(69000)).unwrap();
    assert_eq!(price.to_string(), "$621.00");
}

#[rstest]
fn negative_elapsed_months_rejected() {
    let err = engine()
        .buyout_amount(Money::from_cents(120000), Money::from_cents(11500), 12, -1)
        .unwrap_err();
    assert!(matches!(
        err,
        CoreError::InvalidArgument(ValidationError::Negative { .. })
    ));
}

#[rstest]
fn completed_contract_rejects_payment() {
    let mut contract =
        RentalContract::new(Money::from_cents(30000), Money::from_cents(10500), 3).unwrap();
    for _ in 0..3 {
        contract.record_payment().unwrap();
    }
    assert!(contract.record_payment().is_err());
    assert_eq!(contract.progress_percent(), 100);
}

// =============================================================================
// Cart Aggregator
// =============================================================================

#[rstest]
fn mixed_cart_scenario() {
    let items = vec![
        LineItem::purchase(1, "Laptop", Money::from_cents(25000), 2).unwrap(),
        LineItem::rental(2, "Monitor", Money::from_cents(5000), 12, 1).unwrap(),
    ];
    let totals = engine().cart_totals(&items).unwrap();
    assert_eq!(totals.subtotal.cents(), 55000);
    assert_eq!(totals.shipping_cost.cents(), 0);
    assert_eq!(totals.tax_amount.cents(), 4538);
    assert_eq!(totals.grand_total.cents(), 59538);
}

#[rstest]
#[case(50000, 999)]
#[case(50001, 0)]
#[case(49999, 999)]
fn shipping_threshold(#[case] subtotal: i64, #[case] shipping: i64) {
    let items = vec![LineItem::purchase(1, "Item", Money::from_cents(subtotal), 1).unwrap()];
    let totals = engine().cart_totals(&items).unwrap();
    assert_eq!(totals.shipping_cost.cents(), shipping);
}

#[rstest]
fn stored_cart_to_order() {
    let json = r#"[
        {"product_id": 1, "purchase_type": "purchase", "price": 250.0, "quantity": 2},
        {"product_id": 2, "purchase_type": "rental", "rental_price": 50, "rental_term": 12, "quantity": 1}
    ]"#;
    let items = parse_stored_cart(json).unwrap();
    let order = engine().order_request(&items).unwrap();

    let body = serde_json::to_value(&order).unwrap();
    assert_eq!(body["tax_amount"], "45.38");
    assert_eq!(body["shipping_cost"], "0.00");
    assert_eq!(body["items"][1]["rental_term_months"], 12);
}
