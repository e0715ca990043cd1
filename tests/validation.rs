use online_store_api::{
    dto::orders::CreateOrderRequest,
    routes::params::Pagination,
    services::{auth_service::validate_registration, order_service::validate_shipping},
};

fn shipping(
    first_name: &str,
    last_name: &str,
    city: &str,
    country: &str,
    address_details: &str,
) -> CreateOrderRequest {
    CreateOrderRequest {
        first_name: first_name.into(),
        last_name: last_name.into(),
        city: city.into(),
        country: country.into(),
        address_details: address_details.into(),
    }
}

#[test]
fn complete_shipping_fields_pass() {
    let errors = validate_shipping(&shipping("Ada", "Lovelace", "London", "UK", "12 Main St"));
    assert!(errors.is_empty());
}

#[test]
fn each_blank_shipping_field_is_reported() {
    let cases = [
        ("first_name", shipping("", "Lovelace", "London", "UK", "12 Main St")),
        ("last_name", shipping("Ada", "", "London", "UK", "12 Main St")),
        ("city", shipping("Ada", "Lovelace", "", "UK", "12 Main St")),
        ("country", shipping("Ada", "Lovelace", "London", "", "12 Main St")),
        ("address_details", shipping("Ada", "Lovelace", "London", "UK", "")),
    ];

    for (field, payload) in cases {
        let errors = validate_shipping(&payload);
        assert_eq!(errors.len(), 1, "expected exactly one error for {field}");
        assert!(errors.contains_key(field), "expected error on {field}");
    }
}

#[test]
fn all_blank_shipping_fields_are_reported_together() {
    let errors = validate_shipping(&shipping("", "", "", "", ""));
    assert_eq!(errors.len(), 5);
    for field in ["first_name", "last_name", "city", "country", "address_details"] {
        assert!(errors.contains_key(field), "missing error for {field}");
    }
}

#[test]
fn whitespace_only_shipping_fields_count_as_blank() {
    let errors = validate_shipping(&shipping("  ", "Lovelace", "London", "UK", "12 Main St"));
    assert!(errors.contains_key("first_name"));
}

#[test]
fn registration_requires_all_fields() {
    let errors = validate_registration("", "", "", "");
    for field in ["email", "password", "first_name", "last_name"] {
        assert!(errors.contains_key(field), "missing error for {field}");
    }
}

#[test]
fn registration_rejects_malformed_email() {
    let errors = validate_registration("not-an-email", "secret", "Ada", "Lovelace");
    assert_eq!(errors.len(), 1);
    assert!(errors.contains_key("email"));
}

#[test]
fn registration_accepts_valid_input() {
    let errors = validate_registration("ada@example.com", "secret", "Ada", "Lovelace");
    assert!(errors.is_empty());
}

#[test]
fn pagination_normalizes_defaults_and_bounds() {
    let (page, per_page, offset) = Pagination {
        page: None,
        per_page: None,
    }
    .normalize();
    assert_eq!((page, per_page, offset), (1, 20, 0));

    let (page, per_page, offset) = Pagination {
        page: Some(3),
        per_page: Some(10),
    }
    .normalize();
    assert_eq!((page, per_page, offset), (3, 10, 20));

    let (page, per_page, _) = Pagination {
        page: Some(-1),
        per_page: Some(1000),
    }
    .normalize();
    assert_eq!(page, 1);
    assert_eq!(per_page, 100);
}
