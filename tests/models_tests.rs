// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use budgetr::error::EditError;
use budgetr::models::{DeleteRequest, Field, Transaction};
use serde_json::json;

#[test]
fn wire_format_round_trips() {
    let tx = Transaction::new("7/20/25", "Paycheck", 1234.56, "Income");
    let wire = serde_json::to_string(&tx).unwrap();
    let back: Transaction = serde_json::from_str(&wire).unwrap();
    assert_eq!(back, tx);

    let v: serde_json::Value = serde_json::from_str(&wire).unwrap();
    assert_eq!(v["amount"], json!(1234.56));
    assert_eq!(v["date"], json!("7/20/25"));
    assert_eq!(v.as_object().unwrap().len(), 5);
}

#[test]
fn delete_body_carries_only_the_id() {
    let body = serde_json::to_value(DeleteRequest { id: "ABC" }).unwrap();
    assert_eq!(body, json!({"id": "ABC"}));
}

#[test]
fn new_ids_are_unique_uppercase_uuids() {
    let a = Transaction::new("", "", 0.0, "");
    let b = Transaction::new("", "", 0.0, "");
    assert_ne!(a.id, b.id);
    assert_eq!(a.id.len(), 36);
    assert_eq!(a.id, a.id.to_uppercase());
    assert_eq!(a.id.matches('-').count(), 4);
}

#[test]
fn amount_text_always_has_a_fraction() {
    let mut tx = Transaction::new("", "", -3.0, "");
    assert_eq!(tx.amount_text(), "-3.0");
    tx.amount = 12.5;
    assert_eq!(tx.amount_text(), "12.5");
}

#[test]
fn amount_text_uses_signed_two_digit_exponents() {
    let mut tx = Transaction::new("", "", 1e16, "");
    assert_eq!(tx.amount_text(), "1e+16");
    tx.amount = -1.5e-5;
    assert_eq!(tx.amount_text(), "-1.5e-05");
    tx.amount = 2.5e120;
    assert_eq!(tx.amount_text(), "2.5e+120");
    tx.amount = 0.0001;
    assert_eq!(tx.amount_text(), "0.0001");
}

#[test]
fn apply_updates_the_named_field() {
    let mut tx = Transaction::new("2024-01-01", "Tea", -2.0, "Food");
    tx.apply(Field::Description, "Green tea").unwrap();
    tx.apply(Field::Amount, " -2.75 ").unwrap();
    tx.apply(Field::Category, "Drinks").unwrap();
    tx.apply(Field::Date, "2024-01-02").unwrap();
    assert_eq!(tx.description, "Green tea");
    assert_eq!(tx.amount, -2.75);
    assert_eq!(tx.category, "Drinks");
    assert_eq!(tx.date, "2024-01-02");
}

#[test]
fn bad_amount_leaves_record_untouched() {
    let mut tx = Transaction::new("2024-01-01", "Tea", -2.0, "Food");
    let before = tx.clone();
    assert_eq!(
        tx.apply(Field::Amount, "2,50"),
        Err(EditError::InvalidAmount("2,50".into()))
    );
    assert_eq!(tx, before);
}

#[test]
fn field_names_parse_case_insensitively() {
    assert_eq!("Amount".parse::<Field>().unwrap(), Field::Amount);
    assert_eq!("desc".parse::<Field>().unwrap(), Field::Description);
    assert_eq!(
        "id".parse::<Field>(),
        Err(EditError::UnknownField("id".into()))
    );
    assert_eq!(Field::Category.to_string(), "category");
}
