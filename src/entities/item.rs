//! The item record and its rule table

use crate::core::binding::{DataBinder, FromForm};
use crate::core::entity::Bindable;
use crate::core::field::{FieldType, FieldValue};
use crate::core::validation::rules::{FieldConstraint, ObjectConstraint, Rule, RuleGroup, RuleSet};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const FIELDS: &[&str] = &["id", "itemName", "price", "quantity"];

/// An item as submitted through the add and edit forms
///
/// Every field may be unset after binding; the invariants (non-blank name,
/// price range, quantity cap, minimum total) are enforced by validation,
/// not by the type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Assigned by the repository on save
    pub id: Option<Uuid>,
    pub item_name: Option<String>,
    pub price: Option<i32>,
    pub quantity: Option<i32>,
}

impl Item {
    pub const OBJECT_NAME: &'static str = "item";

    pub const MIN_PRICE: i64 = 1_000;
    pub const MAX_PRICE: i64 = 1_000_000;
    pub const MAX_QUANTITY: i64 = 9_999;
    pub const MIN_TOTAL_PRICE: i64 = 10_000;

    pub fn new(item_name: impl Into<String>, price: i32, quantity: i32) -> Self {
        Self {
            id: None,
            item_name: Some(item_name.into()),
            price: Some(price),
            quantity: Some(quantity),
        }
    }

    /// `price * quantity`, when both are set
    pub fn total_price(&self) -> Option<i64> {
        Some(i64::from(self.price?) * i64::from(self.quantity?))
    }

    /// Declarative rules, in evaluation order
    pub fn rule_set() -> RuleSet {
        RuleSet::new(Self::OBJECT_NAME)
            .with_rule(Rule::field("itemName", FieldConstraint::NotBlank, "required"))
            .with_rule(Rule::field("price", FieldConstraint::NotNull, "required"))
            .with_rule(Rule::field(
                "price",
                FieldConstraint::Range {
                    min: Self::MIN_PRICE,
                    max: Self::MAX_PRICE,
                },
                "range",
            ))
            .with_rule(Rule::field("quantity", FieldConstraint::NotNull, "required"))
            .with_rule(
                Rule::field("quantity", FieldConstraint::Max(Self::MAX_QUANTITY), "max")
                    .in_groups(&[RuleGroup::Save]),
            )
            .with_rule(
                Rule::field("id", FieldConstraint::NotNull, "required")
                    .in_groups(&[RuleGroup::Update]),
            )
            .with_rule(Rule::object(
                ObjectConstraint::MinProduct {
                    left: "price",
                    right: "quantity",
                    min: Self::MIN_TOTAL_PRICE,
                },
                "totalPriceMin",
            ))
    }
}

impl Bindable for Item {
    fn object_name(&self) -> &'static str {
        Self::OBJECT_NAME
    }

    fn field_names(&self) -> &'static [&'static str] {
        FIELDS
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "id" => Some(self.id.into()),
            "itemName" => Some(self.item_name.clone().into()),
            "price" => Some(self.price.into()),
            "quantity" => Some(self.quantity.into()),
            _ => None,
        }
    }

    fn field_type(&self, field: &str) -> Option<FieldType> {
        match field {
            "id" => Some(FieldType::Uuid),
            "itemName" => Some(FieldType::String),
            "price" | "quantity" => Some(FieldType::Integer),
            _ => None,
        }
    }
}

impl FromForm for Item {
    fn bind(binder: &mut DataBinder<'_>) -> Self {
        Self {
            id: binder.uuid("id"),
            item_name: binder.text("itemName"),
            price: binder.integer("price"),
            quantity: binder.integer("quantity"),
        }
    }

    fn form_object_name() -> &'static str {
        Self::OBJECT_NAME
    }
}
