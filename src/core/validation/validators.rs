//! Validator contract and the hand-written item validator

use crate::core::field::format_thousands;
use crate::core::validation::result::ValidationResult;
use crate::core::validation::rules::RuleGroup;
use crate::entities::Item;

/// A validation strategy for records of type `T`
///
/// Validation runs in two phases, field rules then object rules, so that a
/// pipeline can observe the transition between them. Implementations write
/// into the accumulator and never modify the target; running them twice on
/// the same record with fresh accumulators yields the same errors.
pub trait Validator<T: ?Sized>: Send + Sync {
    /// Whether this validator handles objects with the given name
    fn supports(&self, object_name: &str) -> bool;

    /// Check single-field rules
    ///
    /// `group` restricts which rules apply. Validators without grouped
    /// rules ignore it.
    fn validate_fields(
        &self,
        target: &T,
        errors: &mut ValidationResult<'_>,
        group: Option<RuleGroup>,
    );

    /// Check cross-field rules
    fn validate_object(
        &self,
        target: &T,
        errors: &mut ValidationResult<'_>,
        group: Option<RuleGroup>,
    );

    /// Run both phases with the default rule group
    fn validate(&self, target: &T, errors: &mut ValidationResult<'_>) {
        self.validate_fields(target, errors, None);
        self.validate_object(target, errors, None);
    }
}

/// Imperative validator for [`Item`]
///
/// Raises the same codes as the declarative table but has no notion of
/// rule groups.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemValidator;

impl ItemValidator {
    pub fn new() -> Self {
        Self
    }
}

impl Validator<Item> for ItemValidator {
    fn supports(&self, object_name: &str) -> bool {
        object_name == Item::OBJECT_NAME
    }

    fn validate_fields(
        &self,
        item: &Item,
        errors: &mut ValidationResult<'_>,
        _group: Option<RuleGroup>,
    ) {
        if !errors.has_binding_failure("itemName")
            && item.item_name.as_deref().is_none_or(|n| n.trim().is_empty())
        {
            errors.reject_value("itemName", "required", vec![], None);
        }

        if !errors.has_binding_failure("price") {
            match item.price {
                None => errors.reject_value("price", "required", vec![], None),
                Some(price) if !(Item::MIN_PRICE..=Item::MAX_PRICE).contains(&i64::from(price)) => {
                    errors.reject_value(
                        "price",
                        "range",
                        vec![
                            format_thousands(Item::MIN_PRICE).into(),
                            format_thousands(Item::MAX_PRICE).into(),
                        ],
                        None,
                    );
                }
                Some(_) => {}
            }
        }

        if !errors.has_binding_failure("quantity") {
            match item.quantity {
                None => errors.reject_value("quantity", "required", vec![], None),
                Some(quantity) if i64::from(quantity) > Item::MAX_QUANTITY => {
                    errors.reject_value(
                        "quantity",
                        "max",
                        vec![format_thousands(Item::MAX_QUANTITY).into()],
                        None,
                    );
                }
                Some(_) => {}
            }
        }
    }

    fn validate_object(
        &self,
        item: &Item,
        errors: &mut ValidationResult<'_>,
        _group: Option<RuleGroup>,
    ) {
        if let Some(total) = item.total_price()
            && total < Item::MIN_TOTAL_PRICE
        {
            errors.reject(
                "totalPriceMin",
                vec![format_thousands(Item::MIN_TOTAL_PRICE).into(), total.into()],
                None,
            );
        }
    }
}
