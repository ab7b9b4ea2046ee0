//! DynamoDB expression builders.
//!
//! Pure functions rendering key conditions, filters and updates into expression
//! strings. Attribute names always go through `#name` placeholders since `name`
//! is a reserved word; values are bound as `:v0`, `:v1`, ...

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use inventory_core::query::{FilterCondition, KeyCondition, SortKeyCondition};
use inventory_core::storage::{Attr, ItemUpdate, Scalar};

use super::conversions::scalar_to_attribute;

/// Collects placeholder bindings while expressions are rendered.
#[derive(Debug, Default)]
pub struct ExpressionBuilder {
    names: HashMap<String, String>,
    values: HashMap<String, AttributeValue>,
}

impl ExpressionBuilder {
    fn name(&mut self, attr: Attr) -> String {
        let placeholder = format!("#{}", attr.as_str());
        self.names
            .insert(placeholder.clone(), attr.as_str().to_string());
        placeholder
    }

    fn value(&mut self, value: &Scalar) -> String {
        let placeholder = format!(":v{}", self.values.len());
        self.values
            .insert(placeholder.clone(), scalar_to_attribute(value));
        placeholder
    }

    /// Renders a key condition, e.g. `#static_pk = :v0 AND #price BETWEEN :v1 AND :v2`.
    pub fn key_condition(&mut self, condition: &KeyCondition) -> String {
        let partition = format!(
            "{} = {}",
            self.name(condition.partition_attr),
            self.value(&condition.partition_value)
        );
        match &condition.sort {
            None => partition,
            Some(SortKeyCondition::Equals { attr, value }) => {
                format!("{} AND {} = {}", partition, self.name(*attr), self.value(value))
            }
            Some(SortKeyCondition::Between { attr, low, high }) => format!(
                "{} AND {} BETWEEN {} AND {}",
                partition,
                self.name(*attr),
                self.value(low),
                self.value(high)
            ),
        }
    }

    /// Renders a filter condition.
    pub fn filter(&mut self, condition: &FilterCondition) -> String {
        match condition {
            FilterCondition::Between { attr, low, high } => format!(
                "{} BETWEEN {} AND {}",
                self.name(*attr),
                self.value(low),
                self.value(high)
            ),
        }
    }

    /// Renders a `SET` update; `set_if_absent` attributes use `if_not_exists`.
    pub fn update(&mut self, update: &ItemUpdate) -> String {
        let mut clauses = Vec::with_capacity(update.set.len() + update.set_if_absent.len());
        for (attr, value) in &update.set {
            clauses.push(format!("{} = {}", self.name(*attr), self.value(value)));
        }
        for (attr, value) in &update.set_if_absent {
            let name = self.name(*attr);
            clauses.push(format!(
                "{} = if_not_exists({}, {})",
                name,
                name,
                self.value(value)
            ));
        }
        format!("SET {}", clauses.join(", "))
    }

    /// Consumes the builder. Empty maps become None, the service rejects them.
    #[allow(clippy::type_complexity)]
    pub fn into_parts(
        self,
    ) -> (
        Option<HashMap<String, String>>,
        Option<HashMap<String, AttributeValue>>,
    ) {
        let names = (!self.names.is_empty()).then_some(self.names);
        let values = (!self.values.is_empty()).then_some(self.values);
        (names, values)
    }
}
