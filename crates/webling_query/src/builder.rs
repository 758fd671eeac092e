//! Fluent query builder.

use crate::error::QueryResult;
use crate::parameter::{Comparator, Condition, Operand, Parameter};
use crate::query::{Joiner, Node, Query};

/// Fluent builder for filter queries.
///
/// The builder always points at one group: the root, or the innermost group
/// opened with [`and_group`](Self::and_group) / [`or_group`](Self::or_group).
/// Closing a condition returns the builder positioned on that same group;
/// [`end`](Self::end) closes the current group and moves back to its parent.
///
/// ```
/// use webling_query::QueryBuilder;
///
/// let filter = QueryBuilder::new()
///     .property("Name")
///     .filter("Ma")
///     .and_group()
///         .property("age")
///         .is_greater_than(18)
///         .or("status")
///         .is_equal_to("active")
///     .end()
///     .build()
///     .unwrap();
///
/// assert_eq!(
///     filter,
///     "Name FILTER \"Ma\" AND (age > \"18\" OR status = \"active\")"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    root: Query,
    /// Groups opened but not yet closed, innermost last.
    open: Vec<(Joiner, Query)>,
}

impl QueryBuilder {
    /// Creates a builder positioned on an empty root group.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a condition on a property of the current group.
    ///
    /// Joined with `AND` when it is not the first child.
    pub fn property(self, property: impl Into<String>) -> ConditionBuilder {
        self.condition(Joiner::And, property)
    }

    /// Starts a condition joined to the previous child with `AND`.
    pub fn and(self, property: impl Into<String>) -> ConditionBuilder {
        self.condition(Joiner::And, property)
    }

    /// Starts a condition joined to the previous child with `OR`.
    pub fn or(self, property: impl Into<String>) -> ConditionBuilder {
        self.condition(Joiner::Or, property)
    }

    /// Opens a nested group joined with `AND` and moves into it.
    pub fn and_group(self) -> Self {
        self.group(Joiner::And)
    }

    /// Opens a nested group joined with `OR` and moves into it.
    pub fn or_group(self) -> Self {
        self.group(Joiner::Or)
    }

    /// Closes the current group and moves back to its parent.
    ///
    /// At the root this does nothing.
    pub fn end(mut self) -> Self {
        if let Some((joiner, group)) = self.open.pop() {
            self.current().push(joiner, Node::Group(group));
        }
        self
    }

    /// Returns how many groups are open below the root.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Closes all open groups and returns the root group.
    pub fn into_query(mut self) -> Query {
        while !self.open.is_empty() {
            self = self.end();
        }
        self.root
    }

    /// Renders the query, closing any groups still open.
    ///
    /// # Errors
    ///
    /// Conditions added through the builder are always complete, so this
    /// only fails for parameters added through [`QueryBuilder::push`].
    pub fn build(&self) -> QueryResult<String> {
        self.clone().into_query().build()
    }

    /// Appends a prepared parameter to the current group.
    pub fn push(mut self, joiner: Joiner, parameter: Parameter) -> Self {
        self.current().push(joiner, Node::Parameter(parameter));
        self
    }

    fn condition(self, joiner: Joiner, property: impl Into<String>) -> ConditionBuilder {
        ConditionBuilder {
            builder: self,
            joiner,
            property: property.into(),
            negated: false,
        }
    }

    fn group(mut self, joiner: Joiner) -> Self {
        self.open.push((joiner, Query::new()));
        self
    }

    fn current(&mut self) -> &mut Query {
        match self.open.last_mut() {
            Some((_, group)) => group,
            None => &mut self.root,
        }
    }
}

impl From<QueryBuilder> for Query {
    fn from(builder: QueryBuilder) -> Self {
        builder.into_query()
    }
}

/// A pending condition on one property.
///
/// Every comparator consumes the condition builder, adds the finished
/// [`Parameter`] to the group it was started in, and hands back the
/// [`QueryBuilder`], so a condition can only be set once.
#[derive(Debug, Clone)]
#[must_use = "a condition is only added once a comparator is called"]
pub struct ConditionBuilder {
    builder: QueryBuilder,
    joiner: Joiner,
    property: String,
    negated: bool,
}

impl ConditionBuilder {
    /// Inverts the condition.
    pub fn not(mut self) -> Self {
        self.negated = true;
        self
    }

    /// Property is less than the operand.
    pub fn is_less_than(self, operand: impl Into<Operand>) -> QueryBuilder {
        self.compare(Comparator::LessThan, operand)
    }

    /// Property is less than or equal to the operand.
    pub fn is_less_or_equal_than(self, operand: impl Into<Operand>) -> QueryBuilder {
        self.compare(Comparator::LessOrEqual, operand)
    }

    /// Property is greater than the operand.
    pub fn is_greater_than(self, operand: impl Into<Operand>) -> QueryBuilder {
        self.compare(Comparator::GreaterThan, operand)
    }

    /// Property is greater than or equal to the operand.
    pub fn is_greater_or_equal_than(self, operand: impl Into<Operand>) -> QueryBuilder {
        self.compare(Comparator::GreaterOrEqual, operand)
    }

    /// Property is equal to the operand.
    pub fn is_equal_to(self, operand: impl Into<Operand>) -> QueryBuilder {
        self.compare(Comparator::Equal, operand)
    }

    /// Property is not equal to the operand.
    pub fn is_not_equal_to(self, operand: impl Into<Operand>) -> QueryBuilder {
        self.compare(Comparator::NotEqual, operand)
    }

    /// Property is empty.
    pub fn is_empty(self) -> QueryBuilder {
        self.close(Condition::IsEmpty)
    }

    /// Property value is one of the given options.
    pub fn is_in<I, V>(self, values: I) -> QueryBuilder
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.close(Condition::In(values.into_iter().map(Into::into).collect()))
    }

    /// Property starts with the given value.
    pub fn filter(self, prefix: impl Into<String>) -> QueryBuilder {
        self.close(Condition::Filter(prefix.into()))
    }

    /// Property contains the given value.
    pub fn contains(self, part: impl Into<String>) -> QueryBuilder {
        self.close(Condition::Contains(part.into()))
    }

    fn compare(self, op: Comparator, operand: impl Into<Operand>) -> QueryBuilder {
        self.close(Condition::Compare(op, operand.into()))
    }

    fn close(self, condition: Condition) -> QueryBuilder {
        let parameter = Parameter::with_condition(self.property, self.negated, condition);
        self.builder.push(self.joiner, parameter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QueryError;

    #[test]
    fn empty_builder() {
        assert_eq!(QueryBuilder::new().build().unwrap(), "");
        assert!(QueryBuilder::new().into_query().is_empty());
    }

    #[test]
    fn flat_chain() {
        let filter = QueryBuilder::new()
            .property("A")
            .is_equal_to("1")
            .and("B")
            .is_equal_to("2")
            .or("first name")
            .is_empty()
            .build()
            .unwrap();

        assert_eq!(filter, "A = \"1\" AND B = \"2\" OR `first name` IS EMPTY");
    }

    #[test]
    fn negated_condition() {
        let filter = QueryBuilder::new()
            .property("status")
            .not()
            .is_in(["a", "b"])
            .build()
            .unwrap();

        assert_eq!(filter, "NOT (status IN (\"a\", \"b\"))");
    }

    #[test]
    fn nested_groups_and_end() {
        let builder = QueryBuilder::new()
            .property("A")
            .is_equal_to("1")
            .or_group()
            .property("B")
            .is_equal_to("2")
            .and_group()
            .property("C")
            .contains("x")
            .or("D")
            .filter("y");

        assert_eq!(builder.depth(), 2);

        let filter = builder
            .end()
            .end()
            .and("E")
            .is_not_equal_to("5")
            .build()
            .unwrap();

        assert_eq!(
            filter,
            "A = \"1\" OR (B = \"2\" AND (C CONTAINS \"x\" OR D FILTER \"y\")) AND E != \"5\""
        );
    }

    #[test]
    fn end_at_root_is_noop() {
        let filter = QueryBuilder::new()
            .end()
            .property("A")
            .is_empty()
            .end()
            .build()
            .unwrap();
        assert_eq!(filter, "A IS EMPTY");
    }

    #[test]
    fn unclosed_groups_are_closed_on_build() {
        let builder = QueryBuilder::new()
            .property("A")
            .is_equal_to("1")
            .and_group()
            .property("B")
            .is_equal_to("2")
            .or("C")
            .is_equal_to("3");

        assert_eq!(
            builder.build().unwrap(),
            "A = \"1\" AND (B = \"2\" OR C = \"3\")"
        );
        // Building does not consume the builder.
        assert_eq!(builder.depth(), 1);
    }

    #[test]
    fn property_comparison() {
        let other = Parameter::new("lastname");
        let filter = QueryBuilder::new()
            .property("firstname")
            .is_not_equal_to(&other)
            .build()
            .unwrap();
        assert_eq!(filter, "firstname != lastname");
    }

    #[test]
    fn pushed_incomplete_parameter_fails() {
        let result = QueryBuilder::new()
            .push(Joiner::And, Parameter::new("orphan"))
            .build();
        assert_eq!(result.unwrap_err(), QueryError::missing("orphan"));
    }
}
