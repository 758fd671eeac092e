//! Single-property query conditions.

use crate::error::{QueryError, QueryResult};
use std::borrow::Cow;

/// Binary comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparator {
    /// `<`
    LessThan,
    /// `<=`
    LessOrEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterOrEqual,
    /// `=`
    Equal,
    /// `!=`
    NotEqual,
}

impl Comparator {
    /// Returns the operator as written in a filter string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Comparator::LessThan => "<",
            Comparator::LessOrEqual => "<=",
            Comparator::GreaterThan => ">",
            Comparator::GreaterOrEqual => ">=",
            Comparator::Equal => "=",
            Comparator::NotEqual => "!=",
        }
    }
}

/// Right-hand side of a comparison.
///
/// A `Value` is a literal and is rendered double-quoted. A `Property` refers
/// to another property of the same entity and is rendered as a property name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operand {
    /// A literal value.
    Value(String),
    /// A reference to another property.
    Property(String),
}

impl Operand {
    /// Creates a literal operand.
    pub fn value(value: impl Into<String>) -> Self {
        Self::Value(value.into())
    }

    /// Creates a property reference operand.
    pub fn property(name: impl Into<String>) -> Self {
        Self::Property(name.into())
    }

    fn render(&self) -> String {
        match self {
            Operand::Value(value) => escape_value(value),
            Operand::Property(name) => escape_property(name).into_owned(),
        }
    }
}

impl From<&str> for Operand {
    fn from(value: &str) -> Self {
        Self::Value(value.to_string())
    }
}

impl From<String> for Operand {
    fn from(value: String) -> Self {
        Self::Value(value)
    }
}

impl From<&String> for Operand {
    fn from(value: &String) -> Self {
        Self::Value(value.clone())
    }
}

impl From<&Parameter> for Operand {
    fn from(parameter: &Parameter) -> Self {
        Self::Property(parameter.property().to_string())
    }
}

macro_rules! operand_from_display {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Operand {
                fn from(value: $ty) -> Self {
                    Self::Value(value.to_string())
                }
            }
        )*
    };
}

operand_from_display!(i32, i64, u32, u64, usize, f64, bool, char);

/// The condition a parameter applies to its property.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Binary comparison against a literal or another property.
    Compare(Comparator, Operand),
    /// Property has no value.
    IsEmpty,
    /// Property equals one of the given values.
    In(Vec<String>),
    /// Property starts with the given value.
    Filter(String),
    /// Property contains the given value.
    Contains(String),
}

impl Condition {
    fn render(&self, property: &str) -> String {
        let property = escape_property(property);
        match self {
            Condition::Compare(op, operand) => {
                format!("{} {} {}", property, op.as_str(), operand.render())
            }
            Condition::IsEmpty => format!("{property} IS EMPTY"),
            Condition::In(values) => {
                let list: Vec<String> = values.iter().map(|v| escape_value(v)).collect();
                format!("{} IN ({})", property, list.join(", "))
            }
            Condition::Filter(prefix) => format!("{} FILTER {}", property, escape_value(prefix)),
            Condition::Contains(part) => format!("{} CONTAINS {}", property, escape_value(part)),
        }
    }
}

/// A condition on one named property, optionally negated.
///
/// The condition can be set exactly once. Negation is applied when the
/// parameter is rendered, so `not()` may be called before or after the
/// comparator and calling it repeatedly has no further effect.
///
/// ```
/// use webling_query::Parameter;
///
/// let mut age = Parameter::new("age");
/// age.not().is_less_than(18).unwrap();
/// assert_eq!(age.build().unwrap(), "NOT (age < \"18\")");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    property: String,
    negated: bool,
    condition: Option<Condition>,
}

impl Parameter {
    /// Creates a parameter for the given property with no condition.
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            negated: false,
            condition: None,
        }
    }

    pub(crate) fn with_condition(property: String, negated: bool, condition: Condition) -> Self {
        Self {
            property,
            negated,
            condition: Some(condition),
        }
    }

    /// Returns the property name.
    pub fn property(&self) -> &str {
        &self.property
    }

    /// Returns true if the condition is negated.
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Returns the condition, if one has been set.
    pub fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
    }

    /// Inverts the condition to match what does NOT satisfy it.
    pub fn not(&mut self) -> &mut Self {
        self.negated = true;
        self
    }

    /// Property is less than the operand.
    pub fn is_less_than(&mut self, operand: impl Into<Operand>) -> QueryResult<&mut Self> {
        self.set(Condition::Compare(Comparator::LessThan, operand.into()))
    }

    /// Property is less than or equal to the operand.
    pub fn is_less_or_equal_than(&mut self, operand: impl Into<Operand>) -> QueryResult<&mut Self> {
        self.set(Condition::Compare(Comparator::LessOrEqual, operand.into()))
    }

    /// Property is greater than the operand.
    pub fn is_greater_than(&mut self, operand: impl Into<Operand>) -> QueryResult<&mut Self> {
        self.set(Condition::Compare(Comparator::GreaterThan, operand.into()))
    }

    /// Property is greater than or equal to the operand.
    pub fn is_greater_or_equal_than(
        &mut self,
        operand: impl Into<Operand>,
    ) -> QueryResult<&mut Self> {
        self.set(Condition::Compare(Comparator::GreaterOrEqual, operand.into()))
    }

    /// Property is equal to the operand.
    pub fn is_equal_to(&mut self, operand: impl Into<Operand>) -> QueryResult<&mut Self> {
        self.set(Condition::Compare(Comparator::Equal, operand.into()))
    }

    /// Property is not equal to the operand.
    pub fn is_not_equal_to(&mut self, operand: impl Into<Operand>) -> QueryResult<&mut Self> {
        self.set(Condition::Compare(Comparator::NotEqual, operand.into()))
    }

    /// Property is empty.
    pub fn is_empty(&mut self) -> QueryResult<&mut Self> {
        self.set(Condition::IsEmpty)
    }

    /// Property value is one of the given options.
    pub fn is_in<I, V>(&mut self, values: I) -> QueryResult<&mut Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.set(Condition::In(values.into_iter().map(Into::into).collect()))
    }

    /// Property starts with the given value.
    pub fn filter(&mut self, prefix: impl Into<String>) -> QueryResult<&mut Self> {
        self.set(Condition::Filter(prefix.into()))
    }

    /// Property contains the given value.
    pub fn contains(&mut self, part: impl Into<String>) -> QueryResult<&mut Self> {
        self.set(Condition::Contains(part.into()))
    }

    /// Sets the condition.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::ConditionAlreadySet`] if a condition exists.
    pub fn set(&mut self, condition: Condition) -> QueryResult<&mut Self> {
        if self.condition.is_some() {
            return Err(QueryError::already_set(&self.property));
        }
        self.condition = Some(condition);
        Ok(self)
    }

    /// Renders the condition as a filter string.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::ConditionMissing`] if no condition was set.
    pub fn build(&self) -> QueryResult<String> {
        let condition = self
            .condition
            .as_ref()
            .ok_or_else(|| QueryError::missing(&self.property))?;

        let rendered = condition.render(&self.property);
        if self.negated {
            Ok(format!("NOT ({rendered})"))
        } else {
            Ok(rendered)
        }
    }
}

/// Escapes a property name for use in a filter or sort string.
///
/// Names made only of ASCII letters, digits, `,` and `*` are returned as-is,
/// everything else is wrapped in back-ticks.
pub fn escape_property(name: &str) -> Cow<'_, str> {
    let bare = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == ',' || c == '*');

    if bare {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(format!("`{name}`"))
    }
}

/// Quotes a literal value.
///
/// Every `\` becomes `\\` and every `"` becomes `\"`, so a value cannot
/// close the quoted literal early. Values are never passed through
/// unescaped; callers must not escape them beforehand.
///
/// ```
/// use webling_query::escape_value;
///
/// assert_eq!(escape_value("Bern"), r#""Bern""#);
/// assert_eq!(escape_value(r#"6" Nagel"#), r#""6\" Nagel""#);
/// assert_eq!(escape_value(r"C:\x"), r#""C:\\x""#);
/// ```
pub fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}
