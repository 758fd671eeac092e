//! Boolean groups of query conditions.

use crate::error::QueryResult;
use crate::parameter::Parameter;

/// Boolean keyword connecting a child to its previous sibling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Joiner {
    /// `AND`
    And,
    /// `OR`
    Or,
}

impl Joiner {
    /// Returns the keyword as written in a filter string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Joiner::And => "AND",
            Joiner::Or => "OR",
        }
    }
}

/// A child of a query group.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A single property condition.
    Parameter(Parameter),
    /// A nested group.
    Group(Query),
}

/// An ordered group of conditions and nested groups.
///
/// Each child stores the joiner that connects it to the previous child. The
/// filter language is a flat infix grammar, so nested groups are wrapped in
/// parentheses when rendered and precedence never depends on the server.
///
/// ```
/// use webling_query::{Parameter, Query};
///
/// let mut a = Parameter::new("A");
/// a.is_equal_to("1").unwrap();
/// let mut b = Parameter::new("B");
/// b.is_equal_to("2").unwrap();
///
/// let mut inner = Query::new();
/// inner.and(a).and(b);
///
/// let mut c = Parameter::new("C");
/// c.is_empty().unwrap();
///
/// let mut root = Query::new();
/// root.and(c).or_group(inner);
///
/// assert_eq!(root.build().unwrap(), "C IS EMPTY OR (A = \"1\" AND B = \"2\")");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    children: Vec<(Joiner, Node)>,
}

impl Query {
    /// Creates an empty group.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the group has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns the number of direct children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Iterates over the direct children with their joiners.
    pub fn children(&self) -> impl Iterator<Item = (Joiner, &Node)> {
        self.children.iter().map(|(joiner, node)| (*joiner, node))
    }

    /// Appends a child node.
    pub fn push(&mut self, joiner: Joiner, node: Node) -> &mut Self {
        self.children.push((joiner, node));
        self
    }

    /// Appends a condition joined with `AND`.
    pub fn and(&mut self, parameter: Parameter) -> &mut Self {
        self.push(Joiner::And, Node::Parameter(parameter))
    }

    /// Appends a condition joined with `OR`.
    pub fn or(&mut self, parameter: Parameter) -> &mut Self {
        self.push(Joiner::Or, Node::Parameter(parameter))
    }

    /// Appends a nested group joined with `AND`.
    pub fn and_group(&mut self, group: Query) -> &mut Self {
        self.push(Joiner::And, Node::Group(group))
    }

    /// Appends a nested group joined with `OR`.
    pub fn or_group(&mut self, group: Query) -> &mut Self {
        self.push(Joiner::Or, Node::Group(group))
    }

    /// Renders the group as a filter string.
    ///
    /// An empty group renders to the empty string.
    ///
    /// # Errors
    ///
    /// Returns [`crate::QueryError::ConditionMissing`] if any contained
    /// parameter has no condition.
    pub fn build(&self) -> QueryResult<String> {
        self.render().map(|(rendered, _)| rendered)
    }

    /// Renders children and returns the string with the count of rendered parts.
    fn render(&self) -> QueryResult<(String, usize)> {
        let mut out = String::new();
        let mut parts = 0;

        for (joiner, node) in &self.children {
            let rendered = match node {
                Node::Parameter(parameter) => parameter.build()?,
                Node::Group(group) => match group.render()? {
                    (_, 0) => continue,
                    (inner, 1) => inner,
                    (inner, _) => format!("({inner})"),
                },
            };

            if parts > 0 {
                out.push(' ');
                out.push_str(joiner.as_str());
                out.push(' ');
            }
            out.push_str(&rendered);
            parts += 1;
        }

        Ok((out, parts))
    }
}

impl From<Parameter> for Query {
    fn from(parameter: Parameter) -> Self {
        let mut query = Query::new();
        query.and(parameter);
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QueryError;

    fn eq(property: &str, value: &str) -> Parameter {
        let mut p = Parameter::new(property);
        p.is_equal_to(value).unwrap();
        p
    }

    #[test]
    fn empty_group_renders_empty() {
        assert_eq!(Query::new().build().unwrap(), "");
    }

    #[test]
    fn first_child_has_no_joiner() {
        let mut q = Query::new();
        q.or(eq("A", "1")).and(eq("B", "2")).or(eq("C", "3"));
        assert_eq!(q.build().unwrap(), "A = \"1\" AND B = \"2\" OR C = \"3\"");
    }

    #[test]
    fn nested_group_is_parenthesized() {
        let mut inner = Query::new();
        inner.and(eq("A", "1")).and(eq("B", "2"));

        let mut root = Query::new();
        root.and(eq("C", "3")).or_group(inner);

        assert_eq!(
            root.build().unwrap(),
            "C = \"3\" OR (A = \"1\" AND B = \"2\")"
        );
    }

    #[test]
    fn single_child_group_is_not_parenthesized() {
        let mut root = Query::new();
        root.and(eq("A", "1")).and_group(Query::from(eq("B", "2")));
        assert_eq!(root.build().unwrap(), "A = \"1\" AND B = \"2\"");
    }

    #[test]
    fn empty_nested_group_is_skipped() {
        let mut root = Query::new();
        root.and_group(Query::new()).or(eq("A", "1"));
        assert_eq!(root.build().unwrap(), "A = \"1\"");
    }

    #[test]
    fn missing_condition_propagates() {
        let mut root = Query::new();
        root.and(eq("A", "1")).and(Parameter::new("B"));
        assert_eq!(root.build().unwrap_err(), QueryError::missing("B"));
    }

    #[test]
    fn deep_nesting() {
        let mut deepest = Query::new();
        deepest.and(eq("C", "3")).or(eq("D", "4"));

        let mut middle = Query::new();
        middle.and(eq("B", "2")).and_group(deepest);

        let mut root = Query::new();
        root.and(eq("A", "1")).or_group(middle);

        assert_eq!(
            root.build().unwrap(),
            "A = \"1\" OR (B = \"2\" AND (C = \"3\" OR D = \"4\"))"
        );
    }
}
