//! Property-based tests for filter rendering.

use proptest::prelude::*;
use webling_query::{
    escape_property, Comparator, Condition, Parameter, Query, QueryBuilder, QueryError,
};

fn bare_property() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Za-z0-9,*]{1,16}").expect("Invalid regex")
}

fn quoted_property() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z]{1,8}[ .\\-][a-z]{1,8}").expect("Invalid regex")
}

fn any_property() -> impl Strategy<Value = String> {
    prop_oneof![bare_property(), quoted_property()]
}

fn value() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9 _-]{0,16}").expect("Invalid regex")
}

fn comparator() -> impl Strategy<Value = Comparator> {
    prop::sample::select(vec![
        Comparator::LessThan,
        Comparator::LessOrEqual,
        Comparator::GreaterThan,
        Comparator::GreaterOrEqual,
        Comparator::Equal,
        Comparator::NotEqual,
    ])
}

fn condition() -> impl Strategy<Value = Condition> {
    prop_oneof![
        (comparator(), value()).prop_map(|(op, v)| Condition::Compare(op, v.into())),
        Just(Condition::IsEmpty),
        prop::collection::vec(value(), 1..4).prop_map(Condition::In),
        value().prop_map(Condition::Filter),
        value().prop_map(Condition::Contains),
    ]
}

fn parameter() -> impl Strategy<Value = Parameter> {
    (any_property(), condition(), any::<bool>()).prop_map(|(property, condition, negated)| {
        let mut p = Parameter::new(property);
        if negated {
            p.not();
        }
        p.set(condition).expect("fresh parameter");
        p
    })
}

proptest! {
    #[test]
    fn rendering_is_deterministic(param in parameter()) {
        let first = param.build().unwrap();
        let second = param.build().unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn second_condition_always_fails(param in parameter(), other in condition()) {
        let mut param = param;
        let property = param.property().to_string();
        let before = param.build().unwrap();

        let err = param.set(other).unwrap_err();
        prop_assert_eq!(err, QueryError::ConditionAlreadySet { property });
        prop_assert_eq!(param.build().unwrap(), before);
    }

    #[test]
    fn negation_wraps_inner_condition(
        property in any_property(),
        condition in condition(),
        times in 1usize..4,
    ) {
        let mut plain = Parameter::new(property.clone());
        plain.set(condition.clone()).unwrap();
        let inner = plain.build().unwrap();

        let mut negated = Parameter::new(property);
        for _ in 0..times {
            negated.not();
        }
        negated.set(condition).unwrap();

        prop_assert_eq!(negated.build().unwrap(), format!("NOT ({inner})"));
    }

    #[test]
    fn bare_properties_are_not_quoted(property in bare_property()) {
        prop_assert_eq!(escape_property(&property), property.as_str());
    }

    #[test]
    fn other_properties_are_back_ticked(property in quoted_property()) {
        prop_assert_eq!(escape_property(&property).into_owned(), format!("`{property}`"));
    }

    #[test]
    fn group_keeps_every_child(params in prop::collection::vec(parameter(), 1..6)) {
        let rendered: Vec<String> = params.iter().map(|p| p.build().unwrap()).collect();

        let mut group = Query::new();
        for p in params {
            group.and(p);
        }

        prop_assert_eq!(group.build().unwrap(), rendered.join(" AND "));
    }

    #[test]
    fn nested_group_parenthesized_when_plural(
        head in parameter(),
        params in prop::collection::vec(parameter(), 1..5),
    ) {
        let plural = params.len() > 1;
        let head_rendered = head.build().unwrap();

        let mut inner = Query::new();
        for p in params {
            inner.and(p);
        }
        let inner_rendered = inner.build().unwrap();

        let mut root = Query::new();
        root.and(head).or_group(inner);

        let expected = if plural {
            format!("{head_rendered} OR ({inner_rendered})")
        } else {
            format!("{head_rendered} OR {inner_rendered}")
        };
        prop_assert_eq!(root.build().unwrap(), expected);
    }

    #[test]
    fn builder_matches_manual_group(
        a in (any_property(), value()),
        b in (any_property(), value()),
    ) {
        let built = QueryBuilder::new()
            .property(a.0.clone())
            .is_equal_to(a.1.clone())
            .or(b.0.clone())
            .contains(b.1.clone())
            .build()
            .unwrap();

        let mut pa = Parameter::new(a.0);
        pa.is_equal_to(a.1).unwrap();
        let mut pb = Parameter::new(b.0);
        pb.contains(b.1).unwrap();
        let mut manual = Query::new();
        manual.and(pa).or(pb);

        prop_assert_eq!(built, manual.build().unwrap());
    }
}

#[test]
fn documented_examples() {
    assert_eq!(escape_property("a,b*1"), "a,b*1");
    assert_eq!(escape_property("first name"), "`first name`");

    let group = QueryBuilder::new()
        .property("A")
        .is_equal_to("1")
        .and("B")
        .is_equal_to("2")
        .into_query();
    assert_eq!(group.build().unwrap(), "A = \"1\" AND B = \"2\"");

    let mut c = Parameter::new("C");
    c.is_empty().unwrap();
    let mut root = Query::new();
    root.and(c).or_group(group);
    assert_eq!(root.build().unwrap(), "C IS EMPTY OR (A = \"1\" AND B = \"2\")");
}
