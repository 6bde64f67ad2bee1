mod common;

use chrono::DateTime;
use common::{Fixture, TestResult};
use sylvan::Unparser;
use sylvan::qom::QomError;
use sylvan::traits::ResolveError;
use sylvan::types::{Name, Value};

#[test]
fn test_render_structural_constraints() -> TestResult {
    let fx = Fixture::new();
    let f = &fx.factory;
    let unparser = Unparser::new(&*fx.resolver);
    assert_eq!(
        unparser.render_constraint(&f.descendant_node("s1", "/a/b")?)?,
        "ISDESCENDANTNODE(s1, [/a/b])"
    );
    assert_eq!(
        unparser.render_constraint(&f.child_node("s", "/jcr:system")?)?,
        "ISCHILDNODE(s, [/jcr:system])"
    );
    assert_eq!(
        unparser.render_constraint(&f.same_node("s", "/a/item[2]")?)?,
        "ISSAMENODE(s, '/a/item[2]')"
    );
    Ok(())
}

#[test]
fn test_render_compound_constraints() -> TestResult {
    let fx = Fixture::new();
    let f = &fx.factory;
    let unparser = Unparser::new(&*fx.resolver);
    let constraint = f.and(
        f.or(
            f.property_existence("s", "jcr:title")?,
            f.comparison(f.property_value("s", "size")?, ">", f.literal(10i64))?,
        ),
        f.not(f.comparison(f.node_local_name("s")?, "LIKE", f.literal("tmp%"))?),
    );
    assert_eq!(
        unparser.render_constraint(&constraint)?,
        "(s.jcr:title IS NOT NULL OR s.size > 10) AND NOT LOCALNAME(s) LIKE 'tmp%'"
    );

    let nested_not = f.not(f.and(
        f.property_existence("s", "a")?,
        f.property_existence("s", "b")?,
    ));
    assert_eq!(
        unparser.render_constraint(&nested_not)?,
        "NOT (s.a IS NOT NULL AND s.b IS NOT NULL)"
    );
    Ok(())
}

#[test]
fn test_render_operands_and_literals() -> TestResult {
    let fx = Fixture::new();
    let f = &fx.factory;
    let unparser = Unparser::new(&*fx.resolver);

    let operand = f.upper_case(f.lower_case(f.length(f.property_value("s", "title")?)?));
    assert_eq!(unparser.render_dynamic_operand(&operand)?, "UPPER(LOWER(LENGTH(s.title)))");
    assert_eq!(unparser.render_dynamic_operand(&f.any_property_value("s")?)?, "s.*");
    assert_eq!(unparser.render_dynamic_operand(&f.full_text_search_score("s")?)?, "SCORE(s)");
    assert_eq!(unparser.render_dynamic_operand(&f.node_name("order")?)?, "NAME([order])");

    assert_eq!(unparser.render_static_operand(&f.literal("it's"))?, "'it''s'");
    assert_eq!(unparser.render_static_operand(&f.literal(42i64))?, "42");
    assert_eq!(unparser.render_static_operand(&f.literal(2.0))?, "2.0");
    assert_eq!(unparser.render_static_operand(&f.literal(true))?, "CAST('true' AS BOOLEAN)");
    assert_eq!(unparser.render_static_operand(&f.name_literal("nt:file")?)?, "CAST('nt:file' AS NAME)");
    assert_eq!(unparser.render_static_operand(&f.path_literal("/a/b")?)?, "CAST('/a/b' AS PATH)");
    assert_eq!(unparser.render_static_operand(&f.bind_variable("limit")?)?, "$limit");

    let date = DateTime::parse_from_rfc3339("2024-05-01T12:00:00+00:00")?;
    assert_eq!(
        unparser.render_static_operand(&f.literal(Value::Date(date)))?,
        "CAST('2024-05-01T12:00:00+00:00' AS DATE)"
    );
    Ok(())
}

#[test]
fn test_render_full_text_search() -> TestResult {
    let fx = Fixture::new();
    let f = &fx.factory;
    let unparser = Unparser::new(&*fx.resolver);
    assert_eq!(
        unparser.render_constraint(&f.full_text_search("s", None, f.literal("rust -java"))?)?,
        "CONTAINS(s.*, 'rust -java')"
    );
    assert_eq!(
        unparser.render_constraint(&f.full_text_search("s", Some("body"), f.bind_variable("q")?)?)?,
        "CONTAINS(s.body, $q)"
    );
    Ok(())
}

#[test]
fn test_render_query() -> TestResult {
    let fx = Fixture::new();
    let f = &fx.factory;
    let unparser = Unparser::new(&*fx.resolver);

    let inner = f.join(
        f.selector("nt:folder", "parent")?,
        f.selector("nt:file", "child")?,
        "INNER",
        f.child_node_join("child", "parent")?,
    )?;
    let nested = f.join(
        f.selector("nt:base", "a")?,
        f.join(
            f.selector("nt:base", "b")?,
            f.selector("nt:base", "c")?,
            "jcr.join.type.left.outer",
            f.equi_join("b", "ref", "c", "jcr:uuid")?,
        )?,
        "RIGHT OUTER JOIN",
        f.same_node_join("a", "b", Some("x/y"))?,
    )?;

    let query = f.query(
        inner,
        Some(f.descendant_node("parent", "/content")?),
        vec![f.descending(f.node_name("child")?), f.ascending(f.property_value("child", "size")?)],
        vec![f.column("child", Some("jcr:title"), Some("title"))?, f.column("parent", None, None)?],
    );
    assert_eq!(
        unparser.render_query(&query)?,
        "SELECT child.jcr:title AS title, parent.* \
         FROM nt:folder AS parent INNER JOIN nt:file AS child ON ISCHILDNODE(child, parent) \
         WHERE ISDESCENDANTNODE(parent, [/content]) \
         ORDER BY NAME(child) DESC, child.size ASC"
    );

    let plain = f.query(nested, None, vec![], vec![]);
    assert_eq!(
        unparser.render_query(&plain)?,
        "SELECT * FROM nt:base AS a RIGHT OUTER JOIN \
         (nt:base AS b LEFT OUTER JOIN nt:base AS c ON b.ref = c.jcr:uuid) \
         ON ISSAMENODE(a, b, [x/y])"
    );
    Ok(())
}

#[test]
fn test_render_is_deterministic() -> TestResult {
    let fx = Fixture::new();
    let f = &fx.factory;
    let unparser = Unparser::new(&*fx.resolver);
    let constraint = f.or(
        f.full_text_search("s", Some("body"), f.literal("rust"))?,
        f.comparison(f.length(f.property_value("s", "title")?)?, "<=", f.literal(5i64))?,
    );
    let first = unparser.render_constraint(&constraint)?;
    for _ in 0..5 {
        assert_eq!(unparser.render_constraint(&constraint)?, first);
    }
    assert_eq!(unparser.render_constraint(&constraint.clone())?, first);
    Ok(())
}

#[test]
fn test_unregistered_namespace_fails_to_render() -> TestResult {
    let fx = Fixture::new();
    let f = &fx.factory;
    let unparser = Unparser::new(&*fx.resolver);
    let foreign = f.comparison(
        f.property_value("s", "{http://example.com/ns}title")?,
        "=",
        f.literal(Value::Name(Name::new("http://example.com/other", "x"))),
    )?;
    assert_eq!(
        unparser.render_constraint(&foreign),
        Err(QomError::UnresolvableName(ResolveError::UnknownNamespace(
            "http://example.com/ns".to_string()
        )))
    );

    fx.resolver.register("ex", "http://example.com/ns")?;
    fx.resolver.register("other", "http://example.com/other")?;
    assert_eq!(
        unparser.render_constraint(&foreign)?,
        "s.ex:title = CAST('other:x' AS NAME)"
    );
    Ok(())
}
