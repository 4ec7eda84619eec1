
use fixtures::{normalize, scatter_whitespace};
use sqlate::{
    Args, ParseErrorKind, SqlateError, SubstituteError, Template, TokenizeErrorKind, apply,
};

const REVIEWS_QUERY: &str = "
    SELECT
        products.*
        {{ [if] .IncludeReviews [then] ,json_agg(reviews) AS reviews }}
    FROM products
    {{ [if] .IncludeReviews [then] LEFT JOIN reviews ON reviews.product_id = products.id }}
    WHERE category = $1
    OFFSET 100
    LIMIT 10
";

const NESTED_QUERY: &str = "
    SELECT
        products.*
        {{
            [if] .IncludeReviews [then] ,json_agg(reviews) AS reviews
            {{
                [if] .IncludeCount [then] ,count(reviews) AS num_reviews
            }}
        }}
    FROM products
    {{ [if] .IncludeReviews [then] LEFT JOIN reviews ON reviews.product_id = products.id }}
    WHERE category = $1
    OFFSET 100
    LIMIT 10
";

const LIMIT_QUERY: &str = "
    SELECT
        products.*
    FROM products
    WHERE category = $1
    OFFSET 100
    LIMIT {{ [if] .GetMany [then] 100 [else] 10 }}
";

#[test]
#[ntest::timeout(100)]
fn test_no_args_returns_template_unchanged() {
    let template = "SELECT *\t FROM   products {{ [if] nonsense";
    assert_eq!(apply(template, None).unwrap(), template);
}

#[test]
#[ntest::timeout(100)]
fn test_empty_args_only_normalizes_whitespace() {
    let template = "\n\tSELECT   *\n  FROM products\n WHERE id = $1\n";
    assert_eq!(
        apply(template, Some(&Args::new())).unwrap(),
        "SELECT * FROM products WHERE id = $1"
    );
}

#[test]
#[ntest::timeout(100)]
fn test_flat_literals_round_trip() {
    let words = ["SELECT", "name,", "price", "FROM", "products", "WHERE", "id", "=", "$1"];
    for _ in 0..20 {
        let template = scatter_whitespace(&words);
        let args = Args::new().insert("Unused", true).to_owned();
        assert_eq!(
            apply(&template, Some(&args)).unwrap(),
            words.join(" "),
            "template {:?}",
            template
        );
    }
}

#[test]
#[ntest::timeout(100)]
fn test_falsey_substitute() {
    let args = Args::new().insert("IncludeReviews", false).to_owned();
    assert_eq!(
        apply(REVIEWS_QUERY, Some(&args)).unwrap(),
        normalize(
            "SELECT products.* FROM products WHERE category = $1 OFFSET 100 LIMIT 10"
        )
    );
}

#[test]
#[ntest::timeout(100)]
fn test_truthy_substitute() {
    let args = Args::new().insert("IncludeReviews", true).to_owned();
    assert_eq!(
        apply(REVIEWS_QUERY, Some(&args)).unwrap(),
        normalize(
            "
            SELECT
                products.*
                ,json_agg(reviews) AS reviews
            FROM products
            LEFT JOIN reviews ON reviews.product_id = products.id
            WHERE category = $1
            OFFSET 100
            LIMIT 10
            "
        )
    );
}

#[test]
#[ntest::timeout(100)]
fn test_nested_truthy_expression() {
    let args = Args::new()
        .insert("IncludeReviews", true)
        .insert("IncludeCount", true)
        .to_owned();
    assert_eq!(
        apply(NESTED_QUERY, Some(&args)).unwrap(),
        normalize(
            "
            SELECT
                products.*
                ,json_agg(reviews) AS reviews
                ,count(reviews) AS num_reviews
            FROM products
            LEFT JOIN reviews ON reviews.product_id = products.id
            WHERE category = $1
            OFFSET 100
            LIMIT 10
            "
        )
    );
}

#[test]
#[ntest::timeout(100)]
fn test_nested_falsey_expression() {
    let args = Args::new()
        .insert("IncludeReviews", true)
        .insert("IncludeCount", false)
        .to_owned();
    assert_eq!(
        apply(NESTED_QUERY, Some(&args)).unwrap(),
        normalize(
            "
            SELECT
                products.*
                ,json_agg(reviews) AS reviews
            FROM products
            LEFT JOIN reviews ON reviews.product_id = products.id
            WHERE category = $1
            OFFSET 100
            LIMIT 10
            "
        )
    );
}

#[test]
#[ntest::timeout(100)]
fn test_nested_expression_in_untaken_branch_still_needs_its_args() {
    let args = Args::new().insert("IncludeReviews", false).to_owned();
    assert_eq!(
        apply(NESTED_QUERY, Some(&args)).unwrap_err(),
        SqlateError::Substitute(SubstituteError::InvalidPredicate {
            predicate: ".IncludeCount".to_string()
        })
    );
}

#[test]
#[ntest::timeout(100)]
fn test_if_then_else() {
    let many = Args::new().insert("GetMany", true).to_owned();
    assert_eq!(
        apply(LIMIT_QUERY, Some(&many)).unwrap(),
        "SELECT products.* FROM products WHERE category = $1 OFFSET 100 LIMIT 100"
    );

    let few = Args::new().insert("GetMany", false).to_owned();
    assert_eq!(
        apply(LIMIT_QUERY, Some(&few)).unwrap(),
        "SELECT products.* FROM products WHERE category = $1 OFFSET 100 LIMIT 10"
    );

    // A conditional inside a taken [else] branch.
    let template = "a {{ [if] .A [then] x [else] y {{ [if] .B [then] b [else] c }} z }} w";
    let expected = [
        (true, true, "a x w"),
        (true, false, "a x w"),
        (false, true, "a y b z w"),
        (false, false, "a y c z w"),
    ];
    for (a, b, output) in expected {
        let args = Args::new().insert("A", a).insert("B", b).to_owned();
        assert_eq!(apply(template, Some(&args)).unwrap(), output);
    }
}

#[test]
#[ntest::timeout(100)]
fn test_empty_value_leaves_no_gap() {
    let args = Args::new().insert("E", "").to_owned();
    assert_eq!(apply("a .E b", Some(&args)).unwrap(), "a b");
    assert_eq!(apply(".E a .E", Some(&args)).unwrap(), "a");
}

#[test]
#[ntest::timeout(1000)]
fn test_deep_nesting() {
    let nested = |depth: usize| format!("{}{}", "{{ x ".repeat(depth), "}} ".repeat(depth));
    let args = Args::new();

    let output = apply(&nested(128), Some(&args)).unwrap();
    assert_eq!(output, vec!["x"; 128].join(" "));

    for depth in [129, 1000, 20_000] {
        match apply(&nested(depth), Some(&args)) {
            Err(SqlateError::Tokenize(e)) => {
                assert_eq!(e.kind, TokenizeErrorKind::NestingTooDeep { limit: 128 });
            }
            other => panic!("Expected a tokenize error, found {:?}", other),
        }
    }
}

#[test]
#[ntest::timeout(100)]
fn test_conditional_truth_table() {
    let template = "{{ [if] .Key [then] A [else] B }}";

    let args = Args::new().insert("Key", true).to_owned();
    assert_eq!(apply(template, Some(&args)).unwrap(), "A");

    let args = Args::new().insert("Key", false).to_owned();
    assert_eq!(apply(template, Some(&args)).unwrap(), "B");

    let args = Args::new().insert("Key", "TRUE").to_owned();
    assert_eq!(apply(template, Some(&args)).unwrap(), "A");

    let args = Args::new().insert("Other", true).to_owned();
    assert_eq!(
        apply(template, Some(&args)).unwrap_err(),
        SqlateError::Substitute(SubstituteError::InvalidPredicate {
            predicate: ".Key".to_string()
        })
    );

    let args = Args::new().insert("Key", "haha").to_owned();
    assert_eq!(
        apply(template, Some(&args)).unwrap_err(),
        SqlateError::Substitute(SubstituteError::InvalidPredicate {
            predicate: "haha".to_string()
        })
    );
}

#[test]
#[ntest::timeout(100)]
fn test_literal_predicates() {
    let args = Args::new();
    assert_eq!(
        apply("a {{ [if] true [then] b }} {{ [if] false [then] c }} d", Some(&args)).unwrap(),
        "a b d"
    );
}

#[test]
#[ntest::timeout(100)]
fn test_multi_token_predicate_is_always_an_error() {
    let template = "{{ [if] .Key1 .Key2 [then] A }}";
    for (key1, key2) in [(true, true), (true, false), (false, true), (false, false)] {
        let args = Args::new()
            .insert("Key1", key1)
            .insert("Key2", key2)
            .to_owned();
        assert!(
            matches!(
                apply(template, Some(&args)),
                Err(SqlateError::Substitute(SubstituteError::MultiTokenPredicate { .. }))
            ),
            "Key1={} Key2={}",
            key1,
            key2
        );
    }
}

#[test]
#[ntest::timeout(100)]
fn test_value_substitution() {
    let args = Args::new()
        .insert("Table", "products")
        .insert("Limit", 25_u32)
        .insert("Paged", true)
        .to_owned();
    assert_eq!(
        apply(
            "SELECT * FROM .Table {{ [if] .Paged [then] LIMIT .Limit }}",
            Some(&args)
        )
        .unwrap(),
        "SELECT * FROM products LIMIT 25"
    );
}

#[test]
#[ntest::timeout(100)]
fn test_random_whitespace_in_conditionals() {
    let words = [
        "SELECT", "*", "{{", "[if]", ".IncludeReviews", "[then]", ",json_agg(reviews)", "AS",
        "reviews", "}}", "FROM", "products",
    ];
    for _ in 0..20 {
        let template = scatter_whitespace(&words);

        let args = Args::new().insert("IncludeReviews", true).to_owned();
        assert_eq!(
            apply(&template, Some(&args)).unwrap(),
            "SELECT * ,json_agg(reviews) AS reviews FROM products"
        );

        let args = Args::new().insert("IncludeReviews", false).to_owned();
        assert_eq!(
            apply(&template, Some(&args)).unwrap(),
            "SELECT * FROM products"
        );
    }
}

#[test]
#[ntest::timeout(100)]
fn test_structural_errors() {
    fn tokenize_error(template: &str, args: &Args<'_>) -> sqlate::TokenizeError {
        match apply(template, Some(args)) {
            Err(SqlateError::Tokenize(e)) => e,
            other => panic!("Expected a tokenize error, found {:?}", other),
        }
    }

    fn parse_error(template: &str, args: &Args<'_>) -> sqlate::ParseError {
        match apply(template, Some(args)) {
            Err(SqlateError::Parse(e)) => e,
            other => panic!("Expected a parse error, found {:?}", other),
        }
    }

    let args = Args::new().insert("A", true).to_owned();

    let e = tokenize_error("SELECT }} FROM t", &args);
    assert_eq!(e.kind, TokenizeErrorKind::UnbalancedClose);
    assert_eq!(e.column, 8);

    let e = tokenize_error("SELECT {{ [if] .A [then] x", &args);
    assert_eq!(e.kind, TokenizeErrorKind::UnclosedScope);

    let e = parse_error("", &args);
    assert_eq!(e.kind, ParseErrorKind::MalformedExpression);

    let e = parse_error("SELECT {{ [if] [then] x }}", &args);
    assert_eq!(e.kind, ParseErrorKind::MissingPredicate);

    let e = parse_error("SELECT {{ [if] .A x }}", &args);
    assert_eq!(e.kind, ParseErrorKind::MissingThenClause);
}

#[test]
#[ntest::timeout(100)]
fn test_error_messages_name_the_stage() {
    let args = Args::new();

    let err = apply("a }}", Some(&args)).unwrap_err();
    assert!(err.to_string().starts_with("tokenizing template:"), "{}", err);

    let err = apply("{{ [if] .A x }}", Some(&args)).unwrap_err();
    assert!(err.to_string().starts_with("building AST:"), "{}", err);

    let err = apply("{{ [if] .A [then] x }}", Some(&args)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "substituting args: Predicate must be 'true' or 'false', found '.A'"
    );
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
#[ntest::timeout(100)]
fn test_template_matches_apply() {
    let args = Args::new()
        .insert("IncludeReviews", true)
        .insert("IncludeCount", false)
        .to_owned();
    let template = Template::new(NESTED_QUERY).unwrap();
    assert_eq!(
        template.render(&args).unwrap(),
        apply(NESTED_QUERY, Some(&args)).unwrap()
    );
    assert_eq!(template.variables(), vec!["IncludeReviews", "IncludeCount"]);
}
