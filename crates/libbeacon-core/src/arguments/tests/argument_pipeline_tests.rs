use crate::arguments::ArgumentPipeline;
use crate::arguments::ArgumentSet;
use crate::arguments::ArgumentSetFactory;
use crate::resolve::CompiledSchema;
use crate::resolve::ResolveError;
use crate::store::InMemoryStore;
use crate::test::compile;
use crate::test::context;
use serde_json::json;

type Result<T> = std::result::Result<T, ResolveError>;

const SIGNUP_SDL: &str = r#"
type Query {
  signup(
    input: SignupInput! @spread
    tags: [String!] @rules(apply: ["max:2"])
  ): String
  search(term: String @rename(attribute: "q") @trim): String
}

input SignupInput {
  name: String @trim @rules(apply: ["required", "min:3"])
  email: String @rules(apply: ["email"])
  password: String @hash
  nickname: String @convertEmptyStringsToNull
  secret: String @drop
  profile: ProfileInput @spread
}

input ProfileInput {
  bio: String @trim
  age: Int @rules(apply: ["integer", "max:150"])
}
"#;

fn process(
    schema: &CompiledSchema,
    field_name: &str,
    raw: serde_json::Value,
) -> Result<ArgumentSet> {
    let field = schema.field("Query", field_name).unwrap();
    let raw = raw.as_object().cloned().unwrap_or_default();
    let args = ArgumentSetFactory::new(schema.document())
        .from_field_arguments(field.definition(), &raw);
    let ctx = context(&InMemoryStore::new());
    ArgumentPipeline::new(schema, &ctx).process(args, field_name)
}

#[test]
fn stages_run_over_the_whole_tree() -> Result<()> {
    let schema = compile(SIGNUP_SDL);
    let args = process(&schema, "signup", json!({
        "input": {
            "name": "  Ada  ",
            "email": "ada@example.com",
            "password": "secret",
            "nickname": "",
            "secret": "dropped",
            "profile": {"bio": " hi ", "age": 36},
        },
        "tags": ["a"],
    }))?;

    assert_eq!(serde_json::Value::Object(args.to_json()), json!({
        "name": "Ada",
        "email": "ada@example.com",
        "password": "2bb80d537b1da3e38bd30361aa855686bde0eacd7162fef6a25fe97bf527a25b",
        "nickname": null,
        "bio": "hi",
        "age": 36,
        "tags": ["a"],
    }));
    Ok(())
}

#[test]
fn validation_failures_are_keyed_by_path() {
    let schema = compile(SIGNUP_SDL);
    let result = process(&schema, "signup", json!({
        "input": {
            "name": " Al ",
            "email": "nope",
            "profile": {"age": 200},
        },
        "tags": ["a", "b", "c"],
    }));

    let errors = match result {
        Err(ResolveError::Validation { errors, field }) => {
            assert_eq!(field, "signup");
            errors
        },
        other => panic!("expected a validation error, got {other:?}"),
    };
    assert_eq!(errors.keys().collect::<Vec<_>>(), vec![
        "input.name",
        "input.email",
        "input.profile.age",
        "tags",
    ]);
    // Sanitizers run first, so the trimmed name is too short.
    assert_eq!(errors["input.name"], vec!["This field must be at least 3.".to_string()]);
    assert_eq!(errors["input.email"], vec!["This field must be a valid email address.".to_string()]);
    assert_eq!(errors["input.profile.age"], vec!["This field may not be greater than 150.".to_string()]);
    assert_eq!(errors["tags"], vec!["This field may not be greater than 2.".to_string()]);
}

#[test]
fn omitted_arguments_are_still_validated() {
    let schema = compile(SIGNUP_SDL);
    let result = process(&schema, "signup", json!({"input": {}}));

    let errors = match result {
        Err(ResolveError::Validation { errors, .. }) => errors,
        other => panic!("expected a validation error, got {other:?}"),
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors["input.name"], vec!["This field is required.".to_string()]);
}

#[test]
fn rename_keeps_the_sanitized_value() -> Result<()> {
    let schema = compile(SIGNUP_SDL);
    let args = process(&schema, "search", json!({"term": "  rust "}))?;
    assert!(!args.contains("term"));
    assert_eq!(args.json("q"), Some(json!("rust")));
    Ok(())
}

#[test]
fn spread_of_null_removes_the_argument() -> Result<()> {
    let schema = compile(SIGNUP_SDL);
    let args = process(&schema, "signup", json!({"input": {"name": "Grace", "profile": null}}))?;
    assert!(!args.contains("profile"));
    assert_eq!(args.json("name"), Some(json!("Grace")));
    Ok(())
}

#[test]
fn outer_spread_sees_renamed_inner_keys() -> Result<()> {
    let schema = compile(r#"
        type Query { nest(outer: Outer @spread): String }

        input Outer {
          inner: Inner @spread
          top: String @trim
        }

        input Inner {
          first: String @rename(attribute: "first_name") @trim
        }
    "#);
    let args = process(&schema, "nest", json!({
        "outer": {"inner": {"first": " a "}, "top": " t "},
    }))?;
    assert_eq!(
        serde_json::Value::Object(args.to_json()),
        json!({"first_name": "a", "top": "t"}),
    );
    Ok(())
}
