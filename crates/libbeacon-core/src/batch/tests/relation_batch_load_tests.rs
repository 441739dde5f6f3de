use crate::batch::BatchLoad;
use crate::batch::RelationBatchLoad;
use crate::batch::RelationLoadMode;
use crate::resolve::ResolveError;
use crate::store::DataStore;
use crate::store::InMemoryStore;
use crate::store::Operator;
use crate::store::Pivot;
use crate::store::Relation;
use crate::test::blog_store;
use serde_json::json;
use std::sync::Arc;

type Result<T> = std::result::Result<T, ResolveError>;

fn relation_load(
    store: &InMemoryStore,
    model: &str,
    relation: &str,
    mode: RelationLoadMode,
) -> Result<RelationBatchLoad> {
    let relation = store.relation(model, relation)?;
    Ok(RelationBatchLoad {
        mode,
        template: store.query(&relation.related)?,
        relation,
        store: Arc::new(store.clone()),
    })
}

#[tokio::test]
async fn has_many_groups_by_foreign_key() -> Result<()> {
    let store = blog_store();
    let load = relation_load(&store, "User", "posts", RelationLoadMode::Many)?;

    let values = load.load(&[json!(1), json!(3)]).await?;
    assert_eq!(values["1"].as_array().map(Vec::len), Some(2));
    assert_eq!(values["3"], json!([]));
    assert_eq!(store.select_count()?, 1);
    Ok(())
}

#[tokio::test]
async fn counts_respect_the_template_filters() -> Result<()> {
    let store = blog_store();
    let mut load = relation_load(&store, "User", "posts", RelationLoadMode::Count)?;
    load.template.add_where("title", Operator::Like, json!("c%"));

    let values = load.load(&[json!(1), json!(2)]).await?;
    assert_eq!(values["1"], json!(0));
    assert_eq!(values["2"], json!(2));
    Ok(())
}

#[tokio::test]
async fn belongs_to_loads_single_owner() -> Result<()> {
    let store = blog_store();
    let load = relation_load(&store, "Post", "author", RelationLoadMode::Single)?;

    let values = load.load(&[json!(2), json!(42)]).await?;
    assert_eq!(values["2"]["name"], json!("Grace"));
    assert_eq!(values["42"], serde_json::Value::Null);
    Ok(())
}

#[tokio::test]
async fn belongs_to_many_goes_through_the_pivot() -> Result<()> {
    let store = blog_store();
    store.seed("Tag", vec![
        json!({"id": 1, "label": "rust"}),
        json!({"id": 2, "label": "history"}),
    ]).map_err(ResolveError::from)?;
    store.seed("PostTag", vec![
        json!({"post_id": 1, "tag_id": 1}),
        json!({"post_id": 1, "tag_id": 2}),
        json!({"post_id": 4, "tag_id": 2}),
    ]).map_err(ResolveError::from)?;
    store.define_relation("Post", "tags", Relation::belongs_to_many("Tag", Pivot {
        foreign_pivot_key: "post_id".to_string(),
        model: "PostTag".to_string(),
        related_pivot_key: "tag_id".to_string(),
    })).map_err(ResolveError::from)?;

    let load = relation_load(&store, "Post", "tags", RelationLoadMode::Many)?;
    let values = load.load(&[json!(1), json!(4)]).await?;

    let labels = |key: &str| -> Vec<serde_json::Value> {
        values[key].as_array()
            .map(|tags| tags.iter().map(|tag| tag["label"].clone()).collect())
            .unwrap_or_default()
    };
    assert_eq!(labels("1"), vec![json!("rust"), json!("history")]);
    assert_eq!(labels("4"), vec![json!("history")]);
    assert_eq!(values["4"][0]["pivot"]["post_id"], json!(4));
    Ok(())
}
