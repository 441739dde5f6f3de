use crate::schema::SchemaBuildError;
use crate::schema::SchemaBuilder;
use crate::schema::SchemaCache;
use crate::test::builtins;
use crate::test::temp_dir;

type Result<T> = std::result::Result<T, SchemaBuildError>;

const SDL: &str = "type Query { users: [User!]! @paginate } type User { id: ID! }";

fn builder(sdl: &str) -> SchemaBuilder {
    SchemaBuilder::new(builtins()).load_str(None, sdl)
}

#[test]
fn stored_document_loads_back_unchanged() -> Result<()> {
    let cache = SchemaCache::new(temp_dir("cache-round-trip").join("schema.bin"));
    let doc = builder(SDL).build()?;
    cache.store(&doc)?;
    assert_eq!(cache.load(doc.content_hash())?, Some(doc));
    Ok(())
}

#[test]
fn a_different_hash_misses() -> Result<()> {
    let cache = SchemaCache::new(temp_dir("cache-stale").join("schema.bin"));
    cache.store(&builder(SDL).build()?)?;
    assert_eq!(cache.load("0000")?, None);
    Ok(())
}

#[test]
fn missing_file_is_a_miss() -> Result<()> {
    let cache = SchemaCache::new(temp_dir("cache-missing").join("nested/schema.bin"));
    assert_eq!(cache.load("anything")?, None);
    assert!(!cache.clear()?);
    Ok(())
}

#[test]
fn clear_removes_the_file() -> Result<()> {
    let cache = SchemaCache::new(temp_dir("cache-clear").join("schema.bin"));
    cache.store(&builder(SDL).build()?)?;
    assert!(cache.path().exists());
    assert!(cache.clear()?);
    assert!(!cache.path().exists());
    Ok(())
}

#[test]
fn corrupt_cache_fails_to_decode() -> Result<()> {
    let path = temp_dir("cache-corrupt").join("schema.bin");
    std::fs::write(&path, b"not a schema").unwrap();
    assert!(SchemaCache::new(&path).load("anything").is_err());
    Ok(())
}

#[test]
fn build_cached_reuses_the_stored_document() -> Result<()> {
    let cache = SchemaCache::new(temp_dir("cache-build").join("schema.bin"));
    let built = builder(SDL).build_cached(&cache)?;

    // Swap in a marker document under the same hash: a cache hit returns
    // it without rebuilding.
    let mut marker = built.clone();
    marker.register_class_name("Marker", "User");
    cache.store(&marker)?;
    let loaded = builder(SDL).build_cached(&cache)?;
    assert_eq!(loaded.model_name_for_type("User"), "Marker");

    let rebuilt = builder("type Query { ping: Boolean }").build_cached(&cache)?;
    assert!(!rebuilt.has_type("User"));
    Ok(())
}
