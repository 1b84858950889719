use super::{Context, print_json};
use anyhow::Result;
use mentorship_core::store::{Collection, Filter};
use serde_json::{Map, Value, json};
use strum::IntoEnumIterator;

pub async fn sessions(ctx: &Context, mentor_id: &str) -> Result<()> {
    let sessions = ctx.service.sessions_for_mentor(mentor_id).await?;
    print_json(&serde_json::to_value(&sessions)?)
}

pub async fn stats(ctx: &Context) -> Result<()> {
    let store = ctx.service.store().raw();
    let mut counts = Map::new();
    for collection in Collection::iter() {
        let records = store.find(collection, &Filter::all()).await?;
        counts.insert(collection.to_string(), json!(records.len()));
    }
    print_json(&json!({
        "store": ctx.store_dir.display().to_string(),
        "collections": Value::Object(counts),
    }))
}

pub fn show_config(ctx: &Context) -> Result<()> {
    println!("# {}", ctx.config_path.display());
    print!("{}", toml::to_string_pretty(ctx.service.config())?);
    Ok(())
}
