use super::{Context, print_json};
use anyhow::Result;

pub async fn activate(ctx: &Context) -> Result<()> {
    let report = ctx.service.activate_due_allocations().await?;
    print_json(&serde_json::to_value(&report)?)?;

    if !report.failures.is_empty() {
        anyhow::bail!("{} allocation(s) could not be activated", report.failures.len());
    }
    Ok(())
}

pub async fn group_sessions(ctx: &Context) -> Result<()> {
    let report = ctx.service.run_session_grouping().await?;
    print_json(&serde_json::json!({
        "mentors_processed": report.mentors_processed,
        "sessions_created": report.sessions_created(),
        "allocations_completed": report.allocations_completed,
        "session_ids": report.session_ids,
        "failures": report.failures,
    }))?;

    if !report.is_clean() {
        anyhow::bail!("grouping finished with {} failure(s)", report.failures.len());
    }
    Ok(())
}
