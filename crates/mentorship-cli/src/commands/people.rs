use super::{Context, print_json};
use anyhow::Result;
use mentorship_core::allocation::Allocation;
use mentorship_core::person::{Person, Role};
use mentorship_core::store::Stored;
use mentorship_core::venue::Venue;
use serde_json::{Value, json};

pub async fn add_person(ctx: &Context, role: Role, name: String, email: String) -> Result<()> {
    let person = Person { role, name, email };
    let registration = ctx.service.register_person(person).await?;

    let allocation = allocation_status(&registration.allocation);

    print_json(&json!({
        "person_id": registration.person.id,
        "role": role.as_ref(),
        "allocation": allocation,
    }))
}

pub async fn add_venue(ctx: &Context, name: String, location: Option<String>) -> Result<()> {
    let venue = ctx.service.add_venue(Venue { name, location }).await?;
    print_json(&json!({
        "venue_id": venue.id,
        "name": venue.name,
        "location": venue.location,
    }))
}

/// What the registration trigger did, as reported to the operator.
fn allocation_status(result: &mentorship_core::Result<Option<Stored<Allocation>>>) -> Value {
    match result {
        Ok(Some(allocation)) => json!({
            "status": "allocated",
            "allocation_id": allocation.id,
            "mentor_id": allocation.mentor_id,
            "session_key": allocation.session_key,
            "session_date": allocation.session_date,
            "mentees": allocation.len(),
        }),
        Ok(None) => json!({ "status": "not_applicable" }),
        Err(e) if e.is_success_equivalent() => json!({ "status": "already_allocated" }),
        Err(e) => json!({
            "status": "failed",
            "error": e.to_string(),
            "retryable": e.is_retryable(),
        }),
    }
}
