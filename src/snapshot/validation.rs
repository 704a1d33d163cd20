use super::types::TransactionSnapshot;
use std::collections::HashSet;

/// Check a snapshot before it reaches the engine.
/// Returns all problems at once (not just the first).
pub fn validate_snapshot(snapshot: &TransactionSnapshot) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if snapshot.transaction.id.trim().is_empty() {
        errors.push("transaction.id: must not be empty".to_string());
    }

    let mut seen_ids = HashSet::new();
    for (i, milestone) in snapshot.milestones.iter().enumerate() {
        if milestone.id.trim().is_empty() {
            errors.push(format!("milestones[{}].id: must not be empty", i));
        } else if !seen_ids.insert(milestone.id.as_str()) {
            errors.push(format!(
                "milestones[{}].id: duplicate id '{}'",
                i, milestone.id
            ));
        }
    }

    for (i, party) in snapshot.parties.iter().enumerate() {
        if party.role.trim().is_empty() {
            errors.push(format!("parties[{}].role: must not be empty", i));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
