//! Flattening of server entity payloads into table rows.
//!
//! The server nests activity objects inside the item they belong to. The
//! client keeps one flat row per entity, so activities become separate rows
//! and the item keeps only their ids.

use exeris_domain::{EntityId, EntityInfo, RawEntity};

/// Flatten one server entity (and its inline activities) into rows.
///
/// The entity's own row comes first, followed by its activity rows in the
/// order the server listed them.
pub fn flatten(raw: RawEntity) -> Vec<EntityInfo> {
    let mut rows = Vec::new();
    flatten_into(raw, None, &mut rows);
    rows
}

/// Flatten a list of server entities, returning their ids in order and all rows
pub fn flatten_all(entities: Vec<RawEntity>) -> (Vec<EntityId>, Vec<EntityInfo>) {
    let mut ids = Vec::with_capacity(entities.len());
    let mut rows = Vec::with_capacity(entities.len());
    for raw in entities {
        ids.push(raw.id.clone());
        flatten_into(raw, None, &mut rows);
    }
    (ids, rows)
}

fn flatten_into(raw: RawEntity, owner: Option<EntityId>, rows: &mut Vec<EntityInfo>) {
    let RawEntity {
        id,
        name,
        kind,
        actions,
        activities,
        fields,
    } = raw;

    let activity_ids = activities
        .as_ref()
        .map(|activities| activities.iter().map(|a| a.id.clone()).collect());

    rows.push(EntityInfo {
        id: id.clone(),
        name,
        kind,
        actions,
        activities: activity_ids,
        owner,
        fields,
    });

    for activity in activities.into_iter().flatten() {
        flatten_into(activity, Some(id.clone()), rows);
    }
}
