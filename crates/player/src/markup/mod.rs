//! Server-rendered HTML with embedded dynamic-nameable references.
//!
//! A `<span class="dynamic_nameable" data-entity-id="…">Name</span>` marks a
//! reference to an entity whose display name the observer may later see
//! change. Parsing turns every such span into a placeholder keyed by
//! `(observer, entity)` and emits one name-cache update per span, recording
//! the name that was embedded when the HTML was rendered.

mod html;

use exeris_domain::{CharacterId, EntityId};

use crate::state::{Action, DynamicNameAction};

pub use html::{decode_entities, Node};

const DYNAMIC_NAMEABLE_CLASS: &str = "dynamic_nameable";
const ENTITY_ID_ATTRIBUTE: &str = "data-entity-id";

/// Renderable piece of parsed markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Text(String),
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
        children: Vec<Fragment>,
    },
    /// Entity reference rendered from the observer's name cache
    DynamicName {
        observer_id: CharacterId,
        entity_id: EntityId,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedMarkup {
    /// Fragments in document order
    pub fragments: Vec<Fragment>,
    /// One cache update per dynamic-nameable span, in the order encountered
    pub cache_updates: Vec<Action>,
}

/// Parse `html` as seen by `observer_id`
pub fn parse_dynamic_names(html: &str, observer_id: &CharacterId) -> ParsedMarkup {
    let mut parsed = ParsedMarkup::default();
    for node in html::parse(html) {
        let fragment = to_fragment(node, observer_id, &mut parsed.cache_updates);
        parsed.fragments.push(fragment);
    }
    parsed
}

fn to_fragment(node: Node, observer_id: &CharacterId, updates: &mut Vec<Action>) -> Fragment {
    if node.has_class(DYNAMIC_NAMEABLE_CLASS) {
        if let Some(entity_id) = node.attribute(ENTITY_ID_ATTRIBUTE).map(EntityId::from) {
            updates.push(Action::dynamic_names(
                observer_id,
                DynamicNameAction::Update {
                    entity_id: entity_id.clone(),
                    name: node.text_content(),
                },
            ));
            return Fragment::DynamicName {
                observer_id: observer_id.clone(),
                entity_id,
            };
        }
    }

    match node {
        Node::Text(text) => Fragment::Text(text),
        Node::Element {
            tag,
            attributes,
            children,
        } => Fragment::Element {
            tag,
            attributes,
            children: children
                .into_iter()
                .map(|child| to_fragment(child, observer_id, updates))
                .collect(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{reduce_root, RootState};

    fn observer() -> CharacterId {
        CharacterId::from("O")
    }

    #[test]
    fn span_becomes_placeholder_between_text() {
        let parsed = parse_dynamic_names(
            "A <span class='dynamic_nameable' data-entity-id='X'>Bob</span> B",
            &observer(),
        );

        assert_eq!(
            parsed.fragments,
            vec![
                Fragment::Text("A ".into()),
                Fragment::DynamicName {
                    observer_id: observer(),
                    entity_id: EntityId::from("X"),
                },
                Fragment::Text(" B".into()),
            ]
        );
        assert_eq!(
            parsed.cache_updates,
            vec![Action::dynamic_names(
                &observer(),
                DynamicNameAction::Update {
                    entity_id: EntityId::from("X"),
                    name: "Bob".into(),
                },
            )]
        );
    }

    #[test]
    fn nested_references_keep_document_order_and_duplicates() {
        let parsed = parse_dynamic_names(
            r#"<p><span class="dynamic_nameable" data-entity-id="1">Ann</span> gives
            <span class="dynamic_nameable" data-entity-id="2">Bob</span> to
            <span class="dynamic_nameable" data-entity-id="1">Anna</span></p>"#,
            &observer(),
        );

        let names: Vec<(String, String)> = parsed
            .cache_updates
            .iter()
            .map(|action| match action {
                Action::DynamicNames {
                    action: DynamicNameAction::Update { entity_id, name },
                    ..
                } => (entity_id.to_string(), name.clone()),
                other => panic!("unexpected action {other:?}"),
            })
            .collect();

        assert_eq!(
            names,
            vec![
                ("1".to_string(), "Ann".to_string()),
                ("2".to_string(), "Bob".to_string()),
                ("1".to_string(), "Anna".to_string()),
            ]
        );
        assert!(matches!(parsed.fragments[0], Fragment::Element { ref tag, .. } if tag == "p"));
    }

    #[test]
    fn other_markup_passes_through() {
        let parsed = parse_dynamic_names("<b class='loud'>Hey</b>", &observer());

        assert!(parsed.cache_updates.is_empty());
        assert_eq!(
            parsed.fragments,
            vec![Fragment::Element {
                tag: "b".into(),
                attributes: vec![("class".into(), "loud".into())],
                children: vec![Fragment::Text("Hey".into())],
            }]
        );
    }

    #[test]
    fn span_without_entity_id_is_plain_markup() {
        let parsed = parse_dynamic_names("<span class='dynamic_nameable'>?</span>", &observer());
        assert!(parsed.cache_updates.is_empty());
        assert!(matches!(parsed.fragments[0], Fragment::Element { .. }));
    }

    #[test]
    fn cache_update_round_trips_through_reducer() {
        let parsed = parse_dynamic_names(
            "A <span class='dynamic_nameable' data-entity-id='X'>Bob</span> B",
            &observer(),
        );

        let state = parsed
            .cache_updates
            .iter()
            .fold(RootState::default(), |state, action| reduce_root(&state, action));

        assert_eq!(
            state
                .dynamic_names_of(&observer())
                .name_of(&EntityId::from("X")),
            Some("Bob")
        );
    }

    #[test]
    fn last_duplicate_wins_in_the_cache() {
        let parsed = parse_dynamic_names(
            "<span class='dynamic_nameable' data-entity-id='1'>Ann</span>\
             <span class='dynamic_nameable' data-entity-id='1'>Anna</span>",
            &observer(),
        );

        let state = parsed
            .cache_updates
            .iter()
            .fold(RootState::default(), |state, action| reduce_root(&state, action));

        assert_eq!(
            state.dynamic_names_of(&observer()).name_of(&EntityId::from(1u64)),
            Some("Anna")
        );
    }
}
