//! Integration tests for entity dispatch and re-entrant rendering.

use richtext::error::Result;
use richtext::model::{Entity, Node, NodeType, ReferenceTable, RichText};
use richtext::render::{
    to_html, DocumentWalker, Element, EntityRegistry, LayoutParent, Output, RenderContext,
    RenderOptions, RenderScope, RichTextFieldRenderer,
};
use serde_json::json;

fn body(content: serde_json::Value) -> serde_json::Value {
    json!({"json": {"nodeType": "document", "content": content}})
}

fn embed(id: &str) -> RichText {
    RichText::new(
        Node::document(vec![Node::reference(NodeType::EmbeddedEntryBlock, id)]),
        ReferenceTable::new(),
    )
    .unwrap()
}

fn with_entries(id: &str, entries: Vec<Entity>) -> RichText {
    let table = entries
        .into_iter()
        .fold(ReferenceTable::new(), ReferenceTable::with_entry);
    RichText::new(
        Node::document(vec![Node::reference(NodeType::EmbeddedEntryBlock, id)]),
        table,
    )
    .unwrap()
}

fn badge(entity: &Entity, _scope: &mut RenderScope<'_>, _context: &RenderContext) -> Result<Output> {
    let label = entity.str_field("label").unwrap_or("?");
    Ok(Element::new("span")
        .with_attr("class", "badge")
        .with_child(Output::text(label))
        .into())
}

fn parent_name(
    _entity: &Entity,
    _scope: &mut RenderScope<'_>,
    context: &RenderContext,
) -> Result<Output> {
    let name = context.parent().map(|p| p.to_string()).unwrap_or_default();
    Ok(Output::text(name))
}

#[test]
fn test_card_body_renders_without_gutters() {
    let person = Entity::new("p1", "ComponentCardPerson").with_field(
        "bio",
        body(json!([
            {"nodeType": "paragraph", "content": [{"nodeType": "text", "value": "Engineer"}]}
        ])),
    );
    let walker = DocumentWalker::new().with_entity_renderer(
        "ComponentCardPerson",
        RichTextFieldRenderer::new("bio", LayoutParent::CardPerson),
    );
    let result = walker
        .render(&with_entries("p1", vec![person]), &RenderContext::root())
        .unwrap();

    assert_eq!(
        to_html(&result.output),
        "<div class=\"embedded-entry\"><div data-entity=\"ComponentCardPerson\">\
         <div class=\"container container--gutterless\"><p>Engineer</p></div>\
         </div></div>"
    );
    assert_eq!(result.stats.dispatched_entity_count, 1);
}

#[test]
fn test_nested_document_resolves_its_own_references() {
    // The card body embeds a badge that lives in the body's
    // own reference table, not the outer document's.
    let card = Entity::new("c1", "ComponentInfoBlock").with_field(
        "body",
        json!({
            "json": {"nodeType": "document", "content": [{
                "nodeType": "embedded-entry-block",
                "data": {"target": {"sys": {"id": "b1"}}},
                "content": []
            }]},
            "links": {"entries": {"block": [
                {"sys": {"id": "b1"}, "__typename": "Badge", "label": "new"}
            ]}}
        }),
    );
    let walker = DocumentWalker::new()
        .with_entity_renderer(
            "ComponentInfoBlock",
            RichTextFieldRenderer::new("body", LayoutParent::InfoBlock),
        )
        .with_entity_renderer("Badge", badge);

    let result = walker
        .render(&with_entries("c1", vec![card]), &RenderContext::root())
        .unwrap();
    assert_eq!(result.output.plain_text(), "new");
    assert_eq!(result.stats.dispatched_entity_count, 2);
    assert_eq!(result.stats.fallback_count, 0);
}

#[test]
fn test_entity_renderer_sees_context_parent() {
    let walker = DocumentWalker::new().with_entity_renderer("ParentAware", parent_name);
    let doc = with_entries("x", vec![Entity::new("x", "ParentAware")]);

    let top = walker.render(&doc, &RenderContext::root()).unwrap();
    assert_eq!(top.output.plain_text(), "");

    let inside = walker
        .render(&doc, &RenderContext::within(LayoutParent::Duplex))
        .unwrap();
    assert_eq!(inside.output.plain_text(), "duplex");
}

#[test]
fn test_unknown_entity_type_renders_type_tag() {
    let result = DocumentWalker::new()
        .render(
            &with_entries("e1", vec![Entity::new("e1", "ComponentTeaser")]),
            &RenderContext::root(),
        )
        .unwrap();
    assert_eq!(result.output.plain_text(), "ComponentTeaser");
    assert_eq!(result.stats.fallback_count, 1);
    assert_eq!(result.stats.dispatched_entity_count, 0);

    let untyped = DocumentWalker::new()
        .render(
            &with_entries("e2", vec![Entity::new("e2", "")]),
            &RenderContext::root(),
        )
        .unwrap();
    assert_eq!(untyped.output.plain_text(), "e2");
}

#[test]
fn test_missing_entry_falls_back_before_dispatch() {
    let walker = DocumentWalker::new().with_entity_renderer("Badge", badge);
    let result = walker.render(&embed("gone"), &RenderContext::root()).unwrap();
    assert_eq!(result.output.plain_text(), "embedded-entry-block gone");
    assert_eq!(result.stats.dispatched_entity_count, 0);
}

#[test]
fn test_replacing_entity_registry() {
    let mut entities = EntityRegistry::new();
    entities.register("Badge", badge);
    assert!(entities.contains("Badge"));
    assert!(!entities.contains("Asset"));

    let walker = DocumentWalker::new().with_entities(entities);
    let doc = RichText::new(
        Node::document(vec![
            Node::reference(NodeType::EmbeddedEntryBlock, "b1"),
            Node::reference(NodeType::EmbeddedAssetBlock, "a1"),
        ]),
        ReferenceTable::new()
            .with_entry(Entity::new("b1", "Badge").with_field("label", "hot"))
            .with_asset(Entity::new("a1", "Asset").with_field("url", "/a.png")),
    )
    .unwrap();

    let result = walker.render(&doc, &RenderContext::root()).unwrap();
    // Without the default asset renderer the asset's type tag is rendered.
    assert_eq!(result.output.plain_text(), "hotAsset");
}

#[test]
fn test_self_referencing_entry_is_depth_bounded() {
    // An entry whose body embeds the entry itself.
    let looped = Entity::new("loop", "ComponentQuote").with_field(
        "quote",
        json!({
            "json": {"nodeType": "document", "content": [
                {"nodeType": "paragraph", "content": [{"nodeType": "text", "value": "again"}]},
                {
                    "nodeType": "embedded-entry-block",
                    "data": {"target": {"sys": {"id": "loop"}}},
                    "content": []
                }
            ]},
            "links": {"entries": {"block": [{
                "sys": {"id": "loop"},
                "__typename": "ComponentQuote",
                "quote": {"json": {"nodeType": "document", "content": [{
                    "nodeType": "embedded-entry-block",
                    "data": {"target": {"sys": {"id": "loop"}}},
                    "content": []
                }]}}
            }]}}
        }),
    );
    let walker = DocumentWalker::new()
        .with_options(RenderOptions::new().with_max_depth(1))
        .with_entity_renderer(
            "ComponentQuote",
            RichTextFieldRenderer::new("quote", LayoutParent::Quote),
        );

    let result = walker
        .render(&with_entries("loop", vec![looped]), &RenderContext::root())
        .unwrap();

    // Depth 1 renders the first body; the entry it embeds would be a second
    // hop and fails in place.
    assert_eq!(result.stats.error_count, 1);
    assert_eq!(result.output.errors().len(), 1);
    assert!(result.output.plain_text().contains("again"));
}
