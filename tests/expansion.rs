//! End-to-end tests driving the public API against realistic, multi-file documents.

use serde_json::{json, Value};
use std::fs;
use tempfile::tempdir;
use unrelated_ref_expander::model::Document;
use unrelated_ref_expander::{default_loader, expand_spec, resolve_ref, ExpandOptions};

#[test]
fn expand_spec_resolves_a_ref_spread_across_two_files() {
    let dir = tempdir().expect("tempdir");
    fs::write(
        dir.path().join("definitions.json"),
        json!({
            "definitions": {
                "Pet": {
                    "type": "object",
                    "properties": {
                        "name": {"type": "string"},
                        "owner": {"$ref": "owner.json#/definitions/Owner"}
                    }
                }
            }
        })
        .to_string(),
    )
    .expect("write definitions.json");

    fs::write(
        dir.path().join("owner.json"),
        json!({
            "definitions": {
                "Owner": {"type": "object", "properties": {"email": {"type": "string"}}}
            }
        })
        .to_string(),
    )
    .expect("write owner.json");

    let spec_path = dir.path().join("spec.json");
    let mut doc: Document = serde_json::from_value(json!({
        "swagger": "2.0",
        "paths": {
            "/pets/{id}": {
                "get": {
                    "parameters": [
                        {"name": "id", "in": "path", "required": true, "type": "string"}
                    ],
                    "responses": {
                        "200": {
                            "description": "a pet",
                            "schema": {"$ref": "definitions.json#/definitions/Pet"}
                        },
                        "404": {"description": "not found"}
                    }
                }
            }
        }
    }))
    .expect("decode spec");

    let options = ExpandOptions::new()
        .with_relative_base(spec_path.to_string_lossy().to_string())
        .with_path_loader(default_loader());

    expand_spec(&mut doc, &options).expect("expand_spec succeeds");

    let response = &doc.paths["/pets/{id}"].get.as_ref().unwrap().responses["200"];
    let pet = response.schema.as_ref().expect("pet schema inlined");
    assert!(pet.ref_.is_none());
    let owner = pet
        .properties
        .as_ref()
        .and_then(|p| p.get("owner"))
        .expect("owner property present");
    assert!(owner.ref_.is_none(), "cross-file ref should be fully inlined");
    assert!(owner
        .properties
        .as_ref()
        .map(|p| p.contains_key("email"))
        .unwrap_or(false));
}

#[test]
fn expand_spec_continue_on_error_keeps_going_past_a_missing_ref() {
    let mut doc: Document = serde_json::from_value(json!({
        "swagger": "2.0",
        "definitions": {
            "Good": {"type": "string"},
            "Bad": {"$ref": "#/definitions/DoesNotExist"},
            "UsesGood": {"$ref": "#/definitions/Good"}
        },
        "paths": {}
    }))
    .expect("decode spec");

    let options = ExpandOptions::new().with_continue_on_error(true);
    expand_spec(&mut doc, &options).expect("continue_on_error swallows the bad ref");

    assert_eq!(
        doc.definitions["Bad"].ref_.as_deref(),
        Some("#/definitions/DoesNotExist")
    );
    assert_eq!(
        doc.definitions["UsesGood"].type_.as_ref().and_then(Value::as_str),
        Some("string")
    );
}

#[test]
fn resolve_ref_does_not_mutate_the_root() {
    let root = json!({
        "definitions": {
            "A": {"type": "string"},
            "B": {"$ref": "#/definitions/A"}
        }
    });

    let resolved: unrelated_ref_expander::model::Schema =
        resolve_ref(&root, "#/definitions/B").expect("resolves");
    assert_eq!(resolved.ref_.as_deref(), Some("#/definitions/A"));

    // Root is untouched: resolve_ref looks up the node addressed by B's pointer, one hop, and
    // does not follow the nested $ref itself.
    assert_eq!(root["definitions"]["B"]["$ref"], json!("#/definitions/A"));
}

#[test]
fn expand_spec_handles_shared_path_item_ref() {
    let mut doc: Document = serde_json::from_value(json!({
        "swagger": "2.0",
        "definitions": {
            "Pet": {"type": "object", "properties": {"name": {"type": "string"}}}
        },
        "paths": {
            "/pets": {
                "$ref": "#/paths/~1shared"
            },
            "/shared": {
                "get": {
                    "responses": {
                        "200": {
                            "description": "ok",
                            "schema": {"$ref": "#/definitions/Pet"}
                        }
                    }
                }
            }
        }
    }))
    .expect("decode spec");

    expand_spec(&mut doc, &ExpandOptions::default()).expect("expand_spec succeeds");

    let pets = &doc.paths["/pets"];
    assert!(pets.ref_.is_none(), "shared path item ref must be merged away");
    let response = &pets.get.as_ref().expect("get operation merged in").responses["200"];
    assert!(response.schema.as_ref().unwrap().ref_.is_none());
}
