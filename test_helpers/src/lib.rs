//! Document fixtures shared across crates.
//!
//! The fixtures are plain JSON trees so the helpers stay independent of the
//! model crate; tests read them through whichever backend they exercise.

use serde_json::{Value, json};

/// A small but representative pet-store document: nested kinds, an
/// unwrapped path map, component schemas, tags and vendor extensions.
#[must_use]
pub fn petstore_document() -> Value {
    json!({
        "openapi": "3.1.0",
        "info": {
            "title": "Pet Store",
            "version": "1.0.0",
            "contact": {"name": "API Support", "email": "support@pets.example"},
            "x-audience": "external"
        },
        "servers": [
            {"url": "https://api.pets.example/v1", "description": "Production"}
        ],
        "tags": [
            {"name": "pets", "description": "Pet operations"}
        ],
        "paths": {
            "/pets": {
                "get": {
                    "operationId": "listPets",
                    "tags": ["pets"],
                    "responses": {
                        "200": {
                            "description": "A list of pets",
                            "content": {
                                "application/json": {
                                    "schema": {"$ref": "#/components/schemas/PetList"}
                                }
                            }
                        },
                        "default": {"$ref": "#/components/responses/Error"}
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Pet": {
                    "type": ["object"],
                    "required": ["name"],
                    "properties": {
                        "name": {"type": ["string"]},
                        "tag": {"type": ["string", "null"]}
                    },
                    "additionalProperties": false
                },
                "PetList": {
                    "type": ["array"],
                    "items": {"$ref": "#/components/schemas/Pet"}
                }
            },
            "responses": {
                "Error": {
                    "description": "Unexpected error",
                    "content": {
                        "application/json": {
                            "schema": {"type": ["object"]}
                        }
                    }
                }
            }
        },
        "x-build": {"commit": "f3a9c2", "pipeline": 42}
    })
}

/// A partial document in the shape a declaration scanner would produce:
/// operations and schemas only, no top-level metadata.
#[must_use]
pub fn declarations_document() -> Value {
    json!({
        "paths": {
            "/pets": {
                "get": {
                    "operationId": "listPets",
                    "summary": "List all pets",
                    "deprecated": false
                },
                "post": {
                    "operationId": "createPet",
                    "tags": ["pets"]
                }
            }
        },
        "components": {
            "schemas": {
                "Pet": {
                    "type": ["object"],
                    "properties": {
                        "name": {"type": ["string"]},
                        "age": {"type": ["integer"]}
                    }
                }
            }
        },
        "tags": [
            {"name": "pets"},
            {"name": "store", "description": "Store operations"}
        ]
    })
}

/// A minimal programmatic-reader document carrying only metadata.
#[must_use]
pub fn reader_document() -> Value {
    json!({
        "openapi": "3.1.0",
        "info": {
            "title": "Reader Title",
            "version": "9.9.9",
            "description": "Supplied programmatically"
        }
    })
}
