//! Fills the operations of a Swagger 2.0 petstore document end to end.

use std::path::PathBuf;

use paramfill_core::{
    fill_operation, fill_operations, Error, FillValue, OpenApiContext, Operation, Parameter,
    ParameterHandler,
};
use serde_json::json;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/petstore.swagger.json")
}

async fn petstore() -> (OpenApiContext, Vec<Operation>) {
    let spec = OpenApiContext::from_file(fixture()).await.unwrap();
    let operations = spec.parse_operations().unwrap();
    (spec, operations)
}

fn take(operations: &[Operation], id: &str) -> Operation {
    operations
        .iter()
        .find(|op| op.id == id)
        .cloned()
        .unwrap_or_else(|| panic!("operation {id} not found"))
}

#[tokio::test]
async fn lists_every_operation() {
    let (spec, operations) = petstore().await;
    assert_eq!(spec.title(), Some("Swagger Petstore"));

    let mut ids: Vec<&str> = operations.iter().map(|op| op.id.as_str()).collect();
    ids.sort_unstable();
    assert_eq!(
        ids,
        vec![
            "addPet",
            "findPetsByStatus",
            "getPetById",
            "get_user_{username}",
            "plantTree",
            "updatePetWithForm",
            "uploadFile",
        ]
    );
}

#[tokio::test]
async fn fills_body_model() {
    let (spec, operations) = petstore().await;
    let mut handler = ParameterHandler::new(&spec, take(&operations, "addPet"));
    let filled = handler.resolve_operation_parameters(false).unwrap();

    let body = filled.params["body"].fill.as_ref().unwrap().to_json();
    assert_eq!(
        body,
        json!({
            "birthday": "2017-06-30T23:59:45",
            "category": {"id": 42, "name": "John Smith"},
            "id": 42,
            "name": "John Smith",
            "photoUrls": ["paramfill"],
            "status": "available",
            "tags": [{"id": 42, "name": "John Smith"}]
        })
    );
}

#[tokio::test]
async fn fills_query_array_and_repaired_default() {
    let (spec, operations) = petstore().await;
    let mut handler = ParameterHandler::new(&spec, take(&operations, "findPetsByStatus"));

    let required = handler.resolve_operation_parameters(false).unwrap();
    assert_eq!(
        required.params["status"].fill.as_ref().unwrap().to_json(),
        json!(["available"])
    );
    assert!(required.params["limit"].fill.is_none());

    let all = handler.resolve_operation_parameters(true).unwrap();
    assert_eq!(all.params["limit"].fill, Some(FillValue::Json(json!(0))));
}

#[tokio::test]
async fn bounded_path_parameter_is_reproducible() {
    let (spec, operations) = petstore().await;
    let operation = take(&operations, "getPetById");

    let first = ParameterHandler::new(&spec, operation.clone())
        .resolve_operation_parameters(false)
        .unwrap();
    let second = ParameterHandler::new(&spec, operation)
        .resolve_operation_parameters(false)
        .unwrap();

    let value = first.params["petId"].fill.as_ref().unwrap().to_json();
    let pet_id = value.as_i64().unwrap();
    assert!((1..=10).contains(&pet_id), "petId {pet_id} out of bounds");
    assert_eq!(first.params["petId"].fill, second.params["petId"].fill);
}

#[tokio::test]
async fn fills_files_dates_and_names() {
    let (spec, operations) = petstore().await;

    let upload = ParameterHandler::new(&spec, take(&operations, "uploadFile"))
        .resolve_operation_parameters(false)
        .unwrap();
    match upload.params["file"].fill.as_ref().unwrap() {
        FillValue::File(file) => {
            assert_eq!(file.file_name, "cat.png");
            assert_eq!(file.content_type, "image/png");
        }
        other => panic!("expected a file, got {other:?}"),
    }

    let user = ParameterHandler::new(&spec, take(&operations, "get_user_{username}"))
        .resolve_operation_parameters(false)
        .unwrap();
    assert_eq!(
        user.params["username"].fill.as_ref().unwrap().to_json(),
        json!("john.smith")
    );
    assert_eq!(
        user.params["since"].fill.as_ref().unwrap().to_json(),
        json!("2017-06-30")
    );
}

#[tokio::test]
async fn optional_variants_only_for_operations_with_optional_parameters() {
    let (spec, operations) = petstore().await;
    let selected: Vec<Operation> = ["getPetById", "updatePetWithForm"]
        .iter()
        .map(|id| take(&operations, id))
        .collect();

    let filled = fill_operations(&spec, selected, true);
    let modes: Vec<(&str, bool)> = filled
        .iter()
        .map(|f| (f.operation.id.as_str(), f.include_optional))
        .collect();
    assert_eq!(
        modes,
        vec![
            ("getPetById", false),
            ("updatePetWithForm", false),
            ("updatePetWithForm", true)
        ]
    );

    let with_optional = &filled[2].operation;
    assert_eq!(
        with_optional.params["name"].fill,
        Some(FillValue::Json(json!("John Smith")))
    );
    // "format": "string" was repaired away, the heuristics still apply.
    assert_eq!(
        with_optional.params["status"].fill,
        Some(FillValue::Json(json!("paramfill")))
    );
}

#[tokio::test]
async fn recursive_model_fails() {
    let (spec, operations) = petstore().await;
    let mut handler = ParameterHandler::new(&spec, take(&operations, "plantTree"));

    let err = handler.resolve_operation_parameters(false).unwrap_err();
    assert!(matches!(err, Error::ParameterResolution(_)), "{err}");
}

#[tokio::test]
async fn recursive_model_does_not_stop_the_batch() {
    let (spec, operations) = petstore().await;
    assert_eq!(operations.len(), 7);

    let filled = fill_operations(&spec, operations, false);
    let mut ids: Vec<&str> = filled.iter().map(|f| f.operation.id.as_str()).collect();
    ids.sort_unstable();
    assert_eq!(
        ids,
        vec![
            "addPet",
            "findPetsByStatus",
            "getPetById",
            "get_user_{username}",
            "updatePetWithForm",
            "uploadFile",
        ]
    );
}

#[tokio::test]
async fn optional_recursive_property_fails_its_operation_only() {
    let spec = OpenApiContext {
        json: json!({
            "paths": {},
            "definitions": {
                "Category": {
                    "type": "object",
                    "properties": {
                        "name": {"type": "string"},
                        "parent": {"$ref": "#/definitions/Category"}
                    }
                }
            }
        }),
    };
    let recursive = Operation::new("addCategory", "post", "/category").with_param(
        Parameter::from_spec(json!({
            "name": "body", "in": "body", "required": true,
            "schema": {"$ref": "#/definitions/Category"}
        }))
        .unwrap(),
    );
    let plain = Operation::new("ping", "get", "/ping");

    assert!(matches!(
        fill_operation(&spec, recursive.clone(), false),
        Err(Error::ParameterResolution(_))
    ));

    let filled = fill_operations(&spec, vec![recursive, plain], false);
    assert_eq!(filled.len(), 1);
    assert_eq!(filled[0].operation.id, "ping");
}
