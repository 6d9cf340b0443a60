use crate::utils::error::AppError;
use indexmap::IndexMap;
use okapi::openapi3::SchemaObject;
use rocket_okapi::gen::OpenApiGenerator;
use rocket_okapi::okapi::openapi3::RefOr;
use rocket_okapi::okapi::openapi3::{MediaType, Response, Responses};
use rocket_okapi::response::OpenApiResponderInner;
use serde_json::json;

impl OpenApiResponderInner for AppError {
    fn responses(_gen: &mut OpenApiGenerator) -> rocket_okapi::Result<Responses> {
        let mut responses = Responses::default();

        // One documented example per status the API can answer with
        let error_responses = [
            ("Bad Request", AppError::ValidationError("Phone Number must start with '+' followed by 11 to 14 digits".to_string())),
            ("Unauthorized", AppError::AuthError("Invalid credentials".to_string())),
            ("Forbidden", AppError::Forbidden("Ticket belongs to another customer".to_string())),
            ("Payment Required", AppError::PaymentFailure("Card declined".to_string())),
            ("Not Found", AppError::NotFound("Flight not found".to_string())),
            ("Conflict", AppError::Conflict("No seats remaining".to_string())),
            ("Internal Server Error", AppError::DatabaseError("Internal Server Error".to_string())),
        ];

        for (description, error) in error_responses {
            let mut content = IndexMap::new();
            content.insert(
                "application/json".to_string(),
                MediaType {
                    schema: Some(SchemaObject::default()),
                    example: Some(json!({
                        "error": error.to_string()
                    })),
                    ..Default::default()
                },
            );
            responses.responses.insert(
                error.status().code.to_string(),
                RefOr::Object(Response {
                    description: description.to_string(),
                    content,
                    ..Default::default()
                }),
            );
        }

        Ok(responses)
    }
}
