//! AWS Lambda handler for DCF valuations
//!
//! Accepts `ValuationInputs` as a JSON body (every field optional, rates as
//! fractions) and returns the full valuation report.
//!
//! Supports Lambda Function URLs for direct HTTP access.

use aws_lambda_events::event::lambda_function_urls::{
    LambdaFunctionUrlRequest, LambdaFunctionUrlResponse,
};
use dcf_valuation::{ValuationEngine, ValuationInputs, ValuationReport};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

fn response(status: i64, body: Option<String>) -> Result<LambdaFunctionUrlResponse, Error> {
    let mut response = LambdaFunctionUrlResponse {
        status_code: status,
        headers: Default::default(),
        body,
        is_base64_encoded: false,
        cookies: Vec::new(),
    };
    response.headers.insert("content-type", "application/json".parse()?);
    response.headers.insert("access-control-allow-origin", "*".parse()?);
    response.headers.insert("access-control-allow-methods", "POST, OPTIONS".parse()?);
    response.headers.insert("access-control-allow-headers", "Content-Type".parse()?);
    Ok(response)
}

fn error_body(message: &str) -> Result<String, serde_json::Error> {
    serde_json::to_string(&ErrorBody { error: message })
}

/// Map a request to its status code and JSON body
fn evaluate(
    method: Option<&str>,
    is_base64_encoded: bool,
    body: Option<&str>,
) -> Result<(i64, Option<String>), serde_json::Error> {
    // Handle CORS preflight
    if method == Some("OPTIONS") {
        return Ok((200, None));
    }

    if is_base64_encoded {
        return Ok((400, Some(error_body("Binary request bodies are not supported")?)));
    }

    let body = body.unwrap_or_default();
    let inputs: ValuationInputs = if body.trim().is_empty() {
        ValuationInputs::default()
    } else {
        match serde_json::from_str(body) {
            Ok(inputs) => inputs,
            Err(e) => return Ok((400, Some(error_body(&format!("Invalid JSON: {}", e))?))),
        }
    };

    match ValuationEngine::default().value(&inputs) {
        Ok(valuation) => {
            let report = ValuationReport::from_valuation(&valuation);
            Ok((200, Some(serde_json::to_string(&report)?)))
        }
        Err(e) => {
            log::info!("Rejected valuation request: {}", e);
            Ok((422, Some(error_body(&e.to_string())?)))
        }
    }
}

/// Lambda handler function
async fn handler(
    event: LambdaEvent<LambdaFunctionUrlRequest>,
) -> Result<LambdaFunctionUrlResponse, Error> {
    let request = event.payload;
    let (status, body) = evaluate(
        request.request_context.http.method.as_deref(),
        request.is_base64_encoded,
        request.body.as_deref(),
    )?;
    response(status, body)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
