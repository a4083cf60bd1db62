//! C-compatible API for web front ends.
//!
//! Every call returning `*const c_char` hands ownership of a NUL-terminated
//! JSON string to the caller, who must release it with `cropcast_free_str`.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::error;

use crate::about::ABOUT_TEXT;
use crate::common::error::{YieldError, YieldResult};
use crate::engine::{self, Engine};
use crate::inference::Measurements;
use crate::validation::FIELD_RANGES;

/// ABI version to coordinate with the front end.
#[no_mangle]
pub extern "C" fn cropcast_api_version() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub crop: String,
    pub measurements: Measurements,
}

/// Handle a prediction request against an engine and return the response body.
pub fn handle_predict(engine: &Engine, request_json: &str) -> Value {
    let result = serde_json::from_str::<PredictRequest>(request_json)
        .map_err(|e| YieldError::invalid(format!("bad request: {e}")))
        .and_then(|req| engine.submit(&req.crop, &req.measurements));
    match result.and_then(|outcome| serde_json::to_value(outcome).map_err(YieldError::from)) {
        Ok(mut body) => {
            let ok = body.get("status").and_then(Value::as_str) == Some("estimated");
            body["ok"] = Value::Bool(ok);
            body
        }
        Err(err) => error_body(&err),
    }
}

/// Catalogue listing, optionally filtered by crop type.
pub fn handle_crops(engine: &Engine, crop_type: Option<&str>) -> Value {
    let listing = engine.crop_table().and_then(|table| {
        let records: Vec<_> = match crop_type {
            Some(t) => table.crops_of_type(t),
            None => table.records().iter().collect(),
        };
        Ok(json!({ "ok": true, "types": table.types(), "crops": records }))
    });
    listing.unwrap_or_else(|err| error_body(&err))
}

fn error_body(err: &YieldError) -> Value {
    json!({ "ok": false, "code": err.code() as u32, "error": err.to_string() })
}

/// Run a prediction; `request` is `{"crop": .., "measurements": {..}}`.
#[no_mangle]
pub extern "C" fn cropcast_predict(request: *const c_char) -> *const c_char {
    let body = match (read_str(request), engine::global()) {
        (Err(err), _) => error_body(&err),
        (_, Err(err)) => error_body(err),
        (Ok(input), Ok(engine)) => handle_predict(engine, &input),
    };
    value_to_raw(body)
}

/// List catalogue records; pass NULL for no type filter.
#[no_mangle]
pub extern "C" fn cropcast_crops(crop_type: *const c_char) -> *const c_char {
    let filter = if crop_type.is_null() {
        None
    } else {
        match read_str(crop_type) {
            Ok(s) => Some(s),
            Err(err) => return value_to_raw(error_body(&err)),
        }
    };
    match engine::global() {
        Ok(engine) => value_to_raw(handle_crops(engine, filter.as_deref())),
        Err(err) => value_to_raw(error_body(err)),
    }
}

/// Static "About" text.
#[no_mangle]
pub extern "C" fn cropcast_about() -> *const c_char {
    value_to_raw(json!({ "ok": true, "text": ABOUT_TEXT }))
}

/// Widget bounds, defaults and recommended ranges for the seven inputs.
#[no_mangle]
pub extern "C" fn cropcast_fields() -> *const c_char {
    value_to_raw(json!({ "ok": true, "fields": FIELD_RANGES }))
}

/// Free strings allocated by Rust.
#[no_mangle]
pub extern "C" fn cropcast_free_str(ptr: *const c_char) {
    if ptr.is_null() {
        return;
    }
    // SAFETY: `ptr` was produced by `CString::into_raw` in this module.
    unsafe {
        let _ = CString::from_raw(ptr as *mut c_char);
    }
}

fn read_str(ptr: *const c_char) -> YieldResult<String> {
    if ptr.is_null() {
        return Err(YieldError::invalid("null pointer"));
    }
    // SAFETY: caller guarantees a valid NUL-terminated string.
    Ok(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
}

fn value_to_raw(value: Value) -> *const c_char {
    match CString::new(value.to_string()) {
        Ok(cstring) => cstring.into_raw(),
        Err(e) => {
            error!(error = %e, "response contained an interior NUL");
            CString::new("{\"ok\":false}")
                .expect("static fallback json is valid")
                .into_raw()
        }
    }
}
