//! C-ABI wrapper around `common-api-core`.
//!
//! # Overview
//! Exposes the helper's I/O-free half through `extern "C"` functions: the host
//! builds a request (connectivity, URL, header and cookie handling happen
//! here), runs it on its own networking stack, and hands the raw response back
//! for prefix skipping and JSON decoding. The parameter helpers are exported
//! too so concrete API methods can be assembled on the host side.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Connectivity and cookies are host-fed: `api_client_set_online` and
//!   `api_client_set_cookie` update the state the client consults.
//! - A single `FfiApiResult` envelope with `FfiDataTag` + `void* data`
//!   conveys requests, parsed JSON and errors uniformly.
//! - The C caller owns all returned pointers and must call the matching
//!   `api_free_*` function to release them.

pub mod types;

use std::borrow::Cow;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use common_api::{
    method_key_substitute, method_params_from_map, ApiClient, ApiConfig, ApiError, HttpRequest,
    HttpResponse, MemoryCookieStore, NetworkStatus,
};
use serde_json::{Map, Value};

use types::*;

/// Borrow a C string as UTF-8. `None` if the bytes are not valid UTF-8.
///
/// # Safety
/// `ptr` must be non-null and point to a NUL-terminated string that outlives
/// the returned reference.
unsafe fn str_arg<'a>(ptr: *const c_char) -> Option<&'a str> {
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

/// Read a URL argument. Invalid UTF-8 turns into U+FFFD, which no valid URL
/// contains, so the core reports `InvalidUrl` after its connectivity check.
///
/// # Safety
/// Same contract as `str_arg`.
unsafe fn url_arg<'a>(ptr: *const c_char) -> Cow<'a, str> {
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy()
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new client from a JSON `ApiConfig`
/// (`{"skipResponseDataLength":5,"additionalHeaders":{...}}`).
///
/// A null `config_json` uses the default configuration. Returns null if the
/// configuration is not valid JSON or an internal panic occurs. The client
/// starts online with an empty cookie jar. Free with `api_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn api_client_new(config_json: *const c_char) -> *mut FfiApiClient {
    catch_unwind(AssertUnwindSafe(|| {
        let config = if config_json.is_null() {
            ApiConfig::default()
        } else {
            match unsafe { str_arg(config_json) }.map(ApiConfig::from_json) {
                Some(Ok(c)) => c,
                _ => return std::ptr::null_mut(),
            }
        };
        let network = NetworkStatus::online();
        let cookies = MemoryCookieStore::new();
        let inner = ApiClient::new(config)
            .with_connectivity(network.clone())
            .with_cookie_store(cookies.clone());
        Box::into_raw(Box::new(FfiApiClient {
            inner,
            network,
            cookies,
        }))
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `api_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn api_client_free(client: *mut FfiApiClient) {
    if !client.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(client) });
        }));
    }
}

/// Report platform reachability. While offline every build call fails with
/// `NoConnectivity`. No-op on a null client.
#[unsafe(no_mangle)]
pub extern "C" fn api_client_set_online(client: *const FfiApiClient, online: bool) {
    if client.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let client = unsafe { &*client };
        client.network.set_online(online);
    }));
}

/// Mirror one cookie from the platform cookie storage into the client.
/// A null `value` removes the cookie. Returns false on a null client or name.
#[unsafe(no_mangle)]
pub extern "C" fn api_client_set_cookie(
    client: *const FfiApiClient,
    name: *const c_char,
    value: *const c_char,
) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() || name.is_null() {
            return false;
        }
        let client = unsafe { &*client };
        let Some(name) = (unsafe { str_arg(name) }) else {
            return false;
        };
        if value.is_null() {
            client.cookies.remove(name);
        } else {
            let Some(value) = (unsafe { str_arg(value) }) else {
                return false;
            };
            client.cookies.set(name, value);
        }
        true
    }))
    .unwrap_or(false)
}

/// Record the cookie from a raw `Set-Cookie` header value the host received.
/// Returns false if the header carries no `name=value` pair.
#[unsafe(no_mangle)]
pub extern "C" fn api_client_store_set_cookie(
    client: *const FfiApiClient,
    header: *const c_char,
) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() || header.is_null() {
            return false;
        }
        let client = unsafe { &*client };
        unsafe { str_arg(header) }
            .and_then(|header| client.cookies.store_set_cookie_header(header))
            .is_some()
    }))
    .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

fn request_result(built: Result<HttpRequest, ApiError>) -> *mut FfiApiResult {
    match built {
        Ok(req) => FfiApiResult::ok_request(req),
        Err(e) => FfiApiResult::from_error(e),
    }
}

/// Parse a request body argument. Null means an empty object.
fn body_params(body_json: *const c_char) -> Result<Map<String, Value>, ApiError> {
    if body_json.is_null() {
        return Ok(Map::new());
    }
    let body = unsafe { str_arg(body_json) }
        .ok_or_else(|| ApiError::JsonParse("request body is not UTF-8".to_string()))?;
    match serde_json::from_str::<Value>(body)? {
        Value::Object(map) => Ok(map),
        _ => Err(ApiError::JsonParse(
            "request body must be a JSON object".to_string(),
        )),
    }
}

/// Shared body of `api_build_post` / `api_build_put`. Pre-flight errors take
/// precedence over a malformed body, as they do in the core.
fn build_with_body(
    client: *const FfiApiClient,
    url: *const c_char,
    body_json: *const c_char,
    build: fn(&ApiClient, &str, &Map<String, Value>) -> Result<HttpRequest, ApiError>,
) -> *mut FfiApiResult {
    if client.is_null() {
        return FfiApiResult::null_arg("client");
    }
    if url.is_null() {
        return FfiApiResult::null_arg("url");
    }
    let client = unsafe { &*client };
    let url = unsafe { url_arg(url) };
    match body_params(body_json) {
        Ok(params) => request_result(build(&client.inner, &url, &params)),
        Err(body_err) => match build(&client.inner, &url, &Map::new()) {
            Err(preflight) => FfiApiResult::from_error(preflight),
            Ok(_) => FfiApiResult::from_error(body_err),
        },
    }
}

/// Build a GET request.
///
/// Returns a result tagged `Request` on success, or an error result
/// (`NoConnectivity`, `EmptyUrl`, `InvalidUrl`, `NullArg`).
#[unsafe(no_mangle)]
pub extern "C" fn api_build_get(client: *const FfiApiClient, url: *const c_char) -> *mut FfiApiResult {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiApiResult::null_arg("client");
        }
        if url.is_null() {
            return FfiApiResult::null_arg("url");
        }
        let client = unsafe { &*client };
        request_result(client.inner.build_get(&unsafe { url_arg(url) }))
    }))
    .unwrap_or_else(|_| FfiApiResult::panic("panic in api_build_get"))
}

/// Build a POST request whose body is `body_json` (a JSON object, or null for
/// `{}`). A body that is not a JSON object yields `JsonParse`.
#[unsafe(no_mangle)]
pub extern "C" fn api_build_post(
    client: *const FfiApiClient,
    url: *const c_char,
    body_json: *const c_char,
) -> *mut FfiApiResult {
    catch_unwind(AssertUnwindSafe(|| build_with_body(client, url, body_json, ApiClient::build_post)))
        .unwrap_or_else(|_| FfiApiResult::panic("panic in api_build_post"))
}

/// Build a PUT request; same body rules as `api_build_post`.
#[unsafe(no_mangle)]
pub extern "C" fn api_build_put(
    client: *const FfiApiClient,
    url: *const c_char,
    body_json: *const c_char,
) -> *mut FfiApiResult {
    catch_unwind(AssertUnwindSafe(|| build_with_body(client, url, body_json, ApiClient::build_put)))
        .unwrap_or_else(|_| FfiApiResult::panic("panic in api_build_put"))
}

/// Build a DELETE request. `cookie_name` may be null; otherwise a stored
/// cookie of that name is forwarded as a header of the same name.
#[unsafe(no_mangle)]
pub extern "C" fn api_build_delete(
    client: *const FfiApiClient,
    url: *const c_char,
    cookie_name: *const c_char,
) -> *mut FfiApiResult {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiApiResult::null_arg("client");
        }
        if url.is_null() {
            return FfiApiResult::null_arg("url");
        }
        let client = unsafe { &*client };
        // A name that is not UTF-8 cannot match a stored cookie.
        let cookie_name = if cookie_name.is_null() {
            None
        } else {
            unsafe { str_arg(cookie_name) }
        };
        request_result(
            client
                .inner
                .build_delete(&unsafe { url_arg(url) }, cookie_name),
        )
    }))
    .unwrap_or_else(|_| FfiApiResult::panic("panic in api_build_delete"))
}

// ---------------------------------------------------------------------------
// Parse response function
// ---------------------------------------------------------------------------

/// Decode a response body the host received.
///
/// Returns a result tagged `Json` whose `data` is the value re-serialized as
/// a JSON C string, or a `JsonParse` error. A null body with zero length is
/// an empty body.
#[unsafe(no_mangle)]
pub extern "C" fn api_parse_response(
    client: *const FfiApiClient,
    response: *const FfiHttpResponse,
) -> *mut FfiApiResult {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiApiResult::null_arg("client");
        }
        if response.is_null() {
            return FfiApiResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        let body = if resp.body.is_null() || resp.body_len == 0 {
            Vec::new()
        } else {
            unsafe { std::slice::from_raw_parts(resp.body, resp.body_len) }.to_vec()
        };
        match client.inner.parse_response(HttpResponse::new(resp.status, body)) {
            Ok(value) => FfiApiResult::ok_json(&value),
            Err(e) => FfiApiResult::from_error(e),
        }
    }))
    .unwrap_or_else(|_| FfiApiResult::panic("panic in api_parse_response"))
}

// ---------------------------------------------------------------------------
// Parameter helpers
// ---------------------------------------------------------------------------

/// Build a `?k=v&...` query string from a JSON object of parameters.
///
/// Returns `""` for an empty object and null if `params_json` is null or not
/// a JSON object. Free with `api_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn api_method_params(params_json: *const c_char) -> *mut c_char {
    catch_unwind(AssertUnwindSafe(|| {
        if params_json.is_null() {
            return std::ptr::null_mut();
        }
        let parsed = unsafe { str_arg(params_json) }.map(serde_json::from_str::<Value>);
        match parsed {
            Some(Ok(Value::Object(map))) => c_string(method_params_from_map(&map)),
            _ => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Replace `{key}` in `method` with `value`.
///
/// Returns null when the placeholder is absent or any argument is null.
/// Free with `api_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn api_method_key_substitute(
    method: *const c_char,
    key: *const c_char,
    value: *const c_char,
) -> *mut c_char {
    catch_unwind(AssertUnwindSafe(|| {
        if method.is_null() || key.is_null() || value.is_null() {
            return std::ptr::null_mut();
        }
        let substituted = unsafe {
            match (str_arg(method), str_arg(key), str_arg(value)) {
                (Some(method), Some(key), Some(value)) => method_key_substitute(method, key, value),
                _ => None,
            }
        };
        match substituted {
            Some(s) => c_string(s),
            None => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` and every string it owns.
fn free_request(req: *mut FfiHttpRequest) {
    let req = unsafe { Box::from_raw(req) };
    if !req.url.is_null() {
        drop(unsafe { CString::from_raw(req.url) });
    }
    if !req.body.is_null() {
        drop(unsafe { CString::from_raw(req.body) });
    }
    if !req.headers.is_null() && req.headers_len > 0 {
        let headers = unsafe {
            Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                req.headers,
                req.headers_len as usize,
            ))
        };
        for h in headers.iter() {
            if !h.key.is_null() {
                drop(unsafe { CString::from_raw(h.key) });
            }
            if !h.value.is_null() {
                drop(unsafe { CString::from_raw(h.value) });
            }
        }
    }
}

/// Free an `FfiApiResult` returned by any `api_build_*` or
/// `api_parse_response` call. Safe to call with null. Uses `data_tag` to
/// determine what `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn api_free_result(result: *mut FfiApiResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
        if !result.data.is_null() {
            match result.data_tag {
                FfiDataTag::Request => free_request(result.data as *mut FfiHttpRequest),
                FfiDataTag::Json => drop(unsafe { CString::from_raw(result.data as *mut c_char) }),
                FfiDataTag::None => {}
            }
        }
    }));
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn api_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { CString::from_raw(s) });
        }));
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
