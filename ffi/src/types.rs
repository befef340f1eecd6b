//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, pointer + length instead of `Vec`, and
//! tagged enums with explicit discriminants. Conversion functions live here
//! to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use common_api::{ApiClient, ApiError, HttpMethod, MemoryCookieStore, NetworkStatus};

/// Opaque handle to an `ApiClient` plus the host-controlled state it reads.
/// C callers receive a pointer to this and pass it back into every function.
pub struct FfiApiClient {
    pub(crate) inner: ApiClient,
    pub(crate) network: NetworkStatus,
    pub(crate) cookies: MemoryCookieStore,
}

/// Convert to an owned C string. Interior NULs become U+FFFD instead of
/// failing the conversion.
pub(crate) fn c_string(s: impl Into<String>) -> *mut c_char {
    let s: String = s.into();
    CString::new(s.replace('\0', "\u{FFFD}"))
        .unwrap_or_default()
        .into_raw()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Put = 2,
    Delete = 3,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Put => FfiHttpMethod::Put,
            HttpMethod::Delete => FfiHttpMethod::Delete,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Produced by the `api_build_*` functions. The host executes it and passes
/// the response back through `api_parse_response`. `body` is a JSON C string
/// for POST/PUT and null otherwise.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: common_api::HttpRequest) -> *mut Self {
        let url = c_string(req.url);
        let body = match req.body {
            Some(b) => c_string(String::from_utf8_lossy(&b)),
            None => std::ptr::null_mut(),
        };

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Vec<FfiHeader> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: c_string(k),
                    value: c_string(v),
                })
                .collect();
            // Freed as a boxed slice of `headers_len` elements.
            Box::into_raw(ffi_headers.into_boxed_slice()) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url,
            headers,
            headers_len,
            body,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The host fills this in after executing a request and passes a pointer to
/// `api_parse_response`. The body is raw bytes since a guard prefix may
/// precede the JSON. The FFI layer reads but never frees these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const u8,
    pub body_len: usize,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiApiResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    NoConnectivity = 1,
    EmptyUrl = 2,
    InvalidUrl = 3,
    Transport = 4,
    JsonParse = 5,
    Panic = 6,
    NullArg = 7,
}

/// Tag that tells `api_free_result` what `FfiApiResult::data` points to.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiDataTag {
    None = 0,
    /// `data` is a `*mut FfiHttpRequest`.
    Request = 1,
    /// `data` is a `*mut c_char` holding the parsed value re-serialized as JSON.
    Json = 2,
}

/// Result envelope for build and parse operations.
///
/// On success `error_code` is `Ok`, `error_message` is null and `data` points
/// to the payload tagged by `data_tag`. On failure `error_code` names the
/// kind, `error_message` is a human-readable C string and `data` is null.
#[repr(C)]
pub struct FfiApiResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub data_tag: FfiDataTag,
    pub data: *mut std::ffi::c_void,
}

impl FfiApiResult {
    fn boxed(
        error_code: FfiErrorCode,
        error_message: *mut c_char,
        data_tag: FfiDataTag,
        data: *mut std::ffi::c_void,
    ) -> *mut Self {
        Box::into_raw(Box::new(FfiApiResult {
            error_code,
            error_message,
            data_tag,
            data,
        }))
    }

    /// Build a success result carrying a request for the host to execute.
    pub(crate) fn ok_request(req: common_api::HttpRequest) -> *mut Self {
        let data = FfiHttpRequest::from_core(req) as *mut std::ffi::c_void;
        Self::boxed(FfiErrorCode::Ok, std::ptr::null_mut(), FfiDataTag::Request, data)
    }

    /// Build a success result carrying a parsed JSON value.
    pub(crate) fn ok_json(value: &serde_json::Value) -> *mut Self {
        let data = c_string(value.to_string()) as *mut std::ffi::c_void;
        Self::boxed(FfiErrorCode::Ok, std::ptr::null_mut(), FfiDataTag::Json, data)
    }

    /// Build an error result from an `ApiError`.
    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let error_code = match &err {
            ApiError::NoConnectivity => FfiErrorCode::NoConnectivity,
            ApiError::EmptyUrl => FfiErrorCode::EmptyUrl,
            ApiError::InvalidUrl => FfiErrorCode::InvalidUrl,
            ApiError::Transport(_) => FfiErrorCode::Transport,
            ApiError::JsonParse(_) => FfiErrorCode::JsonParse,
        };
        Self::boxed(
            error_code,
            c_string(err.to_string()),
            FfiDataTag::None,
            std::ptr::null_mut(),
        )
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::boxed(
            FfiErrorCode::NullArg,
            c_string(format!("null argument: {name}")),
            FfiDataTag::None,
            std::ptr::null_mut(),
        )
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::boxed(
            FfiErrorCode::Panic,
            c_string(msg),
            FfiDataTag::None,
            std::ptr::null_mut(),
        )
    }
}
