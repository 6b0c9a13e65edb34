/*
 * Copyright © 2026, the SierraVision project contributors.
 *
 * The "SierraVision" software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

//! common utility functions for network operations

use std::time::Duration;
use bytes::Bytes;
use reqwest::{header::CONTENT_TYPE, Client};

use crate::define_error;

define_error!{ pub SierraNetError =
    IOError(#[from] std::io::Error) : "IO error: {0}",
    HttpError(#[from] reqwest::Error) : "http error: {0}",
    OpFailed(String) : "operation failed: {0}"
}

pub type Result<T> = std::result::Result<T, SierraNetError>;

/// fully buffered response of a single GET request. Upstream imagery and hotspot
/// payloads are small (a few MB at most) so we don't bother with chunked retrieval
#[derive(Debug, Clone)]
pub struct HttpResponseData {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl HttpResponseData {
    pub fn is_success (&self)->bool {
        (200..300).contains( &self.status)
    }

    pub fn is_image (&self)->bool {
        self.content_type.as_deref().map( |ct| ct.starts_with("image/")).unwrap_or(false)
    }

    pub fn text (&self)->Result<String> {
        String::from_utf8( self.body.to_vec())
            .map_err( |e| SierraNetError::OpFailed( format!("response body not utf8: {e}")))
    }
}

/// GET the given url with an explicit per-request timeout and return the buffered
/// response. Note that non-2xx status is not an error here, callers decide what
/// a usable response is
pub async fn get_data (client: &Client, url: &str, timeout: Duration)->Result<HttpResponseData> {
    let response = client.get(url).timeout(timeout).send().await?;

    let status = response.status().as_u16();
    let content_type = response.headers().get(CONTENT_TYPE)
        .and_then( |v| v.to_str().ok())
        .map( |s| s.to_string());
    let body = response.bytes().await?;

    Ok( HttpResponseData { status, content_type, body })
}
