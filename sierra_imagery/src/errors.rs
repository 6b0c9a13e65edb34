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

use thiserror::Error;

use crate::SourceAttempt;

pub type Result<T> = std::result::Result<T, SierraImageryError>;

#[derive(Error, Debug)]
pub enum SierraImageryError {
    #[error("IO error {0}")]
    IOError( #[from] std::io::Error),

    #[error("net error {0}")]
    NetError( #[from] sierra_common::net::SierraNetError),

    #[error("image error {0}")]
    ImageError( #[from] image::ImageError),

    #[error("serde error {0}")]
    SerdeError( #[from] serde_json::Error),

    #[error("config error {0}")]
    ConfigError( String ),

    #[error("config load error {0}")]
    ConfigLoadError( #[from] sierra_common::config::SierraConfigError),

    #[error("meta parse error {0}")]
    MetaParseError( String ),

    #[error("unknown region {0}")]
    UnknownRegion( String ),

    #[error("unknown layer {0}")]
    UnknownLayer( String ),

    #[error("invalid response {0}")]
    InvalidResponse( String ),

    #[error("all sources failed: {}", format_attempts(.0))]
    ChainExhausted( Vec<SourceAttempt> ),

    #[error("operation cancelled {0}")]
    Cancelled( String ),
}

fn format_attempts (attempts: &[SourceAttempt])->String {
    attempts.iter()
        .map( |a| format!("{}: {}", a.source, a.reason))
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn config_error (msg: impl ToString)->SierraImageryError {
    SierraImageryError::ConfigError( msg.to_string())
}
