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

pub type Result<T> = std::result::Result<T, SierraFirmsError>;

#[derive(Error, Debug)]
pub enum SierraFirmsError {
    #[error("IO error {0}")]
    IOError( #[from] std::io::Error),

    #[error("net error {0}")]
    NetError( #[from] sierra_common::net::SierraNetError),

    #[error("CSV error {0}")]
    CsvError( #[from] csv::Error),

    #[error("serde error {0}")]
    SerdeError( #[from] serde_json::Error),

    #[error("parse error {0}")]
    ParseError( String ),

    #[error("request failed {0}")]
    RequestFailed( String ),

    #[error("config error {0}")]
    ConfigError( String ),
}

pub fn parse_error (msg: impl ToString)->SierraFirmsError {
    SierraFirmsError::ParseError( msg.to_string())
}
