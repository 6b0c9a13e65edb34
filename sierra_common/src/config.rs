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

//! RON config file lookup. Config files live in «local-root»/config/«id».ron where
//! «local-root» is the SIERRA_LOCAL env var or ./local as a fallback

use std::{fs::File, io::Read, path::Path};
use serde::de::DeserializeOwned;

use crate::define_error;

define_error!{ pub SierraConfigError =
    IOError(#[from] std::io::Error) : "IO error: {0}",
    ConfigFileNotFound(String) : "config file not found: {0}",
    ConfigParseError(String) : "error parsing config: {0}"
}

pub type Result<T> = std::result::Result<T, SierraConfigError>;

fn get_local_dir ()->String {
    match std::env::var("SIERRA_LOCAL") {
        Ok(local_root) => local_root,
        _ => "./local".to_string()
    }
}

/// load the RON config with the given id, e.g. `load_config::<ImageryConfig>("imagery")`
pub fn load_config <C: DeserializeOwned> (id: &str)->Result<C> {
    let pn = format!("{}/config/{}.ron", get_local_dir(), id);
    load_config_path( Path::new(&pn))
}

pub fn load_config_path <C: DeserializeOwned> (path: &Path)->Result<C> {
    if !path.is_file() {
        return Err( SierraConfigError::ConfigFileNotFound( path.to_string_lossy().to_string()))
    }

    let mut file = File::open(path)?;
    let len = file.metadata()?.len();
    let mut contents = String::with_capacity(len as usize);
    file.read_to_string(&mut contents)?;

    ron::from_str::<C>( contents.as_str())
        .map_err( |e| SierraConfigError::ConfigParseError( format!("{:?}", e)))
}
