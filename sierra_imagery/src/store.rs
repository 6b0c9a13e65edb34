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

//! slot cache for enhanced images. The filesystem impl keeps one PNG plus a RON
//! metadata sidecar per slot under «root»/«region»/«year»/«role».*

use std::{fs, io::Write, path::{Path, PathBuf}};
use tracing::debug;

use sierra_common::fs::{ensure_writable_dir, filepath_contents, filepath_contents_as_string};

use crate::{errors::*, EnhancedImage, SlotKey, SlotMeta};

pub trait SlotStore: Send + Sync {
    fn has (&self, key: &SlotKey)->bool;
    fn get (&self, key: &SlotKey)->Result<Option<EnhancedImage>>;
    fn meta (&self, key: &SlotKey)->Result<Option<SlotMeta>>;

    /// store image and metadata for the given slot, replacing any previous content
    fn put (&self, key: &SlotKey, img: &EnhancedImage, meta: &SlotMeta)->Result<()>;

    /// ascending years for which the region has at least one stored slot
    fn list_available_years (&self, region: &str)->Result<Vec<i32>>;
}

pub struct FileStore {
    root: PathBuf,
}

/// a year dir only counts if at least one slot image survived - leftover empty dirs
/// must not show up as available years
fn has_slot_file (dir: &Path)->Result<bool> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.path().extension().map( |ext| ext == "png").unwrap_or(false) {
            return Ok(true)
        }
    }
    Ok(false)
}

impl FileStore {
    pub fn new (root: impl AsRef<Path>)->Result<Self> {
        ensure_writable_dir( root.as_ref())?;
        Ok( FileStore { root: root.as_ref().to_path_buf() })
    }

    fn slot_dir (&self, key: &SlotKey)->PathBuf {
        self.root.join( &key.region).join( key.year.to_string())
    }

    fn image_path (&self, key: &SlotKey)->PathBuf {
        self.slot_dir(key).join( format!("{}.png", key.role))
    }

    fn meta_path (&self, key: &SlotKey)->PathBuf {
        self.slot_dir(key).join( format!("{}.meta.ron", key.role))
    }

    /// write contents to a temp file in the target dir, then rename into place so
    /// readers never observe partial slot files
    fn write_atomic (&self, dir: &Path, path: &Path, contents: &[u8])->Result<()> {
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(contents)?;
        tmp.flush()?;
        tmp.persist(path).map_err( |e| SierraImageryError::IOError(e.error))?;
        Ok(())
    }
}

impl SlotStore for FileStore {
    fn has (&self, key: &SlotKey)->bool {
        self.image_path(key).is_file() && self.meta_path(key).is_file()
    }

    fn get (&self, key: &SlotKey)->Result<Option<EnhancedImage>> {
        let path = self.image_path(key);
        if !path.is_file() { return Ok(None) }

        let data = filepath_contents( &path)?;

        let (width, height) = match self.meta(key)? {
            Some(meta) => (meta.width, meta.height),
            None => {
                // meta sidecar lost, recover dimensions from the image itself
                let img = image::load_from_memory( &data)?;
                (img.width(), img.height())
            }
        };

        Ok( Some( EnhancedImage { data, width, height, format: crate::OUTPUT_FORMAT.to_string() }))
    }

    fn meta (&self, key: &SlotKey)->Result<Option<SlotMeta>> {
        let path = self.meta_path(key);
        if !path.is_file() { return Ok(None) }

        let contents = filepath_contents_as_string( &path)?;
        let meta = ron::from_str( &contents)
            .map_err( |e| SierraImageryError::MetaParseError( format!("{}: {:?}", path.display(), e)))?;
        Ok( Some(meta))
    }

    fn put (&self, key: &SlotKey, img: &EnhancedImage, meta: &SlotMeta)->Result<()> {
        let dir = self.slot_dir(key);
        ensure_writable_dir( &dir)?;

        let meta_ron = ron::ser::to_string_pretty( meta, ron::ser::PrettyConfig::default())
            .map_err( |e| SierraImageryError::MetaParseError( format!("{:?}", e)))?;

        self.write_atomic( &dir, &self.image_path(key), &img.data)?;
        self.write_atomic( &dir, &self.meta_path(key), meta_ron.as_bytes())?;

        debug!("stored slot {}", key);
        Ok(())
    }

    fn list_available_years (&self, region: &str)->Result<Vec<i32>> {
        let region_dir = self.root.join(region);
        if !region_dir.is_dir() { return Ok( Vec::new()) }

        let mut years: Vec<i32> = Vec::new();
        for entry in fs::read_dir( &region_dir)? {
            let entry = entry?;
            if entry.path().is_dir() && has_slot_file( &entry.path())? {
                if let Some(year) = entry.file_name().to_str().and_then( |s| s.parse::<i32>().ok()) {
                    years.push(year);
                }
            }
        }
        years.sort();
        Ok(years)
    }
}
