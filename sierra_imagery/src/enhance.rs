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

//! deterministic image enhancement: flatten transparency onto white, boost contrast,
//! boost saturation, re-encode PNG. This is a pure function of the input bytes - the
//! same raw image always yields byte-identical output, which keeps cached slots stable

use image::{codecs::png::PngEncoder, DynamicImage, ExtendedColorType, ImageEncoder, RgbImage};

use crate::{errors::*, EnhancedImage, CONTRAST_BOOST_PCT, OUTPUT_FORMAT, SATURATION_BOOST};

/// enhance raw imagery bytes as delivered by a source. Decode failure maps to
/// `ImageError` so callers can tell a bad image from a transport problem
pub fn enhance (raw: &[u8])->Result<EnhancedImage> {
    let decoded = image::load_from_memory(raw)?;

    let flattened = flatten_onto_white( decoded);
    let contrasted = DynamicImage::ImageRgb8(flattened).adjust_contrast( CONTRAST_BOOST_PCT);
    let saturated = boost_saturation( contrasted.to_rgb8(), SATURATION_BOOST);

    let (width, height) = saturated.dimensions();
    let mut data: Vec<u8> = Vec::new();
    PngEncoder::new( &mut data).write_image( saturated.as_raw(), width, height, ExtendedColorType::Rgb8)?;

    Ok( EnhancedImage { data, width, height, format: OUTPUT_FORMAT.to_string() })
}

/// composite any alpha channel over a white background. GIBS tiles use transparency
/// for no-data areas, which would render black after PNG re-encoding
fn flatten_onto_white (img: DynamicImage)->RgbImage {
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();

    let mut out = RgbImage::new( w, h);
    for (x, y, px) in rgba.enumerate_pixels() {
        let [r, g, b, a] = px.0;
        let blend = |c: u8| -> u8 {
            (((c as u32) * (a as u32) + 255 * (255 - a as u32) + 127) / 255) as u8
        };
        out.put_pixel( x, y, image::Rgb( [blend(r), blend(g), blend(b)]));
    }
    out
}

fn boost_saturation (mut img: RgbImage, factor: f64)->RgbImage {
    for px in img.pixels_mut() {
        let [r, g, b] = px.0;
        let (h, s, v) = rgb_to_hsv( r, g, b);
        let s = (s as f64 * factor).min(1.0) as f32;
        px.0 = hsv_to_rgb( h, s, v);
    }
    img
}

/* #region HSV conversion ***********************************************************************/

fn rgb_to_hsv (r: u8, g: u8, b: u8)->(f32, f32, f32) {
    let r = r as f32 / 255.0;
    let g = g as f32 / 255.0;
    let b = b as f32 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta) % 6.0)
    } else if max == g {
        60.0 * (((b - r) / delta) + 2.0)
    } else {
        60.0 * (((r - g) / delta) + 4.0)
    };

    let h = if h < 0.0 { h + 360.0 } else { h };
    let s = if max == 0.0 { 0.0 } else { delta / max };

    (h, s, max)
}

fn hsv_to_rgb (h: f32, s: f32, v: f32)->[u8; 3] {
    let c = v * s;
    let hp = h / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());

    let (r1, g1, b1) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let m = v - c;
    let to_u8 = |f: f32| -> u8 { ((f + m) * 255.0 + 0.5) as u8 };

    [to_u8(r1), to_u8(g1), to_u8(b1)]
}

/* #endregion HSV conversion */
