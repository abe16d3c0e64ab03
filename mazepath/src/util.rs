use std::path::Path;

use anyhow::Context;
use image::{DynamicImage, GenericImageView};

use crate::GridMap;

/// Pixels darker than this are walls
pub const DEFAULT_THRESHOLD: u8 = 128;

pub fn parse_img(img: &DynamicImage, threshold: u8) -> Result<GridMap, anyhow::Error> {
    let width = img.width() as usize;
    let height = img.height() as usize;

    if width == 0 || height == 0 {
        anyhow::bail!("image has no pixels");
    }

    let mut cells = vec![vec![0u8; width]; height];

    for (row, cells_row) in cells.iter_mut().enumerate() {
        for (col, cell) in cells_row.iter_mut().enumerate() {
            let p = img.get_pixel(col as u32, row as u32);

            *cell = u8::from(p.0[0] < threshold);
        }
    }

    Ok(GridMap::from_rows(cells))
}

pub fn load_img(path: impl AsRef<Path>, threshold: u8) -> Result<GridMap, anyhow::Error> {
    let path = path.as_ref();
    let img = image::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    parse_img(&img, threshold)
}
