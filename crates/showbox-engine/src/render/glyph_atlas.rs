use std::collections::HashMap;

use fontdue::layout::GlyphRasterConfig;

pub(super) const ATLAS_SIZE: u32 = 2048;
const GLYPH_PADDING: u32 = 1; // pixels between glyphs in the atlas

/// Atlas region of a rasterized glyph.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(super) struct CachedGlyph {
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
}

/// Shelf packer: fills rows left to right, opening a new row when a glyph
/// does not fit horizontally.
#[derive(Debug)]
struct ShelfPacker {
    size: u32,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
    full: bool,
}

impl ShelfPacker {
    fn new(size: u32) -> Self {
        Self { size, cursor_x: GLYPH_PADDING, cursor_y: GLYPH_PADDING, row_height: 0, full: false }
    }

    /// Reserves a `w`×`h` region and returns its top-left, or `None` once full.
    fn place(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        if self.full {
            return None;
        }
        if self.cursor_x + w + GLYPH_PADDING > self.size {
            self.cursor_y += self.row_height + GLYPH_PADDING;
            self.cursor_x = GLYPH_PADDING;
            self.row_height = 0;
        }
        if self.cursor_y + h + GLYPH_PADDING > self.size || w + 2 * GLYPH_PADDING > self.size {
            self.full = true;
            return None;
        }
        let at = (self.cursor_x, self.cursor_y);
        self.cursor_x += w + GLYPH_PADDING;
        self.row_height = self.row_height.max(h);
        Some(at)
    }
}

/// R8 coverage atlas. Glyphs are rasterized with fontdue on first use and
/// cached for the renderer's lifetime, keyed by font, glyph index and size.
pub(super) struct GlyphAtlas {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    packer: ShelfPacker,
    cache: HashMap<GlyphRasterConfig, CachedGlyph>,
    warned_full: bool,
}

impl GlyphAtlas {
    pub(super) fn new(device: &wgpu::Device) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("showbox glyph atlas"),
            size: wgpu::Extent3d { width: ATLAS_SIZE, height: ATLAS_SIZE, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            packer: ShelfPacker::new(ATLAS_SIZE),
            cache: HashMap::new(),
            warned_full: false,
        }
    }

    pub(super) fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// Returns the atlas region for `key`, rasterizing and uploading it on a miss.
    pub(super) fn glyph(
        &mut self,
        queue: &wgpu::Queue,
        font: &fontdue::Font,
        key: GlyphRasterConfig,
    ) -> Option<CachedGlyph> {
        if let Some(cached) = self.cache.get(&key) {
            return Some(*cached);
        }

        let (metrics, bitmap) = font.rasterize_config(key);
        if metrics.width == 0 || metrics.height == 0 {
            return None;
        }
        let (w, h) = (metrics.width as u32, metrics.height as u32);

        let Some((gx, gy)) = self.packer.place(w, h) else {
            if !self.warned_full {
                log::warn!("glyph atlas is full ({ATLAS_SIZE}x{ATLAS_SIZE}); some glyphs will not be drawn");
                self.warned_full = true;
            }
            return None;
        };

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d { x: gx, y: gy, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            &bitmap,
            wgpu::TexelCopyBufferLayout { offset: 0, bytes_per_row: Some(w), rows_per_image: Some(h) },
            wgpu::Extent3d { width: w, height: h, depth_or_array_layers: 1 },
        );

        let atlas_f = ATLAS_SIZE as f32;
        let glyph = CachedGlyph {
            uv_min: [gx as f32 / atlas_f, gy as f32 / atlas_f],
            uv_max: [(gx + w) as f32 / atlas_f, (gy + h) as f32 / atlas_f],
        };
        self.cache.insert(key, glyph);
        Some(glyph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_left_to_right_then_wraps() {
        let mut packer = ShelfPacker::new(32);
        assert_eq!(packer.place(10, 5), Some((1, 1)));
        assert_eq!(packer.place(10, 8), Some((12, 1)));
        // 23 + 10 + 1 > 32: new row below the tallest glyph so far.
        assert_eq!(packer.place(10, 4), Some((1, 10)));
    }

    #[test]
    fn reports_full_and_stays_full() {
        let mut packer = ShelfPacker::new(16);
        assert_eq!(packer.place(14, 14), Some((1, 1)));
        assert_eq!(packer.place(2, 2), None);
        assert_eq!(packer.place(1, 1), None);
    }

    #[test]
    fn oversized_glyph_is_rejected() {
        let mut packer = ShelfPacker::new(16);
        assert_eq!(packer.place(20, 2), None);
    }
}
