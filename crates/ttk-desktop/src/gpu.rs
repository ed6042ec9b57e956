//! Instanced-quad painter.
//!
//! Every background run, glyph and the cursor becomes one [`CellInstance`].
//! The surface uploads `Frame::instance_data` into a vertex buffer and draws
//! one unit quad per instance, sampling glyphs from its atlas by codepoint.

use crate::dirty::DirtyRegion;
use crate::paint::{paint_runs, FramePainter, Scene};
use crate::surface::Frame;
use ttk_core::Rgb;

/// Instance kind: solid fill.
pub const KIND_FILL: u32 = 0;
/// Instance kind: glyph.
pub const KIND_GLYPH: u32 = 1;
/// Instance kind: cursor block.
pub const KIND_CURSOR: u32 = 2;

/// Glyph flag: bold face.
pub const FLAG_BOLD: u32 = 1;
/// Glyph flag: underline.
pub const FLAG_UNDERLINE: u32 = 2;

/// GPU instance data for one quad.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CellInstance {
    pub bounds: [f32; 4], // x, y, width, height
    pub color: [f32; 4],  // r, g, b, a
    pub glyph: u32,       // codepoint for KIND_GLYPH
    pub kind: u32,
    pub flags: u32,
    pub _padding: u32,
}

impl CellInstance {
    fn new(bounds: [f32; 4], color: Rgb, kind: u32) -> Self {
        let [r, g, b] = color.to_normalized();
        Self {
            bounds,
            color: [r, g, b, 1.0],
            glyph: 0,
            kind,
            flags: 0,
            _padding: 0,
        }
    }
}

/// Painter producing packed instances.
#[derive(Debug, Default)]
pub struct GpuPainter {
    instances: Vec<CellInstance>,
}

impl GpuPainter {
    /// Instances of the last frame.
    #[must_use]
    pub fn instances(&self) -> &[CellInstance] {
        &self.instances
    }
}

impl FramePainter for GpuPainter {
    fn paint(&mut self, scene: &Scene<'_>, region: DirtyRegion) -> Frame {
        let mut frame = paint_runs(scene, region);
        let cw = scene.metrics.cell_width;
        let ch = scene.metrics.cell_height;

        self.instances.clear();
        self.instances.extend(
            frame
                .fills
                .iter()
                .map(|f| CellInstance::new([f.x, f.y, f.width, f.height], f.bg, KIND_FILL)),
        );
        for run in &frame.text {
            let flags = u32::from(run.bold) * FLAG_BOLD | u32::from(run.underline) * FLAG_UNDERLINE;
            for (i, glyph) in run.text.chars().enumerate() {
                let mut inst =
                    CellInstance::new([run.x + i as f32 * cw, run.y, cw, ch], run.fg, KIND_GLYPH);
                inst.glyph = u32::from(glyph);
                inst.flags = flags;
                self.instances.push(inst);
            }
        }
        if let Some(c) = frame.cursor {
            self.instances.push(CellInstance::new(
                [c.x, c.y, c.width, c.height],
                Rgb::WHITE,
                KIND_CURSOR,
            ));
        }

        frame.instance_data = bytemuck::cast_slice(&self.instances).to_vec();
        frame.instance_count = self.instances.len() as u32;
        frame
    }
}
