use sdf::{Color, PixelBuffer};

const RAMP: &[u8] = b" .:-=+*#%@";

fn luminance(color: &Color) -> f32 {
    0.2126 * color.x + 0.7152 * color.y + 0.0722 * color.z
}

/// Box-filters `pixels` down to at most `columns` characters per line.
///
/// Terminal cells are about twice as tall as they are wide, so each character
/// covers a block twice as high as it is wide.
pub fn ascii_preview(pixels: &PixelBuffer, columns: u32) -> String {
    if pixels.is_empty() || columns == 0 {
        return String::new();
    }
    let step_x = (pixels.width() + columns - 1) / columns;
    let step_y = step_x * 2;
    let mut out = String::new();
    for block_y in (0..pixels.height()).step_by(step_y as usize) {
        for block_x in (0..pixels.width()).step_by(step_x as usize) {
            let mut sum = 0.0;
            let mut count = 0;
            for y in block_y..(block_y + step_y).min(pixels.height()) {
                for x in block_x..(block_x + step_x).min(pixels.width()) {
                    if let Some(color) = pixels.get(x, y) {
                        sum += luminance(&color);
                        count += 1;
                    }
                }
            }
            let level = (sum / count as f32).clamp(0.0, 1.0);
            let index = ((level * (RAMP.len() - 1) as f32).round() as usize).min(RAMP.len() - 1);
            out.push(RAMP[index] as char);
        }
        out.push('\n');
    }
    out
}
