//! Cairo-based rendering functions for stroke segments and raster blits.

use crate::input::{PaintMode, StyleState};
use crate::util::Point;

/// Renders one straight segment of a freehand stroke.
///
/// Draw mode composites the stroke color over existing pixels. Erase mode uses
/// [`cairo::Operator::Clear`], which removes content under the stroke instead of
/// adding color. Caps and joins are round so consecutive segments of a stroke
/// join without gaps.
///
/// # Arguments
/// * `ctx` - Cairo drawing context to render to
/// * `from` - Segment start in canvas coordinates
/// * `to` - Segment end in canvas coordinates
/// * `style` - Style active at the moment the segment is painted
pub fn render_segment(
    ctx: &cairo::Context,
    from: Point,
    to: Point,
    style: &StyleState,
) -> Result<(), cairo::Error> {
    match style.mode() {
        PaintMode::Draw => {
            let color = style.color();
            ctx.set_operator(cairo::Operator::Over);
            ctx.set_source_rgba(color.r, color.g, color.b, color.a);
        }
        PaintMode::Erase => {
            ctx.set_operator(cairo::Operator::Clear);
        }
    }

    ctx.set_line_width(style.width() as f64);
    ctx.set_line_cap(cairo::LineCap::Round);
    ctx.set_line_join(cairo::LineJoin::Round);

    ctx.move_to(from.x, from.y);
    ctx.line_to(to.x, to.y);
    ctx.stroke()
}

/// Resets every pixel of the target to fully transparent.
pub fn render_blank(ctx: &cairo::Context) -> Result<(), cairo::Error> {
    ctx.save()?;
    ctx.set_operator(cairo::Operator::Clear);
    let result = ctx.paint();
    ctx.restore()?;
    result
}

/// Copies `image` onto the target with its top-left corner at the origin.
///
/// With `replace` the target is overwritten (pixels outside the image become
/// transparent); otherwise the image is composited over existing content.
pub fn render_image_at_origin(
    ctx: &cairo::Context,
    image: &cairo::ImageSurface,
    replace: bool,
) -> Result<(), cairo::Error> {
    ctx.save()?;
    ctx.set_operator(if replace {
        cairo::Operator::Source
    } else {
        cairo::Operator::Over
    });
    ctx.set_source_surface(image, 0.0, 0.0)?;
    let result = ctx.paint();
    ctx.restore()?;
    result
}
