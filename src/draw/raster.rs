use imageproc::drawing::{Canvas as DrawCanvas, draw_line_segment_mut, draw_polygon_mut};
use imageproc::point::Point;

/// Draw an open polyline through `points`. A single point is plotted as one pixel.
pub fn draw_polyline<C>(canvas: &mut C, points: &[Point<i32>], color: C::Pixel)
where
    C: DrawCanvas,
{
    match points {
        [] => {}
        [p] => plot(canvas, *p, color),
        _ => {
            for w in points.windows(2) {
                draw_segment(canvas, w[0], w[1], color);
            }
        }
    }
}

/// Draw the closed outline of `points` (last point joined back to the first).
pub fn draw_closed_outline<C>(canvas: &mut C, points: &[Point<i32>], color: C::Pixel)
where
    C: DrawCanvas,
{
    draw_polyline(canvas, points, color);
    if let (Some(first), Some(last)) = (points.first(), points.last())
        && points.len() > 2
    {
        draw_segment(canvas, *last, *first, color);
    }
}

/// Fill the polygon described by `points`, boundary included.
///
/// Degenerate inputs (fewer than three distinct corners) are drawn as an outline so that
/// nothing ever panics on contour data.
pub fn fill_polygon<C>(canvas: &mut C, points: &[Point<i32>], color: C::Pixel)
where
    C: DrawCanvas,
{
    let mut poly = points.to_vec();
    while poly.len() > 1 && poly.first() == poly.last() {
        poly.pop();
    }
    if poly.len() < 3 {
        draw_closed_outline(canvas, &poly, color);
        return;
    }
    draw_polygon_mut(canvas, &poly, color);
    draw_closed_outline(canvas, &poly, color);
}

fn draw_segment<C>(canvas: &mut C, a: Point<i32>, b: Point<i32>, color: C::Pixel)
where
    C: DrawCanvas,
{
    draw_line_segment_mut(
        canvas,
        (a.x as f32, a.y as f32),
        (b.x as f32, b.y as f32),
        color,
    );
}

fn plot<C>(canvas: &mut C, p: Point<i32>, color: C::Pixel)
where
    C: DrawCanvas,
{
    let (w, h) = canvas.dimensions();
    if p.x >= 0 && p.y >= 0 && (p.x as u32) < w && (p.y as u32) < h {
        canvas.draw_pixel(p.x as u32, p.y as u32, color);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/draw/raster.rs"]
mod tests;
