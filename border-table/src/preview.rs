use border_core::{Bounds, MidpointTable, Point, Shape, marker_segments};
use png::{BitDepth, ColorType, Compression, Encoder, FilterType};

/// Region outlines plus a conflict cross at every table entry, as SVG.
/// Returns the document and its pixel size.
pub fn build_preview_svg(
    shapes: &[Shape],
    table: &MidpointTable,
    px_per_unit: f64,
    marker_half_len: f64,
) -> (String, u32, u32) {
    let pad = marker_half_len * 2.0;
    let bounds = shapes
        .iter()
        .filter_map(Shape::bounds)
        .reduce(|a, b| a.union(&b))
        .unwrap_or(Bounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 100.0,
            max_y: 100.0,
        });
    let w_px = ((bounds.width() + pad * 2.0) * px_per_unit).ceil().max(1.0) as u32;
    let h_px = ((bounds.height() + pad * 2.0) * px_per_unit).ceil().max(1.0) as u32;
    // shapes are already y-down
    let to_px = |p: Point| {
        (
            (p.x - bounds.min_x + pad) * px_per_unit,
            (p.y - bounds.min_y + pad) * px_per_unit,
        )
    };

    let mut s = String::new();
    s.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    s.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\" stroke=\"#333\" fill=\"none\" stroke-width=\"1.2\" stroke-linejoin=\"round\">\n",
        w_px, h_px, w_px, h_px
    ));
    s.push_str("<rect x=\"0\" y=\"0\" width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>\n");
    for shape in shapes {
        for ring in &shape.rings {
            s.push_str(&path_from_points(ring, &to_px));
        }
    }
    for (_key, p) in table.iter() {
        for (a, b) in marker_segments(*p, marker_half_len) {
            let (x0, y0) = to_px(a);
            let (x1, y1) = to_px(b);
            s.push_str(&format!(
                "<path d=\"M {:.2} {:.2} L {:.2} {:.2}\" stroke=\"#e53935\" stroke-width=\"2.5\" stroke-linecap=\"round\"/>\n",
                x0, y0, x1, y1
            ));
        }
    }
    s.push_str("</svg>\n");
    (s, w_px, h_px)
}

fn path_from_points<F>(pts: &[Point], to_px: &F) -> String
where
    F: Fn(Point) -> (f64, f64),
{
    let Some((first, rest)) = pts.split_first() else {
        return String::new();
    };
    let (x0, y0) = to_px(*first);
    let mut out = format!("<path d=\"M {:.2} {:.2}", x0, y0);
    for p in rest {
        let (x, y) = to_px(*p);
        out.push_str(&format!(" L {:.2} {:.2}", x, y));
    }
    out.push_str("\"/>\n");
    out
}

/// Rasterizes the preview SVG and writes it as PNG (deterministic bytes).
pub fn render_png(svg: &str, w_px: u32, h_px: u32, path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let opt = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg, &opt).map_err(|e| format!("SVG parse error: {e:?}"))?;
    let mut pixmap = tiny_skia::Pixmap::new(w_px, h_px).ok_or("pixmap alloc failed")?;
    let mut pm = pixmap.as_mut();
    resvg::render(&tree, tiny_skia::Transform::identity(), &mut pm);
    encode_png_deterministic(&pixmap, path)
}

fn encode_png_deterministic(
    pixmap: &tiny_skia::Pixmap,
    path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = std::fs::File::create(path)?;
    let mut enc = Encoder::new(file, pixmap.width(), pixmap.height());
    enc.set_color(ColorType::Rgba);
    enc.set_depth(BitDepth::Eight);
    enc.set_filter(FilterType::NoFilter);
    enc.set_compression(Compression::Default);
    let mut writer = enc.write_header()?;
    writer.write_image_data(pixmap.data())?;
    Ok(())
}
