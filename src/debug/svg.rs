use std::{fmt, io, path};

use crate::{ConstrainedTriangulation, DomainLabels, kernel::Kernel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum SvgOutputLevel {
    None,
    ResultOnly,
    MajorSteps,
    AllSteps,
}

pub(crate) struct SvgOutput<'a, Style> {
    pub context: &'a SvgContext,
    pub style: Style,
    content: String,
}

impl<'a, Style> SvgOutput<'a, Style> {
    pub fn new(context: &'a SvgContext, style: Style) -> Self {
        Self {
            context,
            style,
            content: String::new(),
        }
    }

    pub fn append_element<State, E: SvgElement<Style, State>>(&mut self, element: &E, state: &State) -> fmt::Result {
        element.write_svg(self, state)
    }

    pub fn save<P: AsRef<path::Path>>(self, file_name: P) -> io::Result<()> {
        use std::io::Write;

        let path = self.context.output_path.join(file_name);
        let f = std::fs::File::create(path)?;
        let mut w = io::BufWriter::new(&f);

        writeln!(w, "<svg viewBox=\"{}, {}, {}, {}\" xmlns=\"http://www.w3.org/2000/svg\">", self.context.view_x_min, self.context.view_y_min, self.context.view_w(), self.context.view_h())?;
        writeln!(w, "{}", self.content)?;
        writeln!(w, "</svg>")?;
        w.flush()
    }
}

impl<'a, Style> fmt::Write for SvgOutput<'a, Style> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.content.write_str(s)
    }
}

/// What to draw on top of the bare triangulation
#[derive(Default)]
pub(crate) struct SvgTriangulationStyle<'a> {
    pub labels: Option<&'a DomainLabels>,
}

pub(crate) struct SvgContext {
    pub output_path: path::PathBuf,
    pub output_level: SvgOutputLevel,
    pub view_x_min: f32,
    pub view_x_max: f32,
    pub view_y_min: f32,
    pub view_y_max: f32,
    pub show_labels: bool,
}

impl SvgContext {
    /// Reads the environment and frames the view around `bounds`. [None] if no output was requested.
    pub fn from_env(bounds: [[f64; 2]; 2]) -> Option<Self> {
        let output_path = crate::debug::env::svg::output_path()?;
        let output_level = crate::debug::env::svg::output_level();
        if output_level == SvgOutputLevel::None {
            return None;
        }

        let [lo, hi] = bounds;
        let (w, h) = ((hi[0] - lo[0]) as f32, (hi[1] - lo[1]) as f32);
        let margin = 0.1 * w.max(h).max(f32::MIN_POSITIVE);
        Some(Self {
            output_path,
            output_level,
            view_x_min: lo[0] as f32 - margin,
            view_x_max: hi[0] as f32 + margin,
            view_y_min: lo[1] as f32 - margin,
            view_y_max: hi[1] as f32 + margin,
            show_labels: crate::debug::env::svg::show_labels(),
        })
    }

    pub fn view_w(&self) -> f32 { self.view_x_max - self.view_x_min }
    pub fn view_h(&self) -> f32 { self.view_y_max - self.view_y_min }

    pub fn view_min_size(&self) -> f32 { self.view_w().min(self.view_h()) }

    pub fn percent(&self, p: f32) -> f32 { self.view_min_size() * p / 100.0 }
}

pub(crate) trait SvgElement<Style, State=()> {
    fn write_svg<'a>(&self, svg_output: &mut SvgOutput<'a, Style>, state: &State) -> fmt::Result;
}

// svg_fmt 0.4.1 is missing a function for Circle
pub(crate) fn circle(x: f32, y: f32, r: f32) -> svg_fmt::Circle {
    svg_fmt::Circle {
        x,
        y,
        radius: r,
        style: svg_fmt::Style::default(),
    }
}

fn point(p: [f64; 2]) -> [f32; 2] {
    [p[0] as f32, p[1] as f32]
}

impl<'s, K: Kernel> SvgElement<SvgTriangulationStyle<'s>> for ConstrainedTriangulation<K> {
    fn write_svg<'a>(&self, svg_output: &mut SvgOutput<'a, SvgTriangulationStyle<'s>>, _state: &()) -> fmt::Result {
        use svg_fmt::*;
        use fmt::Write;

        let thin = svg_output.context.percent(0.1);
        let thick = svg_output.context.percent(0.4);

        for f in self.face_indices() {
            if self.is_auxiliary_face(f) {
                continue;
            }
            let face = self.face(f);
            let corners = face.vertices().map(|v| point(self.position(v)));
            let fill = match svg_output.style.labels.and_then(|labels| labels.level(f)) {
                None => white(),
                Some(level) if crate::domain::in_domain(level) => rgb(150, 220, 150),
                Some(_) => rgb(225, 225, 225),
            };
            writeln!(svg_output, "{}",
                polygon(&corners)
                    .fill(Fill::Color(fill))
                    .stroke(Stroke::Color(rgb(128, 128, 128), thin))
            )?;

            for i in 0..3 {
                let (a, b) = face.edge(i);
                // Draw each constrained edge once
                if face.is_constrained(i) && a < b {
                    let (pa, pb) = (point(self.position(a)), point(self.position(b)));
                    writeln!(svg_output, "{}",
                        line_segment(pa[0], pa[1], pb[0], pb[1])
                            .color(red())
                            .width(thick)
                    )?;
                }
            }
        }

        let r = svg_output.context.percent(0.5);
        for v in (0..self.vertex_count()).map(crate::idx::Idx::new) {
            if self.is_auxiliary(v) {
                continue;
            }
            let [x, y] = point(self.position(v));
            writeln!(svg_output, "{}", circle(x, y, r).fill(Fill::Color(blue())))?;
            if svg_output.context.show_labels {
                let gap = svg_output.context.percent(1.0);
                writeln!(svg_output, "{}",
                    text(x - gap, y, v.to_string())
                        .color(black())
                        .align(Align::Right)
                        .size(svg_output.context.percent(1.0))
                )?;
            }
        }
        Ok(())
    }
}
