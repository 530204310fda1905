//! Inline SVG charts for aggregated counts.
//!
//! Two renderings of the same `(label, count)` series: a Cartesian bar chart
//! and a polar radar chart. Geometry is computed here; the markup lives in the
//! `bar.svg` and `radar.svg` templates, which escape labels like every other
//! template. Output is a standalone `<svg>` element for embedding in a page.

use std::{f64::consts::PI, fmt, str::FromStr};

use foerder_core::record::CategoryCount;
use minijinja::{Environment, context};
use serde::{Deserialize, Serialize};

use crate::error::Error;

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 400.0;
const BAR_COLOR: &str = "#1f77b4";

// ─── Style ───────────────────────────────────────────────────────────────────

/// Which rendering the chart page uses.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ChartStyle {
  #[default]
  Bar,
  Radar,
}

impl ChartStyle {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Bar => "bar",
      Self::Radar => "radar",
    }
  }

  pub fn render(
    self,
    env: &Environment<'_>,
    counts: &[CategoryCount],
    title: &str,
  ) -> Result<String, minijinja::Error> {
    match self {
      Self::Bar => bar_chart(env, counts, title),
      Self::Radar => radar_chart(env, counts, title),
    }
  }
}

impl fmt::Display for ChartStyle {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for ChartStyle {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Error> {
    match s {
      "bar" => Ok(Self::Bar),
      "radar" => Ok(Self::Radar),
      other => Err(Error::BadRequest(format!("unknown chart style: {other:?}"))),
    }
  }
}

// ─── Layout ──────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct Frame<'a> {
  width:    f64,
  height:   f64,
  center_x: f64,
  center_y: f64,
  title:    &'a str,
  color:    &'static str,
}

impl<'a> Frame<'a> {
  fn new(title: &'a str) -> Self {
    Self {
      width: WIDTH,
      height: HEIGHT,
      center_x: WIDTH / 2.0,
      center_y: HEIGHT / 2.0,
      title,
      color: BAR_COLOR,
    }
  }
}

#[derive(Serialize)]
struct Plot {
  left:   f64,
  top:    f64,
  right:  f64,
  bottom: f64,
  axis_x: f64,
  axis_y: f64,
}

#[derive(Serialize)]
struct Bar<'a> {
  label:   &'a str,
  count:   u64,
  x:       f64,
  y:       f64,
  width:   f64,
  height:  f64,
  center:  f64,
  value_y: f64,
  label_y: f64,
}

#[derive(Serialize)]
struct Spoke<'a> {
  label:   &'a str,
  count:   u64,
  x:       f64,
  y:       f64,
  label_x: f64,
  label_y: f64,
}

// ─── Bar chart ───────────────────────────────────────────────────────────────

/// Vertical bars, one per label, scaled to the largest count.
pub fn bar_chart(
  env: &Environment<'_>,
  counts: &[CategoryCount],
  title: &str,
) -> Result<String, minijinja::Error> {
  let (left, right, top, bottom) = (50.0, 20.0, 50.0, 60.0);
  let plot_w = WIDTH - left - right;
  let plot_h = HEIGHT - top - bottom;
  let max = max_count(counts);
  let slot = plot_w / counts.len().max(1) as f64;
  let bar_w = slot * 0.7;

  let plot = Plot {
    left,
    top,
    right: left + plot_w,
    bottom: top + plot_h,
    axis_x: left - 30.0,
    axis_y: top + plot_h / 2.0,
  };

  let bars: Vec<Bar<'_>> = counts
    .iter()
    .enumerate()
    .map(|(i, c)| {
      let h = plot_h * c.count as f64 / max;
      let x = left + slot * i as f64 + (slot - bar_w) / 2.0;
      let y = top + plot_h - h;
      Bar {
        label:   &c.label,
        count:   c.count,
        x:       round1(x),
        y:       round1(y),
        width:   round1(bar_w),
        height:  round1(h),
        center:  round1(x + bar_w / 2.0),
        value_y: round1(y - 4.0),
        label_y: round1(top + plot_h + 18.0),
      }
    })
    .collect();

  env.get_template("bar.svg")?.render(context! {
    frame => Frame::new(title),
    plot,
    bars,
  })
}

// ─── Radar chart ─────────────────────────────────────────────────────────────

/// Vertices of the radar polygon, starting at twelve o'clock and running
/// clockwise. The first vertex is repeated at the end to close the loop, so
/// the result has `counts.len() + 1` points (or none for an empty series).
pub fn radar_points(
  counts: &[CategoryCount],
  cx: f64,
  cy: f64,
  radius: f64,
) -> Vec<(f64, f64)> {
  if counts.is_empty() {
    return Vec::new();
  }
  let max = max_count(counts);
  let mut points: Vec<(f64, f64)> = counts
    .iter()
    .enumerate()
    .map(|(i, c)| {
      let r = radius * c.count as f64 / max;
      polar(cx, cy, r, axis_angle(i, counts.len()))
    })
    .collect();
  points.push(points[0]);
  points
}

/// Polar chart with one spoke per label and the counts joined as a polygon.
pub fn radar_chart(
  env: &Environment<'_>,
  counts: &[CategoryCount],
  title: &str,
) -> Result<String, minijinja::Error> {
  let (cx, cy) = (WIDTH / 2.0, HEIGHT / 2.0 + 15.0);
  let radius = HEIGHT / 2.0 - 60.0;
  let n = counts.len();

  let rings: Vec<f64> =
    (1..=4).map(|ring| round1(radius * f64::from(ring) / 4.0)).collect();

  let spokes: Vec<Spoke<'_>> = counts
    .iter()
    .enumerate()
    .map(|(i, c)| {
      let angle = axis_angle(i, n);
      let (x, y) = polar(cx, cy, radius, angle);
      let (lx, ly) = polar(cx, cy, radius + 18.0, angle);
      Spoke {
        label:   &c.label,
        count:   c.count,
        x:       round1(x),
        y:       round1(y),
        label_x: round1(lx),
        label_y: round1(ly),
      }
    })
    .collect();

  let points = radar_points(counts, cx, cy, radius)
    .iter()
    .map(|(x, y)| format!("{x:.1},{y:.1}"))
    .collect::<Vec<_>>()
    .join(" ");

  env.get_template("radar.svg")?.render(context! {
    frame => Frame::new(title),
    hub   => context! { x => cx, y => cy },
    rings,
    spokes,
    points,
  })
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Largest count as a divisor; never zero.
fn max_count(counts: &[CategoryCount]) -> f64 {
  counts.iter().map(|c| c.count).max().unwrap_or(0).max(1) as f64
}

fn axis_angle(i: usize, n: usize) -> f64 {
  2.0 * PI * i as f64 / n as f64 - PI / 2.0
}

fn polar(cx: f64, cy: f64, r: f64, angle: f64) -> (f64, f64) {
  (cx + r * angle.cos(), cy + r * angle.sin())
}

fn round1(v: f64) -> f64 { (v * 10.0).round() / 10.0 }

#[cfg(test)]
mod tests {
  use super::*;
  use crate::templates::environment;

  fn counts() -> Vec<CategoryCount> {
    vec![
      CategoryCount::new("EU", 4),
      CategoryCount::new("Bund", 2),
      CategoryCount::new("Land", 1),
    ]
  }

  #[test]
  fn bar_chart_has_one_rect_per_label() {
    let env = environment().unwrap();
    let svg = bar_chart(&env, &counts(), "Förderdaten nach Quelle").unwrap();
    assert!(svg.trim_start().starts_with("<svg"));
    assert!(svg.trim_end().ends_with("</svg>"));
    assert_eq!(svg.matches("<rect").count(), 3);
    assert!(svg.contains("EU: 4"));
    assert!(svg.contains("Förderdaten nach Quelle"));
  }

  #[test]
  fn labels_are_escaped() {
    let env = environment().unwrap();
    let svg = bar_chart(&env, &[CategoryCount::new("<b>&", 1)], "x").unwrap();
    assert!(svg.contains("&lt;b&gt;&amp;"));
    assert!(!svg.contains("<b>"));

    let svg = radar_chart(&env, &[CategoryCount::new("<b>", 1)], "<i>").unwrap();
    assert!(!svg.contains("<b>"));
    assert!(!svg.contains("<i>"));
  }

  #[test]
  fn empty_series_renders_notice() {
    let env = environment().unwrap();
    let svg = radar_chart(&env, &[], "leer").unwrap();
    assert!(svg.contains("Keine Daten"));
    assert!(!svg.contains("<polyline"));

    let svg = bar_chart(&env, &[], "leer").unwrap();
    assert!(svg.contains("Keine Daten"));
    assert!(!svg.contains("<rect"));
  }

  #[test]
  fn radar_chart_draws_spokes_and_polygon() {
    let env = environment().unwrap();
    let svg = radar_chart(&env, &counts(), "Radar").unwrap();
    assert_eq!(svg.matches("<circle").count(), 4);
    assert!(svg.contains("Bund (2)"));
    assert_eq!(svg.matches("<polyline").count(), 1);
  }

  #[test]
  fn radar_polygon_is_closed() {
    let points = radar_points(&counts(), 100.0, 100.0, 50.0);
    assert_eq!(points.len(), 4);
    assert_eq!(points.first(), points.last());
  }

  #[test]
  fn radar_largest_count_reaches_full_radius() {
    let points = radar_points(&counts(), 100.0, 100.0, 50.0);
    // First spoke points straight up.
    let (x, y) = points[0];
    assert!((x - 100.0).abs() < 1e-9);
    assert!((y - 50.0).abs() < 1e-9);
  }

  #[test]
  fn style_parses() {
    assert_eq!("radar".parse::<ChartStyle>().unwrap(), ChartStyle::Radar);
    assert!(matches!(
      "pie".parse::<ChartStyle>(),
      Err(Error::BadRequest(_))
    ));
  }
}
