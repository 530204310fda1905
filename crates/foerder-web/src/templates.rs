//! HTML templates, embedded at compile time.

use axum::response::Html;
use minijinja::{AutoEscape, Environment, default_auto_escape_callback};
use serde::Serialize;

use crate::error::Error;

const TEMPLATES: [(&str, &str); 7] = [
  ("base.html", include_str!("../templates/base.html")),
  ("index.html", include_str!("../templates/index.html")),
  ("edit.html", include_str!("../templates/edit.html")),
  ("chart.html", include_str!("../templates/chart.html")),
  ("dashboard.html", include_str!("../templates/dashboard.html")),
  ("bar.svg", include_str!("../templates/bar.svg")),
  ("radar.svg", include_str!("../templates/radar.svg")),
];

/// Build the template environment. `.html` and `.svg` names get HTML
/// auto-escaping.
pub fn environment() -> Result<Environment<'static>, minijinja::Error> {
  let mut env = Environment::new();
  env.set_auto_escape_callback(|name| {
    if name.ends_with(".svg") {
      AutoEscape::Html
    } else {
      default_auto_escape_callback(name)
    }
  });
  for (name, source) in TEMPLATES {
    env.add_template(name, source)?;
  }
  Ok(env)
}

/// Render `name` with `ctx` into an HTML response body.
pub fn render<C: Serialize>(
  env: &Environment<'static>,
  name: &str,
  ctx: C,
) -> Result<Html<String>, Error> {
  Ok(Html(env.get_template(name)?.render(ctx)?))
}
