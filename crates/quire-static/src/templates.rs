//! Templates for the hydration runtime assets.

use minijinja::{context, Environment};
use quire_hydrate::{HydrationTargets, StarMetric};

/// Values baked into the runtime assets at build time.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RuntimeContext {
    /// Star count known at build time; `None` renders as `null`
    pub stars: Option<u64>,
    /// Class and attribute names the runtime hydrates
    pub targets: HydrationTargets,
}

impl RuntimeContext {
    /// Context for a build whose star source reported `stars`.
    pub fn new(stars: Option<u64>, targets: HydrationTargets) -> Self {
        Self {
            stars: StarMetric::new(stars).map(StarMetric::count),
            targets,
        }
    }
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the runtime templates.
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_template("hydrate.js", HYDRATE_JS)
            .expect("Failed to add hydrate.js template");

        env.add_template("hydrate.css", HYDRATE_CSS)
            .expect("Failed to add hydrate.css template");

        Self { env }
    }

    /// Render the hydration script.
    pub fn render_script(&self, ctx: &RuntimeContext) -> Result<String, minijinja::Error> {
        self.render("hydrate.js", ctx)
    }

    /// Render the hydration stylesheet.
    pub fn render_styles(&self, ctx: &RuntimeContext) -> Result<String, minijinja::Error> {
        self.render("hydrate.css", ctx)
    }

    fn render(&self, template: &str, ctx: &RuntimeContext) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(template)?;

        tmpl.render(context! {
            stars => &ctx.stars,
            targets => &ctx.targets,
        })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const HYDRATE_JS: &str = r#"// quire hydration runtime
(function () {
  'use strict';

  var STARS = {{ stars | tojson }};
  var TARGETS = {{ targets | tojson }};

  function formatStars(count) {
    if (count < 1000) return String(count);
    var tenths = Math.floor((count + 50) / 100);
    return (tenths / 10).toFixed(1) + 'k';
  }

  // Star badge: appended once, skipped when the count is unknown
  function injectBadge(stars) {
    if (!stars) return;

    var link = document.querySelector('.' + TARGETS.nav_link);
    if (!link || link.querySelector('.' + TARGETS.badge)) return;

    var badge = document.createElement('span');
    badge.className = TARGETS.badge;
    badge.textContent = '★ ' + formatStars(stars);
    link.appendChild(badge);
  }

  // Video control: state mirrors the video's own play/pause events
  function wireVideo() {
    var container = document.querySelector('.' + TARGETS.video_container);
    if (!container || container.hasAttribute(TARGETS.wired_attribute)) return;

    var video = container.querySelector('video');
    var control = container.querySelector('.' + TARGETS.video_control);
    if (!video || !control) return;

    container.setAttribute(TARGETS.wired_attribute, 'true');

    function setState(state) {
      if (container.getAttribute(TARGETS.state_attribute) !== state) {
        container.setAttribute(TARGETS.state_attribute, state);
      }
    }

    setState(video.paused ? 'paused' : 'playing');

    control.addEventListener('click', function () {
      var started = video.play();
      setState('playing');
      if (started && typeof started.catch === 'function') {
        started.catch(function () {
          setState(video.paused ? 'paused' : 'playing');
        });
      }
    });

    video.addEventListener('play', function () { setState('playing'); });
    video.addEventListener('pause', function () { setState('paused'); });
  }

  function hydrate(stars) {
    injectBadge(stars === undefined ? STARS : stars);
    wireVideo();
  }

  window.quireHydrate = hydrate;

  if (document.readyState === 'loading') {
    document.addEventListener('DOMContentLoaded', function () { hydrate(); });
  } else {
    hydrate();
  }
})();
"#;

const HYDRATE_CSS: &str = r#"/* quire hydration widgets */

.{{ targets.badge }} {
  display: inline-block;
  margin-left: 0.375rem;
  padding: 0 0.375rem;
  font-size: 0.75rem;
  line-height: 1.25rem;
  border-radius: 9999px;
  background: var(--muted, #f4f4f5);
  color: var(--muted-foreground, #52525b);
}

.{{ targets.video_container }} {
  position: relative;
}

.{{ targets.video_container }} video {
  display: block;
  width: 100%;
}

.{{ targets.video_control }} {
  position: absolute;
  inset: 0;
  margin: auto;
  width: 4rem;
  height: 4rem;
  border: none;
  border-radius: 9999px;
  background: var(--primary, #18181b);
  color: var(--primary-foreground, #fafafa);
  cursor: pointer;
}

.{{ targets.video_container }}[{{ targets.state_attribute }}="playing"] .{{ targets.video_control }} {
  display: none;
}
"#;
