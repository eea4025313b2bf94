//! Page-load hydration of the star badge and the video play control.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::dom::{Dom, DomEvent, Selector};
use crate::source::StarSource;
use crate::star::StarMetric;
use crate::state::{PlayState, Trigger};

/// Class and attribute names hydration looks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HydrationTargets {
    /// Navigation link that receives the star badge
    pub nav_link: String,
    /// Class of the injected badge element
    pub badge: String,
    /// Element wrapping the video and its play control
    pub video_container: String,
    /// The custom play control inside the container
    pub video_control: String,
    /// Container attribute holding the play state
    pub state_attribute: String,
    /// Container attribute marking listeners as installed
    pub wired_attribute: String,
}

impl Default for HydrationTargets {
    fn default() -> Self {
        Self {
            nav_link: "nav-github".to_string(),
            badge: "star-badge".to_string(),
            video_container: "video-container".to_string(),
            video_control: "video-play".to_string(),
            state_attribute: "data-state".to_string(),
            wired_attribute: "data-hydrated".to_string(),
        }
    }
}

/// Result of the star badge step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeOutcome {
    /// A badge was appended to the navigation link
    Injected,
    /// The link already carries a badge
    AlreadyPresent,
    /// The star count is absent or zero
    Unknown,
    /// The page has no navigation link
    NoTarget,
}

/// Result of the video wiring step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoOutcome {
    /// Listeners were installed
    Wired,
    /// Listeners were installed by an earlier hydration
    AlreadyWired,
    /// The page has no complete video container
    NoTarget,
}

/// What a hydration pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HydrationReport {
    pub badge: BadgeOutcome,
    pub video: VideoOutcome,
}

/// Hydrates a loaded page.
///
/// Safe to run any number of times on the same page: the badge is only
/// appended when none exists, and video listeners are only installed on a
/// container that does not carry the wiring marker.
#[derive(Debug, Clone, Default)]
pub struct HydrationController {
    targets: Rc<HydrationTargets>,
}

impl HydrationController {
    /// Create a controller for the given targets.
    pub fn new(targets: HydrationTargets) -> Self {
        Self {
            targets: Rc::new(targets),
        }
    }

    /// The targets this controller hydrates.
    pub fn targets(&self) -> &HydrationTargets {
        &self.targets
    }

    /// Run both hydration steps. The steps are independent of each other.
    pub fn hydrate<D: Dom>(&self, dom: &mut D, stars: &dyn StarSource) -> HydrationReport {
        let report = HydrationReport {
            badge: self.inject_badge(dom, stars),
            video: self.wire_video(dom),
        };

        tracing::debug!(badge = ?report.badge, video = ?report.video, "Hydrated page");

        report
    }

    /// Append `★ <count>` to the navigation link, once.
    pub fn inject_badge<D: Dom>(&self, dom: &mut D, stars: &dyn StarSource) -> BadgeOutcome {
        let Some(metric) = StarMetric::new(stars.stars()) else {
            return BadgeOutcome::Unknown;
        };

        let Some(link) = dom.query(Selector::Class(&self.targets.nav_link)) else {
            return BadgeOutcome::NoTarget;
        };

        if dom
            .query_within(link, Selector::Class(&self.targets.badge))
            .is_some()
        {
            return BadgeOutcome::AlreadyPresent;
        }

        let badge = dom.create_element("span");
        dom.add_class(badge, &self.targets.badge);
        dom.set_text(badge, &metric.badge_text());
        dom.append_child(link, badge);

        BadgeOutcome::Injected
    }

    /// Keep the container's play state in sync with its video, once.
    ///
    /// The state follows the video's own `play`/`pause` events, so playback
    /// started or stopped through native controls is reflected too.
    pub fn wire_video<D: Dom>(&self, dom: &mut D) -> VideoOutcome {
        let targets = &self.targets;

        let Some(container) = dom.query(Selector::Class(&targets.video_container)) else {
            return VideoOutcome::NoTarget;
        };

        if dom.attribute(container, &targets.wired_attribute).is_some() {
            return VideoOutcome::AlreadyWired;
        }

        let video = dom.query_within(container, Selector::Tag("video"));
        let control = dom.query_within(container, Selector::Class(&targets.video_control));
        let (Some(video), Some(control)) = (video, control) else {
            return VideoOutcome::NoTarget;
        };

        dom.set_attribute(container, &targets.wired_attribute, "true");

        let initial = PlayState::from_paused(dom.media_paused(video));
        if dom.attribute(container, &targets.state_attribute).as_deref() != Some(initial.as_str())
        {
            dom.set_attribute(container, &targets.state_attribute, initial.as_str());
        }

        let on_click = Rc::clone(targets);
        dom.add_listener(
            control,
            DomEvent::Click,
            Rc::new(move |dom: &mut D| {
                dom.play_media(video);
                apply(dom, container, &on_click.state_attribute, Trigger::ControlActivated);
            }),
        );

        let on_play = Rc::clone(targets);
        dom.add_listener(
            video,
            DomEvent::Play,
            Rc::new(move |dom: &mut D| {
                apply(dom, container, &on_play.state_attribute, Trigger::MediaPlay);
            }),
        );

        let on_pause = Rc::clone(targets);
        dom.add_listener(
            video,
            DomEvent::Pause,
            Rc::new(move |dom: &mut D| {
                apply(dom, container, &on_pause.state_attribute, Trigger::MediaPause);
            }),
        );

        VideoOutcome::Wired
    }
}

/// Move the container's state along `trigger`.
fn apply<D: Dom>(dom: &mut D, container: D::Node, attribute: &str, trigger: Trigger) {
    let current = PlayState::parse(dom.attribute(container, attribute).as_deref());
    let next = current.next(trigger);
    if next != current {
        tracing::trace!("Video state {} -> {}", current, next);
    }
    dom.set_attribute(container, attribute, next.as_str());
}
