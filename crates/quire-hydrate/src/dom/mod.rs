//! The DOM operations hydration relies on.

mod memory;

use std::rc::Rc;

pub use memory::{MemoryDom, NodeId};

/// An event listener. Listeners receive the DOM mutably when the event fires.
pub type Listener<D> = Rc<dyn Fn(&mut D)>;

/// Events hydration listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomEvent {
    Click,
    Play,
    Pause,
}

impl DomEvent {
    /// DOM event type name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Play => "play",
            Self::Pause => "pause",
        }
    }
}

/// Element selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<'a> {
    /// Elements carrying a class name
    Class(&'a str),
    /// Elements with a tag name
    Tag(&'a str),
}

/// A page's document, as seen by the hydration controller.
///
/// Queries return the first match in document order, like `querySelector`.
pub trait Dom: Sized + 'static {
    /// Handle to an element.
    type Node: Copy + Eq + std::fmt::Debug + 'static;

    /// First element in the document matching `selector`.
    fn query(&self, selector: Selector<'_>) -> Option<Self::Node>;

    /// First descendant of `root` matching `selector`.
    fn query_within(&self, root: Self::Node, selector: Selector<'_>) -> Option<Self::Node>;

    /// Create a detached element.
    fn create_element(&mut self, tag: &str) -> Self::Node;

    fn add_class(&mut self, node: Self::Node, class: &str);

    fn set_text(&mut self, node: Self::Node, text: &str);

    /// Append `child` as the last child of `parent`.
    fn append_child(&mut self, parent: Self::Node, child: Self::Node);

    fn attribute(&self, node: Self::Node, name: &str) -> Option<String>;

    fn set_attribute(&mut self, node: Self::Node, name: &str, value: &str);

    /// Register `listener` for `event` on `node`.
    fn add_listener(&mut self, node: Self::Node, event: DomEvent, listener: Listener<Self>);

    /// Whether the media element `node` is paused.
    fn media_paused(&self, node: Self::Node) -> bool;

    /// Ask the media element `node` to start playback.
    fn play_media(&mut self, node: Self::Node);
}
