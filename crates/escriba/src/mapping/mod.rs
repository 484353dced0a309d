//! Pure mapping stages: raw selector → [`Selector`](crate::selector::Selector),
//! frame path → [`FrameRef`](crate::selector::FrameRef)s, recorded action →
//! [`Step`](crate::scenario::Step).

pub mod action;
pub mod frame;
pub mod selector;

pub use action::{
    expectations, infer_origin, is_trivial_url, map_action, mask_secret, relativize_url,
    MapOptions, MASK,
};
pub use frame::{map_frame, map_frame_path};
pub use selector::{
    map_selector, resolve_base_index, resolve_selector, DebugSink, FILTER_ENGINES,
    IGNORED_ENGINES,
};
