//! Structural elements module

mod element;
mod material;
mod node;
mod section;
mod support;

pub use element::{
    AxialState, Element, ElementType, MemberLoad, MemberReleases, POST_YIELD_RATIO,
    SLACK_STIFFNESS_RATIO,
};
pub use material::Material;
pub use node::Node;
pub use section::Section;
pub use support::Support;
