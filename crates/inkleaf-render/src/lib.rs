//! Inkleaf Render Library
//!
//! Stateless rendering of pages and elements onto a [`RenderTarget`].
//! Two targets ship with the crate: a recording [`DisplayList`] for hosts
//! that replay commands onto their own canvas, and [`SvgTarget`] for
//! static export.

mod display_list;
mod renderer;
mod svg;

pub use display_list::{DisplayList, DrawCommand};
pub use renderer::{
    RenderOptions, RenderResult, RenderTarget, RendererError, render, render_element, render_page, render_with,
};
pub use svg::SvgTarget;
