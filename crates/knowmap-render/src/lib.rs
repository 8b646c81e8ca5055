//! KnowMap Render - Presentation of knowledge graphs
//!
//! Two independent paths:
//! - [`plot`]: force-directed layout drawn to a static SVG figure
//! - [`html`]: self-contained interactive page (vis-network) with
//!   domain-colored nodes
//!
//! Both write a file and can hand it to the system viewer via [`open`].

pub mod html;
pub mod layout;
pub mod open;
pub mod plot;

pub use html::{domain_color, render_html, write_html};
pub use layout::{compute_layout, Layout, Position};
pub use open::open_path;
pub use plot::{render_svg, write_svg};
