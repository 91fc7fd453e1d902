//! Letter Pack label layout.
//!
//! Turns a validated [`LayoutConfig`] and two [`AddressRecord`]s (recipient
//! and sender) into pages of [`RenderInstruction`]s that a drawing backend
//! replays. Configuration problems are reported while resolving the
//! configuration; rendering itself cannot fail.
//!
//! ```
//! use letterpack::{AddressRecord, LayoutMode, render, resolve};
//!
//! let config = resolve(None, None).unwrap();
//! let to = AddressRecord::new("100-0001", ["東京都千代田区千代田1-1"], "山田太郎")
//!     .unwrap()
//!     .with_honorific("様");
//! let from = AddressRecord::new("530-0001", ["大阪府大阪市北区梅田1-1"], "佐藤花子").unwrap();
//! let page = render(&to, &from, &config, LayoutMode::Center);
//! assert!(!page.instructions.is_empty());
//! ```

pub mod address;
pub mod config;
pub mod effective;
pub mod errors;
pub mod log;
pub mod render;
pub mod types;
pub mod wrap;

pub use address::{AddressRecord, LabelPair, PostalCode};
pub use config::{LayoutConfig, LayoutMode, resolve, set_override};
pub use effective::EffectiveLayout;
pub use errors::{AddressError, ConfigError, FileError, InvariantError, ValidationError};
pub use render::{Canvas, Page, RenderInstruction, SvgCanvas, render, render_batch, replay};
pub use wrap::{wrap, wrap_lines};
