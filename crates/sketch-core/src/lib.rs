pub mod color;
pub mod drawing;
pub mod error;
pub mod host;
pub mod input;
pub mod session;
pub mod shapes;
pub mod state;

pub use color::{ColorForm, CssColor};
pub use drawing::Drawing;
pub use error::SketchError;
pub use host::{FrameScheduler, PaintContext, Surface, SurfaceProvider};
pub use input::InputEvent;
pub use session::{OptionsPatch, Session, SketchOptions};
pub use shapes::*;
pub use state::DrawingState;
