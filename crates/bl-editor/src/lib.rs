pub mod commands;
pub mod hit;
pub mod input;
pub mod session;
pub mod shortcuts;
pub mod viewport;

pub use commands::EditorCommand;
pub use input::{InputEvent, Modifiers, PointerButton};
pub use session::{EditorMode, EditorSession, SaveHook};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use viewport::{ViewTransform, Viewport};
