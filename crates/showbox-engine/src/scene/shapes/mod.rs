mod circle;
mod rect;
mod text;

pub use circle::CircleCmd;
pub use rect::RectCmd;
pub use text::TextCmd;
